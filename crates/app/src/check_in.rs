//! Operator check-in flow on the terminal.

use anyhow::{Result, bail};
use chrono_tz::Tz;
use tix_api::ApiClient;
use tix_checkin::{CheckInSession, Clock, TicketAuthority, UsePolicy, messages};
use tix_models::BearerToken;
use tracing::info;

use crate::prompt::{confirm, prompt, stdin_lines};
use crate::render;

fn show<A: TicketAuthority, C: Clock>(session: &CheckInSession<A, C>, tz: Tz) {
    print!(
        "{}",
        render::check_in_outcome(session.error(), session.success(), session.ticket(), session.offer(), tz)
    );
}

/// Scan loop: code → lookup → optional check-in → "Scan Lagi".
///
/// A blank line, `q`, or end of input ends the loop.
pub async fn run_interactive(
    client: ApiClient,
    token: BearerToken,
    policy: UsePolicy,
    tz: Tz,
    first_code: Option<String>,
) -> Result<()> {
    let mut session = CheckInSession::with_system_clock(client, token, policy);
    let mut input = stdin_lines();
    let mut next = first_code;
    let mut checked_in = 0usize;

    loop {
        let code = match next.take() {
            Some(code) => code,
            None => match prompt(&mut input, "Kode tiket (kosong atau q untuk keluar): ").await? {
                Some(line) => line,
                None => break,
            },
        };
        let code = code.trim();
        if code.is_empty() || code.eq_ignore_ascii_case("q") {
            break;
        }

        session.submit_code(code).await;
        show(&session, tz);

        if session.offer().is_actionable()
            && confirm(&mut input, &format!("{}? [y/N]: ", messages::USE_ACTION)).await?
        {
            session.confirm_use().await;
            show(&session, tz);
            if session.success().is_some() {
                checked_in += 1;
            }
        }

        session.reset();
        println!("--- {} ---", messages::RESET_ACTION);
    }

    info!("Check-in session ended, {checked_in} ticket(s) checked in");
    Ok(())
}

/// Read-only lookup of one code.
pub async fn validate(client: ApiClient, token: BearerToken, policy: UsePolicy, tz: Tz, code: &str) -> Result<()> {
    let mut session = CheckInSession::with_system_clock(client, token, policy);
    if !session.submit_code(code).await {
        bail!("ticket code is empty");
    }
    show(&session, tz);
    if let Some(msg) = session.error() {
        bail!("{msg}");
    }
    Ok(())
}

/// Look up one code and check it in if it is still `ISSUED`.
pub async fn use_ticket(
    client: ApiClient,
    token: BearerToken,
    policy: UsePolicy,
    tz: Tz,
    code: &str,
    yes: bool,
) -> Result<()> {
    let mut session = CheckInSession::with_system_clock(client, token, policy);
    if !session.submit_code(code).await {
        bail!("ticket code is empty");
    }
    show(&session, tz);
    if let Some(msg) = session.error() {
        bail!("{msg}");
    }

    if !session.offer().is_actionable() {
        bail!("{}", session.offer().label().unwrap_or(messages::NOT_VALID));
    }

    let go = yes || confirm(&mut stdin_lines(), &format!("{}? [y/N]: ", messages::USE_ACTION)).await?;
    if !go {
        println!("Dibatalkan.");
        return Ok(());
    }

    session.confirm_use().await;
    show(&session, tz);
    if let Some(msg) = session.error() {
        bail!("{msg}");
    }
    Ok(())
}
