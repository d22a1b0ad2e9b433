use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tix_models::{BearerToken, Ticket, TicketStatus};
use tracing::{debug, info, warn};

use crate::authority::{AuthorityError, TicketAuthority};
use crate::clock::{Clock, SystemClock};
use crate::messages;

/// What to show after the authority accepts a check-in.
///
/// `Optimistic` patches the local snapshot with the client clock, so the
/// displayed `usedAt` can drift from the authority's record until the next
/// lookup. `Reconcile` re-reads the ticket before leaving `Using`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsePolicy {
    #[default]
    Optimistic,
    Reconcile,
}

#[derive(Debug, Error)]
#[error("unknown use policy `{0}` (expected `optimistic` or `reconcile`)")]
pub struct UnknownPolicy(String);

impl FromStr for UsePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(UsePolicy::Optimistic),
            "reconcile" => Ok(UsePolicy::Reconcile),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    LookingUp { code: String },
    Resolved { ticket: Ticket, success: Option<String> },
    Using { ticket: Ticket },
    Failed { message: String, ticket: Option<Ticket> },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::LookingUp { .. } => "looking-up",
            SessionState::Resolved { .. } => "resolved",
            SessionState::Using { .. } => "using",
            SessionState::Failed { .. } => "failed",
        }
    }
}

/// Handle for a request issued by the session.
///
/// Completions carrying a handle from before the last `reset` or newer
/// request are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    generation: u64,
    code: String,
}

impl PendingRequest {
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Action area contents for the current ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    UseTicket,
    AlreadyUsed,
    NotValid,
    Nothing,
}

impl Offer {
    pub fn label(self) -> Option<&'static str> {
        match self {
            Offer::UseTicket => Some(messages::USE_ACTION),
            Offer::AlreadyUsed => Some(messages::ALREADY_USED),
            Offer::NotValid => Some(messages::NOT_VALID),
            Offer::Nothing => None,
        }
    }

    pub fn is_actionable(self) -> bool {
        self == Offer::UseTicket
    }
}

/// One operator's lookup-then-check-in cycle against a ticket authority.
pub struct CheckInSession<A, C = SystemClock> {
    authority: A,
    token: BearerToken,
    clock: C,
    policy: UsePolicy,
    code: String,
    state: SessionState,
    generation: u64,
}

impl<A: TicketAuthority> CheckInSession<A, SystemClock> {
    pub fn with_system_clock(authority: A, token: BearerToken, policy: UsePolicy) -> Self {
        Self::new(authority, token, SystemClock, policy)
    }
}

impl<A: TicketAuthority, C: Clock> CheckInSession<A, C> {
    pub fn new(authority: A, token: BearerToken, clock: C, policy: UsePolicy) -> Self {
        Self {
            authority,
            token,
            clock,
            policy,
            code: String::new(),
            state: SessionState::Idle,
            generation: 0,
        }
    }

    // --- Accessors ---

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn policy(&self) -> UsePolicy {
        self.policy
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SessionState::LookingUp { .. } | SessionState::Using { .. }
        )
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        match &self.state {
            SessionState::Resolved { ticket, .. } | SessionState::Using { ticket } => Some(ticket),
            SessionState::Failed { ticket, .. } => ticket.as_ref(),
            SessionState::Idle | SessionState::LookingUp { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&str> {
        match &self.state {
            SessionState::Resolved { success, .. } => success.as_deref(),
            _ => None,
        }
    }

    pub fn offer(&self) -> Offer {
        if self.is_busy() {
            return Offer::Nothing;
        }
        match self.ticket().map(|t| t.status) {
            Some(TicketStatus::Issued) => Offer::UseTicket,
            Some(TicketStatus::Used) => Offer::AlreadyUsed,
            Some(TicketStatus::Void) => Offer::NotValid,
            None => Offer::Nothing,
        }
    }

    // --- Transitions ---

    /// Store operator input, normalized to an uppercase code.
    pub fn set_code(&mut self, input: &str) {
        if self.is_busy() {
            debug!("Ignoring code input while a request is in flight");
            return;
        }
        self.code = input.trim().to_uppercase();
    }

    /// Enter `LookingUp` for the current code.
    ///
    /// Returns `None` without touching state when the code is blank or a
    /// request is already in flight.
    pub fn begin_lookup(&mut self) -> Option<PendingRequest> {
        if self.is_busy() || self.code.trim().is_empty() {
            return None;
        }
        let pending = self.next_request(self.code.clone());
        self.transition(SessionState::LookingUp { code: self.code.clone() });
        Some(pending)
    }

    pub fn complete_lookup(&mut self, pending: &PendingRequest, result: Result<Ticket, AuthorityError>) {
        if !self.is_current(pending) || !matches!(self.state, SessionState::LookingUp { .. }) {
            debug!(code = %pending.code, "Discarding stale lookup result");
            return;
        }
        let next = match result {
            Ok(ticket) => {
                info!(code = %ticket.code, status = %ticket.status, "Ticket resolved");
                SessionState::Resolved { ticket, success: None }
            }
            Err(e) => {
                warn!(code = %pending.code, error = %e, "Ticket lookup failed");
                SessionState::Failed {
                    message: lookup_message(&e),
                    ticket: None,
                }
            }
        };
        self.transition(next);
    }

    /// Enter `Using` for the displayed ticket.
    ///
    /// Only an `ISSUED` ticket can be checked in. A ticket still displayed
    /// after a failed attempt may be retried.
    pub fn begin_use(&mut self) -> Option<PendingRequest> {
        let ticket = match &self.state {
            SessionState::Resolved { ticket, .. } => ticket,
            SessionState::Failed { ticket: Some(ticket), .. } => ticket,
            _ => return None,
        };
        if ticket.status != TicketStatus::Issued {
            return None;
        }
        let ticket = ticket.clone();
        let pending = self.next_request(ticket.code.clone());
        self.transition(SessionState::Using { ticket });
        Some(pending)
    }

    /// Apply the outcome of a mark-used call.
    ///
    /// `Ok(Some(snapshot))` replaces the local ticket with the authority's
    /// copy; `Ok(None)` patches the local copy with `now`.
    pub fn complete_use(
        &mut self,
        pending: &PendingRequest,
        result: Result<Option<Ticket>, AuthorityError>,
        now: DateTime<Utc>,
    ) {
        if !self.is_current(pending) {
            debug!(code = %pending.code, "Discarding stale check-in result");
            return;
        }
        let SessionState::Using { ticket } = &self.state else {
            debug!(code = %pending.code, "Check-in result arrived outside of using state");
            return;
        };
        let next = match result {
            Ok(fresh) => {
                let ticket = fresh.unwrap_or_else(|| ticket.marked_used(now));
                info!(code = %ticket.code, "Ticket checked in");
                SessionState::Resolved {
                    ticket,
                    success: Some(messages::USE_SUCCEEDED.to_string()),
                }
            }
            Err(e) => {
                warn!(code = %pending.code, error = %e, "Check-in failed");
                SessionState::Failed {
                    message: use_message(&e),
                    ticket: Some(ticket.clone()),
                }
            }
        };
        self.transition(next);
    }

    /// Back to `Idle` with every transient field cleared.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.code.clear();
        self.transition(SessionState::Idle);
    }

    // --- Drivers ---

    /// Look up the current code. Returns `false` when nothing was submitted.
    pub async fn submit(&mut self) -> bool {
        let Some(pending) = self.begin_lookup() else {
            return false;
        };
        let result = self.authority.resolve(&self.token, pending.code()).await;
        self.complete_lookup(&pending, result);
        true
    }

    pub async fn submit_code(&mut self, input: &str) -> bool {
        self.set_code(input);
        self.submit().await
    }

    /// Check in the displayed ticket. Returns `false` when it is not offered.
    pub async fn confirm_use(&mut self) -> bool {
        let Some(pending) = self.begin_use() else {
            return false;
        };
        let result = match self.authority.mark_used(&self.token, pending.code()).await {
            Ok(returned) => Ok(self.snapshot_after_use(&pending, returned).await),
            Err(e) => Err(e),
        };
        let now = self.clock.now();
        self.complete_use(&pending, result, now);
        true
    }

    // --- Private helpers ---

    async fn snapshot_after_use(&self, pending: &PendingRequest, returned: Option<Ticket>) -> Option<Ticket> {
        match self.policy {
            UsePolicy::Optimistic => None,
            UsePolicy::Reconcile => {
                if returned.is_some() {
                    return returned;
                }
                match self.authority.resolve(&self.token, pending.code()).await {
                    Ok(ticket) => Some(ticket),
                    Err(e) => {
                        warn!(code = %pending.code, error = %e, "Re-read after check-in failed; keeping local snapshot");
                        None
                    }
                }
            }
        }
    }

    fn next_request(&mut self, code: String) -> PendingRequest {
        self.generation += 1;
        PendingRequest {
            generation: self.generation,
            code,
        }
    }

    fn is_current(&self, pending: &PendingRequest) -> bool {
        pending.generation == self.generation
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = self.state.name(), to = next.name(), "Check-in session transition");
        self.state = next;
    }
}

fn lookup_message(e: &AuthorityError) -> String {
    match e {
        AuthorityError::Rejected { .. } => e
            .server_message()
            .unwrap_or(messages::LOOKUP_NOT_FOUND)
            .to_string(),
        AuthorityError::Transport(_) | AuthorityError::Malformed(_) => messages::LOOKUP_FAILED.to_string(),
    }
}

fn use_message(e: &AuthorityError) -> String {
    e.server_message().unwrap_or(messages::USE_FAILED).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Resolve(String, String),
        MarkUsed(String, String),
    }

    #[derive(Clone, Default)]
    struct FakeAuthority {
        calls: Arc<Mutex<Vec<Call>>>,
        resolves: Arc<Mutex<VecDeque<Result<Ticket, AuthorityError>>>>,
        uses: Arc<Mutex<VecDeque<Result<Option<Ticket>, AuthorityError>>>>,
    }

    impl FakeAuthority {
        fn on_resolve(self, r: Result<Ticket, AuthorityError>) -> Self {
            self.resolves.lock().unwrap().push_back(r);
            self
        }

        fn on_use(self, r: Result<Option<Ticket>, AuthorityError>) -> Self {
            self.uses.lock().unwrap().push_back(r);
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TicketAuthority for FakeAuthority {
        async fn resolve(&self, token: &BearerToken, code: &str) -> Result<Ticket, AuthorityError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Resolve(token.as_str().to_string(), code.to_string()));
            self.resolves
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AuthorityError::Transport("unscripted".into())))
        }

        async fn mark_used(&self, token: &BearerToken, code: &str) -> Result<Option<Ticket>, AuthorityError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::MarkUsed(token.as_str().to_string(), code.to_string()));
            self.uses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AuthorityError::Transport("unscripted".into())))
        }
    }

    fn ticket(code: &str, status: &str) -> Ticket {
        let used_at = if status == "USED" { r#""2025-07-12T11:00:00Z""# } else { "null" };
        serde_json::from_str(&format!(
            r#"{{"id":"t-{code}","code":"{code}","status":"{status}",
                 "issuedAt":"2025-06-01T03:00:00Z","usedAt":{used_at},
                 "concert":{{"title":"Java Jazz","venue":"JIExpo","startAt":"2025-07-12T12:00:00Z"}},
                 "ticketType":{{"name":"VIP","price":"1500000"}},
                 "user":{{"name":"Sari","email":"sari@example.com"}}}}"#
        ))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 12, 11, 45, 0).unwrap()
    }

    fn session(authority: FakeAuthority) -> CheckInSession<FakeAuthority, FixedClock> {
        session_with(authority, UsePolicy::Optimistic)
    }

    fn session_with(authority: FakeAuthority, policy: UsePolicy) -> CheckInSession<FakeAuthority, FixedClock> {
        CheckInSession::new(authority, BearerToken::new("admin-token"), FixedClock(now()), policy)
    }

    fn not_found(message: Option<&str>) -> AuthorityError {
        AuthorityError::Rejected {
            status: Some(404),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn starts_idle() {
        let s = session(FakeAuthority::default());
        assert_eq!(s.state(), &SessionState::Idle);
        assert_eq!(s.code(), "");
        assert!(!s.is_busy());
        assert_eq!(s.offer(), Offer::Nothing);
    }

    #[test]
    fn begin_lookup_enters_looking_up_with_uppercased_code() {
        let mut s = session(FakeAuthority::default());
        s.set_code("  abc123 ");
        let pending = s.begin_lookup().unwrap();
        assert_eq!(pending.code(), "ABC123");
        assert_eq!(s.state(), &SessionState::LookingUp { code: "ABC123".into() });
        assert!(s.is_busy());
    }

    #[test]
    fn busy_session_refuses_second_request() {
        let mut s = session(FakeAuthority::default());
        s.set_code("abc123");
        assert!(s.begin_lookup().is_some());
        assert!(s.begin_lookup().is_none());
        assert!(s.begin_use().is_none());
        s.set_code("zzz");
        assert_eq!(s.code(), "ABC123");
    }

    #[tokio::test]
    async fn blank_code_is_a_no_op_from_any_state() {
        let fake = FakeAuthority::default().on_resolve(Ok(ticket("ABC123", "ISSUED")));
        let mut s = session(fake.clone());
        assert!(!s.submit_code("   ").await);
        assert_eq!(s.state(), &SessionState::Idle);

        assert!(s.submit_code("abc123").await);
        let before = s.state().clone();
        assert!(!s.submit_code("").await);
        assert_eq!(s.state(), &before);
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn lookup_issues_one_request_with_token_and_uppercased_code() {
        let fake = FakeAuthority::default().on_resolve(Ok(ticket("ABC123", "ISSUED")));
        let mut s = session(fake.clone());
        assert!(s.submit_code("abc123").await);
        assert_eq!(
            fake.calls(),
            vec![Call::Resolve("admin-token".into(), "ABC123".into())]
        );
        assert_eq!(s.ticket().map(|t| t.code.as_str()), Some("ABC123"));
        assert_eq!(s.offer(), Offer::UseTicket);
        assert_eq!(s.offer().label(), Some("Gunakan Tiket"));
        assert!(s.error().is_none());
        assert!(s.success().is_none());
    }

    #[tokio::test]
    async fn used_and_void_tickets_are_not_actionable() {
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("USED01", "USED")))
            .on_resolve(Ok(ticket("VOID01", "VOID")));
        let mut s = session(fake.clone());

        s.submit_code("used01").await;
        assert_eq!(s.offer(), Offer::AlreadyUsed);
        assert_eq!(s.offer().label(), Some("Tiket sudah digunakan"));
        assert!(!s.confirm_use().await);

        s.submit_code("void01").await;
        assert_eq!(s.offer(), Offer::NotValid);
        assert_eq!(s.offer().label(), Some("Tiket tidak valid"));
        assert!(!s.offer().is_actionable());
        assert!(!s.confirm_use().await);

        assert!(fake.calls().iter().all(|c| matches!(c, Call::Resolve(..))));
    }

    #[tokio::test]
    async fn successful_use_updates_status_optimistically() {
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Ok(None));
        let mut s = session(fake.clone());
        s.submit_code("abc123").await;
        assert!(s.confirm_use().await);

        let t = s.ticket().unwrap();
        assert_eq!(t.status, TicketStatus::Used);
        assert_eq!(t.used_at, Some(now()));
        assert_eq!(s.success(), Some("Tiket berhasil digunakan!"));
        assert_eq!(s.offer(), Offer::AlreadyUsed);
        assert_eq!(
            fake.calls().last(),
            Some(&Call::MarkUsed("admin-token".into(), "ABC123".into()))
        );
    }

    #[tokio::test]
    async fn optimistic_policy_ignores_returned_snapshot() {
        let mut returned = ticket("ABC123", "USED");
        returned.concert.venue = "returned-by-server".into();
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Ok(Some(returned)));
        let mut s = session(fake);
        s.submit_code("ABC123").await;
        s.confirm_use().await;
        assert_eq!(s.ticket().unwrap().used_at, Some(now()));
        assert_eq!(s.ticket().unwrap().concert.venue, "JIExpo");
    }

    #[tokio::test]
    async fn failed_use_keeps_ticket_unchanged() {
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Err(AuthorityError::Rejected {
                status: Some(409),
                message: Some("Ticket already used".into()),
            }));
        let mut s = session(fake);
        s.submit_code("abc123").await;
        let before = s.ticket().cloned();
        assert!(s.confirm_use().await);

        assert_eq!(s.ticket().cloned(), before);
        assert_eq!(s.ticket().unwrap().status, TicketStatus::Issued);
        assert_eq!(s.error(), Some("Ticket already used"));
        assert!(s.success().is_none());
    }

    #[tokio::test]
    async fn failed_use_without_message_uses_fallback_and_can_retry() {
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Err(AuthorityError::Transport("connection reset".into())))
            .on_use(Ok(None));
        let mut s = session(fake);
        s.submit_code("abc123").await;
        s.confirm_use().await;
        assert_eq!(s.error(), Some("Gagal menggunakan tiket"));
        assert_eq!(s.offer(), Offer::UseTicket);

        assert!(s.confirm_use().await);
        assert_eq!(s.ticket().unwrap().status, TicketStatus::Used);
        assert!(s.error().is_none());
    }

    #[tokio::test]
    async fn not_found_uses_server_message_then_fallback() {
        let fake = FakeAuthority::default()
            .on_resolve(Err(not_found(Some("Ticket not found"))))
            .on_resolve(Err(not_found(None)));
        let mut s = session(fake);

        s.submit_code("nope").await;
        assert_eq!(s.error(), Some("Ticket not found"));
        assert!(s.ticket().is_none());
        assert_eq!(s.code(), "NOPE");

        s.submit_code("nope2").await;
        assert_eq!(s.error(), Some("Tiket tidak ditemukan"));
        assert!(s.ticket().is_none());
    }

    #[tokio::test]
    async fn transport_and_malformed_failures_use_generic_lookup_message() {
        let fake = FakeAuthority::default()
            .on_resolve(Err(AuthorityError::Transport("dns".into())))
            .on_resolve(Err(AuthorityError::Malformed("expected value".into())));
        let mut s = session(fake);
        s.submit_code("abc").await;
        assert_eq!(s.error(), Some("Gagal memvalidasi tiket"));
        s.submit_code("abc").await;
        assert_eq!(s.error(), Some("Gagal memvalidasi tiket"));
    }

    #[tokio::test]
    async fn resubmitting_clears_previous_ticket_and_messages() {
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Ok(None));
        let mut s = session(fake);
        s.submit_code("abc123").await;
        s.confirm_use().await;
        assert!(s.success().is_some());

        s.set_code("def456");
        let pending = s.begin_lookup().unwrap();
        assert!(s.ticket().is_none());
        assert!(s.success().is_none());
        assert_eq!(pending.code(), "DEF456");
    }

    #[tokio::test]
    async fn reset_returns_to_idle_from_any_state() {
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_resolve(Err(not_found(None)));
        let mut s = session(fake);

        s.submit_code("abc123").await;
        s.reset();
        assert_eq!(s.state(), &SessionState::Idle);
        assert_eq!(s.code(), "");

        s.submit_code("x").await;
        assert!(s.error().is_some());
        s.reset();
        assert_eq!(s.state(), &SessionState::Idle);
        assert!(s.error().is_none());
        assert!(s.ticket().is_none());
        assert!(s.success().is_none());
    }

    #[test]
    fn reset_mid_flight_discards_late_result() {
        let mut s = session(FakeAuthority::default());
        s.set_code("abc123");
        let pending = s.begin_lookup().unwrap();
        s.reset();
        assert!(!s.is_busy());

        s.complete_lookup(&pending, Ok(ticket("ABC123", "ISSUED")));
        assert_eq!(s.state(), &SessionState::Idle);
        assert_eq!(s.code(), "");
    }

    #[test]
    fn reset_mid_use_discards_late_result() {
        let mut s = session(FakeAuthority::default());
        s.set_code("abc123");
        let lookup = s.begin_lookup().unwrap();
        s.complete_lookup(&lookup, Ok(ticket("ABC123", "ISSUED")));
        let using = s.begin_use().unwrap();
        assert!(s.is_busy());
        assert_eq!(s.offer(), Offer::Nothing);

        s.reset();
        s.complete_use(&using, Ok(None), now());
        assert_eq!(s.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn reconcile_policy_rereads_ticket_after_use() {
        let mut authoritative = ticket("ABC123", "USED");
        authoritative.used_at = Some(Utc.with_ymd_and_hms(2025, 7, 12, 11, 44, 58).unwrap());
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Ok(None))
            .on_resolve(Ok(authoritative.clone()));
        let mut s = session_with(fake.clone(), UsePolicy::Reconcile);
        s.submit_code("abc123").await;
        s.confirm_use().await;

        assert_eq!(s.ticket(), Some(&authoritative));
        assert_eq!(s.success(), Some("Tiket berhasil digunakan!"));
        assert_eq!(fake.calls().len(), 3);
    }

    #[tokio::test]
    async fn reconcile_policy_prefers_returned_snapshot() {
        let authoritative = ticket("ABC123", "USED");
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Ok(Some(authoritative.clone())));
        let mut s = session_with(fake.clone(), UsePolicy::Reconcile);
        s.submit_code("abc123").await;
        s.confirm_use().await;

        assert_eq!(s.ticket(), Some(&authoritative));
        assert_eq!(fake.calls().len(), 2);
    }

    #[tokio::test]
    async fn reconcile_falls_back_to_local_update_when_reread_fails() {
        let fake = FakeAuthority::default()
            .on_resolve(Ok(ticket("ABC123", "ISSUED")))
            .on_use(Ok(None))
            .on_resolve(Err(AuthorityError::Transport("timeout".into())));
        let mut s = session_with(fake, UsePolicy::Reconcile);
        s.submit_code("abc123").await;
        s.confirm_use().await;

        assert_eq!(s.ticket().unwrap().status, TicketStatus::Used);
        assert_eq!(s.ticket().unwrap().used_at, Some(now()));
        assert!(s.error().is_none());
    }

    #[test]
    fn parses_use_policy() {
        assert_eq!("optimistic".parse::<UsePolicy>().unwrap(), UsePolicy::Optimistic);
        assert_eq!(" Reconcile ".parse::<UsePolicy>().unwrap(), UsePolicy::Reconcile);
        assert!("eventual".parse::<UsePolicy>().is_err());
    }
}
