//! Concert, ticket-type and order management commands.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tix_api::{ApiClient, ConcertForm, ConcertQuery, TicketTypeForm};
use tix_models::{BearerToken, ConcertStatus, OrderFilter, OrderStatus, OverviewStats, recent_concerts};
use tracing::info;

use crate::prompt::{confirm, stdin_lines};
use crate::render;

/// Concerts listed under "Konser Terbaru" on the overview.
const RECENT_CONCERTS: usize = 5;

/// Accepts RFC 3339, or a wall-clock `YYYY-MM-DDTHH:MM` / `YYYY-MM-DD HH:MM`
/// interpreted in `tz`.
pub fn parse_datetime(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| anyhow!("invalid date/time `{input}` (expected e.g. 2025-07-12T19:00)"))?;
    tz.from_local_datetime(&naive)
        .single()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("`{input}` is ambiguous or does not exist in {tz}"))
}

async fn confirm_delete(what: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    confirm(&mut stdin_lines(), &format!("Yakin ingin menghapus {what}? [y/N]: ")).await
}

// --- Overview ---

pub async fn overview(client: &ApiClient, token: &BearerToken, tz: Tz) -> Result<()> {
    let concerts = client.list_concerts(token, &ConcertQuery::default()).await?;
    let stats = OverviewStats::from_concerts(&concerts);
    let recent = recent_concerts(&concerts, RECENT_CONCERTS);
    print!("{}", render::overview(&stats, &recent, tz));
    Ok(())
}

// --- Concerts ---

pub async fn list_concerts(
    client: &ApiClient,
    token: &BearerToken,
    tz: Tz,
    search: Option<String>,
    status: Option<ConcertStatus>,
) -> Result<()> {
    let query = ConcertQuery {
        search,
        status,
        ..Default::default()
    };
    let concerts = client.list_concerts(token, &query).await?;
    if concerts.is_empty() {
        println!("Belum ada konser.");
        return Ok(());
    }
    println!(
        "{:<26} {:<30} {:<20} {:<12} {:<10} {:>14} {:>11}",
        "ID", "Judul", "Venue", "Tanggal", "Status", "Mulai dari", "Terjual"
    );
    println!("{}", "-".repeat(130));
    for c in &concerts {
        println!("{}", render::concert_row(c, tz));
    }
    println!("\n{} konser", concerts.len());
    Ok(())
}

pub async fn show_concert(client: &ApiClient, token: &BearerToken, tz: Tz, id: &str) -> Result<()> {
    let c = client.get_concert(token, id).await?;
    println!("{} [{}]", c.title, c.status);
    println!("  Venue   : {}", c.venue);
    println!("  Mulai   : {}", render::long_datetime(&c.start_at, tz));
    if let Some(end) = &c.end_at {
        println!("  Selesai : {}", render::long_datetime(end, tz));
    }
    if let Some(desc) = c.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  {desc}");
    }
    println!();
    if c.ticket_types.is_empty() {
        println!("Belum ada tipe tiket.");
        return Ok(());
    }
    println!(
        "{:<26} {:<20} {:>14} {:>11} {:<18} {}",
        "ID", "Tipe", "Harga", "Terjual", "Penjualan mulai", "Penjualan selesai"
    );
    println!("{}", "-".repeat(110));
    for tt in &c.ticket_types {
        let window = |ts: &Option<DateTime<Utc>>| {
            ts.as_ref()
                .map(|t| render::short_datetime(t, tz))
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{:<26} {:<20} {:>14} {:>11} {:<18} {}",
            tt.id,
            render::truncate(&tt.name, 20),
            render::rupiah(tt.price.value()),
            format!("{}/{}", tt.quota_sold, tt.quota_total),
            window(&tt.sales_start_at),
            window(&tt.sales_end_at),
        );
    }
    Ok(())
}

pub struct ConcertArgs {
    pub title: String,
    pub venue: String,
    pub start_at: String,
    pub end_at: String,
    pub description: Option<String>,
    pub status: ConcertStatus,
    pub image: Option<PathBuf>,
}

impl ConcertArgs {
    fn into_form(self, tz: Tz) -> Result<ConcertForm> {
        let start_at = parse_datetime(&self.start_at, tz).context("--start-at")?;
        let end_at = parse_datetime(&self.end_at, tz).context("--end-at")?;
        if end_at < start_at {
            bail!("--end-at must not be before --start-at");
        }
        Ok(ConcertForm {
            title: self.title,
            venue: self.venue,
            start_at,
            end_at,
            description: self.description.unwrap_or_default(),
            status: self.status,
            image: self.image,
        })
    }
}

pub async fn save_concert(
    client: &ApiClient,
    token: &BearerToken,
    tz: Tz,
    id: Option<&str>,
    args: ConcertArgs,
) -> Result<()> {
    let form = args.into_form(tz)?;
    let concert = match id {
        Some(id) => client.update_concert(token, id, &form).await?,
        None => client.create_concert(token, &form).await?,
    };
    println!("{}", render::saved_concert(concert.as_ref()));
    Ok(())
}

pub async fn publish_concert(client: &ApiClient, token: &BearerToken, id: &str) -> Result<()> {
    client.publish_concert(token, id).await?;
    println!("Konser {id} dipublikasikan.");
    Ok(())
}

pub async fn delete_concert(client: &ApiClient, token: &BearerToken, id: &str, yes: bool) -> Result<()> {
    if !confirm_delete("konser ini", yes).await? {
        println!("Dibatalkan.");
        return Ok(());
    }
    client.delete_concert(token, id).await?;
    println!("Konser {id} dihapus.");
    Ok(())
}

// --- Ticket types ---

pub struct TicketTypeArgs {
    pub name: String,
    pub price: f64,
    pub quota: u32,
    pub sales_start: String,
    pub sales_end: String,
}

impl TicketTypeArgs {
    fn into_form(self, tz: Tz) -> Result<TicketTypeForm> {
        if self.price < 0.0 {
            bail!("--price must not be negative");
        }
        let sales_start_at = parse_datetime(&self.sales_start, tz).context("--sales-start")?;
        let sales_end_at = parse_datetime(&self.sales_end, tz).context("--sales-end")?;
        if sales_end_at < sales_start_at {
            bail!("--sales-end must not be before --sales-start");
        }
        Ok(TicketTypeForm {
            name: self.name,
            price: self.price,
            quota_total: self.quota,
            sales_start_at,
            sales_end_at,
        })
    }
}

pub async fn save_ticket_type(
    client: &ApiClient,
    token: &BearerToken,
    tz: Tz,
    concert_id: &str,
    ticket_type_id: Option<&str>,
    args: TicketTypeArgs,
) -> Result<()> {
    let form = args.into_form(tz)?;
    let tt = match ticket_type_id {
        Some(tt_id) => client.update_ticket_type(token, concert_id, tt_id, &form).await?,
        None => client.create_ticket_type(token, concert_id, &form).await?,
    };
    println!("{}", render::saved_ticket_type(tt.as_ref()));
    Ok(())
}

pub async fn delete_ticket_type(
    client: &ApiClient,
    token: &BearerToken,
    concert_id: &str,
    ticket_type_id: &str,
    yes: bool,
) -> Result<()> {
    if !confirm_delete("tipe tiket ini", yes).await? {
        println!("Dibatalkan.");
        return Ok(());
    }
    client.delete_ticket_type(token, concert_id, ticket_type_id).await?;
    println!("Tipe tiket {ticket_type_id} dihapus.");
    Ok(())
}

// --- Orders ---

pub async fn list_orders(
    client: &ApiClient,
    token: &BearerToken,
    tz: Tz,
    search: Option<String>,
    status: Option<OrderStatus>,
) -> Result<()> {
    let orders = client.list_orders(token).await?;
    let filter = OrderFilter { search, status };
    let shown = filter.apply(&orders);
    info!("{} of {} orders match", shown.len(), orders.len());

    if shown.is_empty() {
        println!("Tidak ada pesanan.");
        return Ok(());
    }
    println!(
        "{:<24} {:<22} {:<28} {:<17} {:>14} {}",
        "Order", "Pembeli", "Konser", "Status", "Total", "Dibuat"
    );
    println!("{}", "-".repeat(125));
    for o in &shown {
        println!(
            "{:<24} {:<22} {:<28} {:<17} {:>14} {}",
            o.midtrans_order_id,
            render::truncate(&o.user.name, 22),
            render::truncate(&o.concert.title, 28),
            o.status,
            render::rupiah(o.gross_amount.value()),
            render::short_datetime(&o.created_at, tz),
        );
        for item in &o.order_items {
            println!(
                "    {} × {} @ {} = {}",
                item.qty,
                item.ticket_type.name,
                render::rupiah(item.unit_price.value()),
                render::rupiah(item.subtotal.value()),
            );
        }
    }
    println!("\n{} pesanan", shown.len());
    Ok(())
}

pub async fn show_order(client: &ApiClient, token: &BearerToken, tz: Tz, id: &str) -> Result<()> {
    let orders = client.list_orders(token).await?;
    let order = orders
        .iter()
        .find(|o| o.has_id(id))
        .ok_or_else(|| anyhow!("order `{id}` not found"))?;
    print!("{}", render::order_detail(order, tz));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wall_clock_in_configured_zone() {
        let ts = parse_datetime("2025-07-12T19:00", chrono_tz::Asia::Jakarta).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 7, 12, 12, 0, 0).unwrap());
        let spaced = parse_datetime("2025-07-12 19:00", chrono_tz::Asia::Jakarta).unwrap();
        assert_eq!(spaced, ts);
    }

    #[test]
    fn rfc3339_ignores_configured_zone() {
        let ts = parse_datetime("2025-07-12T12:00:00Z", chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 7, 12, 12, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_datetime("besok malam", chrono_tz::UTC).is_err());
    }

    #[test]
    fn concert_form_requires_ordered_dates() {
        let args = ConcertArgs {
            title: "Java Jazz".into(),
            venue: "JIExpo".into(),
            start_at: "2025-07-12T19:00".into(),
            end_at: "2025-07-12T18:00".into(),
            description: None,
            status: ConcertStatus::Draft,
            image: None,
        };
        assert!(args.into_form(chrono_tz::Asia::Jakarta).is_err());
    }

    #[test]
    fn ticket_type_form_converts_sales_window() {
        let args = TicketTypeArgs {
            name: "Festival".into(),
            price: 350_000.0,
            quota: 500,
            sales_start: "2025-05-01T00:00".into(),
            sales_end: "2025-07-11T23:59".into(),
        };
        let form = args.into_form(chrono_tz::Asia::Jakarta).unwrap();
        assert_eq!(form.sales_start_at, Utc.with_ymd_and_hms(2025, 4, 30, 17, 0, 0).unwrap());
        assert_eq!(form.quota_total, 500);
    }
}
