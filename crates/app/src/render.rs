//! Terminal rendering in the console's Indonesian locale.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use tix_checkin::{Offer, messages};
use tix_models::{Concert, Order, OverviewStats, Ticket, TicketType};

const DAYS: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];
const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];
const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Rupiah without decimals: `Rp 1.500.000`.
pub fn rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// `Sabtu, 12 Juli 2025 19.00`
pub fn long_datetime(ts: &DateTime<Utc>, tz: Tz) -> String {
    let local = ts.with_timezone(&tz);
    format!(
        "{}, {} {} {} {:02}.{:02}",
        DAYS[local.weekday().num_days_from_monday() as usize],
        local.day(),
        MONTHS[local.month0() as usize],
        local.year(),
        local.hour(),
        local.minute(),
    )
}

/// `12 Jul 2025 19.00`
pub fn short_datetime(ts: &DateTime<Utc>, tz: Tz) -> String {
    let local = ts.with_timezone(&tz);
    format!("{} {:02}.{:02}", short_date(ts, tz), local.hour(), local.minute())
}

/// `12 Jul 2025`
pub fn short_date(ts: &DateTime<Utc>, tz: Tz) -> String {
    let local = ts.with_timezone(&tz);
    format!("{} {} {}", local.day(), MONTHS_SHORT[local.month0() as usize], local.year())
}

pub fn ticket_card(ticket: &Ticket, tz: Tz) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tiket Ditemukan  {}  [{}]", ticket.code, ticket.status);
    let _ = writeln!(out, "  Konser      : {}", ticket.concert.title);
    let _ = writeln!(out, "                {}", ticket.concert.venue);
    let _ = writeln!(out, "                {}", long_datetime(&ticket.concert.start_at, tz));
    let _ = writeln!(
        out,
        "  Tipe        : {} ({})",
        ticket.ticket_type.name,
        rupiah(ticket.ticket_type.price.value())
    );
    let _ = writeln!(out, "  Pemegang    : {} <{}>", ticket.user.name, ticket.user.email);
    let _ = writeln!(out, "  Diterbitkan : {}", long_datetime(&ticket.issued_at, tz));
    if let Some(used_at) = &ticket.used_at {
        let _ = writeln!(out, "  Digunakan   : {}", long_datetime(used_at, tz));
    }
    out
}

/// Everything the check-in screen shows after a step.
pub fn check_in_outcome(
    error: Option<&str>,
    success: Option<&str>,
    ticket: Option<&Ticket>,
    offer: Offer,
    tz: Tz,
) -> String {
    let mut out = String::new();
    if let Some(msg) = error {
        let _ = writeln!(out, "✗ Validasi Gagal: {msg}");
    }
    if let Some(msg) = success {
        let _ = writeln!(out, "✓ {msg}");
    }
    if let Some(ticket) = ticket {
        out.push_str(&ticket_card(ticket, tz));
        match offer {
            Offer::UseTicket => {
                let _ = writeln!(out, "  → [{}]  [{}]", messages::USE_ACTION, messages::RESET_ACTION);
            }
            Offer::AlreadyUsed | Offer::NotValid => {
                let label = offer.label().unwrap_or_default();
                let _ = writeln!(out, "  → {label}  [{}]", messages::RESET_ACTION);
            }
            Offer::Nothing => {}
        }
    }
    out
}

pub fn concert_row(c: &Concert, tz: Tz) -> String {
    format!(
        "{:<26} {:<30} {:<20} {:<12} {:<10} {:>14} {:>11}",
        c.id,
        truncate(&c.title, 30),
        truncate(&c.venue, 20),
        short_date(&c.start_at, tz),
        c.status,
        rupiah(c.lowest_price().value()),
        format!("{}/{}", c.total_sold(), c.total_quota()),
    )
}

/// Dashboard totals followed by the most recent concerts.
pub fn overview(stats: &OverviewStats, recent: &[&Concert], tz: Tz) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total konser     : {}", stats.total_concerts);
    let _ = writeln!(out, "  Published      : {}", stats.published_concerts);
    let _ = writeln!(out, "  Draft          : {}", stats.draft_concerts);
    let _ = writeln!(out, "  Ended          : {}", stats.ended_concerts);
    let _ = writeln!(out, "Tiket terjual    : {}", stats.total_tickets_sold);
    let _ = writeln!(out, "Total pendapatan : {}", rupiah(stats.total_revenue));
    let _ = writeln!(out, "Konser aktif     : {}", stats.published_concerts);
    let _ = writeln!(out);
    let _ = writeln!(out, "Konser Terbaru");
    if recent.is_empty() {
        let _ = writeln!(out, "  Belum ada konser");
    }
    for c in recent {
        let _ = writeln!(
            out,
            "  {:<30} {:<10}  {} • {}",
            truncate(&c.title, 30),
            c.status,
            c.venue,
            short_date(&c.start_at, tz)
        );
    }
    out
}

/// Full view of one order: buyer, items, timestamps and payment state.
pub fn order_detail(order: &Order, tz: Tz) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order ID  : {}", order.midtrans_order_id);
    let _ = writeln!(out, "Status    : {}", order.status);
    let _ = writeln!(out, "Total     : {}", rupiah(order.gross_amount.value()));
    let _ = writeln!(out, "Konser    : {}", order.concert.title);
    let _ = writeln!(out, "Customer  : {}", order.user.name);
    let _ = writeln!(out, "            {}", order.user.email);
    let _ = writeln!(out, "Items");
    for item in &order.order_items {
        let _ = writeln!(
            out,
            "  {} x{:<4} {:>14}",
            item.ticket_type.name,
            item.qty,
            rupiah(item.subtotal.value())
        );
    }
    let _ = writeln!(out, "Dibuat    : {}", long_datetime(&order.created_at, tz));
    let _ = writeln!(out, "Expired   : {}", long_datetime(&order.expires_at, tz));
    if let Some(payment) = &order.payment {
        let _ = writeln!(out, "Payment   : {}", payment.display_status());
    }
    out
}

pub fn saved_concert(concert: Option<&Concert>) -> String {
    match concert {
        Some(c) => format!("Konser tersimpan: {} (id={})", c.title, c.id),
        None => "Konser tersimpan.".to_string(),
    }
}

pub fn saved_ticket_type(tt: Option<&TicketType>) -> String {
    match tt {
        Some(tt) => format!(
            "Tipe tiket tersimpan: {} {} kuota {} (id={})",
            tt.name,
            rupiah(tt.price.value()),
            tt.quota_total,
            tt.id
        ),
        None => "Tipe tiket tersimpan.".to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
