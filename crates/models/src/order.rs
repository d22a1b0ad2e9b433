use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    AwaitingPayment,
    Paid,
    Cancelled,
    Expired,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::AwaitingPayment => "AWAITING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub midtrans_order_id: String,
    pub status: OrderStatus,
    pub gross_amount: Amount,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub user: OrderBuyer,
    pub concert: OrderConcert,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub payment: Option<PaymentInfo>,
}

impl Order {
    /// Matches either the internal id or the payment gateway order id.
    pub fn has_id(&self, id: &str) -> bool {
        let id = id.trim();
        self.id == id || self.midtrans_order_id.eq_ignore_ascii_case(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBuyer {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConcert {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub qty: u32,
    pub unit_price: Amount,
    pub subtotal: Amount,
    pub ticket_type: OrderItemType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub status: String,
    #[serde(default)]
    pub transaction_status: Option<String>,
}

impl PaymentInfo {
    /// Gateway transaction status when reported, else the payment status.
    pub fn display_status(&self) -> &str {
        self.transaction_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.status)
    }
}

/// Client-side filter for the orders listing.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Case-insensitive substring match over order id, buyer and concert,
    /// combined with an exact status match.
    pub fn matches(&self, order: &Order) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                [
                    &order.midtrans_order_id,
                    &order.user.name,
                    &order.user.email,
                    &order.concert.title,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
            }
        };

        let matches_status = self.status.is_none_or(|s| s == order.status);

        matches_search && matches_status
    }

    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, status: &str, buyer: &str, concert: &str) -> Order {
        order_with_payment(id, status, buyer, concert, "null")
    }

    fn order_with_payment(id: &str, status: &str, buyer: &str, concert: &str, payment: &str) -> Order {
        let json = format!(
            r#"{{"id":"o-{id}","midtransOrderId":"{id}","status":"{status}","grossAmount":"300000",
                 "createdAt":"2025-06-01T00:00:00Z","expiresAt":"2025-06-01T01:00:00Z",
                 "user":{{"id":"u1","name":"{buyer}","email":"{buyer}@mail.id"}},
                 "concert":{{"id":"c1","title":"{concert}"}},
                 "orderItems":[{{"id":"i1","qty":2,"unitPrice":"150000","subtotal":"300000","ticketType":{{"name":"CAT 1"}}}}],
                 "payment":{payment}}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let orders = vec![order("ORD-1", "PAID", "budi", "Java Jazz")];
        assert_eq!(OrderFilter::default().apply(&orders).len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let orders = vec![
            order("ORD-1", "PAID", "budi", "Java Jazz"),
            order("ORD-2", "PENDING", "ani", "Synchronize Fest"),
        ];
        let by_concert = OrderFilter { search: Some("java".into()), status: None };
        let by_email = OrderFilter { search: Some("ANI@MAIL".into()), status: None };
        let by_id = OrderFilter { search: Some("ord-2".into()), status: None };
        assert_eq!(by_concert.apply(&orders)[0].midtrans_order_id, "ORD-1");
        assert_eq!(by_email.apply(&orders)[0].midtrans_order_id, "ORD-2");
        assert_eq!(by_id.apply(&orders).len(), 1);
    }

    #[test]
    fn status_filter_is_exact() {
        let orders = vec![
            order("ORD-1", "PAID", "budi", "Java Jazz"),
            order("ORD-2", "AWAITING_PAYMENT", "ani", "Java Jazz"),
        ];
        let filter = OrderFilter {
            search: Some("jazz".into()),
            status: Some(OrderStatus::AwaitingPayment),
        };
        let hits = filter.apply(&orders);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].status, OrderStatus::AwaitingPayment);
    }

    #[test]
    fn payment_without_transaction_status_still_parses() {
        let o = order_with_payment(
            "ORD-3",
            "AWAITING_PAYMENT",
            "budi",
            "Java Jazz",
            r#"{"status":"PENDING","transactionStatus":null}"#,
        );
        let payment = o.payment.unwrap();
        assert_eq!(payment.transaction_status, None);
        assert_eq!(payment.display_status(), "PENDING");

        let missing = order_with_payment("ORD-4", "PENDING", "ani", "Java Jazz", r#"{"status":"PENDING"}"#);
        assert_eq!(missing.payment.unwrap().display_status(), "PENDING");
    }

    #[test]
    fn transaction_status_wins_when_present() {
        let o = order_with_payment(
            "ORD-5",
            "PAID",
            "budi",
            "Java Jazz",
            r#"{"status":"SUCCESS","transactionStatus":"settlement"}"#,
        );
        assert_eq!(o.payment.unwrap().display_status(), "settlement");
    }

    #[test]
    fn finds_order_by_either_id() {
        let o = order("ORD-7", "PAID", "budi", "Java Jazz");
        assert!(o.has_id("o-ORD-7"));
        assert!(o.has_id("ord-7"));
        assert!(!o.has_id("ORD-8"));
    }
}
