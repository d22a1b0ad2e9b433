use serde::Deserialize;
use serde_json::json;
use tix_models::{BearerToken, Order};
use tracing::info;

use crate::{ApiClient, ApiError};

const ORDERS_QUERY: &str = "query {
  orders {
    id
    midtransOrderId
    status
    grossAmount
    createdAt
    expiresAt
    user { id name email }
    concert { id title }
    orderItems { id qty unitPrice subtotal ticketType { name } }
    payment { status transactionStatus }
  }
}";

// --- GraphQL response types ---

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct OrdersData {
    orders: Option<Vec<Order>>,
}

impl ApiClient {
    /// All orders, via the admin GraphQL endpoint.
    pub async fn list_orders(&self, token: &BearerToken) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint(&["graphql"])?;
        let req = self.post(url, token).json(&json!({ "query": ORDERS_QUERY }));
        let (status, body) = self.send_raw(req).await?;

        let resp: GraphQlResponse<OrdersData> = serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("HTTP {status}: {e}")))?;

        match resp.data.and_then(|d| d.orders) {
            Some(orders) => {
                info!("Fetched {} orders", orders.len());
                Ok(orders)
            }
            None => Err(ApiError::Rejected {
                status,
                message: resp.errors.into_iter().next().map(|e| e.message),
            }),
        }
    }
}
