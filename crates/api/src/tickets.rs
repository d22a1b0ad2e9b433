use tix_checkin::{AuthorityError, TicketAuthority};
use tix_models::{BearerToken, Ticket};
use tracing::info;

use crate::client::require_data;
use crate::{ApiClient, ApiError};

impl ApiClient {
    /// `GET /tickets/{code}/validate`. Read-only.
    pub async fn validate_ticket(&self, token: &BearerToken, code: &str) -> Result<Ticket, ApiError> {
        info!("Validating ticket {code}");
        let url = self.endpoint(&["tickets", code, "validate"])?;
        let data = self.send_envelope::<Ticket>(self.get(url, token)).await?;
        require_data(data, "ticket")
    }

    /// `PUT /tickets/{code}/use`. Returns the updated ticket when the API sends it.
    pub async fn use_ticket(&self, token: &BearerToken, code: &str) -> Result<Option<Ticket>, ApiError> {
        info!("Marking ticket {code} as used");
        let url = self.endpoint(&["tickets", code, "use"])?;
        let data = self
            .send_envelope::<serde_json::Value>(self.put(url, token))
            .await?;
        // Some deployments return only a receipt; treat anything that is not
        // a full ticket as "no snapshot".
        Ok(data.and_then(|v| serde_json::from_value::<Ticket>(v).ok()))
    }
}

impl TicketAuthority for ApiClient {
    async fn resolve(&self, token: &BearerToken, code: &str) -> Result<Ticket, AuthorityError> {
        Ok(self.validate_ticket(token, code).await?)
    }

    async fn mark_used(&self, token: &BearerToken, code: &str) -> Result<Option<Ticket>, AuthorityError> {
        Ok(self.use_ticket(token, code).await?)
    }
}
