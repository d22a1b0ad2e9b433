use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tix_models::{BearerToken, Concert, ConcertStatus, TicketType};
use tracing::info;

use crate::client::require_data;
use crate::{ApiClient, ApiError};

pub const DEFAULT_LIST_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct ConcertQuery {
    pub search: Option<String>,
    pub status: Option<ConcertStatus>,
    pub limit: u32,
}

impl Default for ConcertQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Fields of the concert create/edit form, sent as multipart.
#[derive(Debug, Clone)]
pub struct ConcertForm {
    pub title: String,
    pub venue: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub description: String,
    pub status: ConcertStatus,
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTypeForm {
    pub name: String,
    pub price: f64,
    pub quota_total: u32,
    pub sales_start_at: DateTime<Utc>,
    pub sales_end_at: DateTime<Utc>,
}

impl ApiClient {
    pub async fn list_concerts(&self, token: &BearerToken, query: &ConcertQuery) -> Result<Vec<Concert>, ApiError> {
        let mut url = self.endpoint(&["concerts"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("search", search);
            }
            if let Some(status) = query.status {
                pairs.append_pair("status", status.as_str());
            }
        }
        let concerts = self
            .send_envelope::<Vec<Concert>>(self.get(url, token))
            .await?
            .unwrap_or_default();
        info!("Fetched {} concerts", concerts.len());
        Ok(concerts)
    }

    pub async fn get_concert(&self, token: &BearerToken, id: &str) -> Result<Concert, ApiError> {
        let url = self.endpoint(&["concerts", id])?;
        let data = self.send_envelope::<Concert>(self.get(url, token)).await?;
        require_data(data, "concert")
    }

    /// `POST /concerts`. The saved concert is returned when the API echoes it.
    pub async fn create_concert(&self, token: &BearerToken, form: &ConcertForm) -> Result<Option<Concert>, ApiError> {
        info!("Creating concert {:?}", form.title);
        let url = self.endpoint(&["concerts"])?;
        let body = concert_multipart(form).await?;
        self.send_envelope::<Concert>(self.post(url, token).multipart(body)).await
    }

    pub async fn update_concert(
        &self,
        token: &BearerToken,
        id: &str,
        form: &ConcertForm,
    ) -> Result<Option<Concert>, ApiError> {
        info!("Updating concert {id}");
        let url = self.endpoint(&["concerts", id])?;
        let body = concert_multipart(form).await?;
        self.send_envelope::<Concert>(self.put(url, token).multipart(body)).await
    }

    pub async fn publish_concert(&self, token: &BearerToken, id: &str) -> Result<(), ApiError> {
        info!("Publishing concert {id}");
        let url = self.endpoint(&["concerts", id, "publish"])?;
        self.send_envelope::<serde_json::Value>(self.put(url, token)).await?;
        Ok(())
    }

    pub async fn delete_concert(&self, token: &BearerToken, id: &str) -> Result<(), ApiError> {
        info!("Deleting concert {id}");
        let url = self.endpoint(&["concerts", id])?;
        self.send_envelope::<serde_json::Value>(self.delete(url, token)).await?;
        Ok(())
    }

    // --- Ticket types ---

    pub async fn create_ticket_type(
        &self,
        token: &BearerToken,
        concert_id: &str,
        form: &TicketTypeForm,
    ) -> Result<Option<TicketType>, ApiError> {
        info!("Adding ticket type {:?} to concert {concert_id}", form.name);
        let url = self.endpoint(&["concerts", concert_id, "ticket-types"])?;
        self.send_envelope::<TicketType>(self.post(url, token).json(form)).await
    }

    pub async fn update_ticket_type(
        &self,
        token: &BearerToken,
        concert_id: &str,
        ticket_type_id: &str,
        form: &TicketTypeForm,
    ) -> Result<Option<TicketType>, ApiError> {
        info!("Updating ticket type {ticket_type_id} of concert {concert_id}");
        let url = self.endpoint(&["concerts", concert_id, "ticket-types", ticket_type_id])?;
        self.send_envelope::<TicketType>(self.put(url, token).json(form)).await
    }

    pub async fn delete_ticket_type(
        &self,
        token: &BearerToken,
        concert_id: &str,
        ticket_type_id: &str,
    ) -> Result<(), ApiError> {
        info!("Deleting ticket type {ticket_type_id} of concert {concert_id}");
        let url = self.endpoint(&["concerts", concert_id, "ticket-types", ticket_type_id])?;
        self.send_envelope::<serde_json::Value>(self.delete(url, token)).await?;
        Ok(())
    }
}

fn iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn concert_multipart(form: &ConcertForm) -> Result<Form, ApiError> {
    let mut body = Form::new()
        .text("title", form.title.clone())
        .text("venue", form.venue.clone())
        .text("startAt", iso(&form.start_at))
        .text("endAt", iso(&form.end_at))
        .text("description", form.description.clone())
        .text("status", form.status.as_str());

    if let Some(path) = &form.image {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(path))
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        body = body.part("image", part);
    }

    Ok(body)
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
