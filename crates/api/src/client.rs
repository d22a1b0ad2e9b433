use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tix_models::{ApiResponse, BearerToken};
use tracing::debug;

use crate::ApiError;

/// Client for the concert console REST/GraphQL API.
///
/// Holds no credentials; every call takes the operator's token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::Url(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{base_url}: not a base URL")));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // --- Crate-internal request helpers ---

    /// Build a URL under the base path. Each segment is percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(&self, url: Url, token: &BearerToken) -> RequestBuilder {
        self.authorized(self.http.get(url), token)
    }

    pub(crate) fn post(&self, url: Url, token: &BearerToken) -> RequestBuilder {
        self.authorized(self.http.post(url), token)
    }

    pub(crate) fn put(&self, url: Url, token: &BearerToken) -> RequestBuilder {
        self.authorized(self.http.put(url), token)
    }

    pub(crate) fn delete(&self, url: Url, token: &BearerToken) -> RequestBuilder {
        self.authorized(self.http.delete(url), token)
    }

    fn authorized(&self, req: RequestBuilder, token: &BearerToken) -> RequestBuilder {
        req.header(reqwest::header::AUTHORIZATION, token.header_value())
    }

    /// Send a request and unwrap the `{success, data, message}` envelope.
    ///
    /// The envelope is read regardless of HTTP status; only `success`
    /// decides between data and rejection.
    pub(crate) async fn send_envelope<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let (status, body) = self.send_raw(req).await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("HTTP {status}: {e}")))?;

        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(ApiError::Rejected {
                status,
                message: envelope.message,
            })
        }
    }

    pub(crate) async fn send_raw(&self, req: RequestBuilder) -> Result<(u16, String), ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        debug!(status, url = %resp.url(), "API response");
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok((status, body))
    }
}

pub(crate) fn require_data<T>(data: Option<T>, what: &str) -> Result<T, ApiError> {
    data.ok_or_else(|| ApiError::Malformed(format!("response has no {what}")))
}
