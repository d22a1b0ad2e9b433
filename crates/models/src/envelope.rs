use serde::{Deserialize, Serialize};

/// Response envelope used by every REST endpoint of the console API.
///
/// `data` and `message` are optional; a missing field reads as `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}
