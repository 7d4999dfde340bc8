//! API request and response types.

use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether tasks survive a restart
    pub persistent_store: bool,
    /// Whether a weather API key is configured
    pub weather_enabled: bool,
}
