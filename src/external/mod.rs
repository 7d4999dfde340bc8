//! Outbound lookups that live beside the task core.
//!
//! Neither collaborator ever returns an error to its caller: network
//! failures, non-success responses and malformed payloads all turn into a
//! fallback value that the views can render.

pub mod inspiration;
pub mod weather;

pub use inspiration::{Quote, QuoteClient};
pub use weather::{Weather, WeatherClient, WeatherReport};

use std::time::Duration;

/// HTTP client shared by the collaborators, bounded by `timeout`.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("taskboard/", env!("CARGO_PKG_VERSION")))
        .build()
}
