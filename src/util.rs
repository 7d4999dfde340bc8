//! Shared utility functions used across the codebase.

use axum::http::StatusCode;

/// Read an environment variable, treating unset and blank values alike.
pub fn env_var_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read an environment variable or fall back to `default`.
pub fn env_var_or(name: &str, default: &str) -> String {
    env_var_nonempty(name).unwrap_or_else(|| default.to_string())
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Map any displayable error to a 500 response, logging it on the way.
pub fn internal_error<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
