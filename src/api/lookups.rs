//! Inspiration and weather pages. Neither touches the task store.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::external::inspiration;
use crate::util::internal_error;

use super::routes::AppState;

/// Create the lookup routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inspiration", get(inspiration_page))
        .route("/weather", get(weather_page))
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// GET /inspiration
async fn inspiration_page(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let quote = state.quotes.random_quote().await;
    let tip = inspiration::random_tip();
    let body = state
        .views
        .inspiration(&quote, tip)
        .map_err(internal_error)?;
    Ok(Html(body))
}

/// GET /weather?city=<name>
async fn weather_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let report = match city {
        Some(city) => Some(state.weather.lookup(city).await),
        None => None,
    };
    let body = state
        .views
        .weather(city, report.as_ref())
        .map_err(internal_error)?;
    Ok(Html(body))
}
