use crate::config::ServerConfig;
use crate::error::ScrapeError;
use crate::loaders::ScraperType;
use crate::results::{ErrorBody, ScrapeResponse};
use crate::Scraper;
use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use url::form_urlencoded;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<Scraper>,
}

/// Query parameters of `GET /api`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrapeQuery {
    pub url: Option<String>,
    pub strict: Option<String>,
    pub kind: Option<String>,
}

impl ScrapeQuery {
    /// Decode a raw query string, keeping the first value of each parameter
    ///
    /// Decoding is lossy and never fails, so a malformed query still reaches
    /// the handler and gets a JSON error body.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match &*key {
                "url" => &mut query.url,
                "strict" => &mut query.strict,
                "type" => &mut query.kind,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        // The cause is logged here and never sent to the caller
        if self.is_client_error() {
            ::log::warn!("Rejected scrape request: {}", self);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new("Missing url parameter")),
            )
                .into_response();
        }

        ::log::error!("Scrape failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("An error occurred")),
        )
            .into_response()
    }
}

/// GET /api
pub async fn handle_scrape(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ScrapeResponse>, ScrapeError> {
    let query = ScrapeQuery::from_query(raw.as_deref());
    let url = query
        .url
        .filter(|url| !url.is_empty())
        .ok_or(ScrapeError::MissingUrl)?;
    let strict = query.strict.as_deref() == Some("true");
    let kind = ScraperType::from_param(query.kind.as_deref());

    let response = state.scraper.scrape(&url, strict, kind).await?;
    Ok(Json(response))
}

/// Build the router serving `GET /api`
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handle_scrape))
        .with_state(state)
}

/// Run the HTTP server until it fails
pub async fn serve(config: &ServerConfig) -> Result<(), ScrapeError> {
    let scraper = Arc::new(Scraper::from_config(config)?);
    let listener = TcpListener::bind(&config.bind_address).await?;
    ::log::info!("Listening on {}", listener.local_addr()?);
    ::log::info!("  GET /api?url=<url>&strict=<true|false>&type=<fetch|browser>");

    axum::serve(listener, build_app(AppState { scraper })).await?;
    Ok(())
}
