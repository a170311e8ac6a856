//! Fortunes page

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::access::collect;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::render::fortunes_html;

const HTML_UTF8: &str = "text/html;charset=utf-8";

/// GET /fortunes - every fortune plus the request-time one, sorted
async fn fortunes(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let fortunes = {
        let conn = state.pool.acquire().await?;
        collect(&*conn).await?
    };
    Ok(([(header::CONTENT_TYPE, HTML_UTF8)], fortunes_html(&fortunes)))
}

/// Fortune routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/fortunes", get(fortunes))
}
