//! Browser upload form
//!
//! - GET / - HTML form posting to `/upload`
//! - GET /static/script.js - form submission and download

use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/static/script.js", get(script))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}
