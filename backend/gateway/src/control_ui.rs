//! Frontend hosting: the index page and the static asset directory.

use std::path::Path;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::server::GatewayState;

const INDEX_FILE: &str = "index.html";

const MISSING_INDEX_PAGE: &str =
    "<html><body>Error: index.html not found.</body></html>";

/// Service serving files below `dir`; mounted under the static prefix.
pub fn static_service(dir: &Path) -> ServeDir {
    ServeDir::new(dir)
}

/// `GET /`: the frontend's `index.html`.
pub async fn serve_home(State(state): State<GatewayState>) -> Response {
    let path = state.config.server.static_dir.join(INDEX_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "index.html not found");
            (StatusCode::NOT_FOUND, Html(MISSING_INDEX_PAGE)).into_response()
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read index.html");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(MISSING_INDEX_PAGE)).into_response()
        }
    }
}
