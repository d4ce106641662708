//! Marketing site hosting.
//!
//! The site itself is a prebuilt single-page bundle. When a bundle directory
//! is configured, unknown paths are served from it and fall back to
//! `index.html` so client-side routes (`/modules/tracking`, ...) resolve.
//! Without one, unknown paths get a JSON 404.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Install the fallback for paths no API route matched.
pub fn with_fallback(
    router: Router<Arc<AppState>>,
    static_dir: Option<&Path>,
) -> Router<Arc<AppState>> {
    match static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving static site");
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            router.fallback_service(spa)
        }
        None => router.fallback(not_found),
    }
}

async fn not_found() -> AppError {
    AppError::NotFound
}
