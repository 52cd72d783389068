//! Route definitions for template configuration.
//!
//! ```text
//! GET /{code}/config    get_template_config
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template routes — mounted at `/templates`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{code}/config", get(templates::get_template_config))
}
