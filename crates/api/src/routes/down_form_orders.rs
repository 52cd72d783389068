//! Route definitions for exported order rows.
//!
//! ```text
//! GET    /          list (paginated, template sentinel)
//! GET    /export    export (template-shaped, newest first)
//! POST   /bulk      bulk_create
//! PUT    /bulk      bulk_update
//! DELETE /bulk      bulk_delete
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::down_form_orders;
use crate::state::AppState;

/// Exported order routes — mounted at `/down-form-orders`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(down_form_orders::list))
        .route("/export", get(down_form_orders::export))
        .route(
            "/bulk",
            post(down_form_orders::bulk_create)
                .put(down_form_orders::bulk_update)
                .delete(down_form_orders::bulk_delete),
        )
}
