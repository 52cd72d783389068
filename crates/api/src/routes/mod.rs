pub mod down_form_orders;
pub mod health;
pub mod receive_orders;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /receive-orders      raw order ingest and reads
/// /down-form-orders    exported rows: listing, bulk mutations, export
/// /templates           resolved template configuration
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/receive-orders", receive_orders::router())
        .nest("/down-form-orders", down_form_orders::router())
        .nest("/templates", templates::router())
}
