//! Route definitions for raw order ingest.
//!
//! ```text
//! GET    /                list_orders
//! POST   /                create_order
//! POST   /bulk            bulk_ingest
//! GET    /search          search_orders
//! GET    /by-recipient    orders_by_recipient
//! GET    /{idx}           get_order
//! PUT    /{idx}           upsert_order
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::receive_orders;
use crate::state::AppState;

/// Raw order routes — mounted at `/receive-orders`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(receive_orders::list_orders).post(receive_orders::create_order),
        )
        .route("/bulk", post(receive_orders::bulk_ingest))
        .route("/search", get(receive_orders::search_orders))
        .route("/by-recipient", get(receive_orders::orders_by_recipient))
        .route(
            "/{idx}",
            get(receive_orders::get_order).put(receive_orders::upsert_order),
        )
}
