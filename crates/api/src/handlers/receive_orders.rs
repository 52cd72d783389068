//! Handlers for raw order ingest and reads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use oms_core::error::CoreError;
use oms_db::models::receive_order::{CreateReceiveOrder, OrderFilters};
use oms_db::repositories::ReceiveOrderRepo;

use crate::error::{AppError, AppResult};
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for the bulk ingest endpoint.
#[derive(Debug, Deserialize)]
pub struct BulkIngestRequest {
    pub items: Vec<CreateReceiveOrder>,
}

// ---------------------------------------------------------------------------
// POST /receive-orders
// ---------------------------------------------------------------------------

/// Create a single raw order line. A duplicate `idx` is a 409.
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateReceiveOrder>,
) -> AppResult<impl IntoResponse> {
    if input.idx.is_empty() {
        return Err(AppError::BadRequest("idx must not be empty".to_string()));
    }
    let created = ReceiveOrderRepo::create(&state.pool, &input).await?;
    tracing::info!(idx = %created.idx, "Receive order created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// POST /receive-orders/bulk
// ---------------------------------------------------------------------------

/// Bulk-ingest raw order lines. Duplicate `idx` values are skipped and
/// counted in the report, never an error.
pub async fn bulk_ingest(
    State(state): State<AppState>,
    Json(request): Json<BulkIngestRequest>,
) -> AppResult<impl IntoResponse> {
    if request.items.iter().any(|o| o.idx.is_empty()) {
        return Err(AppError::BadRequest("every item needs a non-empty idx".to_string()));
    }
    let report = ReceiveOrderRepo::bulk_insert(&state.pool, &request.items).await?;
    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// PUT /receive-orders/{idx}
// ---------------------------------------------------------------------------

/// Insert-or-update one raw order line keyed on `idx`; a conflicting row is
/// fully replaced.
pub async fn upsert_order(
    State(state): State<AppState>,
    Path(idx): Path<String>,
    Json(input): Json<CreateReceiveOrder>,
) -> AppResult<impl IntoResponse> {
    if input.idx != idx {
        return Err(AppError::BadRequest(format!(
            "body idx '{}' does not match path idx '{idx}'",
            input.idx
        )));
    }
    let stored = ReceiveOrderRepo::upsert(&state.pool, &input).await?;
    tracing::info!(idx = %stored.idx, "Receive order upserted");
    Ok(Json(DataResponse { data: stored }))
}

// ---------------------------------------------------------------------------
// GET /receive-orders
// ---------------------------------------------------------------------------

/// Paginated listing in insertion order.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let items =
        ReceiveOrderRepo::list(&state.pool, params.page_size(), params.offset()).await?;
    tracing::debug!(count = items.len(), "Listed receive orders");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /receive-orders/search
// ---------------------------------------------------------------------------

/// Filtered query over raw order lines. Absent filters impose no constraint.
pub async fn search_orders(
    State(state): State<AppState>,
    Query(filters): Query<OrderFilters>,
) -> AppResult<impl IntoResponse> {
    let items = ReceiveOrderRepo::query(&state.pool, &filters).await?;
    tracing::debug!(count = items.len(), "Searched receive orders");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /receive-orders/by-recipient
// ---------------------------------------------------------------------------

/// Query parameters for the combined-packaging lookup.
#[derive(Debug, Deserialize)]
pub struct RecipientParams {
    pub receive_zipcode: String,
    pub receive_addr: String,
    pub receive_name: String,
    pub mall_user_id: Option<String>,
}

/// Order lines sharing a shipping address, for combined packaging.
pub async fn orders_by_recipient(
    State(state): State<AppState>,
    Query(params): Query<RecipientParams>,
) -> AppResult<impl IntoResponse> {
    let items = ReceiveOrderRepo::find_by_recipient(
        &state.pool,
        &params.receive_zipcode,
        &params.receive_addr,
        &params.receive_name,
        params.mall_user_id.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /receive-orders/{idx}
// ---------------------------------------------------------------------------

/// Fetch one raw order line by its upstream idx.
pub async fn get_order(
    State(state): State<AppState>,
    Path(idx): Path<String>,
) -> AppResult<impl IntoResponse> {
    let order = ReceiveOrderRepo::find_by_idx(&state.pool, &idx)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ReceiveOrder",
                key: idx,
            })
        })?;
    Ok(Json(DataResponse { data: order }))
}
