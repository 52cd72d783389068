//! Handlers for exported ("down-form") order rows: paginated listing, bulk
//! mutations, and the template-shaped export read.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use oms_core::error::CoreError;
use oms_core::export::project_rows;
use oms_core::types::DbId;
use oms_db::models::down_form_order::{
    CreateDownFormOrder, TemplateScope, UpdateDownFormOrder,
};
use oms_db::repositories::{DownFormOrderRepo, TemplateRepo};

use crate::error::{AppError, AppResult};
use crate::query::PageParams;
use crate::response::{BulkResponse, DataResponse, PageResponse, RowResult};
use crate::state::AppState;

/// Query parameters for the listing endpoint. `template_code` accepts the
/// sentinels `all` (every row) and `""` (untemplated rows).
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub template_code: Option<String>,
}

impl ListParams {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub items: Vec<CreateDownFormOrder>,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub items: Vec<UpdateDownFormOrder>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// GET /down-form-orders
// ---------------------------------------------------------------------------

/// Paginated listing in insertion order, scoped by the template sentinel.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let scope = TemplateScope::from_param(params.template_code.as_deref());
    let page = params.page_params();
    let (items, total) =
        DownFormOrderRepo::list_paginated(&state.pool, &scope, page.page_size(), page.offset())
            .await?;
    tracing::debug!(count = items.len(), total, "Listed down-form orders");
    Ok(Json(PageResponse {
        total,
        page: page.page(),
        page_size: page.page_size(),
        items,
    }))
}

// ---------------------------------------------------------------------------
// POST /down-form-orders/bulk
// ---------------------------------------------------------------------------

/// Bulk-create exported rows. One atomic statement; every item in a
/// successful response is marked success.
pub async fn bulk_create(
    State(state): State<AppState>,
    Json(request): Json<BulkCreateRequest>,
) -> AppResult<impl IntoResponse> {
    let ids = DownFormOrderRepo::bulk_create(&state.pool, &request.items).await?;
    let results = ids.into_iter().map(|id| RowResult::success(vec![id])).collect();
    Ok((StatusCode::CREATED, Json(BulkResponse { results })))
}

// ---------------------------------------------------------------------------
// PUT /down-form-orders/bulk
// ---------------------------------------------------------------------------

/// Bulk-update exported rows in one transaction.
pub async fn bulk_update(
    State(state): State<AppState>,
    Json(request): Json<BulkUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    DownFormOrderRepo::bulk_update(&state.pool, &request.items).await?;
    let results = request
        .items
        .iter()
        .map(|item| RowResult::success(vec![item.id]))
        .collect();
    Ok(Json(BulkResponse { results }))
}

// ---------------------------------------------------------------------------
// DELETE /down-form-orders/bulk
// ---------------------------------------------------------------------------

/// Bulk-delete exported rows by id.
pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(request): Json<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    DownFormOrderRepo::bulk_delete(&state.pool, &request.ids).await?;
    let results = request
        .ids
        .iter()
        .map(|id| RowResult::success(vec![*id]))
        .collect();
    Ok(Json(BulkResponse { results }))
}

// ---------------------------------------------------------------------------
// GET /down-form-orders/export
// ---------------------------------------------------------------------------

/// Query parameters for the export read.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub template_code: String,
}

/// Export payload: the resolved template identity plus rows shaped to its
/// column contract, newest first.
#[derive(Debug, Serialize)]
pub struct ExportPayload {
    pub template_code: String,
    pub template_name: String,
    pub is_aggregated: bool,
    pub group_by_fields: Vec<String>,
    pub items: Vec<IndexMap<String, Value>>,
}

/// Shape exported rows through the resolved template for `template_code`.
///
/// An unknown code falls back to the default template's contract; rows are
/// still filtered by the requested code.
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<impl IntoResponse> {
    let resolved = TemplateRepo::resolve(&state.pool, &params.template_code).await?;
    let page = PageParams {
        page: params.page,
        page_size: params.page_size,
    };
    let rows = DownFormOrderRepo::fetch_for_template(
        &state.pool,
        &params.template_code,
        page.page_size(),
        page.offset(),
    )
    .await?;

    let records: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            serde_json::to_value(row)
                .map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))
        })
        .collect::<Result<_, _>>()?;
    let items = project_rows(&resolved, &records);

    tracing::debug!(
        template_code = %params.template_code,
        count = items.len(),
        "Exported down-form orders"
    );
    Ok(Json(DataResponse {
        data: ExportPayload {
            template_code: resolved.template_code,
            template_name: resolved.template_name,
            is_aggregated: resolved.is_aggregated,
            group_by_fields: resolved.group_by_fields,
            items,
        },
    }))
}
