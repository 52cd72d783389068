//! Handlers for export template configuration.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use oms_db::repositories::TemplateRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /templates/{code}/config
// ---------------------------------------------------------------------------

/// The effective (merged) configuration for a template code. Unknown codes
/// fall back to the default template; a missing default template is a 500.
pub async fn get_template_config(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let resolved = TemplateRepo::resolve(&state.pool, &code).await?;
    tracing::debug!(
        requested = %code,
        resolved = %resolved.template_code,
        columns = resolved.column_mappings.len(),
        "Resolved template config"
    );
    Ok(Json(DataResponse { data: resolved }))
}
