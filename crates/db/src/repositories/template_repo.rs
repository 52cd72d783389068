//! Repository for the `export_templates` and `template_column_mappings`
//! tables, plus the template resolver built on top of them.
//!
//! Both tables are administered out of band; this subsystem only reads
//! them, so concurrent resolutions need no locking.

use sqlx::PgPool;

use oms_core::error::CoreError;
use oms_core::template::{self, ResolvedTemplate, DEFAULT_TEMPLATE_CODE};
use oms_core::types::DbId;

use crate::models::template::{ColumnMappingRow, ExportTemplateRow};

const META_COLUMNS: &str = "id, template_code, template_name, is_aggregated, group_by_fields";

const MAPPING_COLUMNS: &str =
    "column_order, target_column, source_field, field_type, aggregation_type, transform_config";

/// Failure modes of template resolution.
#[derive(Debug, thiserror::Error)]
pub enum TemplateResolveError {
    /// The `default` template is absent. A deployment/configuration error,
    /// not a per-request one.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Read access to template configuration and the two-level resolver.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Find template metadata by its stable external code.
    pub async fn find_meta_by_code(
        pool: &PgPool,
        template_code: &str,
    ) -> Result<Option<ExportTemplateRow>, sqlx::Error> {
        let query =
            format!("SELECT {META_COLUMNS} FROM export_templates WHERE template_code = $1");
        sqlx::query_as::<_, ExportTemplateRow>(&query)
            .bind(template_code)
            .fetch_optional(pool)
            .await
    }

    /// List a template's active column mappings, ordered by `column_order`.
    pub async fn list_active_mappings(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<ColumnMappingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {MAPPING_COLUMNS} FROM template_column_mappings \
             WHERE template_id = $1 AND is_active = TRUE \
             ORDER BY column_order"
        );
        sqlx::query_as::<_, ColumnMappingRow>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }

    /// List the `target_column`s a template has explicitly deactivated.
    /// Deactivated columns mask same-named default mappings in the merge.
    pub async fn list_inactive_targets(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT target_column FROM template_column_mappings \
             WHERE template_id = $1 AND is_active = FALSE",
        )
        .bind(template_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(t,)| t).collect())
    }

    /// Resolve the effective configuration for `template_code`.
    ///
    /// Loads the `default` template and the requested one, then merges
    /// metadata and column mappings (see `oms_core::template`). A missing
    /// requested template falls back to the default configuration verbatim;
    /// a missing `default` template is fatal.
    pub async fn resolve(
        pool: &PgPool,
        template_code: &str,
    ) -> Result<ResolvedTemplate, TemplateResolveError> {
        let default_row = Self::find_meta_by_code(pool, DEFAULT_TEMPLATE_CODE)
            .await?
            .ok_or(CoreError::ConfigurationMissing("default export template"))?;
        let default_id = default_row.id;
        let default_mappings: Vec<_> = Self::list_active_mappings(pool, default_id)
            .await?
            .into_iter()
            .map(ColumnMappingRow::into_mapping)
            .collect();

        let requested = match Self::find_meta_by_code(pool, template_code).await? {
            None => {
                tracing::debug!(template_code, "Template not found, falling back to default");
                None
            }
            Some(row) => {
                let requested_id = row.id;
                let mappings: Vec<_> = Self::list_active_mappings(pool, requested_id)
                    .await?
                    .into_iter()
                    .map(ColumnMappingRow::into_mapping)
                    .collect();
                let inactive = Self::list_inactive_targets(pool, requested_id).await?;
                Some((row.into_meta(), mappings, inactive))
            }
        };

        Ok(template::resolve_from_parts(
            default_row.into_meta(),
            default_mappings,
            requested,
        ))
    }
}
