//! Export template rows and their conversion into the domain types the
//! merge engine in `oms-core` operates on.

use oms_core::template::{ColumnMapping, TemplateMeta};
use oms_core::types::DbId;
use sqlx::FromRow;

/// A row from the `export_templates` table.
#[derive(Debug, Clone, FromRow)]
pub struct ExportTemplateRow {
    pub id: DbId,
    pub template_code: String,
    pub template_name: String,
    pub is_aggregated: bool,
    pub group_by_fields: Vec<String>,
}

impl ExportTemplateRow {
    /// Strip the storage id; it is not exposed past resolution.
    pub fn into_meta(self) -> TemplateMeta {
        TemplateMeta {
            template_code: self.template_code,
            template_name: self.template_name,
            is_aggregated: self.is_aggregated,
            group_by_fields: self.group_by_fields,
        }
    }
}

/// A row from the `template_column_mappings` table.
#[derive(Debug, Clone, FromRow)]
pub struct ColumnMappingRow {
    pub column_order: i32,
    pub target_column: String,
    pub source_field: String,
    pub field_type: String,
    pub aggregation_type: Option<String>,
    pub transform_config: serde_json::Value,
}

impl ColumnMappingRow {
    pub fn into_mapping(self) -> ColumnMapping {
        ColumnMapping {
            column_order: self.column_order,
            target_column: self.target_column,
            source_field: self.source_field,
            field_type: self.field_type,
            aggregation_type: self.aggregation_type,
            transform_config: self.transform_config,
        }
    }
}
