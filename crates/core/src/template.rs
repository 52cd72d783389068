//! Export-template merge engine.
//!
//! A logical template is resolved by merging the always-present `default`
//! template with an override template identified by `template_code`.
//! Metadata merges field-wise (the requested record wins wholesale when it
//! exists); column mappings merge keyed by `target_column` with the
//! requested side fully replacing the default entry, and the final list is
//! sorted ascending by `column_order` with a stable tie-break equal to
//! insertion order (default set first, then requested additions).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved code of the base template every resolution falls back to.
pub const DEFAULT_TEMPLATE_CODE: &str = "default";

/// Metadata of one export template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub template_code: String,
    pub template_name: String,
    /// Exported rows for this template are pre-aggregated.
    pub is_aggregated: bool,
    /// Grouping fields for aggregated templates; empty otherwise.
    pub group_by_fields: Vec<String>,
}

/// One output column's binding to a source field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Output position; ascending sort key of the merged list.
    pub column_order: i32,
    /// Output column name; the merge key.
    pub target_column: String,
    /// Field on the upstream source record. Empty means a blank column.
    pub source_field: String,
    /// Downstream coercion tag (`text` / `number` / `date`); not enforced here.
    pub field_type: String,
    pub aggregation_type: Option<String>,
    /// Structured transform parameters; `{"transform": "<name>"}` selects a
    /// named transform (see [`crate::transform`]).
    #[serde(default)]
    pub transform_config: serde_json::Value,
}

/// The effective configuration for a template code: merged metadata plus
/// the merged, ordered column list. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTemplate {
    pub template_code: String,
    pub template_name: String,
    pub is_aggregated: bool,
    pub group_by_fields: Vec<String>,
    pub column_mappings: Vec<ColumnMapping>,
}

/// Merge default and requested column mappings.
///
/// Both inputs must already be filtered to active rows. `requested_inactive`
/// carries the `target_column`s the requested template has explicitly
/// deactivated: those columns are excluded from the output entirely, they do
/// not revert to the default-side mapping.
///
/// A `target_column` present on both sides takes the requested mapping in
/// full (never a field-level splice) and keeps the default side's position
/// for tie-breaking; a key only on the requested side is appended. Colliding
/// `column_order` values are not deduplicated or re-keyed: the stable sort
/// leaves them in insertion order.
pub fn merge_column_mappings(
    default_mappings: Vec<ColumnMapping>,
    requested_mappings: Vec<ColumnMapping>,
    requested_inactive: &[String],
) -> Vec<ColumnMapping> {
    let mut by_target: IndexMap<String, ColumnMapping> =
        IndexMap::with_capacity(default_mappings.len() + requested_mappings.len());

    for mapping in default_mappings {
        by_target.insert(mapping.target_column.clone(), mapping);
    }
    for mapping in requested_mappings {
        by_target.insert(mapping.target_column.clone(), mapping);
    }
    for target in requested_inactive {
        // shift_remove keeps the relative order of the survivors intact.
        by_target.shift_remove(target);
    }

    let mut merged: Vec<ColumnMapping> = by_target.into_values().collect();
    merged.sort_by_key(|m| m.column_order);
    merged
}

/// Merge template metadata: the requested record's fields win wholesale
/// when it exists; otherwise the default metadata is used unchanged.
pub fn merge_meta(default_meta: &TemplateMeta, requested_meta: Option<&TemplateMeta>) -> TemplateMeta {
    requested_meta.unwrap_or(default_meta).clone()
}

/// Assemble a [`ResolvedTemplate`] from the fetched parts.
///
/// `requested` is `None` when the requested code has no stored template;
/// the default configuration is then returned verbatim (documented
/// fallback, not an error).
pub fn resolve_from_parts(
    default_meta: TemplateMeta,
    default_mappings: Vec<ColumnMapping>,
    requested: Option<(TemplateMeta, Vec<ColumnMapping>, Vec<String>)>,
) -> ResolvedTemplate {
    let (meta, column_mappings) = match requested {
        None => (default_meta, default_mappings),
        Some((requested_meta, requested_mappings, requested_inactive)) => {
            let merged = merge_column_mappings(
                default_mappings,
                requested_mappings,
                &requested_inactive,
            );
            let meta = merge_meta(&default_meta, Some(&requested_meta));
            (meta, merged)
        }
    };

    ResolvedTemplate {
        template_code: meta.template_code,
        template_name: meta.template_name,
        is_aggregated: meta.is_aggregated,
        group_by_fields: meta.group_by_fields,
        column_mappings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(order: i32, target: &str, source: &str) -> ColumnMapping {
        ColumnMapping {
            column_order: order,
            target_column: target.to_string(),
            source_field: source.to_string(),
            field_type: "text".to_string(),
            aggregation_type: None,
            transform_config: json!({}),
        }
    }

    fn meta(code: &str, name: &str) -> TemplateMeta {
        TemplateMeta {
            template_code: code.to_string(),
            template_name: name.to_string(),
            is_aggregated: false,
            group_by_fields: vec![],
        }
    }

    #[test]
    fn requested_mapping_replaces_default_in_full() {
        let default = vec![ColumnMapping {
            aggregation_type: Some("sum".to_string()),
            ..mapping(1, "amount", "pay_cost")
        }];
        let requested = vec![mapping(5, "amount", "delv_cost")];

        let merged = merge_column_mappings(default, requested.clone(), &[]);
        assert_eq!(merged, requested);
    }

    #[test]
    fn default_only_keys_are_untouched() {
        let default = vec![mapping(1, "a", "f1"), mapping(2, "b", "f2")];
        let requested = vec![mapping(3, "c", "f3")];

        let merged = merge_column_mappings(default.clone(), requested, &[]);
        assert_eq!(merged[0], default[0]);
        assert_eq!(merged[1], default[1]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merged_length_is_distinct_target_count() {
        let default = vec![mapping(1, "a", "f"), mapping(2, "b", "f"), mapping(3, "c", "f")];
        let requested = vec![mapping(4, "b", "g"), mapping(5, "d", "g")];

        let merged = merge_column_mappings(default, requested, &[]);
        assert_eq!(merged.len(), 4); // a, b, c, d
    }

    #[test]
    fn output_is_sorted_by_column_order() {
        // Scenario: default [(1,"A"),(2,"B")], requested [(1,"C"),(3,"D")]
        // -> output order C, B, D.
        let default = vec![mapping(1, "A", "f"), mapping(2, "B", "f")];
        let requested = vec![mapping(1, "C", "g"), mapping(3, "D", "g")];

        let merged = merge_column_mappings(default, requested, &[]);
        let targets: Vec<&str> = merged.iter().map(|m| m.target_column.as_str()).collect();
        assert_eq!(targets, ["A", "C", "B", "D"]);
        assert!(merged.windows(2).all(|w| w[0].column_order <= w[1].column_order));
    }

    #[test]
    fn colliding_orders_keep_insertion_order() {
        // Same column_order under different targets on both sides: both
        // survive, default-set position first, no secondary tie-break.
        let default = vec![mapping(1, "a", "f"), mapping(1, "b", "f")];
        let requested = vec![mapping(1, "c", "g")];

        let merged = merge_column_mappings(default, requested, &[]);
        let targets: Vec<&str> = merged.iter().map(|m| m.target_column.as_str()).collect();
        assert_eq!(targets, ["a", "b", "c"]);
    }

    #[test]
    fn overridden_key_keeps_default_position_on_tie() {
        let default = vec![mapping(1, "a", "f"), mapping(1, "b", "f")];
        let requested = vec![mapping(1, "a", "g")];

        let merged = merge_column_mappings(default, requested, &[]);
        let targets: Vec<&str> = merged.iter().map(|m| m.target_column.as_str()).collect();
        assert_eq!(targets, ["a", "b"]);
        assert_eq!(merged[0].source_field, "g");
    }

    #[test]
    fn inactive_requested_mapping_masks_active_default() {
        // A deactivated mapping in the requested template is excluded, not
        // reverted to the default-side mapping with the same target.
        let default = vec![mapping(1, "a", "f"), mapping(2, "b", "f")];
        let requested = vec![mapping(3, "c", "g")];
        let inactive = vec!["a".to_string()];

        let merged = merge_column_mappings(default, requested, &inactive);
        let targets: Vec<&str> = merged.iter().map(|m| m.target_column.as_str()).collect();
        assert_eq!(targets, ["b", "c"]);
    }

    #[test]
    fn differently_spelled_targets_are_unrelated() {
        let default = vec![mapping(1, "Amount", "pay_cost")];
        let requested = vec![mapping(2, "amount", "delv_cost")];

        let merged = merge_column_mappings(default, requested, &[]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn resolve_without_requested_returns_default_verbatim() {
        let default_meta = meta("default", "Default export");
        let default_mappings = vec![mapping(1, "a", "f"), mapping(2, "b", "f")];

        let resolved = resolve_from_parts(default_meta.clone(), default_mappings.clone(), None);
        assert_eq!(resolved.template_code, "default");
        assert_eq!(resolved.template_name, "Default export");
        assert_eq!(resolved.column_mappings, default_mappings);
    }

    #[test]
    fn resolve_with_requested_takes_requested_meta() {
        let default_meta = meta("default", "Default export");
        let requested_meta = TemplateMeta {
            is_aggregated: true,
            group_by_fields: vec!["receive_zipcode".to_string()],
            ..meta("erp_basic", "ERP basic")
        };

        let resolved = resolve_from_parts(
            default_meta,
            vec![mapping(1, "a", "f")],
            Some((requested_meta, vec![], vec![])),
        );
        assert_eq!(resolved.template_code, "erp_basic");
        assert_eq!(resolved.template_name, "ERP basic");
        assert!(resolved.is_aggregated);
        assert_eq!(resolved.group_by_fields, ["receive_zipcode"]);
        assert_eq!(resolved.column_mappings.len(), 1);
    }

    #[test]
    fn resolve_is_deterministic() {
        let default_meta = meta("default", "Default export");
        let default_mappings = vec![mapping(2, "b", "f"), mapping(1, "a", "f")];
        let requested = Some((
            meta("t1", "T1"),
            vec![mapping(1, "c", "g")],
            vec!["b".to_string()],
        ));

        let first = resolve_from_parts(
            default_meta.clone(),
            default_mappings.clone(),
            requested.clone(),
        );
        let second = resolve_from_parts(default_meta, default_mappings, requested);
        assert_eq!(first, second);
    }
}
