//! Row projection through a resolved template.
//!
//! Shapes already-exported order rows into the column contract a resolved
//! template describes: one ordered key/value map per row, keys in merged
//! `column_order`, values copied from the bound source field or produced by
//! a named transform.

use indexmap::IndexMap;
use serde_json::Value;

use crate::template::ResolvedTemplate;
use crate::transform;

/// Project one source record (a JSON object) into the template's column
/// contract. Unknown source fields and blank bindings yield null.
pub fn project_row(resolved: &ResolvedTemplate, record: &Value) -> IndexMap<String, Value> {
    let mut out = IndexMap::with_capacity(resolved.column_mappings.len());
    for mapping in &resolved.column_mappings {
        let value = match transform::transform_tag(&mapping.transform_config) {
            Some(tag) => transform::apply(tag, record),
            None if mapping.source_field.is_empty() => Value::Null,
            None => record.get(&mapping.source_field).cloned().unwrap_or(Value::Null),
        };
        out.insert(mapping.target_column.clone(), value);
    }
    out
}

/// Project a batch of source records, preserving their order.
pub fn project_rows(resolved: &ResolvedTemplate, records: &[Value]) -> Vec<IndexMap<String, Value>> {
    records.iter().map(|r| project_row(resolved, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ColumnMapping;
    use serde_json::json;

    fn resolved(mappings: Vec<ColumnMapping>) -> ResolvedTemplate {
        ResolvedTemplate {
            template_code: "t".to_string(),
            template_name: "T".to_string(),
            is_aggregated: false,
            group_by_fields: vec![],
            column_mappings: mappings,
        }
    }

    fn mapping(order: i32, target: &str, source: &str, config: Value) -> ColumnMapping {
        ColumnMapping {
            column_order: order,
            target_column: target.to_string(),
            source_field: source.to_string(),
            field_type: "text".to_string(),
            aggregation_type: None,
            transform_config: config,
        }
    }

    #[test]
    fn projects_fields_in_column_order() {
        let template = resolved(vec![
            mapping(1, "recipient", "receive_name", json!({})),
            mapping(2, "order_no", "order_id", json!({})),
        ]);
        let record = json!({"receive_name": "Kim", "order_id": "A-1", "extra": true});

        let row = project_row(&template, &record);
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, ["recipient", "order_no"]);
        assert_eq!(row["recipient"], json!("Kim"));
        assert_eq!(row["order_no"], json!("A-1"));
    }

    #[test]
    fn blank_binding_and_missing_field_yield_null() {
        let template = resolved(vec![
            mapping(1, "seq", "", json!({})),
            mapping(2, "tracking_no", "tracking_no", json!({})),
        ]);
        let row = project_row(&template, &json!({}));
        assert_eq!(row["seq"], Value::Null);
        assert_eq!(row["tracking_no"], Value::Null);
    }

    #[test]
    fn transform_tag_overrides_source_field() {
        let template = resolved(vec![mapping(
            1,
            "settlement",
            "pay_cost",
            json!({"transform": "settlement_amount"}),
        )]);
        let record = json!({"pay_cost": 9999, "mall_won_cost": 100, "sale_cnt": 2});

        let row = project_row(&template, &record);
        assert_eq!(row["settlement"], json!(200));
    }

    #[test]
    fn projects_batches_in_input_order() {
        let template = resolved(vec![mapping(1, "n", "receive_name", json!({}))]);
        let rows = project_rows(
            &template,
            &[json!({"receive_name": "a"}), json!({"receive_name": "b"})],
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["n"], json!("a"));
        assert_eq!(rows[1]["n"], json!("b"));
    }
}
