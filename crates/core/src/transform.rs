//! Named transform functions for derived export columns.
//!
//! Derived columns are selected by a `{"transform": "<name>"}` tag in a
//! column mapping's `transform_config` rather than by embedding executable
//! expressions in configuration. The set of names is closed; unknown tags
//! yield null and a warning.

use serde_json::{json, Value};

/// Key inside `transform_config` that selects a named transform.
pub const TRANSFORM_KEY: &str = "transform";

/// `mall_won_cost * sale_cnt` — the amount due to the mall on settlement.
pub const SETTLEMENT_AMOUNT: &str = "settlement_amount";

/// `pay_cost - mall_won_cost * sale_cnt` — the platform's cut.
pub const SERVICE_FEE: &str = "service_fee";

/// Extract the transform tag from a mapping's `transform_config`, if any.
pub fn transform_tag(config: &Value) -> Option<&str> {
    config.get(TRANSFORM_KEY).and_then(Value::as_str)
}

/// Apply the named transform to a source record.
///
/// Missing or non-numeric operands are treated as 0, matching the upstream
/// feed where amount fields may be absent on cancelled lines. Operand
/// values come from request bodies, so the arithmetic saturates rather
/// than overflowing.
pub fn apply(name: &str, record: &Value) -> Value {
    match name {
        SETTLEMENT_AMOUNT => {
            json!(int_field(record, "mall_won_cost").saturating_mul(int_field(record, "sale_cnt")))
        }
        SERVICE_FEE => json!(int_field(record, "pay_cost").saturating_sub(
            int_field(record, "mall_won_cost").saturating_mul(int_field(record, "sale_cnt"))
        )),
        other => {
            tracing::warn!(transform = other, "Unknown transform tag in column mapping");
            Value::Null
        }
    }
}

fn int_field(record: &Value, field: &str) -> i64 {
    record.get(field).and_then(Value::as_i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settlement_amount_multiplies_cost_by_count() {
        let record = json!({"mall_won_cost": 1200, "sale_cnt": 3});
        assert_eq!(apply(SETTLEMENT_AMOUNT, &record), json!(3600));
    }

    #[test]
    fn service_fee_subtracts_settlement_from_payment() {
        let record = json!({"pay_cost": 5000, "mall_won_cost": 1200, "sale_cnt": 3});
        assert_eq!(apply(SERVICE_FEE, &record), json!(1400));
    }

    #[test]
    fn missing_operands_default_to_zero() {
        let record = json!({"pay_cost": 5000});
        assert_eq!(apply(SETTLEMENT_AMOUNT, &record), json!(0));
        assert_eq!(apply(SERVICE_FEE, &record), json!(5000));
    }

    #[test]
    fn extreme_amounts_saturate() {
        let record = json!({"mall_won_cost": i64::MAX, "sale_cnt": 2});
        assert_eq!(apply(SETTLEMENT_AMOUNT, &record), json!(i64::MAX));

        let record = json!({"pay_cost": i64::MIN, "mall_won_cost": i64::MAX, "sale_cnt": 1});
        assert_eq!(apply(SERVICE_FEE, &record), json!(i64::MIN));
    }

    #[test]
    fn unknown_tag_yields_null() {
        let record = json!({"pay_cost": 5000});
        assert_eq!(apply("no_such_transform", &record), Value::Null);
    }

    #[test]
    fn tag_extraction() {
        assert_eq!(transform_tag(&json!({"transform": "service_fee"})), Some(SERVICE_FEE));
        assert_eq!(transform_tag(&json!({})), None);
        assert_eq!(transform_tag(&json!({"transform": 3})), None);
    }
}
