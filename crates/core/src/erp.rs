//! Static column contract for the basic ERP spreadsheet export.
//!
//! The ERP sheet's columns are fixed by the downstream system; this table
//! pins their order and their binding to the raw order record. Columns the
//! ERP fills in itself (sequence number, tracking number, ...) are blank,
//! and the two derived amount columns use named transforms instead of
//! inline expressions.

use serde_json::json;

use crate::template::ColumnMapping;
use crate::transform;

/// How one ERP column obtains its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErpSource {
    /// Copy a field from the raw order record.
    Field(&'static str),
    /// Apply a named transform (see [`crate::transform`]).
    Transform(&'static str),
    /// Left blank; the ERP fills it in downstream.
    Blank,
}

/// One column of the basic ERP export, in sheet order.
#[derive(Debug, Clone, Copy)]
pub struct ErpColumn {
    pub header: &'static str,
    pub source: ErpSource,
}

/// The basic ERP sheet contract, in output order.
pub const ORDER_BASIC_ERP_COLUMNS: &[ErpColumn] = &[
    ErpColumn { header: "seq", source: ErpSource::Blank },
    ErpColumn { header: "site", source: ErpSource::Field("fld_dsp") },
    ErpColumn { header: "recipient_name", source: ErpSource::Field("receive_name") },
    ErpColumn { header: "amount", source: ErpSource::Blank },
    ErpColumn { header: "order_no", source: ErpSource::Field("order_id") },
    ErpColumn { header: "product_title", source: ErpSource::Blank },
    ErpColumn { header: "quantity", source: ErpSource::Field("sale_cnt") },
    ErpColumn { header: "phone1", source: ErpSource::Field("receive_cel") },
    ErpColumn { header: "phone2", source: ErpSource::Field("receive_tel") },
    ErpColumn { header: "recipient_addr", source: ErpSource::Field("receive_addr") },
    ErpColumn { header: "zipcode", source: ErpSource::Field("receive_zipcode") },
    ErpColumn { header: "delivery_method", source: ErpSource::Field("delivery_method") },
    ErpColumn { header: "mall_product_no", source: ErpSource::Field("mall_product_id") },
    ErpColumn { header: "delivery_message", source: ErpSource::Field("delv_msg") },
    ErpColumn {
        header: "settlement_amount",
        source: ErpSource::Transform(transform::SETTLEMENT_AMOUNT),
    },
    ErpColumn {
        header: "service_fee",
        source: ErpSource::Transform(transform::SERVICE_FEE),
    },
    ErpColumn { header: "cart_no", source: ErpSource::Field("mall_order_id") },
    ErpColumn { header: "tracking_no", source: ErpSource::Blank },
    ErpColumn { header: "freight_type", source: ErpSource::Blank },
    ErpColumn { header: "seller_code", source: ErpSource::Blank },
    ErpColumn { header: "amount_ex_delivery", source: ErpSource::Field("pay_cost") },
    ErpColumn { header: "delivery_cost", source: ErpSource::Field("delv_cost") },
    ErpColumn { header: "item_code", source: ErpSource::Field("product_id") },
    ErpColumn { header: "feed_order_no", source: ErpSource::Field("idx") },
    ErpColumn { header: "collected_product_name", source: ErpSource::Field("product_name") },
    ErpColumn { header: "collected_option", source: ErpSource::Field("sku_value") },
];

/// Express the static ERP contract as column mappings, usable as a template
/// definition (column order is the 1-based sheet position).
pub fn erp_basic_mappings() -> Vec<ColumnMapping> {
    ORDER_BASIC_ERP_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let (source_field, transform_config) = match col.source {
                ErpSource::Field(f) => (f.to_string(), json!({})),
                ErpSource::Transform(t) => (String::new(), json!({ transform::TRANSFORM_KEY: t })),
                ErpSource::Blank => (String::new(), json!({})),
            };
            ColumnMapping {
                column_order: (i + 1) as i32,
                target_column: col.header.to_string(),
                source_field,
                field_type: "text".to_string(),
                aggregation_type: None,
                transform_config,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::project_row;
    use crate::template::ResolvedTemplate;
    use serde_json::{json, Value};

    #[test]
    fn contract_orders_are_dense_and_unique() {
        let mappings = erp_basic_mappings();
        for (i, m) in mappings.iter().enumerate() {
            assert_eq!(m.column_order, (i + 1) as i32);
        }
        assert_eq!(mappings.len(), ORDER_BASIC_ERP_COLUMNS.len());
    }

    #[test]
    fn projecting_an_order_fills_the_sheet_row() {
        let template = ResolvedTemplate {
            template_code: "erp_basic".to_string(),
            template_name: "ERP basic".to_string(),
            is_aggregated: false,
            group_by_fields: vec![],
            column_mappings: erp_basic_mappings(),
        };
        let record = json!({
            "idx": "F-100",
            "order_id": "O-1",
            "receive_name": "Kim",
            "sale_cnt": 2,
            "pay_cost": 5000,
            "mall_won_cost": 1500,
        });

        let row = project_row(&template, &record);
        assert_eq!(row["feed_order_no"], json!("F-100"));
        assert_eq!(row["recipient_name"], json!("Kim"));
        assert_eq!(row["settlement_amount"], json!(3000));
        assert_eq!(row["service_fee"], json!(2000));
        // Blank columns stay blank for the ERP to fill in.
        assert_eq!(row["seq"], Value::Null);
        assert_eq!(row["tracking_no"], Value::Null);
    }
}
