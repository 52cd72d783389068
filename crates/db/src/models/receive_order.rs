//! Raw incoming order line models and DTOs.

use chrono::NaiveDate;
use oms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `receive_orders` table. Wide by nature: one column per
/// upstream feed field.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReceiveOrder {
    pub id: DbId,
    /// Upstream-assigned unique order line identifier.
    pub idx: String,
    pub order_id: Option<String>,
    pub mall_id: Option<String>,
    pub mall_user_id: Option<String>,
    pub mall_order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub order_status: Option<String>,
    pub receive_name: Option<String>,
    pub receive_cel: Option<String>,
    pub receive_tel: Option<String>,
    pub receive_addr: Option<String>,
    pub receive_zipcode: Option<String>,
    pub delv_msg: Option<String>,
    pub delivery_method: Option<String>,
    pub fld_dsp: Option<String>,
    pub mall_product_id: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub sku_value: Option<String>,
    pub sale_cnt: Option<i32>,
    pub pay_cost: Option<i64>,
    pub delv_cost: Option<i64>,
    pub mall_won_cost: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or upserting a raw order line. Missing feed fields
/// stay null.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceiveOrder {
    pub idx: String,
    pub order_id: Option<String>,
    pub mall_id: Option<String>,
    pub mall_user_id: Option<String>,
    pub mall_order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub order_status: Option<String>,
    pub receive_name: Option<String>,
    pub receive_cel: Option<String>,
    pub receive_tel: Option<String>,
    pub receive_addr: Option<String>,
    pub receive_zipcode: Option<String>,
    pub delv_msg: Option<String>,
    pub delivery_method: Option<String>,
    pub fld_dsp: Option<String>,
    pub mall_product_id: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub sku_value: Option<String>,
    pub sale_cnt: Option<i32>,
    pub pay_cost: Option<i64>,
    pub delv_cost: Option<i64>,
    pub mall_won_cost: Option<i64>,
}

/// Optional AND-combined filters for raw order queries. Absent filters
/// impose no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilters {
    pub order_date_from: Option<NaiveDate>,
    pub order_date_to: Option<NaiveDate>,
    pub mall_id: Option<String>,
    pub order_status: Option<String>,
}

/// Outcome of a batched idempotent bulk insert.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkInsertReport {
    pub attempted: usize,
    pub inserted: usize,
    pub duplicated: usize,
    /// The idx values that were skipped as duplicates.
    pub duplicated_idx: Vec<String>,
}
