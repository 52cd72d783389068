//! Exported ("down-form") order row models and DTOs.

use chrono::NaiveDate;
use oms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `down_form_orders` table: an order line already projected
/// into the generic exported shape, tagged by the template that produced it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DownFormOrder {
    pub id: DbId,
    pub idx: Option<String>,
    /// Template code this row was exported under; null for untemplated rows.
    pub form_name: Option<String>,
    pub order_id: Option<String>,
    pub mall_id: Option<String>,
    pub receive_name: Option<String>,
    pub receive_addr: Option<String>,
    pub receive_zipcode: Option<String>,
    pub receive_cel: Option<String>,
    pub delv_msg: Option<String>,
    pub product_name: Option<String>,
    pub sale_cnt: Option<i32>,
    pub pay_cost: Option<i64>,
    pub delv_cost: Option<i64>,
    pub order_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for bulk-creating exported rows.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDownFormOrder {
    pub idx: Option<String>,
    pub form_name: Option<String>,
    pub order_id: Option<String>,
    pub mall_id: Option<String>,
    pub receive_name: Option<String>,
    pub receive_addr: Option<String>,
    pub receive_zipcode: Option<String>,
    pub receive_cel: Option<String>,
    pub delv_msg: Option<String>,
    pub product_name: Option<String>,
    pub sale_cnt: Option<i32>,
    pub pay_cost: Option<i64>,
    pub delv_cost: Option<i64>,
    pub order_date: Option<NaiveDate>,
}

/// DTO for bulk-updating exported rows. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDownFormOrder {
    pub id: DbId,
    pub form_name: Option<String>,
    pub receive_name: Option<String>,
    pub receive_addr: Option<String>,
    pub receive_zipcode: Option<String>,
    pub receive_cel: Option<String>,
    pub delv_msg: Option<String>,
    pub product_name: Option<String>,
    pub sale_cnt: Option<i32>,
    pub pay_cost: Option<i64>,
    pub delv_cost: Option<i64>,
    pub order_date: Option<NaiveDate>,
}

/// Listing scope derived from the `template_code` query parameter.
///
/// - absent or `all` — every row, no filter
/// - empty string — untemplated rows (`form_name` null or empty)
/// - anything else — rows exported under exactly that code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateScope {
    All,
    Untemplated,
    Code(String),
}

impl TemplateScope {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("all") => TemplateScope::All,
            Some("") => TemplateScope::Untemplated,
            Some(code) => TemplateScope::Code(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_from_param_sentinels() {
        assert_eq!(TemplateScope::from_param(None), TemplateScope::All);
        assert_eq!(TemplateScope::from_param(Some("all")), TemplateScope::All);
        assert_eq!(TemplateScope::from_param(Some("")), TemplateScope::Untemplated);
        assert_eq!(
            TemplateScope::from_param(Some("erp_basic")),
            TemplateScope::Code("erp_basic".to_string())
        );
    }
}
