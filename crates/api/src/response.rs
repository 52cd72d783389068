//! Shared response envelope types for API handlers.
//!
//! Plain reads use the `{ "data": ... }` envelope; paginated listings add
//! `total`/`page`/`page_size`; bulk mutations return one [`RowResult`] per
//! input item.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub items: Vec<T>,
}

/// Per-item outcome marker in bulk responses.
///
/// A successful bulk request currently marks every item `success`; a failure
/// inside the batch aborts the whole request with an error response instead
/// of differentiating per item. Known limitation of the response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Failure,
}

/// One item's result inside a bulk response.
#[derive(Debug, Serialize)]
pub struct RowResult<T: Serialize> {
    pub data: Vec<T>,
    pub status: RowStatus,
    pub message: Option<String>,
}

impl<T: Serialize> RowResult<T> {
    pub fn success(data: Vec<T>) -> Self {
        Self {
            data,
            status: RowStatus::Success,
            message: None,
        }
    }
}

/// Envelope for bulk create/update/delete endpoints.
#[derive(Debug, Serialize)]
pub struct BulkResponse<T: Serialize> {
    pub results: Vec<RowResult<T>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RowStatus::Success).unwrap(), "\"success\"");
        assert_eq!(serde_json::to_string(&RowStatus::Failure).unwrap(), "\"failure\"");
    }
}
