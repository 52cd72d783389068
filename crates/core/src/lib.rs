//! Domain logic for the order-management export backend.
//!
//! Everything here is database-agnostic: the template merge engine, the
//! named transform functions, row projection, and the shared error
//! taxonomy. Persistence lives in `oms-db`, HTTP in `oms-api`.

pub mod erp;
pub mod error;
pub mod export;
pub mod template;
pub mod transform;
pub mod types;
