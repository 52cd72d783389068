//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod down_form_order_repo;
pub mod receive_order_repo;
pub mod template_repo;

pub use down_form_order_repo::DownFormOrderRepo;
pub use receive_order_repo::ReceiveOrderRepo;
pub use template_repo::{TemplateRepo, TemplateResolveError};
