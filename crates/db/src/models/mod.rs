//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where applicable, an update DTO (all `Option` fields)

pub mod down_form_order;
pub mod receive_order;
pub mod template;
