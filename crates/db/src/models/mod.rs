//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where
//!   the entity supports partial updates

pub mod alert;
pub mod card;
pub mod column;
pub mod form;
pub mod polo;
pub mod project;
pub mod sales_funnel;
pub mod user;
