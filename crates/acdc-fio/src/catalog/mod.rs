//! Built-in schemas for the supported module input files.

mod aerodyn14;
mod elastodyn_tower;

pub use aerodyn14::aerodyn14;
pub use elastodyn_tower::elastodyn_tower;

use crate::error::SchemaError;
use crate::field::FileSpec;

/// Names accepted by [`lookup`], in display order.
pub const SCHEMA_NAMES: &[&str] = &["AeroDyn14", "ElastoDynTower"];

/// Case-insensitive lookup of a built-in schema.
pub fn lookup(name: &str) -> Result<FileSpec, SchemaError> {
    if name.eq_ignore_ascii_case("AeroDyn14") {
        Ok(aerodyn14())
    } else if name.eq_ignore_ascii_case("ElastoDynTower") {
        Ok(elastodyn_tower())
    } else {
        Err(SchemaError::UnknownSchema(name.to_string()))
    }
}

pub fn all() -> Vec<FileSpec> {
    vec![aerodyn14(), elastodyn_tower()]
}
