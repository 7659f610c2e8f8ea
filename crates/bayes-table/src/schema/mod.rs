//! Schema types for representing the dataset structure.

mod table;
mod types;

pub use table::{Dataset, Schema};
pub use types::{Category, ColumnType, Value};
