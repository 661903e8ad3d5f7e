// File: ./src/model/mod.rs
pub mod columns;
pub mod display;
pub mod matcher;
pub mod normalizer;
pub mod record;

pub use columns::ColumnMap;
pub use normalizer::{Normalizer, split_tags};
pub use record::{FieldValue, RawRow, Record, raw_row};
