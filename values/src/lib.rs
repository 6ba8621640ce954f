//! FILENAME: values/src/lib.rs
//! PURPOSE: Shared value model for the table engine.
//! CONTEXT: Re-exports public types for use by `table-engine` and by hosts that
//! implement `Record` for their own data types.

pub mod cell_value;
pub mod record;

pub use cell_value::{CellValue, FromCellValue, OrderedFloat, ValueKey};
pub use record::{json_to_cell_value, Record};
