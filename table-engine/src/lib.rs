//! FILENAME: table-engine/src/lib.rs
//! Headless row-model engine.
//!
//! A `Table` derives, on every state change, a consistent view of typed
//! records after filtering, sorting, grouping, aggregation, expansion and
//! pagination. Rendering is left to the host.
//!
//! Layers:
//! - `state`, `options`: Serializable configuration (what the table IS)
//! - `column`, `header`, `row`, `cell`: Entities consumers read
//! - `pipeline`: Stage functions (HOW rows are derived)
//! - `features`: Hooks that normalize state on every transition
//! - `table`: The instance and its state mutation gateway

mod logging;

pub mod aggregation;
pub mod cell;
pub mod column;
pub mod error;
pub mod features;
pub mod header;
pub mod options;
pub mod pipeline;
pub mod resolve;
pub mod row;
pub mod row_model;
pub mod state;
pub mod table;

pub use aggregation::{AggregationFn, AggregationProvider};
pub use cell::Cell;
pub use column::{Accessor, Column, ColumnDef, ColumnTree};
pub use error::{AccessorError, TableError};
pub use features::sorting::SortingFn;
pub use features::{FeatureContext, FeatureRegistry, ReconcileContext, TableFeature};
pub use header::{Header, HeaderGroup};
pub use options::{ColumnDefaults, FeatureFlags, GroupedColumnMode, TableOptions};
pub use pipeline::{RefreshModelParams, RefreshStage};
pub use resolve::ResolveFailure;
pub use row::{Row, RowCells, RowRef};
pub use row_model::{ModelRef, RowModel};
pub use state::*;
pub use table::Table;

pub use values::{CellValue, FromCellValue, Record};
