//! FILENAME: table-engine/src/resolve.rs
//! PURPOSE: Cell value resolution with per-cell failure isolation.
//! CONTEXT: Resolution tries the accessor function, then the accessor key as a
//! property, then as a field. Each failure falls through to the next strategy
//! and is reported on the diagnostic channel; the cell ends up Empty and marked
//! as a placeholder when nothing produced a value.

use std::panic::{self, AssertUnwindSafe};

use smallvec::SmallVec;
use values::{CellValue, Record};

use crate::column::{AccessorFn, Column};
use crate::error::TableError;
use crate::logging::log_debug;
use crate::options::ResolveErrorFn;

/// Errors collected while resolving one cell.
pub type ResolveErrors = SmallVec<[TableError; 2]>;

/// One swallowed resolution failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveFailure {
    pub row_id: String,
    pub column_id: String,
    pub error: TableError,
}

/// Runs an accessor function, turning both errors and panics into `TableError`.
pub fn call_accessor<T>(f: &AccessorFn<T>, record: &T, column_id: &str) -> Result<CellValue, TableError> {
    match panic::catch_unwind(AssertUnwindSafe(|| f(record))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(TableError::Accessor {
            column_id: column_id.to_string(),
            source,
        }),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(TableError::AccessorPanic {
                column_id: column_id.to_string(),
                message,
            })
        }
    }
}

/// Resolves one cell. None means no strategy produced a value.
pub fn resolve_cell<T: Record>(record: &T, column: &Column<T>, errors: &mut ResolveErrors) -> Option<CellValue> {
    let accessor = column.accessor()?;

    if let Some(f) = accessor.function() {
        match call_accessor(f, record, column.id()) {
            Ok(value) => return Some(value),
            Err(e) => errors.push(e),
        }
    }

    let key = accessor.key()?;
    if let Some(value) = record.property(key).or_else(|| record.field(key)) {
        return Some(value);
    }
    errors.push(TableError::KeyNotFound {
        column_id: column.id().to_string(),
        key: key.to_string(),
    });
    None
}

// ============================================================================
// DIAGNOSTIC CHANNEL
// ============================================================================

/// Failures of the last core build, plus the host callback.
#[derive(Default)]
pub struct ResolveLog {
    failures: Vec<ResolveFailure>,
    on_error: Option<ResolveErrorFn>,
}

impl ResolveLog {
    pub fn new(on_error: Option<ResolveErrorFn>) -> Self {
        ResolveLog {
            failures: Vec::new(),
            on_error,
        }
    }

    pub fn clear(&mut self) {
        self.failures.clear();
    }

    pub fn record(&mut self, row_id: &str, error: TableError) {
        log_debug!("RESOLVE", "row '{}': {}", row_id, error);
        let failure = ResolveFailure {
            row_id: row_id.to_string(),
            column_id: column_of(&error).to_string(),
            error,
        };
        if let Some(callback) = self.on_error.as_mut() {
            callback(&failure);
        }
        self.failures.push(failure);
    }

    pub fn failures(&self) -> &[ResolveFailure] {
        &self.failures
    }
}

fn column_of(error: &TableError) -> &str {
    match error {
        TableError::Accessor { column_id, .. }
        | TableError::AccessorPanic { column_id, .. }
        | TableError::KeyNotFound { column_id, .. } => column_id,
    }
}

impl std::fmt::Debug for ResolveLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveLog")
            .field("failures", &self.failures)
            .field("has_callback", &self.on_error.is_some())
            .finish()
    }
}
