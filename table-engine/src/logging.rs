//! FILENAME: table-engine/src/logging.rs
//! PURPOSE: Category-tagged logging for the engine.
//! CONTEXT: Every line is `CATEGORY|message` on the `table_engine` target of the
//! `log` facade. The host decides where it goes by installing a logger.
//! Categories in use: STATE, PIPELINE, COLUMNS, RESOLVE.

/// Log target shared by all engine macros.
pub const TARGET: &str = "table_engine";

macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        ::log::debug!(target: $crate::logging::TARGET, "{}|{}", $cat, format_args!($($arg)*))
    };
}

macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        ::log::info!(target: $crate::logging::TARGET, "{}|{}", $cat, format_args!($($arg)*))
    };
}

macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        ::log::warn!(target: $crate::logging::TARGET, "{}|{}", $cat, format_args!($($arg)*))
    };
}

/// ENTER line for a gateway operation.
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        ::log::trace!(target: $crate::logging::TARGET, "{}|ENTER {}", $cat, $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::trace!(target: $crate::logging::TARGET, "{}|ENTER {} {}", $cat, $func, format_args!($($arg)*))
    };
}

/// EXIT line for a gateway operation.
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        ::log::trace!(target: $crate::logging::TARGET, "{}|EXIT {}", $cat, $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::trace!(target: $crate::logging::TARGET, "{}|EXIT {} {}", $cat, $func, format_args!($($arg)*))
    };
}

pub(crate) use log_debug;
pub(crate) use log_enter;
pub(crate) use log_exit;
pub(crate) use log_info;
pub(crate) use log_warn;
