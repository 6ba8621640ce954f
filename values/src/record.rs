//! FILENAME: values/src/record.rs
//! PURPOSE: Key-based lookup on heterogeneous record shapes.
//! CONTEXT: Columns declared with an accessor key resolve their value through
//! this trait: first as a named property, then as a raw field. Records that only
//! support typed accessor functions can implement it with `field` returning None.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Value as JsonValue;

use crate::cell_value::CellValue;

/// A record the table can look up by key.
///
/// `property` is consulted first and models computed or renamed accessors a
/// record type exposes; `field` reads stored data. A `None` from both means the
/// key does not apply to this record and the cell resolves to empty.
pub trait Record {
    fn property(&self, _key: &str) -> Option<CellValue> {
        None
    }

    fn field(&self, key: &str) -> Option<CellValue>;
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn property(&self, key: &str) -> Option<CellValue> {
        (**self).property(key)
    }

    fn field(&self, key: &str) -> Option<CellValue> {
        (**self).field(key)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn property(&self, key: &str) -> Option<CellValue> {
        (**self).property(key)
    }

    fn field(&self, key: &str) -> Option<CellValue> {
        (**self).field(key)
    }
}

impl<S: BuildHasher> Record for HashMap<String, CellValue, S> {
    fn field(&self, key: &str) -> Option<CellValue> {
        self.get(key).cloned()
    }
}

impl Record for BTreeMap<String, CellValue> {
    fn field(&self, key: &str) -> Option<CellValue> {
        self.get(key).cloned()
    }
}

/// Positional records: the key is parsed as a zero-based index.
impl Record for Vec<CellValue> {
    fn field(&self, key: &str) -> Option<CellValue> {
        key.parse::<usize>().ok().and_then(|i| self.get(i).cloned())
    }
}

// ============================================================================
// JSON RECORDS
// ============================================================================

/// JSON objects: `property` matches a top-level member exactly, `field`
/// walks a dotted path (`"address.city"`, `"tags.0"`).
impl Record for JsonValue {
    fn property(&self, key: &str) -> Option<CellValue> {
        self.as_object()
            .and_then(|obj| obj.get(key))
            .map(json_to_cell_value)
    }

    fn field(&self, key: &str) -> Option<CellValue> {
        let mut current = self;
        for segment in key.split('.') {
            current = match current {
                JsonValue::Object(obj) => obj.get(segment)?,
                JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(json_to_cell_value(current))
    }
}

/// Converts a JSON value to a cell value. Arrays and objects are kept as their
/// compact JSON text so they still display and filter.
pub fn json_to_cell_value(value: &JsonValue) -> CellValue {
    match value {
        JsonValue::Null => CellValue::Empty,
        JsonValue::Bool(b) => CellValue::Boolean(*b),
        JsonValue::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        JsonValue::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}
