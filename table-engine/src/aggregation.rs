//! FILENAME: table-engine/src/aggregation.rs
//! PURPOSE: Group summaries for the aggregate stage.
//! CONTEXT: A group row's non-grouping cells receive a summary of the values of
//! its leaf rows. The summary comes from an external `AggregationProvider` when
//! one answers for the column, otherwise from the column's `AggregationFn`.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use values::{CellValue, ValueKey};

// ============================================================================
// AGGREGATION FUNCTIONS
// ============================================================================

pub type CustomAggregationFn = Rc<dyn Fn(&[CellValue]) -> CellValue>;

/// Built-in aggregation functions a column can declare.
#[derive(Clone)]
pub enum AggregationFn {
    Sum,
    /// Number of leaf rows.
    Count,
    /// Number of numeric leaf values.
    CountNumbers,
    Average,
    Min,
    Max,
    /// "min - max" text of the numeric range.
    Extent,
    Median,
    Product,
    StdDev,
    StdDevP,
    Var,
    VarP,
    /// Distinct values joined with ", " in first-seen order.
    Unique,
    UniqueCount,
    Custom(CustomAggregationFn),
}

impl AggregationFn {
    pub fn custom(f: impl Fn(&[CellValue]) -> CellValue + 'static) -> Self {
        AggregationFn::Custom(Rc::new(f))
    }

    /// Aggregates the leaf values of one group.
    pub fn aggregate(&self, values: &[CellValue]) -> CellValue {
        match self {
            AggregationFn::Count => CellValue::Number(values.len() as f64),
            AggregationFn::Extent => {
                let summary = NumericSummary::of(values);
                if summary.n == 0 {
                    return CellValue::Empty;
                }
                CellValue::Text(format!(
                    "{} - {}",
                    CellValue::Number(summary.min),
                    CellValue::Number(summary.max)
                ))
            }
            AggregationFn::Median => median(values),
            AggregationFn::Unique => {
                let mut seen = FxHashSet::default();
                let labels: Vec<String> = values
                    .iter()
                    .filter(|v| !v.is_empty())
                    .filter(|v| seen.insert(ValueKey::from(*v)))
                    .map(CellValue::display_value)
                    .collect();
                CellValue::Text(labels.join(", "))
            }
            AggregationFn::UniqueCount => {
                let distinct: FxHashSet<ValueKey> = values
                    .iter()
                    .filter(|v| !v.is_empty())
                    .map(ValueKey::from)
                    .collect();
                CellValue::Number(distinct.len() as f64)
            }
            AggregationFn::Custom(f) => f(values),
            numeric => {
                let summary = NumericSummary::of(values);
                let result = match numeric {
                    AggregationFn::Sum => Some(summary.sum),
                    AggregationFn::CountNumbers => Some(summary.n as f64),
                    AggregationFn::Average => summary.nonempty(summary.sum / summary.n as f64),
                    AggregationFn::Min => summary.nonempty(summary.min),
                    AggregationFn::Max => summary.nonempty(summary.max),
                    AggregationFn::Product => summary.nonempty(summary.product),
                    AggregationFn::Var => summary.variance(true),
                    AggregationFn::VarP => summary.variance(false),
                    AggregationFn::StdDev => summary.variance(true).map(f64::sqrt),
                    AggregationFn::StdDevP => summary.variance(false).map(f64::sqrt),
                    _ => None,
                };
                result.map_or(CellValue::Empty, CellValue::Number)
            }
        }
    }
}

impl fmt::Debug for AggregationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationFn::Sum => f.write_str("Sum"),
            AggregationFn::Count => f.write_str("Count"),
            AggregationFn::CountNumbers => f.write_str("CountNumbers"),
            AggregationFn::Average => f.write_str("Average"),
            AggregationFn::Min => f.write_str("Min"),
            AggregationFn::Max => f.write_str("Max"),
            AggregationFn::Extent => f.write_str("Extent"),
            AggregationFn::Median => f.write_str("Median"),
            AggregationFn::Product => f.write_str("Product"),
            AggregationFn::StdDev => f.write_str("StdDev"),
            AggregationFn::StdDevP => f.write_str("StdDevP"),
            AggregationFn::Var => f.write_str("Var"),
            AggregationFn::VarP => f.write_str("VarP"),
            AggregationFn::Unique => f.write_str("Unique"),
            AggregationFn::UniqueCount => f.write_str("UniqueCount"),
            AggregationFn::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn median(values: &[CellValue]) -> CellValue {
    let mut numbers: Vec<f64> = values
        .iter()
        .filter_map(CellValue::as_f64)
        .filter(|n| !n.is_nan())
        .collect();
    if numbers.is_empty() {
        return CellValue::Empty;
    }
    numbers.sort_by(|a, b| a.total_cmp(b));
    let mid = numbers.len() / 2;
    if numbers.len() % 2 == 0 {
        CellValue::Number((numbers[mid - 1] + numbers[mid]) / 2.0)
    } else {
        CellValue::Number(numbers[mid])
    }
}

// ============================================================================
// EXTERNAL PROVIDER
// ============================================================================

/// External aggregation collaborator keyed by column id.
/// Returning `None` defers to the column's own `AggregationFn`.
pub trait AggregationProvider {
    fn aggregate(&self, column_id: &str, leaf_values: &[CellValue]) -> Option<CellValue>;
}

// ============================================================================
// NUMERIC SUMMARY
// ============================================================================

/// Single pass over the numeric leaf values. Text, booleans, Empty and NaN
/// are skipped. Variance uses Welford's update.
struct NumericSummary {
    n: usize,
    sum: f64,
    product: f64,
    min: f64,
    max: f64,
    mean: f64,
    m2: f64,
}

impl NumericSummary {
    fn of(values: &[CellValue]) -> Self {
        let mut summary = NumericSummary {
            n: 0,
            sum: 0.0,
            product: 1.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            mean: 0.0,
            m2: 0.0,
        };
        for x in values.iter().filter_map(CellValue::as_f64).filter(|x| !x.is_nan()) {
            summary.push(x);
        }
        summary
    }

    fn push(&mut self, x: f64) {
        self.n += 1;
        self.sum += x;
        self.product *= x;
        self.min = self.min.min(x);
        self.max = self.max.max(x);

        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// None when there is nothing to summarize.
    fn nonempty(&self, value: f64) -> Option<f64> {
        (self.n > 0).then_some(value)
    }

    fn variance(&self, sample: bool) -> Option<f64> {
        let divisor = if sample { self.n.checked_sub(1)? } else { self.n };
        (divisor > 0).then(|| self.m2 / divisor as f64)
    }
}
