//! Filter engine: applies a [`FilterSpec`] to a [`DatasetStore`] and derives
//! the summaries a presentation layer renders.
//!
//! ```text
//!   FilterSpec ──┐
//!                ▼
//!   ┌──────────────┐   validate + filter   ┌──────────────┐
//!   │ DatasetStore │ ─────────────────────▶│ FilteredView │
//!   └──────────────┘                       └──────────────┘
//!                                            │ describe    (per-column stats)
//!                                            │ counts      (category × outcome)
//!                                            │ scatter     (x vs y, by outcome)
//!                                            │ correlation (pairwise Pearson)
//! ```

pub mod correlation;
pub mod counts;
pub mod describe;
pub mod scatter;

use serde::Serialize;

use crate::config::ViewOptions;
use crate::data::filter::{filtered_indices, FilterSpec};
use crate::data::model::{CategoricalField, DatasetStore, NumericField, Record};
use crate::error::InvalidFilterSpecError;

use correlation::CorrelationMatrix;
use counts::CountTable;
use describe::{describe, ColumnSummary};
use scatter::ScatterSeries;

// ---------------------------------------------------------------------------
// FilteredView – the filtered subset and everything derived from it
// ---------------------------------------------------------------------------

/// Result of one [`FilterEngine::apply`] call. Always a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView {
    /// Positions of the retained records in the store.
    pub indices: Vec<usize>,
    /// Retained records, in store order.
    pub records: Vec<Record>,
    pub statistics: Vec<ColumnSummary>,
    pub counts: CountTable,
    pub scatter: ScatterSeries,
    pub correlation: CorrelationMatrix,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count table for a field other than the configured one.
    pub fn count_table(&self, field: CategoricalField) -> CountTable {
        CountTable::compute(field, &self.records)
    }

    pub fn summary(&self, column: NumericField) -> Option<&ColumnSummary> {
        self.statistics.iter().find(|s| s.column == column)
    }
}

// ---------------------------------------------------------------------------
// FilterEngine
// ---------------------------------------------------------------------------

/// Stateless apart from its [`ViewOptions`]; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    options: ViewOptions,
}

impl FilterEngine {
    pub fn new(options: ViewOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Validate `spec` against the store's domains, filter, and compute every derived view.
    pub fn apply(
        &self,
        spec: &FilterSpec,
        store: &DatasetStore,
    ) -> Result<FilteredView, InvalidFilterSpecError> {
        spec.validate(store)?;

        let indices = filtered_indices(store, spec);
        let records: Vec<Record> = indices
            .iter()
            .map(|&i| store.records()[i].clone())
            .collect();
        log::debug!(
            "{} of {} records pass {} categorical and {} range predicates (exclude null bmi: {})",
            records.len(),
            store.len(),
            spec.categories.len(),
            spec.ranges.len(),
            spec.exclude_null_bmi
        );

        let opts = &self.options;
        Ok(FilteredView {
            statistics: describe(&records, &store.numeric_columns()),
            counts: CountTable::compute(opts.count_by, &records),
            scatter: ScatterSeries::compute(opts.scatter_x, opts.scatter_y, &records),
            correlation: CorrelationMatrix::compute(&opts.correlation_columns, &records),
            indices,
            records,
        })
    }
}
