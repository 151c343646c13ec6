//! Category-by-outcome count table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{CategoricalField, Record};

/// Record counts for one category value, split by outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub value: String,
    /// Records with `stroke == 0`.
    pub no_stroke: usize,
    /// Records with `stroke == 1`.
    pub stroke: usize,
}

impl CountRow {
    pub fn total(&self) -> usize {
        self.no_stroke + self.stroke
    }
}

/// Rows are the values of `field` present in the records, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountTable {
    pub field: CategoricalField,
    pub rows: Vec<CountRow>,
}

impl CountTable {
    pub fn compute(field: CategoricalField, records: &[Record]) -> Self {
        let mut counts: BTreeMap<&str, [usize; 2]> = BTreeMap::new();
        for r in records {
            let cell = counts.entry(r.category(field)).or_default();
            if r.stroke == 0 {
                cell[0] += 1;
            } else {
                cell[1] += 1;
            }
        }

        let rows = counts
            .into_iter()
            .map(|(value, [no_stroke, stroke])| CountRow {
                value: value.to_string(),
                no_stroke,
                stroke,
            })
            .collect();

        CountTable { field, rows }
    }

    pub fn row(&self, value: &str) -> Option<&CountRow> {
        self.rows.iter().find(|r| r.value == value)
    }

    /// Sum over all cells; equals the number of records counted.
    pub fn total(&self) -> usize {
        self.rows.iter().map(CountRow::total).sum()
    }
}
