//! Descriptive statistics per numeric column, in the layout of `DataFrame.describe()`.

use serde::Serialize;

use crate::data::model::{NumericField, Record};

/// Summary of one numeric column. Undefined statistics are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: NumericField,
    /// Number of non-null values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Compute the summary of `column` over `records`, skipping nulls.
    pub fn compute(column: NumericField, records: &[Record]) -> Self {
        let mut vals: Vec<f64> = records.iter().filter_map(|r| r.numeric(column)).collect();
        vals.sort_by(f64::total_cmp);

        let count = vals.len();
        if count == 0 {
            return ColumnSummary {
                column,
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = vals.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        ColumnSummary {
            column,
            count,
            mean,
            std,
            min: vals[0],
            q25: quantile(&vals, 0.25),
            median: quantile(&vals, 0.5),
            q75: quantile(&vals, 0.75),
            max: vals[count - 1],
        }
    }
}

/// Linear-interpolation quantile of non-empty sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Summaries for each of `columns`, in order.
pub fn describe(records: &[Record], columns: &[NumericField]) -> Vec<ColumnSummary> {
    columns
        .iter()
        .map(|&column| ColumnSummary::compute(column, records))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn quartiles_interpolate() {
        let records: Vec<Record> = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|&age| record(age, "A", Some(20.0), 0))
            .collect();
        let s = ColumnSummary::compute(NumericField::Age, &records);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q25, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q75, 3.25);
        assert_eq!(s.max, 4.0);
        assert!((s.std - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn nulls_are_skipped() {
        let records = vec![
            record(10.0, "A", Some(20.0), 0),
            record(20.0, "A", None, 0),
            record(30.0, "A", Some(30.0), 1),
        ];
        let s = ColumnSummary::compute(NumericField::Bmi, &records);
        assert_eq!(s.count, 2);
        assert_eq!(s.mean, 25.0);
        assert_eq!(s.median, 25.0);
    }

    #[test]
    fn empty_and_single_value() {
        let s = ColumnSummary::compute(NumericField::Age, &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan() && s.std.is_nan() && s.q25.is_nan() && s.max.is_nan());

        let s = ColumnSummary::compute(NumericField::Age, &[record(42.0, "A", None, 0)]);
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.q75, 42.0);
        assert!(s.std.is_nan());
    }

    #[test]
    fn describe_keeps_column_order() {
        let records = vec![record(10.0, "A", Some(20.0), 1)];
        let cols = [NumericField::Stroke, NumericField::Age];
        let table = describe(&records, &cols);
        assert_eq!(table[0].column, NumericField::Stroke);
        assert_eq!(table[0].mean, 1.0);
        assert_eq!(table[1].column, NumericField::Age);
    }
}
