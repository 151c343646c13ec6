//! Pairwise-complete Pearson correlation matrix.

use serde::Serialize;

use crate::data::model::{NumericField, Record};

/// Square matrix of Pearson coefficients, row-major in `columns` order.
/// Undefined entries are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericField>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Each pair uses only the records where both of its columns are non-null.
    pub fn compute(columns: &[NumericField], records: &[Record]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];

        for i in 0..n {
            for j in i..n {
                let (xs, ys): (Vec<f64>, Vec<f64>) = records
                    .iter()
                    .filter_map(|r| Some((r.numeric(columns[i])?, r.numeric(columns[j])?)))
                    .unzip();
                let r = pearson(&xs, &ys);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            columns: columns.to_vec(),
            values,
        }
    }

    /// Coefficient for a column pair, `None` if either column is not in the matrix.
    pub fn get(&self, a: NumericField, b: NumericField) -> Option<f64> {
        let i = self.columns.iter().position(|&c| c == a)?;
        let j = self.columns.iter().position(|&c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Sample Pearson correlation. NaN for fewer than two pairs or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn pearson_known_values() {
        assert!(close(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0));
        assert!(close(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0));
        // x = 1..5, y = [2, 4, 5, 4, 5]: sxy = 6, sxx = 10, syy = 6
        let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]);
        assert!(close(r, 6.0 / 60.0_f64.sqrt()));
    }

    #[test]
    fn pearson_undefined_cases() {
        assert!(pearson(&[], &[]).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn pairs_skip_nulls_independently() {
        let records = vec![
            record(10.0, "A", Some(20.0), 0),
            record(20.0, "A", None, 1),
            record(30.0, "A", Some(30.0), 0),
            record(40.0, "A", Some(40.0), 1),
        ];
        let cols = [NumericField::Age, NumericField::Bmi, NumericField::Stroke];
        let m = CorrelationMatrix::compute(&cols, &records);

        // age/bmi over rows 0, 2, 3 only
        let expected = pearson(&[10.0, 30.0, 40.0], &[20.0, 30.0, 40.0]);
        assert!(close(m.get(NumericField::Age, NumericField::Bmi).unwrap(), expected));
        assert_eq!(m.get(NumericField::Bmi, NumericField::Age), m.get(NumericField::Age, NumericField::Bmi));

        // age/stroke keeps all four rows
        let expected = pearson(&[10.0, 20.0, 30.0, 40.0], &[0.0, 1.0, 0.0, 1.0]);
        assert!(close(m.get(NumericField::Age, NumericField::Stroke).unwrap(), expected));

        assert!(close(m.get(NumericField::Age, NumericField::Age).unwrap(), 1.0));
        assert!(m.get(NumericField::Age, NumericField::Id).is_none());
    }

    #[test]
    fn too_few_rows_yield_nan() {
        let m = CorrelationMatrix::compute(&[NumericField::Age, NumericField::Bmi], &[]);
        assert!(m.values.iter().flatten().all(|v| v.is_nan()));

        let one = [record(10.0, "A", Some(20.0), 0)];
        let m = CorrelationMatrix::compute(&[NumericField::Age, NumericField::Bmi], &one);
        assert!(m.values.iter().flatten().all(|v| v.is_nan()));
    }
}
