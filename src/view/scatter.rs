use serde::Serialize;

use crate::data::model::{NumericField, Record};

/// One plotted record, coloured by outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub stroke: u8,
}

/// Points for an `x` vs `y` scatter plot. Records with a null in either axis are skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x: NumericField,
    pub y: NumericField,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSeries {
    pub fn compute(x: NumericField, y: NumericField, records: &[Record]) -> Self {
        let points = records
            .iter()
            .filter_map(|r| {
                Some(ScatterPoint {
                    x: r.numeric(x)?,
                    y: r.numeric(y)?,
                    stroke: r.stroke,
                })
            })
            .collect();
        ScatterSeries { x, y, points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn null_axes_are_skipped() {
        let records = vec![
            record(10.0, "A", Some(20.0), 0),
            record(20.0, "A", None, 1),
            record(30.0, "A", Some(25.0), 1),
        ];
        let series = ScatterSeries::compute(NumericField::Age, NumericField::Bmi, &records);
        assert_eq!(
            series.points,
            vec![
                ScatterPoint { x: 10.0, y: 20.0, stroke: 0 },
                ScatterPoint { x: 30.0, y: 25.0, stroke: 1 },
            ]
        );

        let series = ScatterSeries::compute(NumericField::Age, NumericField::AvgGlucoseLevel, &records);
        assert_eq!(series.points.len(), 3);
    }
}
