//! View options: which derived views the engine computes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::{CategoricalField, NumericField};
use crate::error::ConfigError;

/// Presentation choices feeding the engine. Defaults follow the dashboard:
/// counts by gender, age against glucose, and the correlation heatmap over
/// age, glucose, BMI and the outcome.
///
/// ```json
/// { "count_by": "smoking_status", "scatter_x": "bmi", "scatter_y": "age" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub count_by: CategoricalField,
    pub correlation_columns: Vec<NumericField>,
    pub scatter_x: NumericField,
    pub scatter_y: NumericField,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            count_by: CategoricalField::Gender,
            correlation_columns: vec![
                NumericField::Age,
                NumericField::AvgGlucoseLevel,
                NumericField::Bmi,
                NumericField::Stroke,
            ],
            scatter_x: NumericField::Age,
            scatter_y: NumericField::AvgGlucoseLevel,
        }
    }
}

impl ViewOptions {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_options_keep_defaults() {
        let opts = ViewOptions::from_json_str(r#"{ "count_by": "Residence_type" }"#).unwrap();
        assert_eq!(opts.count_by, CategoricalField::ResidenceType);
        assert_eq!(opts.correlation_columns, ViewOptions::default().correlation_columns);
        assert_eq!(opts.scatter_y, NumericField::AvgGlucoseLevel);
    }

    #[test]
    fn column_names_match_source() {
        let opts = ViewOptions::from_json_str(
            r#"{ "correlation_columns": ["bmi", "heart_disease"], "scatter_x": "bmi" }"#,
        )
        .unwrap();
        assert_eq!(
            opts.correlation_columns,
            vec![NumericField::Bmi, NumericField::HeartDisease]
        );
        assert_eq!(opts.scatter_x, NumericField::Bmi);
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let err = ViewOptions::from_json_str(r#"{ "count_by": "age" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
