use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidFilterSpecError;

// ---------------------------------------------------------------------------
// Schema – the fixed field set of a stroke record
// ---------------------------------------------------------------------------

/// Categorical (string-valued) columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    #[serde(rename = "gender")]
    Gender,
    #[serde(rename = "ever_married")]
    EverMarried,
    #[serde(rename = "work_type")]
    WorkType,
    #[serde(rename = "Residence_type")]
    ResidenceType,
    #[serde(rename = "smoking_status")]
    SmokingStatus,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Gender,
        CategoricalField::EverMarried,
        CategoricalField::WorkType,
        CategoricalField::ResidenceType,
        CategoricalField::SmokingStatus,
    ];

    /// Exact column name in the source table.
    pub fn column(self) -> &'static str {
        match self {
            CategoricalField::Gender => "gender",
            CategoricalField::EverMarried => "ever_married",
            CategoricalField::WorkType => "work_type",
            CategoricalField::ResidenceType => "Residence_type",
            CategoricalField::SmokingStatus => "smoking_status",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Numeric columns, including the binary flags and the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumericField {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "hypertension")]
    Hypertension,
    #[serde(rename = "heart_disease")]
    HeartDisease,
    #[serde(rename = "avg_glucose_level")]
    AvgGlucoseLevel,
    #[serde(rename = "bmi")]
    Bmi,
    #[serde(rename = "stroke")]
    Stroke,
}

impl NumericField {
    /// Source column order.
    pub const ALL: [NumericField; 7] = [
        NumericField::Id,
        NumericField::Age,
        NumericField::Hypertension,
        NumericField::HeartDisease,
        NumericField::AvgGlucoseLevel,
        NumericField::Bmi,
        NumericField::Stroke,
    ];

    /// Fields the dashboard offers range sliders for.
    pub const FILTERABLE: [NumericField; 3] = [
        NumericField::Age,
        NumericField::AvgGlucoseLevel,
        NumericField::Bmi,
    ];

    pub fn column(self) -> &'static str {
        match self {
            NumericField::Id => "id",
            NumericField::Age => "age",
            NumericField::Hypertension => "hypertension",
            NumericField::HeartDisease => "heart_disease",
            NumericField::AvgGlucoseLevel => "avg_glucose_level",
            NumericField::Bmi => "bmi",
            NumericField::Stroke => "stroke",
        }
    }

    /// `id`, `hypertension` and `heart_disease` may be absent from a source.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            NumericField::Age | NumericField::AvgGlucoseLevel | NumericField::Bmi | NumericField::Stroke
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Any column of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Categorical(CategoricalField),
    Numeric(NumericField),
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Categorical(f) => f.column(),
            Field::Numeric(f) => f.column(),
        }
    }
}

impl From<CategoricalField> for Field {
    fn from(f: CategoricalField) -> Self {
        Field::Categorical(f)
    }
}

impl From<NumericField> for Field {
    fn from(f: NumericField) -> Self {
        Field::Numeric(f)
    }
}

impl FromStr for Field {
    type Err = InvalidFilterSpecError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if let Some(f) = CategoricalField::ALL.iter().find(|f| f.column() == name) {
            return Ok(Field::Categorical(*f));
        }
        NumericField::ALL
            .iter()
            .find(|f| f.column() == name)
            .map(|f| Field::Numeric(*f))
            .ok_or_else(|| InvalidFilterSpecError::UnknownField(name.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Column names a source must provide.
pub fn required_columns() -> Vec<&'static str> {
    let mut cols: Vec<&'static str> = CategoricalField::ALL.iter().map(|f| f.column()).collect();
    cols.extend(
        NumericField::ALL
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.column()),
    );
    cols
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single patient record. Serializes with the source column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub gender: String,
    pub age: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypertension: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_disease: Option<u8>,
    pub ever_married: String,
    pub work_type: String,
    #[serde(rename = "Residence_type")]
    pub residence_type: String,
    pub avg_glucose_level: f64,
    /// Body-mass index; `None` where the source has no measurement.
    pub bmi: Option<f64>,
    pub smoking_status: String,
    /// Outcome: 1 if the patient had a stroke.
    pub stroke: u8,
}

impl Record {
    pub fn category(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Gender => &self.gender,
            CategoricalField::EverMarried => &self.ever_married,
            CategoricalField::WorkType => &self.work_type,
            CategoricalField::ResidenceType => &self.residence_type,
            CategoricalField::SmokingStatus => &self.smoking_status,
        }
    }

    /// Numeric value of `field`, `None` when null or absent.
    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Id => self.id.map(|v| v as f64),
            NumericField::Age => Some(self.age),
            NumericField::Hypertension => self.hypertension.map(f64::from),
            NumericField::HeartDisease => self.heart_disease.map(f64::from),
            NumericField::AvgGlucoseLevel => Some(self.avg_glucose_level),
            NumericField::Bmi => self.bmi,
            NumericField::Stroke => Some(f64::from(self.stroke)),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain facts – per-column metadata computed at load time
// ---------------------------------------------------------------------------

/// Range and null count of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericDomain {
    /// `(min, max)` over non-null values; `None` when every value is null.
    pub range: Option<(f64, f64)>,
    pub null_count: usize,
}

impl NumericDomain {
    fn from_values(values: impl Iterator<Item = Option<f64>>) -> Self {
        let mut range: Option<(f64, f64)> = None;
        let mut null_count = 0;
        for v in values {
            match v {
                Some(v) => {
                    range = Some(match range {
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                        None => (v, v),
                    });
                }
                None => null_count += 1,
            }
        }
        NumericDomain { range, null_count }
    }

    pub fn min(&self) -> Option<f64> {
        self.range.map(|(lo, _)| lo)
    }

    pub fn max(&self) -> Option<f64> {
        self.range.map(|(_, hi)| hi)
    }

    /// Whether `[lo, hi]` lies inside the observed range.
    pub fn covers(&self, lo: f64, hi: f64) -> bool {
        match self.range {
            Some((min, max)) => lo >= min && hi <= max,
            None => false,
        }
    }
}

/// Domain facts for one column, borrowed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainFacts<'a> {
    Categorical { values: &'a BTreeSet<String> },
    Numeric(&'a NumericDomain),
}

// ---------------------------------------------------------------------------
// DatasetStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable record table with pre-computed column domains.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    records: Vec<Record>,
    categories: [BTreeSet<String>; 5],
    numeric: [NumericDomain; 7],
}

impl DatasetStore {
    /// Build column domains from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let categories = CategoricalField::ALL.map(|field| {
            records
                .iter()
                .map(|r| r.category(field).to_string())
                .collect::<BTreeSet<String>>()
        });
        let numeric = NumericField::ALL
            .map(|field| NumericDomain::from_values(records.iter().map(|r| r.numeric(field))));

        DatasetStore {
            records,
            categories,
            numeric,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn domain(&self, field: impl Into<Field>) -> DomainFacts<'_> {
        match field.into() {
            Field::Categorical(f) => DomainFacts::Categorical {
                values: self.categories(f),
            },
            Field::Numeric(f) => DomainFacts::Numeric(self.numeric_domain(f)),
        }
    }

    /// Look up domain facts by source column name.
    pub fn domain_by_name(&self, name: &str) -> Result<DomainFacts<'_>, InvalidFilterSpecError> {
        let field: Field = name.parse()?;
        Ok(self.domain(field))
    }

    /// Sorted distinct values of a categorical column.
    pub fn categories(&self, field: CategoricalField) -> &BTreeSet<String> {
        &self.categories[field.index()]
    }

    pub fn numeric_domain(&self, field: NumericField) -> &NumericDomain {
        &self.numeric[field.index()]
    }

    /// Numeric columns carrying data: the required ones plus any optional
    /// column with at least one value.
    pub fn numeric_columns(&self) -> Vec<NumericField> {
        NumericField::ALL
            .into_iter()
            .filter(|f| f.is_required() || self.numeric_domain(*f).range.is_some())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Record with every categorical field set to `category`.
    pub(crate) fn record(age: f64, category: &str, bmi: Option<f64>, stroke: u8) -> Record {
        Record {
            id: None,
            gender: category.to_string(),
            age,
            hypertension: None,
            heart_disease: None,
            ever_married: category.to_string(),
            work_type: category.to_string(),
            residence_type: category.to_string(),
            avg_glucose_level: 100.0,
            bmi,
            smoking_status: category.to_string(),
            stroke,
        }
    }

    #[test]
    fn field_names_round_trip() {
        for f in CategoricalField::ALL {
            assert_eq!(f.column().parse::<Field>().unwrap(), Field::Categorical(f));
        }
        for f in NumericField::ALL {
            assert_eq!(f.column().parse::<Field>().unwrap(), Field::Numeric(f));
        }
        assert_eq!(
            "residence_type".parse::<Field>().unwrap_err(),
            InvalidFilterSpecError::UnknownField("residence_type".into())
        );
    }

    #[test]
    fn required_columns_cover_schema() {
        let cols = required_columns();
        assert_eq!(cols.len(), 9);
        assert!(cols.contains(&"Residence_type"));
        assert!(cols.contains(&"bmi"));
        assert!(!cols.contains(&"id"));
    }

    #[test]
    fn domains_ignore_nulls() {
        let store = DatasetStore::from_records(vec![
            record(10.0, "A", Some(22.5), 0),
            record(80.0, "B", None, 1),
            record(40.0, "A", Some(31.0), 0),
        ]);

        let bmi = store.numeric_domain(NumericField::Bmi);
        assert_eq!(bmi.range, Some((22.5, 31.0)));
        assert_eq!(bmi.null_count, 1);

        assert_eq!(store.numeric_domain(NumericField::Age).range, Some((10.0, 80.0)));

        let genders: Vec<&str> = store
            .categories(CategoricalField::Gender)
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(genders, vec!["A", "B"]);
    }

    #[test]
    fn absent_optional_columns_are_all_null() {
        let store = DatasetStore::from_records(vec![record(10.0, "A", Some(20.0), 0)]);
        let dom = store.numeric_domain(NumericField::Hypertension);
        assert_eq!(dom.range, None);
        assert_eq!(dom.null_count, 1);
        assert_eq!(
            store.numeric_columns(),
            vec![
                NumericField::Age,
                NumericField::AvgGlucoseLevel,
                NumericField::Bmi,
                NumericField::Stroke
            ]
        );
    }

    #[test]
    fn domain_lookup_is_stable() {
        let store = DatasetStore::from_records(vec![
            record(10.0, "A", Some(20.0), 0),
            record(30.0, "B", Some(25.0), 1),
        ]);
        let first = store.domain(NumericField::Age);
        let second = store.domain_by_name("age").unwrap();
        assert_eq!(first, second);
        assert!(matches!(
            store.domain_by_name("work_type").unwrap(),
            DomainFacts::Categorical { values } if values.len() == 2
        ));
        assert!(store.domain_by_name("weight").is_err());
    }

    #[test]
    fn empty_store_has_no_ranges() {
        let store = DatasetStore::from_records(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.numeric_domain(NumericField::Age).range, None);
        assert!(!store.numeric_domain(NumericField::Age).covers(0.0, 1.0));
    }
}
