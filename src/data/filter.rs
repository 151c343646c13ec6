use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::model::{CategoricalField, DatasetStore, Field, NumericField, Record};
use crate::error::InvalidFilterSpecError;

// ---------------------------------------------------------------------------
// NumericRange – closed interval predicate
// ---------------------------------------------------------------------------

/// Inclusive `[lo, hi]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub lo: f64,
    pub hi: f64,
}

impl NumericRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        NumericRange { lo, hi }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – the full predicate set for one filtering operation
// ---------------------------------------------------------------------------

/// Per-field predicates, combined conjunctively.
///
/// A field with no entry is unrestricted. An empty allowed-value set matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Allowed values per categorical column.
    pub categories: BTreeMap<CategoricalField, BTreeSet<String>>,
    /// Inclusive ranges per numeric column.
    pub ranges: BTreeMap<NumericField, NumericRange>,
    /// Drop records whose BMI is null.
    pub exclude_null_bmi: bool,
}

impl FilterSpec {
    /// Select everything: every categorical value and the full domain of each
    /// filterable numeric column. Null BMI records are excluded, as the
    /// dashboard does by default.
    pub fn unrestricted(store: &DatasetStore) -> Self {
        let categories = CategoricalField::ALL
            .iter()
            .map(|&f| (f, store.categories(f).clone()))
            .collect();
        let ranges = NumericField::FILTERABLE
            .iter()
            .filter_map(|&f| {
                let (lo, hi) = store.numeric_domain(f).range?;
                Some((f, NumericRange::new(lo, hi)))
            })
            .collect();

        FilterSpec {
            categories,
            ranges,
            exclude_null_bmi: true,
        }
    }

    pub fn with_categories<I, S>(mut self, field: CategoricalField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .insert(field, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_range(mut self, field: NumericField, lo: f64, hi: f64) -> Self {
        self.ranges.insert(field, NumericRange::new(lo, hi));
        self
    }

    pub fn with_exclude_null_bmi(mut self, exclude: bool) -> Self {
        self.exclude_null_bmi = exclude;
        self
    }

    /// Like [`with_categories`](Self::with_categories) with the field given by
    /// its source column name.
    pub fn with_categories_named<I, S>(self, name: &str, values: I) -> Result<Self, InvalidFilterSpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match name.parse::<Field>()? {
            Field::Categorical(field) => Ok(self.with_categories(field, values)),
            Field::Numeric(_) => Err(InvalidFilterSpecError::WrongKind {
                field: name.to_string(),
                expected: "categorical",
            }),
        }
    }

    pub fn with_range_named(self, name: &str, lo: f64, hi: f64) -> Result<Self, InvalidFilterSpecError> {
        match name.parse::<Field>()? {
            Field::Numeric(field) => Ok(self.with_range(field, lo, hi)),
            Field::Categorical(_) => Err(InvalidFilterSpecError::WrongKind {
                field: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    /// Check every range against the store's domain facts. Bounds are never clamped.
    pub fn validate(&self, store: &DatasetStore) -> Result<(), InvalidFilterSpecError> {
        for (&field, range) in &self.ranges {
            if !range.lo.is_finite() || !range.hi.is_finite() {
                return Err(InvalidFilterSpecError::NonFiniteBound { field });
            }
            if range.lo > range.hi {
                return Err(InvalidFilterSpecError::InvertedRange {
                    field,
                    lo: range.lo,
                    hi: range.hi,
                });
            }
            let domain = store.numeric_domain(field);
            if !domain.covers(range.lo, range.hi) {
                return Err(InvalidFilterSpecError::OutOfDomain {
                    field,
                    lo: range.lo,
                    hi: range.hi,
                    domain: domain.range,
                });
            }
        }
        for (field, allowed) in &self.categories {
            let known = store.categories(*field);
            if let Some(unknown) = allowed.iter().find(|v| !known.contains(*v)) {
                log::debug!("{field}: '{unknown}' is not in the dataset and matches nothing");
            }
        }
        Ok(())
    }

    /// Whether a record passes every predicate.
    ///
    /// The null-BMI check runs before the range checks. A null value fails its
    /// range predicate, except that with `exclude_null_bmi` off a null-BMI
    /// record survives any BMI range.
    pub fn matches(&self, record: &Record) -> bool {
        if self.exclude_null_bmi && record.bmi.is_none() {
            return false;
        }
        self.categories
            .iter()
            .all(|(&field, allowed)| allowed.contains(record.category(field)))
            && self
                .ranges
                .iter()
                .all(|(&field, range)| match record.numeric(field) {
                    Some(v) => range.contains(v),
                    None => field == NumericField::Bmi && !self.exclude_null_bmi,
                })
    }
}

/// Return indices of records that pass all predicates, in store order.
pub fn filtered_indices(store: &DatasetStore, spec: &FilterSpec) -> Vec<usize> {
    store
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| spec.matches(record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn store() -> DatasetStore {
        DatasetStore::from_records(vec![
            record(10.0, "A", Some(18.0), 0),
            record(25.0, "B", Some(24.0), 1),
            record(40.0, "A", None, 0),
            record(60.0, "B", Some(33.0), 1),
            record(80.0, "A", Some(45.0), 0),
        ])
    }

    #[test]
    fn default_spec_matches_everything() {
        let store = store();
        let spec = FilterSpec::default();
        assert_eq!(filtered_indices(&store, &spec), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn unrestricted_spec_drops_only_null_bmi() {
        let store = store();
        let spec = FilterSpec::unrestricted(&store);
        assert!(spec.validate(&store).is_ok());
        assert_eq!(filtered_indices(&store, &spec), vec![0, 1, 3, 4]);
        assert_eq!(
            filtered_indices(&store, &spec.with_exclude_null_bmi(false)),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn ranges_are_inclusive() {
        let store = store();
        let spec = FilterSpec::default().with_range(NumericField::Age, 25.0, 60.0);
        assert_eq!(filtered_indices(&store, &spec), vec![1, 2, 3]);
    }

    #[test]
    fn empty_category_set_matches_nothing() {
        let store = store();
        let spec = FilterSpec::default().with_categories(CategoricalField::WorkType, Vec::<String>::new());
        assert!(filtered_indices(&store, &spec).is_empty());
    }

    #[test]
    fn null_bmi_is_exempt_from_bmi_range_unless_excluded() {
        let store = store();
        let spec = FilterSpec::default().with_range(NumericField::Bmi, 20.0, 40.0);
        assert_eq!(filtered_indices(&store, &spec), vec![1, 2, 3]);
        let spec = spec.with_exclude_null_bmi(true);
        assert_eq!(filtered_indices(&store, &spec), vec![1, 3]);
    }

    #[test]
    fn null_supplemental_values_fail_their_range() {
        let mut records = vec![
            record(10.0, "A", Some(18.0), 0),
            record(25.0, "B", Some(24.0), 1),
            record(40.0, "A", Some(30.0), 0),
        ];
        records[0].hypertension = Some(0);
        records[1].hypertension = Some(1);
        let store = DatasetStore::from_records(records);

        let spec = FilterSpec::default().with_range(NumericField::Hypertension, 0.0, 0.0);
        assert!(spec.validate(&store).is_ok());
        assert_eq!(filtered_indices(&store, &spec), vec![0]);

        let spec = FilterSpec::default().with_range(NumericField::Hypertension, 0.0, 1.0);
        assert_eq!(filtered_indices(&store, &spec), vec![0, 1]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let store = store();
        let spec = FilterSpec::default()
            .with_categories(CategoricalField::Gender, ["A"])
            .with_range(NumericField::Age, 30.0, 80.0);
        assert_eq!(filtered_indices(&store, &spec), vec![2, 4]);
    }

    #[test]
    fn named_builders_validate_field_names() {
        let spec = FilterSpec::default()
            .with_categories_named("smoking_status", ["A"])
            .and_then(|s| s.with_range_named("avg_glucose_level", 90.0, 110.0))
            .unwrap();
        assert!(spec.categories.contains_key(&CategoricalField::SmokingStatus));
        assert!(spec.ranges.contains_key(&NumericField::AvgGlucoseLevel));

        assert_eq!(
            FilterSpec::default().with_range_named("weight", 0.0, 1.0).unwrap_err(),
            InvalidFilterSpecError::UnknownField("weight".into())
        );
        assert!(matches!(
            FilterSpec::default().with_range_named("gender", 0.0, 1.0).unwrap_err(),
            InvalidFilterSpecError::WrongKind { expected: "numeric", .. }
        ));
        assert!(matches!(
            FilterSpec::default().with_categories_named("age", ["1"]).unwrap_err(),
            InvalidFilterSpecError::WrongKind { expected: "categorical", .. }
        ));
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        let store = store();

        let inverted = FilterSpec::default().with_range(NumericField::Age, 60.0, 20.0);
        assert!(matches!(
            inverted.validate(&store),
            Err(InvalidFilterSpecError::InvertedRange { .. })
        ));

        let wide = FilterSpec::default().with_range(NumericField::Age, 0.0, 100.0);
        assert_eq!(
            wide.validate(&store),
            Err(InvalidFilterSpecError::OutOfDomain {
                field: NumericField::Age,
                lo: 0.0,
                hi: 100.0,
                domain: Some((10.0, 80.0)),
            })
        );

        let nan = FilterSpec::default().with_range(NumericField::Bmi, f64::NAN, 30.0);
        assert!(matches!(
            nan.validate(&store),
            Err(InvalidFilterSpecError::NonFiniteBound { field: NumericField::Bmi })
        ));

        let absent = FilterSpec::default().with_range(NumericField::Hypertension, 0.0, 1.0);
        assert!(matches!(
            absent.validate(&store),
            Err(InvalidFilterSpecError::OutOfDomain { domain: None, .. })
        ));
    }

    #[test]
    fn unknown_category_values_are_allowed() {
        let store = store();
        let spec = FilterSpec::default().with_categories(CategoricalField::Gender, ["A", "Other"]);
        assert!(spec.validate(&store).is_ok());
        assert_eq!(filtered_indices(&store, &spec), vec![0, 2, 4]);
    }
}
