//! # stroke-lens
//!
//! Filter-and-projection engine for exploring a stroke health-records table.
//!
//! Load a dataset once, read its domain facts to build a [`FilterSpec`], and
//! call [`FilterEngine::apply`] for a [`FilteredView`]: the matching records
//! plus descriptive statistics, a category-by-outcome count table, a scatter
//! series and a pairwise Pearson correlation matrix.
//!
//! ```no_run
//! use std::path::Path;
//! use stroke_lens::{load_file, CategoricalField, FilterEngine, FilterSpec, NumericField};
//!
//! let store = load_file(Path::new("healthcare-dataset-stroke-data.csv"))?;
//! let spec = FilterSpec::unrestricted(&store)
//!     .with_categories(CategoricalField::SmokingStatus, ["smokes", "formerly smoked"])
//!     .with_range(NumericField::Age, 40.0, 80.0);
//! let view = FilterEngine::default().apply(&spec, &store)?;
//! println!("{} records, age/stroke r = {:?}", view.len(),
//!     view.correlation.get(NumericField::Age, NumericField::Stroke));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod view;

pub use config::ViewOptions;
pub use data::filter::{FilterSpec, NumericRange};
pub use data::loader::load_file;
pub use data::model::{CategoricalField, DatasetStore, DomainFacts, Field, NumericField, Record};
pub use error::{ConfigError, DataSourceError, InvalidFilterSpecError};
pub use view::{FilterEngine, FilteredView};
