//! Data layer: schema, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file, check schema → Vec<Record>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ DatasetStore │  records + per-column domain facts
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  FilterSpec predicates → filtered indices
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
