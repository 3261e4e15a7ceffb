//! Data layer: schema, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!   CO2 Emissions_Canada.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + rename columns → Dataset (cached per path)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<Record>, distinct labels per filter column
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSelection → FilteredView (row indices)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ aggregate │  count, mean, frequency table, histogram
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
