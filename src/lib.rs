//! Vehicle CO2 emissions explorer: dataset loading, filtering and aggregation.
//!
//! The desktop shell in `main.rs` binds these entry points to widgets:
//! [`data::loader::DatasetCache::load`], [`data::filter::distinct_values`],
//! [`data::filter::apply_filter`] and [`data::aggregate::aggregate`].

pub mod cli;
pub mod data;
pub mod settings;
