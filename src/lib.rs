//! Hourly PV yield aggregation.
//!
//! A provider's hourly plane-of-array series goes through
//! [`services::normalizer::normalize`] and then
//! [`services::aggregator::aggregate`], producing an
//! [`models::energy::AggregateReport`] with hourly, daily, weekly, monthly and
//! seasonal tables plus capacity factor and specific yield. The `routes`,
//! `controllers` and `api_docs` modules expose the same pipeline over HTTP.

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;

pub use error::{ConfigError, EngineError};
pub use models::energy::{AggregateReport, EnergyRecord, PeriodSummary, SystemConfig};
pub use services::aggregator::aggregate;
pub use services::normalizer::normalize;
