//! # Fintrack Analytics Engine
//!
//! This crate turns a list of dated income and expense transactions into four
//! derived views: descriptive statistics, trend analysis, risk metrics and a
//! short-term forecast.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O, no persistence, no knowledge of the transport.
//!   It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** Every calculator is a free function over an
//!   immutable normalized series. The `AnalyticsEngine` only holds the
//!   configuration and wires normalization to the calculators.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The facade exposing the four operations and a concurrent summary.
//! - `normalizer`, `aggregate`: Validation and bucketing of the input.
//! - `statistics`, `trend`, `risk`, `forecast`: The calculators.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod normalizer;
pub mod report;
pub mod risk;
pub mod series;
pub mod statistics;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, Overrides};
pub use error::AnalyticsError;
pub use report::{
    AnalyticsSummary, ForecastResult, Percentiles, RiskResult, StatisticsResult, TrendResult,
};
