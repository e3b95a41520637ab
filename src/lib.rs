//! cdash_rs
//!
//! Fetch one snapshot of COVID-19 case data from the ArcGIS feature service,
//! aggregate it by country and render a static HTML dashboard. Pairs with the
//! `cdash` CLI.
//!
//! ### Features
//! - Single-request fetch of the case layer (or replay of a saved response)
//! - Cleaning into typed rows with calendar dates
//! - Per-country and global totals, top-N rankings per metric
//! - Dashboard page: world map, three indicators, three bar charts
//! - Optional CSV or JSON export of records and totals
//!
//! ### Example
//! ```no_run
//! use cdash_rs::{Client, Snapshot};
//! use cdash_rs::viz::DashboardOptions;
//!
//! let snapshot = Snapshot::load(&Client::default(), 10)?;
//! snapshot.write_dashboard(&DashboardOptions::default(), "first_figure.html")?;
//! println!("{:#?}", snapshot.summary.global);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod api;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod transform;
pub mod viz;

pub use aggregate::AggregateError;
pub use api::{Client, FeatureSource, FileSource};
pub use models::{CaseRecord, CountryTotals, GlobalTotals, Metric, Summary, TopNRanking};
pub use pipeline::Snapshot;
pub use transform::TransformError;
