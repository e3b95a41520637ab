//! The run as an explicit sequence: load → clean → aggregate → render.

use crate::aggregate;
use crate::api::FeatureSource;
use crate::models::{CaseRecord, Summary};
use crate::transform;
use crate::viz::{self, DashboardOptions};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Cleaned records plus everything aggregated from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub records: Vec<CaseRecord>,
    pub summary: Summary,
}

impl Snapshot {
    /// Clean and aggregate an already loaded feature document.
    pub fn from_json(doc: &Value, top_n: usize) -> Result<Self> {
        let records = transform::records_from_json(doc).context("clean features")?;
        let summary = aggregate::summarize(&records, top_n).context("aggregate records")?;
        Ok(Self { records, summary })
    }

    /// Load from `source`, then clean and aggregate.
    pub fn load<S: FeatureSource + ?Sized>(source: &S, top_n: usize) -> Result<Self> {
        let doc = source.load().context("load features")?;
        Self::from_json(&doc, top_n)
    }

    pub fn render(&self, opts: &DashboardOptions) -> Result<String> {
        viz::render_dashboard(&self.records, &self.summary, opts)
    }

    pub fn write_dashboard<P: AsRef<Path>>(&self, opts: &DashboardOptions, out_path: P) -> Result<()> {
        viz::write_dashboard(&self.records, &self.summary, opts, out_path)
    }
}
