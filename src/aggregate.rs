use crate::models::{CaseRecord, CountryTotals, GlobalTotals, Metric, Summary, TopNRanking};
use std::collections::BTreeMap;

/// Ranking length used by the dashboard bar charts.
pub const DEFAULT_TOP_N: usize = 10;

/// A sum that no longer fits in `i64`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} total for {scope} overflows", .metric.label())]
pub struct AggregateError {
    /// Country name, or `"all countries"` for the global sum.
    pub scope: String,
    pub metric: Metric,
}

fn add(total: i64, value: i64, metric: Metric, scope: &str) -> Result<i64, AggregateError> {
    total.checked_add(value).ok_or_else(|| AggregateError {
        scope: scope.to_string(),
        metric,
    })
}

/// Sum confirmed/deaths/recovered per country, ordered by country name.
pub fn country_totals(records: &[CaseRecord]) -> Result<Vec<CountryTotals>, AggregateError> {
    let mut groups: BTreeMap<&str, GlobalTotals> = BTreeMap::new();
    for r in records {
        let e = groups.entry(r.country.as_str()).or_default();
        e.confirmed = add(e.confirmed, r.confirmed, Metric::Confirmed, &r.country)?;
        e.deaths = add(e.deaths, r.deaths, Metric::Deaths, &r.country)?;
        e.recovered = add(e.recovered, r.recovered, Metric::Recovered, &r.country)?;
    }
    Ok(groups
        .into_iter()
        .map(|(country, t)| CountryTotals {
            country: country.to_string(),
            confirmed: t.confirmed,
            deaths: t.deaths,
            recovered: t.recovered,
        })
        .collect())
}

/// Sums over every record (each province row counted individually).
pub fn global_totals(records: &[CaseRecord]) -> Result<GlobalTotals, AggregateError> {
    const SCOPE: &str = "all countries";
    records.iter().try_fold(GlobalTotals::default(), |acc, r| {
        Ok(GlobalTotals {
            confirmed: add(acc.confirmed, r.confirmed, Metric::Confirmed, SCOPE)?,
            deaths: add(acc.deaths, r.deaths, Metric::Deaths, SCOPE)?,
            recovered: add(acc.recovered, r.recovered, Metric::Recovered, SCOPE)?,
        })
    })
}

/// The `n` countries with the largest value of `metric`, descending.
///
/// Sorting is stable over the (name-ordered) totals, so equal values keep
/// that order; which of several tied rows survives the cut is not a contract.
pub fn top_n(totals: &[CountryTotals], metric: Metric, n: usize) -> TopNRanking {
    let mut rows: Vec<&CountryTotals> = totals.iter().collect();
    rows.sort_by(|a, b| b.metric(metric).cmp(&a.metric(metric)));
    TopNRanking {
        metric,
        entries: rows
            .into_iter()
            .take(n)
            .map(|t| (t.country.clone(), t.metric(metric)))
            .collect(),
    }
}

/// Run the whole aggregation stage once.
pub fn summarize(records: &[CaseRecord], n: usize) -> Result<Summary, AggregateError> {
    let countries = country_totals(records)?;
    let global = global_totals(records)?;
    let top_confirmed = top_n(&countries, Metric::Confirmed, n);
    let top_recovered = top_n(&countries, Metric::Recovered, n);
    let top_deaths = top_n(&countries, Metric::Deaths, n);
    log::debug!(
        "aggregate: {} records over {} countries, {} confirmed in total",
        records.len(),
        countries.len(),
        global.confirmed
    );
    Ok(Summary {
        countries,
        global,
        top_confirmed,
        top_recovered,
        top_deaths,
    })
}
