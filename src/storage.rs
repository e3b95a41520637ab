use crate::models::{CaseRecord, CountryTotals};
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save cleaned records as CSV with header.
pub fn save_records_csv<P: AsRef<Path>>(records: &[CaseRecord], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "country",
        "region",
        "lat",
        "lon",
        "confirmed",
        "deaths",
        "recovered",
        "last_update",
    ))?;
    for r in records {
        wtr.serialize((
            &r.country,
            &r.region,
            r.lat,
            r.lon,
            r.confirmed,
            r.deaths,
            r.recovered,
            r.last_update.format("%Y-%m-%d").to_string(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save per-country totals as CSV with header.
pub fn save_totals_csv<P: AsRef<Path>>(totals: &[CountryTotals], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("country", "confirmed", "deaths", "recovered"))?;
    for t in totals {
        wtr.serialize((&t.country, t.confirmed, t.deaths, t.recovered))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_records_json<P: AsRef<Path>>(records: &[CaseRecord], path: P) -> Result<()> {
    save_json(records, path)
}

pub fn save_totals_json<P: AsRef<Path>>(totals: &[CountryTotals], path: P) -> Result<()> {
    save_json(totals, path)
}

/// Pretty JSON array.
fn save_json<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
