//! Flatten the raw feature document into cleaned [`CaseRecord`] rows.

use crate::models::{Attributes, CaseRecord, FeatureSet};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

/// Why a feature document could not be turned into records.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("feature {index}: Last_Update is not numeric ({value})")]
    NonNumericTimestamp { index: usize, value: Value },

    #[error("feature {index}: Last_Update {millis} ms is out of range")]
    TimestampOutOfRange { index: usize, millis: f64 },

    #[error("feature {index}: Country_Region is missing")]
    MissingCountry { index: usize },
}

/// Extract, select and clean one record per feature.
///
/// - rows without `Last_Update` (missing or null) are dropped
/// - a missing `Province_State` becomes `""`
/// - null counts become `0`
/// - `Last_Update` (epoch ms) is truncated to whole seconds and converted to a UTC date
///
/// Any textual timestamp fails the whole document; there is no lenient parsing.
pub fn records_from_json(doc: &Value) -> Result<Vec<CaseRecord>, TransformError> {
    let set = FeatureSet::deserialize(doc)?;
    let total = set.features.len();

    let mut out = Vec::with_capacity(total);
    for (index, feature) in set.features.into_iter().enumerate() {
        if let Some(rec) = clean(index, feature.attributes)? {
            out.push(rec);
        }
    }

    log::debug!(
        "transform: {} features, {} records kept, {} dropped without Last_Update",
        total,
        out.len(),
        total - out.len()
    );
    Ok(out)
}

fn clean(index: usize, attrs: Attributes) -> Result<Option<CaseRecord>, TransformError> {
    let raw_ts = match attrs.last_update {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };
    let last_update = epoch_millis_to_date(index, &raw_ts)?;
    let country = attrs
        .country
        .ok_or(TransformError::MissingCountry { index })?;

    Ok(Some(CaseRecord {
        country,
        region: attrs.region.unwrap_or_default(),
        lat: attrs.lat,
        lon: attrs.lon,
        confirmed: attrs.confirmed.unwrap_or(0),
        deaths: attrs.deaths.unwrap_or(0),
        recovered: attrs.recovered.unwrap_or(0),
        last_update,
    }))
}

/// Epoch milliseconds → calendar date (UTC). Sub-second precision is discarded.
///
/// The date is taken in UTC, not the host's local zone, so a timestamp near
/// midnight can land on a different day than a local-time conversion would give.
pub fn millis_to_date(millis: f64) -> Option<NaiveDate> {
    if !millis.is_finite() {
        return None;
    }
    let secs = (millis / 1000.0).trunc();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(secs as i64, 0).map(|dt| dt.date_naive())
}

fn epoch_millis_to_date(index: usize, raw: &Value) -> Result<NaiveDate, TransformError> {
    let millis = match raw {
        Value::Number(n) => match n.as_i64() {
            Some(i) => return date_from_int_millis(index, i),
            None => n.as_f64(),
        },
        _ => None,
    };
    let millis = millis.ok_or_else(|| TransformError::NonNumericTimestamp {
        index,
        value: raw.clone(),
    })?;
    millis_to_date(millis).ok_or(TransformError::TimestampOutOfRange { index, millis })
}

// Integer path keeps full precision for large millisecond values.
fn date_from_int_millis(index: usize, millis: i64) -> Result<NaiveDate, TransformError> {
    DateTime::from_timestamp(millis / 1000, 0)
        .map(|dt| dt.date_naive())
        .ok_or(TransformError::TimestampOutOfRange {
            index,
            millis: millis as f64,
        })
}
