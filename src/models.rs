use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level query response (`f=json`): `{ "features": [ { "attributes": {...} } ] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureSet {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub attributes: Attributes,
}

/// Raw attribute mapping of one feature. Only the eight fields the dashboard
/// uses are kept; everything else in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attributes {
    #[serde(rename = "Country_Region", default)]
    pub country: Option<String>,
    #[serde(rename = "Province_State", default)]
    pub region: Option<String>,
    #[serde(rename = "Lat", default)]
    pub lat: Option<f64>,
    #[serde(rename = "Long_", default)]
    pub lon: Option<f64>,
    #[serde(rename = "Confirmed", default, deserialize_with = "de_opt_count")]
    pub confirmed: Option<i64>,
    #[serde(rename = "Deaths", default, deserialize_with = "de_opt_count")]
    pub deaths: Option<i64>,
    #[serde(rename = "Recovered", default, deserialize_with = "de_opt_count")]
    pub recovered: Option<i64>,
    /// Epoch milliseconds. Kept as raw JSON so a textual value can be
    /// reported precisely instead of failing inside serde.
    #[serde(rename = "Last_Update", default)]
    pub last_update: Option<Value>,
}

/// Serde helper: parse an optional count from an integer, a float (truncated) or null.
fn de_opt_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "an integer, a float or null")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            i64::try_from(v).map(Some).map_err(E::custom)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let t = v.trunc();
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            if !t.is_finite() || t < i64::MIN as f64 || t >= i64::MAX as f64 {
                return Err(E::custom(format!("count {v} does not fit in i64")));
            }
            Ok(Some(t as i64))
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// Cleaned row: one per feature that carries a last-update timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseRecord {
    pub country: String,
    /// Province/state; empty when the feed has none.
    pub region: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub last_update: NaiveDate,
}

impl CaseRecord {
    /// Value of the given metric for this row.
    pub fn metric(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Recovered => self.recovered,
            Metric::Deaths => self.deaths,
        }
    }

    /// Map coordinates as `(lon, lat)`, if both are present.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => Some((lon, lat)),
            _ => None,
        }
    }
}

/// Per-country sums of the three metrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryTotals {
    pub country: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

impl CountryTotals {
    /// Summed value of the given metric for this country.
    pub fn metric(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Recovered => self.recovered,
            Metric::Deaths => self.deaths,
        }
    }
}

/// Sums over every cleaned record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalTotals {
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

impl GlobalTotals {
    /// Worldwide value of the given metric.
    pub fn metric(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Recovered => self.recovered,
            Metric::Deaths => self.deaths,
        }
    }
}

/// The three case metrics shown on the dashboard, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Confirmed,
    Recovered,
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Recovered, Metric::Deaths];

    /// Display label used for indicators, bar series and the legend.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed Cases",
            Metric::Recovered => "Recovered Cases",
            Metric::Deaths => "Deaths Cases",
        }
    }

    /// Bar color as an RGB triple (yellow / green / crimson).
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Metric::Confirmed => (255, 255, 0),
            Metric::Recovered => (0, 128, 0),
            Metric::Deaths => (220, 20, 60),
        }
    }
}

/// Top entries for one metric, descending by value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopNRanking {
    pub metric: Metric,
    pub entries: Vec<(String, i64)>,
}

impl TopNRanking {
    pub fn countries(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the aggregation stage produces for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub countries: Vec<CountryTotals>,
    pub global: GlobalTotals,
    pub top_confirmed: TopNRanking,
    pub top_recovered: TopNRanking,
    pub top_deaths: TopNRanking,
}

impl Summary {
    /// Rankings in panel order (confirmed, recovered, deaths).
    pub fn rankings(&self) -> [&TopNRanking; 3] {
        [&self.top_confirmed, &self.top_recovered, &self.top_deaths]
    }
}
