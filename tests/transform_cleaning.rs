use cdash_rs::transform::{TransformError, records_from_json};
use chrono::NaiveDate;
use serde_json::json;

fn load_fixture() -> serde_json::Value {
    let text = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/features_sample.json"
    ))
    .unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn fixture_rows_are_cleaned() {
    let recs = records_from_json(&load_fixture()).unwrap();
    // Spain has a null Last_Update and is dropped.
    assert_eq!(recs.len(), 5);
    assert!(recs.iter().all(|r| r.country != "Spain"));

    let italy = &recs[0];
    assert_eq!(italy.country, "Italy");
    assert_eq!(italy.region, "");
    assert_eq!(italy.confirmed, 115_242);
    assert_eq!(italy.last_update, NaiveDate::from_ymd_opt(2020, 4, 2).unwrap());

    let ny = recs.iter().find(|r| r.region == "New York").unwrap();
    assert_eq!(ny.recovered, 0);

    let ship = recs.iter().find(|r| r.country == "Diamond Princess").unwrap();
    assert_eq!(ship.position(), None);
}

#[test]
fn row_without_last_update_is_excluded_even_if_otherwise_valid() {
    let doc = json!({"features": [
        {"attributes": {
            "Country_Region": "A", "Province_State": "P", "Lat": 1.0, "Long_": 2.0,
            "Confirmed": 5, "Deaths": 1, "Recovered": 2
        }},
        {"attributes": {
            "Country_Region": "B", "Lat": 1.0, "Long_": 2.0,
            "Confirmed": 3, "Deaths": 0, "Recovered": 0, "Last_Update": 86_400_000
        }}
    ]});
    let recs = records_from_json(&doc).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].country, "B");
    assert_eq!(recs[0].last_update, NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
}

#[test]
fn empty_feature_list_yields_no_records() {
    let recs = records_from_json(&json!({"features": []})).unwrap();
    assert!(recs.is_empty());
}

#[test]
fn textual_timestamp_fails_the_whole_document() {
    let doc = json!({"features": [
        {"attributes": {"Country_Region": "A", "Last_Update": 1585851186000i64}},
        {"attributes": {"Country_Region": "B", "Last_Update": "2020-04-02"}}
    ]});
    match records_from_json(&doc) {
        Err(TransformError::NonNumericTimestamp { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected NonNumericTimestamp, got {:?}", other),
    }
}

#[test]
fn float_counts_are_truncated_and_extra_fields_ignored() {
    let doc = json!({"features": [
        {"attributes": {
            "OBJECTID": 9, "Active": 1, "Country_Region": "A",
            "Confirmed": 7.9, "Deaths": null, "Last_Update": 0
        }}
    ]});
    let recs = records_from_json(&doc).unwrap();
    assert_eq!(recs[0].confirmed, 7);
    assert_eq!(recs[0].deaths, 0);
    assert_eq!(recs[0].recovered, 0);
}

#[test]
fn float_count_outside_i64_is_rejected() {
    for huge in [1e30, -1e30, 9.3e18] {
        let doc = json!({"features": [
            {"attributes": {"Country_Region": "A", "Confirmed": huge, "Last_Update": 0}}
        ]});
        match records_from_json(&doc) {
            Err(TransformError::Shape(e)) => assert!(e.to_string().contains("does not fit in i64")),
            other => panic!("expected Shape error for {huge}, got {:?}", other),
        }
    }
}

#[test]
fn overflowing_totals_fail_the_snapshot() {
    let doc = json!({"features": [
        {"attributes": {"Country_Region": "A", "Confirmed": 9_000_000_000_000_000_000i64, "Last_Update": 0}},
        {"attributes": {"Country_Region": "A", "Confirmed": 9_000_000_000_000_000_000i64, "Last_Update": 0}}
    ]});
    // cleaning alone is fine; the sum is what overflows
    assert_eq!(records_from_json(&doc).unwrap().len(), 2);
    let err = cdash_rs::Snapshot::from_json(&doc, 10).unwrap_err();
    assert!(
        err.chain().any(|c| c.is::<cdash_rs::AggregateError>()),
        "unexpected error: {err:#}"
    );
}
