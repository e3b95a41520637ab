use cdash_rs::aggregate::{country_totals, global_totals, summarize, top_n};
use cdash_rs::models::{CaseRecord, GlobalTotals, Metric};
use chrono::NaiveDate;

fn rec(country: &str, region: &str, confirmed: i64, deaths: i64, recovered: i64) -> CaseRecord {
    CaseRecord {
        country: country.into(),
        region: region.into(),
        lat: Some(0.0),
        lon: Some(0.0),
        confirmed,
        deaths,
        recovered,
        last_update: NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
    }
}

#[test]
fn two_country_example() {
    let recs = vec![rec("A", "", 5, 0, 0), rec("B", "", 3, 0, 0)];
    let s = summarize(&recs, 10).unwrap();
    assert_eq!(
        s.top_confirmed.entries,
        vec![("A".to_string(), 5), ("B".to_string(), 3)]
    );
    assert_eq!(s.global.confirmed, 8);
}

#[test]
fn provinces_fold_into_one_country_row() {
    let recs = vec![
        rec("China", "Hubei", 100, 4, 50),
        rec("Italy", "", 80, 8, 10),
        rec("China", "Guangdong", 20, 1, 15),
    ];
    let totals = country_totals(&recs).unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].country, "China");
    assert_eq!(
        (totals[0].confirmed, totals[0].deaths, totals[0].recovered),
        (120, 5, 65)
    );
    assert_eq!(totals[1].country, "Italy");
}

#[test]
fn global_totals_equal_sum_of_country_totals() {
    let recs: Vec<CaseRecord> = (0..40)
        .map(|i| rec(&format!("C{}", i % 13), "", i * 7, i % 5, i * 3))
        .collect();
    let totals = country_totals(&recs).unwrap();
    let global = global_totals(&recs).unwrap();
    let summed = totals.iter().fold(GlobalTotals::default(), |mut acc, t| {
        acc.confirmed += t.confirmed;
        acc.deaths += t.deaths;
        acc.recovered += t.recovered;
        acc
    });
    assert_eq!(global, summed);
}

#[test]
fn rankings_are_descending_and_capped() {
    let recs: Vec<CaseRecord> = (0..15)
        .map(|i| rec(&format!("C{:02}", i), "", (i * 37) % 11, i, 15 - i))
        .collect();
    let totals = country_totals(&recs).unwrap();
    for metric in Metric::ALL {
        let r = top_n(&totals, metric, 10);
        assert_eq!(r.metric, metric);
        assert_eq!(r.len(), 10);
        assert!(r.values().windows(2).all(|w| w[0] >= w[1]));
    }

    let few = country_totals(&recs[..3]).unwrap();
    assert_eq!(top_n(&few, Metric::Deaths, 10).len(), 3);
}

#[test]
fn empty_input_gives_zero_totals() {
    let s = summarize(&[], 10).unwrap();
    assert!(s.countries.is_empty());
    assert_eq!(s.global, GlobalTotals::default());
    assert!(s.rankings().iter().all(|r| r.is_empty()));
}

#[test]
fn each_ranking_uses_its_own_metric() {
    let recs = vec![
        rec("A", "", 10, 1, 100),
        rec("B", "", 20, 3, 50),
        rec("C", "", 30, 2, 0),
    ];
    let s = summarize(&recs, 2).unwrap();
    assert_eq!(s.top_confirmed.countries(), vec!["C", "B"]);
    assert_eq!(s.top_recovered.countries(), vec!["A", "B"]);
    assert_eq!(s.top_deaths.countries(), vec!["B", "C"]);
}

#[test]
fn country_sum_past_i64_is_an_error() {
    let big = 9_000_000_000_000_000_000;
    let recs = vec![rec("US", "New York", big, 0, 0), rec("US", "Texas", big, 0, 0)];
    let err = country_totals(&recs).unwrap_err();
    assert_eq!(err.scope, "US");
    assert_eq!(err.metric, Metric::Confirmed);
    assert!(summarize(&recs, 10).is_err());
}

#[test]
fn global_sum_past_i64_is_an_error() {
    let big = 9_000_000_000_000_000_000;
    let recs = vec![rec("A", "", 0, big, 0), rec("B", "", 0, big, 0)];
    // each country fits on its own
    assert_eq!(country_totals(&recs).unwrap().len(), 2);
    let err = global_totals(&recs).unwrap_err();
    assert_eq!(err.metric, Metric::Deaths);
    assert_eq!(err.to_string(), "Deaths Cases total for all countries overflows");
}
