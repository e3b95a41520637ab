use cdash_rs::viz::{self, DashboardOptions, Projection};
use cdash_rs::{FileSource, Snapshot};
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture_snapshot() -> Snapshot {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/features_sample.json");
    Snapshot::load(&FileSource::new(path), 10).unwrap()
}

#[test]
fn fixture_snapshot_aggregates() {
    let s = fixture_snapshot();
    assert_eq!(s.records.len(), 5);
    let names: Vec<&str> = s.summary.countries.iter().map(|c| c.country.as_str()).collect();
    assert_eq!(names, vec!["China", "Diamond Princess", "Italy", "US"]);
    assert_eq!(s.summary.global.confirmed, 277_630);
    assert_eq!(s.summary.global.recovered, 83_609);
    assert_eq!(s.summary.global.deaths, 19_500);
    assert_eq!(
        s.summary.top_confirmed.countries(),
        vec!["Italy", "US", "China", "Diamond Princess"]
    );
    assert_eq!(s.summary.top_recovered.values(), vec![64_734, 18_278, 597, 0]);
}

#[test]
fn page_contains_every_panel() {
    let s = fixture_snapshot();
    let html = s.render(&DashboardOptions::default()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Global COVID-19 Cases (Last Updated: 2020-04-02)"));
    // one map + three bar charts
    assert!(html.matches("<svg").count() >= 5);
    // indicators
    assert!(html.contains("277,630"));
    assert!(html.contains("83,609"));
    assert!(html.contains("19,500"));
    for label in ["Confirmed Cases", "Recovered Cases", "Deaths Cases"] {
        assert!(html.contains(label), "missing {label}");
    }
    // bar colors: yellow, green, crimson
    for color in ["#ffff00", "#008000", "#dc143c"] {
        assert!(html.to_lowercase().contains(color), "missing {color}");
    }
    assert!(html.contains("bit.ly/2WUrgoh"));
    // land masses under the markers
    assert!(html.matches("<polygon").count() > 20);
}

#[test]
fn one_hover_target_per_located_record() {
    let s = fixture_snapshot();
    let html = s.render(&DashboardOptions::default()).unwrap();
    // Diamond Princess has no coordinates.
    assert_eq!(html.matches("<title>").count(), 1 + 4);
    assert!(html.contains("Confirmed: 67802"));
    assert!(html.contains("Last updated: 2020-04-01"));
}

#[test]
fn locale_changes_indicator_separators() {
    let s = fixture_snapshot();
    let opts = DashboardOptions {
        locale: "de".into(),
        ..DashboardOptions::default()
    };
    let html = s.render(&opts).unwrap();
    assert!(html.contains("277.630"));
}

#[test]
fn orthographic_hides_far_side_markers() {
    let s = fixture_snapshot();
    let opts = DashboardOptions {
        projection: Projection::Orthographic { lon0: 0.0, lat0: 0.0 },
        ..DashboardOptions::default()
    };
    let map = viz::map::render_map(&s.records, opts.projection, opts.map_size).unwrap();
    // Chinese provinces (112°E, 113°E) are beyond the limb; Italy and New York are not.
    assert_eq!(map.markers.len(), 2);
    assert!(map.markers[0].hover.starts_with("Italy"));
    assert!(map.markers.iter().all(|m| !m.hover.starts_with("China")));
}

#[test]
fn empty_snapshot_still_renders() {
    let s = Snapshot::from_json(&serde_json::json!({"features": []}), 10).unwrap();
    let html = s.render(&DashboardOptions::default()).unwrap();
    assert!(html.contains("Last Updated: unknown"));
    assert!(html.contains("no data"));
}

#[test]
fn write_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("first_figure.html");
    std::fs::write(&out, "stale").unwrap();
    fixture_snapshot()
        .write_dashboard(&DashboardOptions::default(), &out)
        .unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("<!DOCTYPE html>"));
    assert!(!text.contains("stale"));
}
