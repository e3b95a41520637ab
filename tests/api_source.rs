use cdash_rs::api::{Client, DEFAULT_LAYER_URL, FeatureSource, FileSource};
use cdash_rs::Snapshot;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/features_sample.json")
}

#[test]
fn default_client_targets_case_layer_query() {
    let c = Client::default();
    assert_eq!(c.base_url, DEFAULT_LAYER_URL);
    assert_eq!(
        c.query_url(),
        format!("{}/query?where=1%3D1&outFields=*&outSR=4326&f=json", DEFAULT_LAYER_URL)
    );
}

#[test]
fn file_source_replays_saved_response() {
    let doc = FileSource::new(fixture_path()).load().unwrap();
    assert_eq!(doc["features"].as_array().unwrap().len(), 6);
}

#[test]
fn file_source_surfaces_api_error_payload() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("err.json");
    std::fs::write(
        &p,
        r#"{"error":{"code":499,"message":"Token Required","details":[]}}"#,
    )
    .unwrap();
    let err = FileSource::new(&p).load().unwrap_err();
    assert!(format!("{:#}", err).contains("Token Required"));
}

#[test]
fn non_json_input_is_an_error() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("page.html");
    std::fs::write(&p, "<html>maintenance</html>").unwrap();
    assert!(FileSource::new(&p).load().is_err());
    assert!(Snapshot::load(&FileSource::new(&p), 10).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = FileSource::new(dir.path().join("nope.json")).load().unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}
