mod common;

use camino::Utf8PathBuf;
use serde_json::Value;

use common::{vectors_response, ScriptedSource};
use ephemfeed::datasets::{
    build_mission_datasets, BodyDef, EncounterWindow, JsonDirSink, MissionSpec,
};
use ephemfeed::series::Window;
use ephemfeed::time::Step;

fn utf8_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir path is UTF-8")
}

fn read_json(path: &Utf8PathBuf) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_full_run_writes_every_dataset_and_manifest() {
    let grid = [2_451_545.0, 2_451_546.0, 2_451_547.0];
    let mission = MissionSpec {
        probe: BodyDef::new("Voyager 2", -32),
        bodies: vec![BodyDef::new("Sun", 10), BodyDef::new("Earth", 399)],
        window: Window::new(2_451_545.0, 2_451_547.0),
        coarse_step: Step::days(1),
        probe_step: Step::days(1),
        coarse_id: "bodies_1d".to_string(),
        probe_id: "probe_1d".to_string(),
        encounters: vec![EncounterWindow {
            id: "probe_flyby_30m".to_string(),
            window: Window::new(2_451_545.0, 2_451_545.5),
            step: Step::minutes(30),
        }],
    };

    let source = ScriptedSource::new(vec![
        vectors_response(&grid),                                   // Sun
        vectors_response(&grid),                                   // Earth
        vectors_response(&grid),                                   // probe
        vectors_response(&[2_451_545.0, 2_451_545.25, 2_451_545.5]), // encounter
    ]);

    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let mut sink = JsonDirSink::new(root.clone()).unwrap();

    build_mission_datasets(&source, &mission, &mut sink).unwrap();

    // one sub-query per body, one for the probe, one for the encounter
    let calls = source.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].0, 10);
    assert_eq!(calls[1].0, 399);
    assert_eq!(calls[2].0, -32);
    assert_eq!(calls[3], (-32, 2_451_545.0, 2_451_545.5));

    let multi = read_json(&root.join("ephemeris/bodies_1d.json"));
    assert_eq!(multi["schema"], "mcs-ephem-multi-v1");
    assert_eq!(multi["t_jd"].as_array().unwrap().len(), 3);
    assert_eq!(multi["objects"]["10"]["name"], "Sun");
    assert_eq!(multi["objects"]["399"]["pv"].as_array().unwrap().len(), 18);
    assert_eq!(multi["meta"]["signature"]["version"], "1.2");

    let probe = read_json(&root.join("ephemeris/probe_1d.json"));
    assert_eq!(probe["schema"], "mcs-ephem-v1");
    assert_eq!(probe["meta"]["object"]["spkid"], -32);
    assert_eq!(probe["pv"].as_array().unwrap().len(), 18);

    let flyby = read_json(&root.join("ephemeris/probe_flyby_30m.json"));
    assert_eq!(flyby["meta"]["window"]["step"], "30 m");
    assert_eq!(flyby["t_jd"].as_array().unwrap().len(), 3);

    let manifest = read_json(&root.join("manifest.json"));
    let ids: Vec<&str> = manifest["datasets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["bodies_1d", "probe_1d", "probe_flyby_30m"]);
}

#[test]
fn test_failed_body_aborts_run_without_manifest() {
    let mission = MissionSpec {
        probe: BodyDef::new("Voyager 2", -32),
        bodies: vec![BodyDef::new("Sun", 10), BodyDef::new("Earth", 399)],
        window: Window::new(2_451_545.0, 2_451_547.0),
        coarse_step: Step::days(1),
        probe_step: Step::days(1),
        coarse_id: "bodies_1d".to_string(),
        probe_id: "probe_1d".to_string(),
        encounters: Vec::new(),
    };

    let broken = ephemfeed::horizons::RawResponse {
        result: Some("Horizons answered with prose instead of a table".to_string()),
        error: None,
        signature: None,
    };
    let source = ScriptedSource::new(vec![
        vectors_response(&[2_451_545.0, 2_451_546.0, 2_451_547.0]),
        broken,
    ]);

    let dir = tempfile::tempdir().unwrap();
    let root = utf8_dir(&dir);
    let mut sink = JsonDirSink::new(root.clone()).unwrap();

    let err = build_mission_datasets(&source, &mission, &mut sink).unwrap_err();
    assert!(matches!(
        err,
        ephemfeed::errors::EphemError::MissingDataBlock { .. }
    ));
    assert!(!root.join("ephemeris/bodies_1d.json").exists());
    assert!(!root.join("manifest.json").exists());
}
