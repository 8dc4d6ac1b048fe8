use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tracker_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tracker"));
    cmd.env_remove("TRACKER_MAPS_API_KEY").env_remove("RUST_LOG");
    cmd
}

/// Same as `tracker_cmd`, but able to feed stdin.
fn tracker_stdin_cmd() -> assert_cmd::Command {
    assert_cmd::Command::from_std(tracker_cmd())
}

/// Command pointed at an empty config dir and the given endpoint.
fn tracker_at(config: &TempDir, endpoint: &str) -> Command {
    let mut cmd = tracker_cmd();
    cmd.args([
        "-C",
        config.path().to_str().unwrap(),
        "--endpoint",
        endpoint,
        "--timeout-ms",
        "2000",
    ]);
    cmd
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api/clients")
}

async fn serve_clients(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Runs the command off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: Command) -> assert_cmd::assert::Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output.assert()
}

#[test]
fn test_help() {
    tracker_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compressor activity tracker"));
}

#[test]
fn test_version() {
    tracker_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tracker"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tracker-config");

    tracker_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tracker config"));

    assert!(config_path.join("config.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("tracker-config");

    tracker_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    tracker_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_shows_defaults_and_overrides() {
    let temp_dir = TempDir::new().unwrap();

    tracker_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, using defaults"))
        .stdout(predicate::str::contains("http://127.0.0.1:8080/api/clients"))
        .stdout(predicate::str::contains("10000 ms"))
        .stdout(predicate::str::contains("Map API key:      not set"));

    tracker_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "--timeout-ms", "250", "config"])
        .env("TRACKER_MAPS_API_KEY", "secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("250 ms"))
        .stdout(predicate::str::contains("Map API key:      set"))
        .stdout(predicate::str::contains("secret").not());
}

#[test]
fn test_blank_api_key_in_config_file_counts_as_unset() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.toml"), "[map]\napi_key = \"\"\n").unwrap();

    tracker_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Map API key:      not set"));

    tracker_at(&temp_dir, &closed_port_url())
        .arg("map")
        .assert()
        .success()
        .stdout(predicate::str::contains("No map API key configured"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.toml"), "[api\n").unwrap();

    tracker_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_list_falls_back_when_fetch_fails() {
    let temp_dir = TempDir::new().unwrap();

    tracker_at(&temp_dir, &closed_port_url())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Industrial"))
        .stdout(predicate::str::contains("Oceanic Foods"))
        .stdout(predicate::str::contains("Valley Construction"))
        .stdout(predicate::str::contains("3 account(s)"))
        .stderr(predicate::str::contains("built-in sample accounts"));
}

#[test]
fn test_list_search_filters_fallback_rows() {
    let temp_dir = TempDir::new().unwrap();

    tracker_at(&temp_dir, &closed_port_url())
        .args(["list", "--search", "csd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Oceanic Foods"))
        .stdout(predicate::str::contains("Acme Industrial").not())
        .stdout(predicate::str::contains("1 account(s)"));
}

#[test]
fn test_list_search_without_matches() {
    let temp_dir = TempDir::new().unwrap();

    tracker_at(&temp_dir, &closed_port_url())
        .args(["list", "-s", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No client accounts match 'zzz'"));
}

#[tokio::test]
async fn test_list_renders_live_rows_and_filters() {
    let server = serve_clients(json!([{
        "id": "1",
        "name": "Acme",
        "compressorModel": "AS 7",
        "billingAddress": "X",
        "phone": null,
        "email": null,
        "nextMaintenanceDate": null,
        "location": { "lat": 1, "lng": 2 }
    }]))
    .await;
    let temp_dir = TempDir::new().unwrap();
    let endpoint = format!("{}/api/clients", server.uri());

    let mut cmd = tracker_at(&temp_dir, &endpoint);
    cmd.arg("list");
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("N/A"))
        .stdout(predicate::str::contains("1 account(s)"))
        .stderr(predicate::str::contains("built-in").not());

    let mut cmd = tracker_at(&temp_dir, &endpoint);
    cmd.args(["list", "--search", "AS 7"]);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Acme"));
}

#[tokio::test]
async fn test_list_json_outputs_canonical_records() {
    let server = serve_clients(json!({ "clients": [{ "id": 7, "location": { "lat": "x", "lng": 1 } }] })).await;
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = tracker_at(&temp_dir, &format!("{}/api/clients", server.uri()));
    cmd.args(["list", "--json"]);
    let output = run_blocking(cmd).await.success().get_output().stdout.clone();

    let records: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        records,
        json!([{
            "id": "7",
            "name": "Unknown Client",
            "phone": null,
            "email": null,
            "billingAddress": null,
            "compressorModel": "Unknown Model",
            "nextMaintenanceDate": null,
            "location": { "lat": null, "lng": null }
        }])
    );
}

#[test]
fn test_map_shows_center_and_markers() {
    let temp_dir = TempDir::new().unwrap();

    tracker_at(&temp_dir, &closed_port_url())
        .arg("map")
        .assert()
        .success()
        .stdout(predicate::str::contains("No map API key configured"))
        .stdout(predicate::str::contains("Center: 36.2018, -120.0270  (zoom 6)"))
        .stdout(predicate::str::contains("3 marker(s)"));
}

#[test]
fn test_map_select_prints_directions() {
    let temp_dir = TempDir::new().unwrap();

    tracker_at(&temp_dir, &closed_port_url())
        .args(["map", "--select", "ACCT-0003"])
        .env("TRACKER_MAPS_API_KEY", "key")
        .assert()
        .success()
        .stdout(predicate::str::contains("No map API key configured").not())
        .stdout(predicate::str::contains("Valley Construction"))
        .stdout(predicate::str::contains("Phone: —"))
        .stdout(predicate::str::contains(
            "destination=36.7783%2C-119.4179&travelmode=driving",
        ));
}

#[tokio::test]
async fn test_map_without_valid_locations_uses_default_center() {
    let server = serve_clients(json!([{ "id": "a" }])).await;
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = tracker_at(&temp_dir, &format!("{}/api/clients", server.uri()));
    cmd.arg("map");
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Center: 37.7749, -122.4194"))
        .stdout(predicate::str::contains("No clients have a valid location."));

    let mut cmd = tracker_at(&temp_dir, &format!("{}/api/clients", server.uri()));
    cmd.args(["directions", "a"]);
    run_blocking(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("cannot be shown on the map"));
}

#[test]
fn test_directions_for_fallback_client() {
    let temp_dir = TempDir::new().unwrap();

    tracker_at(&temp_dir, &closed_port_url())
        .args(["directions", "ACCT-0001"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "https://www.google.com/maps/dir/?api=1&destination=34.0522%2C-118.2437&travelmode=driving\n",
        ));
}

#[test]
fn test_directions_unknown_client() {
    let temp_dir = TempDir::new().unwrap();

    tracker_at(&temp_dir, &closed_port_url())
        .args(["directions", "ACCT-9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client 'ACCT-9999' not found"));
}

#[test]
fn test_normalize_file() {
    let temp_dir = TempDir::new().unwrap();
    let payload = temp_dir.path().join("payload.json");
    fs::write(
        &payload,
        r#"{"data":[{"id":1,"name":2,"location":{"lat":"33.3","lng":-118.1}}]}"#,
    )
    .unwrap();

    tracker_cmd()
        .args(["normalize", payload.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "1""#))
        .stdout(predicate::str::contains(r#""name": "2""#))
        .stdout(predicate::str::contains(r#""lat": 33.3"#));
}

#[test]
fn test_normalize_stdin_rejects_unknown_shape() {
    tracker_stdin_cmd()
        .arg("normalize")
        .write_stdin(r#"{"foo": 1}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unexpected payload shape"));
}

#[test]
fn test_normalize_rejects_invalid_json() {
    tracker_stdin_cmd()
        .arg("normalize")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}
