//! Shared helpers for running `cf` against a mock platform

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SPACE_GUID: &str = "space-guid";
pub const ORG_GUID: &str = "org-guid";

/// Temporary config directory; removed on drop
pub struct TestConfig {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestConfig {
    pub fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap()
    }
}

/// Profile `test` pointing at `api_url`, targeting my-org / my-space
pub fn targeted_config(api_url: &str) -> TestConfig {
    write_config(&format!(
        r#"
default_profile = "test"

[polling]
interval_ms = 10
timeout_secs = 5

[profiles.test]
api_url = "{api_url}"
username = "admin"
token = "test-token"

[profiles.test.target]
org_name = "my-org"
org_guid = "{ORG_GUID}"
space_name = "my-space"
space_guid = "{SPACE_GUID}"
"#
    ))
}

/// Profile `test` with nothing targeted
pub fn untargeted_config(api_url: &str) -> TestConfig {
    write_config(&format!(
        r#"
default_profile = "test"

[polling]
interval_ms = 10
timeout_secs = 5

[profiles.test]
api_url = "{api_url}"
username = "admin"
token = "test-token"
"#
    ))
}

pub fn write_config(contents: &str) -> TestConfig {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    TestConfig { _dir: dir, path }
}

/// `cf --config-file <config> args...` isolated from the caller's environment
pub fn cf(config: &TestConfig, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("cf").unwrap();
    cmd.env_remove("CF_ACCESS_TOKEN")
        .env_remove("CF_CONFIG_FILE")
        .env_remove("CF_PROFILE")
        .env_remove("RUST_LOG")
        .arg("--config-file")
        .arg(&config.path)
        .args(args);
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving
pub async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn page(resources: Vec<Value>) -> Value {
    json!({
        "pagination": {"total_results": resources.len(), "next": null},
        "resources": resources,
    })
}

pub fn job(state: &str) -> Value {
    json!({
        "guid": "job-1",
        "operation": "service_instance.delete",
        "state": state,
        "errors": [],
        "warnings": []
    })
}

pub fn failed_job(detail: &str) -> Value {
    json!({
        "guid": "job-1",
        "operation": "service_instance.delete",
        "state": "FAILED",
        "errors": [{"code": 10009, "title": "CF-UnprocessableEntity", "detail": detail}],
        "warnings": []
    })
}

pub fn service_instance(guid: &str, name: &str) -> Value {
    json!({
        "guid": guid,
        "name": name,
        "type": "managed",
        "upgrade_available": false,
        "last_operation": {
            "type": "create",
            "state": "succeeded",
            "description": "Operation succeeded"
        }
    })
}

/// `GET /v3/service_instances?names=<name>` answered with `resources`
pub async fn mount_instance_lookup(server: &MockServer, name: &str, resources: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/v3/service_instances"))
        .and(query_param("names", name))
        .and(query_param("space_guids", SPACE_GUID))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(resources)))
        .mount(server)
        .await;
}

/// 202 with a Location pointing at `/v3/jobs/job-1`
pub fn accepted(server: &MockServer) -> ResponseTemplate {
    ResponseTemplate::new(202)
        .insert_header("Location", format!("{}/v3/jobs/job-1", server.uri()).as_str())
}

/// Job answers `first` once, then `then` for every later poll
pub async fn mount_job_sequence(server: &MockServer, first: Value, then: Value) {
    Mock::given(method("GET"))
        .and(path("/v3/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(then))
        .with_priority(2)
        .mount(server)
        .await;
}

/// Job always answers `state`
pub async fn mount_job(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/v3/jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
