use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const STATE_FILE: &str = ".digi-key_api_state.json";
const CACHE_FILE: &str = ".digi-key_api_parametrics.json";

fn state_doc() -> Value {
    json!({
        "API_CLIENT_ID": "abc",
        "API_SECRET": "s3cret",
        "API_REDIRECT_URI": "https://localhost",
        "LOGIN_NAME": "jane@example.com",
        "LOGIN_PASSWORD": "hunter2",
        "DEBUG": "FALSE",
        "CONTEXT": {}
    })
}

fn home_with(doc: &Value) -> TempDir {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join(STATE_FILE), doc.to_string()).unwrap();
    home
}

fn dkapi(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dkapi").unwrap();
    cmd.env("DKAPI_HOME", home)
        .env("DKAPI_SSO_HOST", "https://sso.example.com")
        .env("DKAPI_SEARCH_URL", "http://127.0.0.1:9/search")
        .env("DKAPI_TIMEOUT_SECS", "5")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn new_auth_step1_prints_the_authorization_url() {
    let home = home_with(&state_doc());

    dkapi(home.path())
        .arg("NEW_AUTH_STEP1")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://sso.example.com/as/authorization.oauth2?",
        ))
        .stdout(predicate::str::contains("response_type=code"))
        .stdout(predicate::str::contains("client_id=abc"))
        .stdout(predicate::str::contains("redirect_uri=https%3A%2F%2Flocalhost"));
}

#[test]
fn legacy_command_name_is_accepted() {
    let home = home_with(&state_doc());

    dkapi(home.path())
        .arg("STR_M1")
        .assert()
        .success()
        .stdout(predicate::str::contains("response_type=code"));
}

#[test]
fn new_auth_step2_prints_the_token_url() {
    let home = home_with(&state_doc());

    dkapi(home.path())
        .args(["NEW_AUTH_STEP2", "-P", "https://localhost/?code=MAGIC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/as/token.oauth2?"))
        .stdout(predicate::str::contains("grant_type=authorization_code"))
        .stdout(predicate::str::contains("code=MAGIC"))
        .stdout(predicate::str::contains("client_secret=s3cret"));
}

#[test]
fn new_auth_step2_requires_a_code() {
    let home = home_with(&state_doc());

    dkapi(home.path())
        .arg("NEW_AUTH_STEP2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("-P"));
}

#[test]
fn debug_noop_saves_state_and_creates_the_cache() {
    let mut doc = state_doc();
    doc["CONTEXT"]["ACCESS_TOKEN"] = json!("tok");
    doc["NOTES"] = json!("kept");
    let home = home_with(&doc);

    dkapi(home.path())
        .arg("DEBUG_NOOP")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let saved = fs::read_to_string(home.path().join(STATE_FILE)).unwrap();
    assert!(saved.contains("\n    \"API_CLIENT_ID\": \"abc\""));
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved, doc);

    let cache: Value =
        serde_json::from_str(&fs::read_to_string(home.path().join(CACHE_FILE)).unwrap()).unwrap();
    assert_eq!(cache, json!({}));
}

#[test]
fn missing_password_is_a_config_error() {
    let mut doc = state_doc();
    doc.as_object_mut().unwrap().remove("LOGIN_PASSWORD");
    let home = home_with(&doc);

    dkapi(home.path())
        .arg("DEBUG_NOOP")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOGIN_PASSWORD"));

    assert!(!home.path().join(CACHE_FILE).exists());
}

#[test]
fn missing_state_file_fails() {
    let home = tempfile::tempdir().unwrap();

    dkapi(home.path())
        .arg("DEBUG_NOOP")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load state/config file"));
}

#[test]
fn part_search_without_part_fails_and_does_not_save() {
    let home = home_with(&state_doc());
    let before = fs::read_to_string(home.path().join(STATE_FILE)).unwrap();

    dkapi(home.path())
        .arg("PART_SEARCH")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PART_SEARCH"));

    let after = fs::read_to_string(home.path().join(STATE_FILE)).unwrap();
    assert_eq!(before, after);
    assert!(!home.path().join(CACHE_FILE).exists());
}

#[test]
fn part_search_network_failure_prints_null() {
    let mut doc = state_doc();
    doc["CONTEXT"]["ACCESS_TOKEN"] = json!("tok");
    let home = home_with(&doc);

    dkapi(home.path())
        .args(["PART_SEARCH", "-P", "bad-part", "-C", "1"])
        .assert()
        .success()
        .stdout("null\n")
        .stderr(predicate::str::contains("Part search failed"));
}

#[test]
fn zero_count_is_rejected() {
    let home = home_with(&state_doc());

    dkapi(home.path())
        .args(["PART_SEARCH", "-P", "LM555CN", "-C", "0"])
        .assert()
        .failure();
}

#[test]
fn invalid_endpoint_override_fails() {
    let home = home_with(&state_doc());

    dkapi(home.path())
        .env("DKAPI_SSO_HOST", "not a url")
        .arg("NEW_AUTH_STEP1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL"));
}

#[test]
fn token_exchange_network_failure_hides_the_client_secret() {
    let home = home_with(&state_doc());
    let before = fs::read_to_string(home.path().join(STATE_FILE)).unwrap();

    dkapi(home.path())
        .env("DKAPI_SSO_HOST", "http://127.0.0.1:9")
        .args(["PERFORM_AUTH_STEP2", "-P", "MAGIC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP transport error"))
        .stderr(predicate::str::contains("s3cret").not())
        .stderr(predicate::str::contains("client_secret").not());

    let after = fs::read_to_string(home.path().join(STATE_FILE)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn legacy_single_dash_flags_are_accepted() {
    let mut doc = state_doc();
    doc["CONTEXT"]["ACCESS_TOKEN"] = json!("tok");
    let home = home_with(&doc);

    dkapi(home.path())
        .args(["PART_SEARCH", "-P", "bad-part", "-Jc", "-rmMl", "-rmPp", "-rmPd"])
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn saved_state_has_sorted_keys() {
    let mut doc = state_doc();
    doc["NOTES"] = json!("kept");
    let home = home_with(&doc);

    dkapi(home.path()).arg("DEBUG_NOOP").assert().success();

    let saved = fs::read_to_string(home.path().join(STATE_FILE)).unwrap();
    let keys: Vec<&str> = saved
        .lines()
        .filter(|line| line.starts_with("    \"") && !line.starts_with("        "))
        .filter_map(|line| line.trim().split('"').nth(1))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys.len(), 8);
    assert_eq!(keys, sorted);
}
