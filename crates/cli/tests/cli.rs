use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_catalog(dir: &TempDir) -> PathBuf {
    let content = r#"[
        {"id": "A", "name": "Smart Speaker", "description": "Room-filling sound, voice control",
         "price": 50, "category": "Electronics", "brand": "Sony"},
        {"id": "B", "name": "Charging Cable", "description": "Braided nylon, fast charge",
         "price": 30, "category": "Accessories", "brand": "Belkin"},
        {"id": "C", "name": "Running Shorts", "description": "Breathable mesh, zip pocket",
         "price": 20, "category": "Sports", "brand": "Nike"},
        {"id": "D", "name": "Desk Lamp", "description": "Warm light, dimmable",
         "price": 45, "category": "Home", "brand": "Ikea"}
    ]"#;
    let path = dir.path().join("products.json");
    fs::write(&path, content).expect("write catalog");
    path
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("product-recs");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("use_mock = true"));
    assert!(content.contains("[catalog]"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# mine").expect("write config");

    let mut cmd = cargo_bin_cmd!("product-recs");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn catalog_validate_fails_on_duplicate_ids() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("products.json");
    fs::write(
        &path,
        r#"[{"id": "x", "name": "One", "price": 1, "category": "Home", "brand": "A"},
            {"id": "x", "name": "Two", "price": 2, "category": "Home", "brand": "B"}]"#,
    )
    .expect("write catalog");

    let mut cmd = cargo_bin_cmd!("product-recs");
    cmd.args(["catalog", "validate", "--catalog"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn catalog_list_filters_by_category() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir);

    let mut cmd = cargo_bin_cmd!("product-recs");
    let output = cmd
        .args(["catalog", "list", "--category", "Sports", "--json", "--catalog"])
        .arg(&catalog)
        .output()
        .expect("run catalog list");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["count"], 1);
    assert_eq!(value["products"][0]["id"], "C");
}

#[test]
fn recommend_outputs_valid_json() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir);

    let mut cmd = cargo_bin_cmd!("product-recs");
    let output = cmd
        .current_dir(dir.path())
        .args(["recommend", "--liked", "A", "--json", "--catalog"])
        .arg(&catalog)
        .output()
        .expect("run recommend");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let ids: Vec<_> = value["recommendations"]
        .as_array()
        .expect("recommendations array")
        .iter()
        .map(|r| r["product"]["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec!["B", "D", "C"]);
}

#[test]
fn recommend_reads_request_file_with_stub_generator() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir);
    let request = dir.path().join("request.json");
    fs::write(
        &request,
        r#"{"preferences": {"priceRange": "25-60"}, "browsing_history": ["A"]}"#,
    )
    .expect("write request");

    let mut cmd = cargo_bin_cmd!("product-recs");
    let output = cmd
        .current_dir(dir.path())
        .env("PRODUCT_RECS__LLM__USE_MOCK", "false")
        .env("PRODUCT_RECS__LLM__PROVIDER", "stub")
        .args(["recommend", "--json", "--request"])
        .arg(&request)
        .arg("--catalog")
        .arg(&catalog)
        .output()
        .expect("run recommend");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let recs = value["recommendations"].as_array().expect("array");
    assert_eq!(recs.len(), 2);
    for rec in recs {
        let price = rec["product"]["price"].as_f64().expect("price");
        assert!((25.0..=60.0).contains(&price));
        assert_ne!(rec["product"]["id"], "A");
    }
}

#[test]
fn doctor_reports_missing_catalog() {
    let dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("product-recs");
    cmd.current_dir(dir.path())
        .env("PRODUCT_RECS__CATALOG__PATH", dir.path().join("absent.json"))
        .args(["doctor", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"overall\": \"error\""));
}

#[test]
fn recommend_fails_on_broken_config_file() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = write_catalog(&dir);
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[server]\nport = \"not a port\"\n").expect("write config");

    let mut cmd = cargo_bin_cmd!("product-recs");
    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["recommend", "--liked", "A", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
