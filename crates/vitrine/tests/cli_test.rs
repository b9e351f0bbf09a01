#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn data_file(&self) -> PathBuf {
        self.dir.path().join("catalog.json")
    }

    fn config_home(&self) -> &Path {
        self.dir.path()
    }

    fn vitrine(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("vitrine"));
        cmd.env("XDG_CONFIG_HOME", self.config_home())
            .env_remove("VITRINE_DATA_FILE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--data-file")
            .arg(self.data_file());
        cmd
    }

    fn tree_json(&self) -> serde_json::Value {
        let output = self.vitrine().args(["tree", "--json"]).output().unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn test_add_category_then_tree_lists_it() {
    let ws = Workspace::new();

    ws.vitrine()
        .args(["category", "add", "Shirts", "shirts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category added: Shirts"));

    ws.vitrine()
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shirts /shirts (0)"));
}

#[test]
fn test_malformed_id_fails_without_touching_the_file() {
    let ws = Workspace::new();

    ws.vitrine()
        .args(["category", "rm", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid category identifier"));

    assert!(!ws.data_file().exists());
}

#[test]
fn test_subcategory_and_attribute_flow() {
    let ws = Workspace::new();
    ws.vitrine()
        .args(["category", "add", "Shirts", "shirts"])
        .assert()
        .success();
    let tree = ws.tree_json();
    let category_id = tree["tree"][0]["id"].as_str().unwrap().to_string();

    ws.vitrine()
        .args(["subcategory", "add", &category_id, "Colour", "color"])
        .assert()
        .success();
    let tree = ws.tree_json();
    let subcategory_id = tree["tree"][0]["subcategories"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    ws.vitrine()
        .args(["attribute", "add", &category_id, &subcategory_id, "Red"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Attribute added to Colour: Red"));

    ws.vitrine()
        .args(["attribute", "add", &category_id, &subcategory_id, "Red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let tree = ws.tree_json();
    let attributes = tree["tree"][0]["subcategories"][0]["attributes"]
        .as_array()
        .unwrap();
    assert_eq!(attributes.len(), 1);
}

#[test]
fn test_products_on_empty_catalog_shows_hint() {
    let ws = Workspace::new();

    ws.vitrine()
        .arg("products")
        .assert()
        .success()
        .stdout(predicate::str::contains("No products yet."));

    ws.vitrine()
        .args(["products", "--search", "tee", "--server"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No products match these filters"));
}

#[test]
fn test_products_rejects_bad_category_filter() {
    let ws = Workspace::new();

    ws.vitrine()
        .args(["products", "--category", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
