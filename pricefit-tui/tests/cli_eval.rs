//! End-to-end tests for the pricefit binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_items() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("items.jsonl");
    let content = r#"{"prompt": "How much does this cost?\n\nKettle\n\nPrice is $", "price": 100.0, "title": "Kettle"}
{"prompt": "How much does this cost?\n\nTelevision\n\nPrice is $", "price": 1000.0, "title": "Television"}
{"prompt": "How much does this cost?\n\nBlender\n\nPrice is $", "price": 500.0, "title": "Blender"}
"#;
    fs::write(&path, content).expect("Failed to write items");
    (dir, path.to_string_lossy().to_string())
}

fn pricefit() -> Command {
    let mut cmd = Command::cargo_bin("pricefit").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("PRICEFIT_SIZE")
        .env_remove("PRICEFIT_PREDICTOR");
    cmd
}

#[test]
fn extract_prints_usd() {
    pricefit()
        .args(["extract", "Price is $1,234.50 great deal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,234.50"));
}

#[test]
fn extract_without_number_prints_zero() {
    pricefit()
        .args(["extract", "no idea"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$0.00"));
}

#[test]
fn tier_of_zero_guess_on_cheap_item() {
    pricefit()
        .args(["tier", "--truth", "50", "--guess", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("orange"));
}

#[test]
fn constant_eval_prints_lines_and_summary() {
    let (_dir, path) = setup_items();
    pricefit()
        .args(["eval", "--data", &path, "-n", "3", "--value", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1: Guess: $100.00 Truth: $100.00 Error: $0.00 SLE: 0.00 Item: Kettle",
        ))
        .stdout(predicate::str::contains(
            "Constant Pricer Error=$433.33",
        ))
        .stdout(predicate::str::contains("Hits=33.3%"));
}

#[test]
fn json_report() {
    let (_dir, path) = setup_items();
    pricefit()
        .args([
            "eval", "--data", &path, "-n", "2", "--value", "100", "--json", "--title", "Flat",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Flat\""))
        .stdout(predicate::str::contains("\"hit_rate\": 0.5"))
        .stdout(predicate::str::contains("Item:").not());
}

#[test]
fn oversized_sample_fails_fast() {
    let (_dir, path) = setup_items();
    pricefit()
        .args(["eval", "--data", &path, "-n", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index out of range"));
}

#[test]
fn top_k_is_limited_to_twenty() {
    let (_dir, path) = setup_items();
    for k in ["0", "21"] {
        pricefit()
            .args(["eval", "--data", &path, "-p", "openai", "--top-k", k])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--top-k"));
    }
}

#[test]
fn top_k_requires_openai() {
    let (_dir, path) = setup_items();
    pricefit()
        .args(["eval", "--data", &path, "-n", "1", "--top-k", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--top-k"));
}
