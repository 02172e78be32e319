//! Integration tests for the set-context and synth binaries

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const SCAFFOLD: &str = r#"{
    "watch": {
        "include": ["**"]
    },
    "context": {
        "service_name": "sample-ms",
        "stack_name": "SampleMsStack",
        "include_dynamodb": "false",
        "include_sqs": "false"
    }
}"#;

fn scaffold() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cdk.json"), SCAFFOLD).unwrap();
    dir
}

fn set_context(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("set-context").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

fn context(dir: &TempDir) -> Value {
    let text = fs::read_to_string(dir.path().join("cdk.json")).unwrap();
    serde_json::from_str::<Value>(&text).unwrap()["context"].clone()
}

#[test]
fn shows_status_without_arguments() {
    let dir = scaffold();

    set_context(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Service Name:  sample-ms"))
        .stdout(predicate::str::contains("Stack Name:    SampleMsStack"))
        .stdout(predicate::str::contains("DynamoDB:      DISABLED"));
}

#[test]
fn missing_document_is_fatal() {
    let dir = TempDir::new().unwrap();

    set_context(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn unparsable_document_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cdk.json"), "{ broken").unwrap();

    set_context(&dir)
        .args(["include_sqs", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Is it valid JSON?"));

    assert_eq!(fs::read_to_string(dir.path().join("cdk.json")).unwrap(), "{ broken");
}

#[test]
fn init_then_refuse_second_init() {
    let dir = scaffold();

    set_context(&dir)
        .args(["init", "order-api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service initialized"));

    assert_eq!(context(&dir)["service_name"], "order-api");
    assert_eq!(context(&dir)["stack_name"], "OrderApiStack");

    set_context(&dir)
        .args(["init", "billing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already set to 'order-api'"));

    assert_eq!(context(&dir)["service_name"], "order-api");
    assert!(fs::read_to_string(dir.path().join("cdk.json"))
        .unwrap()
        .contains("\"watch\": {"));
}

#[test]
fn init_requires_a_name() {
    let dir = scaffold();

    set_context(&dir)
        .args(["init", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-empty service name"));

    assert_eq!(fs::read_to_string(dir.path().join("cdk.json")).unwrap(), SCAFFOLD);
}

#[test]
fn sets_flags_idempotently() {
    let dir = scaffold();

    set_context(&dir)
        .args(["include_sqs", "yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set 'include_sqs' to 'true'"));

    assert_eq!(context(&dir)["include_sqs"], "true");
    let written = fs::read_to_string(dir.path().join("cdk.json")).unwrap();

    set_context(&dir)
        .args(["include_sqs", "TRUE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No change needed"));

    assert_eq!(fs::read_to_string(dir.path().join("cdk.json")).unwrap(), written);
}

#[test]
fn unknown_values_disable_the_flag() {
    let dir = scaffold();

    set_context(&dir)
        .args(["include_dynamodb", "enabled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already set to 'false'"));

    set_context(&dir).args(["include_dynamodb", "1"]).assert().success();
    assert_eq!(context(&dir)["include_dynamodb"], "true");
}

#[test]
fn other_shapes_print_usage() {
    let dir = scaffold();

    for args in [vec!["init"], vec!["include_sqs"], vec!["a", "b", "c"]] {
        set_context(&dir)
            .args(&args)
            .assert()
            .failure()
            .stdout(predicate::str::contains("Usage:"));
    }

    assert_eq!(fs::read_to_string(dir.path().join("cdk.json")).unwrap(), SCAFFOLD);
}

#[test]
fn explicit_config_path() {
    let dir = scaffold();
    let path = dir.path().join("cdk.json");

    Command::cargo_bin("set-context")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["include_dynamodb", "true"])
        .assert()
        .success();

    assert_eq!(context(&dir)["include_dynamodb"], "true");
}

#[test]
fn synth_renders_enabled_resources() {
    let dir = scaffold();
    set_context(&dir).args(["init", "order-api"]).assert().success();
    set_context(&dir).args(["include_sqs", "true"]).assert().success();

    Command::cargo_bin("synth")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("CDK_DEFAULT_ACCOUNT")
        .env("CDK_DEFAULT_REGION", "eu-central-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("OrderApiStack"));

    let out = dir.path().join("synth.out");
    let template: Value =
        serde_json::from_str(&fs::read_to_string(out.join("OrderApiStack.template.json")).unwrap())
            .unwrap();

    assert_eq!(
        template["Resources"]["ServiceQueue"]["Properties"]["QueueName"],
        "order-api-queue.fifo"
    );
    assert!(template["Resources"].get("ServiceTable").is_none());

    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(
        manifest["artifacts"]["OrderApiStack"]["environment"],
        "aws://unknown-account/eu-central-1"
    );
}

#[test]
fn synth_to_stdout() {
    let dir = scaffold();

    Command::cargo_bin("synth")
        .unwrap()
        .current_dir(dir.path())
        .arg("--stdout")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"FunctionName\": \"sample-ms-service\""));

    assert!(!dir.path().join("synth.out").exists());
}
