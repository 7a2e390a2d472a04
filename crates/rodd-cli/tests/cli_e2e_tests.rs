//! End-to-end tests that run the compiled `rodd` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use rodd_test_utils::CatalogFixture;

fn rodd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rodd"));
    cmd.env_remove("RODD_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

const CONFIG: &str = r#"
global_definitions:
  env: prod
components:
  - item_type: monitors
    instances:
      - source: kubernetes
"#;

fn kubernetes_fixture() -> CatalogFixture {
    let fixture = CatalogFixture::new();
    fixture.monitor_template();
    fixture.record(
        "monitors",
        "kubernetes",
        "pod_restarts",
        r#"
name: Pod restarts (${env})
query: "sum:kubernetes.containers.restarts{env:${env}} > 5"
message: Pods restarting
tags: ["env:${env}"]
"#,
    );
    fixture.record(
        "monitors",
        "kubernetes",
        "pod_pending",
        r#"
name: Pending pods
query: "sum:kubernetes_state.pod.status_phase{phase:pending} > 0"
message: Pods pending
tags: []
"#,
    );
    fixture.config("rodd.yml", CONFIG);
    fixture
}

#[test]
fn help_lists_commands() {
    rodd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn generate_writes_one_file_per_record() {
    let fixture = kubernetes_fixture();

    rodd()
        .current_dir(fixture.root())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 generated"));

    assert_eq!(
        fixture.output_files(),
        vec!["pending_pods.tf", "pod_restarts_prod.tf"]
    );
    let rendered = fixture.read_output("pod_restarts_prod.tf");
    assert!(rendered.contains("{env:prod}"));
    assert!(rendered.contains(r#"["env:prod"]"#));
}

#[test]
fn generate_respects_destination_override() {
    let fixture = kubernetes_fixture();
    let elsewhere = fixture.root().join("elsewhere");

    rodd()
        .current_dir(fixture.root())
        .args(["generate", "--destination"])
        .arg(&elsewhere)
        .assert()
        .success();

    assert!(elsewhere.join("pending_pods.tf").is_file());
    assert!(fixture.output_files().is_empty());
}

#[test]
fn second_generate_skips_existing_files_unless_overwriting() {
    let fixture = kubernetes_fixture();

    rodd().current_dir(fixture.root()).arg("generate").assert().success();
    rodd()
        .current_dir(fixture.root())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 generated"));
    rodd()
        .current_dir(fixture.root())
        .args(["generate", "--overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 generated"));
}

#[test]
fn generate_json_reports_outcomes() {
    let fixture = kubernetes_fixture();

    rodd()
        .current_dir(fixture.root())
        .args(["generate", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""emitted": 2"#))
        .stdout(predicate::str::contains("monitors.kubernetes.pod_pending"));
}

#[test]
fn list_prints_resource_ids() {
    let fixture = kubernetes_fixture();

    rodd()
        .arg("--config")
        .arg(fixture.root().join("rodd.yml"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("monitors.kubernetes.pod_pending"))
        .stdout(predicate::str::contains("monitors.kubernetes.pod_restarts"))
        .stdout(predicate::str::contains("2 resources"));
}

#[test]
fn show_prints_finalized_record() {
    let fixture = kubernetes_fixture();

    rodd()
        .current_dir(fixture.root())
        .args(["show", "monitors.kubernetes.pod_restarts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resource_name: pod_restarts_prod"))
        .stdout(predicate::str::contains("Pod restarts (prod)"));
}

#[test]
fn show_unknown_resource_fails() {
    let fixture = kubernetes_fixture();

    rodd()
        .current_dir(fixture.root())
        .args(["show", "monitors.kubernetes.missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn missing_config_fails() {
    let fixture = CatalogFixture::new();

    rodd()
        .current_dir(fixture.root())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rodd.yml"));
}
