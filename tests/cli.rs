use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

mod common;

use common::TestWorkspace;

#[test]
fn profile_reports_structural_and_semantic_types() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "trips.csv",
        "trip_id,fare,payment\n1,12.5,cash\n2,8.0,card\n3,15.25,cash\n",
    );

    cargo_bin_cmd!("column-probe")
        .args(["profile", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"structural_type\":\"integer\""))
        .stdout(predicate::str::contains("\"structural_type\":\"float\""))
        .stdout(predicate::str::contains("\"name\":\"payment\""));
}

#[test]
fn profile_restricts_to_selected_columns() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "trips.csv",
        "trip_id,fare,payment\n1,12.5,cash\n2,8.0,card\n",
    );

    cargo_bin_cmd!("column-probe")
        .args(["profile", "-i", input.to_str().unwrap(), "-C", "fare"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"fare\""))
        .stdout(predicate::str::contains("payment").not());
}

#[test]
fn profile_rejects_unknown_columns() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("trips.csv", "trip_id\n1\n2\n");

    cargo_bin_cmd!("column-probe")
        .args(["profile", "-i", input.to_str().unwrap(), "-C", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn profile_applies_manual_overrides() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "trips.csv",
        "trip_id,payment\n1,cash\n2,card\n3,cash\n4,card\n",
    );

    cargo_bin_cmd!("column-probe")
        .args([
            "profile",
            "-i",
            input.to_str().unwrap(),
            "--override",
            "payment=text:categorical",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"categorical\""));
}

#[test]
fn profile_reads_tab_separated_files_by_extension() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("trips.tsv", "trip_id\tfare\n1\t12.5\n2\t8.0\n");

    cargo_bin_cmd!("column-probe")
        .args(["profile", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"fare\""));
}
