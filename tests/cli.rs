use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("precip"));
}

#[test]
fn functions_are_listed() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.arg("functions");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("x^2").and(predicate::str::contains("x*sin(x)")));
}

#[test]
fn import_prints_series_summary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lug.csv");
    fs::write(
        &path,
        "Ville;Date et heure;Precipitations (mm)\nLUG;01.01.1990 00:00;1500,5\nLUG;01.01.1991 00:00;n/a\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.arg("import").arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Lugano  points=2 missing=1"));
}

#[test]
fn import_of_invalid_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "nothing useful here\n").unwrap();

    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.arg("import").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Fichier invalide"));
}

#[test]
fn plot_demo_to_svg() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("demo.svg");

    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args([
        "plot",
        "--demo",
        "--city",
        "Zürich",
        "--from",
        "01.01.1950",
        "--to",
        "31.12.1999",
        "--function",
        "sin(x)",
        "--out",
    ])
    .arg(&out);
    cmd.assert().success();
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn stats_for_demo_city() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["stats", "--demo", "--city", "Davos", "--from", "1900", "--to", "1900"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Davos  count=1 missing=0"));
}

#[test]
fn plot_help_says_png_has_no_text() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["plot", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PNG output has no text"));
}
