use assert_cmd::Command;
use predicates::prelude::*;

fn stratus() -> Command {
    Command::cargo_bin("stratus").unwrap()
}

#[test]
fn programs_lists_every_builtin() {
    stratus()
        .arg("programs")
        .assert()
        .success()
        .stdout(predicate::str::contains("static-website-aws"))
        .stdout(predicate::str::contains("static-website-azure"))
        .stdout(predicate::str::contains("serverless-azure"));
}

#[test]
fn preview_runs_the_serverless_program_with_defaults() {
    stratus()
        .args(["preview", "serverless-azure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiURL"))
        .stdout(predicate::str::contains(".azurewebsites.net"));
}

#[test]
fn preview_reports_missing_required_config() {
    stratus()
        .args(["preview", "static-website-aws"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("domain"));
}

#[test]
fn preview_accepts_config_flags() {
    stratus()
        .args([
            "preview",
            "static-website-aws",
            "-c",
            "domain=example.com",
            "-c",
            "subdomain=www",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(".cloudfront.net"))
        .stdout(predicate::str::contains("https://www.example.com"));
}

#[test]
fn graph_prints_dependency_edges() {
    stratus()
        .args(["graph", "serverless-azure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run-from-package -> blob-sas.serviceSasToken"));
}

#[test]
fn unknown_program_is_an_error() {
    stratus()
        .args(["preview", "no-such-program"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown program"));
}
