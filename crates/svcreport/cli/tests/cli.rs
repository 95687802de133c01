//! Command-line behavior that needs no Zabbix server.

use assert_cmd::Command;
use predicates::prelude::*;

fn svcreport() -> Command {
    let mut cmd = Command::cargo_bin("svcreport").unwrap();
    cmd.env_remove("SVCREPORT_SERVER")
        .env_remove("SVCREPORT_USERNAME")
        .env_remove("SVCREPORT_PASSWORD")
        .env_remove("SVCREPORT_CONFIG")
        .args(["--config", "/nonexistent/svcreport/config.toml"]);
    cmd
}

#[test]
fn help_lists_commands() {
    svcreport()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn report_help_lists_options() {
    svcreport()
        .args(["report", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--depth"))
        .stdout(predicate::str::contains("--parents-only"))
        .stdout(predicate::str::contains("--service-times"));
}

#[test]
fn config_shows_effective_values_with_password_masked() {
    svcreport()
        .args([
            "--server",
            "http://zabbix.example/zabbix",
            "--username",
            "reporter",
            "--password",
            "hunter2",
            "config",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://zabbix.example/zabbix"))
        .stdout(predicate::str::contains("reporter"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn config_reads_credentials_from_environment() {
    svcreport()
        .env("SVCREPORT_USERNAME", "env-reporter")
        .env("SVCREPORT_PASSWORD", "hunter2")
        .args(["--output", "yaml", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("env-reporter"))
        .stdout(predicate::str::contains("http://localhost/zabbix"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn non_positive_depth_with_parents_only_is_rejected_before_login() {
    svcreport()
        .args(["report", "--depth", "0", "--parents-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parents-only"));
}

#[test]
fn report_without_credentials_fails() {
    svcreport()
        .args(["report", "--services", "Web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Zabbix user given"));
}
