use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;

fn command() -> Command {
    let mut cmd = cargo_bin_cmd!("test-timestamp");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_arguments_prints_usage() {
    command()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr("test-timestamp <timestamp-list>\n");
}

#[test]
fn valid_timestamps_exit_zero() {
    command()
        .args(["2022-01-01T00:00:00Z", "2022-06-15T14:30:00.25+02:00"])
        .assert()
        .success()
        .stdout(
            "Successfully parsed 2022-01-01T00:00:00Z as 2022-01-01T00:00:00Z\n\
             Successfully parsed 2022-06-15T14:30:00.25+02:00 as 2022-06-15T12:30:00.250Z\n",
        )
        .stderr(predicate::str::is_empty());
}

#[test]
fn one_bad_timestamp_exits_two() {
    command()
        .args(["2022-01-01T00:00:00Z", "not-a-date"])
        .assert()
        .code(2)
        .stdout("Successfully parsed 2022-01-01T00:00:00Z as 2022-01-01T00:00:00Z\n")
        .stderr(
            predicate::str::starts_with("FAILURE: Exception Text 'not-a-date' could not be parsed at index 0: ")
                .and(predicate::str::contains(" when parsing not-a-date\n"))
                .and(predicate::str::ends_with("1 timestamp failures\n")),
        );
}

#[test]
fn missing_zone_designator_fails() {
    command()
        .arg("2022-01-01T00:00:00")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing offset or zone designator"));
}

#[test]
fn every_failure_is_counted() {
    let output = command()
        .args(["x", "2022-01-01T00:00:00Z", "y", "2022-02-30T00:00:00Z", "-z"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("when parsing x"));
    assert!(lines[1].ends_with("when parsing y"));
    assert!(lines[2].ends_with("when parsing 2022-02-30T00:00:00Z"));
    assert_eq!(lines[3], "3 timestamp failures");
}

#[test]
fn flag_lookalikes_are_treated_as_timestamps() {
    command()
        .arg("--help")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("when parsing --help\n"));
}

#[test]
fn exit_status_saturates() {
    let bad: Vec<String> = (0..300).map(|n| format!("bad-{n}")).collect();
    command()
        .args(&bad)
        .assert()
        .code(255)
        .stderr(predicate::str::ends_with("300 timestamp failures\n"));
}

#[test]
fn leap_seconds_and_end_of_day() {
    command()
        .args([
            "2016-12-31T23:59:60Z",
            "2022-01-01T24:00:00Z",
            "-0001-01-01T00:00:00Z",
            "2022-01-01T12:30:60Z",
        ])
        .assert()
        .code(2)
        .stdout(
            "Successfully parsed 2016-12-31T23:59:60Z as 2016-12-31T23:59:59Z\n\
             Successfully parsed 2022-01-01T24:00:00Z as 2022-01-02T00:00:00Z\n\
             Successfully parsed -0001-01-01T00:00:00Z as -0001-01-01T00:00:00Z\n",
        )
        .stderr(
            predicate::str::starts_with(
                "FAILURE: Exception Text '2022-01-01T12:30:60Z' could not be parsed: second out of range",
            )
            .and(predicate::str::ends_with("1 timestamp failures\n")),
        );
}
