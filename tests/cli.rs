use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_config(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp config");
    tmp.write_all(xml.as_bytes()).expect("write config");
    tmp
}

fn headless() -> Command {
    let mut cmd = Command::cargo_bin("precision-cube").expect("binary exists");
    cmd.args(["--headless", "--seed", "1", "--frame-rate", "10"]);
    cmd
}

#[test]
fn headless_round_times_out_and_prints_final_state() {
    let mut cmd = headless();
    cmd.args(["--time-budget", "1", "--frames", "100"]);
    cmd.assert()
        .success()
        .stdout(contains("Round 1 started"))
        .stdout(contains("Round over after 11 frames. Final score: 0"))
        .stdout(contains("Final cube pos=(0.00, 0.00, 0.00)"));
}

#[test]
fn held_keys_move_and_scale_the_cube() {
    let mut cmd = headless();
    cmd.args(["--frames", "10", "--hold", "d", "--hold", "ArrowUp"]);
    cmd.assert()
        .success()
        .stdout(contains("Stopped after 10 frames (1.00s). Score: 0"))
        .stdout(contains("Final cube pos=(0.20, 0.00, 0.00)"))
        .stdout(contains("scale=(1.00, 1.20, 1.00)"));
}

#[test]
fn config_file_sets_the_time_budget() {
    let config = write_config("<game>\n  <time-budget>0.5</time-budget>\n</game>\n");
    let mut cmd = headless();
    cmd.arg("--config").arg(config.path());
    cmd.assert()
        .success()
        .stdout(contains("Round over after 6 frames. Final score: 0"));
}

#[test]
fn free_play_never_times_out() {
    let mut cmd = headless();
    cmd.args(["--free-play", "--time-budget", "0.1", "--frames", "5"]);
    cmd.assert()
        .success()
        .stdout(contains("Round 1 started").not())
        .stdout(contains("Round over").not())
        .stdout(contains("Stopped after 5 frames"));
}

#[test]
fn invalid_config_value_is_reported() {
    let config = write_config("<game><target-max-size>1.2</target-max-size></game>");
    let mut cmd = headless();
    cmd.arg("--config").arg(config.path());
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("Error"))
        .stderr(contains("target_max_size"));
}

#[test]
fn unknown_argument_fails() {
    let mut cmd = Command::cargo_bin("precision-cube").expect("binary exists");
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Error: Unknown argument: --bogus"));
}
