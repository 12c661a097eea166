use assert_cmd::Command;
use predicates::prelude::*;

fn flowstep() -> Command {
    let mut cmd = Command::cargo_bin("flowstep").unwrap();
    cmd.env_remove("FLOWSTEP_SLAVE_MODE").env_remove("FLOWSTEP_LOG");
    cmd
}

fn json_summary(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn runs_blocking_demo() {
    flowstep()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("blocking"))
        .stdout(predicate::str::contains("returned:"))
        .stdout(predicate::str::contains("changed"));
}

#[test]
fn runs_host_driven_demo() {
    let summary = json_summary(flowstep().args(["run", "--slave", "--json"]));
    assert_eq!(summary["mode"], "slave");
    assert_eq!(summary["returned"], "changed");
    assert_eq!(summary["frames"], 60);
    assert_eq!(summary["text"], "changed");
}

#[test]
fn both_modes_return_the_same_value() {
    let blocking = json_summary(flowstep().args(["run", "--json", "--quit-after", "0.25"]));
    let driven = json_summary(flowstep().args(["run", "--slave", "--json", "--quit-after", "0.25"]));
    assert_eq!(blocking["returned"], "default");
    assert_eq!(blocking["returned"], driven["returned"]);
    assert_eq!(blocking["frames"], 15);
    assert_eq!(blocking["frames"], driven["frames"]);
}

#[test]
fn env_switch_enables_slave_mode() {
    let summary = json_summary(flowstep().env("FLOWSTEP_SLAVE_MODE", "1").args(["run", "--json"]));
    assert_eq!(summary["mode"], "slave");
}

#[test]
fn invalid_env_switch_is_an_error() {
    flowstep()
        .env("FLOWSTEP_SLAVE_MODE", "sometimes")
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for FLOWSTEP_SLAVE_MODE"));
}

#[test]
fn escape_key_finishes_on_first_frame() {
    let summary = json_summary(flowstep().args(["run", "--json", "--key", "a", "--key", "escape"]));
    assert_eq!(summary["returned"], "default");
    assert_eq!(summary["frames"], 1);
    assert_eq!(summary["keys"], serde_json::json!(["a"]));
}

#[test]
fn frame_budget_stops_host_driven_loop() {
    let summary = json_summary(flowstep().args(["run", "--slave", "--json", "--frames", "10"]));
    assert!(summary["returned"].is_null());
    assert_eq!(summary["frames"], 10);

    flowstep()
        .args(["run", "--slave", "--frames", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("frame limit reached"));
}

#[test]
fn zero_frame_budget_is_rejected_in_both_modes() {
    for args in [&["run", "--frames", "0"][..], &["run", "--slave", "--frames", "0"][..]] {
        flowstep()
            .args(args)
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid value '0'"));
    }
}

#[test]
fn verbose_prints_every_frame() {
    flowstep()
        .args(["run", "--slave", "--verbose", "--quit-after", "0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(": default").count(5));
}

#[test]
fn config_file_selects_slave_mode() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("flowstep.json");
    std::fs::write(&path, r#"{ "slave_mode": true, "max_fps": 30 }"#).unwrap();

    let summary = json_summary(flowstep().arg("run").arg("--json").arg("--config").arg(&path));
    assert_eq!(summary["mode"], "slave");
    assert_eq!(summary["frames"], 30);
}

#[test]
fn invalid_config_is_nonzero() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let bad_path = tmp_dir.path().join("bad.json");
    std::fs::write(&bad_path, r#"{ "max_fps": 0 }"#).unwrap();

    flowstep()
        .arg("run")
        .arg("--config")
        .arg(bad_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_fps must be between 1 and 1000"));
}

#[test]
fn stepper_drives_the_loop_from_stdin() {
    flowstep()
        .arg("step")
        .write_stdin(":frame 31\n:state\n:post key x\n:quit 42\n:drain\n:poll\n:exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("changed"))
        .stdout(predicate::str::contains("returned:"))
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("Goodbye."));
}

#[test]
fn stepper_rejects_unknown_commands() {
    flowstep()
        .write_stdin(":bogus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command"));
}
