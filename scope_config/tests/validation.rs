use rstest::rstest;
use scope_config::{SensorKindCfg, load_file, load_toml};
use std::fs;
use tempfile::tempdir;

const FULL: &str = r#"
[device]
base_url = "http://192.168.1.233"
kind = "distance"
timeout_ms = 2000

[poll]
interval_ms = 1
capacity = 100

[display]
refresh_ms = 100
notice_ms = 2500
color = false

[logging]
level = "debug"
rotation = "daily"
"#;

#[test]
fn accepts_full_config() {
    let cfg = load_toml(FULL).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.device.kind, SensorKindCfg::Distance);
    assert_eq!(cfg.poll.capacity, Some(100));
    assert_eq!(cfg.poll.interval_ms, Some(1));
    assert!(!cfg.display.color);
}

#[rstest]
#[case("[device]\nbase_url = \"\"\n", "base_url must not be empty")]
#[case("[device]\nbase_url = \"192.168.1.5\"\n", "must start with http")]
#[case("[device]\ntimeout_ms = 0\n", "timeout_ms must be >= 1")]
#[case("[device]\ntimeout_ms = 120000\n", "timeout_ms is unreasonably large")]
#[case("[poll]\ninterval_ms = 0\n", "interval_ms must be >= 1")]
#[case("[poll]\ncapacity = 0\n", "capacity must be >= 1")]
#[case("[display]\nrefresh_ms = 0\n", "refresh_ms must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation must be one of")]
fn rejects_out_of_range_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "error '{err}' does not mention '{needle}'"
    );
}

#[test]
fn load_file_reads_and_validates() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.toml");
    fs::write(&good, FULL).unwrap();
    load_file(&good).expect("good file loads");

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[poll]\ncapacity = 0\n").unwrap();
    let err = load_file(&bad).expect_err("bad file is rejected");
    assert!(format!("{err}").contains("capacity"));
}

#[test]
fn load_file_reports_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_file(&dir.path().join("nope.toml")).expect_err("missing file");
    assert!(format!("{err}").contains("read config"));
}
