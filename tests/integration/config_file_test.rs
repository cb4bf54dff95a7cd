use std::fs;

use resalertd::MonitorConfig;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resalertd.yaml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_load_full_config() {
    let yaml = r#"
cpu:
  warning_level: 80.0
  critical_level: 95.0
  stable_diff: 5.0
  check_delay: 60.0
  override_delay: 300.0
ram:
  warning_level: 85.0
  critical_level: 97.0
  stable_diff: 4.0
  check_delay: 120.0
  override_delay: 600.0
io:
  warning_level: 70.0
  critical_level: 90.0
  stable_diff: 10.0
  check_delay: 30.0
  override_delay: 180.0
min_pid_similarity: 85.0
critical_wall_message: true
warning_wall_message: true
"#;
    let (_dir, path) = write_config(yaml);
    let config = MonitorConfig::load(&path).unwrap();

    assert_eq!(config.cpu.warning_level, 80.0);
    assert_eq!(config.ram.check_delay, 120.0);
    assert_eq!(config.io.stable_diff, 10.0);
    assert_eq!(config.min_pid_similarity, 85.0);
    assert!(config.warning_wall_message);
}

#[test]
fn test_empty_config_uses_defaults() {
    let (_dir, path) = write_config("{}");
    let config = MonitorConfig::load(&path).unwrap();

    assert_eq!(config.cpu.warning_level, 75.0);
    assert_eq!(config.cpu.critical_level, 90.0);
    assert!(config.critical_wall_message);
    assert!(!config.warning_wall_message);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.yaml");
    assert!(MonitorConfig::load(&path).is_err());
}

#[test]
fn test_malformed_yaml_is_an_error() {
    let (_dir, path) = write_config("cpu: [not, a, mapping");
    assert!(MonitorConfig::load(&path).is_err());
}

#[test]
fn test_nan_delay_rejected_at_load() {
    // YAML spells NaN as .nan; it parses fine but must fail validation
    // at startup instead of panicking later in the scheduler
    let yaml = r#"
cpu:
  warning_level: 75.0
  critical_level: 90.0
  stable_diff: 5.0
  check_delay: .nan
  override_delay: 300.0
"#;
    let (_dir, path) = write_config(yaml);
    assert!(MonitorConfig::load(&path).is_err());
}

#[test]
fn test_infinite_delay_rejected_at_load() {
    let yaml = r#"
ram:
  warning_level: 75.0
  critical_level: 90.0
  stable_diff: 5.0
  check_delay: .inf
  override_delay: 300.0
"#;
    let (_dir, path) = write_config(yaml);
    assert!(MonitorConfig::load(&path).is_err());
}

#[test]
fn test_invalid_thresholds_rejected_at_load() {
    let yaml = r#"
io:
  warning_level: 90.0
  critical_level: 50.0
  stable_diff: 5.0
  check_delay: 60.0
  override_delay: 300.0
"#;
    let (_dir, path) = write_config(yaml);
    assert!(MonitorConfig::load(&path).is_err());
}
