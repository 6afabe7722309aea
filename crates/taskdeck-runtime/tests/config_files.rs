#![forbid(unsafe_code)]

//! Loading `TaskdeckConfig` from files on disk.

use std::io::Write;

use taskdeck_core::Duration;
use taskdeck_runtime::{ConfigError, TaskPanel, TaskdeckConfig};

fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).expect("create config file");
    f.write_all(body.as_bytes()).expect("write config file");
    path
}

#[test]
fn toml_file_round_trips_through_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "taskdeck.toml",
        r#"
        [dissolve]
        cell_size = 3.0
        duration = 900

        [stack]
        max_stacked = 1
        stack_scales = [0.9]
        stack_opacities = [1.0]

        [panel]
        dissolve_duration = 650
        "#,
    );
    let cfg = TaskdeckConfig::load(&path).expect("valid config");
    assert_eq!(cfg.dissolve.cell_size, 3.0);
    assert_eq!(cfg.dissolve.duration, Duration::from_millis(900));
    assert_eq!(cfg.stack.max_stacked, 1);
    assert_eq!(cfg.panel.dissolve_duration, Duration::from_millis(650));

    // A panel builds from any accepted config.
    let panel = TaskPanel::new(&cfg);
    assert!(panel.tasks().is_empty());
}

#[test]
fn json_file_is_detected_by_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "taskdeck.json", r#"{"toast": {"visible_toasts": 5}}"#);
    let cfg = TaskdeckConfig::load(&path).expect("valid config");
    assert_eq!(cfg.toast.visible_toasts, 5);
    assert_eq!(
        TaskdeckConfig::from_json_file(&path).expect("parse").toast.visible_toasts,
        5
    );
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "bad.toml",
        r#"
        [stack]
        max_stacked = 3

        [toast]
        visible_toasts = 0
        "#,
    );
    // Parsing alone succeeds.
    assert!(TaskdeckConfig::from_toml_file(&path).is_ok());

    match TaskdeckConfig::load(&path) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3, "{errors:?}");
            assert!(errors.iter().any(|e| e.starts_with("toast.visible_toasts")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "broken.toml", "[drag\nsnap_back = ");
    let err = TaskdeckConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(std::error::Error::source(&err).is_some());
}
