use super::{load_settings_from, Settings};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn missing_file_and_env_yield_defaults() {
    let settings = load_settings_from(Path::new("/definitely/not/here.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.url(), "http://127.0.0.1:8080");
}

#[test]
fn file_values_are_read_and_env_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bands.toml");
    fs::write(
        &path,
        "port = 9000\nupload_dir = \"media\"\nopen_browser = false\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path, env_from(&[("BANDS_PORT", "9100")]));
    assert_eq!(settings.port, 9100);
    assert_eq!(settings.upload_dir, PathBuf::from("media"));
    assert!(!settings.open_browser);
    assert_eq!(settings.database_path, PathBuf::from("bands.sqlite"));
}

#[test]
fn unparsable_overrides_are_ignored() {
    let settings = load_settings_from(
        Path::new("/nope.toml"),
        env_from(&[("BANDS_PORT", "eighty"), ("BANDS_MAX_UPLOAD_BYTES", "2048")]),
    );
    assert_eq!(settings.port, 8080);
    assert_eq!(settings.max_upload_bytes, 2048);
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bands.toml");
    fs::write(&path, "port = [").expect("write config");
    assert_eq!(load_settings_from(&path, env_from(&[])), Settings::default());
}
