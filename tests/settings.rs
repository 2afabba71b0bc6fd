use hotkey_stopwatch::hotkey::{parse_hotkey, Hotkey};
use hotkey_stopwatch::settings::{Settings, DEFAULT_SHORTCUT};
use tempfile::tempdir;

#[test]
fn missing_file_uses_default() {
    let dir = tempdir().unwrap();
    let s = Settings::load(dir.path().join("config.json"));
    assert_eq!(s, Settings::default());
    assert_eq!(s.register_shortcut, DEFAULT_SHORTCUT);
}

#[test]
fn malformed_file_uses_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(Settings::load(&path), Settings::default());
    assert!(Settings::try_load(&path).is_err());
}

#[test]
fn reads_single_field_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"register_shortcut": "Ctrl+F9"}"#).unwrap();
    let s = Settings::load(&path);
    assert_eq!(s.register_shortcut, "Ctrl+F9");
    assert!(!s.debug_logging);
    assert_eq!(Some(s.hotkey()), parse_hotkey("Ctrl+F9"));
}

#[test]
fn save_writes_register_shortcut() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let s = Settings {
        register_shortcut: "Alt+S".into(),
        ..Settings::default()
    };
    s.save(&path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["register_shortcut"], "Alt+S");
    assert_eq!(Settings::load(&path), s);
}

#[test]
fn save_into_missing_dir_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope").join("config.json");
    assert!(Settings::default().save(&path).is_err());
}

#[test]
fn invalid_shortcut_falls_back_to_default_hotkey() {
    let s = Settings {
        register_shortcut: "Ctrl+Nope".into(),
        ..Settings::default()
    };
    assert_eq!(s.hotkey(), Hotkey::default());
}
