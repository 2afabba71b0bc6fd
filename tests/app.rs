use eframe::egui;
use hotkey_stopwatch::dispatch::{channel, Dispatcher};
use hotkey_stopwatch::gui::{Status, StopwatchApp};
use hotkey_stopwatch::hotkey::{parse_hotkey, HotkeyListener};
use hotkey_stopwatch::settings::Settings;
use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn new_app(ctx: &egui::Context, path: &Path) -> (StopwatchApp, Dispatcher, Arc<AtomicBool>) {
    let focus = Arc::new(AtomicBool::new(false));
    let (dispatcher, commands) = channel(focus.clone());
    let settings = Settings::default();
    let listener = HotkeyListener::new();
    listener.register(settings.hotkey());
    let app = StopwatchApp::new(
        ctx,
        settings,
        path.to_path_buf(),
        commands,
        focus.clone(),
        listener,
    );
    (app, dispatcher, focus)
}

#[test]
fn queued_toggles_apply_in_order() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, dispatcher, _) = new_app(&ctx, &dir.path().join("config.json"));

    for _ in 0..3 {
        dispatcher.toggle_from_foreign_thread();
    }
    assert_eq!(app.process_commands(), 3);
    assert!(app.stopwatch().is_running());
    assert_eq!(app.stopwatch().history().len(), 1);
    assert_eq!(*app.status(), Status::Recording);
}

#[test]
fn focused_window_ignores_global_toggle() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, dispatcher, focus) = new_app(&ctx, &dir.path().join("config.json"));

    focus.store(true, Ordering::SeqCst);
    assert!(!dispatcher.toggle_from_foreign_thread());
    assert_eq!(app.process_commands(), 0);
    assert!(!app.stopwatch().is_running());
    assert_eq!(*app.status(), Status::Ready);
}

#[test]
fn stop_updates_status_with_record() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, _, _) = new_app(&ctx, &dir.path().join("config.json"));

    let t0 = Instant::now();
    app.toggle_at(t0);
    app.toggle_at(t0 + Duration::from_millis(1234));
    assert_eq!(*app.status(), Status::Recorded("00:00:01.234".into()));
    assert_eq!(app.status().text(), "Recorded: 00:00:01.234");
    assert_eq!(app.stopwatch().display_at(Instant::now()), "00:00:00.000");
}

#[test]
fn empty_shortcut_is_rejected() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let (mut app, _, _) = new_app(&ctx, &path);

    assert!(!app.set_shortcut("  "));
    assert!(!app.set_shortcut("Ctrl+Nope"));
    assert_eq!(app.settings().register_shortcut, "]");
    assert_eq!(app.listener().current(), parse_hotkey("]"));
    assert!(!path.exists());
}

#[test]
fn valid_shortcut_rebinds_and_saves() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let (mut app, _, _) = new_app(&ctx, &path);

    assert!(app.set_shortcut("ctrl+f9"));
    assert_eq!(app.hotkey(), parse_hotkey("Ctrl+F9").unwrap());
    assert_eq!(app.listener().current(), parse_hotkey("Ctrl+F9"));
    assert_eq!(Settings::load(&path).register_shortcut, "Ctrl+F9");
}

#[test]
fn unwritable_settings_do_not_block_rebinding() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("config.json");
    let (mut app, _, _) = new_app(&ctx, &path);

    assert!(app.set_shortcut("F8"));
    assert_eq!(app.hotkey(), parse_hotkey("F8").unwrap());
}

#[test]
fn shortcut_dialog_prefills_current() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, _, _) = new_app(&ctx, &dir.path().join("config.json"));

    assert!(!app.shortcut_dialog_open());
    app.open_shortcut_dialog();
    assert!(app.shortcut_dialog_open());
}

#[test]
fn compact_mode_toggles() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, _, _) = new_app(&ctx, &dir.path().join("config.json"));

    app.set_compact(&ctx, true);
    assert!(app.is_compact());
    app.set_compact(&ctx, false);
    assert!(!app.is_compact());
}

#[test]
fn frame_publishes_focus_and_drains_queue() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, dispatcher, focus) = new_app(&ctx, &dir.path().join("config.json"));

    dispatcher.toggle_from_foreign_thread();
    let input = egui::RawInput {
        focused: false,
        ..Default::default()
    };
    let _ = ctx.run(input, |ctx| app.frame(ctx));
    assert!(!focus.load(Ordering::SeqCst));
    assert!(app.stopwatch().is_running());
    assert_eq!(*app.status(), Status::Recording);
}

fn key_frame(focused: bool, repeat: bool, modifiers: egui::Modifiers) -> egui::RawInput {
    egui::RawInput {
        focused,
        events: vec![egui::Event::Key {
            key: egui::Key::CloseBracket,
            physical_key: None,
            pressed: true,
            repeat,
            modifiers,
        }],
        ..Default::default()
    }
}

#[test]
fn in_window_shortcut_toggles_when_focused() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, _, focus) = new_app(&ctx, &dir.path().join("config.json"));

    let _ = ctx.run(key_frame(true, false, egui::Modifiers::NONE), |ctx| app.frame(ctx));
    assert!(focus.load(Ordering::SeqCst));
    assert!(app.stopwatch().is_running());

    let _ = ctx.run(key_frame(true, false, egui::Modifiers::NONE), |ctx| app.frame(ctx));
    assert!(!app.stopwatch().is_running());
    assert_eq!(app.stopwatch().history().len(), 1);
}

#[test]
fn in_window_shortcut_ignored_when_unfocused() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, _, _) = new_app(&ctx, &dir.path().join("config.json"));

    let _ = ctx.run(key_frame(false, false, egui::Modifiers::NONE), |ctx| app.frame(ctx));
    assert!(!app.stopwatch().is_running());
    assert_eq!(*app.status(), Status::Ready);
}

#[test]
fn in_window_shortcut_ignores_key_repeat_and_extra_modifiers() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, _, _) = new_app(&ctx, &dir.path().join("config.json"));

    let _ = ctx.run(key_frame(true, true, egui::Modifiers::NONE), |ctx| app.frame(ctx));
    assert!(!app.stopwatch().is_running());
    let _ = ctx.run(key_frame(true, false, egui::Modifiers::CTRL), |ctx| app.frame(ctx));
    assert!(!app.stopwatch().is_running());
}

#[test]
fn in_window_shortcut_ignored_while_dialog_open() {
    let ctx = egui::Context::default();
    let dir = tempdir().unwrap();
    let (mut app, _, _) = new_app(&ctx, &dir.path().join("config.json"));

    app.open_shortcut_dialog();
    let _ = ctx.run(key_frame(true, false, egui::Modifiers::NONE), |ctx| app.frame(ctx));
    assert!(app.shortcut_dialog_open());
    assert!(!app.stopwatch().is_running());
    assert!(app.stopwatch().history().is_empty());
}
