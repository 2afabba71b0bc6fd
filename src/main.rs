use hotkey_stopwatch::dispatch;
use hotkey_stopwatch::gui::{StopwatchApp, APP_TITLE, FULL_MIN_SIZE, FULL_SIZE};
use hotkey_stopwatch::hotkey::HotkeyListener;
use hotkey_stopwatch::logging;
use hotkey_stopwatch::settings::{Settings, SETTINGS_FILE};

use eframe::egui;
use std::sync::{atomic::AtomicBool, Arc};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE);
    logging::init(settings.debug_logging, None);

    let focus = Arc::new(AtomicBool::new(false));
    let (dispatcher, commands) = dispatch::channel(focus.clone());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size(FULL_SIZE)
            .with_min_inner_size(FULL_MIN_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        native_options,
        Box::new(move |cc| {
            let dispatcher = dispatcher.with_waker(cc.egui_ctx.clone());
            let mut listener = HotkeyListener::new();
            listener.register(settings.hotkey());
            if !listener.start(move || {
                dispatcher.toggle_from_foreign_thread();
            }) {
                tracing::info!("global shortcut disabled; use the window shortcut or button");
            }
            Box::new(StopwatchApp::new(
                &cc.egui_ctx,
                settings,
                SETTINGS_FILE.into(),
                commands,
                focus,
                listener,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run window: {e}"))?;
    Ok(())
}
