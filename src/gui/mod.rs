mod shortcut_dialog;
pub mod theme;

pub use shortcut_dialog::ShortcutDialog;

use crate::dispatch::{CommandQueue, FocusFlag, StopwatchCommand};
use crate::hotkey::{parse_hotkey, Hotkey, HotkeyListener};
use crate::settings::Settings;
use crate::stopwatch::{Stopwatch, Transition};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

pub const APP_TITLE: &str = "Hotkey Stopwatch";

/// Repaint interval while the stopwatch is running.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(10);
const FLASH_DURATION: Duration = Duration::from_millis(180);
const TOAST_SECONDS: f64 = 3.0;

pub const FULL_SIZE: [f32; 2] = [600.0, 400.0];
pub const FULL_MIN_SIZE: [f32; 2] = [420.0, 350.0];
pub const COMPACT_SIZE: [f32; 2] = [260.0, 90.0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Recording,
    Recorded(String),
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Ready => "Ready".into(),
            Status::Recording => "Recording...".into(),
            Status::Recorded(r) => format!("Recorded: {r}"),
        }
    }
}

pub struct StopwatchApp {
    stopwatch: Stopwatch,
    commands: CommandQueue,
    focus: FocusFlag,
    listener: HotkeyListener,
    settings: Settings,
    settings_path: PathBuf,
    hotkey: Hotkey,
    status: Status,
    compact: bool,
    flash_until: Option<Instant>,
    scroll_to_last: bool,
    shortcut_dialog: ShortcutDialog,
    toasts: Toasts,
}

impl StopwatchApp {
    pub fn new(
        ctx: &egui::Context,
        settings: Settings,
        settings_path: PathBuf,
        commands: CommandQueue,
        focus: FocusFlag,
        listener: HotkeyListener,
    ) -> Self {
        ctx.set_visuals(theme::stopwatch_visuals(&ctx.style().visuals));
        let hotkey = settings.hotkey();
        tracing::info!(shortcut = %hotkey, "stopwatch window ready");
        Self {
            stopwatch: Stopwatch::new(),
            commands,
            focus,
            listener,
            settings,
            settings_path,
            hotkey,
            status: Status::Ready,
            compact: false,
            flash_until: None,
            scroll_to_last: false,
            shortcut_dialog: ShortcutDialog::default(),
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
        }
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn hotkey(&self) -> Hotkey {
        self.hotkey
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn listener(&self) -> &HotkeyListener {
        &self.listener
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn shortcut_dialog_open(&self) -> bool {
        self.shortcut_dialog.open
    }

    pub fn open_shortcut_dialog(&mut self) {
        self.shortcut_dialog.open(&self.settings.register_shortcut);
    }

    pub fn toggle(&mut self) -> Transition {
        self.toggle_at(Instant::now())
    }

    pub fn toggle_at(&mut self, now: Instant) -> Transition {
        let transition = self.stopwatch.toggle_at(now);
        match &transition {
            Transition::Started => self.status = Status::Recording,
            Transition::Stopped { record, .. } => {
                self.status = Status::Recorded(record.clone());
                self.flash_until = Some(now + FLASH_DURATION);
                self.scroll_to_last = true;
            }
        }
        transition
    }

    /// Apply every command queued by other threads, in order.
    pub fn process_commands(&mut self) -> usize {
        let cmds = self.commands.drain();
        for cmd in &cmds {
            match cmd {
                StopwatchCommand::Toggle => {
                    self.toggle();
                }
            }
        }
        cmds.len()
    }

    /// Validate and apply a new shortcut. Invalid input leaves the current
    /// binding untouched and shows a warning.
    pub fn set_shortcut(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.warn("The shortcut cannot be empty.".into());
            return false;
        }
        let Some(hotkey) = parse_hotkey(trimmed) else {
            self.warn(format!("'{trimmed}' is not a valid shortcut."));
            return false;
        };

        self.hotkey = hotkey;
        self.settings.register_shortcut = hotkey.to_string();
        if let Err(e) = self.settings.save(&self.settings_path) {
            tracing::warn!("failed to save settings: {e:#}");
        }
        self.listener.register(hotkey);
        self.add_toast(Toast {
            text: format!("New shortcut: {hotkey}").into(),
            kind: ToastKind::Info,
            options: ToastOptions::default().duration_in_seconds(TOAST_SECONDS),
        });
        true
    }

    pub fn set_compact(&mut self, ctx: &egui::Context, compact: bool) {
        if self.compact == compact {
            return;
        }
        self.compact = compact;
        tracing::debug!(compact, "switching window mode");
        if compact {
            ctx.send_viewport_cmd(egui::ViewportCommand::MinInnerSize(COMPACT_SIZE.into()));
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(COMPACT_SIZE.into()));
            ctx.send_viewport_cmd(egui::ViewportCommand::Resizable(false));
        } else {
            ctx.send_viewport_cmd(egui::ViewportCommand::Resizable(true));
            ctx.send_viewport_cmd(egui::ViewportCommand::MinInnerSize(FULL_MIN_SIZE.into()));
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(FULL_SIZE.into()));
        }
    }

    fn add_toast(&mut self, toast: Toast) {
        self.toasts.add(toast);
    }

    fn warn(&mut self, msg: String) {
        tracing::warn!("{msg}");
        self.add_toast(Toast {
            text: msg.into(),
            kind: ToastKind::Warning,
            options: ToastOptions::default().duration_in_seconds(TOAST_SECONDS),
        });
    }

    fn flashing(&self, now: Instant) -> bool {
        self.flash_until.map(|t| now < t).unwrap_or(false)
    }

    /// Presses of the record shortcut delivered to this window this frame.
    fn in_window_presses(&self, ctx: &egui::Context) -> usize {
        let Some(key) = self.hotkey.to_egui() else {
            return 0;
        };
        ctx.input(|i| {
            i.events
                .iter()
                .filter(|e| {
                    matches!(
                        e,
                        egui::Event::Key { key: k, pressed: true, repeat: false, modifiers, .. }
                            if *k == key && self.hotkey.matches_modifiers(modifiers)
                    )
                })
                .count()
        })
    }

    fn time_label(&self, ui: &mut egui::Ui, now: Instant, size: f32) {
        let text = egui::RichText::new(self.stopwatch.display_at(now))
            .size(size)
            .strong()
            .monospace();
        if self.compact {
            ui.label(text.color(theme::ACCENT));
            return;
        }
        let flashing = self.flashing(now);
        let fill = if flashing { theme::ACCENT } else { theme::PANEL };
        let border = if self.stopwatch.is_running() {
            theme::RECORDING
        } else {
            theme::PANEL
        };
        let color = if flashing { theme::BACKGROUND } else { theme::ACCENT };
        egui::Frame::none()
            .fill(fill)
            .stroke(egui::Stroke::new(4.0, border))
            .rounding(14.0)
            .inner_margin(20.0)
            .show(ui, |ui| {
                ui.label(text.color(color));
            });
    }

    fn full_ui(&mut self, ctx: &egui::Context, now: Instant) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| self.time_label(ui, now, 48.0));
            ui.add_space(6.0);

            let status_color = match self.status {
                Status::Ready => theme::MUTED,
                Status::Recording => theme::RECORDING,
                Status::Recorded(_) => theme::ACCENT,
            };
            ui.label(
                egui::RichText::new(self.status.text())
                    .size(18.0)
                    .color(status_color),
            );
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                let label = if self.stopwatch.is_running() { "Finish" } else { "Start" };
                if ui.button(egui::RichText::new(label).size(18.0)).clicked() {
                    self.toggle();
                }
                if ui
                    .button(egui::RichText::new("Configure Shortcut").size(18.0))
                    .clicked()
                {
                    self.open_shortcut_dialog();
                }
                if ui
                    .button(egui::RichText::new("Compact Mode").size(18.0))
                    .clicked()
                {
                    self.set_compact(ctx, true);
                }
            });
            ui.add_space(6.0);

            ui.label(format!("Recorded times (shortcut: {}):", self.hotkey));
            egui::Frame::none()
                .fill(theme::LIST)
                .rounding(8.0)
                .inner_margin(6.0)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for record in self.stopwatch.history() {
                                ui.label(egui::RichText::new(record).size(16.0).monospace());
                            }
                            if self.scroll_to_last {
                                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                                self.scroll_to_last = false;
                            }
                        });
                });
        });
    }

    fn compact_ui(&mut self, ctx: &egui::Context, now: Instant) {
        let frame = egui::Frame::none().fill(theme::BACKGROUND).inner_margin(6.0);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.stopwatch.is_running() {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 7.0, theme::RECORDING);
                }
                self.time_label(ui, now, 36.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    if ui
                        .small_button("🗖")
                        .on_hover_text("Restore full mode")
                        .clicked()
                    {
                        self.set_compact(ctx, false);
                    }
                });
            });
        });
    }

    /// Run one frame: publish focus, apply queued and in-window toggles,
    /// draw, and schedule the next repaint.
    pub fn frame(&mut self, ctx: &egui::Context) {
        let focused = ctx.input(|i| i.focused);
        self.focus.store(focused, Ordering::SeqCst);

        let applied = self.process_commands();
        if applied > 0 {
            tracing::debug!(applied, "applied queued toggles");
        }

        if focused && !self.shortcut_dialog.open {
            for _ in 0..self.in_window_presses(ctx) {
                self.toggle();
            }
        }

        self.toasts.show(ctx);

        let now = Instant::now();
        if self.compact {
            self.compact_ui(ctx, now);
        } else {
            self.full_ui(ctx, now);
        }

        let mut dlg = std::mem::take(&mut self.shortcut_dialog);
        dlg.ui(ctx, self);
        self.shortcut_dialog = dlg;

        if self.stopwatch.is_running() {
            ctx.request_repaint_after(REFRESH_INTERVAL);
        } else if let Some(until) = self.flash_until {
            match until.checked_duration_since(now) {
                Some(left) => ctx.request_repaint_after(left),
                None => self.flash_until = None,
            }
        }
    }
}

impl eframe::App for StopwatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame(ctx);
    }
}
