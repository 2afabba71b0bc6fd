use eframe::egui;

pub const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x11, 0x11, 0x11);
pub const PANEL: egui::Color32 = egui::Color32::from_rgb(0x22, 0x22, 0x22);
pub const LIST: egui::Color32 = egui::Color32::from_rgb(0x18, 0x18, 0x18);
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x00, 0xFF, 0xAA);
pub const RECORDING: egui::Color32 = egui::Color32::from_rgb(0xFF, 0x33, 0x33);
pub const TEXT: egui::Color32 = egui::Color32::from_rgb(0xEE, 0xEE, 0xEE);
pub const MUTED: egui::Color32 = egui::Color32::from_rgb(0xAA, 0xAA, 0xAA);

/// Dark visuals with the green accent used for buttons and the time label.
pub fn stopwatch_visuals(defaults: &egui::Visuals) -> egui::Visuals {
    let mut visuals = defaults.clone();
    visuals.dark_mode = true;
    visuals.window_fill = BACKGROUND;
    visuals.panel_fill = BACKGROUND;
    visuals.extreme_bg_color = LIST;
    visuals.override_text_color = Some(TEXT);

    visuals.widgets.noninteractive.bg_fill = BACKGROUND;
    visuals.widgets.inactive.bg_fill = PANEL;
    visuals.widgets.inactive.weak_bg_fill = PANEL;
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(2.0, ACCENT);
    visuals.widgets.inactive.fg_stroke.color = ACCENT;
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(0x33, 0x33, 0x33);
    visuals.widgets.hovered.weak_bg_fill = egui::Color32::from_rgb(0x33, 0x33, 0x33);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(2.0, egui::Color32::WHITE);
    visuals.widgets.hovered.fg_stroke.color = egui::Color32::WHITE;
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.weak_bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke.color = BACKGROUND;

    visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    visuals.selection.stroke.color = ACCENT;
    visuals.warn_fg_color = egui::Color32::from_rgb(0xFF, 0xCC, 0x33);
    visuals.error_fg_color = RECORDING;

    visuals
}
