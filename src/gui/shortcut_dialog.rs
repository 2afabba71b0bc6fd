use crate::gui::StopwatchApp;
use eframe::egui;

/// Modal for changing the record shortcut.
#[derive(Default)]
pub struct ShortcutDialog {
    pub open: bool,
    input: String,
}

impl ShortcutDialog {
    pub fn open(&mut self, current: &str) {
        self.input = current.to_string();
        self.open = true;
    }

    pub fn ui(&mut self, ctx: &egui::Context, app: &mut StopwatchApp) {
        if !self.open {
            return;
        }
        let mut open_val = self.open;
        let mut close = false;
        egui::Window::new("Configure Shortcut")
            .open(&mut open_val)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Shortcut to record time:");
                    let resp = ui.text_edit_singleline(&mut self.input);
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        close = app.set_shortcut(&self.input);
                    }
                });
                ui.label(
                    egui::RichText::new("e.g. ], F8, Ctrl+Shift+Space")
                        .small()
                        .color(crate::gui::theme::MUTED),
                );
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        close = app.set_shortcut(&self.input);
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });
        if close {
            open_val = false;
        }
        self.open = open_val;
    }
}
