use eframe::egui;

use crate::app::EdgeZoomApp;

impl EdgeZoomApp {
    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let (reset, pause, snapshot, hud) = ctx.input(|input| {
            (
                // Both arrows do the same thing: start a new fractal.
                input.key_pressed(egui::Key::ArrowLeft) || input.key_pressed(egui::Key::ArrowRight),
                input.key_pressed(egui::Key::Space),
                input.key_pressed(egui::Key::S) && !input.modifiers.ctrl,
                input.key_pressed(egui::Key::H),
            )
        });

        if reset {
            self.request_reset();
        }
        if pause {
            self.toggle_pause();
        }
        if snapshot {
            self.save_snapshot();
        }
        if hud {
            self.show_hud = !self.show_hud;
        }
    }
}
