use eframe::egui;

use edgezoom_core::ZoomState;

use crate::app::{EdgeZoomApp, HUD_ALPHA, HUD_CORNER_RADIUS, HUD_MARGIN};

const WARNING: egui::Color32 = egui::Color32::from_rgb(255, 180, 50);

impl EdgeZoomApp {
    pub(crate) fn show_hud(&self, ctx: &egui::Context) {
        if !self.show_hud {
            return;
        }

        // -- Top-left: run info --
        egui::Area::new(egui::Id::new("hud_params"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        if let Some(message) = &self.stalled {
                            ui.colored_label(WARNING, format!("Stopped: {message}"));
                        } else if self.paused {
                            ui.colored_label(WARNING, "Paused");
                        }

                        let Some(latest) = &self.latest else {
                            ui.label("Waiting for first frame\u{2026}");
                            return;
                        };
                        let report = &latest.report;

                        ui.label(format!("Fractal: {}", report.spec.kind().label()));
                        if let Some(c) = report.spec.julia_constant() {
                            ui.label(format!("Julia c: {}", c.to_string_digits(8)));
                        }
                        ui.label(format!(
                            "Scale: {}",
                            report.view.scale().to_string_radix(10, Some(4))
                        ));
                        ui.label(format!("Precision: {} bits", report.view.precision()));
                        ui.label(format!("Step: {}", report.step));
                        ui.label(format!(
                            "Target: ({}, {}) at {} iterations",
                            report.target.row, report.target.col, report.target.iterations
                        ));

                        if let ZoomState::PrecisionCeiling { required, ceiling } = report.state {
                            ui.colored_label(
                                WARNING,
                                format!("Precision ceiling: need {required} of {ceiling} bits"),
                            );
                        }
                    });
            });

        // -- Bottom-centre: evaluation stats and keys --
        egui::Area::new(egui::Id::new("hud_render"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(HUD_ALPHA))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.set_min_width(180.0);
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(200, 200, 200));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        if let Some(latest) = &self.latest {
                            ui.label(format!(
                                "{:.1} ms ({})",
                                latest.report.elapsed.as_secs_f64() * 1000.0,
                                latest.report.arithmetic.label(),
                            ));
                        }
                        let (done, total) = self.cancel.progress();
                        if total > 0 && done < total {
                            ui.label(format!("{done}/{total} tiles"));
                        }
                        ui.label("\u{2190}/\u{2192} new fractal   Space pause   S snapshot   H HUD");
                    });
            });
    }
}
