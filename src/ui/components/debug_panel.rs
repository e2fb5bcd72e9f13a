//! Debug panel component
//!
//! Displays internal session state for debugging.

use crate::session::{Session, SessionState};
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

pub struct DebugPanel<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new("Debug Panel")
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.separator();

                    egui::Grid::new("debug_stats")
                        .num_columns(2)
                        .spacing([20.0, 4.0])
                        .show(ui, |ui| {
                            self.stat_row(ui, "State", &self.state_label());
                            self.stat_row(ui, "Remaining", &format!("{}s", self.session.remaining()));
                            self.stat_row(
                                ui,
                                "Devices",
                                if self.session.devices_available() {
                                    "available"
                                } else {
                                    "unavailable"
                                },
                            );
                            self.stat_row(ui, "Chunks", &self.session.chunk_count().to_string());

                            let bytes: usize =
                                self.session.chunks().iter().map(|c| c.len()).sum();
                            self.stat_row(ui, "Buffered", &format!("{} KiB", bytes / 1024));

                            if let Some(artifact) = self.session.artifact() {
                                self.stat_row(
                                    ui,
                                    "Artifact",
                                    &format!(
                                        "{} frames, {:.1}s",
                                        artifact.frame_count(),
                                        artifact.duration().as_secs_f32()
                                    ),
                                );
                            }

                            if let Some(take) = self.session.take() {
                                self.stat_row(
                                    ui,
                                    "Take",
                                    &format!("{} @ {}", take.id, take.started_at.format("%H:%M:%S")),
                                );
                            }
                        });

                    ui.add_space(self.theme.spacing_sm);
                    ui.separator();

                    ui.label(
                        RichText::new("Recent Logs")
                            .size(12.0)
                            .strong()
                            .color(self.theme.text_secondary),
                    );

                    ScrollArea::vertical()
                        .max_height(160.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in self.session.log().entries() {
                                ui.label(
                                    RichText::new(entry)
                                        .size(11.0)
                                        .family(egui::FontFamily::Monospace)
                                        .color(self.theme.text_muted),
                                );
                            }
                        });
                });
            });
    }

    fn stat_row(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(
            RichText::new(label)
                .size(12.0)
                .color(self.theme.text_muted),
        );
        ui.label(
            RichText::new(value)
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_secondary),
        );
        ui.end_row();
    }

    fn state_label(&self) -> String {
        match self.session.state() {
            SessionState::Idle => "Idle",
            SessionState::Countdown => "Countdown",
            SessionState::Recording => "Recording",
            SessionState::Stopped => "Stopped",
            SessionState::Replaying => "Replaying",
        }
        .to_string()
    }
}
