//! Replay pane
//!
//! Plays back the assembled artifact: steps through recorded frames on
//! the playback clock and shows a progress bar with pause/resume.

use crate::session::PlaybackArtifact;
use crate::ui::theme::Theme;
use egui::{self, RichText, TextureHandle, TextureOptions, Vec2};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Playback clock and frame texture for the current artifact
#[derive(Default)]
pub struct ReplayPlayer {
    texture: Option<TextureHandle>,
    artifact_id: Option<Uuid>,
    position: Duration,
    last_update: Option<Instant>,
    paused: bool,
}

impl ReplayPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the current artifact; called when a new take starts
    pub fn reset(&mut self) {
        self.texture = None;
        self.artifact_id = None;
        self.position = Duration::ZERO;
        self.last_update = None;
        self.paused = false;
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_paused(&mut self) {
        self.paused = !self.paused;
        self.last_update = None;
    }

    pub fn rewind(&mut self) {
        self.position = Duration::ZERO;
        self.last_update = None;
        self.paused = false;
    }

    /// Advance the playback clock; restarts when the artifact changed
    pub fn advance(&mut self, artifact: &PlaybackArtifact, now: Instant) {
        if self.artifact_id != Some(artifact.id()) {
            self.artifact_id = Some(artifact.id());
            self.position = Duration::ZERO;
            self.paused = false;
            self.last_update = None;
        }

        if !self.paused {
            if let Some(last) = self.last_update {
                self.position = (self.position + (now - last)).min(artifact.duration());
            }
        }
        self.last_update = Some(now);
    }

    pub fn finished(&self, artifact: &PlaybackArtifact) -> bool {
        self.position >= artifact.duration()
    }
}

pub struct ReplayPane<'a> {
    theme: &'a Theme,
    artifact: &'a PlaybackArtifact,
}

impl<'a> ReplayPane<'a> {
    pub fn new(theme: &'a Theme, artifact: &'a PlaybackArtifact) -> Self {
        Self { theme, artifact }
    }

    pub fn show(self, ui: &mut egui::Ui, player: &mut ReplayPlayer) {
        player.advance(self.artifact, Instant::now());

        let width = ui.available_width().min(640.0);

        if let Some(frame) = self.artifact.frame_at(player.position()) {
            let image = egui::ColorImage::from_rgb(
                [frame.width as usize, frame.height as usize],
                &frame.rgb,
            );
            match &mut player.texture {
                Some(texture) => texture.set(image, TextureOptions::LINEAR),
                None => {
                    player.texture =
                        Some(ui.ctx().load_texture("replay-frame", image, TextureOptions::LINEAR));
                }
            }
        }

        match &player.texture {
            Some(texture) => {
                let tex_size = texture.size_vec2();
                let aspect = if tex_size.x > 0.0 {
                    tex_size.y / tex_size.x
                } else {
                    0.75
                };
                ui.add(
                    egui::Image::from_texture(texture)
                        .fit_to_exact_size(Vec2::new(width, width * aspect))
                        .rounding(self.theme.card_rounding),
                );
            }
            None => {
                // Audio-only take
                let (rect, _) = ui.allocate_exact_size(
                    Vec2::new(width, width * 0.75),
                    egui::Sense::hover(),
                );
                ui.painter()
                    .rect_filled(rect, self.theme.card_rounding, self.theme.bg_secondary);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Audio only",
                    egui::FontId::proportional(16.0),
                    self.theme.text_muted,
                );
            }
        }

        ui.add_space(self.theme.spacing_sm);
        self.show_transport(ui, player, width);
    }

    fn show_transport(&self, ui: &mut egui::Ui, player: &mut ReplayPlayer, width: f32) {
        let total = self.artifact.duration().as_secs_f32().max(f32::EPSILON);
        let progress = player.position().as_secs_f32() / total;

        ui.horizontal(|ui| {
            let icon = if player.is_paused() || player.finished(self.artifact) {
                "▶"
            } else {
                "⏸"
            };
            if ui
                .button(RichText::new(icon).size(18.0))
                .on_hover_text("Pause / resume")
                .clicked()
            {
                if player.finished(self.artifact) {
                    player.rewind();
                } else {
                    player.toggle_paused();
                }
            }

            ui.add_sized(
                Vec2::new(width - 120.0, 16.0),
                egui::ProgressBar::new(progress).fill(self.theme.primary),
            );

            ui.label(
                RichText::new(format!(
                    "{:.0}s / {:.0}s",
                    player.position().as_secs_f32(),
                    self.artifact.duration().as_secs_f32()
                ))
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_muted),
            );
        });
    }
}
