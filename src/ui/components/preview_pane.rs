//! Live preview pane
//!
//! Shows the camera feed with a microphone level bar underneath and a
//! recording indicator while capture is active.

use crate::ui::theme::Theme;
use egui::{self, Pos2, Rect, RichText, Stroke, TextureHandle, Vec2};

pub struct PreviewPane<'a> {
    theme: &'a Theme,
    texture: Option<&'a TextureHandle>,
    /// Smoothed microphone RMS level in [0, 1]
    level: f32,
    recording: bool,
}

impl<'a> PreviewPane<'a> {
    pub fn new(theme: &'a Theme, texture: Option<&'a TextureHandle>, level: f32, recording: bool) -> Self {
        Self {
            theme,
            texture,
            level,
            recording,
        }
    }

    /// Render the pane and return the rect the video occupies, so the
    /// countdown overlay can be painted on top of it.
    pub fn show(self, ui: &mut egui::Ui) -> Rect {
        let width = ui.available_width().min(640.0);

        let video_rect = match self.texture {
            Some(texture) => {
                let tex_size = texture.size_vec2();
                let aspect = if tex_size.x > 0.0 {
                    tex_size.y / tex_size.x
                } else {
                    0.75
                };
                let size = Vec2::new(width, width * aspect);
                let response = ui.add(
                    egui::Image::from_texture(texture)
                        .fit_to_exact_size(size)
                        .rounding(self.theme.card_rounding),
                );
                response.rect
            }
            None => {
                let size = Vec2::new(width, width * 0.75);
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                ui.painter()
                    .rect_filled(rect, self.theme.card_rounding, self.theme.bg_secondary);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No camera signal",
                    egui::FontId::proportional(16.0),
                    self.theme.text_muted,
                );
                rect
            }
        };

        if self.recording {
            self.draw_recording_indicator(ui, video_rect);
        }

        ui.add_space(self.theme.spacing_sm);
        self.draw_level_bar(ui, width);

        video_rect
    }

    fn draw_recording_indicator(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter();
        let center = Pos2::new(rect.right() - 20.0, rect.top() + 20.0);
        painter.circle_filled(center, 7.0, self.theme.recording);
        painter.text(
            Pos2::new(center.x - 14.0, center.y),
            egui::Align2::RIGHT_CENTER,
            "REC",
            egui::FontId::monospace(12.0),
            self.theme.recording,
        );
    }

    fn draw_level_bar(&self, ui: &mut egui::Ui, width: f32) {
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(width, 8.0), egui::Sense::hover());
        let painter = ui.painter();

        painter.rect_filled(rect, 4.0, self.theme.meter_inactive);

        let level = self.level.clamp(0.0, 1.0);
        if level > 0.0 {
            let filled = Rect::from_min_size(
                rect.min,
                Vec2::new(rect.width() * level, rect.height()),
            );
            painter.rect_filled(filled, 4.0, self.theme.meter_active);
        }

        painter.rect_stroke(rect, 4.0, Stroke::new(1.0, self.theme.bg_secondary));
    }
}

/// Label shown under the preview while devices are unavailable
pub fn unavailable_notice(ui: &mut egui::Ui, theme: &Theme) {
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new("Camera and microphone are not accessible")
                .color(theme.error),
        );
    });
}
