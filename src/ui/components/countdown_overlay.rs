//! Lead-in countdown overlay
//!
//! Painted over the live preview while the fixed lead-in runs.

use crate::ui::theme::Theme;
use egui::{self, Align2, Color32, FontId, Rect};

pub struct CountdownOverlay<'a> {
    theme: &'a Theme,
    /// Whole seconds left; None or zero renders "Go!"
    seconds_left: Option<u64>,
}

impl<'a> CountdownOverlay<'a> {
    pub fn new(theme: &'a Theme, seconds_left: Option<u64>) -> Self {
        Self {
            theme,
            seconds_left,
        }
    }

    pub fn paint(self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter();
        painter.rect_filled(
            rect,
            self.theme.card_rounding,
            Color32::from_black_alpha(128),
        );

        let text = match self.seconds_left {
            Some(secs) if secs > 0 => secs.to_string(),
            _ => "Go!".to_string(),
        };

        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(72.0),
            self.theme.text_primary,
        );
    }
}
