//! Timer label component
//!
//! Shows the remaining recording time, switching to the alert color when
//! it drops below the configured threshold.

use crate::session::{Session, SessionState};
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct TimerLabel<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> TimerLabel<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        // Hidden during replay, like the live preview
        if self.session.state() == SessionState::Replaying {
            return;
        }

        let color = if self.session.timer_alert() {
            self.theme.timer_alert
        } else {
            self.theme.timer_normal
        };

        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(self.session.timer_text())
                    .size(32.0)
                    .strong()
                    .color(color),
            );
        });
    }
}
