//! Action buttons
//!
//! Which controls exist is a pure function of the session state: start
//! when idle/stopped/replaying with devices available, stop while
//! recording, replay and next once a take has chunks.

use crate::session::Session;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

/// User intent reported back to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    Replay,
    Next,
}

pub struct Controls<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> Controls<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<ControlAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if self.session.can_start()
                && self.button(ui, "Start New Recording", self.theme.primary).clicked()
            {
                action = Some(ControlAction::Start);
            }

            if self.session.can_stop()
                && self.button(ui, "Stop Recording", self.theme.recording).clicked()
            {
                action = Some(ControlAction::Stop);
            }

            if self.session.can_replay() {
                if self.button(ui, "Replay Recording", self.theme.primary).clicked() {
                    action = Some(ControlAction::Replay);
                }
                ui.add_space(self.theme.spacing_sm);
                if self.button(ui, "Next", self.theme.success).clicked() {
                    action = Some(ControlAction::Next);
                }
            }
        });

        action
    }

    fn button(&self, ui: &mut egui::Ui, label: &str, fill: egui::Color32) -> egui::Response {
        ui.add(
            egui::Button::new(RichText::new(label).color(self.theme.text_primary))
                .fill(fill.gamma_multiply(0.85))
                .min_size(Vec2::new(0.0, 36.0))
                .rounding(self.theme.button_rounding),
        )
    }
}
