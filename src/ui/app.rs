//! Main application struct and eframe integration

use crate::capture::{CaptureDevices, LevelMeter, MediaChunk, TakeRecorder};
use crate::config::RecorderConfig;
use crate::host::HostLink;
use crate::session::{Session, SessionCommand, SessionEvent, SessionState, StopReason, TickDriver};
use crate::ui::components::{
    ControlAction, Controls, CountdownOverlay, DebugPanel, PreviewPane, ReplayPane, ReplayPlayer,
    TimerLabel,
};
use crate::ui::theme::Theme;
use crate::RetakeError;
use crossbeam_channel::{bounded, Receiver, Sender};
use egui::{self, CentralPanel, RichText, SidePanel, TextureHandle, TextureOptions, TopBottomPanel};
use std::time::{Duration, Instant};
use tracing::error;

/// The recording widget: owns the session state machine, the capture
/// devices, the timer driver and the chunk channel, and executes the
/// commands the dispatcher returns.
pub struct RetakeApp {
    theme: Theme,
    session: Session,
    devices: Option<CaptureDevices>,
    recorder: TakeRecorder,
    timer: TickDriver,
    chunk_tx: Sender<MediaChunk>,
    chunk_rx: Receiver<MediaChunk>,
    host: HostLink,
    replay: ReplayPlayer,
    preview_texture: Option<TextureHandle>,
    /// Smoothed microphone RMS level for the meter bar
    level: f32,
    alert: Option<String>,
    show_debug_panel: bool,
    released: bool,
}

impl RetakeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: RecorderConfig, host: HostLink) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let (chunk_tx, chunk_rx) = bounded(256);
        let devices = CaptureDevices::acquire(&config);

        let mut app = Self {
            theme,
            session: Session::new(config),
            devices: None,
            recorder: TakeRecorder::new(),
            timer: TickDriver::new(),
            chunk_tx,
            chunk_rx,
            host,
            replay: ReplayPlayer::new(),
            preview_texture: None,
            level: 0.0,
            alert: None,
            show_debug_panel: false,
            released: false,
        };

        match devices {
            Ok(devices) => {
                app.devices = Some(devices);
                app.dispatch(SessionEvent::DevicesReady);
            }
            Err(e) => {
                error!("Device acquisition failed: {}", e);
                app.dispatch(SessionEvent::DevicesDenied);
            }
        }

        app
    }

    /// Run one event through the dispatcher and execute its commands
    fn dispatch(&mut self, event: SessionEvent) {
        let commands = self.session.handle(event);
        self.run_commands(commands);
    }

    fn run_commands(&mut self, commands: Vec<SessionCommand>) {
        let now = Instant::now();
        for command in commands {
            match command {
                SessionCommand::BeginLeadIn => {
                    self.timer
                        .begin_lead_in(now, self.session.config().lead_in_secs);
                }
                SessionCommand::BeginCapture => {
                    let result = match &self.devices {
                        Some(devices) => self.recorder.start(devices, self.chunk_tx.clone()),
                        None => Err(RetakeError::CaptureStart("no devices acquired".into())),
                    };
                    match result {
                        Ok(_) => self.dispatch(SessionEvent::CaptureStarted),
                        Err(e) => self.dispatch(SessionEvent::CaptureFailed(e.to_string())),
                    }
                }
                SessionCommand::BeginTicking => {
                    self.timer.begin_ticking(now);
                }
                SessionCommand::ArmGraceStop => {
                    self.timer
                        .arm_grace_stop(now, self.session.config().grace_stop_ms);
                }
                SessionCommand::EndCapture => {
                    if let Some(devices) = &self.devices {
                        self.recorder.stop(devices);
                    }
                    self.timer.clear();
                }
                SessionCommand::ProbeDevices => {
                    let lost = self
                        .devices
                        .as_ref()
                        .map(|d| d.probe().is_err())
                        .unwrap_or(true);
                    if lost {
                        self.dispatch(SessionEvent::DeviceLost);
                    }
                }
                SessionCommand::PublishChunks => {
                    self.host.replace_chunks(self.session.chunks());
                }
                SessionCommand::GoToSummary => {
                    self.host.go_to_summary();
                }
                SessionCommand::Alert(message) => {
                    self.alert = Some(message);
                }
            }
        }
    }

    fn pump_events(&mut self, now: Instant) {
        for event in self.timer.poll(now) {
            self.dispatch(event);
        }

        let chunks: Vec<MediaChunk> = self.chunk_rx.try_iter().collect();
        for chunk in chunks {
            self.dispatch(SessionEvent::Chunk(chunk));
        }
    }

    fn update_preview(&mut self, ctx: &egui::Context) {
        let Some(devices) = &self.devices else {
            return;
        };

        let samples = devices.meter().drain(4096);
        let rms = LevelMeter::rms(&samples);
        self.level = 0.7 * self.level + 0.3 * rms;

        if self.session.state() == SessionState::Replaying {
            return;
        }

        if let Some(frame) = devices.latest_frame() {
            let image = egui::ColorImage::from_rgb(
                [frame.width as usize, frame.height as usize],
                &frame.rgb,
            );
            match &mut self.preview_texture {
                Some(texture) => texture.set(image, TextureOptions::LINEAR),
                None => {
                    self.preview_texture =
                        Some(ctx.load_texture("camera-preview", image, TextureOptions::LINEAR));
                }
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Retake")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Take Recorder")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🔍").on_hover_text("Toggle Debug Panel").clicked() {
                            self.show_debug_panel = !self.show_debug_panel;
                        }
                    });
                });
            });
    }

    fn show_debug_panel(&mut self, ctx: &egui::Context) {
        if !self.show_debug_panel {
            return;
        }

        SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(300.0)
            .min_width(250.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                DebugPanel::new(&self.session, &self.theme).show(ui);
            });
    }

    fn show_controls(&mut self, ctx: &egui::Context) {
        let mut action = None;
        TopBottomPanel::bottom("controls")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    action = Controls::new(&self.session, &self.theme).show(ui);
                });
            });

        match action {
            Some(ControlAction::Start) => {
                self.replay.reset();
                self.dispatch(SessionEvent::StartPressed);
            }
            Some(ControlAction::Stop) => {
                self.dispatch(SessionEvent::StopRequested(StopReason::Manual));
            }
            Some(ControlAction::Replay) => {
                self.dispatch(SessionEvent::ReplayPressed);
            }
            Some(ControlAction::Next) => {
                self.dispatch(SessionEvent::NextPressed);
            }
            None => {}
        }
    }

    fn show_content(&mut self, ctx: &egui::Context, now: Instant) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    TimerLabel::new(&self.session, &self.theme).show(ui);
                    ui.add_space(self.theme.spacing_sm);

                    match self.session.state() {
                        SessionState::Replaying => {
                            if let Some(artifact) = self.session.artifact() {
                                ReplayPane::new(&self.theme, artifact)
                                    .show(ui, &mut self.replay);
                            }
                        }
                        state => {
                            let rect = PreviewPane::new(
                                &self.theme,
                                self.preview_texture.as_ref(),
                                self.level,
                                state == SessionState::Recording,
                            )
                            .show(ui);

                            if state == SessionState::Countdown {
                                let seconds = self.timer.lead_in_remaining(now);
                                CountdownOverlay::new(&self.theme, seconds).paint(ui, rect);
                            }

                            if !self.session.devices_available() {
                                ui.add_space(self.theme.spacing_sm);
                                crate::ui::components::preview_pane::unavailable_notice(
                                    ui,
                                    &self.theme,
                                );
                            }
                        }
                    }
                });
            });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("⚠ Recording")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(RichText::new(message).color(self.theme.text_primary));
                ui.add_space(self.theme.spacing_sm);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.alert = None;
        }
    }

    /// Stop capture, cancel timers and release the devices. Safe to call
    /// more than once; runs on every exit path.
    fn shutdown(&mut self) {
        if self.released {
            return;
        }
        if let Some(devices) = &self.devices {
            self.recorder.stop(devices);
        }
        self.timer.clear();
        if let Some(mut devices) = self.devices.take() {
            devices.release();
        }
        self.released = true;
    }
}

impl eframe::App for RetakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.pump_events(now);
        self.update_preview(ctx);

        self.show_header(ctx);
        self.show_debug_panel(ctx);
        self.show_controls(ctx);
        self.show_content(ctx, now);
        self.show_alert(ctx);

        // Live preview and countdowns need continuous repaints
        if self.devices.is_some() {
            ctx.request_repaint_after(Duration::from_millis(33));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}

impl Drop for RetakeApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}
