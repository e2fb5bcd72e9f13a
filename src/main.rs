use anyhow::Result;
use retake::config::RecorderConfig;
use retake::host::{HostEvent, HostLink};
use retake::ui::RetakeApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retake=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RecorderConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    info!(
        "Starting Retake recorder (time limit: {}s)",
        config.time_limit_secs
    );

    // Stand-in host: a real embedding supplies its own receiver
    let (host, host_rx) = HostLink::channel(16);
    std::thread::spawn(move || {
        for event in host_rx.iter() {
            match event {
                HostEvent::ChunksReplaced(chunks) => {
                    let bytes: usize = chunks.iter().map(|c| c.len()).sum();
                    info!("Host received {} chunks ({} bytes)", chunks.len(), bytes);
                }
                HostEvent::GoToSummary => {
                    info!("Host advancing to summary step");
                }
            }
        }
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Retake",
        options,
        Box::new(move |cc| Ok(Box::new(RetakeApp::new(cc, config, host)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
