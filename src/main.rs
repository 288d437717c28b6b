use color_coder::capture::{CaptureService, StillImageCapture, SyntheticCapture};
use color_coder::config::Configuration;
use color_coder::error::AppError;
use color_coder::inspection::{CaptureStatus, InspectionSession};
use color_coder::Translation;
use image::Rgba;
use std::path::Path;
use tracing::Level;

const CONFIG_FILE: &str = "color-coder.toml";

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let configuration = Configuration::load(Some(Path::new(CONFIG_FILE)))?;
    init_logging(configuration.log_level.parse().unwrap_or(Level::INFO));

    let capture: Box<dyn CaptureService> = match &configuration.capture.photo_path {
        Some(path) => Box::new(StillImageCapture::new(path)),
        None => {
            tracing::warn!("No photo configured, capturing a synthetic red frame");
            Box::new(SyntheticCapture::solid(4032, 3024, Rgba([220, 20, 30, 255])))
        }
    };

    let mut session = InspectionSession::builder(configuration)
        .capture_service(capture)
        .build()?;

    if let CaptureStatus::Unavailable(reason) = session.start().await {
        tracing::error!("Camera unavailable: {}", reason);
        return Ok(());
    }

    let inspection = session.capture().await?;
    tracing::info!(
        "{} {} ({})",
        inspection.stat.title,
        inspection.stat.probability,
        inspection.stat.footer
    );

    // nudge the picker toward the top-left corner of the region
    session.drag_changed(Translation::new(-40.0, -40.0));
    if let Some(stat) = session.drag_ended() {
        tracing::info!(
            "Picked {}: {} {} ({})",
            stat.color.hex(),
            stat.title,
            stat.probability,
            stat.footer
        );
    }

    session.stop();
    Ok(())
}
