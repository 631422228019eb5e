mod app;
mod config;
mod error;
mod logging;
mod report;
mod upload;
mod utils;

use anyhow::anyhow;
use app::InsuraUploader;
use config::UploaderConfig;
use upload::UploadCoordinator;

fn main() -> anyhow::Result<()> {
    let config = UploaderConfig::load()?;
    logging::init_logging(&config.logging)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let coordinator = UploadCoordinator::from_config(&config.endpoint, runtime.handle().clone())?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "InsuraGenie",
        options,
        Box::new(move |cc| Box::new(InsuraUploader::new(cc, &config, coordinator))),
    )
    .map_err(|e| anyhow!("Failed to start window: {}", e))?;

    Ok(())
}
