mod preview;
mod state;
mod ui;
mod viewer;

use crate::config::UploaderConfig;
use crate::upload::UploadCoordinator;
use eframe::{egui, App};
use preview::PreviewSlot;
pub use state::{Notice, UploadSession};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub struct InsuraUploader {
    session: UploadSession,
    previews: PreviewSlot<egui::TextureHandle>,
    show_selection_errors: bool,
}

impl InsuraUploader {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &UploaderConfig,
        coordinator: UploadCoordinator,
    ) -> Self {
        info!(url = %coordinator.upload_url(), "Initializing InsuraGenie uploader");
        Self {
            session: UploadSession::new(config, coordinator),
            previews: PreviewSlot::default(),
            show_selection_errors: true,
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            let added = self.session.add_paths(&dropped);
            info!(dropped = dropped.len(), added, "Files dropped onto window");
        }

        self.session.update();

        if !self.session.viewer.preview_visible() {
            self.previews.release();
        }

        if self.session.is_uploading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl App for InsuraUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
