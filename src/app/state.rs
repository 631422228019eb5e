use super::viewer::ViewerController;
use crate::config::UploaderConfig;
use crate::error::SelectionError;
use crate::report::ReportModel;
use crate::upload::{BatchOutcome, FileHandle, FileRegistry, SelectionPolicy, UploadCoordinator};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// One independent upload session: files, report, focus and the coordinator
/// that is the only writer of statuses and reports.
pub struct UploadSession {
    pub registry: FileRegistry,
    pub report: ReportModel,
    pub viewer: ViewerController,
    coordinator: UploadCoordinator,
    policy: SelectionPolicy,
    pub selection_errors: Vec<String>,
    pub notice: Option<Notice>,
}

impl UploadSession {
    pub fn new(config: &UploaderConfig, coordinator: UploadCoordinator) -> Self {
        Self {
            registry: FileRegistry::new(),
            report: ReportModel::new(),
            viewer: ViewerController::new(&config.viewer),
            coordinator,
            policy: SelectionPolicy::from_config(&config.selection),
            selection_errors: Vec::new(),
            notice: None,
        }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn upload_url(&self) -> String {
        self.coordinator.upload_url().to_string()
    }

    pub fn is_uploading(&self) -> bool {
        self.coordinator.is_busy()
    }

    pub fn can_upload(&self) -> bool {
        !self.registry.is_empty() && !self.is_uploading()
    }

    pub fn add_paths(&mut self, paths: &[PathBuf]) -> usize {
        let (accepted, rejected) = self.policy.load_all(paths.iter().map(|p| p.as_path()));
        self.register(accepted, rejected)
    }

    pub fn add_folder(&mut self, folder: &Path) -> usize {
        let (accepted, rejected) = self.policy.load_folder(folder);
        if accepted.is_empty() && rejected.is_empty() {
            self.selection_errors
                .push(format!("No supported documents found in {}", folder.display()));
        }
        self.register(accepted, rejected)
    }

    fn register(
        &mut self,
        accepted: Vec<FileHandle>,
        rejected: Vec<SelectionError>,
    ) -> usize {
        for e in rejected {
            warn!(error = %e, "File not added");
            self.selection_errors.push(e.to_string());
        }
        self.registry.add(accepted).len()
    }

    pub fn remove_file(&mut self, id: &str) {
        self.registry.remove(id);
        self.viewer.reconcile(&self.registry);
    }

    pub fn select_file(&mut self, id: &str) {
        self.viewer.select(&self.registry, id);
    }

    /// Submits every registered file as one batch.
    pub fn start_upload(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        let ids = self.registry.ids();
        match self.coordinator.submit(&mut self.registry, &ids) {
            Ok(()) => self.notice = None,
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
    }

    pub fn cancel_upload(&mut self) {
        if let Some(outcome) = self.coordinator.cancel(&mut self.registry) {
            self.record(outcome);
        }
    }

    /// Called once per frame.
    pub fn update(&mut self) {
        if let Some(outcome) = self.coordinator.poll(&mut self.registry, &mut self.report) {
            self.record(outcome);
        }
        self.viewer.reconcile(&self.registry);
    }

    /// Waits for the in-flight batch, if any.
    #[cfg(test)]
    pub async fn wait_for_upload(&mut self) {
        if let Some(outcome) = self
            .coordinator
            .settle(&mut self.registry, &mut self.report)
            .await
        {
            self.record(outcome);
        }
    }

    fn record(&mut self, outcome: BatchOutcome) {
        self.notice = Some(match outcome {
            BatchOutcome::Completed { ids, message } => {
                let message = if message.is_empty() {
                    "Analysis complete".to_string()
                } else {
                    message
                };
                Notice::Info(format!("{} ({} files)", message, ids.len()))
            }
            BatchOutcome::Failed { ids, error } => Notice::Error(format!(
                "Upload of {} files failed: {}. Check the service and upload again.",
                ids.len(),
                error
            )),
            BatchOutcome::Cancelled { ids } => {
                Notice::Info(format!("Upload of {} files cancelled", ids.len()))
            }
        });
    }
}
