use super::registry::FileRegistry;
use super::types::{FileHandle, ProcessingStatus};
use crate::config::EndpointConfig;
use crate::error::{SubmitError, UploadError};
use crate::report::{ReportModel, UploadResponse};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

type BatchResult = Result<UploadResponse, UploadError>;

struct InFlightBatch {
    ids: Vec<String>,
    receiver: oneshot::Receiver<BatchResult>,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub enum BatchOutcome {
    Completed { ids: Vec<String>, message: String },
    Failed { ids: Vec<String>, error: UploadError },
    Cancelled { ids: Vec<String> },
}

/// Sends the registry's files as one multipart batch and drives their status.
///
/// At most one batch is in flight; the network call runs on the tokio runtime
/// while the caller keeps ownership of the registry and report model, and the
/// result is applied by [`poll`](Self::poll).
pub struct UploadCoordinator {
    client: Client,
    upload_url: Url,
    runtime: Handle,
    in_flight: Option<InFlightBatch>,
}

impl UploadCoordinator {
    pub fn new(client: Client, upload_url: Url, runtime: Handle) -> Self {
        Self {
            client,
            upload_url,
            runtime,
            in_flight: None,
        }
    }

    pub fn from_config(endpoint: &EndpointConfig, runtime: Handle) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()?;
        Ok(Self::new(client, endpoint.upload_url()?, runtime))
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    #[cfg(test)]
    pub fn in_flight_ids(&self) -> &[String] {
        self.in_flight
            .as_ref()
            .map(|batch| batch.ids.as_slice())
            .unwrap_or_default()
    }

    /// Marks the batch `processing` and starts the upload. Unregistered ids are
    /// skipped; an empty batch does nothing.
    pub fn submit(&mut self, registry: &mut FileRegistry, ids: &[String]) -> Result<(), SubmitError> {
        if self.in_flight.is_some() {
            warn!("Upload already in progress, rejecting new batch");
            return Err(SubmitError::Busy);
        }

        let files: Vec<(String, FileHandle)> = ids
            .iter()
            .filter_map(|id| registry.get(id))
            .map(|entry| (entry.id.clone(), entry.file.clone()))
            .collect();
        if files.is_empty() {
            debug!("Nothing to upload");
            return Ok(());
        }

        let batch_ids: Vec<String> = files.iter().map(|(id, _)| id.clone()).collect();
        registry.set_status(&batch_ids, ProcessingStatus::Processing);
        info!(files = batch_ids.len(), url = %self.upload_url, "Starting upload");

        let (sender, receiver) = oneshot::channel();
        let client = self.client.clone();
        let url = self.upload_url.clone();
        let task = self.runtime.spawn(async move {
            let result = send_batch(&client, url, files).await;
            let _ = sender.send(result);
        });

        self.in_flight = Some(InFlightBatch {
            ids: batch_ids,
            receiver,
            task,
        });
        Ok(())
    }

    /// Applies the batch result if it has arrived. Never blocks.
    pub fn poll(
        &mut self,
        registry: &mut FileRegistry,
        report: &mut ReportModel,
    ) -> Option<BatchOutcome> {
        let batch = self.in_flight.as_mut()?;
        let result = match batch.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(UploadError::Interrupted),
        };
        let batch = self.in_flight.take()?;
        Some(finish(registry, report, batch.ids, result))
    }

    /// Waits for the in-flight batch and applies its result.
    #[cfg(test)]
    pub async fn settle(
        &mut self,
        registry: &mut FileRegistry,
        report: &mut ReportModel,
    ) -> Option<BatchOutcome> {
        let batch = self.in_flight.take()?;
        let result = batch
            .receiver
            .await
            .unwrap_or_else(|_| Err(UploadError::Interrupted));
        Some(finish(registry, report, batch.ids, result))
    }

    /// Aborts the request; the batch ends `cancelled` and the report is untouched.
    pub fn cancel(&mut self, registry: &mut FileRegistry) -> Option<BatchOutcome> {
        let batch = self.in_flight.take()?;
        batch.task.abort();
        registry.set_status(&batch.ids, ProcessingStatus::Cancelled);
        warn!(files = batch.ids.len(), "Upload cancelled");
        Some(BatchOutcome::Cancelled { ids: batch.ids })
    }
}

fn finish(
    registry: &mut FileRegistry,
    report: &mut ReportModel,
    ids: Vec<String>,
    result: BatchResult,
) -> BatchOutcome {
    match result {
        Ok(response) => {
            let overrides = response.data.processing_status.as_ref();
            let mut groups: HashMap<ProcessingStatus, Vec<String>> = HashMap::new();
            for id in &ids {
                let status = match overrides.and_then(|statuses| statuses.get(id)) {
                    Some(status) if status.is_terminal() => *status,
                    Some(status) => {
                        warn!(%id, %status, "Ignoring non-final status for a resolved batch");
                        ProcessingStatus::Completed
                    }
                    None => ProcessingStatus::Completed,
                };
                groups.entry(status).or_default().push(id.clone());
            }
            for (status, group) in &groups {
                registry.set_status(group, *status);
            }

            info!(
                files = ids.len(),
                status = %response.status,
                message = %response.message,
                "Upload completed"
            );
            report.replace(response.data);
            BatchOutcome::Completed {
                ids,
                message: response.message,
            }
        }
        Err(e) => {
            error!(files = ids.len(), error = %e, "Upload failed");
            registry.set_status(&ids, ProcessingStatus::Error);
            BatchOutcome::Failed { ids, error: e }
        }
    }
}

async fn send_batch(client: &Client, url: Url, files: Vec<(String, FileHandle)>) -> BatchResult {
    let mut form = Form::new();
    for (id, file) in files {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(UploadError::Request)?;
        form = form.part("files", part).text("file_ids", id);
    }

    let response = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(UploadError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UploadError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await.map_err(UploadError::Transport)?;
    serde_json::from_slice(&body).map_err(UploadError::Decode)
}
