use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    /// Coarse "in flight" state set for the whole batch while the request runs
    Processing,
    Classifying,
    ExtractingText,
    ParsingForm,
    AnalyzingFraud,
    Validating,
    Summarizing,
    Completed,
    Cancelled,
    Error,
}

impl ProcessingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Classifying => "Classifying",
            Self::ExtractingText => "Extracting text",
            Self::ParsingForm => "Parsing form",
            Self::AnalyzingFraud => "Analyzing fraud",
            Self::Validating => "Validating",
            Self::Summarizing => "Summarizing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Error => "Error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Error)
    }

    /// Everything between `pending` and a terminal state.
    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal() && *self != Self::Pending
    }

    pub fn parse(value: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase())).ok()
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable handle to a user-selected document.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct FileHandle {
    pub name: String,
    pub path: PathBuf,
    pub mime: String,
    #[derivative(Debug = "ignore")]
    pub bytes: Arc<[u8]>,
}

impl FileHandle {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub id: String,
    pub file: FileHandle,
    pub status: ProcessingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProcessingStatus::ExtractingText).unwrap(),
            "\"extracting_text\""
        );
        assert_eq!(
            ProcessingStatus::parse(" Analyzing_Fraud"),
            Some(ProcessingStatus::AnalyzingFraud)
        );
        assert_eq!(ProcessingStatus::parse("queued"), None);
    }

    #[test]
    fn test_status_phases() {
        assert!(!ProcessingStatus::Pending.is_in_flight());
        assert!(ProcessingStatus::Processing.is_in_flight());
        assert!(ProcessingStatus::Summarizing.is_in_flight());
        assert!(ProcessingStatus::Cancelled.is_terminal());
        assert!(!ProcessingStatus::Cancelled.is_in_flight());
    }
}
