pub mod formatter;
mod model;
mod types;

pub use formatter::{Block, Span};
pub use model::{ReportModel, ReportSection};
pub use types::{FraudRisk, ReportData, RiskLevel, TextAnalysis, UploadResponse};
