use super::formatter::{self, Blocks};
use super::types::{FraudRisk, ReportData};
use tracing::warn;

/// Holds the last successful batch report. Replaced wholesale, never merged.
#[derive(Debug, Default)]
pub struct ReportModel {
    current: Option<ReportData>,
}

#[derive(Debug, Clone)]
pub enum ReportSection<'a> {
    Text {
        title: &'static str,
        blocks: Blocks<'a>,
    },
    FraudRisk(&'a FraudRisk),
}

impl ReportModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn replace(&mut self, data: ReportData) {
        if let Some(fraud) = &data.fraud_risk {
            if !fraud.combined_risk.is_recognized() {
                warn!(
                    combined_risk = %fraud.combined_risk,
                    "Unrecognized combined risk level, deriving locally"
                );
            }
        }
        self.current = Some(data);
    }

    /// `None` until the first successful batch.
    pub fn current(&self) -> Option<&ReportData> {
        self.current.as_ref()
    }

    pub fn has_report(&self) -> bool {
        self.current().is_some()
    }

    /// Renderable sections in display order. Absent or blank fields are omitted.
    pub fn sections(&self) -> Vec<ReportSection<'_>> {
        let Some(data) = self.current() else {
            return Vec::new();
        };

        let mut sections = Vec::new();
        if let Some(summary) = non_blank(&data.summary) {
            sections.push(ReportSection::Text {
                title: "Summary",
                blocks: formatter::format(summary),
            });
        }
        if let Some(validation) = non_blank(&data.validation) {
            sections.push(ReportSection::Text {
                title: "Validation",
                blocks: formatter::format(validation),
            });
        }
        if let Some(fraud) = &data.fraud_risk {
            sections.push(ReportSection::FraudRisk(fraud));
        }
        sections
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::formatter::Block;
    use crate::report::types::{RiskLevel, TextAnalysis};

    fn report(summary: &str) -> ReportData {
        ReportData {
            summary: Some(summary.to_string()),
            ..ReportData::default()
        }
    }

    #[test]
    fn test_starts_empty() {
        let model = ReportModel::new();
        assert!(model.current().is_none());
        assert!(model.sections().is_empty());
    }

    #[test]
    fn test_replace_supersedes_previous() {
        let mut model = ReportModel::new();
        let mut first = report("first");
        first.validation = Some("valid".to_string());
        model.replace(first);
        model.replace(report("second"));

        let current = model.current().unwrap();
        assert_eq!(current, &report("second"));
        assert!(current.validation.is_none());
    }

    #[test]
    fn test_sections_skip_blank_fields() {
        let mut model = ReportModel::new();
        model.replace(ReportData {
            summary: Some("### Overview\nAll good".to_string()),
            validation: Some("  \n".to_string()),
            processing_status: None,
            fraud_risk: Some(FraudRisk {
                text_analysis: TextAnalysis {
                    fraud_risk: RiskLevel::Low,
                    reasons: vec![],
                    verification_needed: false,
                },
                document_similarity: 0.88,
                combined_risk: RiskLevel::Low,
            }),
        });

        let sections = model.sections();
        assert_eq!(sections.len(), 2);
        match &sections[0] {
            ReportSection::Text { title, blocks } => {
                assert_eq!(*title, "Summary");
                let blocks: Vec<Block> = blocks.clone().collect();
                assert_eq!(blocks[0], Block::Subheading("Overview".to_string()));
            }
            other => panic!("unexpected section: {:?}", other),
        }
        assert!(matches!(sections[1], ReportSection::FraudRisk(_)));
    }
}
