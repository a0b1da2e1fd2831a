use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding from a stage-handoff check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Stable check name (e.g. "duplicate-row-ids").
    pub check: String,
    pub severity: Severity,
    pub message: String,
}

/// Accumulated findings for one pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub stage: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            issues: Vec::new(),
        }
    }

    pub fn push_error(&mut self, check: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            check: check.to_string(),
            severity: Severity::Error,
            message: message.into(),
        });
    }

    pub fn push_warning(&mut self, check: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            check: check.to_string(),
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
