//! OperationOutcome response generation.
//!
//! Provides utilities for building FHIR OperationOutcome responses.

use serde_json::Value;

/// Issue severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Error - processing has failed.
    Error,
    /// Warning - processing succeeded but with concerns.
    Warning,
    /// Information - informational message.
    Information,
}

impl IssueSeverity {
    /// Returns the FHIR string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
            IssueSeverity::Information => "information",
        }
    }
}

/// Issue type codes from the FHIR `issue-type` value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    /// Invalid content.
    Invalid,
    /// Required element missing.
    Required,
    /// Resource not found.
    NotFound,
    /// Resource was deleted.
    Deleted,
    /// Conflict with existing state.
    Conflict,
    /// Duplicate identifier.
    Duplicate,
    /// Not supported.
    NotSupported,
    /// Unexpected server-side failure.
    Exception,
    /// Informational message.
    Informational,
}

impl IssueType {
    /// Returns the FHIR code string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Invalid => "invalid",
            IssueType::Required => "required",
            IssueType::NotFound => "not-found",
            IssueType::Deleted => "deleted",
            IssueType::Conflict => "conflict",
            IssueType::Duplicate => "duplicate",
            IssueType::NotSupported => "not-supported",
            IssueType::Exception => "exception",
            IssueType::Informational => "informational",
        }
    }
}

/// An issue in an OperationOutcome.
#[derive(Debug, Clone)]
pub struct Issue {
    /// The severity of the issue.
    pub severity: IssueSeverity,
    /// The type/code of the issue.
    pub code: IssueType,
    /// Human-readable description.
    pub details: String,
    /// Diagnostic text, verbatim from the component that found the problem.
    pub diagnostics: Option<String>,
    /// FHIRPath-like expressions for the location.
    pub expression: Vec<String>,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(severity: IssueSeverity, code: IssueType, details: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            details: details.into(),
            diagnostics: None,
            expression: Vec::new(),
        }
    }

    /// Creates an error issue.
    pub fn error(code: IssueType, details: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Error, code, details)
    }

    /// Creates an information issue.
    pub fn information(code: IssueType, details: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Information, code, details)
    }

    /// Sets the diagnostics string.
    pub fn with_diagnostics(mut self, diagnostics: impl Into<String>) -> Self {
        self.diagnostics = Some(diagnostics.into());
        self
    }

    /// Adds an expression (location).
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression.push(expression.into());
        self
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        let mut issue = serde_json::json!({
            "severity": self.severity.as_str(),
            "code": self.code.as_str(),
            "details": {
                "text": self.details
            }
        });

        if let Some(diagnostics) = &self.diagnostics {
            issue["diagnostics"] = serde_json::json!(diagnostics);
        }

        if !self.expression.is_empty() {
            issue["expression"] = serde_json::json!(self.expression);
        }

        issue
    }
}

/// Builder for OperationOutcome resources.
#[derive(Debug, Default)]
pub struct OperationOutcomeBuilder {
    issues: Vec<Issue>,
}

impl OperationOutcomeBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue.
    pub fn add_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Adds an error issue.
    pub fn error(self, code: IssueType, details: impl Into<String>) -> Self {
        self.add_issue(Issue::error(code, details))
    }

    /// Adds an information issue.
    pub fn information(self, code: IssueType, details: impl Into<String>) -> Self {
        self.add_issue(Issue::information(code, details))
    }

    /// Builds the OperationOutcome resource.
    pub fn build(self) -> Value {
        let issues: Vec<Value> = self.issues.iter().map(|i| i.to_json()).collect();

        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": issues
        })
    }

    /// Returns true if there are any error issues.
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }
}

/// Creates a simple informational OperationOutcome.
///
/// Used for `Prefer: return=OperationOutcome`.
pub fn information_outcome(message: &str) -> Value {
    OperationOutcomeBuilder::new()
        .information(IssueType::Informational, message)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_to_json() {
        let issue = Issue::error(IssueType::NotFound, "Resource not found");
        let json = issue.to_json();

        assert_eq!(json["severity"], "error");
        assert_eq!(json["code"], "not-found");
        assert_eq!(json["details"]["text"], "Resource not found");
        assert!(json.get("diagnostics").is_none());
        assert!(json.get("expression").is_none());
    }

    #[test]
    fn test_issue_with_diagnostics_and_expression() {
        let issue = Issue::error(IssueType::Required, "contained[0] missing id")
            .with_diagnostics("contained[0] missing id")
            .with_expression("contained[0].id");
        let json = issue.to_json();

        assert_eq!(json["diagnostics"], "contained[0] missing id");
        assert_eq!(json["expression"][0], "contained[0].id");
    }

    #[test]
    fn test_builder() {
        let builder = OperationOutcomeBuilder::new()
            .error(IssueType::Invalid, "Invalid resource")
            .error(IssueType::Duplicate, "Duplicate contained id: med1");
        assert!(builder.has_errors());

        let outcome = builder.build();
        assert_eq!(outcome["resourceType"], "OperationOutcome");
        assert_eq!(outcome["issue"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_information_outcome() {
        let outcome = information_outcome("Resource created");
        assert_eq!(outcome["issue"][0]["severity"], "information");
        assert_eq!(outcome["issue"][0]["code"], "informational");
    }
}
