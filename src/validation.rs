//! Structure checks for request documents.
//!
//! Validation never fails outright; it reports what was found and what could
//! be improved.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::instrument;

use crate::{domain::ParsedRequest, markdown::parse, variables::extract_variables};

/// The result of validating a request document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Whether the document produced at least one request.
    pub valid: bool,
    /// The number of requests found.
    pub requests_found: usize,
    /// Distinct folder names, sorted.
    pub folders: BTreeSet<String>,
    /// Problems that prevent conversion.
    pub issues: Vec<String>,
    /// Improvements that are not required for conversion.
    pub suggestions: Vec<String>,
    /// Per-request details, in source order.
    pub requests: Vec<RequestReport>,
}

impl ValidationReport {
    /// Builds a report from already-parsed requests.
    #[must_use]
    pub fn from_requests(requests: &[ParsedRequest]) -> Self {
        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        if requests.is_empty() {
            issues.push("No valid requests found in markdown".to_string());
        }

        let reports = requests
            .iter()
            .map(|request| {
                let report = RequestReport::new(request);
                if !report.has_description {
                    suggestions.push(format!(
                        "Request '{}': Consider adding a description",
                        report.name
                    ));
                }
                report
            })
            .collect();

        Self {
            valid: !requests.is_empty(),
            requests_found: requests.len(),
            folders: requests
                .iter()
                .filter_map(ParsedRequest::folder)
                .map(str::to_string)
                .collect(),
            issues,
            suggestions,
            requests: reports,
        }
    }
}

/// Validation details for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestReport {
    /// Request name.
    pub name: String,
    /// Enclosing folder, if any.
    pub folder: Option<String>,
    /// Whether a description was given.
    pub has_description: bool,
    /// Whether a `curl` command was found. Parsing only yields requests that
    /// have one.
    pub has_curl: bool,
    /// `{{name}}` placeholders used by the command, sorted.
    pub variables_used: Vec<String>,
    /// Problems with this request.
    pub issues: Vec<String>,
}

impl RequestReport {
    fn new(request: &ParsedRequest) -> Self {
        let has_description = request.metadata().description.is_some();

        let mut issues = Vec::new();
        if !has_description {
            issues.push("No description provided".to_string());
        }

        Self {
            name: request.name().to_string(),
            folder: request.folder().map(str::to_string),
            has_description,
            has_curl: !request.curl_command().is_empty(),
            variables_used: extract_variables(request.curl_command())
                .into_iter()
                .collect(),
            issues,
        }
    }
}

/// Parses a document and reports on its structure.
#[instrument(level = "debug", skip(markdown))]
#[must_use]
pub fn validate(markdown: &str) -> ValidationReport {
    ValidationReport::from_requests(&parse(markdown))
}
