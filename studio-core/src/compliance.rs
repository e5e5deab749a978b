//! Platform compliance rules for design documents.
//!
//! Results are advisory: a failing report never blocks editing or saving.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::platform::{spec_for, CanvasFormat, Platform};

/// Severity of a compliance violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The creative will be rejected by the platform.
    Error,
    /// The creative may underperform but will be accepted.
    Warning,
}

/// A single compliance violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule identifier, stable across versions.
    pub rule: String,
    /// Human-readable message.
    pub message: String,
    /// How serious the violation is.
    pub severity: Severity,
}

impl Violation {
    fn error(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            severity: Severity::Error,
        }
    }

    fn warning(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            severity: Severity::Warning,
        }
    }
}

/// Outcome of evaluating a document against a platform's rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// True when no error-severity violation was found.
    pub compliant: bool,
    /// Violations in evaluation order.
    pub violations: Vec<Violation>,
    /// Aggregate score, 0-100.
    pub score: u8,
}

impl ComplianceReport {
    /// Build a report from a violation list: compliant iff no errors, score
    /// starts at 100 and loses 25 per error and 10 per warning.
    #[must_use]
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        let errors = violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        let warnings = violations.len() - errors;
        let penalty = errors
            .saturating_mul(25)
            .saturating_add(warnings.saturating_mul(10));
        let score = u8::try_from(100usize.saturating_sub(penalty)).unwrap_or(0);
        Self {
            compliant: errors == 0,
            violations,
            score,
        }
    }
}

/// Evaluate a document against a platform/format spec.
///
/// Unsupported platform/format combinations yield a single error violation
/// rather than a fault; callers treat the result as advisory either way.
#[must_use]
pub fn evaluate(document: &Document, platform: Platform, format: CanvasFormat) -> ComplianceReport {
    let Some(spec) = spec_for(platform, format) else {
        return ComplianceReport::from_violations(vec![Violation::error(
            "placement",
            format!("{platform} does not offer the {format} format"),
        )]);
    };

    let mut violations = Vec::new();

    if document.canvas_width != spec.width || document.canvas_height != spec.height {
        violations.push(Violation::error(
            "dimensions",
            format!(
                "Expected {}x{}, got {}x{}",
                spec.width, spec.height, document.canvas_width, document.canvas_height
            ),
        ));
    }

    if spec.min_text_ratio.is_some() && document.text_elements().next().is_none() {
        violations.push(Violation::warning(
            "text_content",
            "No text found in design".to_string(),
        ));
    }

    let out_of_bounds = document
        .elements
        .iter()
        .filter(|e| !e.within_bounds(document.canvas_width, document.canvas_height))
        .count();
    if out_of_bounds > 0 {
        violations.push(Violation::warning(
            "bounds",
            format!("{out_of_bounds} element(s) extend outside the canvas"),
        ));
    }

    let report = ComplianceReport::from_violations(violations);
    tracing::debug!(
        %platform,
        %format,
        compliant = report.compliant,
        score = report.score,
        "compliance evaluated"
    );
    report
}
