//! Prometheus metrics for the design service.

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use studio_core::{ExportFormat, Platform};

// Metric names as constants for consistency
const DESIGNS_GENERATED_TOTAL: &str = "studio_designs_generated_total";
const DESIGN_SAVES_TOTAL: &str = "studio_design_saves_total";
const COMPLIANCE_CHECKS_TOTAL: &str = "studio_compliance_checks_total";
const EXPORTS_TOTAL: &str = "studio_exports_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a generated design.
pub fn record_design_generated(platform: Platform) {
    counter!(
        DESIGNS_GENERATED_TOTAL,
        "platform" => platform.to_string()
    )
    .increment(1);
}

/// Record a save attempt.
///
/// # Arguments
///
/// * `outcome` - "accepted", "conflict", or "rejected"
pub fn record_design_save(outcome: &str) {
    counter!(
        DESIGN_SAVES_TOTAL,
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a compliance check and its verdict.
pub fn record_compliance_check(compliant: bool) {
    counter!(
        COMPLIANCE_CHECKS_TOTAL,
        "compliant" => compliant.to_string()
    )
    .increment(1);
}

/// Record an export.
pub fn record_export(format: ExportFormat) {
    counter!(
        EXPORTS_TOTAL,
        "format" => format.to_string()
    )
    .increment(1);
}
