use std::sync::Arc;

use tracing::{debug, warn};

use crate::report::StatusReport;
use crate::sink::SinkRegistry;

/// Publishes status reports to the sinks registered for their unit.
///
/// The registry is injected at construction and never mutated here.
#[derive(Debug, Clone)]
pub struct Publisher {
    registry: Arc<SinkRegistry>,
}

impl Publisher {
    pub fn new(registry: Arc<SinkRegistry>) -> Self {
        Self { registry }
    }

    /// Publish `status` and `resistance_kohm` for the report's unit.
    ///
    /// Units without registered sinks are expected when fewer sensors are
    /// configured than units report; they are logged and skipped.
    pub fn publish(&self, report: &StatusReport) {
        let Some(sinks) = self.registry.get(report.unit_id) else {
            warn!(
                unit_id = report.unit_id,
                "no sinks registered for unit; status report not published"
            );
            return;
        };

        sinks.status.publish(f64::from(report.status));
        sinks.resistance.publish(report.resistance_kohm);
        debug!(
            unit_id = report.unit_id,
            status = report.status,
            resistance_kohm = report.resistance_kohm,
            "published status report"
        );
    }

    pub fn registry(&self) -> &SinkRegistry {
        &self.registry
    }
}
