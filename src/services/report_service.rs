use tracing::{debug, info};

use crate::error::EngineError;
use crate::models::energy::{AggregateReport, SystemConfig};
use crate::models::series::SeriesPayload;
use crate::services::{aggregator, normalizer};

/// Validate → normalize → aggregate in one call, with the same `system`
/// for both stages.
///
/// The payload is whatever the data-fetch collaborator handed over; this
/// function never touches the network.
pub fn build_report(system: &SystemConfig, payload: &SeriesPayload) -> Result<AggregateReport, EngineError> {
    system.validate()?;

    let rows = &payload.outputs.hourly;
    debug!(rows = rows.len(), peak_power_kw = system.peak_power_kw, "normalizing series");
    let records = normalizer::normalize(rows, system)?;
    let report = aggregator::aggregate(&records, system)?;

    #[cfg(feature = "verbose_log")]
    for day in &report.daily {
        debug!(key = ?day.key, energy_kwh = day.total_energy_kwh, "daily total");
    }

    info!(
        records = report.records.len(),
        total_kwh = report.yearly_total_kwh,
        capacity_factor = report.capacity_factor,
        "report built"
    );
    Ok(report)
}
