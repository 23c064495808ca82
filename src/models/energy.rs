use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EngineError;

// ─── System parameters ───────────────────────────────────────────────────────

/// Module efficiency applied to plane-of-array irradiance.
pub const SYSTEM_EFFICIENCY: f64 = 0.16;
/// Panel surface needed per installed kW (m²/kW).
pub const PANEL_AREA_PER_KW: f64 = 6.5;
/// Hours in a non-leap year, the capacity-factor reference period.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Immutable parameters for one yield calculation.
///
/// `azimuth_deg` uses 0° = South, increasing westward (West = 90°,
/// North = 180°, East = 270°). Tilt and azimuth only matter upstream, where
/// the provider bakes them into the plane-of-array irradiance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SystemConfig {
    /// Installed peak power (kW)
    pub peak_power_kw: f64,
    /// Panel inclination from horizontal (deg, 0–90)
    pub tilt_deg: f64,
    /// Panel azimuth (deg, 0 ≤ a < 360, 0 = South, 90 = West)
    pub azimuth_deg: f64,
}

impl SystemConfig {
    pub fn new(peak_power_kw: f64, tilt_deg: f64, azimuth_deg: f64) -> Result<Self, EngineError> {
        let config = Self { peak_power_kw, tilt_deg, azimuth_deg };
        config.validate()?;
        Ok(config)
    }

    /// Range checks shared by every entry point of the engine.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.peak_power_kw.is_finite() || self.peak_power_kw <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "peak power must be a positive number of kW, got {}",
                self.peak_power_kw
            )));
        }
        if !(0.0..=90.0).contains(&self.tilt_deg) {
            return Err(EngineError::InvalidConfig(format!(
                "tilt must be within 0..=90 degrees, got {}",
                self.tilt_deg
            )));
        }
        if !(0.0..360.0).contains(&self.azimuth_deg) {
            return Err(EngineError::InvalidConfig(format!(
                "azimuth must be within 0..360 degrees, got {}",
                self.azimuth_deg
            )));
        }
        Ok(())
    }

    /// Total module surface (m²).
    pub fn panel_area_m2(&self) -> f64 {
        self.peak_power_kw * PANEL_AREA_PER_KW
    }

    /// Energy produced during one hour at the given plane-of-array irradiance (kWh).
    pub fn hourly_energy_kwh(&self, irradiance_w_m2: f64) -> f64 {
        irradiance_w_m2 * self.panel_area_m2() * SYSTEM_EFFICIENCY / 1000.0
    }
}

// ─── Normalized series ───────────────────────────────────────────────────────

/// One hourly observation with its calendar fields resolved.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyRecord {
    /// Naive local time as reported by the provider
    pub timestamp: NaiveDateTime,
    /// Plane-of-array irradiance (W/m²)
    pub irradiance: f64,
    /// Air temperature at 2 m (°C)
    pub temperature: f64,
    pub date: NaiveDate,
    /// 0–23
    pub hour: u32,
    /// ISO-8601 week number, 1–53
    pub iso_week: u32,
    /// 1–12
    pub month: u32,
    pub year: i32,
    /// 1–366
    pub day_of_year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EnergyRecord {
    #[serde(flatten)]
    pub hourly: HourlyRecord,
    /// Energy produced during the hour (kWh), never negative
    pub energy_kwh: f64,
}

// ─── Aggregation output ──────────────────────────────────────────────────────

/// Meteorological seasons (Winter = Dec–Feb, Spring = Mar–May,
/// Summer = Jun–Aug, Autumn = Sep–Nov).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }
}

/// Grouping key of a [`PeriodSummary`]. The derived ordering is the natural
/// calendar order within each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodKey {
    Hour { date: NaiveDate, hour: u32 },
    Day { date: NaiveDate },
    Week { iso_week: u32 },
    Month { month: u32 },
    Season { season: Season },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PeriodSummary {
    pub key: PeriodKey,
    pub total_energy_kwh: f64,
    pub mean_irradiance: f64,
    pub mean_temperature: f64,
    pub record_count: usize,
}

/// Descriptive statistics of one quantity. `std_dev` is the population
/// standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Statistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

/// Everything the presentation layer displays for one series and system.
/// Rebuilt from scratch whenever inputs change.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AggregateReport {
    pub system: SystemConfig,

    // ── Period tables ────────────────────────────────────────────────────────
    pub hourly: Vec<PeriodSummary>,
    pub daily: Vec<PeriodSummary>,
    pub weekly: Vec<PeriodSummary>,
    pub monthly: Vec<PeriodSummary>,
    pub seasonal: Vec<PeriodSummary>,

    // ── Whole-period totals ──────────────────────────────────────────────────
    /// Σ energy over every record (kWh)
    pub yearly_total_kwh: f64,
    pub avg_hourly_kwh: f64,
    /// Mean of the daily table's totals
    pub avg_daily_kwh: f64,
    /// Mean of the weekly table's totals
    pub avg_weekly_kwh: f64,
    /// Mean of the monthly table's totals
    pub avg_monthly_kwh: f64,
    /// Mean irradiance (W/m²)
    pub avg_radiation: f64,
    /// Peak irradiance (W/m²)
    pub max_radiation: f64,

    // ── Performance KPIs ─────────────────────────────────────────────────────
    /// Capacity factor (%)
    pub capacity_factor: f64,
    /// Specific yield (kWh/kWp)
    pub specific_generation: f64,

    // ── Descriptive statistics ───────────────────────────────────────────────
    pub energy_stats: Statistics,
    pub daily_energy_stats: Statistics,
    pub irradiance_stats: Statistics,
    pub temperature_stats: Statistics,

    /// Normalized series in canonical (chronological) order
    pub records: Vec<EnergyRecord>,
}
