use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::energy::SystemConfig;

// ─── Provider wire types (PVGIS `seriescalc` JSON) ───────────────────────────

/// Hourly series as returned by the irradiance provider. Anything beyond
/// `outputs.hourly` is ignored.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SeriesPayload {
    pub outputs: SeriesOutputs,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SeriesOutputs {
    pub hourly: Vec<RawRecord>,
}

/// One provider row. `time` is `YYYYMMDD:HHMM`.
///
/// Fields are read leniently: an absent, `null` or wrongly-typed value is
/// kept as-is here and reported by normalization together with the row index.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: String,
    /// Plane-of-array irradiance (W/m²)
    #[serde(rename = "G(i)", default)]
    #[schema(value_type = f64)]
    pub irradiance: RawNumber,
    /// Air temperature at 2 m (°C)
    #[serde(rename = "T2m", default)]
    #[schema(value_type = f64)]
    pub temperature: RawNumber,
}

/// Strings pass through; any other JSON value is kept as its JSON text so the
/// timestamp parser rejects it.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

impl RawRecord {
    pub fn new(time: impl Into<String>, irradiance: f64, temperature: f64) -> Self {
        Self {
            time: time.into(),
            irradiance: RawNumber::Number(irradiance),
            temperature: RawNumber::Number(temperature),
        }
    }
}

/// Numeric field that some provider exports render as a string.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    /// Absent or `null`
    #[default]
    Missing,
    /// Any other JSON value (bool, array, object)
    Other(Value),
}

impl RawNumber {
    /// Finite value of the field, or a description of why there is none.
    pub fn value(&self) -> Result<f64, String> {
        let v = match self {
            RawNumber::Number(v) => *v,
            RawNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", s))?,
            RawNumber::Missing => return Err("is missing".to_string()),
            RawNumber::Other(v) => return Err(format!("{} is not a number", v)),
        };
        if v.is_finite() {
            Ok(v)
        } else {
            Err(format!("{} is not finite", v))
        }
    }
}

// ─── REST request types ───────────────────────────────────────────────────────

/// Ad-hoc report request: system parameters plus the provider series.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReportRequest {
    pub system: SystemConfig,
    pub series: SeriesPayload,
}
