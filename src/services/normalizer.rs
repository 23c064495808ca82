use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::EngineError;
use crate::models::energy::{EnergyRecord, HourlyRecord, SystemConfig};
use crate::models::series::RawRecord;

/// Provider timestamp layout, e.g. `20200101:0010`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d:%H%M";

/// Turns raw provider rows into energy records.
///
/// The whole call fails on the first row that cannot be parsed; callers never
/// see a partially normalized series. An empty input yields an empty output,
/// which aggregation later reports as [`EngineError::EmptySeries`].
pub fn normalize(raw: &[RawRecord], config: &SystemConfig) -> Result<Vec<EnergyRecord>, EngineError> {
    config.validate()?;

    raw.iter()
        .enumerate()
        .map(|(index, row)| normalize_record(row, config).map_err(|reason| EngineError::MalformedRecord { index, reason }))
        .collect()
}

fn normalize_record(row: &RawRecord, config: &SystemConfig) -> Result<EnergyRecord, String> {
    let timestamp = parse_timestamp(&row.time)?;
    let irradiance = row.irradiance.value().map_err(|e| format!("irradiance {}", e))?;
    let temperature = row.temperature.value().map_err(|e| format!("temperature {}", e))?;
    if irradiance < 0.0 {
        return Err(format!("irradiance must not be negative, got {}", irradiance));
    }

    let hourly = calendar_fields(timestamp, irradiance, temperature);
    let energy_kwh = config.hourly_energy_kwh(irradiance);

    Ok(EnergyRecord { hourly, energy_kwh })
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| format!("timestamp '{}' does not match YYYYMMDD:HHMM ({})", s, e))
}

fn calendar_fields(timestamp: NaiveDateTime, irradiance: f64, temperature: f64) -> HourlyRecord {
    let date = timestamp.date();
    HourlyRecord {
        timestamp,
        irradiance,
        temperature,
        date,
        hour: timestamp.hour(),
        iso_week: date.iso_week().week(),
        month: date.month(),
        year: date.year(),
        day_of_year: date.ordinal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::RawNumber;
    use chrono::NaiveDate;

    fn cfg(peak: f64) -> SystemConfig {
        SystemConfig::new(peak, 35.0, 0.0).unwrap()
    }

    #[test]
    fn test_single_record_energy() {
        let out = normalize(&[RawRecord::new("20200615:1210", 1000.0, 24.0)], &cfg(5.0)).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0].energy_kwh - 5.2).abs() < 1e-12);
        assert_eq!(out[0].hourly.temperature, 24.0);
    }

    #[test]
    fn test_calendar_fields() {
        let out = normalize(&[RawRecord::new("20200615:1310", 500.0, 20.0)], &cfg(1.0)).unwrap();
        let h = &out[0].hourly;
        assert_eq!(h.date, NaiveDate::from_ymd_opt(2020, 6, 15).unwrap());
        assert_eq!(h.hour, 13);
        assert_eq!(h.month, 6);
        assert_eq!(h.year, 2020);
        assert_eq!(h.iso_week, 25);
        // 2020 is a leap year: 31+29+31+30+31+15
        assert_eq!(h.day_of_year, 167);
    }

    #[test]
    fn test_iso_week_year_boundaries() {
        // 2021-01-01 is a Friday, still in ISO week 53 of 2020
        let out = normalize(
            &[
                RawRecord::new("20210101:0010", 0.0, 0.0),
                RawRecord::new("20210104:0010", 0.0, 0.0),
                RawRecord::new("20191230:0010", 0.0, 0.0),
            ],
            &cfg(1.0),
        )
        .unwrap();
        assert_eq!(out[0].hourly.iso_week, 53);
        assert_eq!(out[0].hourly.year, 2021);
        assert_eq!(out[1].hourly.iso_week, 1);
        // 2019-12-30 belongs to week 1 of 2020
        assert_eq!(out[2].hourly.iso_week, 1);
    }

    #[test]
    fn test_malformed_timestamp_fails_whole_call() {
        let raw = vec![
            RawRecord::new("20200101:0010", 0.0, 1.0),
            RawRecord::new("2020-01-01 01:10", 0.0, 1.0),
            RawRecord::new("20200101:0210", 0.0, 1.0),
        ];
        match normalize(&raw, &cfg(1.0)) {
            Err(EngineError::MalformedRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_hour_is_malformed() {
        let raw = vec![RawRecord::new("20200101:2510", 0.0, 1.0)];
        assert!(matches!(normalize(&raw, &cfg(1.0)), Err(EngineError::MalformedRecord { index: 0, .. })));
    }

    #[test]
    fn test_unparseable_numeric_field() {
        let raw = vec![RawRecord {
            time: "20200101:0010".to_string(),
            irradiance: RawNumber::Text("n/a".to_string()),
            temperature: RawNumber::Number(1.0),
        }];
        assert!(matches!(normalize(&raw, &cfg(1.0)), Err(EngineError::MalformedRecord { index: 0, .. })));
    }

    #[test]
    fn test_missing_numeric_field_is_malformed() {
        let raw = vec![
            RawRecord::new("20200101:0010", 0.0, 1.0),
            RawRecord {
                time: "20200101:0110".to_string(),
                irradiance: RawNumber::Number(10.0),
                temperature: RawNumber::Missing,
            },
        ];
        match normalize(&raw, &cfg(1.0)) {
            Err(EngineError::MalformedRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("temperature"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_irradiance_rejected() {
        let raw = vec![RawRecord::new("20200101:0010", -3.0, 1.0)];
        assert!(matches!(normalize(&raw, &cfg(1.0)), Err(EngineError::MalformedRecord { .. })));
    }

    #[test]
    fn test_invalid_config_before_parsing() {
        let bad = SystemConfig { peak_power_kw: 0.0, tilt_deg: 30.0, azimuth_deg: 0.0 };
        let raw = vec![RawRecord::new("garbage", 0.0, 1.0)];
        assert!(matches!(normalize(&raw, &bad), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert!(normalize(&[], &cfg(1.0)).unwrap().is_empty());
    }

    #[test]
    fn test_energy_never_negative() {
        let raw: Vec<RawRecord> = (0..24)
            .map(|h| RawRecord::new(format!("20200301:{:02}10", h), (h as f64 * 37.0) % 900.0, -5.0))
            .collect();
        for r in normalize(&raw, &cfg(3.3)).unwrap() {
            assert!(r.energy_kwh >= 0.0);
        }
    }
}
