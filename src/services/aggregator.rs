use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::models::energy::{
    AggregateReport, EnergyRecord, HourlyRecord, PeriodKey, PeriodSummary, Season, Statistics,
    SystemConfig, HOURS_PER_YEAR,
};

/// Builds the multi-period report for a normalized series.
///
/// Records are first put into a canonical order so every sum below is taken
/// in the same sequence whatever the input order was; permuted input gives a
/// bit-identical report. The input slice itself is left untouched.
///
/// `config` must be the one the records were normalized with: `energy_kwh`
/// already carries its peak power, and capacity factor, specific generation
/// and `report.system` are taken from it. Records do not remember their
/// config, so a mismatch is not detected here;
/// [`build_report`](crate::services::report_service::build_report) runs both
/// stages with a single config.
pub fn aggregate(records: &[EnergyRecord], config: &SystemConfig) -> Result<AggregateReport, EngineError> {
    config.validate()?;
    if records.is_empty() {
        return Err(EngineError::EmptySeries);
    }

    let mut ordered = records.to_vec();
    ordered.sort_by(canonical_order);

    let hourly = summarize(&ordered, |h| PeriodKey::Hour { date: h.date, hour: h.hour });
    let daily = summarize(&ordered, |h| PeriodKey::Day { date: h.date });
    let weekly = summarize(&ordered, |h| PeriodKey::Week { iso_week: h.iso_week });
    let monthly = summarize(&ordered, |h| PeriodKey::Month { month: h.month });
    let seasonal = summarize(&ordered, |h| PeriodKey::Season { season: Season::from_month(h.month) });

    let energies: Vec<f64> = ordered.iter().map(|r| r.energy_kwh).collect();
    let irradiances: Vec<f64> = ordered.iter().map(|r| r.hourly.irradiance).collect();
    let temperatures: Vec<f64> = ordered.iter().map(|r| r.hourly.temperature).collect();
    let daily_totals: Vec<f64> = daily.iter().map(|p| p.total_energy_kwh).collect();

    let yearly_total_kwh: f64 = energies.iter().sum();
    let irradiance_stats = describe(&irradiances);

    Ok(AggregateReport {
        system: *config,
        yearly_total_kwh,
        avg_hourly_kwh: yearly_total_kwh / ordered.len() as f64,
        avg_daily_kwh: mean_total(&daily),
        avg_weekly_kwh: mean_total(&weekly),
        avg_monthly_kwh: mean_total(&monthly),
        avg_radiation: irradiance_stats.mean,
        max_radiation: irradiance_stats.max,
        capacity_factor: yearly_total_kwh / (config.peak_power_kw * HOURS_PER_YEAR) * 100.0,
        specific_generation: yearly_total_kwh / config.peak_power_kw,
        energy_stats: describe(&energies),
        daily_energy_stats: describe(&daily_totals),
        irradiance_stats,
        temperature_stats: describe(&temperatures),
        hourly,
        daily,
        weekly,
        monthly,
        seasonal,
        records: ordered,
    })
}

/// Chronological, with value tie-breaks so duplicates have a fixed position too.
fn canonical_order(a: &EnergyRecord, b: &EnergyRecord) -> Ordering {
    a.hourly
        .timestamp
        .cmp(&b.hourly.timestamp)
        .then_with(|| a.hourly.irradiance.total_cmp(&b.hourly.irradiance))
        .then_with(|| a.hourly.temperature.total_cmp(&b.hourly.temperature))
        .then_with(|| a.energy_kwh.total_cmp(&b.energy_kwh))
}

#[derive(Default)]
struct Accumulator {
    energy_kwh: f64,
    irradiance: f64,
    temperature: f64,
    count: usize,
}

fn summarize<F>(records: &[EnergyRecord], key_of: F) -> Vec<PeriodSummary>
where
    F: Fn(&HourlyRecord) -> PeriodKey,
{
    let mut groups: BTreeMap<PeriodKey, Accumulator> = BTreeMap::new();
    for r in records {
        let acc = groups.entry(key_of(&r.hourly)).or_default();
        acc.energy_kwh += r.energy_kwh;
        acc.irradiance += r.hourly.irradiance;
        acc.temperature += r.hourly.temperature;
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|(key, acc)| {
            let n = acc.count as f64;
            PeriodSummary {
                key,
                total_energy_kwh: acc.energy_kwh,
                mean_irradiance: acc.irradiance / n,
                mean_temperature: acc.temperature / n,
                record_count: acc.count,
            }
        })
        .collect()
}

fn mean_total(table: &[PeriodSummary]) -> f64 {
    let sum: f64 = table.iter().map(|p| p.total_energy_kwh).sum();
    sum / table.len() as f64
}

/// Callers guarantee `values` is non-empty.
fn describe(values: &[f64]) -> Statistics {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Statistics {
        mean,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        std_dev: variance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::energy::PANEL_AREA_PER_KW;
    use crate::models::energy::SYSTEM_EFFICIENCY;
    use crate::models::series::RawRecord;
    use crate::services::normalizer::normalize;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    fn cfg(peak: f64) -> SystemConfig {
        SystemConfig::new(peak, 30.0, 0.0).unwrap()
    }

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 1, 1).unwrap().and_hms_opt(0, 10, 0).unwrap()
    }

    /// `hours` consecutive hourly rows from 2019-01-01 with a synthetic daily bell curve.
    fn synthetic_series(hours: i64) -> Vec<RawRecord> {
        (0..hours)
            .map(|i| {
                let ts = start() + TimeDelta::hours(i);
                let hour = (i % 24) as f64;
                let irradiance = (900.0 * ((hour - 6.0) / 12.0 * std::f64::consts::PI).sin()).max(0.0);
                let temperature = 5.0 + 10.0 * ((i / 24) as f64 / 365.0 * std::f64::consts::PI).sin();
                RawRecord::new(ts.format("%Y%m%d:%H%M").to_string(), irradiance, temperature)
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(aggregate(&[], &cfg(5.0)), Err(EngineError::EmptySeries));
        let records = normalize(&[], &cfg(5.0)).unwrap();
        assert_eq!(aggregate(&records, &cfg(5.0)), Err(EngineError::EmptySeries));
    }

    #[test]
    fn test_zero_peak_power_is_invalid_config() {
        let records = normalize(&synthetic_series(24), &cfg(5.0)).unwrap();
        let bad = SystemConfig { peak_power_kw: 0.0, tilt_deg: 30.0, azimuth_deg: 0.0 };
        assert!(matches!(aggregate(&records, &bad), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_two_records_same_day() {
        let raw = vec![
            RawRecord::new("20200615:1210", 1000.0, 25.0),
            RawRecord::new("20200615:2210", 0.0, 15.0),
        ];
        let records = normalize(&raw, &cfg(5.0)).unwrap();
        let report = aggregate(&records, &cfg(5.0)).unwrap();

        assert_eq!(report.daily.len(), 1);
        assert!(close(report.daily[0].total_energy_kwh, 5.2));
        assert!(close(report.daily[0].mean_irradiance, 500.0));
        assert!(close(report.daily[0].mean_temperature, 20.0));
        assert!(close(report.avg_hourly_kwh, 2.6));
        assert!(close(report.yearly_total_kwh, 5.2));
        assert_eq!(report.hourly.len(), 2);
        assert_eq!(report.max_radiation, 1000.0);
        assert_eq!(report.avg_radiation, 500.0);
    }

    #[test]
    fn test_full_year_of_unit_energy_is_full_capacity() {
        let records: Vec<EnergyRecord> = normalize(&synthetic_series(8760), &cfg(1.0))
            .unwrap()
            .into_iter()
            .map(|mut r| {
                r.energy_kwh = 1.0;
                r
            })
            .collect();
        let report = aggregate(&records, &cfg(1.0)).unwrap();

        assert_eq!(report.yearly_total_kwh, 8760.0);
        assert_eq!(report.capacity_factor, 100.0);
        assert_eq!(report.specific_generation, 8760.0);
        assert_eq!(report.daily.len(), 365);
        assert_eq!(report.monthly.len(), 12);
        assert!(close(report.avg_daily_kwh, 24.0));
        assert!(close(report.avg_monthly_kwh, 730.0));
        assert_eq!(report.energy_stats.std_dev, 0.0);
    }

    #[test]
    fn test_tables_sorted_by_calendar_key() {
        let mut raw = synthetic_series(24 * 60);
        raw.reverse();
        let report = aggregate(&normalize(&raw, &cfg(2.0)).unwrap(), &cfg(2.0)).unwrap();

        for table in [&report.hourly, &report.daily, &report.weekly, &report.monthly, &report.seasonal] {
            assert!(table.windows(2).all(|w| w[0].key < w[1].key));
        }
        assert_eq!(report.monthly.first().map(|p| p.key), Some(PeriodKey::Month { month: 1 }));
        assert_eq!(report.monthly.last().map(|p| p.key), Some(PeriodKey::Month { month: 3 }));
        assert!(report.records.windows(2).all(|w| w[0].hourly.timestamp <= w[1].hourly.timestamp));
    }

    #[test]
    fn test_week_numbers_sort_numerically() {
        // Late December 2019 falls into ISO week 1 of 2020, early December into week 49
        let raw = vec![
            RawRecord::new("20191230:1210", 100.0, 1.0),
            RawRecord::new("20191202:1210", 100.0, 1.0),
            RawRecord::new("20191216:1210", 100.0, 1.0),
        ];
        let report = aggregate(&normalize(&raw, &cfg(1.0)).unwrap(), &cfg(1.0)).unwrap();
        let weeks: Vec<PeriodKey> = report.weekly.iter().map(|p| p.key).collect();
        assert_eq!(
            weeks,
            vec![
                PeriodKey::Week { iso_week: 1 },
                PeriodKey::Week { iso_week: 49 },
                PeriodKey::Week { iso_week: 51 },
            ]
        );
    }

    #[test]
    fn test_sum_conservation() {
        let report = aggregate(&normalize(&synthetic_series(24 * 400), &cfg(4.2)).unwrap(), &cfg(4.2)).unwrap();
        for table in [&report.hourly, &report.daily, &report.weekly, &report.monthly, &report.seasonal] {
            let sum: f64 = table.iter().map(|p| p.total_energy_kwh).sum();
            assert!(close(sum, report.yearly_total_kwh), "{} vs {}", sum, report.yearly_total_kwh);
            let count: usize = table.iter().map(|p| p.record_count).sum();
            assert_eq!(count, report.records.len());
        }
    }

    #[test]
    fn test_order_independence_and_idempotence() {
        let raw = synthetic_series(24 * 45);
        let mut shuffled = raw.clone();
        shuffled.reverse();
        shuffled.rotate_left(317);
        let c = cfg(6.0);

        let a = aggregate(&normalize(&raw, &c).unwrap(), &c).unwrap();
        let b = aggregate(&normalize(&shuffled, &c).unwrap(), &c).unwrap();
        let again = aggregate(&normalize(&raw, &c).unwrap(), &c).unwrap();

        assert_eq!(a, b);
        assert_eq!(a, again);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_input_not_mutated() {
        let mut raw = synthetic_series(48);
        raw.reverse();
        let records = normalize(&raw, &cfg(1.0)).unwrap();
        let before = records.clone();
        aggregate(&records, &cfg(1.0)).unwrap();
        assert_eq!(records, before);
    }

    #[test]
    fn test_partial_year_averages_use_observed_periods() {
        // Ten days of data: the daily mean must not be diluted across 365 days
        let report = aggregate(&normalize(&synthetic_series(240), &cfg(3.0)).unwrap(), &cfg(3.0)).unwrap();
        assert_eq!(report.daily.len(), 10);
        assert!(close(report.avg_daily_kwh, report.yearly_total_kwh / 10.0));
        assert_eq!(report.monthly.len(), 1);
        assert!(close(report.avg_monthly_kwh, report.yearly_total_kwh));
        assert!(close(report.avg_weekly_kwh, report.yearly_total_kwh / report.weekly.len() as f64));
    }

    #[test]
    fn test_capacity_factor_bounded() {
        const MAX_IRRADIANCE: f64 = 1361.0;
        let raw: Vec<RawRecord> = (0..8760)
            .map(|i| {
                let ts = start() + TimeDelta::hours(i);
                RawRecord::new(ts.format("%Y%m%d:%H%M").to_string(), MAX_IRRADIANCE, 20.0)
            })
            .collect();
        let c = cfg(7.5);
        let report = aggregate(&normalize(&raw, &c).unwrap(), &c).unwrap();
        let bound = 100.0 * (PANEL_AREA_PER_KW * SYSTEM_EFFICIENCY * MAX_IRRADIANCE / 1000.0);
        assert!(report.capacity_factor >= 0.0);
        assert!(report.capacity_factor <= bound + 1e-9);
        assert!(close(report.specific_generation, report.yearly_total_kwh / 7.5));
    }

    #[test]
    fn test_seasons_present_in_order() {
        // Jan 1 .. ~Apr 10: Winter then Spring
        let report = aggregate(&normalize(&synthetic_series(24 * 100), &cfg(1.0)).unwrap(), &cfg(1.0)).unwrap();
        let seasons: Vec<PeriodKey> = report.seasonal.iter().map(|p| p.key).collect();
        assert_eq!(
            seasons,
            vec![
                PeriodKey::Season { season: Season::Winter },
                PeriodKey::Season { season: Season::Spring },
            ]
        );
    }

    #[test]
    fn test_describe() {
        let s = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert_eq!(s.std_dev, 2.0);
    }
}
