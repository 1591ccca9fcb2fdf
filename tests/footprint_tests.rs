// Footprint calculation tests: empty/single-sample logs, rounding, consistency

mod common;

use common::{assert_close, log_of_watts};
use ecotrace::footprint::{FootprintCalculator, TREE_CO2_GRAMS_PER_YEAR, calculate};
use ecotrace::{EcoConfig, EcoError, SampleLog};

#[test]
fn empty_log_is_insufficient_data() {
    let log = SampleLog::new(vec![], 0.5);
    assert_eq!(calculate(&log, 0.4), Err(EcoError::InsufficientData));
}

#[test]
fn single_sample_uses_one_period_as_duration() {
    let report = calculate(&log_of_watts(&[40.0], 0.5), 0.4).unwrap();
    assert_eq!(report.duration_seconds, 0.5);
    assert_eq!(report.average_watts, 40.0);
    assert_eq!(report.sample_count, 1);
    assert_close(report.energy_kwh, 0.00000556, 1e-6);
    assert_close(report.co2_grams, 0.00222, 1e-3);
}

#[test]
fn constant_load_for_two_seconds() {
    let report = calculate(&log_of_watts(&[49.5; 4], 0.5), 0.4).unwrap();
    assert_eq!(report.duration_seconds, 2.0);
    assert_close(report.average_watts, 49.5, 1e-9);
    assert_close(report.energy_kwh, 0.0000275, 1e-6);
    assert_close(report.co2_grams, 0.011, 1e-3);
}

#[test]
fn average_is_arithmetic_mean() {
    let report = calculate(&log_of_watts(&[20.0, 30.0, 70.0], 0.5), 0.4).unwrap();
    assert_eq!(report.average_watts, 40.0);
    assert_eq!(report.duration_seconds, 1.5);
}

#[test]
fn duration_ignores_timestamp_span() {
    let mut log = log_of_watts(&[30.0, 30.0], 0.5);
    log.samples[1].timestamp = log.samples[0].timestamp + 60.0;
    let report = calculate(&log, 0.4).unwrap();
    assert_eq!(report.duration_seconds, 1.0);
}

#[test]
fn calculating_twice_is_bit_identical() {
    let log = log_of_watts(&[17.3, 44.91, 80.02, 23.5, 61.17], 0.5);
    let calculator = FootprintCalculator::default();
    let a = calculator.calculate(&log).unwrap();
    let b = calculator.calculate(&log).unwrap();
    assert_eq!(a.energy_kwh.to_bits(), b.energy_kwh.to_bits());
    assert_eq!(a.co2_grams.to_bits(), b.co2_grams.to_bits());
    assert_eq!(a, b);
}

#[test]
fn energy_over_duration_recovers_average_power() {
    for watts in [15.0, 49.5, 90.0] {
        // One hour of samples keeps the kWh rounding error small relative to the value.
        let log = log_of_watts(&vec![watts; 7200], 0.5);
        let report = calculate(&log, 0.4).unwrap();
        let duration_hours = report.duration_seconds / 3600.0;
        let rounding = 0.5e-6 * 1000.0 / duration_hours + 0.005;
        assert_close(
            report.energy_kwh * 1000.0 / duration_hours,
            report.average_watts,
            rounding,
        );
    }
}

#[test]
fn co2_scales_with_carbon_intensity() {
    let log = log_of_watts(&vec![60.0; 7200], 0.5);
    let low = calculate(&log, 0.2).unwrap();
    let high = calculate(&log, 0.8).unwrap();
    assert_eq!(low.energy_kwh, high.energy_kwh);
    assert_close(low.energy_kwh, 0.06, 1e-9);
    assert_close(low.co2_grams, 12.0, 1e-9);
    assert_close(high.co2_grams, 48.0, 1e-9);
    assert_close(
        high.equivalent_tree_units,
        48.0 / TREE_CO2_GRAMS_PER_YEAR,
        0.5e-4,
    );
}

#[test]
fn outputs_are_rounded_to_report_precision() {
    let report = calculate(&log_of_watts(&[10.0, 10.0, 10.001], 0.5), 0.4).unwrap();
    assert_eq!(report.average_watts, 10.0);
    let scaled = report.energy_kwh * 1e6;
    assert_close(scaled, scaled.round(), 1e-6);
}

#[test]
fn from_config_uses_configured_intensity() {
    let config = EcoConfig::load_from_str("[carbon]\ncarbon_intensity_kg_per_kwh = 0.8").unwrap();
    let log = log_of_watts(&vec![60.0; 7200], 0.5);
    let report = FootprintCalculator::from_config(&config)
        .calculate(&log)
        .unwrap();
    assert_close(report.co2_grams, 48.0, 1e-9);
}

#[test]
fn high_impact_threshold() {
    let log = log_of_watts(&vec![60.0; 7200], 0.5);
    let report = calculate(&log, 0.4).unwrap();
    assert!(report.is_high_impact(10.0));
    assert!(!report.is_high_impact(100.0));
}

#[test]
fn rejects_negative_or_nan_carbon_intensity() {
    let log = log_of_watts(&[40.0], 0.5);
    for intensity in [-0.4, f64::NAN] {
        assert!(matches!(
            calculate(&log, intensity),
            Err(EcoError::InvalidConfig(msg)) if msg.contains("carbon_intensity_kg_per_kwh")
        ));
    }
}

#[test]
fn rejects_hand_built_log_with_bad_period() {
    for period in [0.0, -0.5, f64::NAN] {
        let log = log_of_watts(&[40.0, 42.0], period);
        assert!(matches!(
            calculate(&log, 0.4),
            Err(EcoError::InvalidConfig(msg)) if msg.contains("sampling_period_seconds")
        ));
    }
}

#[test]
fn rejects_corrupt_watts() {
    for watts in [-1.0, f64::NAN, f64::INFINITY] {
        let log = log_of_watts(&[40.0, watts], 0.5);
        assert!(matches!(
            calculate(&log, 0.4),
            Err(EcoError::InvalidSample(_))
        ));
    }
}
