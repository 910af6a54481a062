//! Per-level averaging of repeated readings.
//!
//! Raw codes are summed as integers per DAC code, so the reduction is exact
//! and does not depend on sample order: any permutation of a dataset yields
//! bit-identical points.

use crate::config::CalibrationParams;
use crate::dataset::{CalibrationDataset, CalibrationSample, validate_samples};
use crate::error::Result;

/// Mean response at one DAC level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedPoint {
    pub dac_code: u32,
    /// Nominal DAC output voltage.
    pub dac_voltage: f64,
    /// Mean measured ADC voltage.
    pub mean_adc_voltage: f64,
    /// Mean raw ADC code (unrounded).
    pub mean_adc_code: f64,
    pub sample_count: usize,
}

#[derive(Default, Clone, Copy)]
struct LevelAcc {
    count: u64,
    raw_sum: u64,
}

/// Average a validated dataset.
pub fn average(dataset: &CalibrationDataset) -> Result<Vec<AveragedPoint>> {
    average_samples(dataset.samples(), dataset.params())
}

/// Average raw samples, one point per distinct DAC code, sorted by DAC code.
///
/// Fails with `EmptyDataset` on zero samples and `DatasetMalformed` if any
/// code is out of range; nothing is averaged in either case.
pub fn average_samples(
    samples: &[CalibrationSample],
    params: &CalibrationParams,
) -> Result<Vec<AveragedPoint>> {
    params.validate()?;
    validate_samples(samples, params)?;

    let mut acc = vec![LevelAcc::default(); params.dac_levels as usize];
    for s in samples {
        let slot = &mut acc[s.dac_code as usize];
        slot.count += 1;
        slot.raw_sum += u64::from(s.raw_adc_code);
    }

    let points: Vec<AveragedPoint> = acc
        .iter()
        .enumerate()
        .filter(|(_, a)| a.count > 0)
        .map(|(code, a)| {
            let mean_code = a.raw_sum as f64 / a.count as f64;
            AveragedPoint {
                dac_code: code as u32,
                dac_voltage: params.dac_code_to_volts(code as f64),
                mean_adc_voltage: params.adc_code_to_volts(mean_code),
                mean_adc_code: mean_code,
                sample_count: a.count as usize,
            }
        })
        .collect();

    tracing::debug!(
        samples = samples.len(),
        levels = points.len(),
        "averaged samples per DAC level"
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_mean_is_exact() {
        let p = CalibrationParams::default();
        let samples = [
            CalibrationSample::new(10, 100),
            CalibrationSample::new(10, 101),
            CalibrationSample::new(10, 103),
        ];
        let pts = average_samples(&samples, &p).unwrap();
        assert_eq!(pts.len(), 1);
        assert!((pts[0].mean_adc_code - 304.0 / 3.0).abs() < 1e-12);
        assert_eq!(pts[0].sample_count, 3);
    }
}
