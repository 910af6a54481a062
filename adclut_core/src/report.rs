//! Correction quality against the unity line.
//!
//! For every DAC level the ideal ADC reading is the nominal DAC voltage
//! expressed in ADC codes. Errors are taken per level on the mean reading, so
//! sample noise averages out and what remains is the transfer-curve error.

use crate::dataset::CalibrationDataset;
use crate::error::{CalibrationError, Result};
use crate::resample::CorrectionTable;

/// Error summary for one series of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub rms_codes: f64,
    pub max_abs_codes: f64,
    pub rms_volts: f64,
    pub max_abs_volts: f64,
}

impl ErrorStats {
    fn from_errors(errors_codes: &[f64], volts_per_code: f64) -> Self {
        let n = errors_codes.len().max(1) as f64;
        let rms = (errors_codes.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
        let max_abs = errors_codes.iter().fold(0.0f64, |m, e| m.max(e.abs()));
        Self {
            rms_codes: rms,
            max_abs_codes: max_abs,
            rms_volts: rms * volts_per_code,
            max_abs_volts: max_abs * volts_per_code,
        }
    }
}

/// Error of one DAC level, in ADC codes (mean reading minus ideal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelError {
    pub dac_code: u32,
    pub ideal_code: f64,
    pub raw_error: f64,
    pub lut_error: f64,
    pub firmware_error: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionReport {
    pub samples: usize,
    pub levels: Vec<LevelError>,
    /// Uncorrected readings.
    pub raw: ErrorStats,
    /// Readings passed through the new table.
    pub lut: ErrorStats,
    /// Readings the firmware corrected during capture, when recorded.
    pub firmware: Option<ErrorStats>,
}

#[derive(Default, Clone, Copy)]
struct Sums {
    count: u64,
    raw: u64,
    lut: u64,
    firmware: u64,
}

/// Compare raw, table-corrected and (if present) firmware-corrected readings
/// of `dataset` against the ideal response.
///
/// Fails with `InvalidTable` when `table` was not built for the dataset's
/// ADC resolution.
pub fn correction_report(
    dataset: &CalibrationDataset,
    table: &CorrectionTable,
) -> Result<CorrectionReport> {
    let params = dataset.params();
    if table.len() != params.table_len() {
        return Err(CalibrationError::InvalidTable(format!(
            "table has {} entries but the dataset needs {}",
            table.len(),
            params.table_len()
        )));
    }
    let mut sums = vec![Sums::default(); params.dac_levels as usize];
    for s in dataset.samples() {
        let slot = &mut sums[s.dac_code as usize];
        slot.count += 1;
        slot.raw += u64::from(s.raw_adc_code);
        let corrected = table.apply(s.raw_adc_code).ok_or_else(|| {
            CalibrationError::InvalidTable(format!("raw code {} has no entry", s.raw_adc_code))
        })?;
        slot.lut += u64::from(corrected);
        slot.firmware += u64::from(s.corrected_adc_code.unwrap_or(0));
    }
    let with_firmware = dataset.has_corrected();

    let levels: Vec<LevelError> = sums
        .iter()
        .enumerate()
        .filter(|(_, s)| s.count > 0)
        .map(|(code, s)| {
            let n = s.count as f64;
            let ideal = params.volts_to_adc_code(params.dac_code_to_volts(code as f64));
            LevelError {
                dac_code: code as u32,
                ideal_code: ideal,
                raw_error: s.raw as f64 / n - ideal,
                lut_error: s.lut as f64 / n - ideal,
                firmware_error: with_firmware.then(|| s.firmware as f64 / n - ideal),
            }
        })
        .collect();

    let volts_per_code = params.adc_code_to_volts(1.0);
    let raw: Vec<f64> = levels.iter().map(|l| l.raw_error).collect();
    let lut: Vec<f64> = levels.iter().map(|l| l.lut_error).collect();
    let firmware: Option<Vec<f64>> = levels.iter().map(|l| l.firmware_error).collect();

    Ok(CorrectionReport {
        samples: dataset.len(),
        raw: ErrorStats::from_errors(&raw, volts_per_code),
        lut: ErrorStats::from_errors(&lut, volts_per_code),
        firmware: firmware.map(|f| ErrorStats::from_errors(&f, volts_per_code)),
        levels,
    })
}
