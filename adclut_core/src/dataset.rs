//! Validated calibration captures.

use crate::config::CalibrationParams;
use crate::error::{CalibrationError, Result};

/// One reading: the DAC code that was driven and the ADC code read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSample {
    pub dac_code: u32,
    pub raw_adc_code: u32,
    /// Firmware-corrected reading, present when the capture ran with a LUT applied.
    pub corrected_adc_code: Option<u32>,
}

impl CalibrationSample {
    pub fn new(dac_code: u32, raw_adc_code: u32) -> Self {
        Self {
            dac_code,
            raw_adc_code,
            corrected_adc_code: None,
        }
    }
}

/// Non-empty sequence of in-range samples, tied to the parameters it was
/// validated against.
#[derive(Debug, Clone)]
pub struct CalibrationDataset {
    samples: Vec<CalibrationSample>,
    params: CalibrationParams,
}

/// Check that the sample set is non-empty and every code is inside the
/// declared DAC and ADC ranges.
pub fn validate_samples(samples: &[CalibrationSample], params: &CalibrationParams) -> Result<()> {
    if samples.is_empty() {
        return Err(CalibrationError::EmptyDataset);
    }
    let dac_max = params.dac_full_scale();
    let adc_max = params.adc_full_scale();
    for (i, s) in samples.iter().enumerate() {
        if s.dac_code > dac_max {
            return Err(CalibrationError::DatasetMalformed(format!(
                "sample {i}: dac code {} outside [0, {dac_max}]",
                s.dac_code
            )));
        }
        if s.raw_adc_code > adc_max {
            return Err(CalibrationError::DatasetMalformed(format!(
                "sample {i}: raw adc code {} outside [0, {adc_max}]",
                s.raw_adc_code
            )));
        }
        if let Some(c) = s.corrected_adc_code
            && c > adc_max
        {
            return Err(CalibrationError::DatasetMalformed(format!(
                "sample {i}: corrected adc code {c} outside [0, {adc_max}]"
            )));
        }
    }
    Ok(())
}

fn to_code(field: &str, index: usize, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        CalibrationError::DatasetMalformed(format!(
            "sample {index}: {field} code {value} is not a valid unsigned code"
        ))
    })
}

impl CalibrationDataset {
    pub fn new(samples: Vec<CalibrationSample>, params: CalibrationParams) -> Result<Self> {
        params.validate()?;
        validate_samples(&samples, &params)?;
        Ok(Self { samples, params })
    }

    /// Build from the persisted parallel-array form `{dac, adc_raw, adc_corrected?}`.
    pub fn from_parallel(
        dac: &[i64],
        adc_raw: &[i64],
        adc_corrected: Option<&[i64]>,
        params: CalibrationParams,
    ) -> Result<Self> {
        if dac.len() != adc_raw.len() {
            return Err(CalibrationError::DatasetMalformed(format!(
                "parallel arrays differ in length: dac={} adc_raw={}",
                dac.len(),
                adc_raw.len()
            )));
        }
        if let Some(c) = adc_corrected
            && c.len() != dac.len()
        {
            return Err(CalibrationError::DatasetMalformed(format!(
                "parallel arrays differ in length: dac={} adc_corrected={}",
                dac.len(),
                c.len()
            )));
        }
        if dac.is_empty() {
            return Err(CalibrationError::EmptyDataset);
        }

        let mut samples = Vec::with_capacity(dac.len());
        for (i, (&d, &r)) in dac.iter().zip(adc_raw).enumerate() {
            let corrected = match adc_corrected {
                Some(c) => Some(to_code("adc_corrected", i, c[i])?),
                None => None,
            };
            samples.push(CalibrationSample {
                dac_code: to_code("dac", i, d)?,
                raw_adc_code: to_code("adc_raw", i, r)?,
                corrected_adc_code: corrected,
            });
        }
        Self::new(samples, params)
    }

    pub fn samples(&self) -> &[CalibrationSample] {
        &self.samples
    }

    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when every sample carries a firmware-corrected reading.
    pub fn has_corrected(&self) -> bool {
        self.samples.iter().all(|s| s.corrected_adc_code.is_some())
    }
}
