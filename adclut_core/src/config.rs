//! Runtime parameters for the calibration pipeline.
//!
//! These are separate from the TOML-deserialized config in `adclut_config`;
//! see `conversions` for the mapping.

use crate::error::{CalibrationError, Result};

/// Converter geometry and quantization policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParams {
    /// Reference voltage for both converters (volts).
    pub v_ref: f64,
    /// Number of DAC output levels; codes run `0..dac_levels`.
    pub dac_levels: u32,
    /// ADC resolution; raw codes run `0..2^adc_resolution_bits`.
    pub adc_resolution_bits: u32,
    /// Lowest raw codes forced to 0 after quantization.
    pub low_code_clamp_count: usize,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            v_ref: 3.3,
            dac_levels: 256,
            adc_resolution_bits: 12,
            low_code_clamp_count: 5,
        }
    }
}

impl CalibrationParams {
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(CalibrationError::InvalidParameters(msg));
        if !self.v_ref.is_finite() || self.v_ref <= 0.0 {
            return bad(format!("v_ref must be finite and > 0, got {}", self.v_ref));
        }
        if !(2..=12).contains(&self.adc_resolution_bits) {
            return bad(format!(
                "adc_resolution_bits must be in [2, 12], got {}",
                self.adc_resolution_bits
            ));
        }
        if !(2..=256).contains(&self.dac_levels) {
            return bad(format!(
                "dac_levels must be in [2, 256], got {}",
                self.dac_levels
            ));
        }
        if self.low_code_clamp_count > self.table_len() {
            return bad(format!(
                "low_code_clamp_count {} exceeds table length {}",
                self.low_code_clamp_count,
                self.table_len()
            ));
        }
        Ok(())
    }

    /// Number of entries in the correction table (4096 for 12 bits).
    #[inline]
    pub fn table_len(&self) -> usize {
        1usize << self.adc_resolution_bits
    }

    /// Highest raw ADC code (4095 for 12 bits).
    #[inline]
    pub fn adc_full_scale(&self) -> u32 {
        (1u32 << self.adc_resolution_bits) - 1
    }

    /// Highest DAC code (255 for 256 levels).
    #[inline]
    pub fn dac_full_scale(&self) -> u32 {
        self.dac_levels - 1
    }

    #[inline]
    pub fn adc_code_to_volts(&self, code: f64) -> f64 {
        code * self.v_ref / f64::from(self.adc_full_scale())
    }

    #[inline]
    pub fn dac_code_to_volts(&self, code: f64) -> f64 {
        code * self.v_ref / f64::from(self.dac_full_scale())
    }

    /// Unrounded ADC-code equivalent of a voltage.
    #[inline]
    pub fn volts_to_adc_code(&self, volts: f64) -> f64 {
        volts / self.v_ref * f64::from(self.adc_full_scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let p = CalibrationParams::default();
        assert_eq!(p.table_len(), 4096);
        assert_eq!(p.adc_full_scale(), 4095);
        assert_eq!(p.dac_full_scale(), 255);
        assert!((p.dac_code_to_volts(255.0) - 3.3).abs() < 1e-12);
        assert!((p.adc_code_to_volts(4095.0) - 3.3).abs() < 1e-12);
        p.validate().unwrap();
    }

    #[test]
    fn rejects_oversized_clamp() {
        let p = CalibrationParams {
            adc_resolution_bits: 2,
            low_code_clamp_count: 5,
            ..CalibrationParams::default()
        };
        assert!(matches!(
            p.validate(),
            Err(CalibrationError::InvalidParameters(_))
        ));
    }
}
