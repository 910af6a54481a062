//! Full-range resampling and quantization onto the raw ADC code domain.

use crate::config::CalibrationParams;
use crate::error::{CalibrationError, Result};
use crate::inverse_map::InverseMap;

/// Per-code correction table: `entries[r]` is the corrected code for raw code `r`.
///
/// Always holds exactly `2^bits` entries, each within `[0, 2^bits - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionTable {
    entries: Box<[u16]>,
    full_scale: u16,
}

impl CorrectionTable {
    /// Wrap precomputed entries, enforcing the length and range invariants.
    pub fn from_entries(entries: Vec<u16>, params: &CalibrationParams) -> Result<Self> {
        params.validate()?;
        if entries.len() != params.table_len() {
            return Err(CalibrationError::InvalidTable(format!(
                "expected {} entries, got {}",
                params.table_len(),
                entries.len()
            )));
        }
        let full_scale = full_scale_u16(params);
        if let Some((i, v)) = entries.iter().enumerate().find(|(_, v)| **v > full_scale) {
            return Err(CalibrationError::InvalidTable(format!(
                "entry {i} = {v} exceeds full scale {full_scale}"
            )));
        }
        Ok(Self {
            entries: entries.into_boxed_slice(),
            full_scale,
        })
    }

    pub fn entries(&self) -> &[u16] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn full_scale(&self) -> u16 {
        self.full_scale
    }

    /// Corrected code for a raw reading; `None` if the raw code is out of range.
    #[inline]
    pub fn apply(&self, raw: u32) -> Option<u16> {
        self.entries.get(raw as usize).copied()
    }

    pub fn is_non_decreasing(&self) -> bool {
        self.entries.windows(2).all(|w| w[0] <= w[1])
    }
}

#[inline]
fn full_scale_u16(params: &CalibrationParams) -> u16 {
    // resolution is capped at 12 bits by validation
    params.adc_full_scale() as u16
}

/// Round a corrected voltage to the nearest ADC code and clamp it into the
/// representable range. Ties round to even; non-finite input maps to 0.
#[inline]
pub fn quantize(volts: f64, params: &CalibrationParams) -> u16 {
    let code = params.volts_to_adc_code(volts).round_ties_even();
    if !code.is_finite() {
        return 0;
    }
    code.clamp(0.0, f64::from(params.adc_full_scale())) as u16
}

/// Evaluate `map` at every raw code, quantize, clamp, then force the lowest
/// `low_code_clamp_count` entries to 0 regardless of the interpolated value.
pub fn resample<M>(map: &M, params: &CalibrationParams) -> Result<CorrectionTable>
where
    M: InverseMap + ?Sized,
{
    params.validate()?;
    let mut entries: Vec<u16> = (0..params.table_len())
        .map(|raw| {
            let measured = params.adc_code_to_volts(raw as f64);
            quantize(map.ideal_voltage(measured), params)
        })
        .collect();

    let clamp = params.low_code_clamp_count.min(entries.len());
    entries[..clamp].fill(0);

    let (lo, hi) = map.domain();
    tracing::debug!(
        entries = entries.len(),
        low_code_clamp = clamp,
        domain_min_v = lo,
        domain_max_v = hi,
        "resampled inverse map onto raw code domain"
    );
    CorrectionTable::from_entries(entries, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_clamps_and_rounds() {
        let p = CalibrationParams::default();
        assert_eq!(quantize(-1.0, &p), 0);
        assert_eq!(quantize(10.0, &p), 4095);
        assert_eq!(quantize(f64::NAN, &p), 0);
        assert_eq!(quantize(f64::INFINITY, &p), 0);
        assert_eq!(quantize(3.3, &p), 4095);
        assert_eq!(quantize(p.adc_code_to_volts(1.4), &p), 1);
        assert_eq!(quantize(p.adc_code_to_volts(1.6), &p), 2);
    }

    #[test]
    fn from_entries_enforces_invariants() {
        let p = CalibrationParams::default();
        assert!(CorrectionTable::from_entries(vec![0; 10], &p).is_err());
        let mut v = vec![0u16; 4096];
        v[7] = 4096;
        assert!(matches!(
            CorrectionTable::from_entries(v, &p),
            Err(CalibrationError::InvalidTable(_))
        ));
    }
}
