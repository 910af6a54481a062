//! Bridges from `adclut_config` types to `adclut_core` types.

use crate::config::CalibrationParams;
use crate::dataset::CalibrationDataset;
use crate::emit::HeaderOptions;
use crate::error::Result;
use crate::pipeline::MapperChoice;

// ── CalibrationParams ────────────────────────────────────────────────────────

impl From<&adclut_config::Config> for CalibrationParams {
    fn from(c: &adclut_config::Config) -> Self {
        Self {
            v_ref: c.adc.v_ref,
            dac_levels: c.dac.levels,
            adc_resolution_bits: c.adc.resolution_bits,
            low_code_clamp_count: c.table.low_code_clamp_count,
        }
    }
}

// ── MapperChoice ─────────────────────────────────────────────────────────────

impl From<&adclut_config::MapperCfg> for MapperChoice {
    fn from(c: &adclut_config::MapperCfg) -> Self {
        match c.kind {
            adclut_config::MapperKind::Linear => Self::Linear,
            adclut_config::MapperKind::Polynomial => Self::Polynomial {
                max_order: c.max_order,
            },
        }
    }
}

// ── HeaderOptions ────────────────────────────────────────────────────────────

impl From<&adclut_config::Config> for HeaderOptions {
    fn from(c: &adclut_config::Config) -> Self {
        Self {
            name: c.table.name.clone(),
            values_per_line: c.table.values_per_line,
            adc_resolution_bits: c.adc.resolution_bits,
        }
    }
}

// ── CalibrationDataset ───────────────────────────────────────────────────────

impl CalibrationDataset {
    pub fn from_arrays(
        arrays: &adclut_config::DatasetArrays,
        params: CalibrationParams,
    ) -> Result<Self> {
        Self::from_parallel(
            &arrays.dac,
            &arrays.adc_raw,
            arrays.adc_corrected.as_deref(),
            params,
        )
    }
}
