#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and dataset parsing for the ADC linearization tooling.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; an empty file yields the ESP32 defaults.
//! - Dataset loaders (see [`dataset`]) read explicitly named files into
//!   parallel arrays. Range checks are left to the core so that a bad code is
//!   reported with the same error no matter which loader produced it.
use serde::Deserialize;

pub mod dataset;

pub use dataset::{
    CaptureLog, DatasetArrays, SampleRow, load_capture, load_dataset, load_dataset_csv,
    load_dataset_json, parse_capture,
};

/// Largest supported ADC resolution; the table is stored as `uint16_t` and
/// sized `2^bits`, capped at 4096 entries.
pub const MAX_ADC_RESOLUTION_BITS: u32 = 12;
/// Largest supported number of DAC levels (8-bit DAC).
pub const MAX_DAC_LEVELS: u32 = 256;
/// Highest polynomial order accepted for the alternate mapper.
pub const MAX_POLY_ORDER: usize = 9;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AdcCfg {
    /// Reference voltage shared by the DAC and the ADC (volts)
    pub v_ref: f64,
    /// ADC resolution in bits; the table has `2^resolution_bits` entries
    pub resolution_bits: u32,
}

impl Default for AdcCfg {
    fn default() -> Self {
        Self {
            v_ref: 3.3,
            resolution_bits: 12,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DacCfg {
    /// Number of DAC output levels (256 for an 8-bit DAC)
    pub levels: u32,
}

impl Default for DacCfg {
    fn default() -> Self {
        Self { levels: 256 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TableCfg {
    /// C identifier of the emitted array; also drives the include guard
    pub name: String,
    /// Number of lowest raw codes forced to 0 to hide noise-floor artifacts
    pub low_code_clamp_count: usize,
    /// Values per line in the emitted header
    pub values_per_line: usize,
}

impl Default for TableCfg {
    fn default() -> Self {
        Self {
            name: "adc_correction_lut".to_string(),
            low_code_clamp_count: 5,
            values_per_line: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MapperKind {
    /// Piecewise-linear inverse with boundary-segment extrapolation
    #[default]
    Linear,
    /// Least-squares polynomial, order picked by lowest SSE
    Polynomial,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MapperCfg {
    pub kind: MapperKind,
    /// Highest order tried by the polynomial mapper
    pub max_order: usize,
}

impl Default for MapperCfg {
    fn default() -> Self {
        Self {
            kind: MapperKind::Linear,
            max_order: 5,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub adc: AdcCfg,
    pub dac: DacCfg,
    pub table: TableCfg,
    pub mapper: MapperCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file. Validation is a separate step.
pub fn load_config_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration in {:?}: {}", path, e))
}

/// True when `s` is usable as a C identifier (and therefore as an array name).
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // ADC
        if !self.adc.v_ref.is_finite() || self.adc.v_ref <= 0.0 {
            eyre::bail!("adc.v_ref must be a finite voltage > 0");
        }
        if self.adc.resolution_bits < 2 || self.adc.resolution_bits > MAX_ADC_RESOLUTION_BITS {
            eyre::bail!("adc.resolution_bits must be in [2, {MAX_ADC_RESOLUTION_BITS}]");
        }

        // DAC
        if self.dac.levels < 2 || self.dac.levels > MAX_DAC_LEVELS {
            eyre::bail!("dac.levels must be in [2, {MAX_DAC_LEVELS}]");
        }

        // Table
        if !is_c_identifier(&self.table.name) {
            eyre::bail!(
                "table.name must be a valid C identifier, got {:?}",
                self.table.name
            );
        }
        let table_len = 1usize << self.adc.resolution_bits;
        if self.table.low_code_clamp_count > table_len {
            eyre::bail!("table.low_code_clamp_count must be <= {table_len}");
        }
        if self.table.values_per_line == 0 {
            eyre::bail!("table.values_per_line must be >= 1");
        }

        // Mapper
        if self.mapper.max_order == 0 || self.mapper.max_order > MAX_POLY_ORDER {
            eyre::bail!("mapper.max_order must be in [1, {MAX_POLY_ORDER}]");
        }

        // Logging
        if let Some(level) = self.logging.level.as_deref()
            && !matches!(
                level.to_ascii_lowercase().as_str(),
                "error" | "warn" | "info" | "debug" | "trace"
            )
        {
            eyre::bail!("logging.level must be one of error|warn|info|debug|trace");
        }
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(
                rotation.to_ascii_lowercase().as_str(),
                "never" | "daily" | "hourly"
            )
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
