//! C header emission for firmware inclusion.
//!
//! Pure formatting: the table is checked against the emitter contract
//! (exact length, every entry within full scale) and rendered as a
//! `const uint16_t` array behind an include guard.

use crate::error::{CalibrationError, Result};
use std::fmt::Write as _;

/// Layout of the emitted header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOptions {
    /// Array name; must be a C identifier. The guard is `<NAME>_H`.
    pub name: String,
    pub values_per_line: usize,
    /// Resolution the table was built for; fixes the expected length.
    pub adc_resolution_bits: u32,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            name: "adc_correction_lut".to_string(),
            values_per_line: 8,
            adc_resolution_bits: 12,
        }
    }
}

impl HeaderOptions {
    pub fn include_guard(&self) -> String {
        format!("{}_H", self.name.to_ascii_uppercase())
    }
}

fn check_contract(entries: &[u16], opts: &HeaderOptions) -> Result<()> {
    if !adclut_config::is_c_identifier(&opts.name) {
        return Err(CalibrationError::InvalidTable(format!(
            "table name {:?} is not a C identifier",
            opts.name
        )));
    }
    if opts.values_per_line == 0 {
        return Err(CalibrationError::InvalidTable(
            "values_per_line must be >= 1".to_string(),
        ));
    }
    if !(2..=12).contains(&opts.adc_resolution_bits) {
        return Err(CalibrationError::InvalidTable(format!(
            "unsupported resolution {} bits",
            opts.adc_resolution_bits
        )));
    }
    let expected = 1usize << opts.adc_resolution_bits;
    if entries.len() != expected {
        return Err(CalibrationError::InvalidTable(format!(
            "expected {expected} entries, got {}",
            entries.len()
        )));
    }
    let full_scale = (expected - 1) as u16;
    if let Some((i, v)) = entries.iter().enumerate().find(|(_, v)| **v > full_scale) {
        return Err(CalibrationError::InvalidTable(format!(
            "entry {i} = {v} exceeds full scale {full_scale}"
        )));
    }
    Ok(())
}

/// Render `entries` as a C header.
pub fn render_c_header(entries: &[u16], opts: &HeaderOptions) -> Result<String> {
    check_contract(entries, opts)?;
    let guard = opts.include_guard();

    let mut out = String::with_capacity(entries.len() * 6 + 256);
    // Writing into a String cannot fail
    let _ = writeln!(out, "#ifndef {guard}");
    let _ = writeln!(out, "#define {guard}");
    let _ = writeln!(out);
    let _ = writeln!(out, "#include <stdint.h>");
    let _ = writeln!(out);
    let _ = writeln!(out, "const uint16_t {}[{}] = {{", opts.name, entries.len());
    for chunk in entries.chunks(opts.values_per_line) {
        let line: Vec<String> = chunk.iter().map(|v| format!("{v:4}")).collect();
        let _ = writeln!(out, "  {},", line.join(", "));
    }
    let _ = writeln!(out, "}};");
    let _ = writeln!(out);
    let _ = writeln!(out, "#endif // {guard}");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_follows_name() {
        let opts = HeaderOptions {
            name: "adc1_lut".into(),
            ..HeaderOptions::default()
        };
        assert_eq!(opts.include_guard(), "ADC1_LUT_H");
    }
}
