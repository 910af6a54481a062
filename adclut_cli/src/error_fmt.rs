//! Human-readable error descriptions and structured JSON error formatting.

use adclut_core::CalibrationError;

fn calibration_error(err: &eyre::Report) -> Option<&CalibrationError> {
    err.chain().find_map(|e| e.downcast_ref::<CalibrationError>())
}

/// Stable name for the JSON `reason` field.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    match calibration_error(err) {
        Some(CalibrationError::EmptyDataset) => "EmptyDataset",
        Some(CalibrationError::DatasetMalformed(_)) => "DatasetMalformed",
        Some(CalibrationError::DegenerateInterpolation { .. }) => "DegenerateInterpolation",
        Some(CalibrationError::InvalidParameters(_)) => "InvalidParameters",
        Some(CalibrationError::InvalidTable(_)) => "InvalidTable",
        None => "Error",
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(ce) = calibration_error(err) {
        return match ce {
            CalibrationError::EmptyDataset => {
                "What happened: The dataset contains no samples.\nLikely causes: The capture stopped before the firmware sent data, or the wrong file was passed.\nHow to fix: Re-run the capture and pass the resulting file with --dataset.".to_string()
            }
            CalibrationError::DatasetMalformed(msg) => format!(
                "What happened: The dataset is malformed ({msg}).\nLikely causes: A code outside the DAC/ADC range, columns of different lengths, or a capture taken with a different resolution.\nHow to fix: Check dac.levels and adc.resolution_bits in the config against the firmware, then re-capture if needed."
            ),
            CalibrationError::DegenerateInterpolation { distinct } => format!(
                "What happened: Only {distinct} distinct averaged point(s); at least 2 are needed to build the inverse curve.\nLikely causes: The DAC sweep did not run, or every level read back the same voltage (ADC input floating or shorted).\nHow to fix: Verify the DAC-to-ADC wiring and capture a full sweep."
            ),
            CalibrationError::InvalidParameters(msg) => format!(
                "What happened: Invalid calibration parameters ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun `adclut check-config`."
            ),
            CalibrationError::InvalidTable(msg) => format!(
                "What happened: The table cannot be emitted ({msg}).\nLikely causes: A table name that is not a C identifier, or a table built for a different resolution.\nHow to fix: Fix table.name (or --name) and rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from loaders or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("dataset csv must have headers") {
        return "Invalid headers in dataset CSV. Expected 'dac,adc_raw' or 'dac,adc_raw,adc_corrected'.".to_string();
    }

    if lower.contains("unsupported dataset extension") {
        return format!(
            "What happened: {msg}.\nHow to fix: Save the capture as .csv, .json, or a raw .log/.tsv/.txt serial dump."
        );
    }

    if lower.contains("invalid configuration") {
        let cause = err
            .chain()
            .nth(1)
            .map(|c| format!(" ({c})"))
            .unwrap_or_else(|| format!(" ({msg})"));
        return format!(
            "What happened: Configuration is invalid{cause}.\nLikely causes: Typo in a key or an out-of-range value.\nHow to fix: Edit the TOML config and run `adclut check-config`."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per calibration failure; everything else returns 1.
/// (clap exits with 2 on usage errors.)
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match calibration_error(err) {
        Some(CalibrationError::EmptyDataset) => 3,
        Some(CalibrationError::DatasetMalformed(_)) => 4,
        Some(CalibrationError::DegenerateInterpolation { .. }) => 5,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
