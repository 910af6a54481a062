//! Command bodies: config mapping, dataset loading, pipeline, output.

use adclut_core::{
    Calibration, CalibrationDataset, CalibrationParams, CorrectionReport, ErrorStats,
    HeaderOptions, MapperChoice, MapperSummary,
};
use eyre::WrapErr;
use serde_json::{Value, json};
use std::path::Path;

pub fn load_dataset(path: &Path, params: CalibrationParams) -> eyre::Result<CalibrationDataset> {
    let arrays = adclut_config::load_dataset(path)?;
    let dataset = CalibrationDataset::from_arrays(&arrays, params)
        .wrap_err_with(|| format!("dataset {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        samples = dataset.len(),
        firmware_corrected = dataset.has_corrected(),
        "dataset loaded"
    );
    Ok(dataset)
}

fn mapper_choice(cfg: &adclut_config::Config, polynomial: bool) -> MapperChoice {
    if polynomial {
        MapperChoice::Polynomial {
            max_order: cfg.mapper.max_order,
        }
    } else {
        (&cfg.mapper).into()
    }
}

fn mapper_json(m: &MapperSummary) -> Value {
    match m {
        MapperSummary::Linear {
            knots,
            dropped_duplicates,
        } => json!({ "kind": "linear", "knots": knots, "dropped_duplicates": dropped_duplicates }),
        MapperSummary::Polynomial { order, sse } => {
            json!({ "kind": "polynomial", "order": order, "sse": sse })
        }
    }
}

fn mapper_text(m: &MapperSummary) -> String {
    match m {
        MapperSummary::Linear {
            knots,
            dropped_duplicates: 0,
        } => format!("linear, {knots} knots"),
        MapperSummary::Linear {
            knots,
            dropped_duplicates,
        } => format!("linear, {knots} knots, {dropped_duplicates} duplicate(s) dropped"),
        MapperSummary::Polynomial { order, sse } => {
            format!("polynomial, order {order}, SSE {sse:.3e} V^2")
        }
    }
}

/// Run the pipeline and write the header. The file is written only after
/// every stage, including rendering, has succeeded.
pub fn run_generate(
    cfg: &adclut_config::Config,
    dataset: &Path,
    output: &Path,
    name: Option<&str>,
    polynomial: bool,
) -> eyre::Result<Calibration> {
    let params: CalibrationParams = cfg.into();
    let ds = load_dataset(dataset, params)?;
    let calibration = adclut_core::run(&ds, mapper_choice(cfg, polynomial))?;

    let mut opts: HeaderOptions = cfg.into();
    if let Some(n) = name {
        opts.name = n.to_string();
    }
    let header = adclut_core::render_c_header(calibration.table.entries(), &opts)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("create output directory {}", parent.display()))?;
    }
    std::fs::write(output, header).wrap_err_with(|| format!("write {}", output.display()))?;
    tracing::info!(path = %output.display(), table = %opts.name, "header written");
    Ok(calibration)
}

pub fn print_generate(calibration: &Calibration, output: &Path, json: bool) {
    if json {
        let obj = json!({
            "output": output.display().to_string(),
            "entries": calibration.table.len(),
            "levels": calibration.points.len(),
            "mapper": mapper_json(&calibration.mapper),
        });
        println!("{obj}");
    } else {
        println!(
            "Wrote {}-entry correction table to {} ({} levels; {}).",
            calibration.table.len(),
            output.display(),
            calibration.points.len(),
            mapper_text(&calibration.mapper)
        );
    }
}

pub fn run_report(
    cfg: &adclut_config::Config,
    dataset: &Path,
    polynomial: bool,
) -> eyre::Result<(Calibration, CorrectionReport)> {
    let params: CalibrationParams = cfg.into();
    let ds = load_dataset(dataset, params)?;
    let calibration = adclut_core::run(&ds, mapper_choice(cfg, polynomial))?;
    let report = adclut_core::correction_report(&ds, &calibration.table)?;
    Ok((calibration, report))
}

fn stats_json(s: &ErrorStats) -> Value {
    json!({
        "rms_codes": s.rms_codes,
        "max_abs_codes": s.max_abs_codes,
        "rms_volts": s.rms_volts,
        "max_abs_volts": s.max_abs_volts,
    })
}

fn stats_line(label: &str, s: &ErrorStats) -> String {
    format!(
        "{label:<10} rms {:>8.2} codes ({:.4} V)   max {:>8.2} codes ({:.4} V)",
        s.rms_codes, s.rms_volts, s.max_abs_codes, s.max_abs_volts
    )
}

pub fn print_report(calibration: &Calibration, report: &CorrectionReport, json: bool) {
    if json {
        let obj = json!({
            "samples": report.samples,
            "levels": report.levels.len(),
            "mapper": mapper_json(&calibration.mapper),
            "raw": stats_json(&report.raw),
            "lut": stats_json(&report.lut),
            "firmware": report.firmware.as_ref().map(stats_json),
        });
        println!("{obj}");
        return;
    }
    println!("--- Correction Report ---");
    println!("Samples: {}", report.samples);
    println!("Levels: {}", report.levels.len());
    println!("Mapper: {}", mapper_text(&calibration.mapper));
    println!("{}", stats_line("raw", &report.raw));
    println!("{}", stats_line("lut", &report.lut));
    if let Some(fw) = &report.firmware {
        println!("{}", stats_line("firmware", fw));
    }
    println!("-------------------------");
}
