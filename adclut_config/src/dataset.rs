//! Dataset loaders.
//!
//! All loaders produce [`DatasetArrays`]: three parallel arrays
//! `{dac, adc_raw, adc_corrected?}`. Codes are kept as wide signed integers
//! here so that out-of-range values survive parsing and are rejected by the
//! core with a precise error instead of a generic parse failure.
use serde::Deserialize;
use std::path::Path;

/// One CSV record.
///
/// Expected headers:
/// dac,adc_raw[,adc_corrected]
///
/// Example:
/// dac,adc_raw,adc_corrected
/// 0,3,0
/// 128,1571,1650
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SampleRow {
    pub dac: i64,
    pub adc_raw: i64,
    #[serde(default)]
    pub adc_corrected: Option<i64>,
}

/// Parallel-array form of a calibration capture.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DatasetArrays {
    pub dac: Vec<i64>,
    pub adc_raw: Vec<i64>,
    #[serde(default)]
    pub adc_corrected: Option<Vec<i64>>,
}

impl DatasetArrays {
    pub fn len(&self) -> usize {
        self.dac.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dac.is_empty()
    }

    fn from_rows(rows: &[SampleRow]) -> Self {
        let corrected: Option<Vec<i64>> = rows.iter().map(|r| r.adc_corrected).collect();
        Self {
            dac: rows.iter().map(|r| r.dac).collect(),
            adc_raw: rows.iter().map(|r| r.adc_raw).collect(),
            // An empty capture has no evidence of a corrected column
            adc_corrected: corrected.filter(|c| !c.is_empty()),
        }
    }
}

/// Result of parsing a raw serial capture.
#[derive(Debug, Clone, Default)]
pub struct CaptureLog {
    pub arrays: DatasetArrays,
    /// Non-blank lines that could not be parsed and were dropped
    pub skipped_lines: usize,
}

/// Parse firmware output: one sample per line, tab-separated
/// `dac<TAB>raw` or `dac<TAB>raw<TAB>corrected`.
///
/// Serial captures routinely contain boot banners and torn lines, so
/// unparsable lines are skipped and counted rather than failing the load.
/// The first parsed line fixes the column count; later lines with a
/// different count are torn and skipped too.
pub fn parse_capture(text: &str) -> CaptureLog {
    let mut rows = Vec::new();
    let mut columns: Option<usize> = None;
    let mut skipped_lines = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_capture_line(line) {
            Some((row, n)) if columns.is_none_or(|c| c == n) => {
                columns = Some(n);
                rows.push(row);
            }
            _ => skipped_lines += 1,
        }
    }
    if skipped_lines > 0 {
        tracing::warn!(skipped_lines, "capture contained unparsable lines");
    }
    CaptureLog {
        arrays: DatasetArrays::from_rows(&rows),
        skipped_lines,
    }
}

fn parse_capture_line(line: &str) -> Option<(SampleRow, usize)> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    let parse = |s: &str| s.parse::<i64>().ok();
    let row = match fields.as_slice() {
        [dac, raw] => SampleRow {
            dac: parse(dac)?,
            adc_raw: parse(raw)?,
            adc_corrected: None,
        },
        [dac, raw, corrected] => SampleRow {
            dac: parse(dac)?,
            adc_raw: parse(raw)?,
            adc_corrected: Some(parse(corrected)?),
        },
        _ => return None,
    };
    Some((row, fields.len()))
}

pub fn load_capture(path: &Path) -> eyre::Result<CaptureLog> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("open capture log {:?}: {}", path, e))?;
    Ok(parse_capture(&text))
}

pub fn load_dataset_csv(path: &Path) -> eyre::Result<DatasetArrays> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open dataset CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    let accepted: [&[&str]; 2] = [&["dac", "adc_raw"], &["dac", "adc_raw", "adc_corrected"]];
    if !accepted.iter().any(|exp| actual == *exp) {
        eyre::bail!(
            "dataset CSV must have headers 'dac,adc_raw' or 'dac,adc_raw,adc_corrected', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<SampleRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    let arrays = DatasetArrays::from_rows(&rows);
    if actual.len() == 3 && arrays.adc_corrected.is_none() && !rows.is_empty() {
        eyre::bail!("dataset CSV {:?}: adc_corrected column has empty cells", path);
    }
    Ok(arrays)
}

pub fn load_dataset_json(path: &Path) -> eyre::Result<DatasetArrays> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open dataset JSON {:?}: {}", path, e))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| eyre::eyre!("invalid dataset JSON {:?}: {}", path, e))
}

/// Load a dataset, picking the format from the file extension:
/// `.csv`, `.json`, or `.log`/`.tsv`/`.txt` for raw captures.
pub fn load_dataset(path: &Path) -> eyre::Result<DatasetArrays> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let arrays = match ext.as_deref() {
        Some("csv") => load_dataset_csv(path)?,
        Some("json") => load_dataset_json(path)?,
        Some("log" | "tsv" | "txt") => load_capture(path)?.arrays,
        _ => eyre::bail!(
            "unsupported dataset extension for {:?} (expected .csv, .json, .log, .tsv or .txt)",
            path
        ),
    };
    tracing::debug!(path = %path.display(), samples = arrays.len(), "dataset loaded");
    Ok(arrays)
}
