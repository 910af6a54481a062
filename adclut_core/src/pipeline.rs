//! Linear pipeline: Average -> BuildInverseMap -> Resample&Quantize.
//!
//! Every stage is a pure function of the previous stage's output. The first
//! failure aborts the run and nothing downstream is evaluated.

use crate::averager::{AveragedPoint, average};
use crate::dataset::CalibrationDataset;
use crate::error::Result;
use crate::inverse_map::PiecewiseLinearMap;
use crate::polyfit::PolynomialMap;
use crate::resample::{CorrectionTable, resample};

/// Which inverse map backs the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapperChoice {
    #[default]
    Linear,
    Polynomial {
        max_order: usize,
    },
}

/// What the inverse-map stage produced, for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapperSummary {
    Linear { knots: usize, dropped_duplicates: usize },
    Polynomial { order: usize, sse: f64 },
}

/// Pipeline output.
#[derive(Debug, Clone)]
pub struct Calibration {
    pub points: Vec<AveragedPoint>,
    pub mapper: MapperSummary,
    pub table: CorrectionTable,
}

/// Run the full pipeline on a validated dataset.
pub fn run(dataset: &CalibrationDataset, mapper: MapperChoice) -> Result<Calibration> {
    let params = dataset.params();
    let points = average(dataset)?;

    let (table, summary) = match mapper {
        MapperChoice::Linear => {
            let map = PiecewiseLinearMap::build(&points)?;
            let summary = MapperSummary::Linear {
                knots: map.knot_count(),
                dropped_duplicates: map.dropped_duplicates(),
            };
            (resample(&map, params)?, summary)
        }
        MapperChoice::Polynomial { max_order } => {
            let map = PolynomialMap::fit(&points, max_order)?;
            let summary = MapperSummary::Polynomial {
                order: map.order(),
                sse: map.sse(),
            };
            (resample(&map, params)?, summary)
        }
    };

    tracing::info!(
        samples = dataset.len(),
        levels = points.len(),
        entries = table.len(),
        mapper = ?summary,
        "correction table generated"
    );
    Ok(Calibration {
        points,
        mapper: summary,
        table,
    })
}

/// Piecewise-linear table for `dataset`; shorthand for `run(dataset, Linear)`.
pub fn generate_table(dataset: &CalibrationDataset) -> Result<CorrectionTable> {
    run(dataset, MapperChoice::Linear).map(|c| c.table)
}
