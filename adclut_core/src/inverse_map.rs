//! Inverse calibration curve: measured ADC voltage -> ideal DAC voltage.
//!
//! The measured axis is the independent variable. Averaged points arrive
//! sorted by DAC code, which does not guarantee ascending measured voltage,
//! so the builder re-sorts them before forming segments.

use crate::averager::AveragedPoint;
use crate::error::{CalibrationError, Result};

/// Function recovering the ideal (pre-distortion) voltage from a measured one.
pub trait InverseMap {
    /// Ideal DAC voltage for a measured ADC voltage. Defined for every finite
    /// input; outside the sampled range implementations extrapolate.
    fn ideal_voltage(&self, measured: f64) -> f64;

    /// Sampled measured-voltage range `(min, max)`.
    fn domain(&self) -> (f64, f64);
}

/// Piecewise-linear interpolant with boundary-segment extrapolation.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinearMap {
    xs: Vec<f64>,
    ys: Vec<f64>,
    dropped_duplicates: usize,
}

/// Sort `(measured, ideal)` pairs by measured voltage and keep the first
/// occurrence of each measured value. The sort is stable, so among equal
/// measured voltages the lowest DAC level wins.
pub(crate) fn sorted_unique(mut pairs: Vec<(f64, f64)>) -> Result<(Vec<(f64, f64)>, usize)> {
    if let Some((x, y)) = pairs.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(CalibrationError::DatasetMalformed(format!(
            "non-finite calibration point ({x}, {y})"
        )));
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    let before = pairs.len();
    pairs.dedup_by(|later, kept| later.0 == kept.0);
    let dropped = before - pairs.len();
    Ok((pairs, dropped))
}

impl PiecewiseLinearMap {
    /// Build from averaged points, using `mean_adc_voltage` as x and
    /// `dac_voltage` as y.
    pub fn build(points: &[AveragedPoint]) -> Result<Self> {
        Self::from_pairs(
            points
                .iter()
                .map(|p| (p.mean_adc_voltage, p.dac_voltage))
                .collect(),
        )
    }

    /// Build from `(measured, ideal)` pairs in any order.
    pub fn from_pairs(pairs: Vec<(f64, f64)>) -> Result<Self> {
        let (pairs, dropped_duplicates) = sorted_unique(pairs)?;
        if pairs.len() < 2 {
            return Err(CalibrationError::DegenerateInterpolation {
                distinct: pairs.len(),
            });
        }
        if dropped_duplicates > 0 {
            tracing::debug!(
                dropped_duplicates,
                "dropped points with duplicate measured voltage"
            );
        }
        let (xs, ys) = pairs.into_iter().unzip();
        Ok(Self {
            xs,
            ys,
            dropped_duplicates,
        })
    }

    /// Knots as `(measured, ideal)`, ascending by measured voltage.
    pub fn knots(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    pub fn knot_count(&self) -> usize {
        self.xs.len()
    }

    /// Points discarded because their measured voltage repeated an earlier one.
    pub fn dropped_duplicates(&self) -> usize {
        self.dropped_duplicates
    }
}

impl InverseMap for PiecewiseLinearMap {
    fn ideal_voltage(&self, measured: f64) -> f64 {
        let n = self.xs.len();
        // Index of the first knot strictly above `measured`
        let idx = self.xs.partition_point(|&x| x <= measured);
        if idx > 0 && self.xs[idx - 1] == measured {
            return self.ys[idx - 1];
        }
        // Below the range use segment 0, above it segment n-2
        let seg = idx.clamp(1, n - 1) - 1;
        let (x0, x1) = (self.xs[seg], self.xs[seg + 1]);
        let (y0, y1) = (self.ys[seg], self.ys[seg + 1]);
        y0 + (measured - x0) * (y1 - y0) / (x1 - x0)
    }

    fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_knots_return_knot_values() {
        let m = PiecewiseLinearMap::from_pairs(vec![(0.0, 0.0), (1.0, 2.0), (2.0, 3.0)]).unwrap();
        assert_eq!(m.ideal_voltage(0.0), 0.0);
        assert_eq!(m.ideal_voltage(1.0), 2.0);
        assert_eq!(m.ideal_voltage(2.0), 3.0);
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let err = PiecewiseLinearMap::from_pairs(vec![(0.0, 0.0), (f64::NAN, 1.0)]).unwrap_err();
        assert!(matches!(err, CalibrationError::DatasetMalformed(_)));
    }
}
