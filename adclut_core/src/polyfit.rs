//! Polynomial alternate mapper.
//!
//! Fits ideal DAC voltage as a polynomial in measured voltage by least
//! squares for every order up to a limit and keeps the order with the lowest
//! sum of squared errors. Unlike the piecewise-linear map this smooths over
//! per-level noise, at the cost of not passing through the averaged points.
//!
//! The abscissa is normalized to `[-1, 1]` before forming the normal
//! equations; with raw voltages the order-5 system is badly conditioned.

use crate::averager::AveragedPoint;
use crate::error::{CalibrationError, Result};
use crate::inverse_map::{InverseMap, sorted_unique};

/// SSE improvement a higher order must show to replace a lower one:
/// relative part plus an absolute floor (volts²) below rounding noise.
const SSE_REL_TOL: f64 = 1e-12;
const SSE_ABS_TOL: f64 = 1e-15;

#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialMap {
    /// Coefficients in ascending powers of the normalized abscissa.
    coeffs: Vec<f64>,
    center: f64,
    half_span: f64,
    sse: f64,
    domain: (f64, f64),
}

impl PolynomialMap {
    /// Fit orders `1..=max_order` (capped at `distinct points - 1`) and keep
    /// the best one.
    pub fn fit(points: &[AveragedPoint], max_order: usize) -> Result<Self> {
        Self::fit_pairs(
            points
                .iter()
                .map(|p| (p.mean_adc_voltage, p.dac_voltage))
                .collect(),
            max_order,
        )
    }

    pub fn fit_pairs(pairs: Vec<(f64, f64)>, max_order: usize) -> Result<Self> {
        if max_order == 0 {
            return Err(CalibrationError::InvalidParameters(
                "polynomial max_order must be >= 1".to_string(),
            ));
        }
        let (pairs, _) = sorted_unique(pairs)?;
        if pairs.len() < 2 {
            return Err(CalibrationError::DegenerateInterpolation {
                distinct: pairs.len(),
            });
        }
        let lo = pairs[0].0;
        let hi = pairs[pairs.len() - 1].0;
        let center = 0.5 * (lo + hi);
        let half_span = 0.5 * (hi - lo);
        let ts: Vec<f64> = pairs.iter().map(|(x, _)| (x - center) / half_span).collect();
        let ys: Vec<f64> = pairs.iter().map(|(_, y)| *y).collect();

        let top = max_order.min(pairs.len() - 1);
        let mut best: Option<(Vec<f64>, f64)> = None;
        for order in 1..=top {
            let Some(coeffs) = least_squares(&ts, &ys, order) else {
                tracing::debug!(order, "normal equations singular; skipping order");
                continue;
            };
            let sse: f64 = ts
                .iter()
                .zip(&ys)
                .map(|(&t, &y)| {
                    let r = y - horner(&coeffs, t);
                    r * r
                })
                .sum();
            tracing::debug!(order, sse, "polynomial fit");
            let better = match &best {
                None => true,
                Some((_, best_sse)) => sse < best_sse - SSE_REL_TOL * best_sse - SSE_ABS_TOL,
            };
            if better {
                best = Some((coeffs, sse));
            }
        }

        // Order 1 over >= 2 distinct abscissae is never singular
        let (coeffs, sse) = best.ok_or(CalibrationError::DegenerateInterpolation {
            distinct: pairs.len(),
        })?;
        Ok(Self {
            coeffs,
            center,
            half_span,
            sse,
            domain: (lo, hi),
        })
    }

    pub fn order(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Sum of squared residuals over the fitted points (volts²).
    pub fn sse(&self) -> f64 {
        self.sse
    }
}

impl InverseMap for PolynomialMap {
    fn ideal_voltage(&self, measured: f64) -> f64 {
        horner(&self.coeffs, (measured - self.center) / self.half_span)
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

#[inline]
fn horner(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Solve the normal equations for a polynomial of `order`; `None` when the
/// system is singular.
fn least_squares(ts: &[f64], ys: &[f64], order: usize) -> Option<Vec<f64>> {
    let n = order + 1;
    // Power sums sum(t^k) for k in 0..=2*order
    let mut pow_sums = vec![0.0f64; 2 * order + 1];
    let mut rhs = vec![0.0f64; n];
    for (&t, &y) in ts.iter().zip(ys) {
        let mut p = 1.0;
        for (k, s) in pow_sums.iter_mut().enumerate() {
            *s += p;
            if k < n {
                rhs[k] += p * y;
            }
            p *= t;
        }
    }
    let mut a: Vec<Vec<f64>> = (0..n)
        .map(|r| (0..n).map(|c| pow_sums[r + c]).collect())
        .collect();
    solve_in_place(&mut a, &mut rhs)?;
    Some(rhs)
}

/// Gaussian elimination with partial pivoting. The solution replaces `b`.
fn solve_in_place(a: &mut [Vec<f64>], b: &mut [f64]) -> Option<()> {
    let n = b.len();
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |m, v| m.max(v.abs()));
    let eps = scale * 1e-13;
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        let magnitude = a[pivot][col].abs();
        if magnitude.is_nan() || magnitude <= eps {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let f = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= f * a[col][k];
            }
            b[row] -= f * b[col];
        }
    }
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * b[k]).sum();
        b[row] = (b[row] - tail) / a[row][row];
        if !b[row].is_finite() {
            return None;
        }
    }
    Some(())
}
