#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! ADC linearization core (file- and hardware-agnostic).
//!
//! Turns repeated DAC-sweep readings of an ADC channel into a per-code
//! correction table for firmware.
//!
//! ## Pipeline
//!
//! - **Averager**: one mean reading per DAC level (`averager`)
//! - **Inverse map**: measured voltage -> ideal voltage, piecewise-linear with
//!   boundary-segment extrapolation (`inverse_map`), or an optional
//!   least-squares polynomial (`polyfit`)
//! - **Resampler**: evaluates the inverse map at every raw code, quantizes,
//!   clamps, and zeroes the noise floor (`resample`)
//! - **Emitter**: C header rendering (`emit`)
//!
//! `report` measures how well a table linearizes the capture it came from.

pub mod averager;
pub mod config;
pub mod conversions;
pub mod dataset;
pub mod emit;
pub mod error;
pub mod inverse_map;
pub mod pipeline;
pub mod polyfit;
pub mod report;
pub mod resample;

pub use averager::{AveragedPoint, average, average_samples};
pub use config::CalibrationParams;
pub use dataset::{CalibrationDataset, CalibrationSample};
pub use emit::{HeaderOptions, render_c_header};
pub use error::{CalibrationError, Result};
pub use inverse_map::{InverseMap, PiecewiseLinearMap};
pub use pipeline::{Calibration, MapperChoice, MapperSummary, generate_table, run};
pub use polyfit::PolynomialMap;
pub use report::{CorrectionReport, ErrorStats, LevelError, correction_report};
pub use resample::{CorrectionTable, quantize, resample};
