//! Calibration engine: sequence generation, measurement tracking,
//! scale conversion, and input dispatch

pub mod dispatcher;
pub mod scale;
pub mod sequence;
pub mod tracker;

pub use dispatcher::{InputDispatcher, InputSource, KeyInput};
pub use scale::{ScaleModel, DEFAULT_SCALE_FACTOR};
pub use sequence::{
    generate, generate_with_alphabet, MeasureState, SizeList, TestItem, TestSequence, ALPHABET,
};
pub use tracker::{Classification, MeasurementTracker, ReclassifyPolicy};

use thiserror::Error;

/// Errors surfaced by the calibration engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Selection index outside the test sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A sequence cannot be generated from these parameters.
    #[error("cannot generate a sequence of {rows} row(s) over {sizes} size(s)")]
    InvalidSequenceParams { rows: usize, sizes: usize },
    /// Size list parameters do not describe a descending positive range.
    #[error("invalid size range: max {max_mm} mm, min {min_mm} mm, step {step_mm} mm")]
    InvalidSizeRange {
        max_mm: f64,
        min_mm: f64,
        step_mm: f64,
    },
}
