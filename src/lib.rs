//! optotype - Interactive display-scale calibration tool
//!
//! Determines the pixel-to-millimeter scale of a display by rendering
//! letters at candidate physical sizes and recording which ones the
//! user can actually read.

pub mod config;
pub mod engine;
pub mod ui;

pub use config::Config;
