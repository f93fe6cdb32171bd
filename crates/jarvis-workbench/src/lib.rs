//! On-screen ruler measuring pixel distances and converting them to centimeters.
//!
//! A press anchors the start point, moves update the live point while the
//! pointer is held, and a release freezes the reading. Each new press
//! overwrites the previous start point.

pub mod overlay;

pub use overlay::{MeasuringWorkbench, Point, DEFAULT_PIXELS_TO_CM};
