//! Traffic violation detection for single camera frames.
//!
//! Detections from an object detector (vehicles, lane markings, stop lines,
//! traffic lights, license plates) are grouped by category and checked against
//! three rules in priority order: solid line overtaking, bus lane misuse and
//! red light crossing. The first rule that fires yields the [`Verdict`],
//! together with the offending vehicle and, when an OCR backend can read it,
//! its license plate.

pub mod engine;
pub mod error;
pub mod integration;

pub use engine::{
    BoundingBox, Category, Detection, DetectionSet, EngineConfig, LaneSide, Verdict,
    ViolationKind, ViolationReport, evaluate,
};
pub use error::ConfigError;
pub use integration::{
    DetectionBuilder, DetectionSource, NoTextRecognizer, TextRecognizer, ViolationPipeline,
};
