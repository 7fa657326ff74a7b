//! Integration module for connecting detection and OCR backends with the rule engine.
//!
//! This module provides the collaborator traits and a pipeline that runs
//! detection, classification and rule evaluation for a frame.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;

pub use crate::engine::{NoTextRecognizer, TextRecognizer};
pub use pipeline::ViolationPipeline;
