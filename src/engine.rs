//! Single-frame violation rule engine.
//!
//! The engine turns one frame's classified detections into a [`Verdict`]. It
//! keeps no state between calls, so frames can be evaluated concurrently with
//! a shared [`EngineConfig`].

mod bbox;
mod category;
mod config;
mod detections;
mod plate;
mod rules;
mod verdict;

pub use bbox::BoundingBox;
pub use category::Category;
pub use config::{EngineConfig, LaneSide};
pub use detections::{Detection, DetectionSet};
pub use plate::{
    NoTextRecognizer, TextRecognizer, crop_region, normalize_plate_text, resolve_plate,
};
pub use rules::{
    LaneAssessment, LightColor, assess_bus_lane, check_bus_lane, check_red_light,
    check_solid_line, closest_light_color, is_crossing, lane_distance_limit,
};
pub use verdict::{ReportDetails, Verdict, ViolationKind, ViolationReport, evaluate};
