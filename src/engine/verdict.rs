//! Verdict assembly.

use ndarray::ArrayView3;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::engine::bbox::BoundingBox;
use crate::engine::category::Category;
use crate::engine::config::EngineConfig;
use crate::engine::detections::DetectionSet;
use crate::engine::plate::{TextRecognizer, resolve_plate};
use crate::engine::rules::{check_bus_lane, check_red_light, check_solid_line};

/// Kind of violation recorded in a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViolationKind {
    #[default]
    None,
    SolidLineOvertaking,
    RestrictedLaneViolation,
    RedLightCrossing,
}

impl ViolationKind {
    /// Human readable name reported to clients; `None` for a clean frame.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            ViolationKind::None => None,
            ViolationKind::SolidLineOvertaking => Some("Illegal Overtaking (Solid Line)"),
            ViolationKind::RestrictedLaneViolation => Some("Public Lane Violation"),
            ViolationKind::RedLightCrossing => Some("Red Light Crossing"),
        }
    }
}

/// Outcome of evaluating one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Verdict {
    pub violated: bool,
    pub kind: ViolationKind,
    /// Vehicle that committed the violation
    pub vehicle_box: Option<BoundingBox>,
    /// Plate digits, when a plate was found and read
    pub plate: Option<String>,
}

impl Verdict {
    /// A frame without violations.
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn violation(kind: ViolationKind, vehicle_box: BoundingBox, plate: Option<String>) -> Self {
        Self {
            violated: true,
            kind,
            vehicle_box: Some(vehicle_box),
            plate,
        }
    }

    /// Shape the verdict as the JSON body returned to clients.
    pub fn report(&self) -> ViolationReport {
        ViolationReport {
            violation_detected: self.violated,
            violation_type: self.kind.label(),
            details: self.vehicle_box.map(|bbox| ReportDetails {
                bbox: bbox.to_xyxy(),
                plate: self.plate.clone(),
            }),
        }
    }
}

/// Client-facing form of a [`Verdict`].
///
/// Serializes as `{"violation_detected", "type", "details": {"box", "plate"}}`,
/// with `details` an empty object for a clean frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationReport {
    pub violation_detected: bool,
    #[serde(rename = "type")]
    pub violation_type: Option<&'static str>,
    #[serde(serialize_with = "details_or_empty")]
    pub details: Option<ReportDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDetails {
    #[serde(rename = "box")]
    pub bbox: [f32; 4],
    pub plate: Option<String>,
}

fn details_or_empty<S: Serializer>(
    details: &Option<ReportDetails>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match details {
        Some(details) => details.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Evaluate the rules for one frame.
///
/// Rules run in priority order (solid line, bus lane, red light) and the first
/// hit decides the verdict; lower priority rules are not evaluated after that.
/// The plate is then resolved for the offending vehicle only.
///
/// `image` is the frame the detections came from, laid out as
/// (height, width, channels).
pub fn evaluate<R: TextRecognizer + ?Sized>(
    detections: &DetectionSet,
    image: ArrayView3<'_, u8>,
    config: &EngineConfig,
    recognizer: &R,
) -> Verdict {
    let image_height = image.dim().0 as f32;

    let hit = check_solid_line(detections, image_height, config)
        .map(|vehicle| (ViolationKind::SolidLineOvertaking, vehicle))
        .or_else(|| {
            check_bus_lane(detections, image_height, config)
                .map(|vehicle| (ViolationKind::RestrictedLaneViolation, vehicle))
        })
        .or_else(|| {
            check_red_light(detections, config)
                .map(|vehicle| (ViolationKind::RedLightCrossing, vehicle))
        });

    let Some((kind, vehicle)) = hit else {
        log::debug!("clean frame ({} detections)", detections.len());
        return Verdict::clean();
    };

    let plate = resolve_plate(
        &vehicle,
        detections.get(Category::LicensePlate),
        image,
        recognizer,
        config,
    );
    log::info!(
        "violation: {} | plate: {}",
        kind.label().unwrap_or("unknown"),
        plate.as_deref().unwrap_or("unknown")
    );

    Verdict::violation(kind, vehicle, plate)
}
