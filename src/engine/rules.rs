//! Violation rules.
//!
//! Each rule scans the frame in detector order and returns the first vehicle
//! it catches. Rules never look at pixels; the verdict assembler decides which
//! rule runs and when.

use crate::engine::bbox::BoundingBox;
use crate::engine::category::Category;
use crate::engine::config::{EngineConfig, LaneSide};
use crate::engine::detections::DetectionSet;

/// Colour of the light associated with a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightColor {
    Red,
    Green,
}

/// Outcome of the bus lane check for a single vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneAssessment {
    /// No bus line is close enough vertically.
    NoNearbyLines,
    /// Every nearby line lies on the far side of the vehicle, or the lane
    /// side is not handled.
    OutsideLane,
    /// The vehicle has moved clear of the closest line.
    TooFarFromLine { distance: f32, limit: f32 },
    /// The vehicle is still inside the restricted lane.
    Violation { distance: f32, limit: f32 },
}

impl LaneAssessment {
    pub fn is_violation(&self) -> bool {
        matches!(self, LaneAssessment::Violation { .. })
    }
}

/// Solid line overtaking: a vehicle straddling a solid line, or sitting just
/// left of one in the opposing lane.
pub fn check_solid_line(
    detections: &DetectionSet,
    image_height: f32,
    config: &EngineConfig,
) -> Option<BoundingBox> {
    let lines = detections.get(Category::SolidLine);
    let band = image_height * config.solid_line_vertical_band;

    for vehicle in detections.all_vehicles() {
        let vehicle_cx = vehicle.center_x();
        let vehicle_cy = vehicle.center_y();
        let lateral_reach = vehicle.width() * config.solid_line_width_multiplier;

        for line in lines {
            if (line.center_y() - vehicle_cy).abs() > band {
                continue;
            }

            let ratio = vehicle.intersection_ratio(line);
            // Positive when the vehicle is left of the line
            let dist_x = line.center_x() - vehicle_cx;

            let touching = ratio > config.solid_line_overlap_threshold;
            let left_of_line = dist_x > 0.0 && dist_x < lateral_reach;

            if touching || left_of_line {
                log::debug!("solid line violation: ratio {ratio:.2}, dist {dist_x:.1}");
                return Some(*vehicle);
            }
        }
    }
    None
}

/// Bus lane: a private vehicle, not a taxi, still within reach of the lane's
/// marking.
pub fn check_bus_lane(
    detections: &DetectionSet,
    image_height: f32,
    config: &EngineConfig,
) -> Option<BoundingBox> {
    let bus_lines = detections.get(Category::BusLine);
    if bus_lines.is_empty() {
        return None;
    }
    let taxi_markers = detections.get(Category::TaxiMarker);

    for vehicle in detections.private_vehicles() {
        if taxi_markers.iter().any(|marker| vehicle.contains_center_of(marker)) {
            log::trace!("skipping taxi {:?}", vehicle.to_xyxy());
            continue;
        }

        match assess_bus_lane(vehicle, bus_lines, image_height, config) {
            LaneAssessment::Violation { distance, limit } => {
                log::debug!("bus lane violation: dist {distance:.1} < limit {limit:.1}");
                return Some(*vehicle);
            }
            assessment => {
                log::trace!("vehicle {:?}: {assessment:?}", vehicle.to_xyxy());
            }
        }
    }
    None
}

/// Check one vehicle against the bus lane markings.
pub fn assess_bus_lane(
    vehicle: &BoundingBox,
    bus_lines: &[BoundingBox],
    image_height: f32,
    config: &EngineConfig,
) -> LaneAssessment {
    let vehicle_cx = vehicle.center_x();
    let vehicle_cy = vehicle.center_y();
    let band = image_height * config.bus_lane_vertical_band;

    let mut nearby = bus_lines
        .iter()
        .filter(|line| (line.center_y() - vehicle_cy).abs() < band)
        .peekable();
    if nearby.peek().is_none() {
        return LaneAssessment::NoNearbyLines;
    }

    // Only right-hand bus lanes are modelled
    if config.lane_side == LaneSide::Left {
        return LaneAssessment::OutsideLane;
    }

    let closest = nearby
        .map(|line| vehicle_cx - line.center_x())
        .filter(|&dist| dist > 0.0)
        .min_by(f32::total_cmp);

    let Some(distance) = closest else {
        return LaneAssessment::OutsideLane;
    };

    let limit = lane_distance_limit(vehicle.y2, image_height, config);
    if distance < limit {
        LaneAssessment::Violation { distance, limit }
    } else {
        LaneAssessment::TooFarFromLine { distance, limit }
    }
}

/// Perspective-scaled bus lane limit for a vehicle whose bottom edge is at `bottom_y`.
///
/// Objects lower in the frame are nearer the camera, so the same lateral
/// offset spans more pixels.
pub fn lane_distance_limit(bottom_y: f32, image_height: f32, config: &EngineConfig) -> f32 {
    let perspective_factor = bottom_y / image_height;
    (config.max_lane_distance * perspective_factor).max(config.min_lane_distance)
}

/// Red light crossing: a vehicle past a stop line whose nearest light is red.
pub fn check_red_light(detections: &DetectionSet, config: &EngineConfig) -> Option<BoundingBox> {
    let stop_lines = detections.get(Category::StopLine);
    let red_lights = detections.get(Category::TrafficLightRed);
    let green_lights = detections.get(Category::TrafficLightGreen);

    for vehicle in detections.all_vehicles() {
        for line in stop_lines {
            if !is_crossing(vehicle, line) {
                continue;
            }
            let color = closest_light_color(vehicle, red_lights, green_lights, config);
            if color == Some(LightColor::Red) {
                log::debug!("red light violation at stop line {:?}", line.to_xyxy());
                return Some(*vehicle);
            }
        }
    }
    None
}

/// Vehicle center inside the stop line, or its bottom edge above the line's bottom edge.
///
/// Single-frame positional heuristic; a vehicle parked beyond the line counts too.
pub fn is_crossing(vehicle: &BoundingBox, stop_line: &BoundingBox) -> bool {
    stop_line.contains_point_strict(vehicle.center()) || vehicle.y2 < stop_line.y2
}

/// Colour of the light horizontally closest to the vehicle.
///
/// Red lights are checked first, so a red light wins an exact tie. Returns
/// `None` when there are no lights or the closest is at or beyond
/// `light_association_distance`.
pub fn closest_light_color(
    vehicle: &BoundingBox,
    red_lights: &[BoundingBox],
    green_lights: &[BoundingBox],
    config: &EngineConfig,
) -> Option<LightColor> {
    let vehicle_cx = vehicle.center_x();
    let candidates = red_lights
        .iter()
        .map(|light| (light, LightColor::Red))
        .chain(green_lights.iter().map(|light| (light, LightColor::Green)));

    let mut closest: Option<(f32, LightColor)> = None;
    for (light, color) in candidates {
        let distance = (vehicle_cx - light.center_x()).abs();
        if closest.is_none_or(|(best, _)| distance < best) {
            closest = Some((distance, color));
        }
    }

    closest
        .filter(|&(distance, _)| distance < config.light_association_distance)
        .map(|(_, color)| color)
}
