//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which side of the bus lane markings the restricted lane lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneSide {
    /// Not modelled; the bus lane rule never fires.
    Left,
    #[default]
    Right,
}

/// Thresholds consumed by the rule engine.
///
/// Built once at startup and shared read-only across frames. Every field has a
/// default matching the deployed camera setup, so a TOML file only needs to
/// name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub lane_side: LaneSide,
    /// Cars and trucks with `width * height` at or below this are ignored (px²).
    pub min_vehicle_area: f32,
    /// Bus lane distance limit for a vehicle at the bottom edge of the frame (px).
    pub max_lane_distance: f32,
    /// Floor for the perspective-scaled bus lane limit (px).
    pub min_lane_distance: f32,
    /// Lights at or beyond this horizontal distance are not associated (px).
    pub light_association_distance: f32,
    /// Line coverage above which a vehicle is straddling a solid line.
    pub solid_line_overlap_threshold: f32,
    /// Lateral reach, in vehicle widths, of the opposing lane left of a solid line.
    pub solid_line_width_multiplier: f32,
    /// Max vertical center offset for a solid line to be considered, as a fraction of image height.
    pub solid_line_vertical_band: f32,
    /// Max vertical center offset for a bus line to be considered, as a fraction of image height.
    pub bus_lane_vertical_band: f32,
    pub plate_min_digits: usize,
    pub plate_max_digits: usize,
    /// Confidence threshold handed to the detector.
    pub detection_confidence: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lane_side: LaneSide::Right,
            min_vehicle_area: 4000.0,
            max_lane_distance: 500.0,
            min_lane_distance: 50.0,
            light_association_distance: 500.0,
            solid_line_overlap_threshold: 0.15,
            solid_line_width_multiplier: 2.5,
            solid_line_vertical_band: 0.2,
            bus_lane_vertical_band: 0.3,
            plate_min_digits: 5,
            plate_max_digits: 8,
            detection_confidence: 0.25,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("min_vehicle_area", self.min_vehicle_area),
            ("max_lane_distance", self.max_lane_distance),
            ("min_lane_distance", self.min_lane_distance),
            ("light_association_distance", self.light_association_distance),
            ("solid_line_width_multiplier", self.solid_line_width_multiplier),
            ("solid_line_vertical_band", self.solid_line_vertical_band),
            ("bus_lane_vertical_band", self.bus_lane_vertical_band),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let fractions = [
            ("solid_line_overlap_threshold", self.solid_line_overlap_threshold),
            ("detection_confidence", self.detection_confidence),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.plate_min_digits > self.plate_max_digits {
            return Err(ConfigError::Invalid(format!(
                "plate_min_digits ({}) exceeds plate_max_digits ({})",
                self.plate_min_digits, self.plate_max_digits
            )));
        }
        Ok(())
    }

    pub fn with_lane_side(mut self, lane_side: LaneSide) -> Self {
        self.lane_side = lane_side;
        self
    }

    pub fn with_min_vehicle_area(mut self, area: f32) -> Self {
        self.min_vehicle_area = area;
        self
    }

    pub fn with_max_lane_distance(mut self, distance: f32) -> Self {
        self.max_lane_distance = distance;
        self
    }

    pub fn with_light_association_distance(mut self, distance: f32) -> Self {
        self.light_association_distance = distance;
        self
    }

    pub fn with_detection_confidence(mut self, confidence: f32) -> Self {
        self.detection_confidence = confidence;
        self
    }
}
