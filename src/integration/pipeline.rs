//! ViolationPipeline for combining detection with rule evaluation.

use ndarray::ArrayView3;

use crate::engine::{DetectionSet, EngineConfig, TextRecognizer, Verdict, evaluate};

use super::DetectionSource;

/// Bundles a detector and a text recognizer with the rule engine.
///
/// The pipeline holds no per-frame state: `process_frame` takes `&self`, so a
/// single pipeline can be shared across threads when its backends allow it.
pub struct ViolationPipeline<D: DetectionSource, R: TextRecognizer> {
    detector: D,
    recognizer: R,
    config: EngineConfig,
}

impl<D: DetectionSource, R: TextRecognizer> ViolationPipeline<D, R> {
    /// Create a new pipeline with the given backends and engine config.
    pub fn new(detector: D, recognizer: R, config: EngineConfig) -> Self {
        Self {
            detector,
            recognizer,
            config,
        }
    }

    /// Create a new pipeline with default engine configuration.
    pub fn with_default_config(detector: D, recognizer: R) -> Self {
        Self::new(detector, recognizer, EngineConfig::default())
    }

    /// Process a single frame and return its verdict.
    ///
    /// # Arguments
    /// * `image` - Decoded frame as (height, width, channels)
    ///
    /// # Returns
    /// The frame's `Verdict`, or the detector's error. Rules are not evaluated
    /// when detection fails.
    pub fn process_frame(&self, image: ArrayView3<'_, u8>) -> Result<Verdict, D::Error> {
        let detections = self
            .detector
            .detect(image.view(), self.config.detection_confidence)?;
        log::trace!("detector returned {} objects", detections.len());

        let set = DetectionSet::from_detections(&detections, self.config.min_vehicle_area);
        Ok(evaluate(&set, image, &self.config, &self.recognizer))
    }

    /// Get a reference to the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a reference to the underlying text recognizer.
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use ndarray::Array3;

    use super::*;
    use crate::engine::{Detection, ViolationKind};
    use crate::engine::NoTextRecognizer;

    struct MockDetector {
        detections: Vec<Detection>,
        last_confidence: Cell<f32>,
    }

    impl MockDetector {
        fn new(detections: Vec<Detection>) -> Self {
            Self {
                detections,
                last_confidence: Cell::new(0.0),
            }
        }
    }

    impl DetectionSource for MockDetector {
        type Error = std::convert::Infallible;

        fn detect(
            &self,
            _image: ArrayView3<'_, u8>,
            confidence: f32,
        ) -> Result<Vec<Detection>, Self::Error> {
            self.last_confidence.set(confidence);
            Ok(self.detections.clone())
        }
    }

    struct FailingDetector;

    impl DetectionSource for FailingDetector {
        type Error = String;

        fn detect(
            &self,
            _image: ArrayView3<'_, u8>,
            _confidence: f32,
        ) -> Result<Vec<Detection>, Self::Error> {
            Err("model not loaded".to_string())
        }
    }

    #[test]
    fn test_violation_pipeline() {
        let detector = MockDetector::new(vec![
            Detection::new("car", 100.0, 200.0, 300.0, 300.0, 0.9),
            Detection::new("stop_line", 0.0, 240.0, 400.0, 260.0, 0.8),
            Detection::new("traffic_light_red", 350.0, 50.0, 380.0, 90.0, 0.7),
        ]);
        let image = Array3::<u8>::zeros((480, 640, 3));

        let pipeline = ViolationPipeline::with_default_config(detector, NoTextRecognizer);
        let verdict = pipeline.process_frame(image.view()).unwrap();

        assert_eq!(verdict.kind, ViolationKind::RedLightCrossing);
        assert_eq!(verdict.plate, None);
        assert_eq!(pipeline.detector().last_confidence.get(), 0.25);
    }

    #[test]
    fn test_small_vehicles_never_reach_rules() {
        // 60 x 60 = 3600 is below the default area threshold
        let detector = MockDetector::new(vec![
            Detection::new("car", 100.0, 220.0, 160.0, 280.0, 0.9),
            Detection::new("stop_line", 0.0, 240.0, 400.0, 260.0, 0.8),
            Detection::new("traffic_light_red", 120.0, 50.0, 140.0, 90.0, 0.7),
        ]);
        let image = Array3::<u8>::zeros((480, 640, 3));

        let pipeline = ViolationPipeline::with_default_config(detector, NoTextRecognizer);
        assert_eq!(pipeline.process_frame(image.view()).unwrap(), Verdict::clean());

        let config = EngineConfig::default().with_min_vehicle_area(1000.0);
        let pipeline = ViolationPipeline::new(
            MockDetector::new(pipeline.detector().detections.clone()),
            NoTextRecognizer,
            config,
        );
        assert!(pipeline.process_frame(image.view()).unwrap().violated);
    }

    #[test]
    fn test_detector_error_propagates() {
        let image = Array3::<u8>::zeros((480, 640, 3));
        let pipeline = ViolationPipeline::with_default_config(FailingDetector, NoTextRecognizer);
        assert_eq!(
            pipeline.process_frame(image.view()).unwrap_err(),
            "model not loaded"
        );
    }
}
