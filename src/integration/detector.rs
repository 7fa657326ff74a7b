//! Traits for the external inference backends.

use ndarray::ArrayView3;

use crate::engine::Detection;

/// Object detection backend.
///
/// Implement this trait to connect any detection model to the rule engine.
/// Pixel buffers are laid out as (height, width, channels).
///
/// Methods take `&self` so one model can serve frames from several threads;
/// implementations that need mutable state must synchronise it themselves.
///
/// # Example
///
/// ```ignore
/// use ndarray::ArrayView3;
/// use traffic_violation_rs::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&self, image: ArrayView3<'_, u8>, confidence: f32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return labelled boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on an image and return detections scoring at least `confidence`.
    fn detect(
        &self,
        image: ArrayView3<'_, u8>,
        confidence: f32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

impl<T: DetectionSource + ?Sized> DetectionSource for &T {
    type Error = T::Error;

    fn detect(
        &self,
        image: ArrayView3<'_, u8>,
        confidence: f32,
    ) -> Result<Vec<Detection>, Self::Error> {
        (**self).detect(image, confidence)
    }
}
