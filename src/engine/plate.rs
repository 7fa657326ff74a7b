//! License plate association and text extraction.

use ndarray::{ArrayView3, s};

use crate::engine::bbox::BoundingBox;
use crate::engine::config::EngineConfig;

/// Text recognition (OCR) backend used to read license plates.
///
/// Errors are never propagated past [`resolve_plate`]; they are logged and
/// the plate is reported as unresolved.
pub trait TextRecognizer {
    /// Error type for recognition failures.
    type Error: std::fmt::Display;

    /// Recognize text in a cropped pixel region, returning fragments in reading order.
    fn recognize_text(&self, region: ArrayView3<'_, u8>) -> Result<Vec<String>, Self::Error>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    type Error = T::Error;

    fn recognize_text(&self, region: ArrayView3<'_, u8>) -> Result<Vec<String>, Self::Error> {
        (**self).recognize_text(region)
    }
}

/// Recognizer for deployments without OCR; every plate stays unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextRecognizer;

impl TextRecognizer for NoTextRecognizer {
    type Error = std::convert::Infallible;

    fn recognize_text(&self, _region: ArrayView3<'_, u8>) -> Result<Vec<String>, Self::Error> {
        Ok(Vec::new())
    }
}

/// Find the plate belonging to `vehicle` and read its digits.
///
/// The first plate whose center lies strictly inside the vehicle box is the
/// only one tried; a bad read on it does not fall through to later plates.
/// Returns `None` when no plate matches, the crop is empty, the recognizer
/// fails, or the digit count is outside the configured range.
pub fn resolve_plate<R: TextRecognizer + ?Sized>(
    vehicle: &BoundingBox,
    plates: &[BoundingBox],
    image: ArrayView3<'_, u8>,
    recognizer: &R,
    config: &EngineConfig,
) -> Option<String> {
    let plate = plates.iter().find(|plate| vehicle.contains_center_of(plate))?;

    let Some(region) = crop_region(image, plate) else {
        log::debug!("plate box {:?} has no pixels inside the image", plate.to_xyxy());
        return None;
    };

    let fragments = match recognizer.recognize_text(region) {
        Ok(fragments) => fragments,
        Err(err) => {
            log::warn!("text recognition failed for plate {:?}: {err}", plate.to_xyxy());
            return None;
        }
    };

    let text = normalize_plate_text(&fragments, config.plate_min_digits, config.plate_max_digits);
    if text.is_none() {
        log::debug!("rejected plate reading {fragments:?}");
    }
    text
}

/// Join OCR fragments and keep only ASCII digits. Accepted when the digit
/// count is within `min_digits..=max_digits`.
pub fn normalize_plate_text<S: AsRef<str>>(
    fragments: &[S],
    min_digits: usize,
    max_digits: usize,
) -> Option<String> {
    let digits: String = fragments
        .iter()
        .flat_map(|fragment| fragment.as_ref().chars())
        .filter(char::is_ascii_digit)
        .collect();

    (min_digits..=max_digits)
        .contains(&digits.len())
        .then_some(digits)
}

/// Crop the pixels under `bbox`.
///
/// Coordinates are truncated toward zero and clamped to the image. Returns
/// `None` when nothing is left.
pub fn crop_region<'a>(image: ArrayView3<'a, u8>, bbox: &BoundingBox) -> Option<ArrayView3<'a, u8>> {
    let (height, width, _) = image.dim();
    let clamp = |value: f32, limit: usize| (value as i64).clamp(0, limit as i64) as usize;

    let x1 = clamp(bbox.x1, width);
    let y1 = clamp(bbox.y1, height);
    let x2 = clamp(bbox.x2, width);
    let y2 = clamp(bbox.y2, height);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(image.slice_move(s![y1..y2, x1..x2, ..]))
}
