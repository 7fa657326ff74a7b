//! Per-frame detections grouped by category.

use std::collections::HashMap;

use crate::engine::bbox::BoundingBox;
use crate::engine::category::Category;

/// Raw detector output for one object.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Class label as emitted by the detector
    pub label: String,
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bbox: BoundingBox,
    /// Detection confidence score
    pub confidence: f32,
}

impl Detection {
    pub fn new(
        label: impl Into<String>,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        confidence: f32,
    ) -> Self {
        Self {
            label: label.into(),
            bbox: BoundingBox::new(x1, y1, x2, y2),
            confidence,
        }
    }

    pub fn from_box(label: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label: label.into(),
            bbox,
            confidence,
        }
    }
}

/// Boxes of one frame, keyed by category, in detector emission order.
///
/// Built fresh for every frame. Cars and trucks that fail the minimum area
/// check are removed on construction and never reach a rule.
#[derive(Debug, Clone, Default)]
pub struct DetectionSet {
    boxes: HashMap<Category, Vec<BoundingBox>>,
}

impl DetectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify raw `(label, box)` pairs and drop cars and trucks whose
    /// `width * height` does not exceed `min_vehicle_area`.
    ///
    /// Labels missing from the category table are skipped.
    pub fn classify<I, L>(detections: I, min_vehicle_area: f32) -> Self
    where
        I: IntoIterator<Item = (L, BoundingBox)>,
        L: AsRef<str>,
    {
        let mut set = Self::new();
        let mut unmapped = 0usize;

        for (label, bbox) in detections {
            match Category::from_label(label.as_ref()) {
                Some(category) => set.push(category, bbox),
                None => {
                    log::trace!("dropping detection with unmapped label {:?}", label.as_ref());
                    unmapped += 1;
                }
            }
        }

        let filtered = set.retain_relevant_vehicles(min_vehicle_area);
        if unmapped > 0 || filtered > 0 {
            log::debug!(
                "classified frame: {unmapped} unmapped labels, {filtered} small vehicles filtered"
            );
        }
        set
    }

    /// Classify detector output, see [`DetectionSet::classify`].
    pub fn from_detections(detections: &[Detection], min_vehicle_area: f32) -> Self {
        Self::classify(
            detections.iter().map(|d| (d.label.as_str(), d.bbox)),
            min_vehicle_area,
        )
    }

    /// Append a box to a category. Only `classify` calls this, before the area filter runs.
    fn push(&mut self, category: Category, bbox: BoundingBox) {
        self.boxes.entry(category).or_default().push(bbox);
    }

    /// Boxes of a category in emission order; empty if none were detected.
    pub fn get(&self, category: Category) -> &[BoundingBox] {
        self.boxes.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.values().all(Vec::is_empty)
    }

    /// Total number of boxes across categories.
    pub fn len(&self) -> usize {
        self.boxes.values().map(Vec::len).sum()
    }

    /// Cars followed by trucks.
    pub fn private_vehicles(&self) -> impl Iterator<Item = &BoundingBox> {
        Category::ALL
            .into_iter()
            .filter(|category| category.is_private_vehicle())
            .flat_map(move |category| self.get(category))
    }

    /// Private vehicles followed by buses.
    pub fn all_vehicles(&self) -> impl Iterator<Item = &BoundingBox> {
        Category::ALL
            .into_iter()
            .filter(|category| category.is_vehicle())
            .flat_map(move |category| self.get(category))
    }

    /// Remove cars and trucks at or below the area threshold. Returns the number removed.
    fn retain_relevant_vehicles(&mut self, min_vehicle_area: f32) -> usize {
        let mut removed = 0;
        for (_, boxes) in self
            .boxes
            .iter_mut()
            .filter(|(category, _)| category.is_private_vehicle())
        {
            let before = boxes.len();
            boxes.retain(|bbox| bbox.area() > min_vehicle_area);
            removed += before - boxes.len();
        }
        removed
    }
}
