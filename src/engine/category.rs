use serde::{Deserialize, Serialize};

/// Semantic category of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Car,
    Truck,
    /// Never area-filtered and always exempt from the bus lane rule
    Bus,
    SolidLine,
    BusLine,
    StopLine,
    TrafficLightRed,
    TrafficLightGreen,
    /// Roof sign marking a vehicle as a taxi
    TaxiMarker,
    LicensePlate,
}

/// Exact detector label spellings. Synonyms map to the same category.
const LABEL_TABLE: &[(&str, Category)] = &[
    ("car", Category::Car),
    ("truck", Category::Truck),
    ("bus", Category::Bus),
    ("solid_line", Category::SolidLine),
    ("bus_line", Category::BusLine),
    ("bus line", Category::BusLine),
    ("stop_line", Category::StopLine),
    ("traffic_light_red", Category::TrafficLightRed),
    ("traffic_light_green", Category::TrafficLightGreen),
    ("taxi_hat", Category::TaxiMarker),
    ("license_plate", Category::LicensePlate),
    ("license plate", Category::LicensePlate),
];

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Car,
        Category::Truck,
        Category::Bus,
        Category::SolidLine,
        Category::BusLine,
        Category::StopLine,
        Category::TrafficLightRed,
        Category::TrafficLightGreen,
        Category::TaxiMarker,
        Category::LicensePlate,
    ];

    /// Look up a raw detector label. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        LABEL_TABLE
            .iter()
            .find(|(name, _)| *name == label)
            .map(|&(_, category)| category)
    }

    /// Cars and trucks, which are subject to the area filter and the bus lane rule.
    #[inline]
    pub fn is_private_vehicle(self) -> bool {
        matches!(self, Category::Car | Category::Truck)
    }

    #[inline]
    pub fn is_vehicle(self) -> bool {
        self.is_private_vehicle() || self == Category::Bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_share_category() {
        assert_eq!(Category::from_label("bus_line"), Some(Category::BusLine));
        assert_eq!(Category::from_label("bus line"), Some(Category::BusLine));
        assert_eq!(
            Category::from_label("license_plate"),
            Some(Category::LicensePlate)
        );
        assert_eq!(
            Category::from_label("license plate"),
            Some(Category::LicensePlate)
        );
    }

    #[test]
    fn test_unknown_labels() {
        assert_eq!(Category::from_label("pedestrian"), None);
        assert_eq!(Category::from_label("Car"), None);
        assert_eq!(Category::from_label(" car"), None);
        assert_eq!(Category::from_label(""), None);
    }

    #[test]
    fn test_every_category_has_a_label() {
        for category in Category::ALL {
            assert!(
                LABEL_TABLE.iter().any(|&(_, c)| c == category),
                "{category:?} has no label"
            );
        }
    }

    #[test]
    fn test_vehicle_groups() {
        assert!(Category::Car.is_private_vehicle());
        assert!(Category::Truck.is_private_vehicle());
        assert!(!Category::Bus.is_private_vehicle());
        assert!(Category::Bus.is_vehicle());
        assert!(!Category::TaxiMarker.is_vehicle());
    }
}
