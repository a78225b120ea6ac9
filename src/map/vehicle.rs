use crate::num::{Number, Vector2};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Surveyed vehicle position at one image, taken as ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePosition {
    pub image: String,
    pub latitude: Number,
    pub longitude: Number,
    /// UTM easting in metres.
    pub x: Number,
    /// UTM northing in metres.
    pub y: Number,
}

impl VehiclePosition {
    #[inline]
    pub fn planar(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

/// Vehicle positions indexed by image identifier.
#[derive(Debug, Clone, Default)]
pub struct VehicleTrack {
    positions: HashMap<String, VehiclePosition>,
}

impl VehicleTrack {
    /// Builds the index; the first row wins when an image repeats.
    pub fn new(rows: impl IntoIterator<Item = VehiclePosition>) -> Self {
        let mut positions = HashMap::new();
        for row in rows {
            positions.entry(row.image.clone()).or_insert(row);
        }
        Self { positions }
    }

    #[inline]
    pub fn get(&self, image: &str) -> Option<&VehiclePosition> {
        self.positions.get(image)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
