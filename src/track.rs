//! Track storage: the tile elements a ride is built from
//!
//! The Condor only asks one question of the map, once: how high is my tower?

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::ride::RideId;
use crate::sim::TowerBounds;

/// Track piece types relevant to tower rides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackType {
    TowerBase,
    TowerSection,
}

/// One track piece on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileElement {
    pub location: IVec2,
    pub ride: RideId,
    pub track: TrackType,
    pub base_height: i32,
    pub clearance_height: i32,
}

/// Geometry queries the ride controller needs from the map
pub trait TrackGeometry {
    fn tower_bounds(&self, ride: RideId, base_track: TrackType, section_track: TrackType)
    -> TowerBounds;
}

/// Flat list of tile elements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileMap {
    elements: Vec<TileElement>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: TileElement) {
        self.elements.push(element);
    }

    /// Stack a tower of `sections` pieces of `section_height` on `location`.
    /// Heights saturate at the `i32` limits; stacking stops once they do.
    pub fn build_tower(
        &mut self,
        ride: RideId,
        location: IVec2,
        base_height: i32,
        sections: u32,
        section_height: i32,
    ) {
        self.insert(TileElement {
            location,
            ride,
            track: TrackType::TowerBase,
            base_height,
            clearance_height: base_height.saturating_add(section_height),
        });
        let mut bottom = base_height;
        for _ in 0..sections {
            bottom = bottom.saturating_add(section_height);
            let clearance = bottom.saturating_add(section_height);
            self.insert(TileElement {
                location,
                ride,
                track: TrackType::TowerSection,
                base_height: bottom,
                clearance_height: clearance,
            });
            if clearance == i32::MAX || clearance == i32::MIN {
                break;
            }
        }
    }

    /// Drop every element belonging to `ride`
    pub fn remove_ride(&mut self, ride: RideId) {
        self.elements.retain(|e| e.ride != ride);
    }

    pub fn elements_for(&self, ride: RideId) -> impl Iterator<Item = &TileElement> {
        self.elements.iter().filter(move |e| e.ride == ride)
    }
}

impl TrackGeometry for TileMap {
    fn tower_bounds(
        &self,
        ride: RideId,
        base_track: TrackType,
        section_track: TrackType,
    ) -> TowerBounds {
        let base = self
            .elements_for(ride)
            .filter(|e| e.track == base_track)
            .map(|e| e.base_height)
            .min()
            .unwrap_or(0);
        let top = self
            .elements_for(ride)
            .filter(|e| e.track == section_track)
            .map(|e| e.clearance_height)
            .max()
            .unwrap_or(base);
        TowerBounds::new(base, top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tower_bounds_from_stack() {
        let mut map = TileMap::new();
        map.build_tower(RideId(1), IVec2::new(4, 4), 16, 6, 8);
        let bounds = map.tower_bounds(RideId(1), TrackType::TowerBase, TrackType::TowerSection);
        assert_eq!(bounds, TowerBounds::new(16, 72));
    }

    #[test]
    fn test_other_rides_ignored() {
        let mut map = TileMap::new();
        map.build_tower(RideId(1), IVec2::ZERO, 0, 2, 8);
        map.build_tower(RideId(2), IVec2::new(9, 9), 0, 10, 8);
        let bounds = map.tower_bounds(RideId(1), TrackType::TowerBase, TrackType::TowerSection);
        assert_eq!(bounds.top, 24);
    }

    #[test]
    fn test_tall_tower_saturates() {
        let mut map = TileMap::new();
        map.build_tower(RideId(4), IVec2::ZERO, i32::MAX - 20, u32::MAX, 8);
        let bounds = map.tower_bounds(RideId(4), TrackType::TowerBase, TrackType::TowerSection);
        assert_eq!(bounds, TowerBounds::new(i32::MAX - 20, i32::MAX));
        assert_eq!(map.elements_for(RideId(4)).count(), 3);

        map.build_tower(RideId(5), IVec2::ZERO, 0, 3, i32::MAX);
        let bounds = map.tower_bounds(RideId(5), TrackType::TowerBase, TrackType::TowerSection);
        assert_eq!(bounds, TowerBounds::new(0, i32::MAX));
    }

    #[test]
    fn test_missing_sections_give_zero_height() {
        let mut map = TileMap::new();
        map.build_tower(RideId(3), IVec2::ZERO, 40, 0, 8);
        let bounds = map.tower_bounds(RideId(3), TrackType::TowerBase, TrackType::TowerSection);
        assert_eq!(bounds, TowerBounds::new(40, 40));
        assert_eq!(bounds.height(), 0);

        map.remove_ride(RideId(3));
        let empty = map.tower_bounds(RideId(3), TrackType::TowerBase, TrackType::TowerSection);
        assert_eq!(empty, TowerBounds::new(0, 0));
    }
}
