//! Park: owns the rides and runs the per-tick dispatch
//!
//! Every ride is updated once per tick, in id order. Painting happens only
//! after the whole tick has finished.

use glam::{IVec2, IVec3};

use crate::consts::TILE_SIZE;
use crate::paint::{CondorPose, SpriteCall, paint_condor};
use crate::ride::{CondorConfig, Ride, RideId, RideType};
use crate::settings::CondorSettings;
use crate::track::TileMap;

pub struct Park {
    pub config: CondorConfig,
    pub map: TileMap,
    pub rides: Vec<Ride>,
    pub tick_count: u64,
    next_vehicle_id: u32,
}

impl Park {
    pub fn new(settings: CondorSettings) -> Self {
        Self {
            config: CondorConfig::new(settings),
            map: TileMap::new(),
            rides: Vec::new(),
            tick_count: 0,
            next_vehicle_id: 1,
        }
    }

    /// Build a Condor tower on the map and register the ride
    pub fn add_condor(
        &mut self,
        id: RideId,
        tile: IVec2,
        base_height: i32,
        sections: u32,
        section_height: i32,
    ) -> RideId {
        self.map
            .build_tower(id, tile, base_height, sections, section_height);
        let origin = IVec3::new(tile.x * TILE_SIZE, tile.y * TILE_SIZE, base_height);
        self.rides.push(Ride::new(id, RideType::Condor, origin));
        self.rides.sort_by_key(|r| r.id);
        id
    }

    pub fn ride(&self, id: RideId) -> Option<&Ride> {
        self.rides.iter().find(|r| r.id == id)
    }

    pub fn ride_mut(&mut self, id: RideId) -> Option<&mut Ride> {
        self.rides.iter_mut().find(|r| r.id == id)
    }

    /// Place car `car_index` on a ride; returns the new vehicle id
    pub fn place_vehicle(&mut self, ride: RideId, car_index: usize) -> Option<u32> {
        let rig = self.config.rig();
        let vehicle_id = self.next_vehicle_id;
        let ride = self.rides.iter_mut().find(|r| r.id == ride)?;
        ride.place_vehicle(vehicle_id, car_index, &self.map, rig);
        self.next_vehicle_id += 1;
        Some(vehicle_id)
    }

    /// Tear a ride down and remove its track
    pub fn demolish(&mut self, id: RideId) {
        if let Some(ride) = self.ride_mut(id) {
            ride.demolish();
        }
        self.rides.retain(|r| r.id != id);
        self.map.remove_ride(id);
    }

    /// Advance every ride by one tick
    pub fn tick(&mut self) {
        self.tick_count += 1;
        for ride in &mut self.rides {
            ride.update(&self.config);
        }
    }

    /// Paint pass over the published poses
    pub fn paint(&self) -> Vec<(RideId, Vec<SpriteCall>)> {
        self.rides
            .iter()
            .filter_map(|ride| {
                let pose = CondorPose::capture(ride.condor_state()?);
                let sprites = paint_condor(&pose, ride.origin, &self.config.locations);
                Some((ride.id, sprites))
            })
            .collect()
    }
}
