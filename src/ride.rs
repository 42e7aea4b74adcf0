//! Ride records, ride-type descriptors and the per-tick update entry point
//!
//! A ride owns its simulation state as a tagged variant. Rides that have no
//! state yet (no car placed, or already torn down) are skipped silently.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::entity::{Vehicle, VehicleStatus};
use crate::settings::CondorSettings;
use crate::sim::{
    self, ANCHOR_CAR, CondorLocations, CondorState, RigSpec, TickOutcome, TimingModel,
};
use crate::track::{TrackGeometry, TrackType};

/// Ride identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RideId(pub u16);

/// Immutable per-startup ride configuration: settings plus derived tables
#[derive(Debug, Clone)]
pub struct CondorConfig {
    pub settings: CondorSettings,
    pub timing: TimingModel,
    pub locations: CondorLocations,
}

impl CondorConfig {
    pub fn new(settings: CondorSettings) -> Self {
        let rig = RigSpec::from_settings(&settings);
        let timing = TimingModel::new(&settings);
        let locations = CondorLocations::build(rig.arm_period(), settings.arm_radius);
        Self {
            settings,
            timing,
            locations,
        }
    }

    #[inline]
    pub fn rig(&self) -> RigSpec {
        RigSpec::from_settings(&self.settings)
    }
}

impl Default for CondorConfig {
    fn default() -> Self {
        Self::new(CondorSettings::default())
    }
}

/// Per-tick update callback registered for a ride type
pub type RideUpdateFn = fn(&mut Ride, &CondorConfig);

/// Static description of a ride type
#[derive(Debug)]
pub struct RideTypeDescriptor {
    pub name: &'static str,
    /// Track piece the tower stands on
    pub tower_base_track: TrackType,
    /// Track piece stacked to build the tower
    pub tower_section_track: TrackType,
    /// Called once per ride per tick
    pub update: RideUpdateFn,
}

static CONDOR_DESCRIPTOR: RideTypeDescriptor = RideTypeDescriptor {
    name: "Condor",
    tower_base_track: TrackType::TowerBase,
    tower_section_track: TrackType::TowerSection,
    update: condor_update,
};

/// Ride types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideType {
    Condor,
}

impl RideType {
    pub fn descriptor(&self) -> &'static RideTypeDescriptor {
        match self {
            RideType::Condor => &CONDOR_DESCRIPTOR,
        }
    }
}

/// Ride-type specific simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RideData {
    Condor(CondorState),
}

/// A ride in the park
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: RideId,
    pub ride_type: RideType,
    /// Tower centre in world units
    pub origin: IVec3,
    pub vehicles: Vec<Vehicle>,
    /// Allocated when the anchor car is placed
    pub data: Option<RideData>,
}

impl Ride {
    pub fn new(id: RideId, ride_type: RideType, origin: IVec3) -> Self {
        Self {
            id,
            ride_type,
            origin,
            vehicles: Vec::new(),
            data: None,
        }
    }

    pub fn condor_state(&self) -> Option<&CondorState> {
        match &self.data {
            Some(RideData::Condor(state)) => Some(state),
            None => None,
        }
    }

    pub fn condor_state_mut(&mut self) -> Option<&mut CondorState> {
        match &mut self.data {
            Some(RideData::Condor(state)) => Some(state),
            None => None,
        }
    }

    /// Attach a car. Placing the anchor car allocates the simulation state,
    /// querying the tower bounds exactly once.
    pub fn place_vehicle<G: TrackGeometry + ?Sized>(
        &mut self,
        vehicle_id: u32,
        car_index: usize,
        geometry: &G,
        rig: RigSpec,
    ) -> &Vehicle {
        if car_index == ANCHOR_CAR && self.data.is_none() {
            let descriptor = self.ride_type.descriptor();
            let bounds = geometry.tower_bounds(
                self.id,
                descriptor.tower_base_track,
                descriptor.tower_section_track,
            );
            log::debug!(
                "Ride {:?}: allocating {} state, tower {}..{}",
                self.id,
                descriptor.name,
                bounds.base,
                bounds.top
            );
            self.data = Some(match self.ride_type {
                RideType::Condor => RideData::Condor(CondorState::new(bounds, rig)),
            });
        }

        let z = self
            .condor_state()
            .map_or(self.origin.z, |s| s.vertical_position);
        let position = IVec3::new(self.origin.x, self.origin.y, z);
        self.vehicles
            .push(Vehicle::new(vehicle_id, self.id, car_index, position));
        let index = self.vehicles.len() - 1;
        &self.vehicles[index]
    }

    /// Restart cleanly after an abnormal stop, keeping the tower bounds
    pub fn reset_simulation(&mut self, locations: &CondorLocations) {
        let Some(RideData::Condor(state)) = &mut self.data else {
            return;
        };
        state.reset();
        sim::release_vehicles(state, &mut self.vehicles, locations, self.origin);
        for vehicle in &mut self.vehicles {
            vehicle.set_status(VehicleStatus::WaitingForPassengers);
        }
        log::info!("Ride {:?} reset", self.id);
    }

    /// Tear the simulation state down and drop the cars
    pub fn demolish(&mut self) {
        self.data = None;
        self.vehicles.clear();
        log::info!("Ride {:?} demolished", self.id);
    }

    /// Run this ride's registered per-tick update
    pub fn update(&mut self, config: &CondorConfig) {
        (self.ride_type.descriptor().update)(self, config);
    }
}

/// Condor per-tick update
pub fn condor_update(ride: &mut Ride, config: &CondorConfig) {
    let Ride {
        id,
        origin,
        vehicles,
        data,
        ..
    } = ride;
    let Some(RideData::Condor(state)) = data else {
        return;
    };

    if state.phase == sim::CondorPhase::Waiting && sim::anchor_departed(vehicles) {
        state.begin_cycle();
    }

    let outcome = sim::tick(state, &config.timing);
    sim::sync_vehicles(state, vehicles, &config.locations, *origin);

    if outcome == TickOutcome::Returned {
        sim::release_vehicles(state, vehicles, &config.locations, *origin);
        log::debug!("Ride {id:?}: cycle complete");
    }
}
