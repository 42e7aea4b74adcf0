//! Vehicle sync: pushes the ride pose onto its cars
//!
//! While the rig is moving the cars are puppets of the ride state. While it
//! waits they belong to the station logic, and the only thing read from them
//! is the anchor car's departure.

use glam::IVec3;

use super::locations::CondorLocations;
use super::state::CondorState;
use crate::entity::{Vehicle, VehicleStatus};

/// Car index whose placement allocates the ride state
pub const ANCHOR_CAR: usize = 0;

/// True once the station logic has dispatched the anchor car
pub fn anchor_departed(vehicles: &[Vehicle]) -> bool {
    vehicles
        .iter()
        .find(|v| v.car_index == ANCHOR_CAR)
        .is_some_and(|v| v.status == VehicleStatus::Travelling)
}

/// World position of `car` for the current pose
pub fn car_position(
    state: &CondorState,
    locations: &CondorLocations,
    origin: IVec3,
    car: usize,
) -> IVec3 {
    let offset = locations.offset(state.arm_rotation, car);
    IVec3::new(
        origin.x + offset.x,
        origin.y + offset.y,
        state.vertical_position,
    )
}

/// Copy height, arm step and spin onto every car while the rig is in motion
pub fn sync_vehicles(
    state: &CondorState,
    vehicles: &mut [Vehicle],
    locations: &CondorLocations,
    origin: IVec3,
) {
    if !state.is_in_motion() {
        return;
    }
    place_cars(state, vehicles, locations, origin);
}

/// Park the cars at the base and hand them back to the station logic
pub fn release_vehicles(
    state: &CondorState,
    vehicles: &mut [Vehicle],
    locations: &CondorLocations,
    origin: IVec3,
) {
    place_cars(state, vehicles, locations, origin);
    for vehicle in vehicles.iter_mut() {
        vehicle.set_status(VehicleStatus::Arriving);
    }
}

fn place_cars(
    state: &CondorState,
    vehicles: &mut [Vehicle],
    locations: &CondorLocations,
    origin: IVec3,
) {
    for vehicle in vehicles.iter_mut() {
        let car = vehicle.car_index % state.quad_rotation.len();
        vehicle.move_to(car_position(state, locations, origin, car));
        vehicle.spin_sprite = state.quad_rotation[car];
        vehicle.arm_sprite = state.arm_rotation;
    }
}
