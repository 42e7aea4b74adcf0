//! Vehicle entities attached to a ride
//!
//! Only the parts the Condor controller touches live here: status, position
//! and the sprite indices the paint pass reads back.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::ride::RideId;

/// Generic vehicle status, owned by the station logic while the ride waits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[default]
    WaitingForPassengers,
    WaitingToDepart,
    Departing,
    /// Dispatched from the station; the ride controller takes over
    Travelling,
    /// Handed back to the station after a completed cycle
    Arriving,
    UnloadingPassengers,
}

/// A single car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub ride: RideId,
    /// Position on the rig, 0 is the anchor car
    pub car_index: usize,
    pub status: VehicleStatus,
    pub position: IVec3,
    /// Spin sprite, including the quadrant's sprite block
    pub spin_sprite: u32,
    /// Arm step the car was last placed at
    pub arm_sprite: u32,
}

impl Vehicle {
    pub fn new(id: u32, ride: RideId, car_index: usize, position: IVec3) -> Self {
        Self {
            id,
            ride,
            car_index,
            status: VehicleStatus::WaitingForPassengers,
            position,
            spin_sprite: 0,
            arm_sprite: 0,
        }
    }

    #[inline]
    pub fn move_to(&mut self, position: IVec3) {
        self.position = position;
    }

    pub fn set_status(&mut self, status: VehicleStatus) {
        if self.status != status {
            log::trace!("Vehicle {} {:?} -> {:?}", self.id, self.status, status);
            self.status = status;
        }
    }
}
