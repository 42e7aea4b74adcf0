//! Paint bridge: turns a published ride pose into sprite placements
//!
//! Runs after every ride has finished its tick. It only ever sees an
//! immutable snapshot of the pose.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{CondorLocations, CondorPhase, CondorState};

/// Image index of the tower base sprite
pub const IMAGE_TOWER_BASE: u32 = 0;
/// First image of the arm hub sprites (one per arm step in a quarter turn)
pub const IMAGE_ARM: u32 = 16;
/// First image of the car spin sprites (one block per quadrant)
pub const IMAGE_CARS: u32 = 64;

/// Pose published by the simulation for the paint pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondorPose {
    pub phase: CondorPhase,
    pub vertical_position: i32,
    pub tower_base: i32,
    /// Arm step in `[0, arm_period)`, used to place the cars
    pub arm_rotation: u32,
    /// Arm sprite in `[0, arm_sprite_count)` thanks to four-fold symmetry
    pub arm_sprite: u32,
    pub quad_sprites: [u32; ARMS],
}

impl CondorPose {
    pub fn capture(state: &CondorState) -> Self {
        Self {
            phase: state.phase,
            vertical_position: state.vertical_position,
            tower_base: state.tower.base,
            arm_rotation: state.arm_rotation,
            arm_sprite: state.arm_rotation % state.rig.arm_sprite_count.max(1),
            quad_sprites: state.quad_rotation,
        }
    }
}

/// One sprite to draw at a world position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteCall {
    pub image: u32,
    pub position: IVec3,
}

/// Emit the tower base, arm hub and the four cars for a pose
pub fn paint_condor(pose: &CondorPose, origin: IVec3, locations: &CondorLocations) -> Vec<SpriteCall> {
    let mut sprites = Vec::with_capacity(2 + ARMS);

    sprites.push(SpriteCall {
        image: IMAGE_TOWER_BASE,
        position: IVec3::new(origin.x, origin.y, pose.tower_base),
    });
    sprites.push(SpriteCall {
        image: IMAGE_ARM + pose.arm_sprite,
        position: IVec3::new(origin.x, origin.y, pose.vertical_position),
    });

    for (car, sprite) in pose.quad_sprites.iter().enumerate() {
        let offset = locations.offset(pose.arm_rotation, car);
        sprites.push(SpriteCall {
            image: IMAGE_CARS + sprite,
            position: IVec3::new(
                origin.x + offset.x,
                origin.y + offset.y,
                pose.vertical_position,
            ),
        });
    }

    sprites
}
