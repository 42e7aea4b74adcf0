//! Condor ride state and core simulation types
//!
//! Everything the controller needs to resume a ride mid-cycle lives here, so
//! a persistence layer can read the fields straight off the serde derive.

use serde::{Deserialize, Serialize};

use super::stepper::PeriodicStepper;
use super::timing::StepKind;
use crate::consts::*;
use crate::settings::CondorSettings;

/// Current phase of the ride cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CondorPhase {
    /// Parked at the base, cars belong to the station logic
    #[default]
    Waiting,
    /// Rising up the tower
    Climbing,
    /// Parked at the top, cars still spinning
    SpinningAtTop,
    /// Descending, then winding the rig back home
    Falling,
}

/// Vertical extent of the tower, fixed when the ride's first car is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TowerBounds {
    pub base: i32,
    pub top: i32,
}

impl TowerBounds {
    /// Bounds with the top clamped so it never sits below the base
    pub fn new(base: i32, top: i32) -> Self {
        Self {
            base,
            top: top.max(base),
        }
    }

    #[inline]
    pub fn height(&self) -> i64 {
        i64::from(self.top) - i64::from(self.base)
    }
}

/// Sprite layout and dwell time of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigSpec {
    /// Arm sprites per quarter turn (the arm has four-fold symmetry)
    pub arm_sprite_count: u32,
    /// Spin sprites per car
    pub car_sprite_count: u32,
    /// Ticks spent spinning at the top
    pub spinning_top_time: u32,
}

impl Default for RigSpec {
    fn default() -> Self {
        Self {
            arm_sprite_count: ARM_SPRITE_COUNT,
            car_sprite_count: CAR_SPRITE_COUNT,
            spinning_top_time: SPINNING_TOP_TIME,
        }
    }
}

impl RigSpec {
    pub fn from_settings(settings: &CondorSettings) -> Self {
        Self {
            arm_sprite_count: settings.arm_sprite_count,
            car_sprite_count: settings.car_sprite_count,
            spinning_top_time: settings.spinning_top_time,
        }
    }

    /// Arm steps in one full revolution
    #[inline]
    pub fn arm_period(&self) -> u32 {
        self.arm_sprite_count.saturating_mul(ARMS as u32).max(1)
    }

    /// Home spin layout: quadrant `i` starts its own sprite block
    pub fn home_quads(&self, offset: u32) -> [u32; ARMS] {
        std::array::from_fn(|i| {
            (i as u32)
                .saturating_mul(self.car_sprite_count)
                .saturating_add(offset)
        })
    }
}

/// Per-ride simulation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondorState {
    /// Current phase
    pub phase: CondorPhase,
    /// Height of the car assembly, always within `tower`
    pub vertical_position: i32,
    /// Tower extent
    pub tower: TowerBounds,
    /// Sprite layout and dwell time
    pub rig: RigSpec,
    /// Arm step in `[0, arm_period)`
    pub arm_rotation: u32,
    /// Spin sprite per quadrant, each wrapping inside its own sprite block
    pub quad_rotation: [u32; ARMS],
    /// Quadrant 0 spin captured at departure, restored before Waiting
    pub initial_quad_rotation: u32,
    /// Arm rotation timer
    pub tower_rotation: PeriodicStepper,
    /// Car spin timer
    pub vehicle_rotation: PeriodicStepper,
    /// Rise/fall timer
    pub rise: PeriodicStepper,
    /// Dwell ticks spent at the top
    pub spinning_top_counter: u32,
}

impl CondorState {
    /// Create a ride parked at the base with every angle at home
    pub fn new(tower: TowerBounds, rig: RigSpec) -> Self {
        let tower = TowerBounds::new(tower.base, tower.top);
        Self {
            phase: CondorPhase::Waiting,
            vertical_position: tower.base,
            tower,
            rig,
            arm_rotation: 0,
            quad_rotation: rig.home_quads(0),
            initial_quad_rotation: 0,
            tower_rotation: PeriodicStepper::new(StepKind::TowerRotation),
            vehicle_rotation: PeriodicStepper::new(StepKind::VehicleRotation),
            rise: PeriodicStepper::new(StepKind::Rise),
            spinning_top_counter: 0,
        }
    }

    /// Fraction of the way up the tower, `0.0` for a zero-height tower
    pub fn progress(&self) -> f32 {
        let height = self.tower.height();
        if height <= 0 {
            return 0.0;
        }
        let climbed = i64::from(self.vertical_position) - i64::from(self.tower.base);
        (climbed as f64 / height as f64).clamp(0.0, 1.0) as f32
    }

    #[inline]
    pub fn arm_period(&self) -> u32 {
        self.rig.arm_period()
    }

    /// True while the controller (not the station logic) drives the cars
    pub fn is_in_motion(&self) -> bool {
        matches!(
            self.phase,
            CondorPhase::Climbing | CondorPhase::SpinningAtTop | CondorPhase::Falling
        )
    }

    #[inline]
    pub fn arm_homed(&self) -> bool {
        self.arm_rotation % self.arm_period() == 0
    }

    #[inline]
    pub fn quads_homed(&self) -> bool {
        self.quad_rotation[0] == self.initial_quad_rotation
    }

    /// Arm and spin back at their departure reference
    pub fn is_homed(&self) -> bool {
        self.arm_homed() && self.quads_homed()
    }

    /// Advance the arm by one sprite step
    pub fn step_arm(&mut self) {
        let period = self.arm_period();
        self.arm_rotation = (self.arm_rotation % period + 1) % period;
    }

    /// Advance every car by one spin sprite, each inside its own block
    pub fn step_quads(&mut self) {
        let count = self.rig.car_sprite_count.max(1);
        for (i, quad) in self.quad_rotation.iter_mut().enumerate() {
            let block = (i as u32).saturating_mul(count);
            let spin = quad.saturating_sub(block) % count;
            *quad = block.saturating_add((spin + 1) % count);
        }
    }

    /// Capture the spin reference and start climbing
    pub fn begin_cycle(&mut self) {
        self.initial_quad_rotation = self.quad_rotation[0];
        self.spinning_top_counter = 0;
        self.phase = CondorPhase::Climbing;
        log::debug!(
            "Condor departing: tower {}..{}, quad home {}",
            self.tower.base,
            self.tower.top,
            self.initial_quad_rotation
        );
    }

    /// Return the rig to its home pose without losing tower bounds
    pub fn reset(&mut self) {
        self.phase = CondorPhase::Waiting;
        self.vertical_position = self.tower.base;
        self.arm_rotation = 0;
        self.quad_rotation = self.rig.home_quads(0);
        self.initial_quad_rotation = 0;
        self.tower_rotation.reset();
        self.vehicle_rotation.reset();
        self.rise.reset();
        self.spinning_top_counter = 0;
        log::debug!("Condor state reset to home pose");
    }
}
