//! Car locations around the tower for every arm step
//!
//! The four cars hang at the ends of the arm, a quarter turn apart. The
//! table is built once from the settings and shared read-only by the
//! vehicle sync and the paint pass.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::ARMS;

/// Offsets from the tower centre, indexed by arm step then car index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondorLocations {
    offsets: Vec<[IVec2; ARMS]>,
}

impl CondorLocations {
    pub fn build(arm_period: u32, arm_radius: f32) -> Self {
        let period = arm_period.max(1);
        let offsets = (0..period)
            .map(|step| {
                let base = std::f32::consts::TAU * step as f32 / period as f32;
                std::array::from_fn(|car| {
                    let theta = base + car as f32 * std::f32::consts::FRAC_PI_2;
                    (Vec2::from_angle(theta) * arm_radius).round().as_ivec2()
                })
            })
            .collect();
        Self { offsets }
    }

    /// Arm steps covered by the table
    #[inline]
    pub fn period(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Offset of `car` when the arm sits at `step` (wrapped by the period)
    pub fn offset(&self, step: u32, car: usize) -> IVec2 {
        let row = &self.offsets[(step % self.period()) as usize];
        row[car % ARMS]
    }
}
