//! Frame timing for the rig's three discrete motions
//!
//! Every motion (arm rotation, car spin, rise/fall) moves in whole sprite or
//! height steps. How many ticks pass between steps depends on how far up the
//! tower the cars are, expressed as a progress fraction in `[0, 1]`.
//!
//! Speeds come from a piecewise cubic through four fixed control points.
//! Control points outside `[0, 1]` only shape the tangents at the ends; the
//! progress is always clamped before the curve is evaluated.

use serde::{Deserialize, Serialize};

use crate::settings::CondorSettings;

/// The three independently timed motions of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// One arm sprite step
    TowerRotation,
    /// One car spin sprite step
    VehicleRotation,
    /// One height unit up or down
    Rise,
}

/// Source of frame intervals (ticks per discrete step)
pub trait FrameTimer {
    fn frame_time(&self, kind: StepKind, progress: f32) -> u32;
}

/// Four `(progress, speed)` control points, sorted by progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedCurve {
    points: [(f64, f64); 4],
}

impl SpeedCurve {
    pub fn new(points: [(f64, f64); 4]) -> Self {
        Self { points }
    }

    /// Slowest at both ends, fastest halfway up
    pub fn peaked(min: f64, max: f64) -> Self {
        Self::new([(-1.0, min), (0.0, min), (0.5, max), (1.0, min)])
    }

    /// Slowest at the bottom, accelerating all the way to the top
    pub fn rising(min: f64, max: f64) -> Self {
        Self::new([(-1.0, min), (0.0, min), (1.0, max), (2.0, max)])
    }

    /// Catmull-Rom style tangent at control point `i`, one-sided at the ends
    fn tangent(&self, i: usize) -> f64 {
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(self.points.len() - 1);
        let (x0, y0) = self.points[lo];
        let (x1, y1) = self.points[hi];
        (y1 - y0) / (x1 - x0)
    }

    /// Evaluate the curve at `progress`, clamped into `[0, 1]`
    pub fn sample(&self, progress: f32) -> f64 {
        let x = clamp_progress(progress);
        let seg = (0..self.points.len() - 1)
            .rev()
            .find(|&i| self.points[i].0 <= x)
            .unwrap_or(0);

        let (x0, y0) = self.points[seg];
        let (x1, y1) = self.points[seg + 1];
        let h = x1 - x0;
        let t = ((x - x0) / h).clamp(0.0, 1.0);
        let m0 = self.tangent(seg) * h;
        let m1 = self.tangent(seg + 1) * h;

        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * y0 + h10 * m0 + h01 * y1 + h11 * m1
    }
}

/// Clamp a progress fraction into `[0, 1]`; NaN counts as the bottom
#[inline]
pub fn clamp_progress(progress: f32) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        f64::from(progress.clamp(0.0, 1.0))
    }
}

/// Round a tick count and keep it at least one tick
#[inline]
fn to_ticks(ticks: f64) -> u32 {
    ticks.round().max(1.0) as u32
}

/// Curve-driven frame timing built from the ride settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingModel {
    tower: SpeedCurve,
    vehicle: SpeedCurve,
    rise: SpeedCurve,
    arm_sprite_count: f64,
    car_sprite_count: f64,
    symmetry_factor: f64,
}

impl TimingModel {
    pub fn new(settings: &CondorSettings) -> Self {
        Self {
            tower: SpeedCurve::peaked(
                f64::from(settings.tower_speed_min),
                f64::from(settings.tower_speed_max),
            ),
            vehicle: SpeedCurve::rising(
                f64::from(settings.vehicle_speed_min),
                f64::from(settings.vehicle_speed_max),
            ),
            rise: SpeedCurve::peaked(
                f64::from(settings.rise_speed_min),
                f64::from(settings.rise_speed_max),
            ),
            arm_sprite_count: f64::from(settings.arm_sprite_count),
            car_sprite_count: f64::from(settings.car_sprite_count),
            symmetry_factor: f64::from(settings.symmetry_factor),
        }
    }

    /// Ticks between arm sprite steps (degrees per tick speed)
    pub fn tower_rotation_time(&self, progress: f32) -> u32 {
        let speed = self.tower.sample(progress);
        to_ticks(1.0 / speed / self.arm_sprite_count * self.symmetry_factor * 360.0)
    }

    /// Ticks between car spin sprite steps (degrees per tick speed)
    pub fn vehicle_rotation_time(&self, progress: f32) -> u32 {
        let speed = self.vehicle.sample(progress);
        to_ticks(1.0 / speed / self.car_sprite_count * 360.0)
    }

    /// Ticks between height steps (height units per tick speed)
    pub fn rise_time(&self, progress: f32) -> u32 {
        to_ticks(1.0 / self.rise.sample(progress))
    }
}

impl FrameTimer for TimingModel {
    fn frame_time(&self, kind: StepKind, progress: f32) -> u32 {
        match kind {
            StepKind::TowerRotation => self.tower_rotation_time(progress),
            StepKind::VehicleRotation => self.vehicle_rotation_time(progress),
            StepKind::Rise => self.rise_time(progress),
        }
    }
}

/// Constant frame times regardless of progress
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedTiming {
    pub tower: u32,
    pub vehicle: u32,
    pub rise: u32,
}

#[cfg(test)]
impl FixedTiming {
    pub fn uniform(ticks: u32) -> Self {
        Self {
            tower: ticks,
            vehicle: ticks,
            rise: ticks,
        }
    }
}

#[cfg(test)]
impl FrameTimer for FixedTiming {
    fn frame_time(&self, kind: StepKind, _progress: f32) -> u32 {
        match kind {
            StepKind::TowerRotation => self.tower,
            StepKind::VehicleRotation => self.vehicle,
            StepKind::Rise => self.rise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model() -> TimingModel {
        TimingModel::new(&CondorSettings::default())
    }

    #[test]
    fn test_curve_hits_control_points() {
        let curve = SpeedCurve::peaked(1.0, 4.0);
        assert!((curve.sample(0.0) - 1.0).abs() < 1e-9);
        assert!((curve.sample(0.5) - 4.0).abs() < 1e-9);
        assert!((curve.sample(1.0) - 1.0).abs() < 1e-9);

        let rising = SpeedCurve::rising(2.0, 6.0);
        assert!((rising.sample(0.0) - 2.0).abs() < 1e-9);
        assert!((rising.sample(0.5) - 4.0).abs() < 1e-9);
        assert!((rising.sample(1.0) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        let curve = SpeedCurve::peaked(1.0, 4.0);
        assert_eq!(curve.sample(-3.0), curve.sample(0.0));
        assert_eq!(curve.sample(7.5), curve.sample(1.0));
        assert_eq!(curve.sample(f32::NAN), curve.sample(0.0));
    }

    #[test]
    fn test_tower_rotation_fastest_midway() {
        let timing = model();
        let ends = timing.tower_rotation_time(0.0);
        let middle = timing.tower_rotation_time(0.5);
        assert!(middle < ends, "middle {middle} should beat ends {ends}");
        assert_eq!(timing.tower_rotation_time(1.0), ends);
    }

    #[test]
    fn test_tower_rotation_formula() {
        // 0.5 deg/tick over 16 sprites with a quarter-turn symmetry
        let timing = model();
        let expected = (1.0_f64 / 0.5 / 16.0 * 0.25 * 360.0).round() as u32;
        assert_eq!(timing.tower_rotation_time(0.0), expected);
    }

    #[test]
    fn test_vehicle_rotation_speeds_up_with_height() {
        let timing = model();
        let mut last = u32::MAX;
        for i in 0..=20 {
            let ticks = timing.vehicle_rotation_time(i as f32 / 20.0);
            assert!(ticks <= last);
            last = ticks;
        }
        assert!(timing.vehicle_rotation_time(1.0) < timing.vehicle_rotation_time(0.0));
    }

    #[test]
    fn test_frame_times_never_zero() {
        let settings = CondorSettings {
            rise_speed_max: 50.0,
            ..CondorSettings::default()
        };
        let timing = TimingModel::new(&settings);
        assert_eq!(timing.rise_time(0.5), 1);
    }

    proptest! {
        #[test]
        fn rise_time_shrinks_toward_middle(a in 0.0f32..=0.5, b in 0.0f32..=0.5) {
            let timing = model();
            let (p1, p2) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(timing.rise_time(p1) >= timing.rise_time(p2));
        }

        #[test]
        fn rise_time_grows_past_middle(a in 0.5f32..=1.0, b in 0.5f32..=1.0) {
            let timing = model();
            let (p1, p2) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(timing.rise_time(p1) <= timing.rise_time(p2));
        }

        #[test]
        fn speeds_stay_positive(p in -2.0f32..3.0) {
            let timing = model();
            prop_assert!(timing.tower.sample(p) > 0.0);
            prop_assert!(timing.vehicle.sample(p) > 0.0);
            prop_assert!(timing.rise.sample(p) > 0.0);
        }
    }
}
