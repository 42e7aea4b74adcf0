//! Fixed timestep ride tick
//!
//! Advances a Condor cycle deterministically: Waiting → Climbing →
//! SpinningAtTop → Falling → Waiting. Within a tick the order is always
//! height, arm rotation, car spin, dwell counter.

use super::state::{CondorPhase, CondorState};
use super::timing::FrameTimer;

/// What a single tick did to the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Waiting at the base, nothing moved
    Idle,
    /// The controller drove the rig this tick
    Moving,
    /// The rig is home at the base and just went back to Waiting
    Returned,
}

/// Advance the ride state by one simulation tick
pub fn tick<T: FrameTimer + ?Sized>(state: &mut CondorState, timer: &T) -> TickOutcome {
    let progress = state.progress();

    match state.phase {
        CondorPhase::Waiting => TickOutcome::Idle,
        CondorPhase::Climbing => {
            if state.rise.advance(timer, progress) {
                state.vertical_position =
                    state.vertical_position.saturating_add(1).min(state.tower.top);
            }
            advance_arm(state, timer, progress);
            advance_quads(state, timer, progress);

            if state.vertical_position >= state.tower.top {
                state.vertical_position = state.tower.top;
                state.rise.reset();
                enter_phase(state, CondorPhase::SpinningAtTop);
            }
            TickOutcome::Moving
        }
        CondorPhase::SpinningAtTop => {
            // Arm stays parked at the top, only the cars keep spinning
            state.tower_rotation.hold();
            advance_quads(state, timer, progress);

            state.spinning_top_counter += 1;
            if state.spinning_top_counter >= state.rig.spinning_top_time {
                state.spinning_top_counter = 0;
                enter_phase(state, CondorPhase::Falling);
            }
            TickOutcome::Moving
        }
        CondorPhase::Falling => {
            if state.vertical_position > state.tower.base {
                if state.rise.advance(timer, progress) {
                    state.vertical_position =
                        state.vertical_position.saturating_sub(1).max(state.tower.base);
                }
                advance_arm(state, timer, progress);
                advance_quads(state, timer, progress);
            } else {
                // Parked at the base: wind each angle home, then hold it there
                if state.arm_homed() {
                    state.tower_rotation.hold();
                } else {
                    advance_arm(state, timer, progress);
                }
                if state.quads_homed() {
                    state.vehicle_rotation.hold();
                } else {
                    advance_quads(state, timer, progress);
                }
            }

            if state.vertical_position <= state.tower.base {
                state.vertical_position = state.tower.base;
                if state.is_homed() {
                    state.rise.reset();
                    state.tower_rotation.reset();
                    state.vehicle_rotation.reset();
                    enter_phase(state, CondorPhase::Waiting);
                    return TickOutcome::Returned;
                }
            }
            TickOutcome::Moving
        }
    }
}

fn advance_arm<T: FrameTimer + ?Sized>(state: &mut CondorState, timer: &T, progress: f32) {
    if state.tower_rotation.advance(timer, progress) {
        state.step_arm();
    }
}

fn advance_quads<T: FrameTimer + ?Sized>(state: &mut CondorState, timer: &T, progress: f32) {
    if state.vehicle_rotation.advance(timer, progress) {
        state.step_quads();
    }
}

fn enter_phase(state: &mut CondorState, phase: CondorPhase) {
    log::debug!(
        "Condor {:?} -> {:?} at height {} (arm {}, quad {})",
        state.phase,
        phase,
        state.vertical_position,
        state.arm_rotation,
        state.quad_rotation[0]
    );
    state.phase = phase;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CondorSettings;
    use crate::sim::state::{RigSpec, TowerBounds};
    use crate::sim::timing::{FixedTiming, TimingModel};
    use proptest::prelude::*;

    /// Drive a departed ride until it returns, checking invariants every tick
    fn run_cycle<T: FrameTimer>(state: &mut CondorState, timer: &T, max_ticks: u32) -> u32 {
        for n in 1..=max_ticks {
            let before = state.phase;
            let outcome = tick(state, timer);
            assert!(state.vertical_position >= state.tower.base);
            assert!(state.vertical_position <= state.tower.top);
            if before == CondorPhase::Falling && state.phase == CondorPhase::Waiting {
                assert_eq!(state.vertical_position, state.tower.base);
                assert_eq!(state.arm_rotation % state.arm_period(), 0);
                assert_eq!(state.quad_rotation[0], state.initial_quad_rotation);
            }
            if outcome == TickOutcome::Returned {
                return n;
            }
        }
        panic!("ride did not return within {max_ticks} ticks");
    }

    #[test]
    fn test_waiting_is_idle() {
        let mut state = CondorState::new(TowerBounds::new(0, 50), RigSpec::default());
        let before = state.clone();
        assert_eq!(tick(&mut state, &FixedTiming::uniform(1)), TickOutcome::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn test_climb_reaches_top_with_fixed_rise_time() {
        let mut state = CondorState::new(TowerBounds::new(0, 100), RigSpec::default());
        state.begin_cycle();
        let timer = FixedTiming {
            tower: 3,
            vehicle: 5,
            rise: 2,
        };

        let mut reached_at = None;
        for n in 1..=200 {
            tick(&mut state, &timer);
            if state.phase == CondorPhase::SpinningAtTop {
                reached_at = Some(n);
                break;
            }
        }

        assert_eq!(state.vertical_position, 100);
        assert!(matches!(reached_at, Some(n) if n <= 200));
    }

    #[test]
    fn test_arm_frozen_during_dwell() {
        let mut state = CondorState::new(TowerBounds::new(0, 40), RigSpec::default());
        state.begin_cycle();
        state.phase = CondorPhase::SpinningAtTop;
        state.vertical_position = 40;
        state.tower_rotation.counter = 2;
        let arm = state.arm_rotation;
        let timer = FixedTiming::uniform(3);

        for _ in 0..119 {
            tick(&mut state, &timer);
            assert_eq!(state.tower_rotation.counter, 0);
            assert_eq!(state.arm_rotation, arm);
            assert_eq!(state.phase, CondorPhase::SpinningAtTop);
        }
        tick(&mut state, &timer);
        assert_eq!(state.tower_rotation.counter, 0);
        assert_eq!(state.phase, CondorPhase::Falling);
        assert_eq!(state.spinning_top_counter, 0);
    }

    #[test]
    fn test_cars_keep_spinning_at_top() {
        let mut state = CondorState::new(TowerBounds::new(0, 10), RigSpec::default());
        state.begin_cycle();
        state.phase = CondorPhase::SpinningAtTop;
        state.vertical_position = 10;

        for _ in 0..4 {
            tick(&mut state, &FixedTiming::uniform(1));
        }
        assert_eq!(state.quad_rotation[0], 4);
    }

    #[test]
    fn test_zero_height_tower() {
        let mut state = CondorState::new(TowerBounds::new(0, 0), RigSpec::default());
        assert_eq!(state.progress(), 0.0);
        state.begin_cycle();

        let timing = TimingModel::new(&CondorSettings::default());
        tick(&mut state, &timing);
        assert_eq!(state.phase, CondorPhase::SpinningAtTop);
        assert_eq!(state.vertical_position, 0);

        run_cycle(&mut state, &timing, 10_000);
        assert_eq!(state.phase, CondorPhase::Waiting);
    }

    #[test]
    fn test_tower_at_height_limits() {
        let timer = FixedTiming::uniform(1);

        let mut state = CondorState::new(TowerBounds::new(i32::MAX, i32::MAX), RigSpec::default());
        state.begin_cycle();
        assert_eq!(tick(&mut state, &timer), TickOutcome::Moving);
        assert_eq!(state.phase, CondorPhase::SpinningAtTop);
        assert_eq!(state.vertical_position, i32::MAX);

        let mut state = CondorState::new(TowerBounds::new(i32::MIN, i32::MIN + 2), RigSpec::default());
        state.begin_cycle();
        state.phase = CondorPhase::Falling;
        state.vertical_position = i32::MIN + 1;
        tick(&mut state, &timer);
        assert_eq!(state.vertical_position, i32::MIN);
        run_cycle(&mut state, &timer, 1_000);
        assert_eq!(state.phase, CondorPhase::Waiting);
    }

    #[test]
    fn test_falling_waits_for_rehoming() {
        let mut state = CondorState::new(TowerBounds::new(0, 20), RigSpec::default());
        state.begin_cycle();
        state.phase = CondorPhase::Falling;
        state.vertical_position = 1;
        state.arm_rotation = 60;
        state.quad_rotation = state.rig.home_quads(6);
        let timer = FixedTiming {
            tower: 2,
            vehicle: 3,
            rise: 1,
        };

        assert_eq!(tick(&mut state, &timer), TickOutcome::Moving);
        assert_eq!(state.vertical_position, 0);
        assert_eq!(state.phase, CondorPhase::Falling);

        let ticks = run_cycle(&mut state, &timer, 1_000);
        assert!(ticks > 1);
        assert_eq!(state.arm_rotation, 0);
        assert_eq!(state.quad_rotation, state.rig.home_quads(0));
    }

    #[test]
    fn test_homed_angle_holds_while_other_catches_up() {
        let mut state = CondorState::new(TowerBounds::new(0, 20), RigSpec::default());
        state.begin_cycle();
        state.phase = CondorPhase::Falling;
        state.quad_rotation = state.rig.home_quads(5);
        let timer = FixedTiming::uniform(1);

        for _ in 0..2 {
            tick(&mut state, &timer);
            assert_eq!(state.arm_rotation, 0);
        }
        run_cycle(&mut state, &timer, 100);
        assert_eq!(state.arm_rotation, 0);
    }

    #[test]
    fn test_full_cycle_with_curve_timing() {
        let mut state = CondorState::new(TowerBounds::new(16, 80), RigSpec::default());
        state.quad_rotation = state.rig.home_quads(3);
        state.begin_cycle();
        let start_quads = state.quad_rotation;

        let timing = TimingModel::new(&CondorSettings::default());
        run_cycle(&mut state, &timing, 20_000);

        assert_eq!(state.phase, CondorPhase::Waiting);
        assert_eq!(state.vertical_position, 16);
        assert_eq!(state.arm_rotation, 0);
        assert_eq!(state.quad_rotation, start_quads);
    }

    proptest! {
        #[test]
        fn cycle_restores_home_pose(
            base in -50i32..50,
            height in 0i32..160,
            home in 0u32..8,
            tower in 1u32..8,
            vehicle in 1u32..8,
            rise in 1u32..8,
        ) {
            let mut state = CondorState::new(TowerBounds::new(base, base + height), RigSpec::default());
            state.quad_rotation = state.rig.home_quads(home);
            state.begin_cycle();
            let start_quads = state.quad_rotation;

            run_cycle(&mut state, &FixedTiming { tower, vehicle, rise }, 100_000);

            prop_assert_eq!(state.vertical_position, base);
            prop_assert_eq!(state.arm_rotation, 0);
            let count = state.rig.car_sprite_count;
            for (quad, start) in state.quad_rotation.iter().zip(start_quads) {
                prop_assert_eq!(quad % count, start % count);
            }
        }
    }
}
