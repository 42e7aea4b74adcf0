//! Deterministic ride simulation
//!
//! All ride-motion logic lives here. This module must stay pure and
//! deterministic:
//! - One call per ride per tick, run to completion
//! - Integer state only; curves are evaluated, never accumulated
//! - No paint or platform dependencies

pub mod locations;
pub mod state;
pub mod stepper;
pub mod sync;
pub mod tick;
pub mod timing;

pub use locations::CondorLocations;
pub use state::{CondorPhase, CondorState, RigSpec, TowerBounds};
pub use stepper::PeriodicStepper;
pub use sync::{ANCHOR_CAR, anchor_departed, car_position, release_vehicles, sync_vehicles};
pub use tick::{TickOutcome, tick};
pub use timing::{FrameTimer, SpeedCurve, StepKind, TimingModel};
