//! Condor simulation entry point
//!
//! Builds a small park with two Condor towers, runs a scripted station
//! operator against it for a number of ticks and dumps the final ride state.
//!
//! Usage: `condor-sim [settings.json] [ticks] [seed] [preset]`
//!
//! `preset` is one of gentle, standard or thrilling and overrides the
//! preset-dependent values from the settings file.

use std::collections::HashMap;
use std::path::Path;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use condor_sim::consts::ARMS;
use condor_sim::entity::VehicleStatus;
use condor_sim::sim::{ANCHOR_CAR, CondorPhase};
use condor_sim::{CondorSettings, IntensityPreset, Park, RideId};

const DEFAULT_TICKS: u64 = 4_000;
const DEFAULT_SEED: u64 = 42;

/// Stand-in for the station logic: boards, dispatches and unloads cars
struct Operator {
    rng: Pcg32,
    /// Ticks left before the next station action, per ride
    timers: HashMap<RideId, u32>,
}

impl Operator {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            timers: HashMap::new(),
        }
    }

    fn update(&mut self, park: &mut Park) {
        for ride in &mut park.rides {
            let Some(anchor) = ride.vehicles.iter().find(|v| v.car_index == ANCHOR_CAR) else {
                continue;
            };
            let next = match anchor.status {
                VehicleStatus::WaitingForPassengers => VehicleStatus::Travelling,
                VehicleStatus::Arriving => VehicleStatus::WaitingForPassengers,
                _ => continue,
            };

            let timer = self
                .timers
                .entry(ride.id)
                .or_insert_with(|| self.rng.random_range(20..80));
            if *timer > 0 {
                *timer -= 1;
                continue;
            }
            self.timers.remove(&ride.id);

            for vehicle in &mut ride.vehicles {
                vehicle.set_status(next);
            }
            if next == VehicleStatus::Travelling {
                log::info!("Ride {:?} dispatched", ride.id);
            }
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = match args.first() {
        Some(path) => CondorSettings::load_or_default(Path::new(path)),
        None => CondorSettings::default(),
    };
    let ticks = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICKS);
    let seed = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    if let Some(name) = args.get(3) {
        match IntensityPreset::parse(name) {
            Some(preset) => settings.apply_preset(preset),
            None => log::warn!("Unknown preset '{name}', keeping {}", settings.preset.as_str()),
        }
    }

    log::info!(
        "Condor sim starting: {} preset, {} ticks, seed {}",
        settings.preset.as_str(),
        ticks,
        seed
    );

    let mut park = Park::new(settings);
    park.add_condor(RideId(1), IVec2::new(4, 4), 16, 8, 8);
    park.add_condor(RideId(2), IVec2::new(12, 4), 0, 4, 8);
    for ride in [RideId(1), RideId(2)] {
        for car in 0..ARMS {
            park.place_vehicle(ride, car);
        }
    }

    let mut operator = Operator::new(seed);
    let mut cycles: HashMap<RideId, u32> = HashMap::new();

    for _ in 0..ticks {
        operator.update(&mut park);

        let before: Vec<_> = park
            .rides
            .iter()
            .map(|r| r.condor_state().map(|s| s.phase))
            .collect();
        park.tick();

        for (ride, prev) in park.rides.iter().zip(before) {
            let now = ride.condor_state().map(|s| s.phase);
            if prev == Some(CondorPhase::Falling) && now == Some(CondorPhase::Waiting) {
                let count = cycles.entry(ride.id).or_default();
                *count += 1;
                log::info!(
                    "Ride {:?} completed cycle {} at tick {}",
                    ride.id,
                    count,
                    park.tick_count
                );
            }
        }

        // Paint runs once the whole tick is done
        let frame = park.paint();
        log::trace!("Painted {} rides", frame.len());
    }

    for ride in &park.rides {
        log::info!(
            "Ride {:?}: {} cycles",
            ride.id,
            cycles.get(&ride.id).copied().unwrap_or(0)
        );
    }

    match serde_json::to_string_pretty(&park.rides) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize ride state: {e}"),
    }
}
