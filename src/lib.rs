//=========================================================================
// Platformer Core Library Root
//
// Deterministic rules engine for a 2D platformer.
//
// Responsibilities:
// - Schedule gameplay events in time order with pooled instances
// - Keep shared gameplay state in a typed model registry
// - Resolve collisions, hazards, damage, death, respawn and score
// - Run the per-player jump state machine
//
// Physics, rendering, animation and audio stay outside. They are injected
// into each actor as capability traits and report back through signals.
//
// Typical usage:
// ```no_run
// use platformer_core::SimulationBuilder;
//
// let mut simulation = SimulationBuilder::new().build().unwrap();
// loop {
//     // feed collisions / hazards / input, then
//     simulation.step();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the rule subsystems (scheduler, models, gameplay events,
// actors, jump machine) and is public for custom events and models.
//
// `config` holds the RON-loadable tunables.
//
pub mod config;
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the simulation facade, its builder and the handle of a
// simulation running on its own thread.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Simulation, SimulationBuilder, SimulationError, SimulationHandle};
