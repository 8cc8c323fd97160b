//! # Rush Core
//!
//! Deterministic factory-floor simulation core for Recycled Rush.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Headless drivers and scripted play
//! - Determinism testing via state hashes
//! - Any presentation layer on top of [`snapshot`]
//!
//! ## Crate Structure
//!
//! - [`data`] - RON layout definitions and validation
//! - [`stations`] - Station configuration, state and processing
//! - [`transfer`] - Automated item transfers
//! - [`movement`] - Player movement and collision
//! - [`interaction`] - Interact command resolution
//! - [`simulation`] - Core simulation loop
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod event_log;
pub mod interaction;
pub mod items;
pub mod math;
pub mod movement;
pub mod proximity;
pub mod simulation;
pub mod snapshot;
pub mod stations;
pub mod transfer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{FactoryConfig, Tuning};
    pub use crate::data::FactoryLayout;
    pub use crate::error::{GameError, Result};
    pub use crate::interaction::InteractionOutcome;
    pub use crate::items::{Item, ItemId, ItemType};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::movement::{Direction, HeldDirections};
    pub use crate::simulation::{GamePhase, Simulation, TickEvents};
    pub use crate::snapshot::SimulationSnapshot;
    pub use crate::stations::{StationId, StationType};
    pub use crate::transfer::ArrivalPolicy;
}
