//! Validated run-time configuration.
//!
//! Built only by [`crate::data::FactoryLayout::validate`]; everything here
//! is already converted to fixed-point and cross-checked.

use crate::items::HeavyItems;
use crate::math::Fixed;
use crate::movement::{MapBounds, MovementParams};
use crate::stations::StationTable;
use crate::transfer::ArrivalPolicy;

/// Numeric tuning for one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
    /// Tick length in milliseconds.
    pub tick_ms: u32,
    /// Player distance per tick at full intent.
    pub movement_speed: Fixed,
    /// Reach for interact commands.
    pub interaction_radius: Fixed,
    /// Radius stations push the player out to.
    pub collision_radius: Fixed,
    /// Transfer progress per tick.
    pub transfer_step: Fixed,
    /// Score per shipment.
    pub ship_reward: u32,
    /// Event-log length.
    pub event_log_capacity: usize,
    /// What to do with transfers arriving at an occupied station.
    pub arrival_policy: ArrivalPolicy,
}

/// Everything a [`crate::simulation::Simulation`] is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Stations in layout order.
    pub stations: StationTable,
    /// Numeric tuning.
    pub tuning: Tuning,
    /// Forklift-only item kinds.
    pub heavy_items: HeavyItems,
    /// Playable area.
    pub bounds: MapBounds,
}

impl FactoryConfig {
    /// Parameters for the movement step.
    #[must_use]
    pub fn movement(&self) -> MovementParams {
        MovementParams {
            speed: self.tuning.movement_speed,
            collision_radius: self.tuning.collision_radius,
            bounds: self.bounds,
        }
    }
}
