//! Read-only view of the simulation for presentation layers.
//!
//! Snapshots use plain floats and string keys so renderers and the headless
//! protocol never touch fixed-point types or station handles.

use serde::{Deserialize, Serialize};

use crate::items::Item;
use crate::movement::Direction;
use crate::simulation::GamePhase;

/// A position in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Player view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Centre position.
    pub position: Point,
    /// Facing.
    pub facing: Direction,
    /// Carried item.
    pub held_item: Option<Item>,
    /// Forklift mode.
    pub in_forklift: bool,
}

/// Station view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSnapshot {
    /// Layout key.
    pub id: String,
    /// Display label of the station kind.
    pub label: String,
    /// Centre position.
    pub position: Point,
    /// Presentation color.
    pub color: String,
    /// A cycle is running.
    pub is_processing: bool,
    /// Cycle progress in percent.
    pub progress: f64,
    /// Item being processed.
    pub held_item: Option<Item>,
    /// Finished item.
    pub output_item: Option<Item>,
    /// Output leaves via transfer.
    pub automated: bool,
}

/// In-flight transfer view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSnapshot {
    /// Transfer id.
    pub id: u64,
    /// Carried item.
    pub item: Item,
    /// Interpolated position.
    pub position: Point,
    /// Layout key of the destination.
    pub target: String,
    /// Travel progress, `0..=1`.
    pub progress: f64,
}

/// Full per-tick output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Ticks run since the last restart.
    pub tick: u64,
    /// Shift phase.
    pub phase: GamePhase,
    /// Score.
    pub score: u64,
    /// The player.
    pub player: PlayerSnapshot,
    /// Layout key of the station in interaction range.
    pub nearby_station: Option<String>,
    /// Stations in layout order.
    pub stations: Vec<StationSnapshot>,
    /// In-flight transfers.
    pub transfers: Vec<TransferSnapshot>,
    /// Event log, newest first.
    pub log: Vec<String>,
}
