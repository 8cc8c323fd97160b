//! Test fixtures and helpers.
//!
//! Pre-built factories and shortcuts for putting the player and items
//! where a test needs them.

use fixed::types::I32F32;
use rush_core::data::FactoryLayout;
use rush_core::items::{Item, ItemType};
use rush_core::math::Vec2Fixed;
use rush_core::simulation::{Simulation, TickEvents};
use rush_core::stations::StationId;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// The stock plant, not yet started.
///
/// # Panics
///
/// Panics if the stock layout fails validation.
#[must_use]
pub fn recycling_plant() -> Simulation {
    plant_with(|_| {})
}

/// The stock plant, started at time 0.
#[must_use]
pub fn running_plant() -> Simulation {
    let mut sim = recycling_plant();
    sim.start(0);
    sim
}

/// The stock plant after `edit` is applied to its layout, not yet started.
///
/// # Panics
///
/// Panics if the edited layout fails validation.
#[must_use]
pub fn plant_with(edit: impl FnOnce(&mut FactoryLayout)) -> Simulation {
    let mut layout = FactoryLayout::recycling_plant();
    edit(&mut layout);
    let config = layout.validate().expect("fixture layout should validate");
    Simulation::new(config)
}

/// Handle of the station with layout key `key`.
///
/// # Panics
///
/// Panics if no such station exists.
#[must_use]
pub fn station_id(sim: &Simulation, key: &str) -> StationId {
    sim.config()
        .stations
        .find(key)
        .unwrap_or_else(|| panic!("no station '{key}' in layout"))
        .id
}

/// Teleport the player to just below station `key`, inside its interaction
/// range and outside its collision radius.
pub fn stand_at(sim: &mut Simulation, key: &str) {
    let id = station_id(sim, key);
    let position = sim.config().stations.get(id).position + Vec2Fixed::from_int(0, 50);
    sim.state_mut().player.position = position;
}

/// Put a fresh item of `kind` in the player's hands.
pub fn give_item(sim: &mut Simulation, kind: ItemType) -> Item {
    let state = sim.state_mut();
    let item = Item::new(state.item_ids.allocate(), kind);
    state.player.held_item = Some(item);
    item
}

/// Place a finished item of `kind` in station `key`'s output slot.
pub fn place_output(sim: &mut Simulation, key: &str, kind: ItemType) -> Item {
    let id = station_id(sim, key);
    let state = sim.state_mut();
    let item = Item::new(state.item_ids.allocate(), kind);
    state.stations[id.index()].output_item = Some(item);
    item
}

/// Run `ticks` ticks and merge their events.
pub fn run_ticks(sim: &mut Simulation, ticks: u32) -> TickEvents {
    let mut all = TickEvents::default();
    for _ in 0..ticks {
        let mut events = sim.tick();
        all.spawned.append(&mut events.spawned);
        all.completed.append(&mut events.completed);
        all.transfers_started.append(&mut events.transfers_started);
        all.arrivals.append(&mut events.arrivals);
        all.lost.append(&mut events.lost);
    }
    all
}
