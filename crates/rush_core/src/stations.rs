//! Stations: static configuration, dynamic state, and the per-tick
//! processing state machine.
//!
//! A station's role follows from its configured input and output:
//!
//! | input | output | role |
//! |-------|--------|------|
//! | none  | some   | [`StationRole::Source`] - spawns items on a timer |
//! | some  | some   | [`StationRole::Processor`] - transforms a held item |
//! | any   | none   | [`StationRole::Sink`] - consumes items on interaction |
//!
//! Forklift parking is always [`StationRole::Parking`] regardless of
//! input/output.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::items::{Item, ItemIds, ItemType};
use crate::math::{Fixed, Vec2Fixed};
use crate::transfer::TransferEngine;

/// Progress value at which a processing cycle completes.
pub const PROGRESS_COMPLETE: i32 = 100;

/// Handle to a station in a validated [`StationTable`].
///
/// Handles are dense indices in layout order, so iterating them preserves
/// the fixed station order that collision and proximity tie-breaks use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(pub u16);

impl StationId {
    /// Index into per-station storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Station kinds on the plant floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    /// Spawns dirty jugs.
    Receiving,
    /// Sorting table.
    Sorting,
    /// Washing station.
    Washing,
    /// Shredder.
    Shredding,
    /// Extruder.
    Melting,
    /// Pelletizer.
    Pelletizing,
    /// Packaging line.
    Packaging,
    /// Shipping dock, consumes finished goods for score.
    Shipping,
    /// Where the player enters and leaves the forklift.
    ForkliftParking,
    /// Discards any item without reward.
    Trash,
}

impl StationType {
    /// Display label used in event-log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Receiving => "Receiving",
            Self::Sorting => "Sorting Table",
            Self::Washing => "Washing Station",
            Self::Shredding => "Shredder",
            Self::Melting => "Extruder",
            Self::Pelletizing => "Pelletizer",
            Self::Packaging => "Packaging",
            Self::Shipping => "Shipping Dock",
            Self::ForkliftParking => "Forklift Parking",
            Self::Trash => "Trash Bin",
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Behavioral role derived from a station's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationRole {
    /// No input: produces fresh items on a timer.
    Source,
    /// Input and output: transforms a loaded item.
    Processor,
    /// No output: consumes items handed over by the player.
    Sink,
    /// Forklift parking, toggles vehicle mode.
    Parking,
}

/// Static station configuration, immutable after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    /// Handle of this station.
    pub id: StationId,
    /// Layout key (e.g. `"sorting-1"`).
    pub key: String,
    /// Station kind.
    pub kind: StationType,
    /// Centre of the station on the floor.
    pub position: Vec2Fixed,
    /// Accepted item kind.
    pub input: Option<ItemType>,
    /// Produced item kind.
    pub output: Option<ItemType>,
    /// Duration of one processing cycle in milliseconds.
    pub processing_time_ms: u32,
    /// Presentation color, carried through untouched.
    pub color: String,
    /// Downstream station receiving this station's output automatically.
    pub auto_next: Option<StationId>,
}

impl StationConfig {
    /// Role derived from kind, input and output.
    #[must_use]
    pub fn role(&self) -> StationRole {
        if self.kind == StationType::ForkliftParking {
            return StationRole::Parking;
        }
        match (self.input, self.output) {
            (None, Some(_)) => StationRole::Source,
            (Some(_), Some(_)) => StationRole::Processor,
            (_, None) => StationRole::Sink,
        }
    }

    /// Whether output leaves via a transfer instead of player pickup.
    #[must_use]
    pub const fn is_automated(&self) -> bool {
        self.auto_next.is_some()
    }

    /// Progress gained per tick, in percent.
    ///
    /// A zero-length cycle completes on the first tick.
    #[must_use]
    pub fn progress_per_tick(&self, tick_ms: u32) -> Fixed {
        if self.processing_time_ms == 0 {
            return Fixed::from_num(PROGRESS_COMPLETE);
        }
        Fixed::from_num(u64::from(tick_ms) * 100) / Fixed::from_num(self.processing_time_ms)
    }
}

/// Validated, ordered set of station configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationTable {
    stations: Vec<StationConfig>,
    by_key: HashMap<String, StationId>,
}

impl StationTable {
    /// Build a table from configs already carrying dense ids.
    ///
    /// Only layout validation calls this; it guarantees `stations[i].id == i`
    /// and unique keys.
    pub(crate) fn from_validated(stations: Vec<StationConfig>) -> Self {
        let by_key = stations
            .iter()
            .map(|s| (s.key.clone(), s.id))
            .collect();
        Self { stations, by_key }
    }

    /// Get a station by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this table.
    #[must_use]
    pub fn get(&self, id: StationId) -> &StationConfig {
        &self.stations[id.index()]
    }

    /// Find a station by layout key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&StationConfig> {
        self.by_key.get(key).map(|&id| self.get(id))
    }

    /// Iterate stations in layout order.
    pub fn iter(&self) -> impl Iterator<Item = &StationConfig> {
        self.stations.iter()
    }

    /// Number of stations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Dynamic per-station state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StationState {
    /// A cycle is running.
    pub is_processing: bool,
    /// Cycle progress in percent, `0..100`.
    pub progress: Fixed,
    /// Item being processed.
    pub held_item: Option<Item>,
    /// Finished item waiting for pickup or dispatch.
    pub output_item: Option<Item>,
}

impl StationState {
    /// No held item, no running cycle, no pending output.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.held_item.is_none() && !self.is_processing && self.output_item.is_none()
    }

    /// Both item slots are empty.
    #[must_use]
    pub fn can_accept(&self) -> bool {
        self.held_item.is_none() && self.output_item.is_none()
    }

    /// Load an item and start a fresh cycle.
    pub fn load(&mut self, item: Item) {
        self.held_item = Some(item);
        self.is_processing = true;
        self.progress = Fixed::ZERO;
    }

    /// Remove the pending output, resetting progress.
    pub fn take_output(&mut self) -> Option<Item> {
        let item = self.output_item.take();
        if item.is_some() {
            self.progress = Fixed::ZERO;
        }
        item
    }

    /// Progress as a plain percentage for presentation.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.progress.to_num::<f64>()
    }

    fn advance(&mut self, step: Fixed) -> bool {
        self.progress = self.progress.saturating_add(step);
        self.progress >= Fixed::from_num(PROGRESS_COMPLETE)
    }

    fn finish(&mut self, output: Item) {
        self.is_processing = false;
        self.progress = Fixed::ZERO;
        self.held_item = None;
        self.output_item = Some(output);
    }
}

/// Something a station did during the processing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationEvent {
    /// A source finished a cycle and produced a fresh item.
    Spawned {
        /// Producing station.
        station: StationId,
        /// New item.
        item: Item,
    },
    /// A processor transformed its held item.
    Completed {
        /// Processing station.
        station: StationId,
        /// Transformed item, same id as the input.
        item: Item,
    },
}

/// Advance one station by one tick.
///
/// Sources start a cycle whenever they are free and emit a new item when the
/// cycle completes. Processors only advance while holding an item and with
/// no output pending. Sinks and parking have no processing state.
pub fn station_system(
    config: &StationConfig,
    state: &mut StationState,
    tick_ms: u32,
    item_ids: &mut ItemIds,
) -> Option<StationEvent> {
    let step = config.progress_per_tick(tick_ms);

    match (config.role(), config.output) {
        (StationRole::Source, Some(output)) => {
            if state.output_item.is_none() && !state.is_processing {
                state.is_processing = true;
                state.progress = Fixed::ZERO;
                None
            } else if state.is_processing && state.advance(step) {
                let item = Item::new(item_ids.allocate(), output);
                state.finish(item);
                Some(StationEvent::Spawned {
                    station: config.id,
                    item,
                })
            } else {
                None
            }
        }
        (StationRole::Processor, Some(output)) => {
            // A pending output blocks the cycle until it is taken.
            if state.output_item.is_some() {
                return None;
            }
            let held = state.held_item.filter(|_| state.is_processing)?;
            if !state.advance(step) {
                return None;
            }
            let item = held.transformed(output);
            state.finish(item);
            Some(StationEvent::Completed {
                station: config.id,
                item,
            })
        }
        _ => None,
    }
}

/// Hand finished output of automated stations to the transfer engine.
///
/// A transfer only starts when the downstream station is completely idle;
/// otherwise the output stays put and blocks the source. Stations are visited
/// in layout order, so a target freed earlier in the pass is seen as idle.
///
/// Returns the stations that dispatched this tick.
pub fn dispatch_system(
    stations: &StationTable,
    states: &mut [StationState],
    transfers: &mut TransferEngine,
) -> Vec<(StationId, Item)> {
    let mut dispatched = Vec::new();

    for config in stations.iter() {
        let Some(target) = config.auto_next else {
            continue;
        };
        if states[config.id.index()].output_item.is_none() || !states[target.index()].is_idle() {
            continue;
        }
        let Some(item) = states[config.id.index()].output_item.take() else {
            continue;
        };

        let to = stations.get(target).position;
        transfers.launch(item, config.position, to, target);
        tracing::debug!(
            from = %config.key,
            to = %stations.get(target).key,
            item = %item.id,
            "Automated transfer started"
        );
        dispatched.push((config.id, item));
    }

    dispatched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(kind: StationType, input: Option<ItemType>, output: Option<ItemType>) -> StationConfig {
        StationConfig {
            id: StationId(0),
            key: "test-1".to_string(),
            kind,
            position: Vec2Fixed::ZERO,
            input,
            output,
            processing_time_ms: 1600,
            color: String::new(),
            auto_next: None,
        }
    }

    #[test]
    fn test_roles() {
        let source = station(StationType::Receiving, None, Some(ItemType::DirtyJug));
        let processor = station(
            StationType::Sorting,
            Some(ItemType::DirtyJug),
            Some(ItemType::SortedJug),
        );
        let sink = station(StationType::Shipping, Some(ItemType::BaggedPellets), None);
        let parking = station(StationType::ForkliftParking, None, None);
        let trash = station(StationType::Trash, None, None);

        assert_eq!(source.role(), StationRole::Source);
        assert_eq!(processor.role(), StationRole::Processor);
        assert_eq!(sink.role(), StationRole::Sink);
        assert_eq!(parking.role(), StationRole::Parking);
        assert_eq!(trash.role(), StationRole::Sink);
    }

    #[test]
    fn test_progress_per_tick() {
        let s = station(StationType::Sorting, Some(ItemType::DirtyJug), Some(ItemType::SortedJug));
        // 16 ms of a 1600 ms cycle is 1%.
        assert_eq!(s.progress_per_tick(16), Fixed::ONE);

        let mut instant = s.clone();
        instant.processing_time_ms = 0;
        assert_eq!(instant.progress_per_tick(16), Fixed::from_num(100));
    }

    #[test]
    fn test_source_starts_then_spawns() {
        let config = station(StationType::Receiving, None, Some(ItemType::DirtyJug));
        let mut state = StationState::default();
        let mut ids = ItemIds::default();

        // First tick only arms the cycle.
        assert_eq!(station_system(&config, &mut state, 16, &mut ids), None);
        assert!(state.is_processing);
        assert_eq!(state.progress, Fixed::ZERO);

        let mut spawned = None;
        for _ in 0..100 {
            if let Some(event) = station_system(&config, &mut state, 16, &mut ids) {
                spawned = Some(event);
                break;
            }
        }

        let Some(StationEvent::Spawned { item, .. }) = spawned else {
            panic!("source never spawned");
        };
        assert_eq!(item.kind, ItemType::DirtyJug);
        assert_eq!(state.output_item, Some(item));
        assert!(!state.is_processing);
        assert_eq!(state.progress, Fixed::ZERO);
        assert_eq!(state.held_item, None);
    }

    #[test]
    fn test_source_waits_while_output_pending() {
        let config = station(StationType::Receiving, None, Some(ItemType::DirtyJug));
        let mut ids = ItemIds::default();
        let mut state = StationState {
            output_item: Some(Item::new(ids.allocate(), ItemType::DirtyJug)),
            ..StationState::default()
        };

        for _ in 0..10 {
            assert_eq!(station_system(&config, &mut state, 16, &mut ids), None);
        }
        assert!(!state.is_processing);
    }

    #[test]
    fn test_processor_idles_without_item() {
        let config = station(
            StationType::Sorting,
            Some(ItemType::DirtyJug),
            Some(ItemType::SortedJug),
        );
        let mut state = StationState::default();
        let mut ids = ItemIds::default();

        for _ in 0..200 {
            assert_eq!(station_system(&config, &mut state, 16, &mut ids), None);
        }
        assert!(state.is_idle());
    }

    #[test]
    fn test_processor_stalls_behind_pending_output() {
        let config = station(
            StationType::Sorting,
            Some(ItemType::DirtyJug),
            Some(ItemType::SortedJug),
        );
        let mut ids = ItemIds::default();
        let finished = Item::new(ids.allocate(), ItemType::SortedJug);
        let waiting = Item::new(ids.allocate(), ItemType::DirtyJug);
        let mut state = StationState {
            output_item: Some(finished),
            ..StationState::default()
        };
        state.load(waiting);
        assert!(!state.can_accept());

        for _ in 0..500 {
            assert_eq!(station_system(&config, &mut state, 16, &mut ids), None);
        }
        assert_eq!(state.output_item, Some(finished));
        assert_eq!(state.held_item, Some(waiting));
        assert_eq!(state.progress, Fixed::ZERO);

        // Taking the output lets the cycle run.
        assert_eq!(state.take_output(), Some(finished));
        let completed = (0..500).find_map(|_| station_system(&config, &mut state, 16, &mut ids));
        assert!(matches!(completed, Some(StationEvent::Completed { item, .. }) if item.id == waiting.id));
    }

    #[test]
    fn test_processor_transforms_in_place() {
        let config = station(
            StationType::Sorting,
            Some(ItemType::DirtyJug),
            Some(ItemType::SortedJug),
        );
        let mut ids = ItemIds::default();
        let jug = Item::new(ids.allocate(), ItemType::DirtyJug);
        let mut state = StationState::default();
        state.load(jug);

        let mut last = Fixed::ZERO;
        let mut ticks = 0;
        let event = loop {
            ticks += 1;
            if let Some(event) = station_system(&config, &mut state, 16, &mut ids) {
                break event;
            }
            assert!(state.progress >= last, "progress went backwards");
            assert!(state.progress < Fixed::from_num(100));
            last = state.progress;
        };

        assert_eq!(ticks, 100);
        assert_eq!(
            event,
            StationEvent::Completed {
                station: StationId(0),
                item: Item::new(jug.id, ItemType::SortedJug),
            }
        );
        assert_eq!(state.held_item, None);
        assert_eq!(state.output_item.map(|i| i.id), Some(jug.id));
        assert!(!state.is_processing);
        assert_eq!(state.progress, Fixed::ZERO);
    }

    #[test]
    fn test_sink_never_processes() {
        let config = station(StationType::Shipping, Some(ItemType::BaggedPellets), None);
        let mut state = StationState::default();
        let mut ids = ItemIds::default();
        assert_eq!(station_system(&config, &mut state, 16, &mut ids), None);
        assert!(state.is_idle());
    }

    #[test]
    fn test_take_output_resets_progress() {
        let mut state = StationState {
            progress: Fixed::from_num(40),
            output_item: Some(Item::new(crate::items::ItemId(1), ItemType::Pellets)),
            ..StationState::default()
        };
        assert!(state.take_output().is_some());
        assert_eq!(state.progress, Fixed::ZERO);
        assert!(state.take_output().is_none());
    }
}
