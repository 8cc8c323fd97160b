//! Core simulation loop.
//!
//! A [`Simulation`] owns one shift of the factory: the validated layout,
//! all mutable state, and the frame clock. It advances in fixed ticks and
//! accepts two kinds of input between ticks: the set of held movement
//! directions and discrete interact commands.
//!
//! # Determinism
//!
//! - No floating-point math (uses fixed-point via [`Fixed`](crate::math::Fixed))
//! - Item ids come from a counter, not the wall clock
//! - Stations are always visited in layout order
//!
//! Two simulations built from the same layout and fed the same commands
//! produce the same [`Simulation::state_hash`] after every tick.
//!
//! # Example
//!
//! ```
//! use rush_core::data::FactoryLayout;
//! use rush_core::movement::{Direction, HeldDirections};
//! use rush_core::simulation::Simulation;
//!
//! let config = FactoryLayout::recycling_plant().validate().unwrap();
//! let mut sim = Simulation::new(config);
//! sim.start(0);
//!
//! sim.set_held_directions(HeldDirections::from_directions([Direction::Left]));
//! sim.tick();
//! assert_eq!(sim.state().tick, 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::config::FactoryConfig;
use crate::error::{GameError, Result};
use crate::event_log::EventLog;
use crate::interaction::{resolve_interaction, InteractionOutcome, InteractionRules};
use crate::items::{Item, ItemIds};
use crate::math::Fixed;
use crate::movement::{movement_system, HeldDirections, PlayerState};
use crate::proximity::nearest_station;
use crate::snapshot::{PlayerSnapshot, SimulationSnapshot, StationSnapshot, TransferSnapshot};
use crate::stations::{
    dispatch_system, station_system, StationEvent, StationId, StationRole, StationState,
    PROGRESS_COMPLETE,
};
use crate::transfer::{ArrivalOutcome, Transfer, TransferEngine};

const WELCOME: [&str; 2] = ["Welcome to Recycled Rush!", "Go to Receiving to pick up jugs."];
const RESET: [&str; 2] = ["Shift reset.", "Ready for production."];
const STARTED: &str = "Shift started.";

/// Whether the shift is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for start. Ticks and interactions are ignored.
    Ready,
    /// Shift in progress.
    Running,
}

/// Named phases of a tick, in execution order.
///
/// | phase | reads | writes |
/// |---|---|---|
/// | `Movement` | held directions, station positions | player position, facing |
/// | `TransferAdvance` | transfers | transfer progress; extracts arrivals |
/// | `Arrivals` | arrivals, target held slots | target held item and cycle |
/// | `Processing` | station states | progress, held and output items |
/// | `Dispatch` | automated outputs, target idleness | outputs, new transfers |
///
/// Dispatch runs after processing, so an output finished this tick can leave
/// in the same tick, and a transfer started this tick first advances on the
/// next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    /// Player movement and collision.
    Movement,
    /// Transfers move forward; finished ones are extracted.
    TransferAdvance,
    /// Extracted transfers are handed to their target stations.
    Arrivals,
    /// Each station's state machine steps once.
    Processing,
    /// Automated stations hand ready output to idle targets.
    Dispatch,
}

impl TickPhase {
    /// Execution order within a tick.
    pub const ORDER: [TickPhase; 5] = [
        TickPhase::Movement,
        TickPhase::TransferAdvance,
        TickPhase::Arrivals,
        TickPhase::Processing,
        TickPhase::Dispatch,
    ];
}

/// Events generated during a simulation tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Fresh items produced by sources.
    pub spawned: Vec<(StationId, Item)>,
    /// Items transformed by processors.
    pub completed: Vec<(StationId, Item)>,
    /// Automated transfers launched, keyed by dispatching station.
    pub transfers_started: Vec<(StationId, Item)>,
    /// Transfers delivered, keyed by receiving station.
    pub arrivals: Vec<(StationId, Item)>,
    /// Items destroyed on arrival at an occupied station.
    pub lost: Vec<(StationId, Item)>,
}

impl TickEvents {
    /// Check if nothing happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty()
            && self.completed.is_empty()
            && self.transfers_started.is_empty()
            && self.arrivals.is_empty()
            && self.lost.is_empty()
    }
}

/// All mutable state of one shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationState {
    /// Ticks run since the last restart.
    pub tick: u64,
    /// Shift phase.
    pub phase: GamePhase,
    /// The player.
    pub player: PlayerState,
    /// Movement keys currently held.
    pub held_directions: HeldDirections,
    /// One entry per station, indexed by [`StationId`].
    pub stations: Vec<StationState>,
    /// In-flight transfers.
    pub transfers: TransferEngine,
    /// Shipped-item score.
    pub score: u64,
    /// Player-facing messages.
    pub log: EventLog,
    /// Item id allocator.
    pub item_ids: ItemIds,
}

impl SimulationState {
    fn fresh(config: &FactoryConfig, log: &[&str]) -> Self {
        let mut event_log = EventLog::new(config.tuning.event_log_capacity);
        event_log.reset(log.iter().copied());

        Self {
            tick: 0,
            phase: GamePhase::Ready,
            player: PlayerState::spawn(config.bounds.center()),
            held_directions: HeldDirections::NONE,
            stations: vec![StationState::default(); config.stations.len()],
            transfers: TransferEngine::new(
                config.tuning.transfer_step,
                config.tuning.arrival_policy,
            ),
            score: 0,
            log: event_log,
            item_ids: ItemIds::default(),
        }
    }

    /// Check station invariants against the layout.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] naming the first violation.
    pub fn check_invariants(&self, config: &FactoryConfig) -> Result<()> {
        if self.stations.len() != config.stations.len() {
            return Err(GameError::InvalidState(format!(
                "{} station states for {} stations",
                self.stations.len(),
                config.stations.len()
            )));
        }

        let complete = Fixed::from_num(PROGRESS_COMPLETE);
        for station in config.stations.iter() {
            let state = &self.stations[station.id.index()];
            let fail = |what: &str| {
                Err(GameError::InvalidState(format!("{}: {what}", station.key)))
            };

            if state.progress < Fixed::ZERO || state.progress >= complete {
                return fail("progress outside 0..100");
            }
            if state.held_item.is_some() && state.output_item.is_some() {
                return fail("held and output slots both filled");
            }
            match station.role() {
                StationRole::Source if state.held_item.is_some() => {
                    return fail("source holds an item");
                }
                StationRole::Source if state.is_processing && state.output_item.is_some() => {
                    return fail("source processing while output is pending");
                }
                StationRole::Processor if state.is_processing && state.held_item.is_none() => {
                    return fail("processing without a held item");
                }
                StationRole::Sink | StationRole::Parking if !state.is_idle() => {
                    return fail("sink or parking holds state");
                }
                _ => {}
            }
            if let Some(item) = state.output_item {
                if Some(item.kind) != station.output {
                    return fail("output kind differs from configured output");
                }
            }
        }

        Ok(())
    }
}

/// One shift of the factory.
///
/// # Tick Order
///
/// Each tick runs the phases in [`TickPhase::ORDER`]:
/// 1. **Movement** - apply held directions, clamp, push out of stations
/// 2. **Transfer advance** - move transfers and extract arrivals
/// 3. **Arrivals** - load arrivals into targets or apply the arrival policy
/// 4. **Processing** - step each station's state machine
/// 5. **Dispatch** - launch transfers from automated stations
#[derive(Debug, Clone)]
pub struct Simulation {
    config: FactoryConfig,
    state: SimulationState,
    clock: SimulationClock,
}

impl Simulation {
    /// Create a simulation in the [`GamePhase::Ready`] phase.
    #[must_use]
    pub fn new(config: FactoryConfig) -> Self {
        let state = SimulationState::fresh(&config, &WELCOME);
        let clock = SimulationClock::new(config.tuning.tick_ms);
        Self {
            config,
            state,
            clock,
        }
    }

    /// The validated layout.
    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access to the state for scripted setups.
    ///
    /// Nothing re-validates the state afterwards; callers are responsible
    /// for keeping it consistent with the layout.
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Begin the shift, arming the clock at `now_ms`.
    ///
    /// Starting a running shift only re-arms the clock.
    pub fn start(&mut self, now_ms: u64) {
        self.clock.start(now_ms);
        if self.state.phase == GamePhase::Running {
            return;
        }
        self.state.phase = GamePhase::Running;
        self.state.log.push(STARTED);
        tracing::info!(now_ms, "Shift started");
    }

    /// Throw away the shift and return to [`GamePhase::Ready`].
    pub fn restart(&mut self) {
        self.state = SimulationState::fresh(&self.config, &RESET);
        self.clock.stop();
        tracing::info!("Shift reset");
    }

    /// Replace the set of held movement directions.
    pub fn set_held_directions(&mut self, held: HeldDirections) {
        self.state.held_directions = held;
    }

    /// Station currently within interaction range of the player.
    #[must_use]
    pub fn nearest_station(&self) -> Option<StationId> {
        nearest_station(
            &self.config.stations,
            self.state.player.position,
            self.config.tuning.interaction_radius,
        )
    }

    /// Handle one interact command.
    pub fn interact(&mut self) -> InteractionOutcome {
        if self.state.phase != GamePhase::Running {
            return InteractionOutcome::NotRunning;
        }
        let Some(id) = self.nearest_station() else {
            return InteractionOutcome::NothingInRange;
        };

        let station = self.config.stations.get(id);
        let rules = InteractionRules {
            heavy_items: &self.config.heavy_items,
            ship_reward: self.config.tuning.ship_reward,
        };
        let outcome = resolve_interaction(
            station,
            &mut self.state.stations[id.index()],
            &mut self.state.player,
            rules,
        );

        if let InteractionOutcome::Shipped { item, reward } = outcome {
            self.state.score += u64::from(reward);
            tracing::info!(item = %item.id, score = self.state.score, "Item shipped");
        }
        if let Some(message) = outcome.message() {
            self.state.log.push(message);
        }
        tracing::debug!(
            station = %station.key,
            accepted = outcome.accepted(),
            ?outcome,
            "Interaction resolved"
        );

        outcome
    }

    /// Advance one tick if the clock says one is due at `now_ms`.
    pub fn frame(&mut self, now_ms: u64) -> Option<TickEvents> {
        if self.clock.poll(now_ms) {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// Does nothing while the shift is not running.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();
        if self.state.phase != GamePhase::Running {
            return events;
        }

        let mut arrived = Vec::new();
        for phase in TickPhase::ORDER {
            match phase {
                TickPhase::Movement => self.run_movement(),
                TickPhase::TransferAdvance => arrived = self.state.transfers.advance(),
                TickPhase::Arrivals => {
                    self.run_arrivals(std::mem::take(&mut arrived), &mut events);
                }
                TickPhase::Processing => self.run_processing(&mut events),
                TickPhase::Dispatch => {
                    events.transfers_started = dispatch_system(
                        &self.config.stations,
                        &mut self.state.stations,
                        &mut self.state.transfers,
                    );
                }
            }
        }

        self.state.tick += 1;

        #[cfg(feature = "debug-validation")]
        {
            if let Err(err) = self.state.check_invariants(&self.config) {
                tracing::error!(tick = self.state.tick, %err, "Simulation invariant violated");
                panic!("simulation invariant violated at tick {}: {err}", self.state.tick);
            }
        }

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.state.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    fn run_movement(&mut self) {
        let params = self.config.movement();
        movement_system(
            &mut self.state.player,
            self.state.held_directions.intent(),
            &params,
            &self.config.stations,
        );
    }

    fn run_arrivals(&mut self, arrived: Vec<Transfer>, events: &mut TickEvents) {
        if arrived.is_empty() {
            return;
        }
        let outcomes = self
            .state
            .transfers
            .resolve_arrivals(arrived, &mut self.state.stations);
        for outcome in outcomes {
            match outcome {
                ArrivalOutcome::Delivered { station, item } => events.arrivals.push((station, item)),
                ArrivalOutcome::Lost { station, item } => events.lost.push((station, item)),
                ArrivalOutcome::Parked { .. } => {}
            }
        }
    }

    fn run_processing(&mut self, events: &mut TickEvents) {
        let tick_ms = self.config.tuning.tick_ms;
        for config in self.config.stations.iter() {
            let state = &mut self.state.stations[config.id.index()];
            match station_system(config, state, tick_ms, &mut self.state.item_ids) {
                Some(StationEvent::Spawned { station, item }) => {
                    tracing::trace!(station = %config.key, item = %item.id, "Item spawned");
                    events.spawned.push((station, item));
                }
                Some(StationEvent::Completed { station, item }) => {
                    tracing::trace!(station = %config.key, item = %item.id, kind = %item.kind, "Processing complete");
                    events.completed.push((station, item));
                }
                None => {}
            }
        }
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Used to compare runs for determinism.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.state.hash(&mut hasher);
        hasher.finish()
    }

    /// Presentation view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SimulationSnapshot {
        let state = &self.state;
        let stations = &self.config.stations;

        SimulationSnapshot {
            tick: state.tick,
            phase: state.phase,
            score: state.score,
            player: PlayerSnapshot {
                position: state.player.position.to_f64().into(),
                facing: state.player.facing,
                held_item: state.player.held_item,
                in_forklift: state.player.in_forklift,
            },
            nearby_station: self
                .nearest_station()
                .map(|id| stations.get(id).key.clone()),
            stations: stations
                .iter()
                .map(|config| {
                    let st = &state.stations[config.id.index()];
                    StationSnapshot {
                        id: config.key.clone(),
                        label: config.kind.label().to_string(),
                        position: config.position.to_f64().into(),
                        color: config.color.clone(),
                        is_processing: st.is_processing,
                        progress: st.progress_percent(),
                        held_item: st.held_item,
                        output_item: st.output_item,
                        automated: config.is_automated(),
                    }
                })
                .collect(),
            transfers: state
                .transfers
                .iter()
                .map(|t| TransferSnapshot {
                    id: t.id.0,
                    item: t.item,
                    position: t.position().to_f64().into(),
                    target: stations.get(t.target).key.clone(),
                    progress: t.progress.to_num::<f64>(),
                })
                .collect(),
            log: state.log.iter().map(str::to_string).collect(),
        }
    }
}
