//! Replay checks for the factory simulation.
//!
//! A shift driven by the same input script must land on the same
//! [`Simulation::state_hash`] every time, whether the copies run one after
//! another or side by side on threads. Positions use fixed-point math and
//! stations are walked in layout order, so nothing here should ever differ.

use std::thread;

use rush_core::movement::HeldDirections;
use rush_core::simulation::Simulation;

/// Final hashes of several copies of one shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// One hash per copy, in run order.
    pub hashes: Vec<u64>,
    /// Ticks each copy ran.
    pub ticks: u64,
}

impl ReplayReport {
    /// Every copy finished on the same hash.
    #[must_use]
    pub fn matches(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// # Panics
    ///
    /// Panics with every hash when the copies disagree.
    pub fn assert_matches(&self) {
        assert!(
            self.matches(),
            "{} copies disagreed after {} ticks: {:?}",
            self.hashes.len(),
            self.ticks,
            self.hashes
        );
    }
}

fn run_copy(setup: impl Fn() -> Simulation, ticks: u64) -> u64 {
    let mut sim = setup();
    for _ in 0..ticks {
        sim.tick();
    }
    sim.state_hash()
}

/// Run `copies` shifts back to back.
pub fn replay_in_sequence<F>(setup: F, copies: usize, ticks: u64) -> ReplayReport
where
    F: Fn() -> Simulation,
{
    ReplayReport {
        hashes: (0..copies).map(|_| run_copy(&setup, ticks)).collect(),
        ticks,
    }
}

/// Run `copies` shifts at once, one scoped thread each.
///
/// # Panics
///
/// Panics if a shift panics on its thread.
pub fn replay_on_threads<F>(setup: F, copies: usize, ticks: u64) -> ReplayReport
where
    F: Fn() -> Simulation + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..copies)
            .map(|_| s.spawn(|| run_copy(&setup, ticks)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("shift thread panicked"))
            .collect()
    });

    ReplayReport { hashes, ticks }
}

/// First tick at which two copies of the shift hash differently.
pub fn find_first_divergence<F>(setup: F, ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut a = setup();
    let mut b = setup();

    if a.state_hash() != b.state_hash() {
        return Some(0);
    }

    for tick in 1..=ticks {
        a.tick();
        b.tick();

        if a.state_hash() != b.state_hash() {
            tracing::debug!(tick, "Shifts diverged");
            return Some(tick);
        }
    }

    None
}

/// One step of a recorded input script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    /// Replace the held movement directions.
    Hold(HeldDirections),
    /// Press interact.
    Interact,
    /// Run this many ticks.
    Tick(u16),
}

/// Apply a script to a simulation.
pub fn replay(sim: &mut Simulation, script: &[ScriptStep]) {
    for step in script {
        match *step {
            ScriptStep::Hold(held) => sim.set_held_directions(held),
            ScriptStep::Interact => {
                sim.interact();
            }
            ScriptStep::Tick(n) => {
                for _ in 0..n {
                    sim.tick();
                }
            }
        }
    }
}

/// Proptest strategies for determinism and invariant testing.
pub mod strategies {
    use proptest::prelude::*;
    use rush_core::items::ItemType;
    use rush_core::movement::{Direction, HeldDirections};
    use rush_core::transfer::ArrivalPolicy;

    use super::ScriptStep;

    /// Generate a cardinal direction.
    pub fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    /// Generate any combination of held directions.
    pub fn arb_held_directions() -> impl Strategy<Value = HeldDirections> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(up, down, left, right)| HeldDirections {
                up,
                down,
                left,
                right,
            },
        )
    }

    /// Generate an item kind.
    pub fn arb_item_type() -> impl Strategy<Value = ItemType> {
        proptest::sample::select(ItemType::ALL.to_vec())
    }

    /// Generate an arrival policy.
    pub fn arb_arrival_policy() -> impl Strategy<Value = ArrivalPolicy> {
        prop_oneof![Just(ArrivalPolicy::Drop), Just(ArrivalPolicy::Hold)]
    }

    /// Generate one script step, biased towards ticking.
    pub fn arb_script_step() -> impl Strategy<Value = ScriptStep> {
        prop_oneof![
            2 => arb_held_directions().prop_map(ScriptStep::Hold),
            2 => Just(ScriptStep::Interact),
            3 => (1u16..120).prop_map(ScriptStep::Tick),
        ]
    }

    /// Generate a script of up to `max_len` steps.
    pub fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<ScriptStep>> {
        prop::collection::vec(arb_script_step(), 1..max_len)
    }
}
