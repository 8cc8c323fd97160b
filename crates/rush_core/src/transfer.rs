//! Automated item transfers between stations.
//!
//! A [`Transfer`] owns its item from the moment an automated station
//! dispatches it until it arrives. Travel is a straight line at a fixed
//! progress step per tick; any curved path drawn by a renderer is cosmetic
//! and does not change arrival timing.

use serde::{Deserialize, Serialize};

use crate::items::Item;
use crate::math::{Fixed, Vec2Fixed};
use crate::stations::{StationId, StationState};

/// Unique identifier for transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransferId(pub u64);

/// What happens when a transfer reaches a station that is still holding an
/// item or a finished output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArrivalPolicy {
    /// The arriving item is destroyed and a warning is logged.
    #[default]
    Drop,
    /// The transfer waits at the destination and retries every tick.
    Hold,
}

/// An item in flight between two stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transfer {
    /// Transfer identifier.
    pub id: TransferId,
    /// Carried item.
    pub item: Item,
    /// Dispatching station position.
    pub from: Vec2Fixed,
    /// Destination station position.
    pub to: Vec2Fixed,
    /// Destination station.
    pub target: StationId,
    /// Travel progress, `0..=1`.
    pub progress: Fixed,
}

impl Transfer {
    /// Current position along the straight path.
    #[must_use]
    pub fn position(&self) -> Vec2Fixed {
        self.from.lerp(self.to, self.progress)
    }

    /// Whether the transfer has reached its destination.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.progress >= Fixed::ONE
    }
}

/// Result of resolving one arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// The item was loaded into the target and processing started.
    Delivered {
        /// Receiving station.
        station: StationId,
        /// Delivered item.
        item: Item,
    },
    /// The target was occupied and the item was destroyed.
    Lost {
        /// Occupied station.
        station: StationId,
        /// Destroyed item.
        item: Item,
    },
    /// The target was occupied and the transfer is waiting to retry.
    Parked {
        /// Occupied station.
        station: StationId,
        /// Waiting item.
        item: Item,
    },
}

/// Owner of all in-flight transfers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferEngine {
    in_flight: Vec<Transfer>,
    next_id: u64,
    step: Fixed,
    policy: ArrivalPolicy,
}

impl TransferEngine {
    /// Create an engine advancing transfers by `step` per tick.
    #[must_use]
    pub fn new(step: Fixed, policy: ArrivalPolicy) -> Self {
        Self {
            in_flight: Vec::new(),
            next_id: 1,
            step,
            policy,
        }
    }

    /// Start a new transfer at progress 0.
    pub fn launch(
        &mut self,
        item: Item,
        from: Vec2Fixed,
        to: Vec2Fixed,
        target: StationId,
    ) -> TransferId {
        let id = TransferId(self.next_id);
        self.next_id += 1;
        self.in_flight.push(Transfer {
            id,
            item,
            from,
            to,
            target,
            progress: Fixed::ZERO,
        });
        id
    }

    /// Advance every transfer and extract those that arrived this tick.
    ///
    /// Progress is capped at 1. Arrivals keep their launch order.
    pub fn advance(&mut self) -> Vec<Transfer> {
        for transfer in &mut self.in_flight {
            transfer.progress = (transfer.progress + self.step).min(Fixed::ONE);
        }

        let (arrived, in_flight): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(Transfer::has_arrived);
        self.in_flight = in_flight;
        arrived
    }

    /// Hand arrivals to their target stations.
    ///
    /// A target accepts an arrival only when both its held and output slots
    /// are empty; the item is loaded and a fresh cycle starts. Occupied
    /// targets are handled per the configured [`ArrivalPolicy`].
    pub fn resolve_arrivals(
        &mut self,
        arrivals: Vec<Transfer>,
        states: &mut [StationState],
    ) -> Vec<ArrivalOutcome> {
        let mut outcomes = Vec::with_capacity(arrivals.len());

        for transfer in arrivals {
            let station = transfer.target;
            let Some(target) = states.get_mut(station.index()) else {
                tracing::warn!(target = station.0, "Transfer addressed to missing station");
                outcomes.push(ArrivalOutcome::Lost {
                    station,
                    item: transfer.item,
                });
                continue;
            };

            if target.can_accept() {
                target.load(transfer.item);
                tracing::debug!(station = station.0, item = %transfer.item.id, "Transfer arrived");
                outcomes.push(ArrivalOutcome::Delivered {
                    station,
                    item: transfer.item,
                });
                continue;
            }

            match self.policy {
                ArrivalPolicy::Drop => {
                    tracing::warn!(
                        station = station.0,
                        item = %transfer.item.id,
                        kind = %transfer.item.kind,
                        "Transfer arrived but station full, item lost"
                    );
                    outcomes.push(ArrivalOutcome::Lost {
                        station,
                        item: transfer.item,
                    });
                }
                ArrivalPolicy::Hold => {
                    self.in_flight.push(transfer);
                    outcomes.push(ArrivalOutcome::Parked {
                        station,
                        item: transfer.item,
                    });
                }
            }
        }

        outcomes
    }

    /// Iterate in-flight transfers.
    pub fn iter(&self) -> impl Iterator<Item = &Transfer> {
        self.in_flight.iter()
    }

    /// Number of in-flight transfers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    /// Check if nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Configured arrival policy.
    #[must_use]
    pub const fn policy(&self) -> ArrivalPolicy {
        self.policy
    }

    /// Progress gained per tick.
    #[must_use]
    pub const fn step(&self) -> Fixed {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemId, ItemType};

    fn step() -> Fixed {
        Fixed::from_num(15) / Fixed::from_num(1000)
    }

    fn flakes(id: u64) -> Item {
        Item::new(ItemId(id), ItemType::Flakes)
    }

    #[test]
    fn test_position_interpolates_linearly() {
        let mut transfer = Transfer {
            id: TransferId(1),
            item: flakes(1),
            from: Vec2Fixed::from_int(650, 200),
            to: Vec2Fixed::from_int(650, 400),
            target: StationId(0),
            progress: Fixed::ZERO,
        };
        assert_eq!(transfer.position(), transfer.from);

        transfer.progress = Fixed::from_num(0.5);
        assert_eq!(transfer.position(), Vec2Fixed::from_int(650, 300));

        transfer.progress = Fixed::ONE;
        assert_eq!(transfer.position(), transfer.to);
    }

    #[test]
    fn test_advance_extracts_arrivals() {
        let mut engine = TransferEngine::new(step(), ArrivalPolicy::Drop);
        engine.launch(flakes(1), Vec2Fixed::ZERO, Vec2Fixed::from_int(0, 200), StationId(0));

        let arrived = engine.advance();
        assert!(arrived.is_empty());
        assert_eq!(engine.len(), 1);

        let mut ticks = 1;
        let arrived = loop {
            ticks += 1;
            let arrived = engine.advance();
            if !arrived.is_empty() {
                break arrived;
            }
            assert!(ticks < 1000, "transfer never arrived");
        };

        // ~1 second of 16 ms ticks.
        assert!((66..=68).contains(&ticks), "arrived after {ticks} ticks");
        assert_eq!(arrived[0].progress, Fixed::ONE);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_arrival_into_empty_station_starts_processing() {
        let mut engine = TransferEngine::new(step(), ArrivalPolicy::Drop);
        let mut states = vec![StationState::default()];
        let transfer = Transfer {
            id: TransferId(1),
            item: flakes(4),
            from: Vec2Fixed::ZERO,
            to: Vec2Fixed::ZERO,
            target: StationId(0),
            progress: Fixed::ONE,
        };

        let outcomes = engine.resolve_arrivals(vec![transfer], &mut states);
        assert_eq!(
            outcomes,
            vec![ArrivalOutcome::Delivered {
                station: StationId(0),
                item: flakes(4)
            }]
        );
        assert_eq!(states[0].held_item, Some(flakes(4)));
        assert!(states[0].is_processing);
        assert_eq!(states[0].progress, Fixed::ZERO);
    }

    #[test]
    fn test_arrival_into_occupied_station_drops() {
        let mut engine = TransferEngine::new(step(), ArrivalPolicy::Drop);
        let mut states = vec![StationState::default()];
        states[0].load(flakes(1));
        let transfer = Transfer {
            id: TransferId(1),
            item: flakes(2),
            from: Vec2Fixed::ZERO,
            to: Vec2Fixed::ZERO,
            target: StationId(0),
            progress: Fixed::ONE,
        };

        let outcomes = engine.resolve_arrivals(vec![transfer], &mut states);
        assert!(matches!(outcomes[0], ArrivalOutcome::Lost { .. }));
        assert_eq!(states[0].held_item, Some(flakes(1)));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_pending_output_counts_as_occupied() {
        let pending = StationState {
            output_item: Some(Item::new(ItemId(9), ItemType::MeltedStrands)),
            ..StationState::default()
        };
        let transfer = Transfer {
            id: TransferId(1),
            item: flakes(2),
            from: Vec2Fixed::ZERO,
            to: Vec2Fixed::ZERO,
            target: StationId(0),
            progress: Fixed::ONE,
        };

        let mut drop = TransferEngine::new(step(), ArrivalPolicy::Drop);
        let mut states = vec![pending.clone()];
        let outcomes = drop.resolve_arrivals(vec![transfer], &mut states);
        assert!(matches!(outcomes[0], ArrivalOutcome::Lost { .. }));
        assert_eq!(states[0], pending);

        let mut hold = TransferEngine::new(step(), ArrivalPolicy::Hold);
        let mut states = vec![pending.clone()];
        let outcomes = hold.resolve_arrivals(vec![transfer], &mut states);
        assert!(matches!(outcomes[0], ArrivalOutcome::Parked { .. }));
        assert_eq!(states[0], pending);
        assert_eq!(hold.len(), 1);
    }

    #[test]
    fn test_hold_policy_parks_and_retries() {
        let mut engine = TransferEngine::new(step(), ArrivalPolicy::Hold);
        let mut states = vec![StationState::default()];
        states[0].load(flakes(1));
        let transfer = Transfer {
            id: TransferId(1),
            item: flakes(2),
            from: Vec2Fixed::ZERO,
            to: Vec2Fixed::ZERO,
            target: StationId(0),
            progress: Fixed::ONE,
        };

        let outcomes = engine.resolve_arrivals(vec![transfer], &mut states);
        assert!(matches!(outcomes[0], ArrivalOutcome::Parked { .. }));
        assert_eq!(engine.len(), 1);

        // Target frees up; the parked transfer lands on the next tick.
        states[0] = StationState::default();
        let arrived = engine.advance();
        assert_eq!(arrived.len(), 1);
        let outcomes = engine.resolve_arrivals(arrived, &mut states);
        assert!(matches!(outcomes[0], ArrivalOutcome::Delivered { .. }));
        assert_eq!(states[0].held_item, Some(flakes(2)));
    }
}
