//! Resolution of the player's interact command.
//!
//! Each interact is checked against the nearest station. The first
//! matching rule wins:
//!
//! 1. Forklift parking toggles vehicle mode (refused while carrying).
//! 2. Carrying an item into an empty station loads, ships or discards it.
//! 3. Empty-handed at a station with output picks the output up, subject to
//!    automation and forklift gating.
//!
//! Rejections never change state; they only produce a message.

use serde::{Deserialize, Serialize};

use crate::items::{HeavyItems, Item, ItemType};
use crate::movement::PlayerState;
use crate::stations::{StationConfig, StationRole, StationState, StationType};

/// Result of one interact command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// The shift has not started.
    NotRunning,
    /// No station within interaction range.
    NothingInRange,
    /// In range, but no rule applies (e.g. station busy).
    NoEffect,
    /// Player climbed into the forklift.
    EnteredForklift,
    /// Player left the forklift.
    ExitedForklift,
    /// Forklift toggle refused while carrying.
    ForkliftBlocked,
    /// Item loaded into a processing station.
    Loaded {
        /// Loaded item.
        item: Item,
        /// Receiving station kind.
        station: StationType,
    },
    /// Item shipped for score.
    Shipped {
        /// Shipped item.
        item: Item,
        /// Points awarded.
        reward: u32,
    },
    /// Item destroyed in a trash bin.
    Discarded {
        /// Destroyed item.
        item: Item,
    },
    /// The station takes a different input.
    WrongItem {
        /// Configured input.
        expected: ItemType,
        /// What the player offered.
        offered: ItemType,
    },
    /// The station takes no input at all.
    NotAccepted {
        /// What the player offered.
        offered: ItemType,
    },
    /// Pickup refused on an automated station.
    Automated,
    /// Heavy output while on foot.
    TooHeavy {
        /// Output kind.
        item_kind: ItemType,
    },
    /// Light output while in the forklift.
    TooDelicate {
        /// Output kind.
        item_kind: ItemType,
    },
    /// Output moved to the player.
    PickedUp {
        /// Picked up item.
        item: Item,
    },
}

impl InteractionOutcome {
    /// Whether the command changed simulation state.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        matches!(
            self,
            Self::EnteredForklift
                | Self::ExitedForklift
                | Self::Loaded { .. }
                | Self::Shipped { .. }
                | Self::Discarded { .. }
                | Self::PickedUp { .. }
        )
    }

    /// Event-log line for this outcome, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let text = match self {
            Self::NotRunning | Self::NothingInRange | Self::NoEffect => return None,
            Self::EnteredForklift => "Entered Forklift.".to_string(),
            Self::ExitedForklift => "Exited Forklift.".to_string(),
            Self::ForkliftBlocked => "Drop your item before entering/exiting forklift!".to_string(),
            Self::Loaded { item, station } => format!("Loaded {} into {}", item.kind, station),
            Self::Shipped { item, reward } => format!("Shipped {}! +{} Points", item.kind, reward),
            Self::Discarded { item } => format!("Discarded {}", item.kind),
            Self::WrongItem { expected, offered } => {
                format!("This station expects {expected}, not {offered}")
            }
            Self::NotAccepted { offered } => format!("This station does not accept {offered}"),
            Self::Automated => "System Automated. Do not touch!".to_string(),
            Self::TooHeavy { .. } => "Too heavy! Use the Forklift.".to_string(),
            Self::TooDelicate { .. } => "Too delicate! Exit Forklift to pickup.".to_string(),
            Self::PickedUp { item } => format!("Picked up {}", item.kind),
        };
        Some(text)
    }
}

/// Rules that are fixed for a whole shift.
#[derive(Debug, Clone, Copy)]
pub struct InteractionRules<'a> {
    /// Kinds that need the forklift.
    pub heavy_items: &'a HeavyItems,
    /// Points per shipment.
    pub ship_reward: u32,
}

/// Apply one interact command against `station`.
///
/// Score is not touched here; callers add the reward of a
/// [`InteractionOutcome::Shipped`] outcome.
pub fn resolve_interaction(
    station: &StationConfig,
    state: &mut StationState,
    player: &mut PlayerState,
    rules: InteractionRules<'_>,
) -> InteractionOutcome {
    if station.role() == StationRole::Parking {
        if player.held_item.is_some() {
            return InteractionOutcome::ForkliftBlocked;
        }
        player.in_forklift = !player.in_forklift;
        return if player.in_forklift {
            InteractionOutcome::EnteredForklift
        } else {
            InteractionOutcome::ExitedForklift
        };
    }

    if let Some(item) = player.held_item {
        if state.held_item.is_some() || state.output_item.is_some() {
            return InteractionOutcome::NoEffect;
        }
        return hand_over(station, state, player, item, rules.ship_reward);
    }

    let Some(output) = state.output_item else {
        return InteractionOutcome::NoEffect;
    };
    if station.is_automated() {
        return InteractionOutcome::Automated;
    }
    let heavy = rules.heavy_items.contains(output.kind);
    if heavy && !player.in_forklift {
        return InteractionOutcome::TooHeavy { item_kind: output.kind };
    }
    if !heavy && player.in_forklift {
        return InteractionOutcome::TooDelicate { item_kind: output.kind };
    }

    player.held_item = state.take_output();
    InteractionOutcome::PickedUp { item: output }
}

fn hand_over(
    station: &StationConfig,
    state: &mut StationState,
    player: &mut PlayerState,
    item: Item,
    reward: u32,
) -> InteractionOutcome {
    let role = station.role();
    match station.input {
        Some(expected) if expected == item.kind => {
            player.held_item = None;
            if role == StationRole::Sink {
                InteractionOutcome::Shipped { item, reward }
            } else {
                state.load(item);
                InteractionOutcome::Loaded {
                    item,
                    station: station.kind,
                }
            }
        }
        Some(expected) => InteractionOutcome::WrongItem {
            expected,
            offered: item.kind,
        },
        None if role == StationRole::Sink => {
            player.held_item = None;
            InteractionOutcome::Discarded { item }
        }
        None => InteractionOutcome::NotAccepted { offered: item.kind },
    }
}
