//! Map and tuning sections of a layout file.
//!
//! Every field has a default so layouts only need to spell out what they
//! change.

use serde::{Deserialize, Serialize};

use crate::transfer::ArrivalPolicy;

/// Floor dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    /// Width in map units.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height in map units.
    #[serde(default = "default_height")]
    pub height: u32,
}

const fn default_width() -> u32 {
    800
}

const fn default_height() -> u32 {
    600
}

impl Default for MapData {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Numeric tuning in integer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningData {
    /// Tick length in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u32,

    /// Player movement per tick.
    #[serde(default = "default_movement_speed")]
    pub movement_speed: u32,

    /// Interaction reach.
    #[serde(default = "default_interaction_radius")]
    pub interaction_radius: u32,

    /// Player/station collision radius.
    #[serde(default = "default_collision_radius")]
    pub collision_radius: u32,

    /// Distance the player keeps from the map edge.
    #[serde(default = "default_player_margin")]
    pub player_margin: u32,

    /// Transfer progress per tick, in thousandths of the whole trip.
    #[serde(default = "default_transfer_step")]
    pub transfer_step_per_mille: u32,

    /// Score per shipped item.
    #[serde(default = "default_ship_reward")]
    pub ship_reward: u32,

    /// Number of event-log lines kept.
    #[serde(default = "default_log_capacity")]
    pub event_log_capacity: u32,

    /// Handling of transfers arriving at an occupied station.
    #[serde(default)]
    pub arrival_policy: ArrivalPolicy,
}

const fn default_tick_ms() -> u32 {
    16
}

const fn default_movement_speed() -> u32 {
    6
}

const fn default_interaction_radius() -> u32 {
    80
}

const fn default_collision_radius() -> u32 {
    40
}

const fn default_player_margin() -> u32 {
    20
}

const fn default_transfer_step() -> u32 {
    15
}

const fn default_ship_reward() -> u32 {
    100
}

const fn default_log_capacity() -> u32 {
    5
}

impl Default for TuningData {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            movement_speed: default_movement_speed(),
            interaction_radius: default_interaction_radius(),
            collision_radius: default_collision_radius(),
            player_margin: default_player_margin(),
            transfer_step_per_mille: default_transfer_step(),
            ship_reward: default_ship_reward(),
            event_log_capacity: default_log_capacity(),
            arrival_policy: ArrivalPolicy::Drop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_uses_defaults() {
        let tuning: TuningData = ron::from_str("()").unwrap();
        assert_eq!(tuning, TuningData::default());

        let map: MapData = ron::from_str("(width: 1024)").unwrap();
        assert_eq!(map.width, 1024);
        assert_eq!(map.height, 600);
    }

    #[test]
    fn test_arrival_policy_override() {
        let tuning: TuningData = ron::from_str("(arrival_policy: Hold)").unwrap();
        assert_eq!(tuning.arrival_policy, ArrivalPolicy::Hold);
        assert_eq!(tuning.tick_ms, 16);
    }
}
