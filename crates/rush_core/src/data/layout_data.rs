//! Complete factory layouts and their validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{MapData, StationData, TuningData};
use crate::config::{FactoryConfig, Tuning};
use crate::error::{GameError, Result};
use crate::items::{HeavyItems, ItemType};
use crate::math::{Fixed, Vec2Fixed};
use crate::movement::MapBounds;
use crate::stations::{StationConfig, StationId, StationRole, StationTable, StationType};

/// Largest accepted map side and radius, in pixels.
///
/// Squared distances across the diagonal of a map this size stay well inside
/// the integer range of [`Fixed`].
pub const MAX_EXTENT: u32 = 16_384;

/// A factory floor as loaded from RON.
///
/// # Example RON
///
/// ```ron
/// FactoryLayout(
///     map: (width: 800, height: 600),
///     tuning: (arrival_policy: Hold),
///     heavy_items: [SortedJug, Pellets, BaggedPellets],
///     stations: [
///         StationData(id: "receiving-1", kind: Receiving, position: (50, 100),
///             output: Some(DirtyJug), processing_time_ms: 3000),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryLayout {
    /// Floor dimensions.
    #[serde(default)]
    pub map: MapData,

    /// Numeric tuning.
    #[serde(default)]
    pub tuning: TuningData,

    /// Item kinds that need the forklift.
    #[serde(default = "default_heavy_items")]
    pub heavy_items: Vec<ItemType>,

    /// Stations in layout order.
    pub stations: Vec<StationData>,
}

fn default_heavy_items() -> Vec<ItemType> {
    ItemType::DEFAULT_HEAVY.to_vec()
}

impl FactoryLayout {
    /// Parse a layout from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParseError`] if the text is not a valid layout.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::DataParseError(e.to_string()))
    }

    /// The stock recycling plant: receiving through shipping plus a forklift
    /// bay in the middle of the floor.
    #[must_use]
    pub fn recycling_plant() -> Self {
        use ItemType::{
            BaggedPellets, CleanJug, DirtyJug, Flakes, MeltedStrands, Pellets, SortedJug,
        };
        use StationType::{
            ForkliftParking, Melting, Packaging, Pelletizing, Receiving, Shipping, Shredding,
            Sorting, Washing,
        };

        let stations = vec![
            StationData::new("receiving-1", Receiving, (50, 100), None, Some(DirtyJug), 3000, "bg-yellow-600"),
            StationData::new("sorting-1", Sorting, (250, 100), Some(DirtyJug), Some(SortedJug), 1500, "bg-orange-500"),
            StationData::new("washing-1", Washing, (450, 100), Some(SortedJug), Some(CleanJug), 2000, "bg-blue-500"),
            StationData::new("shredder-1", Shredding, (650, 200), Some(CleanJug), Some(Flakes), 1000, "bg-gray-500")
                .forwarding_to("extruder-1"),
            StationData::new("extruder-1", Melting, (650, 400), Some(Flakes), Some(MeltedStrands), 3000, "bg-red-600")
                .forwarding_to("pelletizer-1"),
            StationData::new("pelletizer-1", Pelletizing, (450, 500), Some(MeltedStrands), Some(Pellets), 1500, "bg-green-500"),
            StationData::new("packaging-1", Packaging, (250, 500), Some(Pellets), Some(BaggedPellets), 2000, "bg-indigo-600"),
            StationData::new("shipping-1", Shipping, (50, 500), Some(BaggedPellets), None, 500, "bg-emerald-700"),
            StationData::new("parking-1", ForkliftParking, (350, 300), None, None, 0, "bg-yellow-400"),
        ];

        Self {
            map: MapData::default(),
            tuning: TuningData::default(),
            heavy_items: default_heavy_items(),
            stations,
        }
    }

    /// Check the layout and build the run-time configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: bad tuning, an empty or oversized
    /// station list, duplicate keys, stations off the map, role mismatches,
    /// or a broken automation link.
    pub fn validate(&self) -> Result<FactoryConfig> {
        let tuning = self.validate_tuning()?;
        let bounds = MapBounds {
            width: self.map.width,
            height: self.map.height,
            margin: self.tuning.player_margin,
        };

        if self.stations.is_empty() {
            return Err(GameError::EmptyLayout);
        }
        if u16::try_from(self.stations.len()).is_err() {
            return Err(GameError::InvalidState(format!(
                "{} stations exceed the supported maximum",
                self.stations.len()
            )));
        }

        let mut ids: HashMap<&str, StationId> = HashMap::with_capacity(self.stations.len());
        for (index, station) in self.stations.iter().enumerate() {
            let id = StationId(u16::try_from(index).map_err(|_| {
                GameError::InvalidState("station index overflow".to_string())
            })?);
            if ids.insert(station.id.as_str(), id).is_some() {
                return Err(GameError::DuplicateStationId(station.id.clone()));
            }
        }

        let mut configs = Vec::with_capacity(self.stations.len());
        for (index, station) in self.stations.iter().enumerate() {
            let (x, y) = station.position;
            if !bounds.contains(x, y) {
                return Err(GameError::StationOutOfBounds {
                    station: station.id.clone(),
                    x,
                    y,
                    width: bounds.width,
                    height: bounds.height,
                });
            }

            let auto_next = match &station.auto_next {
                Some(target) => {
                    let Some(&target_id) = ids.get(target.as_str()) else {
                        return Err(GameError::UnknownAutoTarget {
                            station: station.id.clone(),
                            target: target.clone(),
                        });
                    };
                    if target == &station.id {
                        return Err(GameError::SelfForwarding(station.id.clone()));
                    }
                    Some(target_id)
                }
                None => None,
            };

            configs.push(StationConfig {
                id: ids[station.id.as_str()],
                key: station.id.clone(),
                kind: station.kind,
                position: Vec2Fixed::from_int(x, y),
                input: station.input,
                output: station.output,
                processing_time_ms: station.processing_time_ms,
                color: station.color.clone(),
                auto_next,
            });
            debug_assert_eq!(configs[index].id.index(), index);
        }

        for config in &configs {
            check_role(config)?;
            if let Some(target) = config.auto_next {
                check_forward(config, &configs[target.index()])?;
            }
        }

        tracing::debug!(stations = configs.len(), "Factory layout validated");

        Ok(FactoryConfig {
            stations: StationTable::from_validated(configs),
            tuning,
            heavy_items: HeavyItems::new(self.heavy_items.iter().copied()),
            bounds,
        })
    }

    fn validate_tuning(&self) -> Result<Tuning> {
        let t = &self.tuning;
        let invalid = |field: &'static str, reason: &str| GameError::InvalidTuning {
            field,
            reason: reason.to_string(),
        };

        if t.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be greater than zero"));
        }
        if t.interaction_radius == 0 {
            return Err(invalid("interaction_radius", "must be greater than zero"));
        }
        if t.collision_radius >= t.interaction_radius {
            return Err(invalid(
                "collision_radius",
                "must be smaller than interaction_radius",
            ));
        }
        if !(1..=1000).contains(&t.transfer_step_per_mille) {
            return Err(invalid("transfer_step_per_mille", "must be within 1..=1000"));
        }
        if t.event_log_capacity == 0 {
            return Err(invalid("event_log_capacity", "must be greater than zero"));
        }
        if self.map.width == 0 || self.map.height == 0 {
            return Err(invalid("map", "width and height must be greater than zero"));
        }
        if self.map.width > MAX_EXTENT || self.map.height > MAX_EXTENT {
            return Err(invalid("map", "width and height must not exceed 16384"));
        }
        if t.interaction_radius > MAX_EXTENT {
            return Err(invalid("interaction_radius", "must not exceed 16384"));
        }
        if t.movement_speed >= self.map.width.min(self.map.height) {
            return Err(invalid("movement_speed", "must be smaller than the map"));
        }
        if u64::from(t.player_margin) * 2 >= u64::from(self.map.width.min(self.map.height)) {
            return Err(invalid("player_margin", "leaves no room on the map"));
        }

        Ok(Tuning {
            tick_ms: t.tick_ms,
            movement_speed: Fixed::from_num(t.movement_speed),
            interaction_radius: Fixed::from_num(t.interaction_radius),
            collision_radius: Fixed::from_num(t.collision_radius),
            transfer_step: Fixed::from_num(t.transfer_step_per_mille) / Fixed::from_num(1000),
            ship_reward: t.ship_reward,
            event_log_capacity: t.event_log_capacity as usize,
            arrival_policy: t.arrival_policy,
        })
    }
}

fn check_role(config: &StationConfig) -> Result<()> {
    let invalid = |reason: &str| GameError::InvalidStation {
        station: config.key.clone(),
        reason: reason.to_string(),
    };

    match config.kind {
        StationType::ForkliftParking => {
            if config.input.is_some() || config.output.is_some() {
                return Err(invalid("forklift parking takes no items"));
            }
        }
        StationType::Trash => {
            if config.input.is_some() || config.output.is_some() {
                return Err(invalid("a trash bin accepts anything and produces nothing"));
            }
        }
        _ => {
            if config.input.is_none() && config.output.is_none() {
                return Err(invalid("station needs an input or an output"));
            }
        }
    }

    if let (Some(input), Some(output)) = (config.input, config.output) {
        if output <= input {
            return Err(GameError::BackwardEdge {
                station: config.key.clone(),
                input,
                output,
            });
        }
    }

    if config.is_automated() && config.role() != StationRole::Processor {
        return Err(invalid("only processing stations can forward automatically"));
    }

    Ok(())
}

fn check_forward(from: &StationConfig, to: &StationConfig) -> Result<()> {
    if to.role() != StationRole::Processor || from.output != to.input {
        return Err(GameError::MismatchedForward {
            station: from.key.clone(),
            target: to.key.clone(),
            output: from.output,
            accepts: to.input,
        });
    }
    Ok(())
}
