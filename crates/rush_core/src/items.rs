//! Material kinds and the items that carry them.
//!
//! Item kinds form a fixed, ordered pipeline: every processing step turns
//! one kind into a later one. An [`Item`] keeps its [`ItemId`] across steps
//! that transform the same physical object.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Material kinds in pipeline order.
///
/// The declaration order is the pipeline order; `Ord` is derived from it and
/// layout validation relies on it to reject backward edges.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ItemType {
    /// Raw jug as delivered to receiving.
    DirtyJug,
    /// Jug that passed the sorting table.
    SortedJug,
    /// Washed jug.
    CleanJug,
    /// Shredded HDPE flakes.
    Flakes,
    /// Extruded strands.
    MeltedStrands,
    /// Cut pellets.
    Pellets,
    /// Pellets bagged for shipping.
    BaggedPellets,
}

impl ItemType {
    /// Every item kind in pipeline order.
    pub const ALL: [ItemType; 7] = [
        ItemType::DirtyJug,
        ItemType::SortedJug,
        ItemType::CleanJug,
        ItemType::Flakes,
        ItemType::MeltedStrands,
        ItemType::Pellets,
        ItemType::BaggedPellets,
    ];

    /// Item kinds that can only be carried from a forklift in the stock plant.
    pub const DEFAULT_HEAVY: [ItemType; 3] = [
        ItemType::SortedJug,
        ItemType::Pellets,
        ItemType::BaggedPellets,
    ];

    /// Display label used in event-log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DirtyJug => "Dirty Jug",
            Self::SortedJug => "Sorted Jug",
            Self::CleanJug => "Clean Jug",
            Self::Flakes => "HDPE Flakes",
            Self::MeltedStrands => "Melted Strands",
            Self::Pellets => "Pellets",
            Self::BaggedPellets => "Bagged Pellets",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A physical item on the factory floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Identity, preserved across in-place transformations.
    pub id: ItemId,
    /// Current material kind.
    pub kind: ItemType,
}

impl Item {
    /// Create a new item.
    #[must_use]
    pub const fn new(id: ItemId, kind: ItemType) -> Self {
        Self { id, kind }
    }

    /// The same physical item after a processing step.
    #[must_use]
    pub const fn transformed(self, kind: ItemType) -> Self {
        Self { id: self.id, kind }
    }
}

/// Monotonic item id allocator.
///
/// Ids start at 1 and are never reused within a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemIds {
    next: u64,
}

impl ItemIds {
    /// Hand out the next id.
    pub fn allocate(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }

    /// Id that the next allocation will return.
    #[must_use]
    pub const fn peek(&self) -> ItemId {
        ItemId(self.next)
    }
}

impl Default for ItemIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

/// The configured set of heavy item kinds.
///
/// Heavy items can only be picked up while the player is in forklift mode;
/// everything else only on foot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeavyItems {
    kinds: Vec<ItemType>,
}

impl HeavyItems {
    /// Build the set from a list of kinds (duplicates are ignored).
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = ItemType>) -> Self {
        let mut kinds: Vec<ItemType> = kinds.into_iter().collect();
        kinds.sort_unstable();
        kinds.dedup();
        Self { kinds }
    }

    /// Check if an item kind requires the forklift.
    #[must_use]
    pub fn contains(&self, kind: ItemType) -> bool {
        self.kinds.binary_search(&kind).is_ok()
    }

    /// Iterate the heavy kinds in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = ItemType> + '_ {
        self.kinds.iter().copied()
    }
}
