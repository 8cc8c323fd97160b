//! Station definitions as written in layout files.

use serde::{Deserialize, Serialize};

use crate::items::ItemType;
use crate::stations::StationType;

/// Data-driven station definition.
///
/// # Example RON
///
/// ```ron
/// StationData(
///     id: "shredder-1",
///     kind: Shredding,
///     position: (650, 200),
///     input: Some(CleanJug),
///     output: Some(Flakes),
///     processing_time_ms: 1000,
///     color: "bg-gray-500",
///     auto_next: Some("extruder-1"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationData {
    /// Unique layout key, referenced by `auto_next`.
    pub id: String,

    /// Station kind.
    pub kind: StationType,

    /// Centre position in map units.
    pub position: (i32, i32),

    /// Accepted item kind.
    #[serde(default)]
    pub input: Option<ItemType>,

    /// Produced item kind.
    #[serde(default)]
    pub output: Option<ItemType>,

    /// Processing cycle length in milliseconds.
    #[serde(default)]
    pub processing_time_ms: u32,

    /// Presentation color.
    #[serde(default)]
    pub color: String,

    /// Downstream station for automated forwarding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_next: Option<String>,
}

impl StationData {
    pub(crate) fn new(
        id: &str,
        kind: StationType,
        position: (i32, i32),
        input: Option<ItemType>,
        output: Option<ItemType>,
        processing_time_ms: u32,
        color: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            position,
            input,
            output,
            processing_time_ms,
            color: color.to_string(),
            auto_next: None,
        }
    }

    pub(crate) fn forwarding_to(mut self, next: &str) -> Self {
        self.auto_next = Some(next.to_string());
        self
    }
}
