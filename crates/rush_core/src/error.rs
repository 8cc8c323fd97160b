//! Error types for the factory simulation.
//!
//! Only layout loading and validation can fail. Run-time player actions
//! never produce errors; rejected interactions are reported through
//! [`crate::interaction::InteractionOutcome`] and the event log.

use thiserror::Error;

use crate::items::ItemType;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Data file parsing error.
    #[error("Failed to parse layout data: {0}")]
    DataParseError(String),

    /// The layout contains no stations.
    #[error("Layout defines no stations")]
    EmptyLayout,

    /// Two stations share an identifier.
    #[error("Duplicate station ID: {0}")]
    DuplicateStationId(String),

    /// An automated station names a downstream station that does not exist.
    #[error("Station '{station}' forwards to unknown station '{target}'")]
    UnknownAutoTarget {
        /// Station carrying the bad reference.
        station: String,
        /// The unresolved target id.
        target: String,
    },

    /// An automated station forwards to itself.
    #[error("Station '{0}' forwards to itself")]
    SelfForwarding(String),

    /// A station transforms an item backwards (or into itself) in the pipeline.
    #[error("Station '{station}' maps {input} to {output}, which is not a forward step")]
    BackwardEdge {
        /// Offending station.
        station: String,
        /// Configured input.
        input: ItemType,
        /// Configured output.
        output: ItemType,
    },

    /// An automated station's output is not what its target accepts.
    #[error("Station '{station}' outputs {output:?} but '{target}' accepts {accepts:?}")]
    MismatchedForward {
        /// Automated station.
        station: String,
        /// Downstream station.
        target: String,
        /// What the automated station produces.
        output: Option<ItemType>,
        /// What the downstream station accepts.
        accepts: Option<ItemType>,
    },

    /// A station's role requires an input or output it does not declare.
    #[error("Station '{station}' is misconfigured: {reason}")]
    InvalidStation {
        /// Offending station.
        station: String,
        /// Human readable reason.
        reason: String,
    },

    /// A station sits outside the playable map.
    #[error("Station '{station}' at ({x}, {y}) lies outside the {width}x{height} map")]
    StationOutOfBounds {
        /// Offending station.
        station: String,
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Map width.
        width: u32,
        /// Map height.
        height: u32,
    },

    /// A tuning value is out of range.
    #[error("Invalid tuning value for {field}: {reason}")]
    InvalidTuning {
        /// Tuning field name.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
