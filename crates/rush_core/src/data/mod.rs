//! Data structures for factory layouts.
//!
//! Pure data types deserialized from RON, plus the validation that turns
//! them into a [`crate::config::FactoryConfig`].
//!
//! **Note:** This module contains no IO. Reading layout files from disk is
//! handled by `rush_headless` and `rush_tools`.

mod layout_data;
mod station_data;
mod tuning_data;

pub use layout_data::FactoryLayout;
pub use station_data::StationData;
pub use tuning_data::{MapData, TuningData};
