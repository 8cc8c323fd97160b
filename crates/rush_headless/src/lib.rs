//! Headless factory runner for scripted play and CI verification.
//!
//! This crate drives the simulation core through JSON commands on stdin,
//! with responses on stdout. It stands in for a presentation layer:
//!
//! - **Scripted play**: a controller walks the player around and interacts
//! - **CI verification**: whole shifts run without a window
//! - **Determinism checks**: `hash` responses compare runs tick by tick
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from the controller (start, hold, tick, interact, ...)
//! - **stdout**: Responses and snapshots (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response format.
//!
//! # Example
//!
//! ```bash
//! printf '{"cmd":"start"}\n{"cmd":"tick","count":60}\n{"cmd":"query"}\n' \
//!     | cargo run -p rush_headless -- run
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod layout_loader;
pub mod protocol;
pub mod runner;

pub use layout_loader::{load_layout, load_layout_or_default, LayoutLoadError};
pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner};
