//! # Recycled Rush Development Tools
//!
//! Command-line tools for development:
//! - Layout validators

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod validate;
