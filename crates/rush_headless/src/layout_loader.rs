//! Factory layout loading from disk.
//!
//! The core never touches the filesystem; this module reads a RON layout,
//! parses it and runs the core's validation.

use std::fs;
use std::path::{Path, PathBuf};

use rush_core::config::FactoryConfig;
use rush_core::data::FactoryLayout;
use rush_core::error::GameError;
use thiserror::Error;

/// Error type for layout loading.
#[derive(Error, Debug)]
pub enum LayoutLoadError {
    /// File not found.
    #[error("Layout file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read layout file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse layout: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The layout parsed but is not a valid factory.
    #[error("Invalid layout: {0}")]
    Invalid(#[from] GameError),
}

/// Environment variable that overrides the default layout location.
pub const LAYOUT_ENV_VAR: &str = "RUSH_LAYOUT";

/// Parse a layout file without validating it.
pub fn read_layout(path: &Path) -> Result<FactoryLayout, LayoutLoadError> {
    if !path.exists() {
        return Err(LayoutLoadError::FileNotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)?;
    let layout: FactoryLayout = ron::from_str(&contents)?;
    Ok(layout)
}

/// Load and validate a layout file.
pub fn load_layout(path: &Path) -> Result<FactoryConfig, LayoutLoadError> {
    let layout = read_layout(path)?;
    let config = layout.validate()?;
    tracing::info!(
        path = %path.display(),
        stations = config.stations.len(),
        "Loaded factory layout"
    );
    Ok(config)
}

/// Load `path` if given, otherwise the stock recycling plant.
pub fn load_layout_or_default(path: Option<&Path>) -> Result<FactoryConfig, LayoutLoadError> {
    match path {
        Some(path) => load_layout(path),
        None => {
            tracing::info!("Using the stock recycling plant layout");
            Ok(FactoryLayout::recycling_plant().validate()?)
        }
    }
}

/// Layout path named by the `RUSH_LAYOUT` environment variable, if it exists.
pub fn layout_from_env() -> Option<PathBuf> {
    let path = PathBuf::from(std::env::var(LAYOUT_ENV_VAR).ok()?);
    path.exists().then_some(path)
}
