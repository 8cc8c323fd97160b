//! Layout validation utilities.

use std::fmt;
use std::path::Path;

use rush_core::config::FactoryConfig;
use rush_core::data::FactoryLayout;
use rush_core::error::GameError;
use thiserror::Error;

/// Why a layout file was rejected.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// File that could not be read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse RON.
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        /// File that could not be parsed.
        path: String,
        /// Underlying RON error, with position.
        source: ron::error::SpannedError,
    },
    /// Parsed, but not a valid factory.
    #[error(transparent)]
    Invalid(#[from] GameError),
}

/// What a valid layout contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSummary {
    /// Number of stations.
    pub stations: usize,
    /// Number of stations that forward their output automatically.
    pub automated: usize,
    /// Map size.
    pub map: (u32, u32),
}

impl LayoutSummary {
    fn of(config: &FactoryConfig) -> Self {
        Self {
            stations: config.stations.len(),
            automated: config.stations.iter().filter(|s| s.is_automated()).count(),
            map: (config.bounds.width, config.bounds.height),
        }
    }
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stations ({} automated) on a {}x{} floor",
            self.stations, self.automated, self.map.0, self.map.1
        )
    }
}

/// Validate one RON layout file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn validate_layout_file(path: &Path) -> Result<LayoutSummary, ValidateError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ValidateError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let layout: FactoryLayout = ron::from_str(&contents).map_err(|source| ValidateError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    let config = layout.validate()?;
    Ok(LayoutSummary::of(&config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn layout_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_stock_layout_passes() {
        let file = layout_file(include_str!("../../../assets/data/factory.ron"));
        let summary = validate_layout_file(file.path()).unwrap();
        assert_eq!(
            summary,
            LayoutSummary {
                stations: 9,
                automated: 2,
                map: (800, 600),
            }
        );
        assert_eq!(summary.to_string(), "9 stations (2 automated) on a 800x600 floor");
    }

    #[test]
    fn test_missing_file() {
        let err = validate_layout_file(Path::new("/no/such/layout.ron")).unwrap_err();
        assert!(matches!(err, ValidateError::Read { .. }));
    }

    #[test]
    fn test_parse_error_names_file() {
        let file = layout_file("FactoryLayout(");
        let err = validate_layout_file(file.path()).unwrap_err();
        assert!(matches!(err, ValidateError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_backward_edge_is_rejected() {
        let file = layout_file(
            r#"FactoryLayout(stations: [
                StationData(id: "odd", kind: Washing, position: (100, 100),
                    input: Some(CleanJug), output: Some(DirtyJug), processing_time_ms: 1000),
            ])"#,
        );
        let err = validate_layout_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ValidateError::Invalid(GameError::BackwardEdge { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let file = layout_file(
            r#"FactoryLayout(stations: [
                StationData(id: "a", kind: Receiving, position: (100, 100), output: Some(DirtyJug)),
                StationData(id: "a", kind: Trash, position: (300, 100)),
            ])"#,
        );
        let err = validate_layout_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ValidateError::Invalid(GameError::DuplicateStationId(_))
        ));
    }
}
