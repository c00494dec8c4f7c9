// LogSieve - app/filter_mgr.rs
//
// Locates and loads the filter definitions file, feeding its content to
// core::filter_set for parsing and validation.
//
// Resolution order: --filters flag > [filters] file in config.toml >
// filters.json in the platform config dir > built-in example set.
// An explicitly named file that is missing is an error; only the implicit
// locations fall through.

use crate::core::filter_set::{self, PredicateSet};
use crate::platform::config::{AppConfig, PlatformPaths};
use crate::util::constants;
use crate::util::error::FilterError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the active filter definitions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSource {
    /// Named on the command line.
    Explicit(PathBuf),
    /// Named in config.toml.
    Configured(PathBuf),
    /// Found in the platform config directory.
    Platform(PathBuf),
    /// Embedded example definitions.
    Builtin,
}

impl fmt::Display for FilterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) | Self::Configured(p) | Self::Platform(p) => {
                write!(f, "{}", p.display())
            }
            Self::Builtin => write!(f, "<built-in examples>"),
        }
    }
}

/// Pick the filter definitions source.
pub fn resolve_source(
    cli_path: Option<&Path>,
    config: &AppConfig,
    paths: &PlatformPaths,
) -> FilterSource {
    if let Some(path) = cli_path {
        return FilterSource::Explicit(path.to_path_buf());
    }
    if let Some(ref path) = config.filters_file {
        return FilterSource::Configured(path.clone());
    }
    if paths.filters_file.is_file() {
        return FilterSource::Platform(paths.filters_file.clone());
    }
    FilterSource::Builtin
}

/// Load, compile and validate the filter set from `source`.
///
/// `reserved` lists file stems already claimed (e.g. the pass-through file)
/// as `(owner, stem)` pairs; a filter that sanitizes to one of them is a
/// collision.
pub fn load_filter_set(
    source: &FilterSource,
    reserved: &[(&str, &str)],
) -> Result<PredicateSet, FilterError> {
    let (content, origin) = match source {
        FilterSource::Explicit(path) | FilterSource::Configured(path) | FilterSource::Platform(path) => {
            (read_definitions_file(path)?, path.clone())
        }
        FilterSource::Builtin => {
            tracing::warn!(
                "No filter definitions configured; using built-in examples. \
                 Pass --filters or set [filters] file in config.toml."
            );
            (
                filter_set::builtin_definitions_json().to_string(),
                PathBuf::from("<built-in>"),
            )
        }
    };

    let definitions = filter_set::parse_definitions_json(&content, &origin)?;
    if definitions.len() > constants::MAX_FILTERS {
        return Err(FilterError::TooManyFilters {
            count: definitions.len(),
            max: constants::MAX_FILTERS,
        });
    }

    let set = PredicateSet::from_definitions(&definitions, reserved)?;
    tracing::info!(source = %source, filters = set.len(), "Loaded filter definitions");
    Ok(set)
}

/// Read a definitions file with a size cap.
fn read_definitions_file(path: &Path) -> Result<String, FilterError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FilterError::DefinitionsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            FilterError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() > constants::MAX_FILTER_FILE_SIZE {
        return Err(FilterError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_FILTER_FILE_SIZE,
        });
    }

    std::fs::read_to_string(path).map_err(|e| FilterError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
