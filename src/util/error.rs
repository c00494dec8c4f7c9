// LogSieve - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogSieve operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogSieveError {
    /// Filter definition loading or predicate compilation failed.
    Filter(FilterError),

    /// A retention buffer was misconfigured.
    Retention(RetentionError),

    /// The streaming pass failed.
    Demux(DemuxError),

    /// The split command (CLI or display save) failed.
    Split(SplitError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for LogSieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Retention(e) => write!(f, "Buffer error: {e}"),
            Self::Demux(e) => write!(f, "Stream error: {e}"),
            Self::Split(e) => write!(f, "Split error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogSieveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Retention(e) => Some(e),
            Self::Demux(e) => Some(e),
            Self::Split(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter definitions and predicate compilation.
#[derive(Debug)]
pub enum FilterError {
    /// JSON definitions could not be parsed.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A configured pattern failed to compile.
    InvalidRegex {
        filter: String,
        pattern: String,
        source: regex::Error,
    },

    /// A pattern exceeds the maximum allowed length.
    RegexTooLong {
        filter: String,
        length: usize,
        max_length: usize,
    },

    /// A filter has an empty (or whitespace-only) name.
    EmptyName { index: usize },

    /// Two filters share the same name.
    DuplicateName { name: String },

    /// Two distinct filter names sanitize to the same output file name.
    FileNameCollision {
        first: String,
        second: String,
        file_stem: String,
    },

    /// Definitions file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Too many filters in one definitions file.
    TooManyFilters { count: usize, max: usize },

    /// The requested definitions file does not exist.
    DefinitionsNotFound { path: PathBuf },

    /// I/O error reading a definitions file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonParse { path, source } => {
                write!(
                    f,
                    "Failed to parse filter definitions '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidRegex {
                filter,
                pattern,
                source,
            } => write!(f, "Filter '{filter}': invalid regex '{pattern}': {source}"),
            Self::RegexTooLong {
                filter,
                length,
                max_length,
            } => write!(
                f,
                "Filter '{filter}': regex is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::EmptyName { index } => {
                write!(f, "Filter #{index} has an empty name")
            }
            Self::DuplicateName { name } => {
                write!(f, "Filter name '{name}' is used more than once")
            }
            Self::FileNameCollision {
                first,
                second,
                file_stem,
            } => write!(
                f,
                "Filters '{first}' and '{second}' both map to output file name '{file_stem}'"
            ),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Filter definitions '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::TooManyFilters { count, max } => {
                write!(f, "Too many filters defined ({count}), maximum is {max}")
            }
            Self::DefinitionsNotFound { path } => {
                write!(f, "Filter definitions '{}' not found", path.display())
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading filter definitions '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonParse { source, .. } => Some(source),
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for LogSieveError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Retention errors
// ---------------------------------------------------------------------------

/// Errors related to retention buffer construction.
#[derive(Debug)]
pub enum RetentionError {
    /// Capacity must be at least one item.
    InvalidCapacity { capacity: usize },
}

impl fmt::Display for RetentionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { capacity } => {
                write!(f, "Retention capacity must be positive, got {capacity}")
            }
        }
    }
}

impl std::error::Error for RetentionError {}

impl From<RetentionError> for LogSieveError {
    fn from(e: RetentionError) -> Self {
        Self::Retention(e)
    }
}

// ---------------------------------------------------------------------------
// Demultiplexer errors
// ---------------------------------------------------------------------------

/// Errors raised by a streaming pass. Every sink has been closed by the time
/// one of these reaches the caller.
#[derive(Debug)]
pub enum DemuxError {
    /// Reading the next line from the input failed.
    InputRead { line_number: u64, source: io::Error },

    /// Writing to (or flushing) a sink failed.
    SinkWrite { sink: String, source: io::Error },

    /// A line grew past the per-line byte limit without a terminator.
    LineTooLong { line_number: u64, max_bytes: usize },

    /// A predicate has no sink bound to its name.
    MissingSink { name: String },

    /// A sink is bound to a name that no predicate carries.
    UnknownSink { name: String },
}

impl fmt::Display for DemuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputRead {
                line_number,
                source,
            } => write!(f, "Failed to read input at line {line_number}: {source}"),
            Self::SinkWrite { sink, source } => {
                write!(f, "Failed to write to output '{sink}': {source}")
            }
            Self::LineTooLong {
                line_number,
                max_bytes,
            } => write!(
                f,
                "Input line {line_number} exceeds {max_bytes} bytes without a line break"
            ),
            Self::MissingSink { name } => {
                write!(f, "Filter '{name}' has no output bound to it")
            }
            Self::UnknownSink { name } => {
                write!(f, "Output '{name}' does not belong to any filter")
            }
        }
    }
}

impl std::error::Error for DemuxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputRead { source, .. } => Some(source),
            Self::SinkWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DemuxError> for LogSieveError {
    fn from(e: DemuxError) -> Self {
        Self::Demux(e)
    }
}

// ---------------------------------------------------------------------------
// Split errors
// ---------------------------------------------------------------------------

/// Errors related to splitting a file into an output directory.
#[derive(Debug)]
pub enum SplitError {
    /// The input file does not exist.
    InputNotFound { path: PathBuf },

    /// The input path exists but is not a regular file.
    InputNotAFile { path: PathBuf },

    /// The output path exists and is not a directory.
    OutputNotADirectory { path: PathBuf },

    /// The input file lives inside the output directory, which is about to
    /// be cleared.
    InputInsideOutput { input: PathBuf, output: PathBuf },

    /// Clearing or creating the output directory failed.
    OutputPrepare { path: PathBuf, source: io::Error },

    /// Opening the input file failed.
    InputOpen { path: PathBuf, source: io::Error },

    /// Creating an output file failed.
    SinkOpen { path: PathBuf, source: io::Error },

    /// Writing a saved region file failed.
    OutputWrite { path: PathBuf, source: io::Error },

    /// The streaming pass failed after outputs were opened.
    Demux(DemuxError),
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path } => {
                write!(f, "Input file '{}' does not exist", path.display())
            }
            Self::InputNotAFile { path } => {
                write!(f, "Input path '{}' is not a file", path.display())
            }
            Self::OutputNotADirectory { path } => {
                write!(
                    f,
                    "Output path '{}' exists and is not a directory",
                    path.display()
                )
            }
            Self::InputInsideOutput { input, output } => write!(
                f,
                "Input file '{}' is inside output directory '{}', which would be cleared",
                input.display(),
                output.display()
            ),
            Self::OutputPrepare { path, source } => {
                write!(
                    f,
                    "Cannot prepare output directory '{}': {source}",
                    path.display()
                )
            }
            Self::InputOpen { path, source } => {
                write!(f, "Cannot open input '{}': {source}", path.display())
            }
            Self::SinkOpen { path, source } => {
                write!(f, "Cannot create output '{}': {source}", path.display())
            }
            Self::OutputWrite { path, source } => {
                write!(f, "Cannot write output '{}': {source}", path.display())
            }
            Self::Demux(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OutputPrepare { source, .. } => Some(source),
            Self::InputOpen { source, .. } => Some(source),
            Self::SinkOpen { source, .. } => Some(source),
            Self::OutputWrite { source, .. } => Some(source),
            Self::Demux(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DemuxError> for SplitError {
    fn from(e: DemuxError) -> Self {
        Self::Demux(e)
    }
}

impl From<SplitError> for LogSieveError {
    fn from(e: SplitError) -> Self {
        Self::Split(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogSieveError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogSieve results.
pub type Result<T> = std::result::Result<T, LogSieveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_split_error_chains_demux_source() {
        let err: LogSieveError = SplitError::from(DemuxError::SinkWrite {
            sink: "errors".to_string(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        })
        .into();

        let split = err.source().expect("split layer");
        let demux = split.source().expect("demux layer");
        let io = demux.source().expect("io layer");
        assert_eq!(io.to_string(), "disk full");
        assert!(err.to_string().contains("errors"));
    }

    #[test]
    fn test_collision_message_names_both_filters() {
        let err = FilterError::FileNameCollision {
            first: "a/b".to_string(),
            second: "ab".to_string(),
            file_stem: "ab".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'a/b'"), "{msg}");
        assert!(msg.contains("'ab'"), "{msg}");
    }
}
