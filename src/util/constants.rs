// LogSieve - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogSieve";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogSieve";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Filter definitions
// =============================================================================

/// Default filter definitions file name, looked up in the platform config dir.
pub const FILTERS_FILE_NAME: &str = "filters.json";

/// Maximum size of a filter definitions file in bytes.
pub const MAX_FILTER_FILE_SIZE: u64 = 1024 * 1024; // 1 MB

/// Maximum number of filters in one definitions file.
///
/// Every filter holds an open output file during a split, so this also bounds
/// the number of file handles a single run keeps open.
pub const MAX_FILTERS: usize = 256;

/// Maximum regex pattern length (characters). Longer patterns are rejected
/// at load time rather than handed to the regex compiler.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// =============================================================================
// Streaming
// =============================================================================

/// Capacity of the buffered reader wrapped around the input file.
pub const INPUT_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

/// Capacity of the buffered writer behind each output file.
pub const OUTPUT_BUFFER_SIZE: usize = 16 * 1024; // 16 KB

/// Maximum bytes read for one input line. A longer unterminated run aborts
/// the pass instead of buffering the rest of the file.
pub const MAX_LINE_BYTES: usize = 16 * 1024 * 1024; // 16 MB

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Output
// =============================================================================

/// Default CLI output directory when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Extension appended to every sanitized output file stem.
pub const OUTPUT_FILE_EXTENSION: &str = "txt";

/// File stem used for the pass-through channel.
pub const ORIGINAL_FILE_STEM: &str = "original";

/// Display name of the pass-through region in the GUI.
pub const ORIGINAL_REGION_NAME: &str = "Original";

// =============================================================================
// Display defaults
// =============================================================================

/// Default number of lines retained per display region.
pub const DEFAULT_MAX_DISPLAY_LINES: usize = 1_000;

/// Hard upper bound on retained lines per region (prevents configuration
/// mistakes from turning a bounded buffer into an unbounded one).
pub const ABSOLUTE_MAX_DISPLAY_LINES: usize = 1_000_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
