// LogSieve - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogSieve configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logsieve/ or %APPDATA%\LogSieve\config\)
    pub config_dir: PathBuf,

    /// Default config.toml location inside `config_dir`.
    pub config_file: PathBuf,

    /// Default filter definitions file inside `config_dir`.
    pub filters_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let config_dir = match ProjectDirs::from("", "", constants::APP_ID) {
            Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
            None => {
                tracing::warn!("Could not determine platform directories, using current directory");
                PathBuf::from(".")
            }
        };

        let paths = Self::in_dir(config_dir);
        tracing::debug!(
            config = %paths.config_file.display(),
            filters = %paths.filters_file.display(),
            "Platform paths resolved"
        );
        paths
    }

    /// Paths rooted at an explicit directory.
    pub fn in_dir(config_dir: PathBuf) -> Self {
        Self {
            config_file: config_dir.join(constants::CONFIG_FILE_NAME),
            filters_file: config_dir.join(constants::FILTERS_FILE_NAME),
            config_dir,
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[filters]` section.
    pub filters: FiltersSection,
    /// `[display]` section.
    pub display: DisplaySection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[filters]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FiltersSection {
    /// Filter definitions file. Relative paths resolve against the
    /// directory holding config.toml.
    pub file: Option<String>,
}

/// `[display]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Show the pass-through "Original" region (and write original.txt).
    pub show_original: Option<bool>,
    /// Lines retained per display region.
    pub max_lines: Option<i64>,
    /// Keep the first `max_lines` lines instead of the last.
    pub keep_first: Option<bool>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Default CLI output directory.
    pub directory: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Filters --
    /// Filter definitions file from config (already resolved to a full path).
    pub filters_file: Option<PathBuf>,

    // -- Display --
    /// Show / write the pass-through channel.
    pub show_original: bool,
    /// Lines retained per display region (always >= 1).
    pub max_display_lines: usize,
    /// Keep-first (true) or keep-last (false) retention.
    pub keep_first: bool,

    // -- Output --
    /// Default CLI output directory.
    pub output_dir: PathBuf,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            filters_file: None,
            show_original: false,
            max_display_lines: constants::DEFAULT_MAX_DISPLAY_LINES,
            keep_first: false,
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            log_level: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning so the
/// application still starts but the user is informed.
///
/// Called before logging is initialised (the log level lives here), so
/// problems are returned as strings for the caller to report.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let raw = match read_config(config_path) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!("{e}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let config = validate(raw, base_dir, &mut warnings);
    (config, warnings)
}

/// Read and parse config.toml without validating values.
pub fn read_config(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

/// Validate each field against named constants, accumulating all warnings.
fn validate(raw: RawConfig, base_dir: &Path, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Filters: file --
    if let Some(file) = raw.filters.file.filter(|f| !f.trim().is_empty()) {
        let path = PathBuf::from(file);
        config.filters_file = Some(if path.is_absolute() {
            path
        } else {
            base_dir.join(path)
        });
    }

    // -- Display --
    if let Some(show) = raw.display.show_original {
        config.show_original = show;
    }
    if let Some(keep_first) = raw.display.keep_first {
        config.keep_first = keep_first;
    }
    if let Some(lines) = raw.display.max_lines {
        let max = constants::ABSOLUTE_MAX_DISPLAY_LINES as i64;
        if (1..=max).contains(&lines) {
            config.max_display_lines = lines as usize;
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "display.max_lines".to_string(),
                value: lines.to_string(),
                expected: format!("1-{max}"),
            };
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_MAX_DISPLAY_LINES
            ));
        }
    }

    // -- Output: directory --
    if let Some(dir) = raw.output.directory.filter(|d| !d.trim().is_empty()) {
        config.output_dir = PathBuf::from(dir);
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level.clone(),
                expected: valid.join(", "),
            };
            warnings.push(format!("{err}. Using default (info)."));
        }
    }

    config
}
