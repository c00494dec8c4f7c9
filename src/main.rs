// LogSieve - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Filter definition loading (CLI > config > platform file > built-in)
// 4. Either a headless split or the eframe GUI launch

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use logsieve::app;
pub use logsieve::core;
pub use logsieve::platform;
pub use logsieve::ui;
pub use logsieve::util;

use clap::Parser;
use std::path::PathBuf;

/// LogSieve: split a log file into one output file per filter.
#[derive(Parser, Debug)]
#[command(name = "LogSieve", version, about)]
struct Cli {
    /// Log file to split. Without it the GUI is launched.
    input: Option<PathBuf>,

    /// Output directory (cleared before writing). Defaults to `[output] directory`
    /// from config.toml, or ./output.
    output_dir: Option<PathBuf>,

    /// Filter definitions file (JSON).
    #[arg(short = 'f', long = "filters")]
    filters: Option<PathBuf>,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Also write every non-blank line to original.txt (GUI: show the Original tab).
    #[arg(long = "original")]
    original: bool,

    /// Open the GUI even when an input file is given (the file is loaded).
    #[arg(long = "gui")]
    gui: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging exists; its warnings are replayed below.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file.clone());
    let (config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "LogSieve starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    let gui_mode = cli.gui || cli.input.is_none();
    // In the GUI this shows the Original tab; headless it writes original.txt.
    let write_original = cli.original || config.show_original;
    let reserved: &[(&str, &str)] = if write_original {
        &[(
            util::constants::ORIGINAL_REGION_NAME,
            util::constants::ORIGINAL_FILE_STEM,
        )]
    } else {
        &[]
    };

    let source = app::filter_mgr::resolve_source(cli.filters.as_deref(), &config, &platform_paths);
    let predicates = match app::filter_mgr::load_filter_set(&source, reserved) {
        Ok(set) => set,
        Err(e) => {
            tracing::error!(source = %source, error = %e, "Failed to load filters");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if gui_mode {
        run_gui(&cli, &config, predicates, source.to_string(), config_warnings);
        return;
    }

    let Some(input) = cli.input.clone() else {
        return;
    };
    let request = app::split::SplitRequest {
        input,
        output_dir: cli
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output_dir.clone()),
        write_original,
    };

    match app::split::split_file(&request, &predicates) {
        Ok(report) => {
            print!("{}", app::split::summary_text(&report, &request.output_dir));
        }
        Err(e) => {
            tracing::error!(error = %e, "Split failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Build the display session and hand control to eframe.
fn run_gui(
    cli: &Cli,
    config: &platform::config::AppConfig,
    predicates: crate::core::filter_set::PredicateSet,
    filter_source: String,
    warnings: Vec<String>,
) {
    let settings = app::display::DisplaySettings::from_config(config, cli.original);
    let session = match app::display::DisplaySession::new(predicates, settings) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create display session");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut state = app::state::AppState::new(session, filter_source, cli.debug);
    state.warnings = warnings;
    state.pending_open = cli.input.clone();

    tracing::info!(
        regions = state.session.regions().len(),
        capacity = settings.capacity,
        "Ready to launch GUI"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::LogSieveApp::new(state)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch LogSieve GUI: {e}");
        std::process::exit(1);
    }
}
