// LogSieve - app/split.rs
//
// Headless split: stream one input file into one output file per filter
// (plus original.txt when requested) inside a freshly cleared directory.
//
// Order of operations:
//   1. Validate input and output paths (nothing on disk touched yet).
//   2. Open the input.
//   3. Clear / create the output directory.
//   4. Create every output file; on failure, close those already open.
//   5. Run the demultiplexer, which closes every output on all paths.

use crate::core::demux::{self, DemuxStats, LineSink, PASSTHROUGH_SINK_NAME};
use crate::core::filter_set::PredicateSet;
use crate::core::sanitize;
use crate::platform::fs::{self, FileSink};
use crate::util::constants;
use crate::util::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Parameters of one split run.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Also write every non-blank line to `original.txt`.
    pub write_original: bool,
}

/// Outcome of a successful split.
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub stats: DemuxStats,
    /// `(filter name, output file)` in filter order.
    pub outputs: Vec<(String, PathBuf)>,
    pub original: Option<PathBuf>,
    pub duration: Duration,
}

/// Split `request.input` into `request.output_dir` using `predicates`.
pub fn split_file(request: &SplitRequest, predicates: &PredicateSet) -> Result<SplitReport> {
    let started = Instant::now();

    fs::check_input_file(&request.input)?;
    fs::check_output_dir(&request.output_dir, Some(&request.input))?;
    if request.write_original {
        sanitize::check_injective(
            predicates.names(),
            &[(PASSTHROUGH_SINK_NAME, constants::ORIGINAL_FILE_STEM)],
        )?;
    }

    let input = fs::open_input(&request.input)?;
    fs::reset_output_dir(&request.output_dir)?;

    let mut outputs = Vec::with_capacity(predicates.len());
    let mut sinks: HashMap<String, FileSink> = HashMap::with_capacity(predicates.len());
    for predicate in predicates {
        let path = fs::output_file_path(
            &request.output_dir,
            &sanitize::file_stem(predicate.name()),
        );
        match FileSink::create(&path) {
            Ok(sink) => {
                sinks.insert(predicate.name().to_string(), sink);
                outputs.push((predicate.name().to_string(), path));
            }
            Err(e) => {
                release(sinks.values_mut());
                return Err(e.into());
            }
        }
    }

    let mut original = None;
    if request.write_original {
        let path = fs::output_file_path(&request.output_dir, constants::ORIGINAL_FILE_STEM);
        match FileSink::create(&path) {
            Ok(sink) => original = Some(sink),
            Err(e) => {
                release(sinks.values_mut());
                return Err(e.into());
            }
        }
    }

    tracing::info!(
        input = %request.input.display(),
        output = %request.output_dir.display(),
        filters = predicates.len(),
        original = request.write_original,
        "Splitting"
    );

    let stats = demux::run(input, predicates, &mut sinks, original.as_mut())
        .map_err(crate::util::error::SplitError::from)?;

    let report = SplitReport {
        stats,
        outputs,
        original: original.map(|sink| sink.path().to_path_buf()),
        duration: started.elapsed(),
    };
    tracing::info!(
        lines = report.stats.lines_read,
        routed = report.stats.lines_routed,
        secs = report.duration.as_secs_f64(),
        "Split complete"
    );
    Ok(report)
}

/// Close sinks opened before a setup failure. Close errors are logged; the
/// setup failure is what gets reported.
fn release<'a>(sinks: impl Iterator<Item = &'a mut FileSink>) {
    for sink in sinks {
        if let Err(e) = sink.close() {
            tracing::warn!(path = %sink.path().display(), error = %e, "Failed to close output");
        }
    }
}

/// Human-readable summary printed by the CLI after a split.
pub fn summary_text(report: &SplitReport, output_dir: &Path) -> String {
    let mut text = format!(
        "Processed {} lines ({} blank) into '{}' in {:.2}s\n",
        report.stats.lines_read,
        report.stats.blank_lines,
        output_dir.display(),
        report.duration.as_secs_f64()
    );
    for (name, path) in &report.outputs {
        let file = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
        text.push_str(&format!("  {name} -> {file}\n"));
    }
    if let Some(ref path) = report.original {
        text.push_str(&format!("  (original) -> {}\n", path.display()));
    }
    if report.stats.repaired_lines > 0 {
        text.push_str(&format!(
            "  {} line(s) contained invalid UTF-8 and were repaired\n",
            report.stats.repaired_lines
        ));
    }
    text
}
