// LogSieve - app/display.rs
//
// Bounded in-memory view of a split: one retention buffer per filter (plus
// the optional "Original" region), filled by a single demultiplexer pass.
//
// Buffers are the demux sinks; each region's `lines` are only replaced after a
// load completes, so a failed load leaves what the user was looking at.

use crate::core::demux::{self, DemuxStats};
use crate::core::filter_set::PredicateSet;
use crate::core::retention::{RetentionBuffer, RetentionMode};
use crate::core::sanitize;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Buffer sizing and pass-through visibility for a display session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub capacity: usize,
    pub mode: RetentionMode,
    pub show_original: bool,
}

impl DisplaySettings {
    /// `force_original` (the `--original` flag) shows the Original region even
    /// when the config leaves it off.
    pub fn from_config(
        config: &crate::platform::config::AppConfig,
        force_original: bool,
    ) -> Self {
        Self {
            capacity: config.max_display_lines,
            mode: RetentionMode::from_keep_first(config.keep_first),
            show_original: force_original || config.show_original,
        }
    }
}

/// One tab worth of displayed content.
#[derive(Debug, Clone)]
pub struct DisplayRegion {
    pub name: String,
    pub file_stem: String,
    /// Published lines, without terminators. Indexed directly by the line view.
    pub lines: Vec<String>,
    is_original: bool,
}

impl DisplayRegion {
    fn new(name: &str, file_stem: String, is_original: bool) -> Self {
        Self {
            name: name.to_string(),
            file_stem,
            lines: Vec::new(),
            is_original,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Newline-terminated text, as written by `save`.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    pub fn is_original(&self) -> bool {
        self.is_original
    }
}

/// Region name to retention buffer mapping, plus the published text.
#[derive(Debug)]
pub struct DisplaySession {
    predicates: PredicateSet,
    settings: DisplaySettings,
    buffers: HashMap<String, RetentionBuffer<String>>,
    original: Option<RetentionBuffer<String>>,
    /// Original first when shown, then filter order.
    regions: Vec<DisplayRegion>,
    source: Option<PathBuf>,
    last_stats: Option<DemuxStats>,
}

impl DisplaySession {
    /// Build empty regions for `predicates`.
    ///
    /// Fails on a zero capacity, or when a filter would save over
    /// `original.txt` while the Original region is shown.
    pub fn new(predicates: PredicateSet, settings: DisplaySettings) -> Result<Self> {
        if settings.show_original {
            sanitize::check_injective(
                predicates.names(),
                &[(constants::ORIGINAL_REGION_NAME, constants::ORIGINAL_FILE_STEM)],
            )?;
        }

        let mut buffers = HashMap::with_capacity(predicates.len());
        let mut regions = Vec::with_capacity(predicates.len() + 1);

        let original = if settings.show_original {
            regions.push(DisplayRegion::new(
                constants::ORIGINAL_REGION_NAME,
                constants::ORIGINAL_FILE_STEM.to_string(),
                true,
            ));
            Some(RetentionBuffer::new(settings.capacity, settings.mode)?)
        } else {
            None
        };

        for predicate in &predicates {
            buffers.insert(
                predicate.name().to_string(),
                RetentionBuffer::new(settings.capacity, settings.mode)?,
            );
            regions.push(DisplayRegion::new(
                predicate.name(),
                sanitize::file_stem(predicate.name()),
                false,
            ));
        }

        tracing::debug!(
            regions = regions.len(),
            capacity = settings.capacity,
            mode = ?settings.mode,
            "Display session created"
        );

        Ok(Self {
            predicates,
            settings,
            buffers,
            original,
            regions,
            source: None,
            last_stats: None,
        })
    }

    /// Stream `path` through the filters into the region buffers and publish
    /// the result. On error the previously published lines are kept.
    pub fn load(&mut self, path: &Path) -> Result<DemuxStats> {
        fs::check_input_file(path)?;
        let reader = fs::open_input(path)?;

        for buffer in self.buffers.values_mut() {
            buffer.clear();
        }
        if let Some(ref mut original) = self.original {
            original.clear();
        }

        let stats = demux::run(
            reader,
            &self.predicates,
            &mut self.buffers,
            self.original.as_mut(),
        )?;

        for region in &mut self.regions {
            let buffer = if region.is_original {
                self.original.as_ref()
            } else {
                self.buffers.get(&region.name)
            };
            if let Some(buffer) = buffer {
                region.lines = buffer.get();
            }
        }

        tracing::info!(
            path = %path.display(),
            lines = stats.lines_read,
            routed = stats.lines_routed,
            "Loaded file into display"
        );
        self.source = Some(path.to_path_buf());
        self.last_stats = Some(stats);
        Ok(stats)
    }

    /// Clear `dir` and write each region's displayed text to
    /// `<file_stem>.txt`. Returns the written paths in region order.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::check_output_dir(dir, self.source.as_deref())?;
        fs::reset_output_dir(dir)?;

        let mut written = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            let path = fs::output_file_path(dir, &region.file_stem);
            fs::write_text_file(&path, &region.text())?;
            written.push(path);
        }
        tracing::info!(dir = %dir.display(), files = written.len(), "Saved displayed regions");
        Ok(written)
    }

    pub fn regions(&self) -> &[DisplayRegion] {
        &self.regions
    }

    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    /// File most recently loaded successfully.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn last_stats(&self) -> Option<DemuxStats> {
        self.last_stats
    }
}
