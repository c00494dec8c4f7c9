// LogSieve - platform/fs.rs
//
// Filesystem plumbing for the split: input checks, destructive output
// directory preparation, and the buffered file sink.
//
// All path checks run before anything on disk is modified, so a rejected
// request never leaves a half-prepared output directory behind.

use crate::core::demux::LineSink;
use crate::util::constants;
use crate::util::error::SplitError;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Verify the input exists and is a regular file.
pub fn check_input_file(path: &Path) -> Result<(), SplitError> {
    if !path.exists() {
        return Err(SplitError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(SplitError::InputNotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Verify the output path is usable: absent, or an existing directory that
/// does not contain `input`.
pub fn check_output_dir(output: &Path, input: Option<&Path>) -> Result<(), SplitError> {
    if !output.exists() {
        return Ok(());
    }
    if !output.is_dir() {
        return Err(SplitError::OutputNotADirectory {
            path: output.to_path_buf(),
        });
    }

    if let Some(input) = input {
        // Canonicalisation only fails for paths that vanished between the
        // exists() checks and here; treat those as unrelated.
        if let (Ok(input_abs), Ok(output_abs)) = (input.canonicalize(), output.canonicalize()) {
            if input_abs.starts_with(&output_abs) {
                return Err(SplitError::InputInsideOutput {
                    input: input.to_path_buf(),
                    output: output.to_path_buf(),
                });
            }
        }
    }
    Ok(())
}

/// Empty `dir` (creating it if absent). Existing contents are deleted, not
/// merged.
pub fn reset_output_dir(dir: &Path) -> Result<(), SplitError> {
    let prepare_err = |source: io::Error| SplitError::OutputPrepare {
        path: dir.to_path_buf(),
        source,
    };

    if dir.is_dir() {
        let mut removed = 0usize;
        for entry in fs::read_dir(dir).map_err(prepare_err)? {
            let entry = entry.map_err(prepare_err)?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(prepare_err)?;
            if file_type.is_dir() {
                fs::remove_dir_all(&path).map_err(prepare_err)?;
            } else {
                fs::remove_file(&path).map_err(prepare_err)?;
            }
            removed += 1;
        }
        tracing::info!(dir = %dir.display(), removed, "Cleared output directory");
    } else {
        fs::create_dir_all(dir).map_err(prepare_err)?;
        tracing::debug!(dir = %dir.display(), "Created output directory");
    }
    Ok(())
}

/// Output file path for a sanitized stem.
pub fn output_file_path(dir: &Path, file_stem: &str) -> PathBuf {
    dir.join(format!("{file_stem}.{}", constants::OUTPUT_FILE_EXTENSION))
}

/// Open the input for line streaming.
pub fn open_input(path: &Path) -> Result<BufReader<File>, SplitError> {
    let file = File::open(path).map_err(|e| SplitError::InputOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufReader::with_capacity(constants::INPUT_BUFFER_SIZE, file))
}

/// Buffered, newline-terminating file sink.
///
/// `close` flushes and drops the handle; writes after close fail.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> Result<Self, SplitError> {
        let file = File::create(path).map_err(|e| SplitError::SinkOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(BufWriter::with_capacity(constants::OUTPUT_BUFFER_SIZE, file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl LineSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "output file already closed")
        })?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

/// Write `text` to `path` in one go (used to save displayed regions).
pub fn write_text_file(path: &Path, text: &str) -> Result<(), SplitError> {
    fs::write(path, text).map_err(|e| SplitError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
