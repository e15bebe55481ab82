use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use newsletter_core::RenderedMessage;
use newsletter_logging::pipeline_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::preview_stem;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes `{dir}/{filename}` through a temp file and rename, so readers never
/// see a half-written preview or history file.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPaths {
    pub html: PathBuf,
    pub text: PathBuf,
}

/// Writes both formats of a rendered issue side by side.
pub fn write_preview(
    dir: &Path,
    subject: &str,
    message: &RenderedMessage,
) -> Result<PreviewPaths, PersistError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let stem = preview_stem(subject, &message.html);
    let html = writer.write(&format!("{stem}.html"), &message.html)?;
    let text = writer.write(&format!("{stem}.txt"), &message.text)?;
    pipeline_info!("Preview written to {}", html.display());
    Ok(PreviewPaths { html, text })
}
