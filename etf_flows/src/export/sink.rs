use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use snafu::ResultExt;

use super::{ExportError, IoSnafu};

/// Destination for exported CSV documents.
pub trait ExportSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the path it wrote; an in-memory sink might
    /// return nothing at all.
    type Output;

    /// Stores one CSV document under the logical name `stem` (no extension).
    fn write(&self, stem: &str, csv: &[u8]) -> Result<Self::Output, ExportError>;
}

/// Writes `<stem>.csv` files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    timestamped: bool,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timestamped: false,
        }
    }

    /// Appends a UTC `%Y%m%d%H%M%S` suffix so repeated exports never collide.
    pub fn timestamped(mut self, on: bool) -> Self {
        self.timestamped = on;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&self, stem: &str) -> String {
        if self.timestamped {
            format!("{stem}_{}.csv", Utc::now().format("%Y%m%d%H%M%S"))
        } else {
            format!("{stem}.csv")
        }
    }
}

impl ExportSink for DirectorySink {
    type Output = PathBuf;

    fn write(&self, stem: &str, csv: &[u8]) -> Result<PathBuf, ExportError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).context(IoSnafu { path: &self.dir })?;
        }
        let path = self.dir.join(self.file_name(stem));
        fs::write(&path, csv).context(IoSnafu { path: &path })?;
        tracing::info!(path = %path.display(), bytes = csv.len(), "exported csv");
        Ok(path)
    }
}
