//! Transient HTML files handed to the chat platform as attachments.
//!
//! Every artifact gets its own path (`<stem>.<ULID>.<ext>`) so concurrent
//! deliveries never share a file. The [`Artifact`] guard removes the file
//! when dropped, so no exit path leaves it behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::config::ArtifactConfig;

/// Directory where artifacts are written.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    dir: PathBuf,
    display_name: String,
}

impl ArtifactDir {
    pub fn new(dir: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            display_name: display_name.into(),
        }
    }

    pub fn from_config(config: &ArtifactConfig) -> Self {
        Self::new(config.dir.clone(), config.file_name.clone())
    }

    /// Write `html` to a fresh file owned by the returned guard.
    pub async fn write(&self, id: Ulid, html: &str) -> std::io::Result<Artifact> {
        fs::create_dir_all(&self.dir).await?;

        let artifact = Artifact {
            path: self.dir.join(self.unique_name(id)),
            display_name: self.display_name.clone(),
            removed: false,
        };

        // The guard exists before the file does, so a failed write is cleaned up too.
        let mut file = fs::File::create(&artifact.path).await?;
        file.write_all(html.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %artifact.path.display(), bytes = html.len(), "Wrote artifact");
        Ok(artifact)
    }

    fn unique_name(&self, id: Ulid) -> String {
        let name = Path::new(&self.display_name);
        let stem = name
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("artifact");
        match name.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}.{id}.{ext}"),
            None => format!("{stem}.{id}"),
        }
    }
}

/// A file on disk that lives as long as this guard.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    display_name: String,
    removed: bool,
}

impl Artifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name the recipient sees.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Delete the file now, reporting failure.
    pub async fn remove(mut self) -> std::io::Result<()> {
        self.removed = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed artifact on drop"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove artifact"
            ),
        }
    }
}
