//! Per-request transient image files.
//!
//! Each upload is written to `<dir>/facegate-<uuid>.<ext>` so concurrent
//! requests never share a path, regardless of the client's filename. The file
//! is removed by [`TransientImage::remove`], or by `Drop` if the owning task
//! ends early (panic, client disconnect).

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::mime_detect::{extension_for, sniff_image_mime};

const FILE_PREFIX: &str = "facegate-";
const FALLBACK_EXTENSION: &str = "bin";

/// A file that lives exactly as long as the request that created it.
#[derive(Debug)]
pub struct TransientImage {
    path: PathBuf,
    removed: bool,
}

impl TransientImage {
    /// Write `bytes` to a fresh, uniquely named file inside `dir`.
    pub async fn persist(
        dir: &Path,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> io::Result<Self> {
        fs::create_dir_all(dir).await?;

        let ext = pick_extension(original_name, bytes);
        let path = dir.join(format!("{FILE_PREFIX}{}.{ext}", Uuid::new_v4()));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        // From here on the guard owns the path; a failed write still cleans up.
        let image = Self { path, removed: false };
        file.write_all(bytes).await?;
        file.flush().await?;

        debug!(path = %image.path.display(), size = bytes.len(), "Persisted transient image");
        Ok(image)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. A file that is already gone counts as removed.
    pub async fn remove(mut self) -> io::Result<()> {
        self.removed = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed transient image");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for TransientImage {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed transient image on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove transient image"
            ),
        }
    }
}

/// Keep a short alphanumeric client extension, else sniff, else `bin`.
fn pick_extension(original_name: Option<&str>, bytes: &[u8]) -> String {
    let client_ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()));

    client_ext
        .or_else(|| sniff_image_mime(bytes).and_then(extension_for).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
