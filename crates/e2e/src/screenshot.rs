//! Best-effort screenshot capture
//!
//! Screenshots are evidence, not assertions: directory creation and file
//! writes never fail a test. Errors are logged and the capture is skipped.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::E2eResult;

/// A screenshot written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotRecord {
    pub path: PathBuf,

    /// SHA-256 of the PNG bytes
    pub sha256: String,

    /// Decoded image size, if the bytes were a readable PNG
    pub dimensions: Option<(u32, u32)>,
}

/// Timestamped screenshot output directory
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it is absent.
    ///
    /// Idempotent and safe to call from concurrent setups. Failure is logged
    /// and reported as `false`.
    pub fn ensure_dir(&self) -> bool {
        match std::fs::create_dir_all(&self.dir) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to create screenshot directory {}: {}", self.dir.display(), e);
                false
            }
        }
    }

    /// File name for a capture taken at `millis` since the Unix epoch
    pub fn file_name(millis: i64, attempt: u32) -> String {
        if attempt == 0 {
            format!("screenshot-{}.png", millis)
        } else {
            format!("screenshot-{}-{}.png", millis, attempt)
        }
    }

    /// Write PNG bytes under a timestamped name, never overwriting a file.
    pub fn write(&self, png: &[u8]) -> E2eResult<ScreenshotRecord> {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut attempt = 0;

        let path = loop {
            let path = self.dir.join(Self::file_name(millis, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    write_or_remove(file, &path, png)?;
                    break path;
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let dimensions = match image::load_from_memory(png) {
            Ok(img) => Some((img.width(), img.height())),
            Err(e) => {
                debug!("Screenshot {} is not a decodable image: {}", path.display(), e);
                None
            }
        };

        Ok(ScreenshotRecord {
            sha256: hash_bytes(png),
            path,
            dimensions,
        })
    }

    /// Write a capture, logging and swallowing any failure
    pub fn write_best_effort(&self, png: &[u8]) -> Option<ScreenshotRecord> {
        match self.write(png) {
            Ok(record) => {
                info!("Screenshot saved: {}", record.path.display());
                Some(record)
            }
            Err(e) => {
                warn!("Failed to save screenshot in {}: {}", self.dir.display(), e);
                None
            }
        }
    }
}

/// Write `data` to the freshly created `path`, deleting it if the write fails
fn write_or_remove<W: Write>(mut file: W, path: &Path, data: &[u8]) -> std::io::Result<()> {
    let result = file.write_all(data).and_then(|_| file.flush());
    if result.is_err() {
        drop(file);
        if let Err(e) = std::fs::remove_file(path) {
            debug!("Could not remove partial screenshot {}: {}", path.display(), e);
        }
    }
    result
}

fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
