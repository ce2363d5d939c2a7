//! Named-pipe (FIFO) creation and open helpers.

use std::fs::File;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{DeviceError, Result};

/// A named pipe owned by this process.
///
/// Created with `mkfifo`. A stale FIFO at the path is removed first; an
/// existing non-FIFO file is never clobbered. The path is removed again
/// on drop.
pub struct Fifo {
    path: PathBuf,
}

impl Fifo {
    /// Default permission mode for created pipes. Both sides of the
    /// emulated link run as development processes, so the pipe is open to
    /// the host user set.
    pub const DEFAULT_MODE: u32 = 0o666;

    /// Create a FIFO at `path` with [`Self::DEFAULT_MODE`].
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_mode(path, Self::DEFAULT_MODE)
    }

    /// Create a FIFO at `path` with an explicit mode.
    pub fn create_with_mode(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Remove a stale pipe if present, but never remove anything else.
        if path.exists() {
            let metadata = std::fs::symlink_metadata(&path).map_err(|e| DeviceError::Pipe {
                path: path.clone(),
                source: e,
            })?;
            if metadata.file_type().is_fifo() {
                debug!(?path, "removing stale fifo");
                std::fs::remove_file(&path).map_err(|e| DeviceError::Pipe {
                    path: path.clone(),
                    source: e,
                })?;
            } else {
                return Err(DeviceError::Pipe {
                    path,
                    source: std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "existing path is not a fifo",
                    ),
                });
            }
        }

        let cpath =
            std::ffi::CString::new(path.as_os_str().as_bytes()).map_err(|_| DeviceError::Pipe {
                path: path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path contains an interior nul byte",
                ),
            })?;

        // SAFETY: `cpath` is a valid nul-terminated C string owned by this frame.
        let rc = unsafe { libc::mkfifo(cpath.as_ptr(), mode as libc::mode_t) };
        if rc != 0 {
            return Err(DeviceError::Pipe {
                path,
                source: std::io::Error::last_os_error(),
            });
        }

        info!(?path, "created fifo");
        Ok(Self { path })
    }

    /// Open the pipe read-only. Blocks until a writer attaches.
    pub fn open_reader(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| DeviceError::Pipe {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Open the pipe write-only. Blocks until a reader attaches.
    pub fn open_writer(&self) -> Result<File> {
        std::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| DeviceError::Pipe {
                path: self.path.clone(),
                source: e,
            })
    }

    /// The path this pipe was created at.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Fifo {
    fn drop(&mut self) {
        if let Ok(metadata) = std::fs::symlink_metadata(&self.path) {
            if metadata.file_type().is_fifo() {
                debug!(path = ?self.path, "cleaning up fifo");
                let _ = std::fs::remove_file(&self.path);
            } else {
                debug!(path = ?self.path, "fifo path replaced; skipping cleanup");
            }
        }
    }
}
