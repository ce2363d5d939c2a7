use std::path::PathBuf;

use scopesim_frame::FrameError;

/// Errors that terminate a device loop or prevent startup.
///
/// Recoverable per-frame conditions (overflow, corrupt stuffing, codec
/// failures) are handled where they are detected and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Channel-level framing failure (read or write side).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Named-pipe creation or open failure.
    #[error("pipe error on {path}: {source}")]
    Pipe {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DeviceError>;
