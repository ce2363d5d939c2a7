use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::warn;

use crate::error::{FrameError, Result};

/// Frame delimiter byte. COBS stuffing guarantees it never appears inside
/// a payload.
pub const DELIMITER: u8 = 0x00;

/// Maximum bytes of a single frame, delimiter included.
///
/// Sized for the largest legal encoded record (a full profile snapshot is
/// just under 1 KiB) plus stuffing overhead, with headroom.
pub const MAX_FRAME_SIZE: usize = 2048;

/// Reads delimiter-terminated frames from any `Read` stream.
///
/// Bytes are pulled one at a time until [`DELIMITER`] is seen. The buffer
/// is owned by the reader, so each task gets its own; nothing is shared
/// with the writer side.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    max_frame_size: usize,
}

impl<T: Read> FrameReader<T> {
    /// Create a frame reader with the default [`MAX_FRAME_SIZE`] bound.
    pub fn new(inner: T) -> Self {
        Self::with_max_frame_size(inner, MAX_FRAME_SIZE)
    }

    /// Create a frame reader with an explicit frame-size bound.
    pub fn with_max_frame_size(inner: T, max_frame_size: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(max_frame_size),
            max_frame_size,
        }
    }

    /// Read the next complete frame (blocking), delimiter included as the
    /// final byte.
    ///
    /// If the bound fills before a delimiter arrives, the reader discards
    /// bytes up to the next delimiter to re-establish alignment, then
    /// returns [`FrameError::Overflow`]; the stream stays usable and the
    /// caller may simply read the next frame. EOF surfaces as
    /// [`FrameError::ChannelClosed`] and any other read failure as
    /// [`FrameError::Io`]; both are fatal to the stream.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        self.buf.clear();

        while self.buf.len() < self.max_frame_size {
            let byte = self.read_byte()?;
            self.buf.extend_from_slice(&[byte]);
            if byte == DELIMITER {
                return Ok(self.buf.split().freeze());
            }
        }

        let discarded = self.resync()?;
        warn!(
            limit = self.max_frame_size,
            discarded, "frame overflow, resynchronized to next delimiter"
        );
        Err(FrameError::Overflow {
            limit: self.max_frame_size,
            discarded,
        })
    }

    /// Discard bytes until the next delimiter. Returns the number of
    /// non-delimiter bytes thrown away.
    fn resync(&mut self) -> Result<usize> {
        let mut discarded = 0usize;
        loop {
            if self.read_byte()? == DELIMITER {
                return Ok(discarded);
            }
            discarded += 1;
        }
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            return match self.inner.read(&mut byte) {
                Ok(0) => Err(FrameError::ChannelClosed),
                Ok(_) => Ok(byte[0]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => Err(FrameError::Io(err)),
            };
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
