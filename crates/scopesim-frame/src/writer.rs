use std::io::{ErrorKind, Write};
use std::sync::{Arc, Mutex};

use bytes::BytesMut;

use crate::cobs;
use crate::error::{FrameError, Result};
use crate::reader::{DELIMITER, MAX_FRAME_SIZE};

/// Writes COBS-framed messages to any `Write` stream.
///
/// `send` stuffs the payload, appends exactly one delimiter, and pushes
/// the whole sequence out before returning.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    max_frame_size: usize,
}

impl<T: Write> FrameWriter<T> {
    /// Create a frame writer with the default [`MAX_FRAME_SIZE`] bound.
    pub fn new(inner: T) -> Self {
        Self::with_max_frame_size(inner, MAX_FRAME_SIZE)
    }

    /// Create a frame writer with an explicit frame-size bound.
    pub fn with_max_frame_size(inner: T, max_frame_size: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(max_frame_size),
            max_frame_size,
        }
    }

    /// Stuff and send one payload as a complete frame (blocking).
    ///
    /// A short write (`Ok(0)`) or I/O failure is fatal: the peer cannot
    /// tell a partial frame from a valid short one, so no recovery is
    /// attempted.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        let stuffed = cobs::encode(payload);
        if stuffed.len() + 1 > self.max_frame_size {
            return Err(FrameError::PayloadTooLarge {
                size: stuffed.len() + 1,
                max: self.max_frame_size,
            });
        }

        self.buf.clear();
        self.buf.extend_from_slice(&stuffed);
        self.buf.extend_from_slice(&[DELIMITER]);

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ChannelClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// A cloneable handle to one outbound stream, shared by every task that
/// writes frames to it.
///
/// Each `send` holds the lock for exactly one whole frame, so frames from
/// concurrent tasks never interleave at the byte level. Relative ordering
/// between tasks is unspecified.
pub struct SharedWriter<T> {
    inner: Arc<Mutex<FrameWriter<T>>>,
}

impl<T> Clone for SharedWriter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Write> SharedWriter<T> {
    /// Wrap a stream in a shared frame-writing handle.
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FrameWriter::new(inner))),
        }
    }

    /// Stuff and send one payload as a complete frame, atomically with
    /// respect to every other holder of this handle.
    pub fn send(&self, payload: &[u8]) -> Result<()> {
        let mut writer = self.inner.lock().unwrap_or_else(|poisoned| {
            // A panic while holding the lock can only leave a fully
            // written or fully unwritten frame; the buffer is cleared on
            // the next send either way.
            poisoned.into_inner()
        });
        writer.send(payload)
    }

    /// Recover the inner stream if this is the last handle.
    pub fn try_into_inner(self) -> Option<T> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|mutex| mutex.into_inner().unwrap_or_else(|p| p.into_inner()))
            .map(FrameWriter::into_inner)
    }
}
