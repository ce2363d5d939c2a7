//! COBS framing and delimiter-based frame I/O for scopesim.
//!
//! This is the core protocol layer of the emulator. Every message is a
//! COBS-encoded payload followed by a single `0x00` delimiter:
//! - The payload never contains a zero byte after stuffing, so the stream
//!   is self-synchronizing on delimiters.
//! - [`FrameReader`] pulls bytes until a delimiter, bounded by
//!   [`MAX_FRAME_SIZE`], and resynchronizes on overflow.
//! - [`FrameWriter`] / [`SharedWriter`] emit whole frames atomically with
//!   respect to every other writer of the same stream.

pub mod cobs;
pub mod error;
pub mod reader;
pub mod writer;

pub use error::{FrameError, Result};
pub use reader::{FrameReader, DELIMITER, MAX_FRAME_SIZE};
pub use writer::{FrameWriter, SharedWriter};
