//! Typed command/response records and their binary message codec.
//!
//! Records are flat little-endian buffers: a `u32` discriminant followed
//! by the variant's fields. Variable-length tables carry a `u16` count
//! prefix and are capped at schema limits, so every legal record fits in
//! one frame.
//!
//! Decoding a command is total over the discriminant space: an id outside
//! the schema yields [`Command::Unknown`], never an error, so the
//! dispatcher can classify it. Truncated or malformed field data is a
//! decode error and the frame is dropped by the caller.

pub mod command;
pub mod error;
pub mod response;

pub use command::Command;
pub use error::{ProtoError, Result};
pub use response::{
    CoefRow, DeviceStatus, Profile, Response, CODE_FAILURE, CODE_SUCCESS, MAX_COEF_ROWS,
    MAX_DISTANCES, MAX_STRING_LEN,
};
