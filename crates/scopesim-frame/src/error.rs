/// Errors that can occur during frame encoding/decoding and frame I/O.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A frame exceeded the maximum size without a delimiter.
    ///
    /// The reader has already resynchronized to the next delimiter when
    /// this is returned; the caller may continue reading frames.
    #[error("frame overflow (no delimiter within {limit} bytes, {discarded} bytes discarded)")]
    Overflow { limit: usize, discarded: usize },

    /// The byte-stuffed payload is malformed (a COBS code byte points past
    /// the end of the input).
    #[error("corrupt byte stuffing at offset {offset}")]
    Corrupt { offset: usize },

    /// The payload exceeds the maximum encodable frame size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was closed before a complete frame was transferred.
    #[error("channel closed (incomplete frame)")]
    ChannelClosed,
}

impl FrameError {
    /// True for errors that drop the current frame but leave the stream
    /// usable; channel-level failures return false.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FrameError::Overflow { .. }
                | FrameError::Corrupt { .. }
                | FrameError::PayloadTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
