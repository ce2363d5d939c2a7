/// Errors that can occur while encoding or decoding message records.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The buffer ended before the record's fields were complete.
    #[error("truncated record (needed {needed} more bytes, {remaining} left)")]
    Truncated { needed: usize, remaining: usize },

    /// A response buffer carries a discriminant outside the schema.
    #[error("unknown response tag {tag}")]
    UnknownResponseTag { tag: u32 },

    /// A variable-length table exceeds its schema cap.
    #[error("table too large ({len} entries, max {max})")]
    TableTooLarge { len: usize, max: usize },

    /// A string field exceeds its schema cap or is not valid UTF-8.
    #[error("invalid string field: {reason}")]
    InvalidString { reason: String },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
