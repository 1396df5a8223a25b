use thiserror::Error;

/// Failures raised by the save codec.
///
/// Every variant is terminal: the codec never guesses past a failure and no
/// editor is constructed over data that failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("invalid byte length of save file: expected {expected:#x} but got {actual:#x}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("could not locate start offset: {0:#x} is out of bounds or misaligned")]
    InvalidStartOffset(u32),

    #[error("unknown game name: {0:?}")]
    UnrecognizedGame(String),

    #[error("unknown game, no checksum formats match stored checksum {stored:#010x}")]
    UnknownVariant { stored: u32 },

    #[error("checksum does not match: stored {stored:#010x}, expected {expected:#010x}")]
    ChecksumMismatch { stored: u32, expected: u32 },

    #[error(
        "checksum is stale: stored {stored:#010x}, expected {expected:#010x}; rebuild it before saving"
    )]
    StaleChecksum { stored: u32, expected: u32 },

    #[error("offset {offset:#x} (+{width} bytes) is out of range for a view of {len:#x} bytes")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("{what} index {index} is out of range, expected 0..{limit}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("chip {0} is not in the catalog")]
    UnknownChip(usize),

    #[error("chip {id} has no code {code}")]
    UnknownCode { id: usize, code: char },
}

pub type Result<T> = std::result::Result<T, SaveError>;

impl SaveError {
    /// True for failures caused by the stored checksum disagreeing with the payload.
    pub fn is_checksum_failure(&self) -> bool {
        matches!(
            self,
            SaveError::ChecksumMismatch { .. }
                | SaveError::StaleChecksum { .. }
                | SaveError::UnknownVariant { .. }
        )
    }
}
