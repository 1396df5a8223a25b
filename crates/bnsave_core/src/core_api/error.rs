use std::error::Error;
use std::fmt;

use crate::error::SaveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    InvalidLength,
    InvalidStartOffset,
    UnrecognizedGame,
    UnknownVariant,
    ChecksumMismatch,
    StaleChecksum,
    OutOfRange,
    UnknownChip,
    UnknownCode,
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}

impl From<SaveError> for CoreError {
    fn from(err: SaveError) -> Self {
        let code = match err {
            SaveError::InvalidLength { .. } => CoreErrorCode::InvalidLength,
            SaveError::InvalidStartOffset(_) => CoreErrorCode::InvalidStartOffset,
            SaveError::UnrecognizedGame(_) => CoreErrorCode::UnrecognizedGame,
            SaveError::UnknownVariant { .. } => CoreErrorCode::UnknownVariant,
            SaveError::ChecksumMismatch { .. } => CoreErrorCode::ChecksumMismatch,
            SaveError::StaleChecksum { .. } => CoreErrorCode::StaleChecksum,
            SaveError::OutOfRange { .. } | SaveError::IndexOutOfRange { .. } => {
                CoreErrorCode::OutOfRange
            }
            SaveError::UnknownChip(_) => CoreErrorCode::UnknownChip,
            SaveError::UnknownCode { .. } => CoreErrorCode::UnknownCode,
        };
        Self::new(code, err.to_string())
    }
}
