//! Build identification.
//!
//! Save files carry no explicit build tag, so the checksum formula is the only
//! discriminator: every known build's formula is tried in a fixed priority
//! order and the first exact match wins. A fixed ASCII game name is checked
//! beforehand to reject saves from other games outright.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::byte_view::ByteView;
use crate::checksum::{self, ChecksumFormula};
use crate::error::{Result, SaveError};
use crate::layout::ByteRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Jp,
    Us,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jp => "JP",
            Self::Us => "US",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject buffers whose game-name field is not exactly `literal`.
pub fn check_game_name<B: AsRef<[u8]>>(
    view: &ByteView<B>,
    field: ByteRange,
    literal: &[u8],
) -> Result<()> {
    let name = view.read_bytes(field.start, field.len())?;
    if name != literal {
        return Err(SaveError::UnrecognizedGame(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }
    Ok(())
}

/// Return the first candidate whose checksum formula reproduces the stored checksum.
pub fn detect<B, V>(view: &ByteView<B>, field: ByteRange, candidates: &[V]) -> Result<V>
where
    B: AsRef<[u8]>,
    V: ChecksumFormula + Copy + fmt::Debug,
{
    let stored = checksum::stored(view, field)?;
    let raw = checksum::raw_sum(view, field);
    let first = checksum::first_byte(view);

    candidates
        .iter()
        .copied()
        .find(|candidate| checksum::expected_from_raw(raw, first, candidate) == stored)
        .inspect(|found| debug!(?found, stored, raw, "checksum formula matched"))
        .ok_or(SaveError::UnknownVariant { stored })
}
