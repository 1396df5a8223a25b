//! Battle Network 4 (Red Sun / Blue Moon) save codec.
//!
//! A [`Save`] owns one unmasked copy of the save region. It is only ever
//! constructed after the start offset, game name and checksum have all been
//! validated, so holding one means the payload was trusted at load time.
//! Edits go through [`FolderEditorMut`]; they leave the stored checksum stale
//! until [`Save::rebuild_checksum`] is called, and export refuses to run
//! while it is stale.

pub mod folder;
pub mod types;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::byte_view::ByteView;
use crate::checksum;
use crate::error::{Result, SaveError};
use crate::layout::{ByteRange, SramLayout};
use crate::mask;
use crate::variant;

pub use folder::{Chip, ChipCodes, FolderEditor, FolderEditorMut, RawChip};
pub use types::{GameVariant, PRIMARY_REGION, Version};

pub const FAMILY: &str = "bn4";

pub const SRAM_END: usize = 0x73d2;
pub const DEVICE_SRAM_SIZE: usize = 0x10000;
pub const MASK_OFFSET: usize = 0x1554;
pub const START_OFFSET_FIELD: usize = 0x1550;
pub const MAX_START_OFFSET: u32 = 0x1fc;
pub const CHECKSUM_OFFSET: usize = 0x21e8;
pub const GAME_NAME_OFFSET: usize = 0x2208;
pub const GAME_NAME: &[u8; 20] = b"ROCKMANEXE4 20031022";

pub const LAYOUT: SramLayout = SramLayout {
    family: FAMILY,
    sram_end: SRAM_END,
    device_size: DEVICE_SRAM_SIZE,
    mask_offset: MASK_OFFSET,
    start_offset_field: START_OFFSET_FIELD,
    max_start_offset: MAX_START_OFFSET,
    checksum: ByteRange::new(CHECKSUM_OFFSET, 4),
    game_name: ByteRange::new(GAME_NAME_OFFSET, GAME_NAME.len()),
    game_name_literal: GAME_NAME,
};

/// Unmasked save bytes biased by the start offset.
pub type SaveView = ByteView<Vec<u8>>;

/// Optional editors that only some families provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Folder,
    RegularChip,
    TagChips,
    Navicust,
    Modcards,
}

/// Read the start offset from an unmasked buffer.
pub fn resolve_start_offset(buf: &[u8]) -> Result<usize> {
    let start = ByteView::new(buf, 0)?.read_u32(LAYOUT.start_offset_field)?;
    if !LAYOUT.accepts_start_offset(start) {
        return Err(SaveError::InvalidStartOffset(start));
    }
    Ok(start as usize)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Save {
    view: SaveView,
    variant: GameVariant,
}

impl Save {
    /// Load a masked SRAM dump, detecting the build from its checksum.
    ///
    /// Dumps longer than the save region (full device images) are truncated.
    pub fn from_sram_dump(bytes: &[u8]) -> Result<Self> {
        let buf = unmask_dump(bytes)?;
        Self::detect_unmasked(buf)
    }

    /// Load an already unmasked save region, detecting the build.
    pub fn from_unmasked(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SRAM_END {
            return Err(SaveError::InvalidLength {
                expected: SRAM_END,
                actual: bytes.len(),
            });
        }
        Self::detect_unmasked(bytes.to_vec())
    }

    /// Load a masked SRAM dump for a build the caller already knows.
    ///
    /// With `verify` set the stored checksum must match that build's formula.
    pub fn from_known_variant(bytes: &[u8], variant: GameVariant, verify: bool) -> Result<Self> {
        let view = open_view(unmask_dump(bytes)?)?;
        let save = Self { view, variant };
        if verify {
            let stored = save.checksum()?;
            let expected = save.expected_checksum();
            if stored != expected {
                return Err(SaveError::ChecksumMismatch { stored, expected });
            }
        } else {
            warn!(%variant, "loading save without checksum verification");
        }
        Ok(save)
    }

    fn detect_unmasked(buf: Vec<u8>) -> Result<Self> {
        let view = open_view(buf)?;
        let variant = variant::detect(&view, LAYOUT.checksum, &GameVariant::ALL)?;
        debug!(%variant, rom = variant.rom_name(), "detected save variant");
        Ok(Self { view, variant })
    }

    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    pub fn rom_name(&self) -> &'static str {
        self.variant.rom_name()
    }

    pub fn family(&self) -> &'static str {
        FAMILY
    }

    pub fn start_offset(&self) -> usize {
        self.view.bias()
    }

    /// The unmasked save region.
    pub fn as_raw_wram(&self) -> &[u8] {
        self.view.as_bytes()
    }

    pub fn view(&self) -> &SaveView {
        &self.view
    }

    pub fn checksum(&self) -> Result<u32> {
        checksum::stored(&self.view, LAYOUT.checksum)
    }

    pub fn expected_checksum(&self) -> u32 {
        checksum::expected(&self.view, LAYOUT.checksum, &self.variant)
    }

    pub fn verify_checksum(&self) -> Result<bool> {
        checksum::verify(&self.view, LAYOUT.checksum, &self.variant)
    }

    /// Trust the current payload and store its checksum.
    pub fn rebuild_checksum(&mut self) -> Result<()> {
        let expected = self.expected_checksum();
        debug!(checksum = expected, "rebuilding checksum");
        self.view.write_u32(LAYOUT.checksum.start, expected)
    }

    /// Masked save region, ready to be written back as a raw dump.
    pub fn export_for_persistence(&self) -> Result<Vec<u8>> {
        self.ensure_checksum_fresh()?;
        let mut out = self.view.as_bytes().to_vec();
        mask::mask(&mut out, LAYOUT.mask_offset)?;
        Ok(out)
    }

    /// Masked full-size device image: the save region zero-padded to the
    /// device size before masking, so the padding carries the mask key.
    pub fn to_sram_dump(&self) -> Result<Vec<u8>> {
        self.ensure_checksum_fresh()?;
        let mut out = vec![0u8; LAYOUT.device_size];
        out[..SRAM_END].copy_from_slice(self.view.as_bytes());
        mask::mask(&mut out, LAYOUT.mask_offset)?;
        Ok(out)
    }

    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::Folder | Feature::RegularChip => true,
            Feature::TagChips | Feature::Navicust | Feature::Modcards => false,
        }
    }

    pub fn folder_editor(&self) -> FolderEditor<&SaveView> {
        FolderEditor::new(&self.view)
    }

    pub fn folder_editor_mut(&mut self) -> FolderEditorMut<'_> {
        FolderEditor::new(&mut self.view)
    }

    fn ensure_checksum_fresh(&self) -> Result<()> {
        let stored = self.checksum()?;
        let expected = self.expected_checksum();
        if stored != expected {
            return Err(SaveError::StaleChecksum { stored, expected });
        }
        Ok(())
    }
}

fn unmask_dump(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < SRAM_END {
        return Err(SaveError::InvalidLength {
            expected: SRAM_END,
            actual: bytes.len(),
        });
    }
    let mut buf = bytes[..SRAM_END].to_vec();
    let mask = mask::unmask(&mut buf, LAYOUT.mask_offset)?;
    debug!(mask, len = bytes.len(), "unmasked sram dump");
    Ok(buf)
}

fn open_view(buf: Vec<u8>) -> Result<SaveView> {
    let start = resolve_start_offset(&buf)?;
    let view = ByteView::new(buf, start)?;
    variant::check_game_name(&view, LAYOUT.game_name, LAYOUT.game_name_literal)?;
    debug!(start, "resolved start offset");
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_start(start: u32) -> Vec<u8> {
        let mut buf = vec![0u8; SRAM_END];
        buf[START_OFFSET_FIELD..START_OFFSET_FIELD + 4].copy_from_slice(&start.to_le_bytes());
        buf
    }

    #[test]
    fn start_offset_bounds() {
        assert_eq!(resolve_start_offset(&with_start(0)), Ok(0));
        assert_eq!(resolve_start_offset(&with_start(0x1fc)), Ok(0x1fc));
        assert_eq!(
            resolve_start_offset(&with_start(0x1fd)),
            Err(SaveError::InvalidStartOffset(0x1fd))
        );
        assert_eq!(
            resolve_start_offset(&with_start(0x200)),
            Err(SaveError::InvalidStartOffset(0x200))
        );
    }

    #[test]
    fn wrong_game_name_is_rejected_before_checksums() {
        let buf = with_start(0x10);
        assert_eq!(
            Save::from_unmasked(&buf),
            Err(SaveError::UnrecognizedGame("\0".repeat(20)))
        );
    }

    #[test]
    fn unmasked_input_must_be_exact_length() {
        assert_eq!(
            Save::from_unmasked(&[0u8; 16]),
            Err(SaveError::InvalidLength {
                expected: SRAM_END,
                actual: 16
            })
        );
    }

    #[test]
    fn layout_fields_fit_inside_the_region() {
        let last = MAX_START_OFFSET as usize + LAYOUT.game_name.end;
        assert!(last <= SRAM_END);
        assert!(LAYOUT.checksum.end <= GAME_NAME_OFFSET);
        assert!(MASK_OFFSET + 4 <= SRAM_END);
    }
}
