//! Chip folder and chip pack access.
//!
//! Offsets below are relative to the save's start offset.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::SaveView;
use crate::chip_code::ChipCode;
use crate::error::{Result, SaveError};

pub const FOLDER_COUNT: usize = 3;
pub const FOLDER_SIZE: usize = 30;

const EQUIPPED_FOLDER_OFFSET: usize = 0x2132;
const REGULAR_CHIP_OFFSET: usize = 0x214d;
const REGULAR_CHIP_NONE: u8 = 0xff;
const FOLDER_OFFSET: usize = 0x262c;
const CHIP_COUNT_OFFSET: usize = 0x26e4;

/// Chip ids occupy the low 9 bits of a folder word, the variant the rest.
pub const CHIP_ID_BITS: u32 = 9;
pub const CHIP_ID_LIMIT: usize = 1 << CHIP_ID_BITS;
pub const VARIANT_LIMIT: usize = 1 << (16 - CHIP_ID_BITS);
/// Chip pack counters reserved per chip id.
pub const COUNT_STRIDE: usize = 0xc;

/// A folder word split into id and variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawChip {
    pub id: usize,
    pub variant: usize,
}

impl RawChip {
    /// Decode a folder word. The zero word is an empty slot.
    pub fn from_word(word: u16) -> Option<Self> {
        if word == 0 {
            return None;
        }
        Some(Self {
            id: usize::from(word) & (CHIP_ID_LIMIT - 1),
            variant: usize::from(word >> CHIP_ID_BITS),
        })
    }

    pub fn to_word(self) -> Result<u16> {
        check_index("chip id", self.id, CHIP_ID_LIMIT)?;
        check_index("chip variant", self.variant, VARIANT_LIMIT)?;
        Ok((self.id | (self.variant << CHIP_ID_BITS)) as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chip {
    pub id: usize,
    pub code: ChipCode,
}

/// Per-chip code strings, used to resolve a code letter to its pack counter.
pub trait ChipCodes {
    fn chip_codes(&self, id: usize) -> Option<&str>;

    /// Position of `code` within chip `id`'s own code string.
    fn code_index(&self, id: usize, code: char) -> Result<usize> {
        let codes = self.chip_codes(id).ok_or(SaveError::UnknownChip(id))?;
        let code = code.to_ascii_uppercase();
        codes
            .chars()
            .position(|c| c == code)
            .ok_or(SaveError::UnknownCode { id, code })
    }
}

/// Folder editor over a borrowed save view.
///
/// Reads need only a shared borrow; the write methods are available when the
/// editor holds the view mutably (see [`FolderEditorMut`]).
#[derive(Debug)]
pub struct FolderEditor<V> {
    view: V,
}

pub type FolderEditorMut<'a> = FolderEditor<&'a mut SaveView>;

fn check_index(what: &'static str, index: usize, limit: usize) -> Result<()> {
    if index >= limit {
        return Err(SaveError::IndexOutOfRange { what, index, limit });
    }
    Ok(())
}

fn slot_offset(folder: usize, slot: usize) -> Result<usize> {
    check_index("folder", folder, FOLDER_COUNT)?;
    check_index("folder slot", slot, FOLDER_SIZE)?;
    Ok(FOLDER_OFFSET + folder * FOLDER_SIZE * 2 + slot * 2)
}

// The variant is OR-ed into the id stride, not added.
fn count_offset(id: usize, variant: usize) -> Result<usize> {
    check_index("chip id", id, CHIP_ID_LIMIT)?;
    check_index("chip variant", variant, COUNT_STRIDE)?;
    Ok(CHIP_COUNT_OFFSET + ((id * COUNT_STRIDE) | variant))
}

impl<V: Deref<Target = SaveView>> FolderEditor<V> {
    pub fn new(view: V) -> Self {
        Self { view }
    }

    pub fn folder_count(&self) -> usize {
        FOLDER_COUNT
    }

    pub fn equipped_folder(&self) -> Result<usize> {
        Ok(usize::from(self.view.read_u8(EQUIPPED_FOLDER_OFFSET)?))
    }

    /// Slot holding the folder's regular chip, if one is set.
    pub fn regular_chip_index(&self, folder: usize) -> Result<Option<usize>> {
        check_index("folder", folder, FOLDER_COUNT)?;
        let raw = self.view.read_u8(REGULAR_CHIP_OFFSET + folder)?;
        Ok((raw != REGULAR_CHIP_NONE).then_some(usize::from(raw)))
    }

    /// This family keeps no tag chips.
    pub fn tag_chip_indices(&self, folder: usize) -> Result<Option<(usize, usize)>> {
        check_index("folder", folder, FOLDER_COUNT)?;
        Ok(None)
    }

    /// Whether the regular chip is stored in its folder slot rather than
    /// moved to the front.
    pub fn is_regular_chip_in_place(&self) -> bool {
        false
    }

    pub fn chip_raw(&self, folder: usize, slot: usize) -> Result<Option<RawChip>> {
        let word = self.view.read_u16(slot_offset(folder, slot)?)?;
        Ok(RawChip::from_word(word))
    }

    pub fn chip(&self, folder: usize, slot: usize) -> Result<Option<Chip>> {
        Ok(self.chip_raw(folder, slot)?.map(|raw| Chip {
            id: raw.id,
            code: ChipCode::from_raw(raw.variant),
        }))
    }

    pub fn folder(&self, folder: usize) -> Result<Vec<Option<Chip>>> {
        (0..FOLDER_SIZE).map(|slot| self.chip(folder, slot)).collect()
    }

    pub fn chip_count_raw(&self, id: usize, variant: usize) -> Result<u8> {
        self.view.read_u8(count_offset(id, variant)?)
    }

    pub fn chip_count_by_code<C: ChipCodes + ?Sized>(
        &self,
        codes: &C,
        id: usize,
        code: char,
    ) -> Result<u8> {
        self.chip_count_raw(id, codes.code_index(id, code)?)
    }
}

impl<V: DerefMut<Target = SaveView>> FolderEditor<V> {
    pub fn set_equipped_folder(&mut self, folder: u8) -> Result<()> {
        self.view.write_u8(EQUIPPED_FOLDER_OFFSET, folder)
    }

    pub fn set_regular_chip_index(&mut self, folder: usize, slot: Option<usize>) -> Result<()> {
        check_index("folder", folder, FOLDER_COUNT)?;
        let raw = match slot {
            Some(slot) => {
                check_index("folder slot", slot, FOLDER_SIZE)?;
                slot as u8
            }
            None => REGULAR_CHIP_NONE,
        };
        self.view.write_u8(REGULAR_CHIP_OFFSET + folder, raw)
    }

    pub fn set_chip_raw(&mut self, folder: usize, slot: usize, chip: RawChip) -> Result<()> {
        let offset = slot_offset(folder, slot)?;
        self.view.write_u16(offset, chip.to_word()?)
    }

    pub fn set_chip(
        &mut self,
        folder: usize,
        slot: usize,
        id: usize,
        code: ChipCode,
    ) -> Result<()> {
        let variant = code.raw().ok_or(SaveError::UnknownCode {
            id,
            code: code.as_char().unwrap_or('?'),
        })?;
        self.set_chip_raw(folder, slot, RawChip { id, variant })
    }

    pub fn clear_chip(&mut self, folder: usize, slot: usize) -> Result<()> {
        let offset = slot_offset(folder, slot)?;
        self.view.write_u16(offset, 0)
    }

    pub fn set_chip_count_raw(&mut self, id: usize, variant: usize, count: u8) -> Result<()> {
        let offset = count_offset(id, variant)?;
        self.view.write_u8(offset, count)
    }

    pub fn set_chip_count_by_code<C: ChipCodes + ?Sized>(
        &mut self,
        codes: &C,
        id: usize,
        code: char,
        count: u8,
    ) -> Result<()> {
        let variant = codes.code_index(id, code)?;
        self.set_chip_count_raw(id, variant, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bn4::SRAM_END;
    use crate::byte_view::ByteView;

    struct Codes;

    impl ChipCodes for Codes {
        fn chip_codes(&self, id: usize) -> Option<&str> {
            (id == 7).then_some("*AJS")
        }
    }

    fn blank(bias: usize) -> SaveView {
        ByteView::new(vec![0u8; SRAM_END], bias).expect("view")
    }

    #[test]
    fn folder_words_pack_id_and_variant() {
        assert_eq!(RawChip::from_word(0), None);
        assert_eq!(
            RawChip::from_word(0x1ff | (26 << 9)),
            Some(RawChip {
                id: 511,
                variant: 26
            })
        );
        assert_eq!(RawChip { id: 3, variant: 1 }.to_word(), Ok(0x203));
        assert!(RawChip { id: 512, variant: 0 }.to_word().is_err());
        assert!(RawChip { id: 1, variant: 128 }.to_word().is_err());
    }

    #[test]
    fn set_chip_writes_biased_little_endian_word() {
        let mut view = blank(0x10);
        let mut editor = FolderEditor::new(&mut view);
        editor
            .set_chip(1, 2, 0x123, ChipCode::Code('C'))
            .expect("set chip");
        assert_eq!(
            editor.chip(1, 2).expect("chip"),
            Some(Chip {
                id: 0x123,
                code: ChipCode::Code('C')
            })
        );
        let at = 0x10 + FOLDER_OFFSET + FOLDER_SIZE * 2 + 4;
        assert_eq!(&view.as_bytes()[at..at + 2], &[0x23, 0x05]);
    }

    #[test]
    fn clearing_a_slot_reads_back_empty() {
        let mut view = blank(0);
        let mut editor = FolderEditor::new(&mut view);
        editor.set_chip(0, 0, 1, ChipCode::ASTERISK).expect("set");
        editor.clear_chip(0, 0).expect("clear");
        assert_eq!(editor.chip(0, 0).expect("chip"), None);
    }

    #[test]
    fn codes_outside_the_alphabet_are_not_written() {
        let mut view = blank(0);
        let mut editor = FolderEditor::new(&mut view);
        assert_eq!(
            editor.set_chip(0, 0, 5, ChipCode::Code('#')),
            Err(SaveError::UnknownCode { id: 5, code: '#' })
        );
        assert_eq!(editor.chip(0, 0), Ok(None));
        editor
            .set_chip(0, 1, 5, ChipCode::Unknown(40))
            .expect("raw variants below 128 are writable");
        assert_eq!(editor.chip_raw(0, 1), Ok(Some(RawChip { id: 5, variant: 40 })));
    }

    #[test]
    fn regular_chip_sentinel_is_none() {
        let mut view = blank(0);
        let mut editor = FolderEditor::new(&mut view);
        editor.set_regular_chip_index(2, None).expect("clear");
        editor.set_regular_chip_index(0, Some(29)).expect("set");
        assert_eq!(editor.regular_chip_index(2), Ok(None));
        assert_eq!(editor.regular_chip_index(0), Ok(Some(29)));
        assert!(editor.set_regular_chip_index(0, Some(30)).is_err());
        assert_eq!(view.as_bytes()[REGULAR_CHIP_OFFSET + 2], 0xff);
    }

    #[test]
    fn out_of_domain_indices_are_rejected() {
        let view = blank(0);
        let editor = FolderEditor::new(&view);
        assert_eq!(
            editor.chip(3, 0),
            Err(SaveError::IndexOutOfRange {
                what: "folder",
                index: 3,
                limit: 3
            })
        );
        assert!(editor.chip(0, 30).is_err());
        assert!(editor.tag_chip_indices(3).is_err());
        assert_eq!(editor.tag_chip_indices(0), Ok(None));
    }

    #[test]
    fn chip_counts_use_or_packing_and_per_chip_code_order() {
        let mut view = blank(0);
        let mut editor = FolderEditor::new(&mut view);
        editor.set_chip_count_by_code(&Codes, 7, 's', 9).expect("count");

        // 7 * 0xc = 0x54; 0x54 | 3 = 0x57.
        assert_eq!(view.as_bytes()[CHIP_COUNT_OFFSET + 0x57], 9);
        let editor = FolderEditor::new(&view);
        assert_eq!(editor.chip_count_raw(7, 3), Ok(9));
        assert_eq!(editor.chip_count_by_code(&Codes, 7, 'S'), Ok(9));
        // 1 * 0xc | 4 overlaps 1 * 0xc | 0.
        assert_eq!(count_offset(1, 4), count_offset(1, 0));
    }

    #[test]
    fn chip_count_by_code_reports_unknown_entries() {
        let view = blank(0);
        let editor = FolderEditor::new(&view);
        assert_eq!(
            editor.chip_count_by_code(&Codes, 8, 'A'),
            Err(SaveError::UnknownChip(8))
        );
        assert_eq!(
            editor.chip_count_by_code(&Codes, 7, 'B'),
            Err(SaveError::UnknownCode { id: 7, code: 'B' })
        );
    }
}
