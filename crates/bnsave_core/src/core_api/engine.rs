use tracing::{debug, info};

use crate::bn4::folder::{COUNT_STRIDE, FOLDER_COUNT};
use crate::bn4::{Feature, GameVariant, Save};
use crate::chip_code::ChipCode;

use super::chip_catalog::ChipCatalog;
use super::error::{CoreError, CoreErrorCode};
use super::types::{
    Capabilities, CapabilityIssue, ChecksumStatus, ChipPackEntry, FolderChipEntry, Snapshot,
};

const FEATURES: [Feature; 5] = [
    Feature::Folder,
    Feature::RegularChip,
    Feature::TagChips,
    Feature::Navicust,
    Feature::Modcards,
];

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    save: Save,
    capabilities: Capabilities,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Open a masked SRAM dump or device image.
    ///
    /// Without a hint the build is detected from the checksum; with one the
    /// checksum must match that build.
    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<GameVariant>,
    ) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();
        let save = match hint {
            Some(variant) => Save::from_known_variant(bytes, variant, true),
            None => Save::from_sram_dump(bytes),
        }
        .map_err(|e| {
            let e = CoreError::from(e);
            CoreError::new(e.code, format!("failed to open save: {}", e.message))
        })?;
        Ok(Session::new(save, Vec::new()))
    }

    /// Open a dump as `variant` without checking its checksum.
    pub fn open_bytes_unverified<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        variant: GameVariant,
    ) -> Result<Session, CoreError> {
        let save = Save::from_known_variant(bytes.as_ref(), variant, false)?;
        Ok(Session::new(save, vec![CapabilityIssue::ChecksumNotVerified]))
    }
}

impl Session {
    fn new(save: Save, issues: Vec<CapabilityIssue>) -> Self {
        let features = FEATURES
            .into_iter()
            .filter(|&feature| save.supports(feature))
            .collect();
        info!(
            variant = %save.variant(),
            start_offset = save.start_offset(),
            "opened save"
        );
        Self {
            capabilities: Capabilities::editable(features, issues),
            save,
        }
    }

    pub fn game_variant(&self) -> GameVariant {
        self.save.variant()
    }

    pub fn save(&self) -> &Save {
        &self.save
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn checksum_status(&self) -> Result<ChecksumStatus, CoreError> {
        let stored = self.save.checksum()?;
        let expected = self.save.expected_checksum();
        Ok(ChecksumStatus {
            stored,
            expected,
            valid: stored == expected,
        })
    }

    pub fn snapshot(&self) -> Result<Snapshot, CoreError> {
        let editor = self.save.folder_editor();
        Ok(Snapshot {
            family: self.save.family().to_string(),
            variant: self.save.variant(),
            rom_name: self.save.rom_name().to_string(),
            start_offset: self.save.start_offset(),
            checksum: self.checksum_status()?,
            folder_count: editor.folder_count(),
            equipped_folder: editor.equipped_folder()?,
        })
    }

    pub fn folder_count(&self) -> usize {
        FOLDER_COUNT
    }

    pub fn equipped_folder(&self) -> Result<usize, CoreError> {
        Ok(self.save.folder_editor().equipped_folder()?)
    }

    pub fn regular_chip_index(&self, folder: usize) -> Result<Option<usize>, CoreError> {
        Ok(self.save.folder_editor().regular_chip_index(folder)?)
    }

    /// Occupied slots of `folder`, named through `catalog` when one is given.
    pub fn folder_entries(
        &self,
        folder: usize,
        catalog: Option<&ChipCatalog>,
    ) -> Result<Vec<FolderChipEntry>, CoreError> {
        let editor = self.save.folder_editor();
        let regular = editor.regular_chip_index(folder)?;
        let chips = editor.folder(folder)?;

        Ok(chips
            .into_iter()
            .enumerate()
            .filter_map(|(slot, chip)| {
                let chip = chip?;
                Some(FolderChipEntry {
                    slot,
                    id: chip.id,
                    code: chip.code.to_string(),
                    name: catalog
                        .and_then(|catalog| catalog.name(chip.id))
                        .map(str::to_string),
                    regular: regular == Some(slot),
                })
            })
            .collect())
    }

    /// Every nonzero chip pack counter for chips present in `catalog`.
    ///
    /// Only the first `COUNT_STRIDE` codes of an entry have a counter; any
    /// further codes are not listed.
    pub fn chip_pack(&self, catalog: &ChipCatalog) -> Result<Vec<ChipPackEntry>, CoreError> {
        let editor = self.save.folder_editor();
        let mut out = Vec::new();
        for (id, entry) in catalog.iter() {
            for (variant, code) in entry.codes.chars().enumerate().take(COUNT_STRIDE) {
                let count = editor.chip_count_raw(id, variant)?;
                if count == 0 {
                    continue;
                }
                out.push(ChipPackEntry {
                    id,
                    code: code.to_string(),
                    name: entry.name.clone(),
                    count,
                });
            }
        }
        Ok(out)
    }

    pub fn chip_count(
        &self,
        catalog: &ChipCatalog,
        id: usize,
        code: char,
    ) -> Result<u8, CoreError> {
        Ok(self
            .save
            .folder_editor()
            .chip_count_by_code(catalog, id, code)?)
    }

    pub fn set_equipped_folder(&mut self, folder: usize) -> Result<(), CoreError> {
        let raw = u8::try_from(folder).map_err(|_| {
            CoreError::new(
                CoreErrorCode::OutOfRange,
                format!("equipped folder {folder} does not fit in a byte"),
            )
        })?;
        debug!(folder, "setting equipped folder");
        Ok(self.save.folder_editor_mut().set_equipped_folder(raw)?)
    }

    pub fn set_regular_chip_index(
        &mut self,
        folder: usize,
        slot: Option<usize>,
    ) -> Result<(), CoreError> {
        Ok(self
            .save
            .folder_editor_mut()
            .set_regular_chip_index(folder, slot)?)
    }

    pub fn set_chip(
        &mut self,
        folder: usize,
        slot: usize,
        id: usize,
        code: char,
    ) -> Result<(), CoreError> {
        let code = ChipCode::from_char(code).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::UnknownCode,
                format!("{code:?} is not a chip code"),
            )
        })?;
        debug!(folder, slot, id, %code, "setting folder chip");
        Ok(self.save.folder_editor_mut().set_chip(folder, slot, id, code)?)
    }

    pub fn clear_chip(&mut self, folder: usize, slot: usize) -> Result<(), CoreError> {
        debug!(folder, slot, "clearing folder chip");
        Ok(self.save.folder_editor_mut().clear_chip(folder, slot)?)
    }

    pub fn set_chip_count(
        &mut self,
        catalog: &ChipCatalog,
        id: usize,
        code: char,
        count: u8,
    ) -> Result<(), CoreError> {
        debug!(id, %code, count, "setting chip pack count");
        Ok(self
            .save
            .folder_editor_mut()
            .set_chip_count_by_code(catalog, id, code, count)?)
    }

    pub fn rebuild_checksum(&mut self) -> Result<(), CoreError> {
        Ok(self.save.rebuild_checksum()?)
    }

    /// Masked save region; fails while the checksum is stale.
    pub fn save_bytes(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.save.export_for_persistence()?)
    }

    /// Masked full-size device image; fails while the checksum is stale.
    pub fn to_sram_dump(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.save.to_sram_dump()?)
    }
}
