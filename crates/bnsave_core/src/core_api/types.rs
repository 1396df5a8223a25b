use serde::{Deserialize, Serialize};

use crate::bn4::{Feature, GameVariant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub family: String,
    pub variant: GameVariant,
    pub rom_name: String,
    pub start_offset: usize,
    pub checksum: ChecksumStatus,
    pub folder_count: usize,
    pub equipped_folder: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksumStatus {
    pub stored: u32,
    pub expected: u32,
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityIssue {
    ChecksumNotVerified,
    TagChipsUnsupported,
    NavicustUnsupported,
    ModcardsUnsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capabilities {
    pub can_query: bool,
    pub can_apply_edits: bool,
    pub features: Vec<Feature>,
    pub issues: Vec<CapabilityIssue>,
}

impl Capabilities {
    pub fn editable(features: Vec<Feature>, mut issues: Vec<CapabilityIssue>) -> Self {
        for (feature, issue) in [
            (Feature::TagChips, CapabilityIssue::TagChipsUnsupported),
            (Feature::Navicust, CapabilityIssue::NavicustUnsupported),
            (Feature::Modcards, CapabilityIssue::ModcardsUnsupported),
        ] {
            if !features.contains(&feature) && !issues.contains(&issue) {
                issues.push(issue);
            }
        }

        Self {
            can_query: true,
            can_apply_edits: true,
            features,
            issues,
        }
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

/// One occupied folder slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderChipEntry {
    pub slot: usize,
    pub id: usize,
    pub code: String,
    pub name: Option<String>,
    pub regular: bool,
}

/// A nonzero chip pack counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChipPackEntry {
    pub id: usize,
    pub code: String,
    pub name: String,
    pub count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChipCatalogEntry {
    pub name: String,
    pub codes: String,
}
