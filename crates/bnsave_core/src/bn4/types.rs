use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checksum::ChecksumFormula;
use crate::variant::Region;

/// Region whose checksum formula does not add the buffer's first byte.
pub const PRIMARY_REGION: Region = Region::Jp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    BlueMoon,
    RedSun,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlueMoon => "bluemoon",
            Self::RedSun => "redsun",
        }
    }

    pub fn checksum_constant(&self) -> u32 {
        match self {
            Self::BlueMoon => 0x22,
            Self::RedSun => 0x16,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One known build of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameVariant {
    pub region: Region,
    pub version: Version,
}

impl GameVariant {
    pub const JP_BLUEMOON: Self = Self::new(Region::Jp, Version::BlueMoon);
    pub const JP_REDSUN: Self = Self::new(Region::Jp, Version::RedSun);
    pub const US_BLUEMOON: Self = Self::new(Region::Us, Version::BlueMoon);
    pub const US_REDSUN: Self = Self::new(Region::Us, Version::RedSun);

    /// Every known build, in checksum detection priority order.
    pub const ALL: [Self; 4] = [
        Self::JP_BLUEMOON,
        Self::JP_REDSUN,
        Self::US_BLUEMOON,
        Self::US_REDSUN,
    ];

    pub const fn new(region: Region, version: Version) -> Self {
        Self { region, version }
    }

    /// Internal ROM title, used to select per-build lookup data.
    pub fn rom_name(&self) -> &'static str {
        match (self.region, self.version) {
            (Region::Jp, Version::BlueMoon) => "ROCK_EXE4_BMB4BJ",
            (Region::Jp, Version::RedSun) => "ROCK_EXE4_RSB4WJ",
            (Region::Us, Version::BlueMoon) => "MEGAMANBN4BMB4BE",
            (Region::Us, Version::RedSun) => "MEGAMANBN4RSB4WE",
        }
    }

    pub fn from_rom_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.rom_name() == name)
    }
}

impl ChecksumFormula for GameVariant {
    fn checksum_constant(&self) -> u32 {
        self.version.checksum_constant()
    }

    fn adds_first_byte(&self) -> bool {
        self.region != PRIMARY_REGION
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.region, self.version)
    }
}
