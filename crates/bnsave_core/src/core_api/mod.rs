mod chip_catalog;
mod engine;
mod error;
mod types;

pub use chip_catalog::ChipCatalog;
pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{
    Capabilities, CapabilityIssue, ChecksumStatus, ChipCatalogEntry, ChipPackEntry,
    FolderChipEntry, Snapshot,
};
