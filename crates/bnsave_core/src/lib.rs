//! Save codec for Battle Network 4 SRAM dumps.
//!
//! The save region is a fixed-size blob obfuscated with a single-byte XOR key
//! and protected by an additive checksum whose formula depends on the game
//! build. This crate locates the payload, unmasks it, identifies the build and
//! exposes typed folder and chip-pack accessors over the decoded bytes.
//!
//! ```no_run
//! use bnsave_core::bn4::Save;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dump = std::fs::read("bn4.sav")?;
//! let mut save = Save::from_sram_dump(&dump)?;
//! println!("{}", save.variant());
//!
//! save.folder_editor_mut().set_equipped_folder(2)?;
//! save.rebuild_checksum()?;
//! std::fs::write("bn4.sav", save.export_for_persistence()?)?;
//! # Ok(())
//! # }
//! ```

pub mod bn4;
pub mod byte_view;
pub mod checksum;
pub mod chip_code;
pub mod core_api;
pub mod error;
pub mod layout;
pub mod mask;
pub mod variant;

pub use error::{Result, SaveError};
