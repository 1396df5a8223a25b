use std::fmt::Write as _;

use bnsave_core::core_api::{
    Capabilities, ChecksumStatus, ChipCatalog, ChipPackEntry, CoreError, FolderChipEntry, Session,
};
use serde_json::{Map as JsonMap, Value as JsonValue, json};

const LABEL_WIDTH: usize = 17;
const NAME_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Summary,
}

/// Fields picked individually on the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub variant: bool,
    pub folder: Option<usize>,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.variant || self.folder.is_some()
    }
}

pub fn render_json_full(
    session: &Session,
    catalog: Option<&ChipCatalog>,
    style: JsonStyle,
) -> Result<JsonValue, CoreError> {
    match style {
        JsonStyle::CanonicalV1 => default_json(session, catalog).map(JsonValue::Object),
    }
}

pub fn render_json_selected(
    session: &Session,
    fields: &FieldSelection,
    catalog: Option<&ChipCatalog>,
    style: JsonStyle,
) -> Result<JsonValue, CoreError> {
    match style {
        JsonStyle::CanonicalV1 => selected_json(fields, session, catalog).map(JsonValue::Object),
    }
}

pub fn render_text(
    session: &Session,
    catalog: Option<&ChipCatalog>,
    style: TextStyle,
) -> Result<String, CoreError> {
    match style {
        TextStyle::Summary => render_summary(session, catalog),
    }
}

/// `key=value` lines for the selected fields.
pub fn render_selected_pairs(
    session: &Session,
    fields: &FieldSelection,
    catalog: Option<&ChipCatalog>,
) -> Result<Vec<(&'static str, String)>, CoreError> {
    let mut out = Vec::new();

    if fields.variant {
        let variant = session.game_variant();
        out.push(("region", variant.region.to_string()));
        out.push(("version", variant.version.to_string()));
        out.push(("rom_name", variant.rom_name().to_string()));
    }
    if let Some(folder) = fields.folder {
        for entry in session.folder_entries(folder, catalog)? {
            out.push(("chip", format_folder_entry(&entry)));
        }
    }

    Ok(out)
}

fn selected_json(
    fields: &FieldSelection,
    session: &Session,
    catalog: Option<&ChipCatalog>,
) -> Result<JsonMap<String, JsonValue>, CoreError> {
    let mut out = JsonMap::new();

    if fields.variant {
        let variant = session.game_variant();
        out.insert("region".to_string(), json!(variant.region));
        out.insert("version".to_string(), json!(variant.version));
        out.insert("rom_name".to_string(), json!(variant.rom_name()));
    }
    if let Some(folder) = fields.folder {
        out.insert("folder".to_string(), folder_to_json(session, folder, catalog)?);
    }

    Ok(out)
}

fn default_json(
    session: &Session,
    catalog: Option<&ChipCatalog>,
) -> Result<JsonMap<String, JsonValue>, CoreError> {
    let snapshot = session.snapshot()?;
    let mut out = JsonMap::new();

    out.insert("family".to_string(), json!(snapshot.family));
    out.insert("region".to_string(), json!(snapshot.variant.region));
    out.insert("version".to_string(), json!(snapshot.variant.version));
    out.insert("rom_name".to_string(), json!(snapshot.rom_name));
    out.insert("start_offset".to_string(), json!(snapshot.start_offset));
    out.insert("checksum".to_string(), checksum_to_json(&snapshot.checksum));
    out.insert("equipped_folder".to_string(), json!(snapshot.equipped_folder));

    let folders = (0..snapshot.folder_count)
        .map(|folder| folder_to_json(session, folder, catalog))
        .collect::<Result<Vec<_>, _>>()?;
    out.insert("folders".to_string(), JsonValue::Array(folders));

    out.insert(
        "chip_pack".to_string(),
        match catalog {
            Some(catalog) => chip_pack_to_json(&session.chip_pack(catalog)?),
            None => JsonValue::Null,
        },
    );
    out.insert(
        "capabilities".to_string(),
        capabilities_to_json(session.capabilities()),
    );

    Ok(out)
}

fn checksum_to_json(status: &ChecksumStatus) -> JsonValue {
    json!({
        "stored": status.stored,
        "expected": status.expected,
        "valid": status.valid,
    })
}

fn folder_to_json(
    session: &Session,
    folder: usize,
    catalog: Option<&ChipCatalog>,
) -> Result<JsonValue, CoreError> {
    let chips: Vec<JsonValue> = session
        .folder_entries(folder, catalog)?
        .iter()
        .map(|entry| {
            json!({
                "slot": entry.slot,
                "id": entry.id,
                "code": entry.code,
                "name": entry.name,
                "regular": entry.regular,
            })
        })
        .collect();

    Ok(json!({
        "index": folder,
        "regular_chip_index": session.regular_chip_index(folder)?,
        "chips": chips,
    }))
}

fn chip_pack_to_json(pack: &[ChipPackEntry]) -> JsonValue {
    JsonValue::Array(
        pack.iter()
            .map(|entry| {
                json!({
                    "id": entry.id,
                    "code": entry.code,
                    "name": entry.name,
                    "count": entry.count,
                })
            })
            .collect(),
    )
}

fn capabilities_to_json(caps: &Capabilities) -> JsonValue {
    json!({
        "features": caps.features,
        "issues": caps.issues,
    })
}

fn render_summary(session: &Session, catalog: Option<&ChipCatalog>) -> Result<String, CoreError> {
    let snapshot = session.snapshot()?;
    let mut out = String::new();

    writeln!(&mut out, "Battle Network save ({})", snapshot.family)
        .expect("writing to String cannot fail");
    write_field(
        &mut out,
        "Variant",
        &format!("{} ({})", snapshot.variant, snapshot.rom_name),
    );
    write_field(&mut out, "Start offset", &format!("{:#x}", snapshot.start_offset));
    write_field(&mut out, "Checksum", &format_checksum(&snapshot.checksum));
    write_field(
        &mut out,
        "Equipped folder",
        &format!("{} of {}", snapshot.equipped_folder, snapshot.folder_count),
    );

    for folder in 0..snapshot.folder_count {
        let entries = session.folder_entries(folder, catalog)?;
        let marker = if folder == snapshot.equipped_folder {
            " [equipped]"
        } else {
            ""
        };
        writeln!(&mut out).expect("writing to String cannot fail");
        writeln!(&mut out, "Folder {folder}{marker}").expect("writing to String cannot fail");
        if entries.is_empty() {
            writeln!(&mut out, "  (empty)").expect("writing to String cannot fail");
        }
        for entry in &entries {
            writeln!(&mut out, "  {}", format_folder_entry(entry))
                .expect("writing to String cannot fail");
        }
    }

    if let Some(catalog) = catalog {
        let pack = session.chip_pack(catalog)?;
        writeln!(&mut out).expect("writing to String cannot fail");
        writeln!(&mut out, "Chip pack").expect("writing to String cannot fail");
        if pack.is_empty() {
            writeln!(&mut out, "  (empty)").expect("writing to String cannot fail");
        }
        for entry in &pack {
            writeln!(
                &mut out,
                "  {} {} x{}",
                fit_column(&entry.name, NAME_WIDTH),
                entry.code,
                entry.count
            )
            .expect("writing to String cannot fail");
        }
    }

    let issues = &session.capabilities().issues;
    if !issues.is_empty() {
        writeln!(&mut out).expect("writing to String cannot fail");
        let names: Vec<String> = issues.iter().map(|issue| format!("{issue:?}")).collect();
        write_field(&mut out, "Notes", &names.join(", "));
    }

    Ok(out)
}

fn write_field(out: &mut String, label: &str, value: &str) {
    writeln!(
        out,
        "{:<width$}{value}",
        format!("{label}:"),
        width = LABEL_WIDTH
    )
    .expect("writing to String cannot fail");
}

fn format_checksum(status: &ChecksumStatus) -> String {
    if status.valid {
        format!("{:#010x} (ok)", status.stored)
    } else {
        format!(
            "{:#010x} (stale, expected {:#010x})",
            status.stored, status.expected
        )
    }
}

fn format_folder_entry(entry: &FolderChipEntry) -> String {
    let name = entry.name.as_deref().unwrap_or("?");
    let regular = if entry.regular { " [regular]" } else { "" };
    format!(
        "{:>2}  {} {:<2} (id {}){regular}",
        entry.slot,
        fit_column(name, NAME_WIDTH),
        entry.code,
        entry.id
    )
}

fn fit_column(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_column_pads_and_truncates() {
        assert_eq!(fit_column("Cannon", 8), "Cannon  ");
        assert_eq!(fit_column("ZeusHammer", 4), "Zeus");
    }

    #[test]
    fn folder_entry_line_marks_regular_chip() {
        let entry = FolderChipEntry {
            slot: 5,
            id: 6,
            code: "*".to_string(),
            name: Some("Cannon".to_string()),
            regular: true,
        };
        assert_eq!(
            format_folder_entry(&entry),
            " 5  Cannon           *  (id 6) [regular]"
        );
    }

    #[test]
    fn checksum_line_reports_staleness() {
        let stale = ChecksumStatus {
            stored: 0x10,
            expected: 0x20,
            valid: false,
        };
        assert_eq!(
            format_checksum(&stale),
            "0x00000010 (stale, expected 0x00000020)"
        );
    }
}
