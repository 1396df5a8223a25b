use std::fs;
use std::path::PathBuf;
use std::process;

use bnsave_core::bn4::GameVariant;
use bnsave_core::core_api::{ChipCatalog, Engine, Session};
use bnsave_render::{
    FieldSelection, JsonStyle, TextStyle, render_json_full, render_json_selected,
    render_selected_pairs, render_text,
};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    JpBluemoon,
    JpRedsun,
    UsBluemoon,
    UsRedsun,
}

impl VariantArg {
    fn to_core(self) -> GameVariant {
        match self {
            Self::JpBluemoon => GameVariant::JP_BLUEMOON,
            Self::JpRedsun => GameVariant::JP_REDSUN,
            Self::UsBluemoon => GameVariant::US_BLUEMOON,
            Self::UsRedsun => GameVariant::US_REDSUN,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ChipEdit {
    folder: usize,
    slot: usize,
    id: usize,
    code: char,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct SlotRef {
    folder: usize,
    slot: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct CountEdit {
    id: usize,
    code: char,
    count: u8,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.SAV")]
    path: PathBuf,
    /// Skip checksum detection and treat the save as this build.
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    /// Accept a save whose checksum does not match (requires --variant).
    #[arg(long = "no-verify", requires = "variant")]
    no_verify: bool,
    /// Chip catalog JSON used for chip names and chip pack counts.
    #[arg(long, env = "BNSAVE_CATALOG", value_name = "CHIPS.JSON")]
    catalog: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    #[arg(long = "variant-only")]
    variant_only: bool,
    #[arg(long, value_name = "N")]
    folder: Option<usize>,
    #[arg(long = "set-equipped-folder", value_name = "N")]
    set_equipped_folder: Option<usize>,
    #[arg(long = "set-chip", value_name = "FOLDER:SLOT:ID:CODE", value_parser = parse_chip_edit)]
    set_chip: Vec<ChipEdit>,
    #[arg(long = "clear-chip", value_name = "FOLDER:SLOT", value_parser = parse_slot_ref)]
    clear_chip: Vec<SlotRef>,
    #[arg(long = "set-chip-count", value_name = "ID:CODE:N", value_parser = parse_count_edit)]
    set_chip_count: Vec<CountEdit>,
    #[arg(long = "rebuild-checksum")]
    rebuild_checksum: bool,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write a full 64 KiB device image instead of the bare save region.
    #[arg(long = "device-image", requires = "output")]
    device_image: bool,
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn has_edits(&self) -> bool {
        self.set_equipped_folder.is_some()
            || !self.set_chip.is_empty()
            || !self.clear_chip.is_empty()
            || !self.set_chip_count.is_empty()
            || self.rebuild_checksum
    }

    fn fields(&self) -> FieldSelection {
        FieldSelection {
            variant: self.variant_only,
            folder: self.folder,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let has_edits = cli.has_edits();
    if has_edits && cli.output.is_none() {
        eprintln!("--set-*, --clear-chip and --rebuild-checksum require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one edit flag");
        process::exit(2);
    }
    if !cli.set_chip_count.is_empty() && cli.catalog.is_none() {
        eprintln!("--set-chip-count requires --catalog <PATH> (or BNSAVE_CATALOG)");
        process::exit(2);
    }

    let catalog = cli.catalog.as_ref().map(|path| {
        ChipCatalog::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading chip catalog: {e}");
            process::exit(1);
        })
    });

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });
    debug!(path = %cli.path.display(), len = bytes.len(), "read save file");

    let engine = Engine::new();
    let opened = match (cli.variant.map(VariantArg::to_core), cli.no_verify) {
        (Some(variant), true) => engine.open_bytes_unverified(bytes, variant),
        (hint, _) => engine.open_bytes(bytes, hint),
    };
    let mut session = opened.unwrap_or_else(|e| {
        eprintln!("Error parsing save file: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    if has_edits {
        apply_edits(&cli, &mut session, catalog.as_ref());
        write_output(&cli, &mut session);
    }

    let fields = cli.fields();
    if cli.json {
        let value = if fields.is_any_selected() {
            render_json_selected(&session, &fields, catalog.as_ref(), JsonStyle::CanonicalV1)
        } else {
            render_json_full(&session, catalog.as_ref(), JsonStyle::CanonicalV1)
        };
        let rendered = value
            .map_err(|e| e.to_string())
            .and_then(|value| serde_json::to_string_pretty(&value).map_err(|e| e.to_string()))
            .unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
        println!("{rendered}");
        return;
    }

    if fields.is_any_selected() {
        let pairs = render_selected_pairs(&session, &fields, catalog.as_ref())
            .unwrap_or_else(|e| {
                eprintln!("Error reading fields: {e}");
                process::exit(1);
            });
        for (key, value) in pairs {
            println!("{key}={value}");
        }
        return;
    }

    if let Some(out_path) = cli.output.as_ref() {
        println!("Wrote edited save to {}", out_path.display());
        return;
    }

    let text = render_text(&session, catalog.as_ref(), TextStyle::Summary).unwrap_or_else(|e| {
        eprintln!("Error rendering save summary: {e}");
        process::exit(1);
    });
    print!("{text}");
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("bnsave={level}").into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn apply_edits(cli: &Cli, session: &mut Session, catalog: Option<&ChipCatalog>) {
    if let Some(folder) = cli.set_equipped_folder {
        session.set_equipped_folder(folder).unwrap_or_else(|e| {
            eprintln!("Error applying equipped folder edit: {e}");
            process::exit(1);
        });
    }
    for edit in &cli.set_chip {
        session
            .set_chip(edit.folder, edit.slot, edit.id, edit.code)
            .unwrap_or_else(|e| {
                eprintln!("Error applying chip edit: {e}");
                process::exit(1);
            });
    }
    for slot in &cli.clear_chip {
        session.clear_chip(slot.folder, slot.slot).unwrap_or_else(|e| {
            eprintln!("Error clearing chip: {e}");
            process::exit(1);
        });
    }
    if let Some(catalog) = catalog {
        for edit in &cli.set_chip_count {
            session
                .set_chip_count(catalog, edit.id, edit.code, edit.count)
                .unwrap_or_else(|e| {
                    eprintln!("Error applying chip count edit: {e}");
                    process::exit(1);
                });
        }
    }
}

fn write_output(cli: &Cli, session: &mut Session) {
    let Some(out_path) = cli.output.as_ref() else {
        return;
    };

    session.rebuild_checksum().unwrap_or_else(|e| {
        eprintln!("Error rebuilding checksum: {e}");
        process::exit(1);
    });
    let bytes = if cli.device_image {
        session.to_sram_dump()
    } else {
        session.save_bytes()
    };
    let bytes = bytes.unwrap_or_else(|e| {
        eprintln!("Error creating edited save bytes: {e}");
        process::exit(1);
    });
    fs::write(out_path, &bytes).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", out_path.display());
        process::exit(1);
    });
    info!(path = %out_path.display(), len = bytes.len(), "wrote edited save");
}

fn split_fields<'a, const N: usize>(value: &'a str, shape: &str) -> Result<[&'a str; N], String> {
    let parts: Vec<&str> = value.split(':').collect();
    <[&str; N]>::try_from(parts).map_err(|_| format!("expected {shape}, got {value:?}"))
}

fn parse_index(value: &str, what: &str) -> Result<usize, String> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("invalid {what}: {value:?}"))
}

fn parse_code(value: &str) -> Result<char, String> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => Ok(code.to_ascii_uppercase()),
        _ => Err(format!("chip code must be a single character, got {value:?}")),
    }
}

fn parse_chip_edit(value: &str) -> Result<ChipEdit, String> {
    let [folder, slot, id, code] = split_fields::<4>(value, "FOLDER:SLOT:ID:CODE")?;
    Ok(ChipEdit {
        folder: parse_index(folder, "folder")?,
        slot: parse_index(slot, "slot")?,
        id: parse_index(id, "chip id")?,
        code: parse_code(code)?,
    })
}

fn parse_slot_ref(value: &str) -> Result<SlotRef, String> {
    let [folder, slot] = split_fields::<2>(value, "FOLDER:SLOT")?;
    Ok(SlotRef {
        folder: parse_index(folder, "folder")?,
        slot: parse_index(slot, "slot")?,
    })
}

fn parse_count_edit(value: &str) -> Result<CountEdit, String> {
    let [id, code, count] = split_fields::<3>(value, "ID:CODE:N")?;
    Ok(CountEdit {
        id: parse_index(id, "chip id")?,
        code: parse_code(code)?,
        count: u8::try_from(parse_index(count, "count")?)
            .map_err(|_| format!("count must be at most 255, got {count:?}"))?,
    })
}
