use std::path::PathBuf;

use bnsave_core::core_api::{ChipCatalog, Engine, Session};
use bnsave_render::{
    FieldSelection, JsonStyle, TextStyle, render_json_full, render_json_selected,
    render_selected_pairs, render_text,
};
use serde_json::{Value, json};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn session_from_fixture(name: &str) -> Session {
    let bytes = std::fs::read(workspace_root().join("tests/fixtures").join(name))
        .expect("fixture should be readable");
    Engine::new()
        .open_bytes(bytes, None)
        .expect("fixture should parse")
}

fn catalog() -> ChipCatalog {
    ChipCatalog::load(&workspace_root().join("tests/fixtures/chips.json"))
        .expect("catalog should parse")
}

#[test]
fn full_json_uses_canonical_top_level_order() {
    let session = session_from_fixture("bn4_jp_bluemoon.sav");
    let value = render_json_full(&session, None, JsonStyle::CanonicalV1).expect("render");
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(
        keys,
        vec![
            "family",
            "region",
            "version",
            "rom_name",
            "start_offset",
            "checksum",
            "equipped_folder",
            "folders",
            "chip_pack",
            "capabilities",
        ]
    );
    assert_eq!(value["region"], "JP");
    assert_eq!(value["version"], "bluemoon");
    assert_eq!(value["start_offset"], 0x104);
    assert_eq!(value["checksum"]["valid"], true);
    assert_eq!(value["chip_pack"], Value::Null);
    assert_eq!(value["folders"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["folders"][0]["regular_chip_index"], 5);
    assert_eq!(value["folders"][1]["regular_chip_index"], Value::Null);
    assert_eq!(
        value["capabilities"]["features"],
        json!(["Folder", "RegularChip"])
    );
}

#[test]
fn full_json_names_chips_with_a_catalog() {
    let session = session_from_fixture("bn4_us_redsun.sav");
    let catalog = catalog();
    let value = render_json_full(&session, Some(&catalog), JsonStyle::CanonicalV1)
        .expect("render");

    assert_eq!(value["region"], "US");
    assert_eq!(
        value["folders"][0]["chips"][0],
        json!({"slot": 0, "id": 1, "code": "A", "name": "Cannon", "regular": false})
    );
    assert_eq!(
        value["chip_pack"][3],
        json!({"id": 100, "code": "S", "name": "AirShot", "count": 5})
    );
}

#[test]
fn selected_json_only_contains_requested_fields() {
    let session = session_from_fixture("bn4_jp_bluemoon.sav");
    let fields = FieldSelection {
        variant: true,
        folder: Some(1),
    };
    assert!(fields.is_any_selected());

    let value = render_json_selected(&session, &fields, None, JsonStyle::CanonicalV1)
        .expect("render");
    assert_eq!(
        value,
        json!({
            "region": "JP",
            "version": "bluemoon",
            "rom_name": "ROCK_EXE4_BMB4BJ",
            "folder": {
                "index": 1,
                "regular_chip_index": null,
                "chips": [
                    {"slot": 0, "id": 511, "code": "*", "name": null, "regular": false}
                ]
            }
        })
    );
}

#[test]
fn selected_pairs_render_key_value_lines() {
    let session = session_from_fixture("bn4_us_redsun.sav");
    let fields = FieldSelection {
        variant: true,
        folder: None,
    };
    let pairs = render_selected_pairs(&session, &fields, None).expect("render");
    assert_eq!(
        pairs,
        vec![
            ("region", "US".to_string()),
            ("version", "redsun".to_string()),
            ("rom_name", "MEGAMANBN4RSB4WE".to_string()),
        ]
    );
    assert!(!FieldSelection::default().is_any_selected());
}

#[test]
fn text_summary_lists_folders_and_pack() {
    let session = session_from_fixture("bn4_jp_bluemoon.sav");
    let catalog = catalog();
    let text = render_text(&session, Some(&catalog), TextStyle::Summary).expect("render");

    assert!(text.starts_with("Battle Network save (bn4)\n"));
    assert!(text.contains("Variant:         JP bluemoon (ROCK_EXE4_BMB4BJ)\n"));
    assert!(text.contains("Checksum:        0x002ff64c (ok)\n"));
    assert!(text.contains("Folder 1 [equipped]\n"));
    assert!(text.contains("   5  ?                B  (id 6) [regular]\n"));
    assert!(text.contains("Folder 2\n  (empty)\n"));
    assert!(text.contains("Chip pack\n  Cannon           A x3\n"));
}

#[test]
fn long_catalog_code_lists_still_render() {
    let session = session_from_fixture("bn4_us_redsun.sav");
    let catalog = ChipCatalog::from_json_str(
        r#"[null, {"name": "Cannon", "codes": "ABCDEFGHIJKLMNOP"}]"#,
    )
    .expect("catalog");

    let text = render_text(&session, Some(&catalog), TextStyle::Summary).expect("render");
    assert!(text.contains("Chip pack\n  Cannon           A x3\n"));
    let value = render_json_full(&session, Some(&catalog), JsonStyle::CanonicalV1)
        .expect("render");
    assert!(value["chip_pack"].as_array().is_some_and(|pack| pack.len() <= 12));
}
