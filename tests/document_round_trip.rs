//! Integration tests for document encoding and persistence.

use tempfile::TempDir;

use retro_draw::canvas::{AttributeBuffer, Pen};
use retro_draw::state::{self, CellRecord, Document};
use retro_draw::RetroError;

fn scribble() -> AttributeBuffer {
    let mut buffer = AttributeBuffer::with_pen(Pen::new(7, 1, 0)).unwrap();
    buffer.draw_line(3, 190, 250, 4, Pen::new(6, 1, 1)).unwrap();
    buffer.draw_line(128, 0, 128, 191, Pen::new(2, 0, 0)).unwrap();
    buffer.erase_pixel(128, 96, Pen::new(2, 0, 0)).unwrap();
    buffer.set_attr(200, 180, Pen::new(4, 4, 1)).unwrap();
    buffer
}

#[test]
fn test_round_trip_is_pixel_identical() {
    let mut original = scribble();
    let mut decoded = state::decode(&state::encode(&original)).unwrap();

    assert_eq!(original.composite(), decoded.composite());
    assert_eq!(state::encode(&original), state::encode(&decoded));
}

#[test]
fn test_round_trip_through_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scribble.json");

    let mut original = scribble();
    state::save_buffer(&path, &original).unwrap();
    let mut loaded = state::load_buffer(&path).unwrap();

    assert_eq!(original.composite(), loaded.composite());
}

#[test]
fn test_document_keys_follow_cell_coordinates() {
    let doc = state::encode(&scribble());
    assert_eq!(doc.cells.len(), 32 * 24);
    assert!(doc.cells.contains_key("0,0"));
    assert!(doc.cells.contains_key("31,23"));
    assert!(!doc.cells.contains_key("32,0"));
    assert_eq!(doc.cells["25,22"], CellRecord { ink: 4, paper: 4, palette: 1 });
}

#[test]
fn test_hand_written_document_with_out_of_range_value() {
    let mut doc = state::encode(&AttributeBuffer::new());
    let json = doc.to_json().unwrap().replace(
        r#""3,3":{"ink":0,"paper":7,"palette":0}"#,
        r#""3,3":{"ink":0,"paper":7,"palette":4}"#,
    );
    let parsed = Document::from_json(&json).unwrap();
    assert!(matches!(state::decode(&parsed), Err(RetroError::MalformedDocument(_))));

    // Negative values never make it past parsing
    let json = doc.to_json().unwrap().replace(r#""ink":0"#, r#""ink":-1"#);
    assert!(matches!(Document::from_json(&json), Err(RetroError::MalformedDocument(_))));

    doc.mask.truncate(10);
    assert!(matches!(state::decode(&doc), Err(RetroError::MalformedDocument(_))));
}
