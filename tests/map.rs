//! Tests for the tile-map flat-file format, collision grid, and the
//! multi-layer animation-resync contract.  No GPU required: layer geometry
//! and resync decisions are exercised through their pure seams.

use tilemap2d::catalog::TileCatalog;
use tilemap2d::map::{MapError, TileMap};
use tilemap2d::sprite::Spritesheet;
use tilemap2d::tile::TileKind;

fn catalog() -> TileCatalog {
    TileCatalog::builtin(&Spritesheet::from_image_size(256, 64, 16, 16))
}

// ── Parsing ─────────────────────────────────────────────────────────────────

const SMALL_MAP: &str = "\
3 2 2

0 1 2
3 4 5

6 7 8
9 10 11

0 1 0
1 0 1
";

#[test]
fn parses_header_dimensions() {
    let map = TileMap::from_text(SMALL_MAP).unwrap();
    assert_eq!(map.width(), 3);
    assert_eq!(map.height(), 2);
    assert_eq!(map.layers().len(), 2);
}

#[test]
fn parses_layer_tiles_row_major() {
    let map = TileMap::from_text(SMALL_MAP).unwrap();
    let ground = &map.layers()[0];
    assert_eq!(ground.tile_at(0, 0), Some(TileKind::Grass));
    assert_eq!(ground.tile_at(2, 0), Some(TileKind::Brick));
    assert_eq!(ground.tile_at(0, 1), Some(TileKind::Water));
    assert_eq!(ground.tile_at(2, 1), Some(TileKind::Tree));

    let decor = &map.layers()[1];
    assert_eq!(decor.tile_at(0, 0), Some(TileKind::Sun));
    assert_eq!(decor.tile_at(2, 1), Some(TileKind::BlueHouseUpperLeft));
}

#[test]
fn parses_collision_grid() {
    let map = TileMap::from_text(SMALL_MAP).unwrap();
    assert!(map.is_walkable(0, 0));
    assert!(!map.is_walkable(1, 0));
    assert!(map.is_walkable(2, 0));
    assert!(!map.is_walkable(0, 1));
}

#[test]
fn whitespace_layout_is_irrelevant() {
    // Same data as SMALL_MAP, all on one line.
    let squashed = "3 2 2 0 1 2 3 4 5 6 7 8 9 10 11 0 1 0 1 0 1";
    let map = TileMap::from_text(squashed).unwrap();
    assert_eq!(map.layers()[0].tile_at(1, 1), Some(TileKind::Lava));
    assert!(!map.is_walkable(1, 0));
}

#[test]
fn negative_tile_id_loads_as_null_empty() {
    let text = "2 1 1\n-1 0\n0 0\n";
    let map = TileMap::from_text(text).unwrap();
    assert_eq!(map.layers()[0].tile_at(0, 0), Some(TileKind::NullEmpty));
    assert_eq!(map.layers()[0].tile_at(1, 0), Some(TileKind::Grass));
}

#[test]
fn out_of_range_tile_id_loads_as_null_empty() {
    let text = "1 1 1\n500\n0\n";
    let map = TileMap::from_text(text).unwrap();
    assert_eq!(map.layers()[0].tile_at(0, 0), Some(TileKind::NullEmpty));
}

#[test]
fn collision_treats_any_positive_value_as_blocked() {
    let text = "2 1 1\n0 0\n7 -3\n";
    let map = TileMap::from_text(text).unwrap();
    assert!(!map.is_walkable(0, 0));
    assert!(map.is_walkable(1, 0));
}

// ── Malformed input ─────────────────────────────────────────────────────────

#[test]
fn truncated_layer_section_is_eof_error() {
    let err = TileMap::from_text("2 2 1\n0 1 2\n").unwrap_err();
    assert!(matches!(err, MapError::UnexpectedEof { expected: "tile id" }));
}

#[test]
fn truncated_collision_section_is_eof_error() {
    let err = TileMap::from_text("2 1 1\n0 1\n0\n").unwrap_err();
    assert!(matches!(err, MapError::UnexpectedEof { expected: "collision flag" }));
}

#[test]
fn empty_input_is_eof_error() {
    let err = TileMap::from_text("").unwrap_err();
    assert!(matches!(err, MapError::UnexpectedEof { expected: "map width" }));
}

#[test]
fn non_integer_token_is_bad_token() {
    let err = TileMap::from_text("2 1 1\n0 grass\n0 0\n").unwrap_err();
    match err {
        MapError::BadToken { token, expected } => {
            assert_eq!(token, "grass");
            assert_eq!(expected, "tile id");
        }
        other => panic!("expected BadToken, got {other:?}"),
    }
}

#[test]
fn negative_dimension_is_bad_token() {
    let err = TileMap::from_text("-3 2 1\n").unwrap_err();
    assert!(matches!(err, MapError::BadToken { expected: "map width", .. }));
}

#[test]
fn absurd_dimensions_are_rejected_before_allocation() {
    let err = TileMap::from_text("999999 999999 1\n").unwrap_err();
    assert!(matches!(err, MapError::Oversized { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let err = TileMap::from_file("/nonexistent/island.map").unwrap_err();
    assert!(matches!(err, MapError::Io(_)));
}

// ── Round-trip ──────────────────────────────────────────────────────────────

#[test]
fn parse_serialize_parse_is_identity() {
    let first = TileMap::from_text(SMALL_MAP).unwrap();
    let second = TileMap::from_text(&first.to_string_repr()).unwrap();

    assert_eq!(first.width(), second.width());
    assert_eq!(first.height(), second.height());
    assert_eq!(first.layers().len(), second.layers().len());
    for (a, b) in first.layers().iter().zip(second.layers()) {
        assert_eq!(a.tiles(), b.tiles());
    }
    for y in 0..first.height() {
        for x in 0..first.width() {
            assert_eq!(first.is_walkable(x, y), second.is_walkable(x, y));
        }
    }
}

#[test]
fn generated_map_round_trips_to_identical_grids() {
    let mut map = TileMap::generated(5, 4, 3);
    map.set_collision(2, 1, true);
    map.set_collision(4, 3, true);

    let reread = TileMap::from_text(&map.to_string_repr()).unwrap();
    assert_eq!(reread.width(), map.width());
    assert_eq!(reread.height(), map.height());
    assert_eq!(reread.layers().len(), 3);
    // The placeholder pattern exists from construction, so it survives the
    // serialize/parse cycle byte for byte.
    for (a, b) in map.layers().iter().zip(reread.layers()) {
        assert_eq!(a.tiles(), b.tiles());
    }
    assert!(!reread.is_walkable(2, 1));
    assert!(!reread.is_walkable(4, 3));
    assert!(reread.is_walkable(0, 0));
}

#[test]
fn generated_layers_carry_placeholder_tiles_without_gpu_init() {
    let map = TileMap::generated(3, 2, 1);
    let ground = &map.layers()[0];
    assert_eq!(ground.tiles().len(), 3 * 2);
    for (i, &kind) in ground.tiles().iter().enumerate() {
        assert_eq!(kind, TileKind::ALL[i % TileKind::COUNT]);
    }
}

#[test]
fn file_round_trip_on_disk() {
    let path = std::env::temp_dir().join("tilemap2d_roundtrip_test.map");
    let first = TileMap::from_text(SMALL_MAP).unwrap();
    first.write_file(&path).unwrap();
    let second = TileMap::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    for (a, b) in first.layers().iter().zip(second.layers()) {
        assert_eq!(a.tiles(), b.tiles());
    }
}

// ── Procedural construction / collision API ─────────────────────────────────

#[test]
fn generated_map_is_fully_walkable() {
    let map = TileMap::generated(8, 6, 2);
    for y in 0..6 {
        for x in 0..8 {
            assert!(map.is_walkable(x, y));
        }
    }
}

#[test]
fn out_of_bounds_cells_are_blocked() {
    let map = TileMap::generated(4, 4, 1);
    assert!(!map.is_walkable(4, 0));
    assert!(!map.is_walkable(0, 4));
    assert!(!map.is_walkable(100, 100));
}

#[test]
fn generated_dimensions_clamp_to_supported_maximum() {
    // The procedural path honors the same bound as the file path, so cell
    // and index counts stay inside u32 for any arguments.
    let map = TileMap::generated(u32::MAX, 1, 1);
    assert_eq!(map.width(), tilemap2d::map::MAX_DIMENSION);
    assert_eq!(map.height(), 1);
    assert_eq!(
        map.layers()[0].tiles().len(),
        tilemap2d::map::MAX_DIMENSION as usize
    );
}

#[test]
fn set_collision_out_of_bounds_is_ignored() {
    let mut map = TileMap::generated(2, 2, 1);
    map.set_collision(5, 5, true);
    assert!(map.is_walkable(0, 0));
}

// ── Layer ordering and resync fan-out ───────────────────────────────────────

#[test]
fn layers_keep_construction_order() {
    // Three layers with distinguishable ground tiles; render walks
    // `layers()` front-to-back in index order, so index order is draw order.
    let text = "1 1 3\n0\n1\n2\n0\n";
    let map = TileMap::from_text(text).unwrap();
    let kinds: Vec<_> = map
        .layers()
        .iter()
        .map(|l| l.tile_at(0, 0).unwrap())
        .collect();
    assert_eq!(kinds, vec![TileKind::Grass, TileKind::Sand, TileKind::Brick]);
}

#[test]
fn every_layer_observes_the_same_generation_advance() {
    // A single shared clearable flag would let the first layer's update
    // steal the refresh from later layers.  With per-layer generation
    // tracking, all layers resync from one catalog pass.
    let mut map = TileMap::from_text(SMALL_MAP).unwrap();
    let mut cat = catalog();
    cat.update_all(0.75);

    let resynced: Vec<bool> = map
        .layers_mut()
        .iter_mut()
        .map(|layer| layer.sync_animation(&cat).is_some())
        .collect();
    assert_eq!(resynced, vec![true, true]);

    // And nothing left to do until the next crossing.
    let again: Vec<bool> = map
        .layers_mut()
        .iter_mut()
        .map(|layer| layer.sync_animation(&cat).is_some())
        .collect();
    assert_eq!(again, vec![false, false]);
}

#[test]
fn resync_uv_stream_covers_every_cell() {
    let mut map = TileMap::from_text(SMALL_MAP).unwrap();
    let mut cat = catalog();
    cat.update_all(0.75);

    let uvs = map.layers_mut()[0].sync_animation(&cat).unwrap();
    // 3 × 2 cells × 4 corners; 2 floats per corner on the wire.
    assert_eq!(uvs.len(), 3 * 2 * 4);
}
