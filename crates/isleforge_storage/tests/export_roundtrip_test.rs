//! # Export Round-Trip Tests
//!
//! Generated worlds survive a trip through every on-disk format.

use std::path::PathBuf;

use isleforge_core::TileKind;
use isleforge_procedural::grouping::{group, group_matching, render};
use isleforge_procedural::{seeded_rng, GenerationConfig, RoomPartitioner, TerrainSynthesizer};
use isleforge_storage::grouped::{load_json, save_json};
use isleforge_storage::{DirectoryStore, GroupedArchive, LayerKind, WorldDocument, WorldExporter};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("isleforge_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Test: A dungeon saved to a directory loads back identical.
#[test]
fn test_dungeon_document_roundtrip() {
    let config = GenerationConfig::default();
    let dungeon = RoomPartitioner::new(&config.dungeon)
        .generate(config.width, config.height, &mut seeded_rng(31))
        .unwrap();

    let store = DirectoryStore::new(scratch_dir("dungeon"));
    let doc = WorldExporter::default().dungeon_document(2001, &dungeon);
    let path = store.save(&doc).unwrap();
    assert!(path.ends_with("2001.json"));

    let loaded = store.load(2001).unwrap();
    assert_eq!(loaded, doc);
    assert!(loaded.validate().is_ok());

    let walls = loaded.layer_grid(LayerKind::Constructions).unwrap();
    assert_eq!(walls.count(TileKind::Wall), dungeon.grid.count(TileKind::Wall));

    let _ = std::fs::remove_dir_all(store.root());
}

/// Test: An island document keeps every tile and both layers line up.
#[test]
fn test_island_document_roundtrip() {
    let config = GenerationConfig::default();
    let island = TerrainSynthesizer::new(&config.island).generate(120, 80, &mut seeded_rng(32));

    let doc = WorldExporter::default().island_document(2002, &island.grid);
    let json = doc.to_json_pretty().unwrap();
    assert!(json.contains("\"is_interior\": false"));

    let loaded = WorldDocument::from_json_str(&json).unwrap();
    assert_eq!(loaded.layer_grid(LayerKind::Biome).unwrap(), island.grid);
    let blank = loaded.layer_grid(LayerKind::Constructions).unwrap();
    assert_eq!(blank.count(TileKind::Empty), 120 * 80);
}

/// Test: Grouped JSON and archives reproduce the layer.
#[test]
fn test_grouped_formats_roundtrip() {
    let island = TerrainSynthesizer::new(&GenerationConfig::default().island)
        .generate(120, 80, &mut seeded_rng(33))
        .grid;
    let groups = group(&island);
    let dir = scratch_dir("grouped");
    std::fs::create_dir_all(&dir).unwrap();

    let json_path = dir.join("island.json");
    save_json(&json_path, &groups).unwrap();
    let from_json = load_json(&json_path).unwrap();
    assert_eq!(render(&from_json, 120, 80, TileKind::Empty).unwrap(), island);

    let archive = GroupedArchive {
        width: 120,
        height: 80,
        groups,
    };
    let archive_path = dir.join("island.islg");
    let written = archive.save_compressed(&archive_path).unwrap();
    assert!(written > 0);
    let loaded = GroupedArchive::load_compressed(&archive_path).unwrap();
    assert_eq!(loaded, archive);

    let _ = std::fs::remove_dir_all(&dir);
}

/// Test: Water obstacles group on their own and render over sand.
#[test]
fn test_water_obstacles() {
    let island = TerrainSynthesizer::new(&GenerationConfig::default().island)
        .generate(120, 80, &mut seeded_rng(34))
        .grid;
    let water = group_matching(&island, |k| k == TileKind::Water);
    assert!(water.iter().all(|g| g.kind == TileKind::Water));

    let covered: usize = water.iter().map(|g| g.width * g.height).sum();
    assert_eq!(covered, island.count(TileKind::Water));
}

/// Test: A legacy document migrates and trims.
#[test]
fn test_legacy_migration_and_trim() {
    let legacy = r#"{
        "id": 1002,
        "biome_tiles": { "tiles": [[2,2,2,2],[2,4,1,2],[2,4,4,2],[2,2,2,2]], "sheet_id": 1002 },
        "constructions_tiles": { "tiles": [[0,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]], "sheet_id": 1003 },
        "entities": [],
        "creep_spawn_enabled": true,
        "creep_spawn_interval": 2.5,
        "is_interior": false
    }"#;
    let doc = WorldDocument::from_json_str(legacy).unwrap();
    assert_eq!(doc.biome_tiles.tiles, vec!["2222", "2412", "2442", "2222"]);
    assert!(doc.creep_spawn_enabled);

    let migrated = doc.to_json_pretty().unwrap();
    assert!(migrated.contains("\"2412\""));

    let trimmed = doc.trim(2, 2).unwrap();
    assert_eq!(trimmed.biome_tiles.tiles, vec!["41", "44"]);
    assert_eq!(trimmed.constructions_tiles.tiles, vec!["00", "00"]);
    assert!((trimmed.creep_spawn_interval - 2.5).abs() < f32::EPSILON);
}
