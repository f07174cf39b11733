//! # Grouping Tests
//!
//! Partition and round-trip laws on generated worlds and on random grids.

use isleforge_core::{GridBuffer, TileKind};
use isleforge_procedural::grouping::{group, render, GroupedTile};
use isleforge_procedural::{seeded_rng, GenerationConfig, RoomPartitioner, TerrainSynthesizer};
use rand::Rng;

fn assert_partition(grid: &GridBuffer, groups: &[GroupedTile]) {
    let mut covered = vec![0u8; grid.width() * grid.height()];
    for g in groups {
        assert!(g.width > 0 && g.height > 0, "empty group {g:?}");
        for cell in g.rect().cells() {
            assert!(cell.x < grid.width() && cell.y < grid.height(), "{g:?} leaves the grid");
            covered[cell.y * grid.width() + cell.x] += 1;
            assert_eq!(grid.get(cell.x, cell.y).unwrap(), g.kind);
        }
    }
    assert!(covered.iter().all(|&c| c == 1), "cells must be covered exactly once");
}

/// Test: Random grids over a small alphabet partition and round-trip.
#[test]
fn test_random_grids_roundtrip() {
    let alphabet = [TileKind::Water, TileKind::Sand, TileKind::Grass];
    let mut rng = seeded_rng(99);
    for _ in 0..200 {
        let width = rng.gen_range(1..=12);
        let height = rng.gen_range(1..=12);
        let grid = GridBuffer::from_fn(width, height, |_, _| alphabet[rng.gen_range(0..alphabet.len())]);

        let groups = group(&grid);
        assert_partition(&grid, &groups);
        assert_eq!(render(&groups, width, height, TileKind::Empty).unwrap(), grid);
    }
}

/// Test: Output order follows the row-major position of each top-left cell.
#[test]
fn test_output_order_is_scan_order() {
    let grid = TerrainSynthesizer::new(&GenerationConfig::default().island)
        .generate(120, 80, &mut seeded_rng(4))
        .grid;
    let groups = group(&grid);
    let starts: Vec<usize> = groups.iter().map(|g| g.row * 120 + g.column).collect();
    assert!(starts.windows(2).all(|w| w[0] < w[1]));
}

/// Test: Generated worlds compress and round-trip.
#[test]
fn test_generated_worlds_roundtrip() {
    let config = GenerationConfig::default();
    for seed in 0..8 {
        let island = TerrainSynthesizer::new(&config.island)
            .generate(120, 80, &mut seeded_rng(seed))
            .grid;
        let groups = group(&island);
        assert_partition(&island, &groups);
        assert!(groups.len() < 120 * 80 / 2, "island should compress");

        let dungeon = RoomPartitioner::new(&config.dungeon)
            .generate(120, 80, &mut seeded_rng(seed))
            .unwrap();
        let floor = dungeon.biome_layer();
        let groups = group(&floor);
        assert_eq!(render(&groups, 120, 80, TileKind::Wall).unwrap(), floor);
    }
}

/// Test: A 1x1 grid is one 1x1 group.
#[test]
fn test_single_cell_grid() {
    for kind in TileKind::ALL {
        let groups = group(&GridBuffer::new(1, 1, kind));
        assert_eq!(groups.len(), 1);
        assert_eq!((groups[0].width, groups[0].height), (1, 1));
        assert_eq!(groups[0].kind, kind);
    }
}

/// Test: The documented three-by-three example.
#[test]
fn test_concrete_example() {
    let grid = GridBuffer::from_rows(&["122", "122", "111"]).unwrap();
    let groups = group(&grid);
    let summary: Vec<_> = groups
        .iter()
        .map(|g| (g.kind, g.column, g.row, g.width, g.height))
        .collect();
    assert_eq!(
        summary,
        vec![
            (TileKind::Grass, 0, 0, 1, 3),
            (TileKind::Water, 1, 0, 2, 2),
            (TileKind::Grass, 1, 2, 2, 1),
        ]
    );
}
