//! # Grid Buffer Tests
//!
//! Layer encoding, cropping and bounds handling through the public API.

use isleforge_core::{GridBuffer, Point, Rect, TileKind, WorldError};

/// Test: Every kind survives the row encoding.
#[test]
fn test_full_alphabet_rows() {
    let row: String = TileKind::ALL.iter().map(|k| k.to_char()).collect();
    assert_eq!(row, "0124BHCDEF");

    let grid = GridBuffer::from_rows(&[row.as_str(), row.as_str()]).unwrap();
    assert_eq!((grid.width(), grid.height()), (10, 2));
    for (x, y, kind) in grid.iter() {
        assert_eq!(kind, TileKind::ALL[x], "cell ({x}, {y})");
    }
    assert_eq!(grid.to_rows(), vec![row.clone(), row]);
}

/// Test: Ragged rows and unknown characters are rejected.
#[test]
fn test_malformed_rows() {
    assert!(matches!(
        GridBuffer::from_rows(&["222", "22"]),
        Err(WorldError::MalformedDocument(_))
    ));
    assert!(matches!(
        GridBuffer::from_rows(&["2X2"]),
        Err(WorldError::MalformedDocument(_))
    ));
}

/// Test: Trimming crops symmetrically, extra from bottom and right.
#[test]
fn test_trim_centering() {
    let grid = GridBuffer::from_rows(&["01240", "12401", "24012", "40124"]).unwrap();

    assert_eq!(grid.trim(1, 2).unwrap().to_rows(), vec!["24"]);
    assert_eq!(grid.trim(2, 3).unwrap().to_rows(), vec!["240", "401"]);
    assert_eq!(grid.trim(3, 4).unwrap().to_rows(), vec!["0124", "1240", "2401"]);

    let same = grid.trim(4, 5).unwrap();
    assert_eq!(same, grid);

    let empty = grid.trim(0, 0).unwrap();
    assert_eq!((empty.width(), empty.height()), (0, 0));
}

/// Test: Trimming larger than the grid is an error, not a clamp.
#[test]
fn test_trim_too_large() {
    let grid = GridBuffer::new(120, 80, TileKind::Water);
    assert_eq!(
        grid.trim(81, 120),
        Err(WorldError::DimensionMismatch {
            requested_width: 120,
            requested_height: 81,
            width: 120,
            height: 80,
        })
    );
    assert!(grid.trim(80, 121).is_err());
}

/// Test: Rect fills stay inside the grid or change nothing.
#[test]
fn test_fill_rect_is_atomic() {
    let mut grid = GridBuffer::new(6, 6, TileKind::Wall);
    grid.fill_rect(Rect::new(1, 1, 3, 2), TileKind::Pavement).unwrap();
    assert_eq!(grid.count(TileKind::Pavement), 6);

    let before = grid.clone();
    assert!(grid.fill_rect(Rect::new(4, 4, 3, 1), TileKind::Water).is_err());
    assert_eq!(grid, before);
}

/// Test: Whole-grid fill resets every cell and keeps the size.
#[test]
fn test_fill_resets_grid() {
    let mut grid = GridBuffer::from_rows(&["0124", "BHCD"]).unwrap();
    grid.fill(TileKind::Wall);
    assert_eq!((grid.width(), grid.height()), (4, 2));
    assert_eq!(grid.count(TileKind::Wall), 8);
    assert_eq!(grid.to_rows(), vec!["HHHH", "HHHH"]);
}

/// Test: Signed lookups report the outside kind past every edge.
#[test]
fn test_signed_lookups() {
    let grid = GridBuffer::new(3, 2, TileKind::Sand);
    assert_eq!(grid.get_or(-1, 0, TileKind::Water), TileKind::Water);
    assert_eq!(grid.get_or(0, -1, TileKind::Water), TileKind::Water);
    assert_eq!(grid.get_or(3, 0, TileKind::Water), TileKind::Water);
    assert_eq!(grid.get_or(0, 2, TileKind::Water), TileKind::Water);
    assert_eq!(grid.get_or(2, 1, TileKind::Water), TileKind::Sand);
    assert!(grid.in_bounds(2, 1));
    assert!(!grid.in_bounds(-1, 1));
}

/// Test: Rect geometry used by the room partitioner.
#[test]
fn test_rect_geometry() {
    let outer = Rect::new(1, 1, 10, 8);
    let inner = Rect::new(3, 2, 4, 4);
    assert!(outer.contains_rect(&inner));
    assert!(outer.overlaps(&inner));
    assert!(!inner.overlaps(&Rect::new(7, 2, 2, 2)));
    assert_eq!(inner.center(), Point::new(5, 4));
    assert_eq!(inner.cells().count(), inner.area());
    assert!(inner.cells().all(|p| inner.contains_point(p)));
}
