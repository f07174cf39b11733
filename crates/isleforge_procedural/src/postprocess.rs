//! # Grid Post-Processing
//!
//! Whole-grid passes shared by the dungeon and island generators.
//!
//! Every pass reads from the grid as it was before the pass started and
//! produces a new grid, so the result never depends on visiting order.
//! All passes are total: they never address a cell outside the grid.

use std::collections::VecDeque;

use isleforge_core::{GridBuffer, Point, TileKind};

/// The 8 surrounding cells.
pub const MOORE: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The 4 edge-adjacent cells.
pub const VON_NEUMANN: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

#[inline]
fn signed(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Kind of the cell at `(x + dx, y + dy)`, or `outside` past the edge.
#[inline]
#[must_use]
pub fn offset_kind(grid: &GridBuffer, x: usize, y: usize, (dx, dy): (i64, i64), outside: TileKind) -> TileKind {
    grid.get_or(signed(x) + dx, signed(y) + dy, outside)
}

/// Returns true if any cell at `offsets` around `(x, y)` satisfies `pred`.
///
/// Cells past the edge are skipped.
#[must_use]
pub fn any_neighbor(
    grid: &GridBuffer,
    x: usize,
    y: usize,
    offsets: &[(i64, i64)],
    pred: impl Fn(TileKind) -> bool,
) -> bool {
    offsets.iter().any(|&(dx, dy)| {
        let (nx, ny) = (signed(x) + dx, signed(y) + dy);
        grid.in_bounds(nx, ny) && pred(grid.get_or(nx, ny, TileKind::Empty))
    })
}

/// Majority-vote smoothing over the 8 surrounding cells.
///
/// Only interior cells are rewritten; the border ring is kept. Each interior
/// cell takes the kind of `alphabet` that occurs most often among its
/// neighbors. Ties go to the kind listed first in `alphabet`. Neighbors whose
/// kind is not in `alphabet` do not vote, and a cell with no voting neighbor
/// keeps its kind.
#[must_use]
pub fn majority_smooth(grid: &GridBuffer, alphabet: &[TileKind], passes: u32) -> GridBuffer {
    let (width, height) = (grid.width(), grid.height());
    let mut current = grid.clone();
    let mut votes = vec![0u8; alphabet.len()];

    for _ in 0..passes {
        let source = current;
        current = GridBuffer::from_fn(width, height, |x, y| {
            let own = source.get_or(signed(x), signed(y), TileKind::Empty);
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                return own;
            }

            votes.fill(0);
            for &offset in &MOORE {
                let neighbor = offset_kind(&source, x, y, offset, TileKind::Empty);
                if let Some(slot) = alphabet.iter().position(|&k| k == neighbor) {
                    votes[slot] += 1;
                }
            }

            // First maximum wins
            let mut best: Option<(usize, u8)> = None;
            for (slot, &count) in votes.iter().enumerate() {
                if count > 0 && best.map_or(true, |(_, top)| count > top) {
                    best = Some((slot, count));
                }
            }
            best.map_or(own, |(slot, _)| alphabet[slot])
        });
    }

    current
}

/// Cells reached by a border-seeded flood fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloodMask {
    width: usize,
    reached: Vec<bool>,
}

impl FloodMask {
    /// Returns true if the fill reached `(x, y)`. Cells outside the grid are unreached.
    #[must_use]
    pub fn is_reached(&self, x: usize, y: usize) -> bool {
        x < self.width && self.reached.get(y * self.width + x).copied().unwrap_or(false)
    }

    /// Number of reached cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.reached.iter().filter(|&&r| r).count()
    }
}

/// Breadth-first fill through 4-connected `floodable` cells, seeded from
/// every floodable cell on the grid's outer border.
///
/// Each cell is queued at most once.
#[must_use]
pub fn flood_from_border(grid: &GridBuffer, floodable: impl Fn(TileKind) -> bool) -> FloodMask {
    let (width, height) = (grid.width(), grid.height());
    let mut reached = vec![false; width * height];
    let mut queue = VecDeque::new();

    for (x, y, kind) in grid.iter() {
        let on_border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
        if on_border && floodable(kind) {
            reached[y * width + x] = true;
            queue.push_back(Point::new(x, y));
        }
    }

    while let Some(cell) = queue.pop_front() {
        for &(dx, dy) in &VON_NEUMANN {
            let (nx, ny) = (signed(cell.x) + dx, signed(cell.y) + dy);
            let (Ok(ux), Ok(uy)) = (usize::try_from(nx), usize::try_from(ny)) else {
                continue;
            };
            if ux >= width || uy >= height {
                continue;
            }
            let index = uy * width + ux;
            if !reached[index] && floodable(grid.get_or(nx, ny, TileKind::Empty)) {
                reached[index] = true;
                queue.push_back(Point::new(ux, uy));
            }
        }
    }

    FloodMask { width, reached }
}

/// Floodable cells the border fill does not reach, in row-major order.
#[must_use]
pub fn unreached(grid: &GridBuffer, floodable: impl Fn(TileKind) -> bool + Copy) -> Vec<Point> {
    let mask = flood_from_border(grid, floodable);
    grid.iter()
        .filter(|&(x, y, kind)| floodable(kind) && !mask.is_reached(x, y))
        .map(|(x, y, _)| Point::new(x, y))
        .collect()
}

/// Replaces every floodable cell not connected to the border with
/// `replacement`. Returns the new grid and the number of cells replaced.
#[must_use]
pub fn reclassify_unreached(
    grid: &GridBuffer,
    floodable: impl Fn(TileKind) -> bool + Copy,
    replacement: TileKind,
) -> (GridBuffer, usize) {
    let mask = flood_from_border(grid, floodable);
    let mut replaced = 0;
    let result = GridBuffer::from_fn(grid.width(), grid.height(), |x, y| {
        let kind = grid.get_or(signed(x), signed(y), TileKind::Empty);
        if floodable(kind) && !mask.is_reached(x, y) {
            replaced += 1;
            replacement
        } else {
            kind
        }
    });
    (result, replaced)
}

/// Places a feature wherever a neighborhood contains only acceptable kinds.
///
/// For each cell, every kind at `offsets` (cells past the edge read as
/// `outside`) is tested with `accept`. When all pass, the cell is replaced
/// with `place()`, called once per placement in row-major order. Other cells
/// keep their kind. Returns the new grid and the number of placements.
#[must_use]
pub fn place_by_neighborhood(
    grid: &GridBuffer,
    offsets: &[(i64, i64)],
    outside: TileKind,
    accept: impl Fn(TileKind) -> bool,
    mut place: impl FnMut() -> TileKind,
) -> (GridBuffer, usize) {
    let mut placed = 0;
    let result = GridBuffer::from_fn(grid.width(), grid.height(), |x, y| {
        let fits = offsets
            .iter()
            .all(|&offset| accept(offset_kind(grid, x, y, offset, outside)));
        if fits {
            placed += 1;
            place()
        } else {
            grid.get_or(signed(x), signed(y), outside)
        }
    });
    (result, placed)
}
