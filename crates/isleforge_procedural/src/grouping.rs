//! # Run-Length Grouping
//!
//! Compresses a grid into maximal uniform rectangles for storage.
//!
//! ## Algorithm
//!
//! Cells are scanned row-major. At each cell not yet covered, the rectangle
//! grows right while the kind continues, then down while every cell of the
//! next row (at that width) matches. The result is a gap-free,
//! non-overlapping tiling in the order each rectangle's top-left cell is
//! reached. It is greedy, not minimal.
//!
//! Rendering the groups back with [`render`] reproduces the input exactly.

use isleforge_core::{GridBuffer, Rect, TileKind, WorldResult};
use tracing::debug;

/// A grid cell annotated with the kinds of its four direct neighbors.
///
/// Edge cells use their own kind for any neighbor past the edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedCell {
    /// Kind of this cell.
    pub kind: TileKind,
    /// Column.
    pub column: usize,
    /// Row.
    pub row: usize,
    /// Kind above.
    pub up: TileKind,
    /// Kind to the right.
    pub right: TileKind,
    /// Kind below.
    pub down: TileKind,
    /// Kind to the left.
    pub left: TileKind,
}

/// A maximal rectangle of one tile kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupedTile {
    /// Kind of every cell in the rectangle.
    pub kind: TileKind,
    /// Left column.
    pub column: usize,
    /// Top row.
    pub row: usize,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// Neighbor kind above.
    pub up: TileKind,
    /// Neighbor kind to the right.
    pub right: TileKind,
    /// Neighbor kind below.
    pub down: TileKind,
    /// Neighbor kind to the left.
    pub left: TileKind,
}

impl GroupedTile {
    /// Creates a group whose neighbor fields are its own kind.
    ///
    /// A rectangle is uniform inside, so this is what every grouping
    /// function emits.
    #[must_use]
    pub const fn uniform(kind: TileKind, rect: Rect) -> Self {
        Self {
            kind,
            column: rect.x,
            row: rect.y,
            width: rect.width,
            height: rect.height,
            up: kind,
            right: kind,
            down: kind,
            left: kind,
        }
    }

    /// Area covered by this group.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.column, self.row, self.width, self.height)
    }
}

/// How much grouping shrank a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Cells grouped.
    pub cells: usize,
    /// Groups emitted.
    pub groups: usize,
}

impl GroupingStats {
    /// Computes stats for `groups`.
    #[must_use]
    pub fn of(groups: &[GroupedTile]) -> Self {
        Self {
            cells: groups.iter().map(|g| g.rect().area()).sum(),
            groups: groups.len(),
        }
    }

    /// Cells per group. Zero when nothing was grouped.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.groups == 0 {
            0.0
        } else {
            self.cells as f64 / self.groups as f64
        }
    }
}

/// Tags every cell with its four neighbor kinds, row-major.
#[must_use]
pub fn tag_neighbors(grid: &GridBuffer) -> Vec<TaggedCell> {
    grid.iter()
        .map(|(x, y, kind)| {
            let (sx, sy) = (signed(x), signed(y));
            TaggedCell {
                kind,
                column: x,
                row: y,
                up: grid.get_or(sx, sy - 1, kind),
                right: grid.get_or(sx + 1, sy, kind),
                down: grid.get_or(sx, sy + 1, kind),
                left: grid.get_or(sx - 1, sy, kind),
            }
        })
        .collect()
}

/// Groups every cell of `grid`.
///
/// Never fails; the groups always cover the grid exactly once.
#[must_use]
pub fn group(grid: &GridBuffer) -> Vec<GroupedTile> {
    group_matching(grid, |_| true)
}

/// Groups only the cells whose kind satisfies `keep`; other cells are left
/// uncovered.
#[must_use]
pub fn group_matching(grid: &GridBuffer, keep: impl Fn(TileKind) -> bool) -> Vec<GroupedTile> {
    let kinds: Vec<Option<TileKind>> = grid
        .cells()
        .iter()
        .map(|&kind| keep(kind).then_some(kind))
        .collect();
    let groups = group_sparse(grid.width(), grid.height(), &kinds);
    log_stats(&groups);
    groups
}

/// Groups an already-tagged, possibly sparse, cell list.
///
/// Positions missing from `cells` are left uncovered. If a position appears
/// more than once, the last entry wins.
#[must_use]
pub fn group_cells(cells: &[TaggedCell]) -> Vec<GroupedTile> {
    let width = cells.iter().map(|c| c.column + 1).max().unwrap_or(0);
    let height = cells.iter().map(|c| c.row + 1).max().unwrap_or(0);

    let mut kinds = vec![None; width * height];
    for cell in cells {
        kinds[cell.row * width + cell.column] = Some(cell.kind);
    }

    let groups = group_sparse(width, height, &kinds);
    log_stats(&groups);
    groups
}

/// Rebuilds a `width x height` grid from groups, starting from `fill`.
///
/// # Errors
///
/// Returns `WorldError::OutOfBounds` if a group extends past the grid.
pub fn render(groups: &[GroupedTile], width: usize, height: usize, fill: TileKind) -> WorldResult<GridBuffer> {
    let mut grid = GridBuffer::new(width, height, fill);
    for group in groups {
        grid.fill_rect(group.rect(), group.kind)?;
    }
    Ok(grid)
}

/// Greedy row-major rectangle scan over `width x height` optional kinds.
fn group_sparse(width: usize, height: usize, kinds: &[Option<TileKind>]) -> Vec<GroupedTile> {
    let mut visited = vec![false; kinds.len()];
    let mut groups = Vec::new();
    let at = |x: usize, y: usize| y * width + x;

    for y in 0..height {
        for x in 0..width {
            if visited[at(x, y)] {
                continue;
            }
            let Some(kind) = kinds[at(x, y)] else {
                continue;
            };

            let open = |cx: usize, cy: usize| !visited[at(cx, cy)] && kinds[at(cx, cy)] == Some(kind);

            let mut run = 1;
            while x + run < width && open(x + run, y) {
                run += 1;
            }

            let mut rows = 1;
            while y + rows < height && (x..x + run).all(|cx| open(cx, y + rows)) {
                rows += 1;
            }

            let rect = Rect::new(x, y, run, rows);
            for cell in rect.cells() {
                visited[at(cell.x, cell.y)] = true;
            }
            groups.push(GroupedTile::uniform(kind, rect));
        }
    }

    groups
}

fn log_stats(groups: &[GroupedTile]) {
    let stats = GroupingStats::of(groups);
    debug!(
        cells = stats.cells,
        groups = stats.groups,
        ratio = stats.ratio(),
        "Grouping complete"
    );
}

#[inline]
fn signed(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> GridBuffer {
        GridBuffer::from_rows(rows).unwrap()
    }

    fn rects(groups: &[GroupedTile]) -> Vec<(TileKind, usize, usize, usize, usize)> {
        groups
            .iter()
            .map(|g| (g.kind, g.column, g.row, g.width, g.height))
            .collect()
    }

    #[test]
    fn test_greedy_scan_order() {
        let input = grid(&["122", "122", "111"]);
        let groups = group(&input);
        assert_eq!(
            rects(&groups),
            vec![
                (TileKind::Grass, 0, 0, 1, 3),
                (TileKind::Water, 1, 0, 2, 2),
                (TileKind::Grass, 1, 2, 2, 1),
            ]
        );
        assert!(groups.iter().all(|g| g.up == g.kind && g.left == g.kind));
    }

    #[test]
    fn test_mixed_grid() {
        let input = grid(&["0BB", "4BB", "040"]);
        let groups = group(&input);
        let sizes: Vec<(usize, usize)> = groups.iter().map(|g| (g.width, g.height)).collect();
        assert_eq!(sizes, vec![(1, 1), (2, 2), (1, 1), (1, 1), (1, 1), (1, 1)]);
        assert_eq!(render(&groups, 3, 3, TileKind::Empty).unwrap(), input);
    }

    #[test]
    fn test_single_cell() {
        let groups = group(&grid(&["2"]));
        assert_eq!(rects(&groups), vec![(TileKind::Water, 0, 0, 1, 1)]);
    }

    #[test]
    fn test_empty_grid() {
        let empty = GridBuffer::new(0, 0, TileKind::Empty);
        assert!(group(&empty).is_empty());
        assert_eq!(GroupingStats::of(&[]).ratio(), 0.0);
    }

    #[test]
    fn test_uniform_grid_is_one_group() {
        let input = GridBuffer::new(7, 4, TileKind::Sand);
        let groups = group(&input);
        assert_eq!(rects(&groups), vec![(TileKind::Sand, 0, 0, 7, 4)]);
        let stats = GroupingStats::of(&groups);
        assert_eq!(stats, GroupingStats { cells: 28, groups: 1 });
        assert!((stats.ratio() - 28.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_matching_skips_other_kinds() {
        let input = grid(&["2244", "2244", "4422"]);
        let water = group_matching(&input, |k| k == TileKind::Water);
        assert_eq!(
            rects(&water),
            vec![(TileKind::Water, 0, 0, 2, 2), (TileKind::Water, 2, 2, 2, 1)]
        );
        let rendered = render(&water, 4, 3, TileKind::Sand).unwrap();
        assert_eq!(rendered, input);
    }

    #[test]
    fn test_tag_neighbors_clamps_to_self() {
        let tags = tag_neighbors(&grid(&["12", "40"]));
        assert_eq!(tags.len(), 4);
        let top_left = tags[0];
        assert_eq!(top_left.kind, TileKind::Grass);
        assert_eq!(top_left.up, TileKind::Grass);
        assert_eq!(top_left.left, TileKind::Grass);
        assert_eq!(top_left.right, TileKind::Water);
        assert_eq!(top_left.down, TileKind::Sand);

        let bottom_right = tags[3];
        assert_eq!((bottom_right.column, bottom_right.row), (1, 1));
        assert_eq!(bottom_right.up, TileKind::Water);
        assert_eq!(bottom_right.left, TileKind::Sand);
        assert_eq!(bottom_right.right, TileKind::Empty);
        assert_eq!(bottom_right.down, TileKind::Empty);
    }

    #[test]
    fn test_group_cells_matches_group() {
        let input = grid(&["0BB0", "0BB0", "HHHH"]);
        assert_eq!(group_cells(&tag_neighbors(&input)), group(&input));
    }

    #[test]
    fn test_group_cells_sparse() {
        let tags: Vec<TaggedCell> = tag_neighbors(&grid(&["222", "242", "222"]))
            .into_iter()
            .filter(|c| c.kind == TileKind::Water)
            .collect();
        let groups = group_cells(&tags);
        assert_eq!(
            rects(&groups),
            vec![
                (TileKind::Water, 0, 0, 3, 1),
                (TileKind::Water, 0, 1, 1, 2),
                (TileKind::Water, 2, 1, 1, 2),
                (TileKind::Water, 1, 2, 1, 1),
            ]
        );
    }

    #[test]
    fn test_render_rejects_overflow() {
        let groups = [GroupedTile::uniform(TileKind::Wall, Rect::new(2, 0, 2, 1))];
        assert!(render(&groups, 3, 1, TileKind::Empty).is_err());
    }
}
