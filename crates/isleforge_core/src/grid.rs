//! # Grid Buffer
//!
//! The mutable 2D tile array every generation stage works on.
//!
//! ## Layout
//!
//! Cells are stored in a single contiguous `Vec`, row-major
//! (`index = y * width + x`). Every read and write goes through `get`/`set`,
//! which report `WorldError::OutOfBounds` instead of clamping or wrapping.
//!
//! ## Row Encoding
//!
//! Layers are persisted as one string per row, one character per tile
//! (see `TileKind::to_char`). `from_rows`/`to_rows` implement that codec.

use crate::error::{WorldError, WorldResult};
use crate::geometry::Rect;
use crate::tile::TileKind;

/// A fixed-size `width x height` grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridBuffer {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Row-major cell storage.
    cells: Vec<TileKind>,
}

impl GridBuffer {
    /// Creates a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(width: usize, height: usize, fill: TileKind) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Creates a grid by evaluating `f(x, y)` for every cell in row-major order.
    ///
    /// Whole-grid passes build their output with this instead of writing into
    /// a copy, so they cannot address a cell outside the grid.
    #[must_use]
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> TileKind) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Bounding rectangle of the whole grid.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Returns true if the signed coordinate addresses a cell of this grid.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        usize::try_from(x).is_ok_and(|x| x < self.width)
            && usize::try_from(y).is_ok_and(|y| y < self.height)
    }

    /// Checked row-major index.
    #[inline]
    fn index(&self, x: usize, y: usize) -> WorldResult<usize> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(self.out_of_bounds(to_signed(x), to_signed(y)))
        }
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> WorldError {
        WorldError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Reads a cell.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::OutOfBounds` if `x >= width` or `y >= height`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> WorldResult<TileKind> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes a cell.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::OutOfBounds` if `x >= width` or `y >= height`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, kind: TileKind) -> WorldResult<()> {
        let i = self.index(x, y)?;
        self.cells[i] = kind;
        Ok(())
    }

    /// Reads a cell by signed coordinate, returning `outside` for cells
    /// beyond the grid edge.
    ///
    /// Neighborhood passes use this to treat the world edge as a fixed kind.
    #[inline]
    #[must_use]
    pub fn get_or(&self, x: i64, y: i64, outside: TileKind) -> TileKind {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width && y < self.height => self.cells[y * self.width + x],
            _ => outside,
        }
    }

    /// Sets every cell to `kind`.
    pub fn fill(&mut self, kind: TileKind) {
        self.cells.fill(kind);
    }

    /// Sets every cell of `rect` to `kind`.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::OutOfBounds` (and writes nothing) if any part of
    /// `rect` lies outside the grid.
    pub fn fill_rect(&mut self, rect: Rect, kind: TileKind) -> WorldResult<()> {
        if rect.area() == 0 {
            return Ok(());
        }
        if !self.bounds().contains_rect(&rect) {
            return Err(self.out_of_bounds(to_signed(rect.right() - 1), to_signed(rect.bottom() - 1)));
        }
        for y in rect.y..rect.bottom() {
            let start = y * self.width + rect.x;
            self.cells[start..start + rect.width].fill(kind);
        }
        Ok(())
    }

    /// Counts cells holding `kind`.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Read-only view of the row-major cell storage.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[TileKind] {
        &self.cells
    }

    /// Read-only view of one row.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::OutOfBounds` if `y >= height`.
    pub fn row(&self, y: usize) -> WorldResult<&[TileKind]> {
        if y < self.height {
            let start = y * self.width;
            Ok(&self.cells[start..start + self.width])
        } else {
            Err(self.out_of_bounds(0, to_signed(y)))
        }
    }

    /// Iterates over `(x, y, kind)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, TileKind)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &kind)| (i % width, i / width, kind))
    }

    /// Returns a new grid of the same size with `f` applied to every cell.
    #[must_use]
    pub fn map(&self, f: impl Fn(TileKind) -> TileKind) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|&c| f(c)).collect(),
        }
    }

    /// Decodes a layer stored as one string per row.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::MalformedDocument` if the rows have different
    /// lengths or contain a character outside the tile alphabet.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> WorldResult<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let before = cells.len();
            for (x, c) in row.chars().enumerate() {
                let kind = TileKind::from_char(c).ok_or_else(|| {
                    WorldError::MalformedDocument(format!(
                        "unknown tile character {c:?} at row {y}, column {x}"
                    ))
                })?;
                cells.push(kind);
            }
            let len = cells.len() - before;
            if len != width {
                return Err(WorldError::MalformedDocument(format!(
                    "row {y} has {len} tiles, expected {width}"
                )));
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Encodes the grid as one string per row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height];
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|k| k.to_char()).collect())
            .collect()
    }

    /// Crops the grid to `cols x rows`, keeping it centered.
    ///
    /// When the removed amount is odd, the extra row goes from the bottom and
    /// the extra column from the right.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::DimensionMismatch` if either requested dimension
    /// exceeds the current one. No clamping is done.
    pub fn trim(&self, rows: usize, cols: usize) -> WorldResult<Self> {
        if rows > self.height || cols > self.width {
            return Err(WorldError::DimensionMismatch {
                requested_width: cols,
                requested_height: rows,
                width: self.width,
                height: self.height,
            });
        }

        let top = (self.height - rows) / 2;
        let left = (self.width - cols) / 2;

        let mut cells = Vec::with_capacity(rows * cols);
        for y in top..top + rows {
            let start = y * self.width + left;
            cells.extend_from_slice(&self.cells[start..start + cols]);
        }

        Ok(Self {
            width: cols,
            height: rows,
            cells,
        })
    }
}

fn to_signed(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
