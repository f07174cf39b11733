//! Axis-aligned grid rectangles.
//!
//! All coordinates are grid cells, not pixels. `x`/`y` is the top-left cell.

/// A grid cell position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle of cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
}

impl Rect {
    /// Creates a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most column.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the bottom row.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Center cell, rounded toward the top-left.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if the cell lies inside this rectangle.
    #[inline]
    #[must_use]
    pub const fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    #[inline]
    #[must_use]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns true if the two rectangles share at least one cell.
    ///
    /// Rectangles that only touch along an edge do not overlap.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Iterates over every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| Point::new(x, y)))
    }
}
