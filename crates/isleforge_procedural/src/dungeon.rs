//! # Room Partitioner
//!
//! Room-and-corridor dungeons by binary space partitioning.
//!
//! ## Pipeline
//!
//! 1. Fill the grid with Wall
//! 2. Split the inner rectangle recursively until every region is a leaf,
//!    carving one Pavement room per leaf
//! 3. Join consecutive rooms (in leaf visiting order) with L-shaped corridors
//! 4. Thin walls down to the one-cell Pavement perimeter
//!
//! All randomness comes from the caller's `Rng`, so a fixed seed always
//! yields the same rooms and the same grid.

use isleforge_core::{GridBuffer, Point, Rect, TileKind, WorldError, WorldResult};
use rand::Rng;
use tracing::{debug, info};

use crate::config::{DungeonConfig, MIN_WORLD_EDGE};
use crate::postprocess::{any_neighbor, MOORE};

/// A carved room and the leaf region that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    /// The Pavement rectangle.
    pub rect: Rect,
    /// The leaf region the room was placed in. Leaf regions never overlap.
    pub region: Rect,
}

impl Room {
    /// Corridor endpoint.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point {
        self.rect.center()
    }
}

/// A finished dungeon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dungeon {
    /// Pavement, Wall and Empty cells after wall thinning.
    pub grid: GridBuffer,
    /// Rooms in leaf visiting order (pre-order of the split tree).
    pub rooms: Vec<Room>,
}

impl Dungeon {
    /// Floor layer: Pavement stays, everything else becomes Empty.
    #[must_use]
    pub fn biome_layer(&self) -> GridBuffer {
        self.grid.map(|kind| match kind {
            TileKind::Pavement => TileKind::Pavement,
            _ => TileKind::Empty,
        })
    }

    /// Constructions layer: Wall stays, everything else becomes Empty.
    #[must_use]
    pub fn construction_layer(&self) -> GridBuffer {
        self.grid.map(|kind| match kind {
            TileKind::Wall => TileKind::Wall,
            _ => TileKind::Empty,
        })
    }
}

/// Which side of a region a split divides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SplitAxis {
    /// Divide the width into a left and right half.
    Width,
    /// Divide the height into a top and bottom half.
    Height,
}

/// Recursive BSP room carver.
#[derive(Clone, Debug)]
pub struct RoomPartitioner {
    config: DungeonConfig,
}

impl RoomPartitioner {
    /// Creates a partitioner. The config is assumed validated.
    #[must_use]
    pub fn new(config: &DungeonConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generates a complete `width x height` dungeon.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` if the config is rejected or the
    /// world is smaller than 3x3 on either axis.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> WorldResult<Dungeon> {
        self.config.validate()?;
        if width < MIN_WORLD_EDGE || height < MIN_WORLD_EDGE {
            return Err(WorldError::InvalidConfig(format!(
                "dungeon must be at least {MIN_WORLD_EDGE}x{MIN_WORLD_EDGE}, got {width}x{height}"
            )));
        }

        let mut grid = GridBuffer::new(width, height, TileKind::Wall);
        let area = Rect::new(1, 1, width - 2, height - 2);

        let mut rooms = Vec::new();
        self.partition(area, &mut grid, rng, &mut rooms)?;
        debug!(rooms = rooms.len(), "Rooms carved");

        let corridors = connect_rooms(&rooms, &mut grid, rng)?;
        debug!(corridors, "Corridors carved");

        let grid = thin_walls(&grid);
        info!(
            width,
            height,
            rooms = rooms.len(),
            floor = grid.count(TileKind::Pavement),
            walls = grid.count(TileKind::Wall),
            "Dungeon generated"
        );

        Ok(Dungeon { grid, rooms })
    }

    /// Splits `region` recursively, carving one room per leaf into `grid`
    /// and appending it to `rooms` in pre-order.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::OutOfBounds` if `region` does not fit in `grid`.
    pub fn partition<R: Rng + ?Sized>(
        &self,
        region: Rect,
        grid: &mut GridBuffer,
        rng: &mut R,
        rooms: &mut Vec<Room>,
    ) -> WorldResult<()> {
        let leaf_edge = 2 * self.config.max_room_size;
        if region.width < leaf_edge && region.height < leaf_edge {
            return self.carve_room(region, grid, rng, rooms);
        }

        let axis = self.choose_axis(region, rng);
        let length = match axis {
            SplitAxis::Width => region.width,
            SplitAxis::Height => region.height,
        };
        let Some(at) = self.split_position(length, rng) else {
            return self.carve_room(region, grid, rng, rooms);
        };

        let (first, second) = match axis {
            SplitAxis::Width => (
                Rect::new(region.x, region.y, at, region.height),
                Rect::new(region.x + at, region.y, region.width - at, region.height),
            ),
            SplitAxis::Height => (
                Rect::new(region.x, region.y, region.width, at),
                Rect::new(region.x, region.y + at, region.width, region.height - at),
            ),
        };

        self.partition(first, grid, rng, rooms)?;
        self.partition(second, grid, rng, rooms)
    }

    #[allow(clippy::cast_precision_loss)]
    fn choose_axis<R: Rng + ?Sized>(&self, region: Rect, rng: &mut R) -> SplitAxis {
        let (w, h) = (region.width as f64, region.height as f64);
        if w / h >= self.config.split_ratio {
            SplitAxis::Width
        } else if h / w >= self.config.split_ratio {
            SplitAxis::Height
        } else if rng.gen_bool(0.5) {
            SplitAxis::Width
        } else {
            SplitAxis::Height
        }
    }

    /// Split offset in `[floor(min * length), floor(max * length)]`, kept at
    /// least one cell away from both ends. `None` if no such offset exists.
    fn split_position<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Option<usize> {
        let lo = fraction_of(length, self.config.split_min).max(1);
        let hi = fraction_of(length, self.config.split_max).min(length.saturating_sub(1));
        (lo <= hi).then(|| rng.gen_range(lo..=hi))
    }

    fn room_edge<R: Rng + ?Sized>(&self, available: usize, rng: &mut R) -> usize {
        let hi = available.min(self.config.max_room_size);
        let lo = self.config.min_room_size.min(hi);
        rng.gen_range(lo..=hi)
    }

    fn carve_room<R: Rng + ?Sized>(
        &self,
        region: Rect,
        grid: &mut GridBuffer,
        rng: &mut R,
        rooms: &mut Vec<Room>,
    ) -> WorldResult<()> {
        let width = self.room_edge(region.width, rng);
        let height = self.room_edge(region.height, rng);
        let x = region.x + rng.gen_range(0..=region.width - width);
        let y = region.y + rng.gen_range(0..=region.height - height);

        let rect = Rect::new(x, y, width, height);
        grid.fill_rect(rect, TileKind::Pavement)?;
        rooms.push(Room { rect, region });
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn fraction_of(length: usize, fraction: f64) -> usize {
    (length as f64 * fraction).floor() as usize
}

/// Joins each consecutive pair of rooms with an L-shaped corridor between
/// their centers. Returns the number of corridors carved.
///
/// The leg order (horizontal first or vertical first) is drawn per pair.
///
/// # Errors
///
/// Returns `WorldError::OutOfBounds` if a room center lies outside `grid`.
pub fn connect_rooms<R: Rng + ?Sized>(
    rooms: &[Room],
    grid: &mut GridBuffer,
    rng: &mut R,
) -> WorldResult<usize> {
    for pair in rooms.windows(2) {
        let (from, to) = (pair[0].center(), pair[1].center());
        if rng.gen_bool(0.5) {
            carve_horizontal(grid, from.x, to.x, from.y)?;
            carve_vertical(grid, from.y, to.y, to.x)?;
        } else {
            carve_vertical(grid, from.y, to.y, from.x)?;
            carve_horizontal(grid, from.x, to.x, to.y)?;
        }
    }
    Ok(rooms.len().saturating_sub(1))
}

fn carve_horizontal(grid: &mut GridBuffer, x1: usize, x2: usize, y: usize) -> WorldResult<()> {
    let (start, end) = (x1.min(x2), x1.max(x2));
    grid.fill_rect(Rect::new(start, y, end - start + 1, 1), TileKind::Pavement)
}

fn carve_vertical(grid: &mut GridBuffer, y1: usize, y2: usize, x: usize) -> WorldResult<()> {
    let (start, end) = (y1.min(y2), y1.max(y2));
    grid.fill_rect(Rect::new(x, start, 1, end - start + 1), TileKind::Pavement)
}

/// Rebuilds every non-Pavement cell: Wall if any of its 8 neighbors is
/// Pavement, otherwise Empty.
///
/// Walls end up exactly one cell thick around the floor, corners included.
/// Applying this to its own output changes nothing.
#[must_use]
pub fn thin_walls(grid: &GridBuffer) -> GridBuffer {
    let is_floor = |kind: TileKind| kind == TileKind::Pavement;
    GridBuffer::from_fn(grid.width(), grid.height(), |x, y| {
        if grid.get(x, y).is_ok_and(is_floor) {
            TileKind::Pavement
        } else if any_neighbor(grid, x, y, &MOORE, is_floor) {
            TileKind::Wall
        } else {
            TileKind::Empty
        }
    })
}
