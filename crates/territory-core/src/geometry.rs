#![forbid(unsafe_code)]

//! Cell-grid geometric primitives.
//!
//! Coordinates are signed because a finished layout is centered on the
//! origin. Right and bottom edges are exclusive, so a tile at `x = 0` with
//! `width = 3` covers cells `0, 1, 2`.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle of cells owned by one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl Tile {
    /// Create a new tile.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a square tile with the given side length.
    #[inline]
    pub const fn square(x: i32, y: i32, side: u32) -> Self {
        Self::new(x, y, side, side)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Side length of a square tile; the shorter side otherwise.
    #[inline]
    pub const fn side(&self) -> u32 {
        if self.width < self.height {
            self.width
        } else {
            self.height
        }
    }

    /// Check if the tile has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a cell is inside the tile.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Geometric center in continuous cell units.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Move the tile by a signed offset.
    #[inline]
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// True when the interiors of the two tiles share at least one cell.
    ///
    /// Tiles that only touch along an edge or at a corner do not overlap,
    /// and an empty tile never overlaps anything.
    #[inline]
    pub const fn overlaps(&self, other: &Tile) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Compute the intersection with another tile, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Tile) -> Option<Tile> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Tile::new(x, y, right.abs_diff(x), bottom.abs_diff(y)))
    }

    /// Map the tile center into renderer world space.
    ///
    /// The renderer's Y axis points up, so the cell-space Y is negated.
    #[inline]
    pub fn world_center(&self, cell_size: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        (cx * cell_size, -cy * cell_size)
    }
}

/// True if `candidate` overlaps any tile in `placed`.
///
/// Linear in the number of placed tiles.
pub fn overlaps_any<'a>(candidate: &Tile, placed: impl IntoIterator<Item = &'a Tile>) -> bool {
    placed.into_iter().any(|tile| candidate.overlaps(tile))
}

/// Minimal axis-aligned bounding box over a set of tiles.
///
/// `max_x` and `max_y` are exclusive edges, matching [`Tile::right`] and
/// [`Tile::bottom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Boundary {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub width: u32,
    pub height: u32,
}

impl Boundary {
    /// Build a boundary from its edges.
    pub const fn from_edges(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            width: max_x.abs_diff(min_x),
            height: max_y.abs_diff(min_y),
        }
    }

    /// Smallest boundary enclosing every non-empty tile.
    ///
    /// Returns the all-zero boundary when there are no non-empty tiles.
    pub fn enclosing<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Self {
        let mut edges: Option<(i32, i32, i32, i32)> = None;
        for tile in tiles.into_iter().filter(|t| !t.is_empty()) {
            edges = Some(match edges {
                None => (tile.left(), tile.right(), tile.top(), tile.bottom()),
                Some((min_x, max_x, min_y, max_y)) => (
                    min_x.min(tile.left()),
                    max_x.max(tile.right()),
                    min_y.min(tile.top()),
                    max_y.max(tile.bottom()),
                ),
            });
        }
        edges.map_or_else(Self::default, |(min_x, max_x, min_y, max_y)| {
            Self::from_edges(min_x, max_x, min_y, max_y)
        })
    }

    /// Check if the boundary encloses nothing.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Offset that, when subtracted, moves the boundary onto the origin.
    ///
    /// Rounds toward negative infinity so odd extents leave the extra
    /// cell on the positive side.
    #[inline]
    pub const fn center_offset(&self) -> (i32, i32) {
        (
            self.min_x.saturating_add_unsigned(self.width / 2),
            self.min_y.saturating_add_unsigned(self.height / 2),
        )
    }

    /// Move the boundary by a signed offset.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::from_edges(
            self.min_x.saturating_add(dx),
            self.max_x.saturating_add(dx),
            self.min_y.saturating_add(dy),
            self.max_y.saturating_add(dy),
        )
    }

    /// True when the midpoint sits within one cell of the origin on both axes.
    #[inline]
    pub const fn is_centered(&self) -> bool {
        let sx = self.min_x as i64 + self.max_x as i64;
        let sy = self.min_y as i64 + self.max_y as i64;
        sx.abs() <= 1 && sy.abs() <= 1
    }

    /// Check if a tile lies entirely within the boundary.
    #[inline]
    pub const fn contains_tile(&self, tile: &Tile) -> bool {
        tile.left() >= self.min_x
            && tile.right() <= self.max_x
            && tile.top() >= self.min_y
            && tile.bottom() <= self.max_y
    }
}
