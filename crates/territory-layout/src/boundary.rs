#![forbid(unsafe_code)]

//! Boundary computation and centering.
//!
//! # Invariants
//!
//! 1. The boundary is the exact minimal box over all tiles.
//! 2. After [`center`], `min_x + max_x` and `min_y + max_y` are each 0 or 1.
//! 3. Centering is a pure translation: relative tile positions and sizes
//!    are unchanged.

use territory_core::{Boundary, Tile};

/// Minimal bounding box over the placed tiles.
pub fn compute_boundary<'a>(tiles: impl IntoIterator<Item = &'a (String, Tile)>) -> Boundary {
    Boundary::enclosing(tiles.into_iter().map(|(_, tile)| tile))
}

/// Translate every tile so the bounding box is centered on the origin.
///
/// Returns the translated boundary.
pub fn center(tiles: &mut [(String, Tile)]) -> Boundary {
    let boundary = compute_boundary(tiles.iter());
    let (dx, dy) = boundary.center_offset();
    if dx == 0 && dy == 0 {
        return boundary;
    }
    for (_, tile) in tiles.iter_mut() {
        *tile = tile.translate(-dx, -dy);
    }
    boundary.translate(-dx, -dy)
}
