#![forbid(unsafe_code)]

//! Uniform grid placement.
//!
//! Every participant gets the same side length, taken from one reference
//! participant chosen by [`GridReference`]. Tiles fill a `g × g` grid
//! (`g = ceil(sqrt(n))`) row by row in canonical order, with the full grid
//! centered on the origin. Always succeeds in O(n).
//!
//! Tile areas are not weight-proportional here; that is the point of the
//! strategy.

use territory_core::Tile;

use crate::config::{GridReference, Strategy};
use crate::debug::PlacementRecord;
use crate::sizer::{SizedParticipant, side_for_share};
use crate::strategy::{Placement, PlacementContext};

/// Uniform side length chosen by the configured reference participant.
#[must_use]
pub fn uniform_side(sized: &[SizedParticipant], ctx: &PlacementContext<'_>) -> u32 {
    let reference = match ctx.config.grid.reference {
        GridReference::First => sized.iter().min_by_key(|p| p.input_index),
        GridReference::Largest => sized.iter().max_by(|a, b| a.share.total_cmp(&b.share)),
        GridReference::Smallest => sized.iter().min_by(|a, b| a.share.total_cmp(&b.share)),
    };
    reference.map_or(0, |p| {
        side_for_share(p.share, ctx.capacity, ctx.config.min_tile_size)
    })
}

/// Number of columns (and rows) of the implicit square grid.
#[inline]
#[must_use]
pub fn grid_columns(n: usize) -> usize {
    let root = n.isqrt();
    if root * root < n { root + 1 } else { root }
}

pub fn place(sized: &[SizedParticipant], ctx: &PlacementContext<'_>) -> Placement {
    let mut placement = Placement::with_capacity(sized.len());
    if sized.is_empty() {
        return placement;
    }

    let size = uniform_side(sized, ctx);
    let columns = grid_columns(sized.len());
    let span = columns as i64 * i64::from(size);
    let start = -(span / 2);

    tracing::debug!(
        participants = sized.len(),
        columns,
        side = size,
        reference = ?ctx.config.grid.reference,
        "grid placement"
    );

    for (index, participant) in sized.iter().enumerate() {
        let gx = (index % columns) as i64;
        let gy = (index / columns) as i64;
        let x = start + gx * i64::from(size);
        let y = start + gy * i64::from(size);
        let tile = Tile::square(x as i32, y as i32, size);

        ctx.record(|| PlacementRecord {
            strategy: Strategy::Grid,
            id: participant.id.clone(),
            side: size,
            tile: Some(tile),
            ring_radius: None,
            candidates_tested: 1,
        });
        placement.tiles.push((participant.id.clone(), tile));
    }
    placement
}
