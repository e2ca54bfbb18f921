#![forbid(unsafe_code)]

//! Column packing: greedy vertical columns of height `N`.
//!
//! Tiles are stacked top to bottom in canonical order. When the next tile
//! would cross the column height budget a new column starts to the right,
//! offset by the widest tile of the previous column. A tile taller than
//! the budget still gets a column of its own.
//!
//! Non-overlap follows from construction, so there is no collision check.
//! O(n) after sizing; never fails, which makes it the fallback for spiral
//! placement.

use territory_core::Tile;

use crate::config::Strategy;
use crate::debug::PlacementRecord;
use crate::sizer::SizedParticipant;
use crate::strategy::{Placement, PlacementContext};

/// Cursor over the column being filled.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnCursor {
    x: i64,
    y: i64,
    width: u32,
}

impl ColumnCursor {
    fn advance(&mut self, side: u32, height: u32) -> Tile {
        let fits = self.y + i64::from(side) <= i64::from(height);
        if !fits && self.y > 0 {
            self.x += i64::from(self.width);
            self.y = 0;
            self.width = 0;
        }
        let tile = Tile::square(self.x as i32, self.y as i32, side);
        self.width = self.width.max(side);
        self.y += i64::from(side);
        tile
    }
}

pub fn place(sized: &[SizedParticipant], ctx: &PlacementContext<'_>) -> Placement {
    let height = ctx.grid_side();
    let mut cursor = ColumnCursor::default();
    let mut placement = Placement::with_capacity(sized.len());

    tracing::debug!(
        participants = sized.len(),
        column_height = height,
        "column placement"
    );

    for participant in sized {
        let tile = cursor.advance(participant.side, height);
        ctx.record(|| PlacementRecord {
            strategy: Strategy::ColumnPack,
            id: participant.id.clone(),
            side: participant.side,
            tile: Some(tile),
            ring_radius: None,
            candidates_tested: 1,
        });
        placement.tiles.push((participant.id.clone(), tile));
    }
    placement
}
