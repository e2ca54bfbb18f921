#![forbid(unsafe_code)]

//! Spiral placement: collision-checked ring search outward from the center.
//!
//! For each participant (canonical order) the search walks rings of radius
//! `0, step, 2·step, …` around the grid center `(N/2, N/2)`. Radius zero has
//! one candidate, the centered tile; every other ring samples candidates at
//! a fixed angular increment. A candidate is valid when it overlaps no tile
//! placed so far. The first ring with any valid candidate wins, and within
//! it the candidate whose tile center is nearest the grid center is taken
//! (earliest angle on ties).
//!
//! # Scaling
//!
//! Each candidate is checked against every placed tile, so a run costs
//! O(n² · rings · angles) overlap tests in the worst case. That is fine
//! for tens to low hundreds of participants. Larger sets should use
//! [`Strategy::ColumnPack`] or [`Strategy::Grid`].
//!
//! # Failure Modes
//!
//! A participant with no valid candidate on any ring up to `max_radius`
//! is handled by [`ExhaustionPolicy`]: fail the run, or drop the
//! participant and keep going.

use territory_core::{Tile, overlaps_any};

use crate::config::{ExhaustionPolicy, MIN_ANGLE_STEP_DEGREES, Strategy};
use crate::debug::PlacementRecord;
use crate::error::LayoutError;
use crate::sizer::SizedParticipant;
use crate::strategy::{Placement, PlacementContext};

/// Unit vectors for each sampled angle, starting at 0° and increasing.
///
/// Steps finer than [`MIN_ANGLE_STEP_DEGREES`] are clamped to it.
#[must_use]
pub fn ring_directions(angle_step_degrees: f64) -> Vec<(f64, f64)> {
    let angle_step_degrees = angle_step_degrees.max(MIN_ANGLE_STEP_DEGREES);
    let mut directions = Vec::new();
    let mut k = 0u32;
    loop {
        let degrees = f64::from(k) * angle_step_degrees;
        if degrees >= 360.0 - 1e-9 {
            break;
        }
        let theta = degrees.to_radians();
        directions.push((theta.cos(), theta.sin()));
        k += 1;
    }
    directions
}

/// A successful ring search.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Found {
    tile: Tile,
    radius: u32,
}

/// Ring search state shared across participants of one run.
#[derive(Debug)]
struct RingSearch {
    center: f64,
    directions: Vec<(f64, f64)>,
    radius_step: u32,
    max_radius: u32,
}

impl RingSearch {
    fn candidate(&self, side: u32, radius: u32, direction: (f64, f64)) -> Tile {
        let half = f64::from(side) / 2.0;
        let r = f64::from(radius);
        let x = (self.center + r * direction.0 - half).round();
        let y = (self.center + r * direction.1 - half).round();
        Tile::square(x as i32, y as i32, side)
    }

    fn distance_sq(&self, tile: &Tile) -> f64 {
        let (cx, cy) = tile.center();
        let dx = cx - self.center;
        let dy = cy - self.center;
        dx * dx + dy * dy
    }

    /// Find the best slot for a tile of `side`; also returns the number of
    /// candidates tested.
    fn find(&self, side: u32, placed: &[Tile]) -> (Option<Found>, u32) {
        let mut tested = 0u32;
        let mut radius = 0u32;
        while radius <= self.max_radius {
            let mut best: Option<(Tile, f64)> = None;
            let mut consider = |tile: Tile| {
                tested += 1;
                if overlaps_any(&tile, placed) {
                    return;
                }
                let d = self.distance_sq(&tile);
                if best.is_none_or(|(_, best_d)| d < best_d) {
                    best = Some((tile, d));
                }
            };

            if radius == 0 {
                consider(self.candidate(side, 0, (0.0, 0.0)));
            } else {
                for &direction in &self.directions {
                    consider(self.candidate(side, radius, direction));
                }
            }

            if let Some((tile, _)) = best {
                return (Some(Found { tile, radius }), tested);
            }
            match radius.checked_add(self.radius_step) {
                Some(next) => radius = next,
                None => break,
            }
        }
        (None, tested)
    }
}

pub fn place(
    sized: &[SizedParticipant],
    ctx: &PlacementContext<'_>,
) -> Result<Placement, LayoutError> {
    let spiral = &ctx.config.spiral;
    let n = ctx.grid_side();
    let largest_side = sized.first().map_or(0, |p| p.side);
    let search = RingSearch {
        center: f64::from(n) / 2.0,
        directions: ring_directions(spiral.angle_step_degrees),
        radius_step: spiral.radius_step.max(1),
        max_radius: spiral.resolved_max_radius(n, largest_side),
    };

    tracing::debug!(
        participants = sized.len(),
        grid_side = n,
        max_radius = search.max_radius,
        angles = search.directions.len(),
        "spiral placement"
    );

    let mut placed: Vec<Tile> = Vec::with_capacity(sized.len());
    let mut placement = Placement::with_capacity(sized.len());

    for participant in sized {
        let (found, tested) = search.find(participant.side, &placed);
        ctx.record(|| PlacementRecord {
            strategy: Strategy::Spiral,
            id: participant.id.clone(),
            side: participant.side,
            tile: found.map(|f| f.tile),
            ring_radius: found.map(|f| f.radius),
            candidates_tested: tested,
        });

        match found {
            Some(Found { tile, radius }) => {
                tracing::trace!(id = %participant.id, x = tile.x, y = tile.y, side = tile.width, radius, "placed");
                placed.push(tile);
                placement.tiles.push((participant.id.clone(), tile));
            }
            None => match ctx.config.exhaustion {
                ExhaustionPolicy::FailFast => {
                    return Err(LayoutError::PlacementExhausted {
                        id: participant.id.clone(),
                        side: participant.side,
                        max_radius: search.max_radius,
                    });
                }
                ExhaustionPolicy::DropParticipant => {
                    tracing::warn!(
                        id = %participant.id,
                        side = participant.side,
                        max_radius = search.max_radius,
                        "no free slot, dropping participant"
                    );
                    placement.dropped.push(participant.id.clone());
                }
            },
        }
    }
    Ok(placement)
}
