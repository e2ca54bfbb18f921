#![forbid(unsafe_code)]

//! Weight-to-side-length sizing.
//!
//! Sizing runs once per request, before any strategy. It validates the
//! participant set, normalizes weights into shares, applies the minimum
//! side floor and sorts the result into canonical placement order.
//!
//! # Canonical order
//!
//! Descending side length, ties broken by ascending participant id (byte
//! order). Every strategy places in this order, which makes the output
//! independent of the caller's ordering.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;
use territory_core::Participant;

use crate::error::{InvalidInput, LayoutError};

/// A participant with its computed share and side length.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedParticipant {
    pub id: String,
    /// Position in the caller's input sequence.
    pub input_index: usize,
    /// Fraction of the total positive weight, in `[0, 1]`. Zero only when
    /// the weight is negligible next to the largest one.
    pub share: f64,
    /// Tile side length in cells, already floored at the minimum.
    pub side: u32,
}

/// Result of sizing a participant set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sizing {
    /// Positive-weight participants in canonical order.
    pub sized: Vec<SizedParticipant>,
    /// Ids of zero-weight participants, in input order.
    pub skipped: Vec<String>,
}

impl Sizing {
    /// Largest side length, or zero when nothing is placed.
    #[must_use]
    pub fn largest_side(&self) -> u32 {
        self.sized.first().map_or(0, |p| p.side)
    }
}

/// Side length of the square grid derived from a capacity.
#[inline]
#[must_use]
pub fn grid_side(capacity: u32) -> u32 {
    capacity.isqrt()
}

/// Side length for a share: `max(min_tile_size, isqrt(round(share * capacity)))`,
/// clamped to the grid side.
///
/// Shares that underflow to zero still receive the floor.
#[must_use]
pub fn side_for_share(share: f64, capacity: u32, min_tile_size: u32) -> u32 {
    let share = if share.is_nan() { 0.0 } else { share.clamp(0.0, 1.0) };
    let cells = (share * f64::from(capacity)).round() as u64;
    let side = u32::try_from(cells.isqrt()).unwrap_or(u32::MAX);
    side.min(grid_side(capacity)).max(min_tile_size)
}

/// Ordering used by every strategy: larger sides first, then id.
#[inline]
pub fn canonical_order(a: &SizedParticipant, b: &SizedParticipant) -> Ordering {
    b.side.cmp(&a.side).then_with(|| a.id.cmp(&b.id))
}

/// Validate participants and compute their side lengths.
///
/// Fails with [`LayoutError::InvalidInput`] on malformed input and with
/// [`LayoutError::CapacityExceeded`] when the minimum tile size alone
/// needs more cells than `capacity` provides.
pub fn size_participants(
    participants: &[Participant],
    capacity: u32,
    min_tile_size: u32,
) -> Result<Sizing, LayoutError> {
    if capacity == 0 {
        return Err(InvalidInput::ZeroCapacity.into());
    }
    if min_tile_size == 0 {
        return Err(InvalidInput::ZeroMinTileSize.into());
    }
    validate_participants(participants)?;

    // Scale by the largest weight first so the sum stays within `[1, n]`.
    let largest = participants
        .iter()
        .filter(|p| p.is_active())
        .map(|p| p.weight)
        .fold(0.0_f64, f64::max);
    let total: f64 = participants
        .iter()
        .filter(|p| p.is_active())
        .map(|p| p.weight / largest)
        .sum();

    let mut sizing = Sizing::default();
    for (input_index, participant) in participants.iter().enumerate() {
        if !participant.is_active() {
            sizing.skipped.push(participant.id.clone());
            continue;
        }
        let share = participant.weight / largest / total;
        sizing.sized.push(SizedParticipant {
            id: participant.id.clone(),
            input_index,
            share,
            side: side_for_share(share, capacity, min_tile_size),
        });
    }

    let floor_area = u64::from(min_tile_size) * u64::from(min_tile_size);
    let required = floor_area.saturating_mul(sizing.sized.len() as u64);
    if required > u64::from(capacity) {
        return Err(LayoutError::CapacityExceeded {
            participants: sizing.sized.len(),
            min_tile_size,
            required,
            capacity,
        });
    }

    sizing.sized.sort_by(canonical_order);
    Ok(sizing)
}

fn validate_participants(participants: &[Participant]) -> Result<(), InvalidInput> {
    let mut seen = FxHashSet::default();
    for (index, participant) in participants.iter().enumerate() {
        if participant.id.is_empty() {
            return Err(InvalidInput::EmptyId { index });
        }
        if !participant.weight.is_finite() {
            return Err(InvalidInput::NonFiniteWeight {
                id: participant.id.clone(),
            });
        }
        if participant.weight < 0.0 {
            return Err(InvalidInput::NegativeWeight {
                id: participant.id.clone(),
                weight: participant.weight,
            });
        }
        if !seen.insert(participant.id.as_str()) {
            return Err(InvalidInput::DuplicateId {
                id: participant.id.clone(),
            });
        }
    }
    Ok(())
}
