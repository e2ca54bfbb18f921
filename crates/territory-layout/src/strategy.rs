#![forbid(unsafe_code)]

//! Shared strategy plumbing: the placement context passed to every
//! strategy and the pre-centering placement they return.

use territory_core::Tile;

use crate::config::{LayoutConfig, Strategy};
use crate::debug::{PlacementRecord, PlacementRecorder};
use crate::error::LayoutError;
use crate::sizer::{SizedParticipant, grid_side};
use crate::{column, grid, spiral};

/// Inputs every strategy reads.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub capacity: u32,
    pub config: &'a LayoutConfig,
    pub recorder: Option<&'a PlacementRecorder>,
}

impl<'a> PlacementContext<'a> {
    pub fn new(capacity: u32, config: &'a LayoutConfig) -> Self {
        Self {
            capacity,
            config,
            recorder: None,
        }
    }

    #[must_use]
    pub fn with_recorder(mut self, recorder: Option<&'a PlacementRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Side `N` of the square grid implied by the capacity.
    #[inline]
    pub fn grid_side(&self) -> u32 {
        grid_side(self.capacity)
    }

    pub(crate) fn record(&self, record: impl FnOnce() -> PlacementRecord) {
        if let Some(recorder) = self.recorder
            && recorder.enabled()
        {
            recorder.record(record());
        }
    }
}

/// Tiles produced by a strategy, before boundary computation and centering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placement {
    /// Placed tiles in canonical order.
    pub tiles: Vec<(String, Tile)>,
    /// Participants left out under [`ExhaustionPolicy::DropParticipant`](crate::ExhaustionPolicy::DropParticipant).
    pub dropped: Vec<String>,
}

impl Placement {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            tiles: Vec::with_capacity(n),
            dropped: Vec::new(),
        }
    }
}

/// Run one strategy over participants already in canonical order.
pub fn place(
    strategy: Strategy,
    sized: &[SizedParticipant],
    ctx: &PlacementContext<'_>,
) -> Result<Placement, LayoutError> {
    match strategy {
        Strategy::Grid => Ok(grid::place(sized, ctx)),
        Strategy::Spiral => spiral::place(sized, ctx),
        Strategy::ColumnPack => Ok(column::place(sized, ctx)),
    }
}
