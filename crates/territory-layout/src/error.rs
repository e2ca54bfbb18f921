#![forbid(unsafe_code)]

//! Layout error taxonomy.
//!
//! Every error is raised before any caller-visible state exists, so a
//! failed request never yields a partial layout.

use serde::Serialize;
use thiserror::Error;

/// Input rejected before any placement work begins.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidInput {
    #[error("participant {id:?} has negative weight {weight}")]
    NegativeWeight { id: String, weight: f64 },
    #[error("participant {id:?} has a non-finite weight")]
    NonFiniteWeight { id: String },
    #[error("participant at position {index} has an empty id")]
    EmptyId { index: usize },
    #[error("participant id {id:?} appears more than once")]
    DuplicateId { id: String },
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("minimum tile size must be positive")]
    ZeroMinTileSize,
    #[error("spiral angle step must be a finite number of degrees no smaller than 360/65536, got {degrees}")]
    AngleStep { degrees: f64 },
    #[error("spiral radius step must be positive")]
    ZeroRadiusStep,
}

/// Errors returned by the layout engine.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum LayoutError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The minimum tile size alone needs more cells than exist.
    #[error(
        "capacity exceeded: {participants} participants at minimum side {min_tile_size} \
         need {required} cells, capacity is {capacity}"
    )]
    CapacityExceeded {
        participants: usize,
        min_tile_size: u32,
        required: u64,
        capacity: u32,
    },

    /// Spiral search ran past its radius bound without a free slot.
    #[error("no free slot for participant {id:?} (side {side}) within radius {max_radius}")]
    PlacementExhausted {
        id: String,
        side: u32,
        max_radius: u32,
    },
}

impl LayoutError {
    /// Stable machine-readable name of the error class.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::PlacementExhausted { .. } => "placement_exhausted",
        }
    }
}
