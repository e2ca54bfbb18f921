#![forbid(unsafe_code)]

//! Territory layout: weight-proportional, non-overlapping tile placement.
//!
//! # Role in the workspace
//! `territory-layout` turns a set of weighted [`Participant`]s and a cell
//! capacity into a [`LayoutResult`]: one square [`Tile`] per participant,
//! no overlaps, centered on the origin. It is a pure, synchronous function
//! of its inputs and holds no state between calls.
//!
//! # Pipeline
//! 1. [`sizer`]: validate input, normalize weights, compute side lengths,
//!    sort into canonical order (side descending, then id).
//! 2. A placement [`Strategy`]: [`grid`], [`spiral`] or [`column`].
//! 3. [`boundary`]: minimal bounding box, then centering.
//! 4. [`engine`]: strategy selection and the spiral → column-pack fallback.
//!
//! # Usage
//!
//! ```
//! use territory_layout::{LayoutConfig, Participant, Strategy, layout};
//!
//! let participants = [Participant::new("A", 0.7), Participant::new("B", 0.3)];
//! let result = layout(&participants, 100, Strategy::ColumnPack, &LayoutConfig::default())?;
//! assert_eq!(result.tile("A").map(|t| t.width), Some(8));
//! assert_eq!(result.tile("B").map(|t| t.width), Some(5));
//! assert!(result.boundary.is_centered());
//! # Ok::<(), territory_layout::LayoutError>(())
//! ```

pub mod boundary;
pub mod column;
pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod grid;
pub mod sizer;
pub mod spiral;
pub mod strategy;

pub use config::{
    ExhaustionPolicy, FallbackPlacement, GridConfig, GridReference, LayoutConfig, SpiralConfig,
    Strategy,
};
pub use debug::{LayoutRunRecord, PlacementRecord, PlacementRecorder};
pub use engine::{FallbackRecord, InvariantViolation, LayoutEngine, LayoutResult, layout};
pub use error::{InvalidInput, LayoutError};
pub use sizer::{SizedParticipant, Sizing, side_for_share, size_participants};
pub use territory_core::{Boundary, Participant, Tile};
