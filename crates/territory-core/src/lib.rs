#![forbid(unsafe_code)]

//! Core: cell-grid geometry and participant types for territory layouts.
//!
//! # Role in the workspace
//! `territory-core` holds the value types every other crate exchanges:
//! [`Tile`], [`Boundary`] and [`Participant`], plus the overlap predicate
//! used by collision-checked placement. It has no knowledge of placement
//! strategies; those live in `territory-layout`.

pub mod geometry;
pub mod participant;

pub use geometry::{Boundary, Tile, overlaps_any};
pub use participant::Participant;
