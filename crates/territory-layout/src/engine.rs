#![forbid(unsafe_code)]

//! Layout orchestration.
//!
//! [`LayoutEngine`] validates the request, sizes participants, runs the
//! selected strategy, substitutes the configured fallback when spiral
//! placement is exhausted, and centers the result.
//!
//! # Invariants
//!
//! 1. A returned [`LayoutResult`] is complete: no overlapping tiles, every
//!    side at or above the minimum, an exact centered boundary.
//! 2. Identical inputs and configuration give identical results.
//! 3. A fallback is never silent: it is recorded in
//!    [`LayoutResult::fallback`] together with the error that caused it.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Bad weight, id, capacity or config | `InvalidInput` |
//! | `Σ min_tile_size² > capacity` | `CapacityExceeded` |
//! | Spiral exhausted, fallback disabled | `PlacementExhausted` |
//! | Spiral exhausted, fallback enabled | Column-packed result with `fallback` set |

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use territory_core::{Boundary, Participant, Tile};
use thiserror::Error;

use crate::boundary;
use crate::config::{FallbackPlacement, LayoutConfig, Strategy};
use crate::debug::{LayoutRunRecord, PlacementRecorder};
use crate::error::LayoutError;
use crate::sizer::{SizedParticipant, Sizing, size_participants};
use crate::strategy::{self, Placement, PlacementContext};

/// An explicit strategy substitution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackRecord {
    /// Strategy the caller asked for.
    pub requested: Strategy,
    /// Strategy that produced the result.
    pub used: Strategy,
    /// Error the requested strategy reported.
    pub cause: LayoutError,
}

/// A complete, centered layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Strategy that produced the tiles.
    pub strategy: Strategy,
    /// One tile per placed participant, keyed by id.
    pub tiles: BTreeMap<String, Tile>,
    pub boundary: Boundary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackRecord>,
    /// Zero-weight participants, in input order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    /// Participants left out under the drop policy, in placement order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
}

/// A broken layout invariant, reported by [`LayoutResult::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("tiles {a:?} and {b:?} overlap")]
    Overlap { a: String, b: String },
    #[error("tile {id:?} has side {side}, below minimum {min_tile_size}")]
    BelowMinimum {
        id: String,
        side: u32,
        min_tile_size: u32,
    },
    #[error("boundary {actual:?} is not the minimal box {expected:?}")]
    BoundaryMismatch { expected: Boundary, actual: Boundary },
    #[error("boundary {0:?} is not centered on the origin")]
    NotCentered(Boundary),
}

impl LayoutResult {
    fn empty(strategy: Strategy, skipped: Vec<String>) -> Self {
        Self {
            strategy,
            tiles: BTreeMap::new(),
            boundary: Boundary::default(),
            fallback: None,
            skipped,
            dropped: Vec::new(),
        }
    }

    /// Tile assigned to a participant.
    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Number of placed participants.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether the requested strategy was replaced.
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Total cells covered by tiles.
    pub fn covered_area(&self) -> u64 {
        self.tiles.values().map(Tile::area).sum()
    }

    /// Re-check every layout invariant.
    ///
    /// Quadratic in the number of tiles.
    pub fn verify(&self, min_tile_size: u32) -> Result<(), InvariantViolation> {
        let tiles: Vec<(&String, &Tile)> = self.tiles.iter().collect();
        for (i, (a_id, a)) in tiles.iter().enumerate() {
            if a.side() < min_tile_size {
                return Err(InvariantViolation::BelowMinimum {
                    id: (*a_id).clone(),
                    side: a.side(),
                    min_tile_size,
                });
            }
            if let Some((b_id, _)) = tiles[i + 1..].iter().find(|(_, b)| a.overlaps(b)) {
                return Err(InvariantViolation::Overlap {
                    a: (*a_id).clone(),
                    b: (*b_id).clone(),
                });
            }
        }
        let expected = Boundary::enclosing(self.tiles.values());
        if expected != self.boundary {
            return Err(InvariantViolation::BoundaryMismatch {
                expected,
                actual: self.boundary,
            });
        }
        if !self.boundary.is_centered() {
            return Err(InvariantViolation::NotCentered(self.boundary));
        }
        Ok(())
    }
}

/// Configured entry point for layout requests.
///
/// Holds no state between calls beyond its configuration; the optional
/// recorder only observes.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    recorder: Option<Arc<PlacementRecorder>>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            recorder: None,
        }
    }

    /// Attach a placement recorder.
    #[must_use]
    pub fn with_recorder(mut self, recorder: Arc<PlacementRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `participants` inside `capacity` cells.
    pub fn layout(
        &self,
        participants: &[Participant],
        capacity: u32,
    ) -> Result<LayoutResult, LayoutError> {
        let config = &self.config;
        config.validate()?;

        tracing::debug!(
            participants = participants.len(),
            capacity,
            strategy = %config.strategy,
            min_tile_size = config.min_tile_size,
            "layout requested"
        );

        let Sizing { sized, skipped } =
            size_participants(participants, capacity, config.min_tile_size)?;
        if sized.is_empty() {
            return Ok(LayoutResult::empty(config.strategy, skipped));
        }

        let ctx = PlacementContext::new(capacity, config).with_recorder(self.recorder.as_deref());
        let requested = config.strategy;

        let (used, placement, fallback) = match self.run(requested, &sized, &ctx) {
            Ok(placement) => (requested, placement, None),
            Err(cause @ LayoutError::PlacementExhausted { .. }) => {
                let substitute = match config.fallback {
                    FallbackPlacement::ColumnPack => Strategy::ColumnPack,
                    FallbackPlacement::Disabled => return Err(cause),
                };
                tracing::warn!(
                    requested = %requested,
                    substitute = %substitute,
                    cause = %cause,
                    "placement exhausted, using fallback strategy"
                );
                let placement = self.run(substitute, &sized, &ctx)?;
                let record = FallbackRecord {
                    requested,
                    used: substitute,
                    cause,
                };
                (substitute, placement, Some(record))
            }
            Err(err) => return Err(err),
        };

        let Placement { mut tiles, dropped } = placement;
        let boundary = boundary::center(&mut tiles);

        tracing::debug!(
            placed = tiles.len(),
            dropped = dropped.len(),
            skipped = skipped.len(),
            width = boundary.width,
            height = boundary.height,
            strategy = %used,
            "layout complete"
        );

        Ok(LayoutResult {
            strategy: used,
            tiles: tiles.into_iter().collect(),
            boundary,
            fallback,
            skipped,
            dropped,
        })
    }

    fn run(
        &self,
        strategy: Strategy,
        sized: &[SizedParticipant],
        ctx: &PlacementContext<'_>,
    ) -> Result<Placement, LayoutError> {
        let start = Instant::now();
        let outcome = strategy::place(strategy, sized, ctx);
        if let Some(recorder) = &self.recorder {
            let (placed, dropped, error) = match &outcome {
                Ok(p) => (p.tiles.len(), p.dropped.len(), None),
                Err(err) => (0, 0, Some(err.to_string())),
            };
            recorder.record_run(LayoutRunRecord {
                strategy,
                capacity: ctx.capacity,
                participants: sized.len(),
                placed,
                dropped,
                error,
                solve_time: start.elapsed(),
            });
        }
        outcome
    }
}

/// One-shot layout with an explicit strategy.
///
/// Equivalent to `LayoutEngine::new(config.with_strategy(strategy)).layout(..)`.
pub fn layout(
    participants: &[Participant],
    capacity: u32,
    strategy: Strategy,
    config: &LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    LayoutEngine::new(config.clone().with_strategy(strategy)).layout(participants, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExhaustionPolicy, SpiralConfig};

    fn participants(list: &[(&str, f64)]) -> Vec<Participant> {
        list.iter().map(|(id, w)| Participant::new(*id, *w)).collect()
    }

    fn exhausting_config() -> LayoutConfig {
        LayoutConfig::default().with_spiral(SpiralConfig {
            max_radius: Some(0),
            ..SpiralConfig::default()
        })
    }

    #[test]
    fn column_pack_scenario() {
        let result = layout(
            &participants(&[("A", 0.7), ("B", 0.3)]),
            100,
            Strategy::ColumnPack,
            &LayoutConfig::default(),
        )
        .unwrap();
        assert_eq!(result.tile("A"), Some(&Tile::square(-6, -4, 8)));
        assert_eq!(result.tile("B"), Some(&Tile::square(2, -4, 5)));
        assert_eq!(result.boundary, Boundary::from_edges(-6, 7, -4, 4));
        assert_eq!(result.strategy, Strategy::ColumnPack);
        assert!(!result.used_fallback());
        assert_eq!(result.verify(3), Ok(()));
    }

    #[test]
    fn spiral_falls_back_to_column_pack() {
        let result = LayoutEngine::new(exhausting_config())
            .layout(&participants(&[("a", 0.5), ("b", 0.5)]), 100)
            .unwrap();
        assert_eq!(result.strategy, Strategy::ColumnPack);
        let fallback = result.fallback.as_ref().unwrap();
        assert_eq!(fallback.requested, Strategy::Spiral);
        assert_eq!(fallback.used, Strategy::ColumnPack);
        assert!(matches!(
            fallback.cause,
            LayoutError::PlacementExhausted { ref id, .. } if id == "b"
        ));
        assert_eq!(result.len(), 2);
        assert_eq!(result.verify(3), Ok(()));
    }

    #[test]
    #[tracing_test::traced_test]
    fn fallback_is_logged() {
        LayoutEngine::new(exhausting_config())
            .layout(&participants(&[("a", 0.5), ("b", 0.5)]), 100)
            .unwrap();
        assert!(logs_contain("using fallback strategy"));
        assert!(logs_contain("layout complete"));
    }

    #[test]
    fn disabled_fallback_propagates() {
        let config = exhausting_config().with_fallback(FallbackPlacement::Disabled);
        let err = LayoutEngine::new(config)
            .layout(&participants(&[("a", 0.5), ("b", 0.5)]), 100)
            .unwrap_err();
        assert_eq!(err.kind(), "placement_exhausted");
    }

    #[test]
    fn drop_policy_keeps_spiral() {
        let config = exhausting_config().with_exhaustion(ExhaustionPolicy::DropParticipant);
        let result = LayoutEngine::new(config)
            .layout(&participants(&[("a", 0.5), ("b", 0.5)]), 100)
            .unwrap();
        assert_eq!(result.strategy, Strategy::Spiral);
        assert!(!result.used_fallback());
        assert_eq!(result.dropped, vec!["b".to_string()]);
        assert!(result.tile("b").is_none());
        assert_eq!(result.verify(3), Ok(()));
    }

    #[test]
    fn zero_weight_only_is_empty_result() {
        let result = LayoutEngine::default()
            .layout(&participants(&[("a", 0.0), ("b", 0.0)]), 100)
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.boundary, Boundary::default());
        assert_eq!(result.skipped.len(), 2);
        assert_eq!(result.verify(3), Ok(()));
    }

    #[test]
    fn config_is_validated_first() {
        let config = LayoutConfig::default().with_min_tile_size(0);
        let err = LayoutEngine::new(config)
            .layout(&participants(&[("a", 1.0)]), 100)
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn recorder_sees_both_runs_of_a_fallback() {
        let recorder = PlacementRecorder::new();
        recorder.set_enabled(true);
        let engine = LayoutEngine::new(exhausting_config()).with_recorder(recorder.clone());
        engine
            .layout(&participants(&[("a", 0.5), ("b", 0.5)]), 100)
            .unwrap();
        let runs = recorder.snapshot_runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].strategy, Strategy::Spiral);
        assert!(!runs[0].succeeded());
        assert_eq!(runs[1].strategy, Strategy::ColumnPack);
        assert!(runs[1].succeeded());
        assert_eq!(recorder.unplaced().len(), 1);
    }

    #[test]
    fn verify_detects_violations() {
        let mut result = layout(
            &participants(&[("A", 0.7), ("B", 0.3)]),
            100,
            Strategy::ColumnPack,
            &LayoutConfig::default(),
        )
        .unwrap();

        assert!(matches!(
            result.verify(6),
            Err(InvariantViolation::BelowMinimum { .. })
        ));

        let mut shifted = result.clone();
        shifted.boundary = shifted.boundary.translate(1, 0);
        assert!(matches!(
            shifted.verify(3),
            Err(InvariantViolation::BoundaryMismatch { .. })
        ));

        result.tiles.insert("B".into(), Tile::square(-5, -4, 5));
        assert!(matches!(
            result.verify(3),
            Err(InvariantViolation::Overlap { .. })
        ));
    }

    #[test]
    fn result_serializes_to_json() {
        let result = layout(
            &participants(&[("A", 0.7), ("B", 0.3), ("Z", 0.0)]),
            100,
            Strategy::ColumnPack,
            &LayoutConfig::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["strategy"], "column_pack");
        assert_eq!(json["tiles"]["A"]["width"], 8);
        assert_eq!(json["boundary"]["min_x"], -6);
        assert_eq!(json["skipped"][0], "Z");
        assert!(json.get("fallback").is_none());
    }
}
