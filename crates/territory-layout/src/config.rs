#![forbid(unsafe_code)]

//! Layout configuration.
//!
//! All fields have defaults, so an empty JSON object deserializes into a
//! usable [`LayoutConfig`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, LayoutError};

/// Default minimum tile side length in cells.
pub const DEFAULT_MIN_TILE_SIZE: u32 = 3;
/// Default angular increment between spiral candidates.
pub const DEFAULT_ANGLE_STEP_DEGREES: f64 = 15.0;
/// Smallest accepted angular increment: 65 536 candidates per ring.
pub const MIN_ANGLE_STEP_DEGREES: f64 = 360.0 / 65_536.0;
/// Default ring spacing for the spiral search.
pub const DEFAULT_RADIUS_STEP: u32 = 2;

/// Placement algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniform tiles on a square grid.
    Grid,
    /// Collision-checked ring search outward from the center.
    #[default]
    Spiral,
    /// Greedy vertical columns; always succeeds.
    ColumnPack,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Grid, Strategy::Spiral, Strategy::ColumnPack];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Spiral => "spiral",
            Self::ColumnPack => "column_pack",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "grid" => Ok(Self::Grid),
            "spiral" => Ok(Self::Spiral),
            "column_pack" | "columnpack" | "column" => Ok(Self::ColumnPack),
            other => Err(format!(
                "unknown strategy {other:?} (expected grid, spiral or column_pack)"
            )),
        }
    }
}

/// Which participant's share sets the uniform grid tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridReference {
    /// First positive-weight participant in caller order.
    First,
    /// Participant with the largest share.
    #[default]
    Largest,
    /// Participant with the smallest share.
    Smallest,
}

/// Grid strategy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub reference: GridReference,
}

/// Spiral search settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// Angular spacing of candidates on each ring.
    pub angle_step_degrees: f64,
    /// Distance between consecutive rings, in cells.
    pub radius_step: u32,
    /// Largest ring searched. `None` uses `N + largest side`.
    pub max_radius: Option<u32>,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            angle_step_degrees: DEFAULT_ANGLE_STEP_DEGREES,
            radius_step: DEFAULT_RADIUS_STEP,
            max_radius: None,
        }
    }
}

impl SpiralConfig {
    /// Resolve the radius bound for a grid of side `n` whose largest tile is `largest_side`.
    #[must_use]
    pub fn resolved_max_radius(&self, n: u32, largest_side: u32) -> u32 {
        self.max_radius
            .unwrap_or_else(|| n.saturating_add(largest_side))
    }
}

/// What spiral placement does with a participant it cannot fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Fail the whole strategy run with `PlacementExhausted`.
    #[default]
    FailFast,
    /// Leave the participant out and list it in `LayoutResult::dropped`.
    DropParticipant,
}

/// Strategy substituted when spiral placement fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPlacement {
    /// Propagate the spiral failure to the caller.
    Disabled,
    /// Re-run with column packing.
    #[default]
    ColumnPack,
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_tile_size: u32,
    pub strategy: Strategy,
    pub spiral: SpiralConfig,
    pub grid: GridConfig,
    pub exhaustion: ExhaustionPolicy,
    pub fallback: FallbackPlacement,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_tile_size: DEFAULT_MIN_TILE_SIZE,
            strategy: Strategy::default(),
            spiral: SpiralConfig::default(),
            grid: GridConfig::default(),
            exhaustion: ExhaustionPolicy::default(),
            fallback: FallbackPlacement::default(),
        }
    }
}

impl LayoutConfig {
    /// Set the minimum tile size.
    #[must_use]
    pub fn with_min_tile_size(mut self, min_tile_size: u32) -> Self {
        self.min_tile_size = min_tile_size;
        self
    }

    /// Set the placement strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the spiral search settings.
    #[must_use]
    pub fn with_spiral(mut self, spiral: SpiralConfig) -> Self {
        self.spiral = spiral;
        self
    }

    /// Set the grid reference participant.
    #[must_use]
    pub fn with_grid_reference(mut self, reference: GridReference) -> Self {
        self.grid.reference = reference;
        self
    }

    /// Set the exhaustion policy.
    #[must_use]
    pub fn with_exhaustion(mut self, exhaustion: ExhaustionPolicy) -> Self {
        self.exhaustion = exhaustion;
        self
    }

    /// Set the fallback strategy.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPlacement) -> Self {
        self.fallback = fallback;
        self
    }

    /// Reject settings no strategy can run with.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.min_tile_size == 0 {
            return Err(InvalidInput::ZeroMinTileSize.into());
        }
        let degrees = self.spiral.angle_step_degrees;
        if !degrees.is_finite() || degrees < MIN_ANGLE_STEP_DEGREES {
            return Err(InvalidInput::AngleStep { degrees }.into());
        }
        if self.spiral.radius_step == 0 {
            return Err(InvalidInput::ZeroRadiusStep.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = LayoutConfig::default();
        assert_eq!(config.min_tile_size, 3);
        assert_eq!(config.strategy, Strategy::Spiral);
        assert_eq!(config.spiral.angle_step_degrees, 15.0);
        assert_eq!(config.spiral.radius_step, 2);
        assert_eq!(config.spiral.max_radius, None);
        assert_eq!(config.exhaustion, ExhaustionPolicy::FailFast);
        assert_eq!(config.fallback, FallbackPlacement::ColumnPack);
        assert_eq!(config.grid.reference, GridReference::Largest);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        let config: LayoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{"strategy":"column_pack","spiral":{"radius_step":4},"exhaustion":"drop_participant"}"#,
        )
        .unwrap();
        assert_eq!(config.strategy, Strategy::ColumnPack);
        assert_eq!(config.spiral.radius_step, 4);
        assert_eq!(config.spiral.angle_step_degrees, 15.0);
        assert_eq!(config.exhaustion, ExhaustionPolicy::DropParticipant);
    }

    #[test]
    fn validate_rejects_bad_settings() {
        let zero_min = LayoutConfig::default().with_min_tile_size(0);
        assert_eq!(
            zero_min.validate(),
            Err(InvalidInput::ZeroMinTileSize.into())
        );

        let bad_angle = LayoutConfig::default().with_spiral(SpiralConfig {
            angle_step_degrees: f64::NAN,
            ..SpiralConfig::default()
        });
        assert!(matches!(
            bad_angle.validate(),
            Err(LayoutError::InvalidInput(InvalidInput::AngleStep { .. }))
        ));

        for degrees in [1e-300, 1e-7, MIN_ANGLE_STEP_DEGREES / 2.0] {
            let tiny_angle = LayoutConfig::default().with_spiral(SpiralConfig {
                angle_step_degrees: degrees,
                ..SpiralConfig::default()
            });
            assert_eq!(
                tiny_angle.validate(),
                Err(InvalidInput::AngleStep { degrees }.into())
            );
        }
        let finest = LayoutConfig::default().with_spiral(SpiralConfig {
            angle_step_degrees: MIN_ANGLE_STEP_DEGREES,
            ..SpiralConfig::default()
        });
        assert_eq!(finest.validate(), Ok(()));

        let zero_step = LayoutConfig::default().with_spiral(SpiralConfig {
            radius_step: 0,
            ..SpiralConfig::default()
        });
        assert_eq!(zero_step.validate(), Err(InvalidInput::ZeroRadiusStep.into()));
    }

    #[test]
    fn strategy_parses_loosely() {
        assert_eq!("Spiral".parse::<Strategy>(), Ok(Strategy::Spiral));
        assert_eq!("column-pack".parse::<Strategy>(), Ok(Strategy::ColumnPack));
        assert_eq!(" grid ".parse::<Strategy>(), Ok(Strategy::Grid));
        assert!("hexagon".parse::<Strategy>().is_err());
        for strategy in Strategy::ALL {
            assert_eq!(strategy.as_str().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn max_radius_resolution() {
        let auto = SpiralConfig::default();
        assert_eq!(auto.resolved_max_radius(50, 20), 70);
        let fixed = SpiralConfig {
            max_radius: Some(8),
            ..SpiralConfig::default()
        };
        assert_eq!(fixed.resolved_max_radius(50, 20), 8);
    }
}
