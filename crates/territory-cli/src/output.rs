//! Rendering a [`LayoutResult`] for the terminal or for other programs.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;
use territory_layout::{Boundary, FallbackRecord, LayoutResult, Strategy};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON document.
    #[default]
    Json,
    /// Aligned human-readable table.
    Text,
}

/// World-space center of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileReport<'a> {
    pub id: &'a str,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<WorldPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a serde_json::Value>,
}

/// Serializable view of a layout, enriched with world coordinates and
/// pass-through metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport<'a> {
    pub strategy: Strategy,
    pub tiles: Vec<TileReport<'a>>,
    pub boundary: Boundary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<&'a FallbackRecord>,
    #[serde(skip_serializing_if = "is_empty")]
    pub skipped: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    pub dropped: &'a [String],
}

fn is_empty(ids: &&[String]) -> bool {
    ids.is_empty()
}

impl<'a> LayoutReport<'a> {
    pub fn new(
        result: &'a LayoutResult,
        cell_size: Option<f64>,
        metadata: &BTreeMap<&'a str, &'a serde_json::Value>,
    ) -> Self {
        let tiles = result
            .tiles
            .iter()
            .map(|(id, tile)| TileReport {
                id,
                x: tile.x,
                y: tile.y,
                width: tile.width,
                height: tile.height,
                world: cell_size.map(|cs| {
                    let (x, y) = tile.world_center(cs);
                    WorldPoint { x, y }
                }),
                metadata: metadata.get(id.as_str()).copied(),
            })
            .collect();
        Self {
            strategy: result.strategy,
            tiles,
            boundary: result.boundary,
            fallback: result.fallback.as_ref(),
            skipped: &result.skipped,
            dropped: &result.dropped,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self).map_err(CliError::Encode),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut s = String::new();
        let b = &self.boundary;
        let _ = writeln!(
            s,
            "strategy: {}  tiles: {}  boundary: x [{}, {}) y [{}, {}) {}x{}",
            self.strategy,
            self.tiles.len(),
            b.min_x,
            b.max_x,
            b.min_y,
            b.max_y,
            b.width,
            b.height
        );
        if let Some(fallback) = self.fallback {
            let _ = writeln!(
                s,
                "fallback: {} -> {} ({})",
                fallback.requested, fallback.used, fallback.cause
            );
        }

        let id_width = self
            .tiles
            .iter()
            .map(|t| t.id.len())
            .max()
            .unwrap_or(2)
            .max(2);
        let _ = writeln!(s);
        let _ = write!(s, "{:<id_width$}  {:>6}  {:>6}  {:>5}", "id", "x", "y", "side");
        let with_world = self.tiles.iter().any(|t| t.world.is_some());
        if with_world {
            let _ = write!(s, "  {:>10}  {:>10}", "world_x", "world_y");
        }
        let _ = writeln!(s);
        for tile in &self.tiles {
            let _ = write!(
                s,
                "{:<id_width$}  {:>6}  {:>6}  {:>5}",
                tile.id, tile.x, tile.y, tile.width
            );
            if let Some(world) = tile.world {
                let _ = write!(s, "  {:>10.2}  {:>10.2}", world.x, world.y);
            }
            let _ = writeln!(s);
        }

        if !self.skipped.is_empty() {
            let _ = writeln!(s, "\nskipped (zero weight): {}", self.skipped.join(", "));
        }
        if !self.dropped.is_empty() {
            let _ = writeln!(s, "dropped (no slot): {}", self.dropped.join(", "));
        }
        s
    }
}
