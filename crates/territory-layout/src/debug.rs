#![forbid(unsafe_code)]

//! Placement debugging utilities.
//!
//! Provides introspection into layout runs:
//! - One record per participant placement attempt (ring radius, number of
//!   candidates tested, pre-centering tile)
//! - One record per strategy run (timing, outcome)
//! - A human-readable report
//!
//! Recording is a no-op unless explicitly enabled at runtime. The recorder
//! is injected into [`LayoutEngine`](crate::LayoutEngine); the engine never
//! reaches for global state.
//!
//! # Usage
//!
//! ```ignore
//! use territory_layout::{LayoutConfig, LayoutEngine, PlacementRecorder};
//!
//! let recorder = PlacementRecorder::new();
//! recorder.set_enabled(true);
//! let engine = LayoutEngine::new(LayoutConfig::default()).with_recorder(recorder.clone());
//! let _ = engine.layout(&participants, 2500);
//! println!("{}", recorder.report());
//! ```

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use territory_core::Tile;

use crate::config::Strategy;

/// A record of one participant's placement attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub strategy: Strategy,
    pub id: String,
    pub side: u32,
    /// Pre-centering tile, `None` when no slot was found.
    pub tile: Option<Tile>,
    /// Ring the tile was found on (spiral only).
    pub ring_radius: Option<u32>,
    /// Candidate positions evaluated, including rejected ones.
    pub candidates_tested: u32,
}

impl PlacementRecord {
    /// Whether the participant received a tile.
    pub fn placed(&self) -> bool {
        self.tile.is_some()
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        let tile = self.tile.map_or_else(
            || "UNPLACED".to_string(),
            |t| format!("({},{} {}x{})", t.x, t.y, t.width, t.height),
        );
        let ring = self
            .ring_radius
            .map_or_else(String::new, |r| format!(" ring={r}"));
        format!(
            "[{}] {} side={} -> {}{} tested={}",
            self.strategy, self.id, self.side, tile, ring, self.candidates_tested
        )
    }
}

/// A record of one strategy run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRunRecord {
    pub strategy: Strategy,
    pub capacity: u32,
    pub participants: usize,
    pub placed: usize,
    pub dropped: usize,
    /// Error message when the run failed.
    pub error: Option<String>,
    pub solve_time: Duration,
}

impl LayoutRunRecord {
    /// Whether the run produced a placement.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Placement recorder.
///
/// Thread-safe via internal synchronization; can be shared between
/// engines running on different threads.
#[derive(Debug)]
pub struct PlacementRecorder {
    enabled: AtomicBool,
    records: Mutex<Vec<PlacementRecord>>,
    runs: Mutex<Vec<LayoutRunRecord>>,
}

impl PlacementRecorder {
    /// Create a new recorder wrapped in Arc (disabled by default).
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            enabled: AtomicBool::new(false),
            records: Mutex::new(Vec::new()),
            runs: Mutex::new(Vec::new()),
        })
    }

    /// Check if recording is enabled.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enable or disable recording.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Clear all recorded data.
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
        if let Ok(mut runs) = self.runs.lock() {
            runs.clear();
        }
    }

    /// Record a placement attempt.
    pub fn record(&self, record: PlacementRecord) {
        if !self.enabled() {
            return;
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    /// Record a strategy run.
    pub fn record_run(&self, run: LayoutRunRecord) {
        if !self.enabled() {
            return;
        }
        if let Ok(mut runs) = self.runs.lock() {
            runs.push(run);
        }
    }

    /// Get a snapshot of all placement records.
    pub fn snapshot(&self) -> Vec<PlacementRecord> {
        self.records
            .lock()
            .ok()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Get a snapshot of all run records.
    pub fn snapshot_runs(&self) -> Vec<LayoutRunRecord> {
        self.runs
            .lock()
            .ok()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Placement attempts that found no slot.
    pub fn unplaced(&self) -> Vec<PlacementRecord> {
        self.snapshot()
            .into_iter()
            .filter(|r| !r.placed())
            .collect()
    }

    /// Generate a summary report of everything recorded.
    pub fn report(&self) -> String {
        let records = self.snapshot();
        let runs = self.snapshot_runs();

        let mut s = String::new();
        let _ = writeln!(
            s,
            "=== Placement Report ({} runs, {} placements) ===",
            runs.len(),
            records.len()
        );

        let failed: Vec<_> = runs.iter().filter(|r| !r.succeeded()).collect();
        if !failed.is_empty() {
            let _ = writeln!(s, "\n⚠ {} runs FAILED:", failed.len());
            for run in &failed {
                let _ = writeln!(
                    s,
                    "  - {}: {}",
                    run.strategy,
                    run.error.as_deref().unwrap_or("")
                );
            }
        }

        let _ = writeln!(s, "\n--- Runs ---");
        for run in &runs {
            let _ = writeln!(
                s,
                "{} capacity={} participants={} placed={} dropped={} time={:?}",
                run.strategy,
                run.capacity,
                run.participants,
                run.placed,
                run.dropped,
                run.solve_time
            );
        }

        let _ = writeln!(s, "\n--- Placements ---");
        for record in &records {
            let _ = writeln!(s, "{}", record.summary());
        }
        s
    }
}
