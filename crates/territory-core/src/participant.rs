#![forbid(unsafe_code)]

//! Weighted participants.

use serde::{Deserialize, Serialize};

/// An entity holding a proportional stake in the layout.
///
/// `weight` may be a raw amount or a pre-normalized share; the layout
/// engine normalizes over the whole set either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub weight: f64,
}

impl Participant {
    /// Create a new participant.
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }

    /// Whether this participant takes part in placement at all.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.weight > 0.0
    }
}
