//! Input documents.
//!
//! Two shapes are accepted:
//!
//! ```json
//! [{"id": "a", "weight": 3.0}, {"id": "b", "weight": 1.0, "metadata": {"color": "red"}}]
//! ```
//!
//! or a request object carrying capacity and configuration alongside the
//! participants:
//!
//! ```json
//! {"capacity": 2500, "participants": [...], "config": {"strategy": "column_pack"}}
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use territory_layout::{LayoutConfig, Participant};

use crate::error::{CliError, Result};

/// Path that selects standard input.
pub const STDIN: &str = "-";

/// One participant as written in an input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: String,
    pub weight: f64,
    /// Passed through to the output untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ParticipantRecord {
    pub fn to_participant(&self) -> Participant {
        Participant::new(self.id.clone(), self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutRequest {
    #[serde(default)]
    pub capacity: Option<u32>,
    pub participants: Vec<ParticipantRecord>,
    #[serde(default)]
    pub config: Option<LayoutConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Participants(Vec<ParticipantRecord>),
    Request(LayoutRequest),
}

impl LayoutRequest {
    pub fn participants(&self) -> Vec<Participant> {
        self.participants
            .iter()
            .map(ParticipantRecord::to_participant)
            .collect()
    }

    /// Metadata by participant id, for entries that carry any.
    pub fn metadata(&self) -> BTreeMap<&str, &serde_json::Value> {
        self.participants
            .iter()
            .filter_map(|p| p.metadata.as_ref().map(|m| (p.id.as_str(), m)))
            .collect()
    }
}

/// Read a file, or standard input when `path` is `-`.
pub fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::read("<stdin>", e))?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::read(path, e))
}

/// Parse either input shape into a request.
pub fn parse_request(text: &str, origin: &Path) -> Result<LayoutRequest> {
    let document: InputDocument =
        serde_json::from_str(text).map_err(|e| CliError::parse(origin, e))?;
    Ok(match document {
        InputDocument::Participants(participants) => LayoutRequest {
            participants,
            ..LayoutRequest::default()
        },
        InputDocument::Request(request) => request,
    })
}

pub fn load_request(path: &Path) -> Result<LayoutRequest> {
    let text = read_source(path)?;
    parse_request(&text, &display_origin(path))
}

/// Load a JSON configuration file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<LayoutConfig> {
    let text = read_source(path)?;
    serde_json::from_str(&text).map_err(|e| CliError::parse(display_origin(path), e))
}

fn display_origin(path: &Path) -> PathBuf {
    if path.as_os_str() == STDIN {
        PathBuf::from("<stdin>")
    } else {
        path.to_path_buf()
    }
}
