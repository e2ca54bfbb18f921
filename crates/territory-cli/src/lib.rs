#![forbid(unsafe_code)]

//! `territory`: command-line host for the territory layout engine.
//!
//! Reads participants as JSON, runs [`territory_layout::LayoutEngine`] and
//! prints the centered tiles as JSON or a text table.

pub mod cli;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;

pub use cli::{Cli, run};
pub use error::{CliError, Result};
