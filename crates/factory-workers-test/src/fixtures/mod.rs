//! Fixture files.
//!
//! - [`FixtureFormat`] - TOML, JSON and (with the `yaml` feature) YAML
//! - [`FixtureDocument`] - raw file layout
//! - [`FixtureParser`] - file to factory and worker definitions

mod format;
mod parser;

pub use format::{FixtureDocument, FixtureFormat, StepSpec, WorkerSpec};
pub use parser::{FixtureParser, ParsedFixtures, decode_attribute};
