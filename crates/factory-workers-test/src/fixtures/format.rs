//! Fixture file formats and document layout.
//!
//! A fixture file declares factories and declarative workers:
//!
//! ```toml
//! [factories.monkey]
//! name = "George"
//!
//! [factories.pirate]
//! catchphrase = "Ahhrrrr, Matey!"
//! monkey = { belongs_to = "monkey" }
//! created_on = { deferred = "days_ago", days = 1 }
//!
//! [workers.crew]
//! depends_on = ["ship"]
//! create = [{ factory = "pirate", as = "captain" }]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// Supported fixture file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FixtureFormat {
	/// TOML format (requires `toml` feature, enabled by default).
	#[default]
	Toml,

	/// JSON format (requires `json` feature, enabled by default).
	Json,

	/// YAML format (requires `yaml` feature).
	Yaml,
}

impl FixtureFormat {
	/// Determines the fixture format from a file extension.
	///
	/// # Example
	///
	/// ```
	/// # use factory_workers_test::fixtures::FixtureFormat;
	/// assert_eq!(FixtureFormat::from_extension("toml"), Some(FixtureFormat::Toml));
	/// assert_eq!(FixtureFormat::from_extension("yml"), Some(FixtureFormat::Yaml));
	/// assert_eq!(FixtureFormat::from_extension("rb"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"toml" => Some(Self::Toml),
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the fixture format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns the default file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Toml => "toml",
			Self::Json => "json",
			Self::Yaml => "yaml",
		}
	}

	/// Returns true if the crate was built with support for this format.
	pub fn is_enabled(&self) -> bool {
		match self {
			Self::Toml => cfg!(feature = "toml"),
			Self::Json => cfg!(feature = "json"),
			Self::Yaml => cfg!(feature = "yaml"),
		}
	}

	/// Extensions tried for a candidate stem, in order.
	///
	/// Only formats enabled at build time are listed.
	pub fn candidate_extensions() -> Vec<&'static str> {
		[
			(Self::Toml, "toml"),
			(Self::Json, "json"),
			(Self::Yaml, "yaml"),
			(Self::Yaml, "yml"),
		]
		.into_iter()
		.filter(|(format, _)| format.is_enabled())
		.map(|(_, ext)| ext)
		.collect()
	}
}

/// Parsed content of one fixture file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FixtureDocument {
	/// Factory name to raw attribute values.
	#[serde(default)]
	pub factories: BTreeMap<String, BTreeMap<String, Value>>,

	/// Worker name to declarative worker.
	#[serde(default)]
	pub workers: BTreeMap<String, WorkerSpec>,
}

impl FixtureDocument {
	/// Returns true if the document declares nothing.
	pub fn is_empty(&self) -> bool {
		self.factories.is_empty() && self.workers.is_empty()
	}
}

/// Declarative worker as written in a fixture file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorkerSpec {
	/// Workers that run first.
	#[serde(default)]
	pub depends_on: Vec<String>,

	/// Instances to build, in order.
	#[serde(default)]
	pub create: Vec<StepSpec>,
}

/// One instance a declarative worker builds.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
	/// Factory to build.
	pub factory: String,

	/// Key the instance is remembered under. Defaults to the factory name.
	#[serde(default, rename = "as")]
	pub alias: Option<String>,

	/// Attribute overrides.
	#[serde(default)]
	pub overrides: BTreeMap<String, Value>,
}
