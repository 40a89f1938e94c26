//! Fixture file parsing.
//!
//! This module turns fixture files into factory and worker definitions.
//!
//! # Attribute encoding
//!
//! | Written value | Attribute |
//! |---------------|-----------|
//! | `{ belongs_to = "monkey" }` | association |
//! | `{ deferred = "now" }` | current time |
//! | `{ deferred = "days_ago", days = 1 }` | time `days` days ago |
//! | `{ deferred = "hours_ago", hours = 2 }` | time `hours` hours ago |
//! | `{ deferred = "uuid" }` | random UUID |
//! | `{ faker = "email" }` | fake data |
//! | `{ literal = ... }` | the inner value, verbatim |
//! | string with `$UNIQ(n)` / `$COUNT` | template |
//! | anything else | literal |

use std::path::{Path, PathBuf};

use factory_workers_core::factory::{
	AttributeValue, Attributes, FactoryDefinition, FakerType, FieldValue, Overrides, generators,
};
use factory_workers_core::worker::{WorkerDefinition, WorkerStep};
use serde_json::{Map, Value};

use super::format::{FixtureDocument, FixtureFormat, WorkerSpec};
use crate::error::{BootstrapError, BootstrapResult};

/// Definitions declared by one fixture file.
#[derive(Debug, Default)]
pub struct ParsedFixtures {
	/// File the definitions came from.
	pub source: Option<PathBuf>,
	/// Factory definitions.
	pub factories: Vec<FactoryDefinition>,
	/// Declarative workers.
	pub workers: Vec<WorkerDefinition>,
}

/// Parser for fixture files.
#[derive(Debug, Default)]
pub struct FixtureParser;

impl FixtureParser {
	/// Creates a new fixture parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses a fixture file, detecting the format from its extension.
	///
	/// # Errors
	///
	/// Returns an error if the extension is not recognized or not enabled,
	/// the file cannot be read, or its content is malformed.
	pub fn parse_file(&self, path: &Path) -> BootstrapResult<ParsedFixtures> {
		let format = FixtureFormat::from_path(path).ok_or_else(|| {
			BootstrapError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|source| BootstrapError::Io {
			path: path.to_path_buf(),
			source,
		})?;

		let mut parsed = self.parse_str(&content, format, path)?;
		parsed.source = Some(path.to_path_buf());
		Ok(parsed)
	}

	/// Parses fixture content. `origin` names the content in errors.
	pub fn parse_str(
		&self,
		content: &str,
		format: FixtureFormat,
		origin: &Path,
	) -> BootstrapResult<ParsedFixtures> {
		let document = self.parse_document(content, format, origin)?;
		self.convert(document, origin)
	}

	/// Parses fixture content into its raw document.
	pub fn parse_document(
		&self,
		content: &str,
		format: FixtureFormat,
		origin: &Path,
	) -> BootstrapResult<FixtureDocument> {
		if !format.is_enabled() {
			return Err(BootstrapError::UnsupportedExtension(format!(
				"{} (format not enabled)",
				format.extension()
			)));
		}

		match format {
			FixtureFormat::Json => self.parse_json(content, origin),
			FixtureFormat::Toml => self.parse_toml(content, origin),
			FixtureFormat::Yaml => self.parse_yaml(content, origin),
		}
	}

	fn parse_json(&self, content: &str, origin: &Path) -> BootstrapResult<FixtureDocument> {
		serde_json::from_str(content).map_err(|e| BootstrapError::parse(origin, e))
	}

	#[cfg(feature = "toml")]
	fn parse_toml(&self, content: &str, origin: &Path) -> BootstrapResult<FixtureDocument> {
		toml::from_str(content).map_err(|e| BootstrapError::parse(origin, e))
	}

	#[cfg(not(feature = "toml"))]
	fn parse_toml(&self, _content: &str, _origin: &Path) -> BootstrapResult<FixtureDocument> {
		Err(BootstrapError::UnsupportedExtension(
			"toml (enable the `toml` feature)".to_string(),
		))
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str, origin: &Path) -> BootstrapResult<FixtureDocument> {
		serde_yaml::from_str(content).map_err(|e| BootstrapError::parse(origin, e))
	}

	/// Stub for YAML parsing when the feature is not enabled.
	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str, _origin: &Path) -> BootstrapResult<FixtureDocument> {
		Err(BootstrapError::UnsupportedExtension(
			"yaml (enable the `yaml` feature)".to_string(),
		))
	}

	fn convert(&self, document: FixtureDocument, origin: &Path) -> BootstrapResult<ParsedFixtures> {
		let mut parsed = ParsedFixtures::default();

		for (name, raw_attributes) in document.factories {
			let mut attributes = Attributes::new();
			for (attribute, raw) in raw_attributes {
				let value = decode_attribute(raw).map_err(|message| {
					BootstrapError::parse(origin, format!("factories.{name}.{attribute}: {message}"))
				})?;
				attributes.insert(attribute, value);
			}
			parsed
				.factories
				.push(FactoryDefinition::with_attributes(name, attributes));
		}

		for (name, spec) in document.workers {
			parsed.workers.push(worker_from_spec(name, spec));
		}

		Ok(parsed)
	}
}

fn worker_from_spec(name: String, spec: WorkerSpec) -> WorkerDefinition {
	let steps = spec
		.create
		.into_iter()
		.map(|step| {
			let overrides: Overrides = step
				.overrides
				.into_iter()
				.map(|(attribute, value)| (attribute, FieldValue::Value(value)))
				.collect();
			let built = WorkerStep::new(step.factory).with_overrides(overrides);
			match step.alias {
				Some(alias) => built.alias(alias),
				None => built,
			}
		})
		.collect();

	spec.depends_on
		.into_iter()
		.fold(WorkerDefinition::steps(name, steps), WorkerDefinition::depends_on)
}

/// Decodes one written attribute value.
pub fn decode_attribute(raw: Value) -> Result<AttributeValue, String> {
	let object = match raw {
		Value::Object(object) => object,
		other => return Ok(AttributeValue::from(other)),
	};

	if object.contains_key("belongs_to") {
		expect_keys(&object, &["belongs_to"])?;
		return match &object["belongs_to"] {
			Value::String(factory) => Ok(AttributeValue::association(factory.clone())),
			other => Err(format!("belongs_to must be a factory name, got {other}")),
		};
	}

	if object.contains_key("deferred") {
		return decode_deferred(&object);
	}

	if object.contains_key("faker") {
		expect_keys(&object, &["faker"])?;
		let kind = object["faker"]
			.as_str()
			.and_then(FakerType::parse)
			.ok_or_else(|| format!("unknown faker {}", object["faker"]))?;
		return Ok(AttributeValue::faker(kind));
	}

	if object.contains_key("literal") {
		expect_keys(&object, &["literal"])?;
		let mut object = object;
		return Ok(AttributeValue::Literal(object.remove("literal").unwrap_or(Value::Null)));
	}

	Ok(AttributeValue::Literal(Value::Object(object)))
}

fn decode_deferred(object: &Map<String, Value>) -> Result<AttributeValue, String> {
	let kind = object["deferred"]
		.as_str()
		.ok_or_else(|| format!("deferred must be a generator name, got {}", object["deferred"]))?;

	let value = match kind {
		"now" => {
			expect_keys(object, &["deferred"])?;
			AttributeValue::deferred(generators::now)
		}
		"uuid" => {
			expect_keys(object, &["deferred"])?;
			AttributeValue::deferred(generators::uuid)
		}
		"days_ago" => {
			expect_keys(object, &["deferred", "days"])?;
			let days = integer(object, "days")?;
			AttributeValue::deferred(move || generators::days_ago(days))
		}
		"hours_ago" => {
			expect_keys(object, &["deferred", "hours"])?;
			let hours = integer(object, "hours")?;
			AttributeValue::deferred(move || generators::hours_ago(hours))
		}
		other => return Err(format!("unknown deferred generator {other:?}")),
	};
	Ok(value)
}

fn integer(object: &Map<String, Value>, key: &str) -> Result<i64, String> {
	match object.get(key) {
		None => Ok(1),
		Some(value) => value
			.as_i64()
			.ok_or_else(|| format!("{key} must be an integer, got {value}")),
	}
}

fn expect_keys(object: &Map<String, Value>, allowed: &[&str]) -> Result<(), String> {
	match object.keys().find(|key| !allowed.contains(&key.as_str())) {
		Some(extra) => Err(format!("unexpected key {extra:?}")),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::io::Write;
	use tempfile::NamedTempFile;

	const PIRATES_TOML: &str = r#"
[factories.monkey]
name = "George"

[factories.pirate]
catchphrase = "Ahhrrrr, Matey!"
monkey = { belongs_to = "monkey" }
created_on = { deferred = "days_ago", days = 1 }

[workers.crew]
depends_on = ["harbor"]
create = [
  { factory = "pirate", as = "captain" },
  { factory = "monkey", overrides = { name = "Bubbles" } },
]
"#;

	#[rstest]
	fn test_parse_toml_document() {
		// Act
		let parsed = FixtureParser::new()
			.parse_str(PIRATES_TOML, FixtureFormat::Toml, Path::new("<string>"))
			.unwrap();

		// Assert
		let names: Vec<_> = parsed.factories.iter().map(|d| d.name()).collect();
		assert_eq!(names, vec!["monkey", "pirate"]);
		let pirate = &parsed.factories[1];
		assert_eq!(pirate.get("monkey").unwrap().association_target(), Some("monkey"));
		assert!(pirate.get("created_on").unwrap().is_deferred());

		let crew = &parsed.workers[0];
		assert_eq!(crew.name(), "crew");
		assert_eq!(crew.dependencies(), ["harbor"]);
	}

	#[rstest]
	fn test_parse_json_file() {
		// Arrange
		let mut file = NamedTempFile::with_suffix(".json").unwrap();
		write!(file, r#"{{"factories": {{"monkey": {{"name": "George"}}}}}}"#).unwrap();

		// Act
		let parsed = FixtureParser::new().parse_file(file.path()).unwrap();

		// Assert
		assert_eq!(parsed.source.as_deref(), Some(file.path()));
		assert_eq!(parsed.factories.len(), 1);
		assert!(parsed.workers.is_empty());
	}

	#[rstest]
	fn test_malformed_file_names_path() {
		// Arrange
		let mut file = NamedTempFile::with_suffix(".toml").unwrap();
		write!(file, "[factories.monkey\nname = ").unwrap();

		// Act
		let result = FixtureParser::new().parse_file(file.path());

		// Assert
		let Err(BootstrapError::Parse { path, .. }) = result else {
			panic!("expected parse error");
		};
		assert_eq!(path, file.path());
	}

	#[rstest]
	fn test_unsupported_extension() {
		let result = FixtureParser::new().parse_file(Path::new("tests/factories.rb"));
		assert!(matches!(result, Err(BootstrapError::UnsupportedExtension(ref e)) if e == "rb"));
	}

	#[rstest]
	fn test_bad_attribute_names_location() {
		let result = FixtureParser::new().parse_str(
			r#"{"factories": {"pirate": {"ship": {"belongs_to": 7}}}}"#,
			FixtureFormat::Json,
			Path::new("tests/factories.json"),
		);

		let Err(BootstrapError::Parse { message, .. }) = result else {
			panic!("expected parse error");
		};
		assert!(message.starts_with("factories.pirate.ship:"));
	}

	#[rstest]
	#[case(json!("George"))]
	#[case(json!(42))]
	#[case(json!({ "street": "Harbor Lane" }))]
	fn test_decode_literals(#[case] raw: Value) {
		assert!(matches!(decode_attribute(raw), Ok(AttributeValue::Literal(_))));
	}

	#[rstest]
	fn test_decode_literal_escape() {
		let value = decode_attribute(json!({ "literal": { "belongs_to": "monkey" } })).unwrap();
		let AttributeValue::Literal(inner) = value else {
			panic!("expected literal");
		};
		assert_eq!(inner, json!({ "belongs_to": "monkey" }));
	}

	#[rstest]
	fn test_decode_template() {
		assert!(matches!(
			decode_attribute(json!("$UNIQ(8)@example.com")),
			Ok(AttributeValue::Template(_))
		));
	}

	#[rstest]
	#[case(json!({ "deferred": "now" }))]
	#[case(json!({ "deferred": "uuid" }))]
	#[case(json!({ "deferred": "days_ago", "days": 3 }))]
	#[case(json!({ "deferred": "days_ago" }))]
	#[case(json!({ "deferred": "hours_ago", "hours": 2 }))]
	#[case(json!({ "faker": "email" }))]
	fn test_decode_generated(#[case] raw: Value) {
		let value = decode_attribute(raw).unwrap();
		assert!(value.is_deferred());
	}

	#[rstest]
	#[case(json!({ "deferred": "yesterday" }))]
	#[case(json!({ "deferred": "days_ago", "days": "one" }))]
	#[case(json!({ "deferred": "now", "days": 1 }))]
	#[case(json!({ "faker": "shoe_size" }))]
	#[case(json!({ "belongs_to": "monkey", "extra": true }))]
	fn test_decode_rejects(#[case] raw: Value) {
		assert!(decode_attribute(raw).is_err());
	}
}
