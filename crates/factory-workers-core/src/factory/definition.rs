//! Factory definitions.

use serde_json::Value;

use super::value::{AttributeValue, Attributes};

/// A named fixture template.
///
/// # Example
///
/// ```
/// use factory_workers_core::factory::{generators, FactoryDefinition};
///
/// let pirate = FactoryDefinition::new("pirate")
///     .attr("catchphrase", "Ahhrrrr, Matey!")
///     .belongs_to("monkey", "monkey")
///     .deferred("created_on", || generators::days_ago(1));
///
/// assert_eq!(pirate.associations().collect::<Vec<_>>(), vec!["monkey"]);
/// ```
#[derive(Debug, Clone)]
pub struct FactoryDefinition {
	name: String,
	attributes: Attributes,
}

impl FactoryDefinition {
	/// Creates a definition without attributes.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			attributes: Attributes::new(),
		}
	}

	/// Creates a definition from an attribute map.
	pub fn with_attributes(name: impl Into<String>, attributes: Attributes) -> Self {
		Self {
			name: name.into(),
			attributes,
		}
	}

	/// Adds or replaces an attribute.
	pub fn attr(mut self, attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
		self.attributes.insert(attribute.into(), value.into());
		self
	}

	/// Adds an association attribute.
	pub fn belongs_to(self, attribute: impl Into<String>, factory: impl Into<String>) -> Self {
		self.attr(attribute, AttributeValue::association(factory))
	}

	/// Adds a deferred attribute.
	pub fn deferred<F, T>(self, attribute: impl Into<String>, compute: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Value>,
	{
		self.attr(attribute, AttributeValue::deferred(compute))
	}

	/// Factory name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared attributes.
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Returns one declared attribute.
	pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
		self.attributes.get(attribute)
	}

	/// Names of the factories this definition associates with.
	pub fn associations(&self) -> impl Iterator<Item = &str> {
		self.attributes
			.values()
			.filter_map(AttributeValue::association_target)
	}
}
