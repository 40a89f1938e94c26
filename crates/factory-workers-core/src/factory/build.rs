//! In-memory instantiation of factories.

use super::instance::{FieldValue, Fields, Instance};
use super::registry::FactoryRegistry;
use super::template;
use super::value::AttributeValue;
use crate::error::{FactoryError, FactoryResult};

/// Attribute values that replace a definition's attributes for one call.
pub type Overrides = Fields;

impl FactoryRegistry {
	/// Builds an instance of the named factory.
	///
	/// Deferred, template and faker attributes are evaluated for this call
	/// only. Associations are built recursively.
	///
	/// # Errors
	///
	/// Fails if the factory or an associated factory is unknown, if
	/// associations form a cycle, or if a deferred attribute fails.
	pub fn build(&self, name: &str) -> FactoryResult<Instance> {
		self.build_with(name, Overrides::new())
	}

	/// Builds an instance, using `overrides` in place of the matching
	/// definition attributes.
	///
	/// An overridden attribute is not evaluated at all, so no association is
	/// built for it. Overrides naming attributes the definition lacks are
	/// added to the instance.
	pub fn build_with(&self, name: &str, overrides: Overrides) -> FactoryResult<Instance> {
		let mut path = Vec::new();
		self.instantiate(name, overrides, &mut path)
	}

	/// Returns the evaluated attributes the factory would build with.
	pub fn attributes_for(&self, name: &str, overrides: Overrides) -> FactoryResult<Fields> {
		self.build_with(name, overrides).map(Instance::into_fields)
	}

	fn instantiate(
		&self,
		name: &str,
		mut overrides: Overrides,
		path: &mut Vec<String>,
	) -> FactoryResult<Instance> {
		if path.iter().any(|seen| seen == name) {
			let mut cycle = path.clone();
			cycle.push(name.to_string());
			return Err(FactoryError::CircularAssociation { path: cycle });
		}

		let definition = self
			.get(name)
			.ok_or_else(|| FactoryError::UnknownFactory(name.to_string()))?;

		path.push(name.to_string());
		let mut fields = Fields::new();
		for (attribute, spec) in definition.attributes() {
			let value = match overrides.remove(attribute) {
				Some(value) => value,
				None => self.evaluate(name, attribute, spec, path)?,
			};
			fields.insert(attribute.clone(), value);
		}
		fields.extend(overrides);
		path.pop();

		tracing::trace!(factory = name, "Built fixture");
		Ok(Instance::new(name, fields))
	}

	fn evaluate(
		&self,
		factory: &str,
		attribute: &str,
		spec: &AttributeValue,
		path: &mut Vec<String>,
	) -> FactoryResult<FieldValue> {
		let value = match spec {
			AttributeValue::Literal(value) => FieldValue::Value(value.clone()),
			AttributeValue::Association(target) => {
				FieldValue::from(self.instantiate(target, Overrides::new(), path)?)
			}
			AttributeValue::Deferred(compute) => {
				let value = compute().map_err(|message| FactoryError::Deferred {
					factory: factory.to_string(),
					attribute: attribute.to_string(),
					message,
				})?;
				FieldValue::Value(value)
			}
			AttributeValue::Template(raw) => {
				let count = self.next_count(factory, attribute);
				FieldValue::from(template::expand(raw, count)?)
			}
			AttributeValue::Faker(kind) => FieldValue::Value(kind.generate()),
		};
		Ok(value)
	}
}
