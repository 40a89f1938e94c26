//! Factory registry.
//!
//! A [`FactoryRegistry`] is an explicit value owned by the test harness. It is
//! filled once while the suite is being set up and only read afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::definition::FactoryDefinition;
use super::value::Attributes;
use crate::error::{FactoryError, FactoryResult};

/// How a registry treats a second registration under an existing name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
	/// The later registration replaces the earlier one.
	#[default]
	LastWriteWins,
	/// The later registration fails with a duplicate error.
	Reject,
}

/// Registry of factory definitions keyed by name.
///
/// # Example
///
/// ```
/// use factory_workers_core::{attributes, factory::FactoryRegistry};
///
/// let mut registry = FactoryRegistry::new();
/// registry.register("monkey", attributes! { "name" => "George" }).unwrap();
///
/// let monkey = registry.build("monkey").unwrap();
/// assert_eq!(monkey.str("name"), Some("George"));
/// ```
#[derive(Debug, Default)]
pub struct FactoryRegistry {
	definitions: HashMap<String, Arc<FactoryDefinition>>,
	policy: DuplicatePolicy,
	counters: Mutex<HashMap<(String, String), u64>>,
}

impl FactoryRegistry {
	/// Creates an empty registry where the last registration wins.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty registry with the given duplicate policy.
	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			policy,
			..Self::default()
		}
	}

	/// Duplicate policy of this registry.
	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Registers a factory.
	///
	/// Attribute values are stored as given; nothing is evaluated or checked
	/// until the factory is instantiated.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::DuplicateFactory`] if the name is taken and the
	/// registry uses [`DuplicatePolicy::Reject`].
	pub fn register(&mut self, name: impl Into<String>, attributes: Attributes) -> FactoryResult<()> {
		self.define(FactoryDefinition::with_attributes(name, attributes))
	}

	/// Registers a prepared definition.
	pub fn define(&mut self, definition: FactoryDefinition) -> FactoryResult<()> {
		let name = definition.name().to_string();
		if self.definitions.contains_key(&name) {
			match self.policy {
				DuplicatePolicy::Reject => return Err(FactoryError::DuplicateFactory(name)),
				DuplicatePolicy::LastWriteWins => {
					tracing::warn!(factory = %name, "Factory redefined, replacing previous definition");
				}
			}
		}
		tracing::debug!(factory = %name, "Registered factory");
		self.definitions.insert(name, Arc::new(definition));
		Ok(())
	}

	/// Moves every definition of `other` into this registry, applying this
	/// registry's duplicate policy.
	///
	/// Under [`DuplicatePolicy::Reject`] a clash is detected before anything
	/// is moved, so a failed merge leaves this registry unchanged.
	pub fn merge(&mut self, other: FactoryRegistry) -> FactoryResult<()> {
		if self.policy == DuplicatePolicy::Reject {
			if let Some(name) = other.names().into_iter().find(|name| self.contains(name)) {
				return Err(FactoryError::DuplicateFactory(name));
			}
		}
		let mut incoming: Vec<_> = other.definitions.into_iter().collect();
		incoming.sort_by(|a, b| a.0.cmp(&b.0));
		for (_, definition) in incoming {
			let definition = Arc::try_unwrap(definition).unwrap_or_else(|shared| (*shared).clone());
			self.define(definition)?;
		}
		Ok(())
	}

	/// Gets a definition by name.
	pub fn get(&self, name: &str) -> Option<&FactoryDefinition> {
		self.definitions.get(name).map(Arc::as_ref)
	}

	/// Checks if a factory is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.definitions.contains_key(name)
	}

	/// Returns all registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.definitions.keys().cloned().collect();
		names.sort();
		names
	}

	/// Returns the number of registered factories.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Returns true if no factories are registered.
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Advances and returns the `$COUNT` counter of an attribute. Starts at 1.
	pub(crate) fn next_count(&self, factory: &str, attribute: &str) -> u64 {
		let mut counters = self.counters.lock();
		let counter = counters
			.entry((factory.to_string(), attribute.to_string()))
			.or_insert(0);
		*counter += 1;
		*counter
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attributes;
	use crate::factory::AttributeValue;
	use rstest::rstest;

	#[rstest]
	fn test_register_and_get() {
		// Arrange
		let mut registry = FactoryRegistry::new();

		// Act
		registry
			.register("monkey", attributes! { "name" => "George" })
			.unwrap();

		// Assert
		assert!(registry.contains("monkey"));
		assert!(!registry.contains("pirate"));
		let definition = registry.get("monkey").unwrap();
		assert_eq!(definition.name(), "monkey");
		assert!(definition.get("name").is_some());
	}

	#[rstest]
	fn test_registration_does_not_validate_associations() {
		let mut registry = FactoryRegistry::new();

		let result = registry.register(
			"pirate",
			attributes! { "monkey" => AttributeValue::belongs_to("missing") },
		);

		assert!(result.is_ok());
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_last_write_wins_by_default() {
		// Arrange
		let mut registry = FactoryRegistry::new();
		registry
			.register("monkey", attributes! { "name" => "George" })
			.unwrap();

		// Act
		registry
			.register("monkey", attributes! { "name" => "Bubbles" })
			.unwrap();

		// Assert
		assert_eq!(registry.len(), 1);
		let Some(AttributeValue::Literal(name)) = registry.get("monkey").unwrap().get("name") else {
			panic!("expected literal");
		};
		assert_eq!(name, "Bubbles");
	}

	#[rstest]
	fn test_reject_policy_refuses_duplicates() {
		// Arrange
		let mut registry = FactoryRegistry::with_policy(DuplicatePolicy::Reject);
		registry
			.register("monkey", attributes! { "name" => "George" })
			.unwrap();

		// Act
		let result = registry.register("monkey", attributes! { "name" => "Bubbles" });

		// Assert
		assert!(matches!(result, Err(FactoryError::DuplicateFactory(ref n)) if n == "monkey"));
		let Some(AttributeValue::Literal(name)) = registry.get("monkey").unwrap().get("name") else {
			panic!("expected literal");
		};
		assert_eq!(name, "George");
	}

	#[rstest]
	fn test_names_are_sorted() {
		let mut registry = FactoryRegistry::new();
		registry.register("pirate", Attributes::new()).unwrap();
		registry.register("monkey", Attributes::new()).unwrap();
		registry.register("parrot", Attributes::new()).unwrap();

		assert_eq!(registry.names(), vec!["monkey", "parrot", "pirate"]);
	}

	#[rstest]
	fn test_merge_applies_policy() {
		// Arrange
		let mut base = FactoryRegistry::with_policy(DuplicatePolicy::Reject);
		base.register("monkey", Attributes::new()).unwrap();
		let mut other = FactoryRegistry::new();
		other.register("pirate", Attributes::new()).unwrap();
		let mut clashing = FactoryRegistry::new();
		clashing.register("monkey", Attributes::new()).unwrap();
		clashing.register("parrot", Attributes::new()).unwrap();

		// Act
		base.merge(other).unwrap();
		let result = base.merge(clashing);

		// Assert
		assert!(matches!(result, Err(FactoryError::DuplicateFactory(ref n)) if n == "monkey"));
		assert_eq!(base.names(), vec!["monkey", "pirate"]);
	}

	#[rstest]
	fn test_counters_are_per_attribute() {
		let registry = FactoryRegistry::new();

		assert_eq!(registry.next_count("pirate", "login"), 1);
		assert_eq!(registry.next_count("pirate", "login"), 2);
		assert_eq!(registry.next_count("pirate", "email"), 1);
		assert_eq!(registry.next_count("monkey", "login"), 1);
	}

	#[rstest]
	fn test_empty_registry() {
		let registry = FactoryRegistry::new();
		assert!(registry.is_empty());
		assert_eq!(registry.len(), 0);
		assert_eq!(registry.policy(), DuplicatePolicy::LastWriteWins);
	}
}
