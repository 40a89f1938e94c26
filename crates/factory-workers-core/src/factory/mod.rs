//! Fixture factories.
//!
//! - [`AttributeValue`] - literal, association, deferred, template or faker value
//! - [`FactoryDefinition`] - named attribute map
//! - [`FactoryRegistry`] - registration and instantiation
//! - [`Instance`] - the instantiated entity

mod build;
mod definition;
pub mod generators;
mod instance;
mod registry;
pub mod template;
mod value;

pub use build::Overrides;
pub use definition::FactoryDefinition;
pub use instance::{FieldValue, Fields, Instance};
pub use registry::{DuplicatePolicy, FactoryRegistry};
pub use value::{AttributeValue, Attributes, DeferredFn, FakerType};

/// Builds an [`Attributes`] map.
///
/// Keys are anything convertible into `String`; values anything convertible
/// into [`AttributeValue`].
///
/// # Example
///
/// ```
/// use factory_workers_core::attributes;
/// use factory_workers_core::factory::{generators, AttributeValue};
///
/// let pirate = attributes! {
///     "catchphrase" => "Ahhrrrr, Matey!",
///     "monkey" => AttributeValue::belongs_to("monkey"),
///     "created_on" => AttributeValue::deferred(|| generators::days_ago(1)),
/// };
/// assert_eq!(pirate.len(), 3);
/// ```
#[macro_export]
macro_rules! attributes {
	() => {
		$crate::factory::Attributes::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut attributes = $crate::factory::Attributes::new();
		$(
			attributes.insert(
				::std::string::String::from($key),
				$crate::factory::AttributeValue::from($value),
			);
		)+
		attributes
	}};
}
