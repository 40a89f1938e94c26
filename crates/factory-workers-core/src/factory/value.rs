//! Attribute values of factory definitions.
//!
//! Every attribute of a factory definition holds an [`AttributeValue`]. Only
//! [`AttributeValue::Literal`] is fixed at registration time; every other
//! variant is evaluated again each time the factory is instantiated.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use fake::Fake;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use serde_json::Value;

use super::template;

/// Attribute map of a factory definition, keyed by attribute name.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Zero-argument computation evaluated at instantiation time.
pub type DeferredFn = Arc<dyn Fn() -> Result<Value, String> + Send + Sync>;

/// How a single factory attribute gets its value.
#[derive(Clone)]
pub enum AttributeValue {
	/// Used as-is for every instance.
	Literal(Value),

	/// Name of another factory. Instantiated recursively and stored as a
	/// nested instance (belongs-to).
	Association(String),

	/// Computed fresh for every instance, never cached.
	Deferred(DeferredFn),

	/// String with `$UNIQ(n)` and `$COUNT` placeholders.
	Template(String),

	/// Fake data generated for every instance.
	Faker(FakerType),
}

impl AttributeValue {
	/// Creates a literal value.
	pub fn literal(value: impl Into<Value>) -> Self {
		Self::Literal(value.into())
	}

	/// Creates an association to the named factory.
	pub fn association(factory: impl Into<String>) -> Self {
		Self::Association(factory.into())
	}

	/// Alias of [`AttributeValue::association`].
	pub fn belongs_to(factory: impl Into<String>) -> Self {
		Self::association(factory)
	}

	/// Creates a deferred value from an infallible computation.
	///
	/// # Example
	///
	/// ```
	/// use factory_workers_core::factory::{generators, AttributeValue};
	///
	/// let created_on = AttributeValue::deferred(|| generators::days_ago(1));
	/// assert!(created_on.is_deferred());
	/// ```
	pub fn deferred<F, T>(compute: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Into<Value>,
	{
		Self::Deferred(Arc::new(move || Ok(compute().into())))
	}

	/// Creates a deferred value from a computation that may fail.
	///
	/// The failure is reported as [`FactoryError::Deferred`](crate::FactoryError::Deferred)
	/// when the factory is instantiated.
	pub fn try_deferred<F, T, E>(compute: F) -> Self
	where
		F: Fn() -> Result<T, E> + Send + Sync + 'static,
		T: Into<Value>,
		E: fmt::Display,
	{
		Self::Deferred(Arc::new(move || {
			compute().map(Into::into).map_err(|e| e.to_string())
		}))
	}

	/// Creates a template value.
	pub fn template(template: impl Into<String>) -> Self {
		Self::Template(template.into())
	}

	/// Creates a fake data value.
	pub fn faker(kind: FakerType) -> Self {
		Self::Faker(kind)
	}

	/// Converts a string, treating it as a template when it contains
	/// placeholders.
	pub fn from_string(value: impl Into<String>) -> Self {
		let value = value.into();
		if template::has_placeholders(&value) {
			Self::Template(value)
		} else {
			Self::Literal(Value::String(value))
		}
	}

	/// Returns true for values evaluated at each instantiation.
	pub fn is_deferred(&self) -> bool {
		!matches!(self, Self::Literal(_) | Self::Association(_))
	}

	/// Returns the associated factory name, if this is an association.
	pub fn association_target(&self) -> Option<&str> {
		match self {
			Self::Association(name) => Some(name),
			_ => None,
		}
	}
}

impl fmt::Debug for AttributeValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Association(name) => f.debug_tuple("Association").field(name).finish(),
			Self::Deferred(_) => f.write_str("Deferred(<fn>)"),
			Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
			Self::Faker(kind) => f.debug_tuple("Faker").field(kind).finish(),
		}
	}
}

impl From<Value> for AttributeValue {
	fn from(value: Value) -> Self {
		match value {
			Value::String(s) => Self::from_string(s),
			other => Self::Literal(other),
		}
	}
}

impl From<&str> for AttributeValue {
	fn from(value: &str) -> Self {
		Self::from_string(value)
	}
}

impl From<String> for AttributeValue {
	fn from(value: String) -> Self {
		Self::from_string(value)
	}
}

impl From<FakerType> for AttributeValue {
	fn from(kind: FakerType) -> Self {
		Self::Faker(kind)
	}
}

macro_rules! literal_from {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for AttributeValue {
				fn from(value: $ty) -> Self {
					Self::Literal(Value::from(value))
				}
			}
		)*
	};
}

literal_from!(bool, i32, i64, u32, u64, f64);

/// Kinds of fake data a [`AttributeValue::Faker`] attribute can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakerType {
	/// Full name.
	Name,
	/// First name.
	FirstName,
	/// Last name.
	LastName,
	/// Email address on a reserved domain.
	Email,
	/// Username.
	Username,
	/// Single lorem word.
	Word,
	/// Lorem sentence of 3 to 8 words.
	Sentence,
	/// Phone number.
	PhoneNumber,
}

impl FakerType {
	/// Parses a faker name as used in fixture files.
	pub fn parse(name: &str) -> Option<Self> {
		let kind = match name {
			"name" => Self::Name,
			"first_name" => Self::FirstName,
			"last_name" => Self::LastName,
			"email" => Self::Email,
			"username" => Self::Username,
			"word" => Self::Word,
			"sentence" => Self::Sentence,
			"phone_number" => Self::PhoneNumber,
			_ => return None,
		};
		Some(kind)
	}

	/// Generates a new value.
	pub fn generate(&self) -> Value {
		let generated: String = match self {
			Self::Name => Name().fake(),
			Self::FirstName => FirstName().fake(),
			Self::LastName => LastName().fake(),
			Self::Email => SafeEmail().fake(),
			Self::Username => Username().fake(),
			Self::Word => Word().fake(),
			Self::Sentence => Sentence(3..8).fake(),
			Self::PhoneNumber => PhoneNumber().fake(),
		};
		Value::String(generated)
	}
}
