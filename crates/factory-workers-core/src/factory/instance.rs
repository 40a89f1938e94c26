//! Instantiated fixtures.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Evaluated attribute map of an instance.
pub type Fields = BTreeMap<String, FieldValue>;

/// Evaluated value of an instance attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	/// Plain value.
	Value(Value),
	/// Associated instance created for this one.
	Instance(Box<Instance>),
}

impl FieldValue {
	/// Returns the plain value, if any.
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Value(value) => Some(value),
			Self::Instance(_) => None,
		}
	}

	/// Returns the associated instance, if any.
	pub fn as_instance(&self) -> Option<&Instance> {
		match self {
			Self::Instance(instance) => Some(instance),
			Self::Value(_) => None,
		}
	}

	/// Converts to JSON, nesting associated instances as objects.
	pub fn to_json(&self) -> Value {
		match self {
			Self::Value(value) => value.clone(),
			Self::Instance(instance) => instance.to_json(),
		}
	}
}

impl From<Value> for FieldValue {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

impl From<Instance> for FieldValue {
	fn from(instance: Instance) -> Self {
		Self::Instance(Box::new(instance))
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Value(Value::String(value.to_string()))
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Value(Value::String(value))
	}
}

/// An entity produced from a factory definition.
///
/// Built instances carry no id; instances returned by a
/// [`FixtureStore`](crate::store::FixtureStore) do.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
	factory: String,
	id: Option<u64>,
	fields: Fields,
}

impl Instance {
	/// Creates an unsaved instance.
	pub fn new(factory: impl Into<String>, fields: Fields) -> Self {
		Self {
			factory: factory.into(),
			id: None,
			fields,
		}
	}

	/// Name of the factory this instance was built from.
	pub fn factory(&self) -> &str {
		&self.factory
	}

	/// Store id, once persisted.
	pub fn id(&self) -> Option<u64> {
		self.id
	}

	/// Sets the store id.
	pub fn set_id(&mut self, id: u64) {
		self.id = Some(id);
	}

	/// Returns true once a store has assigned an id.
	pub fn is_persisted(&self) -> bool {
		self.id.is_some()
	}

	/// Returns an attribute.
	pub fn get(&self, attribute: &str) -> Option<&FieldValue> {
		self.fields.get(attribute)
	}

	/// Returns a plain attribute value.
	pub fn value(&self, attribute: &str) -> Option<&Value> {
		self.get(attribute).and_then(FieldValue::as_value)
	}

	/// Returns a string attribute.
	pub fn str(&self, attribute: &str) -> Option<&str> {
		self.value(attribute).and_then(Value::as_str)
	}

	/// Returns an associated instance.
	pub fn association(&self, attribute: &str) -> Option<&Instance> {
		self.get(attribute).and_then(FieldValue::as_instance)
	}

	/// All attributes.
	pub fn fields(&self) -> &Fields {
		&self.fields
	}

	/// Mutable access to all attributes.
	pub fn fields_mut(&mut self) -> &mut Fields {
		&mut self.fields
	}

	/// Consumes the instance, returning its attributes.
	pub fn into_fields(self) -> Fields {
		self.fields
	}

	/// Converts to a JSON object.
	///
	/// Once saved, the store id is written under `"id"`, replacing any field
	/// of that name.
	pub fn to_json(&self) -> Value {
		let mut object = Map::new();
		for (name, field) in &self.fields {
			object.insert(name.clone(), field.to_json());
		}
		if let Some(id) = self.id {
			object.insert("id".to_string(), Value::from(id));
		}
		Value::Object(object)
	}
}

impl Serialize for Instance {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_json().serialize(serializer)
	}
}
