//! Convenience re-exports for common usage.
//!
//! ```
//! use factory_workers_core::prelude::*;
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register("monkey", attributes! { "name" => "George" }).unwrap();
//! ```

// Error types
pub use crate::error::{FactoryError, FactoryResult};

// Factory types
pub use crate::factory::{
	AttributeValue, Attributes, DuplicatePolicy, FactoryDefinition, FactoryRegistry, FakerType,
	FieldValue, Fields, Instance, Overrides, generators,
};

// Store types
pub use crate::store::{FixtureStore, InMemoryStore};

// Worker types
pub use crate::worker::{WorkerContext, WorkerDefinition, WorkerRegistry, WorkerScope, WorkerStep};

pub use crate::attributes;
