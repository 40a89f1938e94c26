//! Error types for the factory registry.
//!
//! Registration never validates attribute values, so most of these errors
//! surface only when a fixture is instantiated.

use thiserror::Error;

/// Errors that can occur while registering or instantiating fixtures.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// No factory is registered under the requested name.
	#[error("Unknown factory: {0}")]
	UnknownFactory(String),

	/// A factory with the same name is already registered and the registry
	/// rejects duplicates.
	#[error("Duplicate factory: {0}")]
	DuplicateFactory(String),

	/// Association attributes form a cycle.
	#[error("Circular association: {}", path.join(" -> "))]
	CircularAssociation {
		/// Factory names from the outermost instantiation to the repeated one.
		path: Vec<String>,
	},

	/// A deferred attribute failed to produce a value.
	#[error("Deferred attribute {factory}.{attribute} failed: {message}")]
	Deferred {
		/// Factory being instantiated.
		factory: String,
		/// Attribute whose computation failed.
		attribute: String,
		/// Failure reported by the computation.
		message: String,
	},

	/// A `$UNIQ(n)` or `$COUNT` template could not be expanded.
	#[error("Invalid template {template:?}: {message}")]
	InvalidTemplate {
		/// The offending template string.
		template: String,
		/// What is wrong with it.
		message: String,
	},

	/// No worker is registered under the requested name.
	#[error("Unknown worker: {0}")]
	UnknownWorker(String),

	/// A worker with the same name is already registered and the registry
	/// rejects duplicates.
	#[error("Duplicate worker: {0}")]
	DuplicateWorker(String),

	/// Worker dependencies form a cycle.
	#[error("Circular worker dependency: {}", path.join(" -> "))]
	CircularWorker {
		/// Worker names from the requested worker to the repeated one.
		path: Vec<String>,
	},

	/// A worker body returned an error.
	#[error("Worker {worker} failed: {message}")]
	Worker {
		/// Worker that failed.
		worker: String,
		/// Failure message.
		message: String,
	},

	/// Persisting an instance failed.
	#[error("Store error: {0}")]
	Store(String),

	/// JSON conversion error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
