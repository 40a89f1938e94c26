//! Worker definitions.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::context::WorkerScope;
use crate::error::FactoryResult;
use crate::factory::{FieldValue, Overrides};

/// Body of a code-defined worker.
pub type WorkerFn = Arc<
	dyn for<'s, 'w> Fn(&'s mut WorkerScope<'w>) -> BoxFuture<'s, FactoryResult<()>> + Send + Sync,
>;

/// What a worker does once its dependencies have run.
#[derive(Clone)]
pub enum WorkerAction {
	/// Runs a closure.
	Run(WorkerFn),
	/// Creates each step's factory in order.
	Steps(Vec<WorkerStep>),
}

impl fmt::Debug for WorkerAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Run(_) => f.write_str("Run(<fn>)"),
			Self::Steps(steps) => f.debug_tuple("Steps").field(steps).finish(),
		}
	}
}

/// One declarative worker step: create a factory and remember the instance.
#[derive(Debug, Clone)]
pub struct WorkerStep {
	factory: String,
	alias: Option<String>,
	overrides: Overrides,
}

impl WorkerStep {
	/// Creates `factory`, remembered under the factory name.
	pub fn new(factory: impl Into<String>) -> Self {
		Self {
			factory: factory.into(),
			alias: None,
			overrides: Overrides::new(),
		}
	}

	/// Remembers the instance under `alias` instead of the factory name.
	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = Some(alias.into());
		self
	}

	/// Overrides one attribute.
	pub fn with(mut self, attribute: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		self.overrides.insert(attribute.into(), value.into());
		self
	}

	/// Replaces all overrides.
	pub fn with_overrides(mut self, overrides: Overrides) -> Self {
		self.overrides = overrides;
		self
	}

	/// Factory to create.
	pub fn factory(&self) -> &str {
		&self.factory
	}

	/// Key the created instance is remembered under.
	pub fn key(&self) -> &str {
		self.alias.as_deref().unwrap_or(&self.factory)
	}

	/// Attribute overrides.
	pub fn overrides(&self) -> &Overrides {
		&self.overrides
	}
}

/// A named, reusable setup routine.
///
/// # Example
///
/// ```
/// use factory_workers_core::worker::{WorkerDefinition, WorkerStep};
///
/// let crew = WorkerDefinition::steps(
///     "crew",
///     vec![WorkerStep::new("pirate").alias("captain"), WorkerStep::new("pirate").alias("mate")],
/// )
/// .depends_on("ship");
///
/// assert_eq!(crew.dependencies(), ["ship"]);
/// ```
#[derive(Debug, Clone)]
pub struct WorkerDefinition {
	name: String,
	depends_on: Vec<String>,
	action: WorkerAction,
}

impl WorkerDefinition {
	/// Creates a worker running `body`.
	///
	/// ```
	/// use factory_workers_core::FactoryError;
	/// use factory_workers_core::worker::WorkerDefinition;
	///
	/// let ship = WorkerDefinition::new("ship", |scope| {
	///     Box::pin(async move {
	///         let monkey = scope.create("monkey").await?;
	///         scope.remember("lookout", monkey);
	///         Ok::<_, FactoryError>(())
	///     })
	/// });
	/// assert_eq!(ship.name(), "ship");
	/// ```
	pub fn new<F>(name: impl Into<String>, body: F) -> Self
	where
		F: for<'s, 'w> Fn(&'s mut WorkerScope<'w>) -> BoxFuture<'s, FactoryResult<()>>
			+ Send
			+ Sync
			+ 'static,
	{
		Self {
			name: name.into(),
			depends_on: Vec::new(),
			action: WorkerAction::Run(Arc::new(body)),
		}
	}

	/// Creates a declarative worker.
	pub fn steps(name: impl Into<String>, steps: Vec<WorkerStep>) -> Self {
		Self {
			name: name.into(),
			depends_on: Vec::new(),
			action: WorkerAction::Steps(steps),
		}
	}

	/// Adds a dependency that runs before this worker.
	pub fn depends_on(mut self, worker: impl Into<String>) -> Self {
		self.depends_on.push(worker.into());
		self
	}

	/// Worker name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Dependencies in declaration order.
	pub fn dependencies(&self) -> &[String] {
		&self.depends_on
	}

	/// Worker action.
	pub fn action(&self) -> &WorkerAction {
		&self.action
	}
}
