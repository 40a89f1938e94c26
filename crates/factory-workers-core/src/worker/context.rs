//! Per-test worker state.

use std::collections::HashMap;

use crate::error::{FactoryError, FactoryResult};
use crate::factory::{FactoryRegistry, Instance, Overrides};
use crate::store::FixtureStore;

/// Tracks which workers have run and the instances they left behind.
///
/// Create one per test; a worker runs at most once per context.
#[derive(Debug, Default)]
pub struct WorkerContext {
	completed: Vec<String>,
	instances: HashMap<String, Instance>,
}

impl WorkerContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns true if the worker already ran in this context.
	pub fn has_run(&self, worker: &str) -> bool {
		self.completed.iter().any(|name| name == worker)
	}

	/// Workers in the order they completed.
	pub fn completed(&self) -> &[String] {
		&self.completed
	}

	/// Returns a remembered instance.
	pub fn instance(&self, key: &str) -> Option<&Instance> {
		self.instances.get(key)
	}

	/// Remembers an instance, replacing any previous one under `key`.
	pub fn insert(&mut self, key: impl Into<String>, instance: Instance) {
		self.instances.insert(key.into(), instance);
	}

	/// All remembered instances.
	pub fn instances(&self) -> &HashMap<String, Instance> {
		&self.instances
	}

	pub(crate) fn mark_completed(&mut self, worker: &str) {
		self.completed.push(worker.to_string());
	}
}

/// Handle passed to a running worker.
pub struct WorkerScope<'a> {
	worker: &'a str,
	factories: &'a FactoryRegistry,
	store: &'a dyn FixtureStore,
	context: &'a mut WorkerContext,
}

impl<'a> WorkerScope<'a> {
	pub(crate) fn new(
		worker: &'a str,
		factories: &'a FactoryRegistry,
		store: &'a dyn FixtureStore,
		context: &'a mut WorkerContext,
	) -> Self {
		Self {
			worker,
			factories,
			store,
			context,
		}
	}

	/// Name of the running worker.
	pub fn worker(&self) -> &str {
		self.worker
	}

	/// Factory registry.
	pub fn factories(&self) -> &FactoryRegistry {
		self.factories
	}

	/// Builds an instance.
	pub fn build(&self, factory: &str) -> FactoryResult<Instance> {
		self.factories.build(factory)
	}

	/// Builds an instance with overrides.
	pub fn build_with(&self, factory: &str, overrides: Overrides) -> FactoryResult<Instance> {
		self.factories.build_with(factory, overrides)
	}

	/// Builds and saves an instance through the run's store.
	pub async fn create(&self, factory: &str) -> FactoryResult<Instance> {
		self.factories.create(self.store, factory).await
	}

	/// Builds with overrides and saves through the run's store.
	pub async fn create_with(&self, factory: &str, overrides: Overrides) -> FactoryResult<Instance> {
		self.factories.create_with(self.store, factory, overrides).await
	}

	/// Remembers an instance for later workers and the test body.
	pub fn remember(&mut self, key: impl Into<String>, instance: Instance) {
		self.context.insert(key, instance);
	}

	/// Returns an instance remembered by this or an earlier worker.
	pub fn instance(&self, key: &str) -> Option<&Instance> {
		self.context.instance(key)
	}

	/// Creates a worker failure for this worker.
	pub fn fail(&self, message: impl Into<String>) -> FactoryError {
		FactoryError::Worker {
			worker: self.worker.to_string(),
			message: message.into(),
		}
	}
}
