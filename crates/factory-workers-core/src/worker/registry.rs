//! Worker registry and dependency-ordered execution.

use std::collections::HashMap;

use futures::future::BoxFuture;

use super::context::{WorkerContext, WorkerScope};
use super::definition::{WorkerAction, WorkerDefinition};
use crate::error::{FactoryError, FactoryResult};
use crate::factory::{DuplicatePolicy, FactoryRegistry};
use crate::store::FixtureStore;

/// Registry of workers keyed by name.
#[derive(Debug, Default)]
pub struct WorkerRegistry {
	workers: HashMap<String, WorkerDefinition>,
	policy: DuplicatePolicy,
}

impl WorkerRegistry {
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

	/// Duplicate policy in force.
	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Registers a worker.
	///
	/// Dependencies are not checked until the worker runs.
	pub fn register(&mut self, worker: WorkerDefinition) -> FactoryResult<()> {
		let name = worker.name().to_string();
		if self.workers.contains_key(&name) {
			match self.policy {
				DuplicatePolicy::Reject => return Err(FactoryError::DuplicateWorker(name)),
				DuplicatePolicy::LastWriteWins => {
					tracing::warn!(worker = %name, "Worker redefined, replacing previous definition");
				}
			}
		}
		tracing::debug!(worker = %name, "Registered worker");
		self.workers.insert(name, worker);
		Ok(())
	}

	/// Moves every worker of `other` into this registry.
	///
	/// Under [`DuplicatePolicy::Reject`] a clash is detected before anything
	/// is moved, so a failed merge leaves this registry unchanged.
	pub fn merge(&mut self, other: WorkerRegistry) -> FactoryResult<()> {
		if self.policy == DuplicatePolicy::Reject {
			if let Some(name) = other.names().into_iter().find(|name| self.contains(name)) {
				return Err(FactoryError::DuplicateWorker(name));
			}
		}
		let mut incoming: Vec<_> = other.workers.into_values().collect();
		incoming.sort_by(|a, b| a.name().cmp(b.name()));
		for worker in incoming {
			self.register(worker)?;
		}
		Ok(())
	}

	/// Gets a worker by name.
	pub fn get(&self, name: &str) -> Option<&WorkerDefinition> {
		self.workers.get(name)
	}

	/// Checks if a worker is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.workers.contains_key(name)
	}

	/// Returns all registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.workers.keys().cloned().collect();
		names.sort();
		names
	}

	/// Returns the number of registered workers.
	pub fn len(&self) -> usize {
		self.workers.len()
	}

	/// Returns true if no workers are registered.
	pub fn is_empty(&self) -> bool {
		self.workers.is_empty()
	}

	/// Runs a worker and, before it, its dependencies.
	///
	/// Declarative steps create their instances through `store`; code
	/// workers reach it through [`WorkerScope::create`]. Workers that already
	/// ran in `context` are skipped.
	///
	/// # Errors
	///
	/// Fails on unknown workers, dependency cycles, and any error raised by a
	/// worker body, by the factories it builds or by the store. Workers
	/// completed before the failure stay marked as run.
	pub async fn run(
		&self,
		name: &str,
		factories: &FactoryRegistry,
		store: &dyn FixtureStore,
		context: &mut WorkerContext,
	) -> FactoryResult<()> {
		let mut stack = Vec::new();
		self.run_worker(name, factories, store, context, &mut stack).await
	}

	fn run_worker<'a>(
		&'a self,
		name: &'a str,
		factories: &'a FactoryRegistry,
		store: &'a dyn FixtureStore,
		context: &'a mut WorkerContext,
		stack: &'a mut Vec<String>,
	) -> BoxFuture<'a, FactoryResult<()>> {
		Box::pin(async move {
			if context.has_run(name) {
				return Ok(());
			}
			if stack.iter().any(|pending| pending == name) {
				let mut path = stack.clone();
				path.push(name.to_string());
				return Err(FactoryError::CircularWorker { path });
			}

			let worker = self
				.get(name)
				.ok_or_else(|| FactoryError::UnknownWorker(name.to_string()))?;

			stack.push(name.to_string());
			for dependency in worker.dependencies() {
				self.run_worker(dependency, factories, store, &mut *context, &mut *stack)
					.await?;
			}

			let mut scope = WorkerScope::new(worker.name(), factories, store, &mut *context);
			match worker.action() {
				WorkerAction::Run(body) => body(&mut scope).await?,
				WorkerAction::Steps(steps) => {
					for step in steps {
						let instance = scope
							.create_with(step.factory(), step.overrides().clone())
							.await?;
						scope.remember(step.key(), instance);
					}
				}
			}
			stack.pop();

			context.mark_completed(name);
			tracing::debug!(worker = name, "Worker completed");
			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attributes;
	use crate::factory::AttributeValue;
	use crate::store::InMemoryStore;
	use crate::worker::WorkerStep;
	use rstest::{fixture, rstest};
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[fixture]
	fn factories() -> FactoryRegistry {
		let mut factories = FactoryRegistry::new();
		factories
			.register("monkey", attributes! { "name" => "George" })
			.unwrap();
		factories
			.register(
				"pirate",
				attributes! {
					"catchphrase" => "Ahhrrrr, Matey!",
					"monkey" => AttributeValue::belongs_to("monkey"),
				},
			)
			.unwrap();
		factories
	}

	#[rstest]
	#[tokio::test]
	async fn test_worker_runs_once_per_context(factories: FactoryRegistry) {
		// Arrange
		let runs = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&runs);
		let mut workers = WorkerRegistry::new();
		workers
			.register(WorkerDefinition::new("monkey_business", move |scope| {
				counter.fetch_add(1, Ordering::SeqCst);
				Box::pin(async move {
					let monkey = scope.create("monkey").await?;
					scope.remember("george", monkey);
					Ok::<_, FactoryError>(())
				})
			}))
			.unwrap();
		let store = InMemoryStore::new();
		let mut context = WorkerContext::new();

		// Act
		workers
			.run("monkey_business", &factories, &store, &mut context)
			.await
			.unwrap();
		workers
			.run("monkey_business", &factories, &store, &mut context)
			.await
			.unwrap();

		// Assert
		assert_eq!(runs.load(Ordering::SeqCst), 1);
		let george = context.instance("george").unwrap();
		assert_eq!(george.str("name"), Some("George"));
		assert_eq!(george.id(), Some(1));

		let mut fresh = WorkerContext::new();
		workers
			.run("monkey_business", &factories, &store, &mut fresh)
			.await
			.unwrap();
		assert_eq!(runs.load(Ordering::SeqCst), 2);
		assert_eq!(store.count(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dependencies_run_first(factories: FactoryRegistry) {
		// Arrange
		let mut workers = WorkerRegistry::new();
		workers
			.register(
				WorkerDefinition::new("crew", |scope| {
					Box::pin(async move {
						let captain = scope
							.instance("captain")
							.ok_or_else(|| scope.fail("captain missing"))?;
						assert_eq!(captain.factory(), "pirate");
						Ok::<_, FactoryError>(())
					})
				})
				.depends_on("captain"),
			)
			.unwrap();
		workers
			.register(WorkerDefinition::steps(
				"captain",
				vec![WorkerStep::new("pirate").alias("captain")],
			))
			.unwrap();
		let store = InMemoryStore::new();
		let mut context = WorkerContext::new();

		// Act
		workers
			.run("crew", &factories, &store, &mut context)
			.await
			.unwrap();

		// Assert
		assert_eq!(context.completed(), ["captain", "crew"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_steps_create_instances(factories: FactoryRegistry) {
		// Arrange
		let mut workers = WorkerRegistry::new();
		workers
			.register(WorkerDefinition::steps(
				"menagerie",
				vec![
					WorkerStep::new("monkey"),
					WorkerStep::new("monkey").alias("bubbles").with("name", "Bubbles"),
					WorkerStep::new("pirate"),
				],
			))
			.unwrap();
		let store = InMemoryStore::new();
		let mut context = WorkerContext::new();

		// Act
		workers
			.run("menagerie", &factories, &store, &mut context)
			.await
			.unwrap();

		// Assert
		let monkey = context.instance("monkey").unwrap();
		assert_eq!(monkey.str("name"), Some("George"));
		assert!(monkey.is_persisted());
		let bubbles = context.instance("bubbles").unwrap();
		assert_eq!(bubbles.str("name"), Some("Bubbles"));
		assert!(bubbles.is_persisted());
		let pirate = context.instance("pirate").unwrap();
		assert!(pirate.is_persisted());
		assert!(pirate.association("monkey").unwrap().is_persisted());
		assert_eq!(store.records("monkey").len(), 3);
		assert_eq!(store.records("pirate").len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_worker(factories: FactoryRegistry) {
		let workers = WorkerRegistry::new();
		let store = InMemoryStore::new();
		let mut context = WorkerContext::new();

		let result = workers.run("ghost", &factories, &store, &mut context).await;

		assert!(matches!(result, Err(FactoryError::UnknownWorker(ref n)) if n == "ghost"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_circular_dependencies(factories: FactoryRegistry) {
		// Arrange
		let mut workers = WorkerRegistry::new();
		workers
			.register(WorkerDefinition::steps("a", vec![]).depends_on("b"))
			.unwrap();
		workers
			.register(WorkerDefinition::steps("b", vec![]).depends_on("a"))
			.unwrap();
		let store = InMemoryStore::new();
		let mut context = WorkerContext::new();

		// Act
		let result = workers.run("a", &factories, &store, &mut context).await;

		// Assert
		let Err(FactoryError::CircularWorker { path }) = result else {
			panic!("expected circular worker error");
		};
		assert_eq!(path, vec!["a", "b", "a"]);
		assert!(context.completed().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_worker_failure_propagates(factories: FactoryRegistry) {
		let mut workers = WorkerRegistry::new();
		workers
			.register(WorkerDefinition::new("broken", |scope| {
				Box::pin(async move { Err::<(), _>(scope.fail("no rum")) })
			}))
			.unwrap();
		let store = InMemoryStore::new();
		let mut context = WorkerContext::new();

		let result = workers.run("broken", &factories, &store, &mut context).await;

		assert!(matches!(result, Err(FactoryError::Worker { ref message, .. }) if message == "no rum"));
		assert!(!context.has_run("broken"));
	}

	#[rstest]
	fn test_reject_duplicate_worker() {
		let mut workers = WorkerRegistry::with_policy(DuplicatePolicy::Reject);
		workers.register(WorkerDefinition::steps("a", vec![])).unwrap();

		let result = workers.register(WorkerDefinition::steps("a", vec![]));

		assert!(matches!(result, Err(FactoryError::DuplicateWorker(_))));
		assert_eq!(workers.names(), vec!["a"]);
	}

	#[rstest]
	fn test_merge_moves_workers() {
		// Arrange
		let mut base = WorkerRegistry::new();
		base.register(WorkerDefinition::steps("ship", vec![])).unwrap();
		let mut other = WorkerRegistry::new();
		other
			.register(WorkerDefinition::steps("crew", vec![]).depends_on("ship"))
			.unwrap();
		other.register(WorkerDefinition::steps("ship", vec![WorkerStep::new("monkey")])).unwrap();

		// Act
		base.merge(other).unwrap();

		// Assert
		assert_eq!(base.names(), vec!["crew", "ship"]);
		let Some(WorkerAction::Steps(steps)) = base.get("ship").map(WorkerDefinition::action) else {
			panic!("expected steps");
		};
		assert_eq!(steps.len(), 1);
	}

	#[rstest]
	fn test_rejected_merge_leaves_registry_unchanged() {
		// Arrange
		let mut base = WorkerRegistry::with_policy(DuplicatePolicy::Reject);
		base.register(WorkerDefinition::steps("ship", vec![])).unwrap();
		let mut other = WorkerRegistry::new();
		other.register(WorkerDefinition::steps("crew", vec![])).unwrap();
		other.register(WorkerDefinition::steps("ship", vec![])).unwrap();

		// Act
		let result = base.merge(other);

		// Assert
		assert!(matches!(result, Err(FactoryError::DuplicateWorker(ref n)) if n == "ship"));
		assert_eq!(base.names(), vec!["ship"]);
	}
}
