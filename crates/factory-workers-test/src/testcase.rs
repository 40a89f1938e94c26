//! Per-test access to loaded fixtures
//!
//! Pairs a shared [`TestEnvironment`] with a fresh store and worker context,
//! so every test starts without saved records or completed workers.

use std::sync::Arc;

use factory_workers_core::FactoryResult;
use factory_workers_core::factory::{FactoryRegistry, Fields, Instance, Overrides};
use factory_workers_core::store::InMemoryStore;
use factory_workers_core::worker::WorkerContext;
use rstest::fixture;

use crate::loader::{Bootstrap, TestEnvironment};
use crate::logging::init_test_logging;

/// Base test case for fixture-driven tests
///
/// # Example
/// ```ignore
/// use factory_workers_test::prelude::*;
/// use rstest::rstest;
///
/// #[rstest]
/// #[tokio::test]
/// async fn test_pirate_has_monkey(mut factory_case: FactoryTestCase) {
///     let pirate = factory_case.create("pirate").await.unwrap();
///     assert!(pirate.association("monkey").unwrap().is_persisted());
///
///     factory_case.worker("crew").await.unwrap();
///     assert!(factory_case.instance("captain").is_some());
/// }
/// ```
#[derive(Debug)]
pub struct FactoryTestCase {
	environment: Arc<TestEnvironment>,
	store: Arc<InMemoryStore>,
	context: WorkerContext,
}

impl FactoryTestCase {
	/// Create a test case over an environment with an empty store
	pub fn new(environment: Arc<TestEnvironment>) -> Self {
		Self::with_store(environment, Arc::new(InMemoryStore::new()))
	}

	/// Create a test case sharing an existing store
	pub fn with_store(environment: Arc<TestEnvironment>, store: Arc<InMemoryStore>) -> Self {
		Self {
			environment,
			store,
			context: WorkerContext::new(),
		}
	}

	/// Loaded fixtures
	pub fn environment(&self) -> &TestEnvironment {
		&self.environment
	}

	/// Factory registry of the environment
	pub fn factories(&self) -> &FactoryRegistry {
		self.environment.factories()
	}

	/// Store used by [`create`](Self::create)
	pub fn store(&self) -> &InMemoryStore {
		&self.store
	}

	/// Worker context of this test
	pub fn context(&self) -> &WorkerContext {
		&self.context
	}

	/// Build an unsaved instance
	pub fn build(&self, factory: &str) -> FactoryResult<Instance> {
		self.factories().build(factory)
	}

	/// Build an unsaved instance with overrides
	pub fn build_with(&self, factory: &str, overrides: Overrides) -> FactoryResult<Instance> {
		self.factories().build_with(factory, overrides)
	}

	/// Evaluated fields a build would produce
	pub fn attributes_for(&self, factory: &str) -> FactoryResult<Fields> {
		self.factories().attributes_for(factory, Overrides::new())
	}

	/// Build and save an instance
	pub async fn create(&self, factory: &str) -> FactoryResult<Instance> {
		self.environment.factories().create(self.store.as_ref(), factory).await
	}

	/// Build with overrides and save
	pub async fn create_with(&self, factory: &str, overrides: Overrides) -> FactoryResult<Instance> {
		self.environment
			.factories()
			.create_with(self.store.as_ref(), factory, overrides)
			.await
	}

	/// Run a worker and its dependencies, once per test case
	///
	/// Instances the workers create are saved in [`store`](Self::store).
	pub async fn worker(&mut self, name: &str) -> FactoryResult<&WorkerContext> {
		self.environment
			.workers()
			.run(
				name,
				self.environment.factories(),
				self.store.as_ref(),
				&mut self.context,
			)
			.await?;
		Ok(&self.context)
	}

	/// Instance remembered by a worker
	pub fn instance(&self, key: &str) -> Option<&Instance> {
		self.context.instance(key)
	}

	/// Clear saved records and forget completed workers
	pub fn reset(&mut self) {
		self.store.clear();
		self.context = WorkerContext::new();
	}
}

/// Fixture providing a test case over the process environment
///
/// Reads `FACTORY_WORKERS_ENV` and `FACTORY_WORKERS_ROOT`, applies every
/// source submitted with [`register_fixtures!`](crate::register_fixtures)
/// and loads the conventional fixture files.
///
/// # Panics
///
/// Panics if bootstrapping fails, so a broken fixture file stops the run.
///
/// # Examples
///
/// ```ignore
/// use factory_workers_test::testcase::{factory_case, FactoryTestCase};
/// use rstest::*;
///
/// #[rstest]
/// fn test_monkey_name(factory_case: FactoryTestCase) {
///     let monkey = factory_case.build("monkey").unwrap();
///     assert_eq!(monkey.str("name"), Some("George"));
/// }
/// ```
#[fixture]
pub fn factory_case() -> FactoryTestCase {
	init_test_logging();
	let environment = Bootstrap::from_env()
		.and_then(|bootstrap| bootstrap.with_collected_sources().load())
		.unwrap_or_else(|error| panic!("Failed to bootstrap fixtures: {error}"));
	FactoryTestCase::new(Arc::new(environment))
}

#[cfg(test)]
mod tests {
	use super::*;
	use factory_workers_core::factory::FieldValue;
	use factory_workers_core::worker::{WorkerDefinition, WorkerRegistry, WorkerStep};
	use factory_workers_core::{AttributeValue, attributes};
	use rstest::rstest;
	use serde_json::json;

	#[fixture]
	fn harbor() -> FactoryTestCase {
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

		let mut workers = WorkerRegistry::new();
		workers
			.register(WorkerDefinition::steps("ship", vec![WorkerStep::new("monkey").alias("lookout")]))
			.unwrap();
		workers
			.register(
				WorkerDefinition::steps("crew", vec![WorkerStep::new("pirate").alias("captain")])
					.depends_on("ship"),
			)
			.unwrap();

		let environment = TestEnvironment::from_registries(factories, workers);
		FactoryTestCase::new(Arc::new(environment))
	}

	#[rstest]
	fn test_build_does_not_save(harbor: FactoryTestCase) {
		let monkey = harbor.build("monkey").unwrap();

		assert_eq!(monkey.str("name"), Some("George"));
		assert!(!monkey.is_persisted());
		assert_eq!(harbor.store().count(), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_saves_association_first(harbor: FactoryTestCase) {
		// Act
		let pirate = harbor.create("pirate").await.unwrap();

		// Assert
		let monkey = pirate.association("monkey").unwrap();
		assert!(monkey.id().unwrap() < pirate.id().unwrap());
		assert_eq!(harbor.store().count(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_with_override(harbor: FactoryTestCase) {
		let mut overrides = Overrides::new();
		overrides.insert("name".to_string(), FieldValue::from(json!("Bubbles")));

		let monkey = harbor.create_with("monkey", overrides).await.unwrap();

		assert_eq!(monkey.str("name"), Some("Bubbles"));
		assert_eq!(harbor.store().records("monkey").len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_worker_runs_dependencies_once(mut harbor: FactoryTestCase) {
		// Act
		harbor.worker("crew").await.unwrap();
		harbor.worker("crew").await.unwrap();

		// Assert
		assert_eq!(harbor.context().completed(), ["ship", "crew"]);
		assert!(harbor.instance("lookout").is_some());
		assert!(harbor.instance("captain").is_some());
	}

	#[rstest]
	#[tokio::test]
	async fn test_worker_instances_are_saved(mut harbor: FactoryTestCase) {
		// Act
		harbor.worker("crew").await.unwrap();

		// Assert
		let lookout = harbor.instance("lookout").unwrap();
		let captain = harbor.instance("captain").unwrap();
		assert!(lookout.is_persisted());
		assert!(captain.is_persisted());
		assert!(captain.association("monkey").unwrap().is_persisted());
		assert_eq!(harbor.store().find(captain.id().unwrap()).as_ref(), Some(captain));
		assert_eq!(harbor.store().records("monkey").len(), 2);
		assert_eq!(harbor.store().records("pirate").len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_reset_clears_state(mut harbor: FactoryTestCase) {
		// Arrange
		harbor.create("monkey").await.unwrap();
		harbor.worker("ship").await.unwrap();

		// Act
		harbor.reset();

		// Assert
		assert_eq!(harbor.store().count(), 0);
		assert!(harbor.context().completed().is_empty());
	}

	#[rstest]
	fn test_attributes_for_evaluates_fields(harbor: FactoryTestCase) {
		let fields = harbor.attributes_for("pirate").unwrap();

		assert_eq!(
			fields["catchphrase"].as_value(),
			Some(&json!("Ahhrrrr, Matey!"))
		);
		assert!(fields["monkey"].as_instance().is_some());
		assert_eq!(harbor.store().count(), 0);
	}
}
