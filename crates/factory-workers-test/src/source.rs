//! Statically known fixture sources.
//!
//! Fixture modules expose registration functions instead of being required
//! at runtime. The harness lists them explicitly, or they submit themselves
//! with [`register_fixtures!`](crate::register_fixtures) and are gathered
//! through `inventory`.
//!
//! ```ignore
//! use factory_workers_test::prelude::*;
//!
//! fn pirates(fixtures: &mut FixtureRegistrar<'_>) -> FactoryResult<()> {
//!     fixtures.factory("monkey", attributes! { "name" => "George" })?;
//!     Ok(())
//! }
//!
//! register_fixtures!("pirates", pirates);
//! ```

use std::fmt;
use std::path::PathBuf;

use factory_workers_core::FactoryResult;
use factory_workers_core::factory::{Attributes, FactoryDefinition, FactoryRegistry};
use factory_workers_core::worker::{WorkerDefinition, WorkerRegistry};

/// Registration function of a fixture module.
pub type RegisterFn = fn(&mut FixtureRegistrar<'_>) -> FactoryResult<()>;

/// Registration surface handed to fixture modules.
pub struct FixtureRegistrar<'a> {
	factories: &'a mut FactoryRegistry,
	workers: &'a mut WorkerRegistry,
}

impl<'a> FixtureRegistrar<'a> {
	/// Wraps the registries being filled.
	pub fn new(factories: &'a mut FactoryRegistry, workers: &'a mut WorkerRegistry) -> Self {
		Self { factories, workers }
	}

	/// Registers a factory.
	pub fn factory(&mut self, name: impl Into<String>, attributes: Attributes) -> FactoryResult<()> {
		self.factories.register(name, attributes)
	}

	/// Registers a prepared factory definition.
	pub fn define(&mut self, definition: FactoryDefinition) -> FactoryResult<()> {
		self.factories.define(definition)
	}

	/// Registers a worker.
	pub fn worker(&mut self, worker: WorkerDefinition) -> FactoryResult<()> {
		self.workers.register(worker)
	}

	/// Factories registered so far.
	pub fn factories(&self) -> &FactoryRegistry {
		self.factories
	}

	/// Workers registered so far.
	pub fn workers(&self) -> &WorkerRegistry {
		self.workers
	}
}

/// Where fixture definitions come from.
#[derive(Clone)]
pub enum FixtureSource {
	/// Registration function compiled into the test binary.
	Registrar {
		/// Name used in logs and errors.
		name: &'static str,
		/// Function to call.
		register: RegisterFn,
	},
	/// Fixture file, skipped if missing.
	File(PathBuf),
}

impl FixtureSource {
	/// Creates a registrar source.
	pub fn registrar(name: &'static str, register: RegisterFn) -> Self {
		Self::Registrar { name, register }
	}

	/// Creates a file source.
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self::File(path.into())
	}

	/// Display name of the source.
	pub fn name(&self) -> String {
		match self {
			Self::Registrar { name, .. } => (*name).to_string(),
			Self::File(path) => path.display().to_string(),
		}
	}
}

impl fmt::Debug for FixtureSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Registrar { name, .. } => f.debug_struct("Registrar").field("name", name).finish(),
			Self::File(path) => f.debug_tuple("File").field(path).finish(),
		}
	}
}

/// Registration entry collected by `inventory`.
pub struct FixtureSet {
	/// Name used in logs and errors.
	pub name: &'static str,
	/// Function to call.
	pub register: RegisterFn,
}

impl FixtureSet {
	/// Creates an entry. Usable in `inventory::submit!`.
	pub const fn new(name: &'static str, register: RegisterFn) -> Self {
		Self { name, register }
	}
}

inventory::collect!(FixtureSet);

/// Returns every submitted [`FixtureSet`] as a source, sorted by name.
///
/// Link order decides the order `inventory` yields entries in, so sorting
/// keeps registration deterministic.
pub fn collected_sources() -> Vec<FixtureSource> {
	let mut sets: Vec<&FixtureSet> = inventory::iter::<FixtureSet>.into_iter().collect();
	sets.sort_by_key(|set| set.name);
	sets.into_iter()
		.map(|set| FixtureSource::registrar(set.name, set.register))
		.collect()
}

/// Submits a registration function to the collected fixture sources.
///
/// # Example
///
/// ```ignore
/// register_fixtures!("pirates", pirates);
/// ```
#[macro_export]
macro_rules! register_fixtures {
	($name:expr, $register:path) => {
		$crate::inventory::submit! {
			$crate::source::FixtureSet::new($name, $register)
		}
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use factory_workers_core::attributes;
	use rstest::rstest;

	fn monkeys(fixtures: &mut FixtureRegistrar<'_>) -> FactoryResult<()> {
		fixtures.factory("monkey", attributes! { "name" => "George" })?;
		fixtures.worker(WorkerDefinition::steps("zoo", vec![]))
	}

	crate::register_fixtures!("source_tests::monkeys", monkeys);

	#[rstest]
	fn test_registrar_fills_both_registries() {
		// Arrange
		let mut factories = FactoryRegistry::new();
		let mut workers = WorkerRegistry::new();

		// Act
		monkeys(&mut FixtureRegistrar::new(&mut factories, &mut workers)).unwrap();

		// Assert
		assert!(factories.contains("monkey"));
		assert!(workers.contains("zoo"));
	}

	#[rstest]
	fn test_collected_sources_include_submissions() {
		let names: Vec<_> = collected_sources().iter().map(FixtureSource::name).collect();
		assert!(names.contains(&"source_tests::monkeys".to_string()));
	}

	#[rstest]
	fn test_source_names() {
		assert_eq!(FixtureSource::registrar("pirates", monkeys).name(), "pirates");
		assert_eq!(
			FixtureSource::file("tests/factories.toml").name(),
			"tests/factories.toml"
		);
	}

	#[rstest]
	fn test_debug_omits_function() {
		let source = FixtureSource::registrar("pirates", monkeys);
		assert_eq!(format!("{:?}", source), r#"Registrar { name: "pirates" }"#);
	}
}
