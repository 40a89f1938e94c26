//! Environment-gated fixture bootstrap.
//!
//! [`Bootstrap::load`] does nothing unless the environment is `test`. In the
//! test environment it applies every declared source, then loads each
//! conventional fixture file that exists. Missing files are skipped
//! silently; broken ones abort the load.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use factory_workers_core::FactoryError;
use factory_workers_core::factory::{DuplicatePolicy, FactoryRegistry};
use factory_workers_core::worker::WorkerRegistry;

use crate::error::{BootstrapError, BootstrapResult};
use crate::fixtures::{FixtureFormat, FixtureParser};
use crate::settings::BootstrapSettings;
use crate::source::{FixtureRegistrar, FixtureSource, collected_sources};

/// Fixtures available to a test run.
#[derive(Debug, Default)]
pub struct TestEnvironment {
	factories: FactoryRegistry,
	workers: WorkerRegistry,
	loaded_files: Vec<PathBuf>,
	applied_sources: Vec<String>,
	file_keys: HashSet<PathBuf>,
}

impl TestEnvironment {
	/// Creates an empty environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty environment whose registries use `policy`.
	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			factories: FactoryRegistry::with_policy(policy),
			workers: WorkerRegistry::with_policy(policy),
			..Self::default()
		}
	}

	/// Wraps registries filled elsewhere.
	pub fn from_registries(factories: FactoryRegistry, workers: WorkerRegistry) -> Self {
		Self {
			factories,
			workers,
			..Self::default()
		}
	}

	/// Factory registry.
	pub fn factories(&self) -> &FactoryRegistry {
		&self.factories
	}

	/// Worker registry.
	pub fn workers(&self) -> &WorkerRegistry {
		&self.workers
	}

	/// Fixture files loaded, in load order.
	pub fn loaded_files(&self) -> &[PathBuf] {
		&self.loaded_files
	}

	/// Registrar sources applied, in order.
	pub fn applied_sources(&self) -> &[String] {
		&self.applied_sources
	}

	/// Returns true if no factory or worker is registered.
	pub fn is_empty(&self) -> bool {
		self.factories.is_empty() && self.workers.is_empty()
	}
}

/// Loads fixture sources into a [`TestEnvironment`].
///
/// # Example
///
/// ```
/// use factory_workers_test::loader::Bootstrap;
/// use factory_workers_test::settings::{BootstrapSettings, Environment};
///
/// let settings = BootstrapSettings::new(Environment::Production, "/srv/app");
/// let environment = Bootstrap::new(settings).load().unwrap();
/// assert!(environment.is_empty());
/// ```
#[derive(Debug)]
pub struct Bootstrap {
	settings: BootstrapSettings,
	sources: Vec<FixtureSource>,
	policy: DuplicatePolicy,
}

impl Bootstrap {
	/// Creates a bootstrap without sources beyond the conventional files.
	pub fn new(settings: BootstrapSettings) -> Self {
		Self {
			settings,
			sources: Vec::new(),
			policy: DuplicatePolicy::default(),
		}
	}

	/// Creates a bootstrap from the process environment.
	pub fn from_env() -> BootstrapResult<Self> {
		Ok(Self::new(BootstrapSettings::from_env()?))
	}

	/// Adds a source.
	pub fn source(mut self, source: FixtureSource) -> Self {
		self.sources.push(source);
		self
	}

	/// Adds several sources.
	pub fn sources(mut self, sources: impl IntoIterator<Item = FixtureSource>) -> Self {
		self.sources.extend(sources);
		self
	}

	/// Adds every source submitted with
	/// [`register_fixtures!`](crate::register_fixtures).
	pub fn with_collected_sources(self) -> Self {
		self.sources(collected_sources())
	}

	/// Sets the duplicate policy of the resulting registries.
	pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Settings in use.
	pub fn settings(&self) -> &BootstrapSettings {
		&self.settings
	}

	/// Loads fixtures if the environment is `test`.
	///
	/// # Errors
	///
	/// Returns the first error raised by a registrar or a present fixture
	/// file. Absent files never cause an error.
	pub fn load(&self) -> BootstrapResult<TestEnvironment> {
		let mut environment = TestEnvironment::with_policy(self.policy);

		if !self.settings.environment().is_test() {
			tracing::debug!(
				environment = ?self.settings.environment(),
				"Not a test environment, skipping fixture bootstrap"
			);
			return Ok(environment);
		}

		for source in &self.sources {
			match source {
				FixtureSource::Registrar { name, register } => {
					let mut registrar =
						FixtureRegistrar::new(&mut environment.factories, &mut environment.workers);
					register(&mut registrar).map_err(|error| BootstrapError::Source {
						source_name: (*name).to_string(),
						error,
					})?;
					tracing::debug!(source = name, "Applied fixture source");
					environment.applied_sources.push((*name).to_string());
				}
				FixtureSource::File(path) => {
					let path = self.settings.root().join(path);
					if path.is_file() {
						load_file(&path, &mut environment)?;
					} else {
						tracing::debug!(path = %path.display(), "Fixture file not found, skipping");
					}
				}
			}
		}

		for stem in self.settings.candidate_paths() {
			match resolve_candidate(&stem) {
				Some(path) => load_file(&path, &mut environment)?,
				None => {
					tracing::debug!(candidate = %stem.display(), "No fixture file, skipping");
				}
			}
		}

		tracing::info!(
			factories = environment.factories.len(),
			workers = environment.workers.len(),
			files = environment.loaded_files.len(),
			"Fixture bootstrap complete"
		);
		Ok(environment)
	}
}

/// Finds the file for a candidate stem.
///
/// A candidate that already carries a known extension is used as is;
/// otherwise each enabled extension is tried in probing order.
fn resolve_candidate(stem: &Path) -> Option<PathBuf> {
	if FixtureFormat::from_path(stem).is_some() {
		return stem.is_file().then(|| stem.to_path_buf());
	}
	FixtureFormat::candidate_extensions()
		.into_iter()
		.map(|ext| stem.with_extension(ext))
		.find(|path| path.is_file())
}

fn load_file(path: &Path, environment: &mut TestEnvironment) -> BootstrapResult<()> {
	let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
	if environment.file_keys.contains(&key) {
		tracing::debug!(path = %path.display(), "Fixture file already loaded");
		return Ok(());
	}

	let parsed = FixtureParser::new().parse_file(path)?;
	let mut factories = FactoryRegistry::new();
	for definition in parsed.factories {
		factories.define(definition)?;
	}
	let mut workers = WorkerRegistry::new();
	for worker in parsed.workers {
		workers.register(worker)?;
	}
	if environment.workers.policy() == DuplicatePolicy::Reject {
		if let Some(name) = workers
			.names()
			.into_iter()
			.find(|name| environment.workers.contains(name))
		{
			return Err(FactoryError::DuplicateWorker(name).into());
		}
	}
	environment.factories.merge(factories)?;
	environment.workers.merge(workers)?;

	tracing::debug!(path = %path.display(), "Loaded fixture file");
	environment.file_keys.insert(key);
	environment.loaded_files.push(path.to_path_buf());
	Ok(())
}
