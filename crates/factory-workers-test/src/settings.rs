//! Bootstrap settings read from the process environment.
//!
//! # Environment Variables
//!
//! - `FACTORY_WORKERS_ENV`: run mode; fixtures load only when it is exactly `test`
//! - `FACTORY_WORKERS_ROOT`: base directory of the conventional fixture files
//!   (defaults to the current directory in the test environment)

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, BootstrapResult};

/// Variable holding the run mode.
pub const ENV_VAR: &str = "FACTORY_WORKERS_ENV";

/// Variable holding the base directory.
pub const ROOT_VAR: &str = "FACTORY_WORKERS_ROOT";

/// Conventional fixture file stems, relative to the root directory.
pub const DEFAULT_CANDIDATES: [&str; 4] = [
	"spec/factories",
	"spec/factory_workers",
	"tests/factories",
	"tests/factory_workers",
];

/// Run mode of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
	/// `test`: fixtures are loaded.
	Test,
	/// `development`
	Development,
	/// `production`
	Production,
	/// Any other value.
	Other(String),
	/// Variable not set.
	Unset,
}

impl Environment {
	/// Parses a run mode. Only the exact string `test` is [`Environment::Test`].
	pub fn parse(value: &str) -> Self {
		match value {
			"test" => Self::Test,
			"development" => Self::Development,
			"production" => Self::Production,
			other => Self::Other(other.to_string()),
		}
	}

	/// Returns true if fixtures should be loaded.
	pub fn is_test(&self) -> bool {
		matches!(self, Self::Test)
	}
}

/// Where the bootstrap looks and whether it looks at all.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
	environment: Environment,
	root: PathBuf,
	candidates: Vec<PathBuf>,
}

impl BootstrapSettings {
	/// Creates settings with the default candidates.
	pub fn new(environment: Environment, root: impl Into<PathBuf>) -> Self {
		Self {
			environment,
			root: root.into(),
			candidates: DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
		}
	}

	/// Reads settings from the process environment.
	pub fn from_env() -> BootstrapResult<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Reads settings through `lookup` instead of the process environment.
	///
	/// # Example
	///
	/// ```
	/// use factory_workers_test::settings::{BootstrapSettings, Environment};
	///
	/// let settings = BootstrapSettings::from_lookup(|key| match key {
	///     "FACTORY_WORKERS_ENV" => Some("test".to_string()),
	///     "FACTORY_WORKERS_ROOT" => Some("/srv/app".to_string()),
	///     _ => None,
	/// })
	/// .unwrap();
	///
	/// assert_eq!(settings.environment(), &Environment::Test);
	/// ```
	pub fn from_lookup<F>(lookup: F) -> BootstrapResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let environment = lookup(ENV_VAR)
			.map(|value| Environment::parse(&value))
			.unwrap_or(Environment::Unset);

		let root = match lookup(ROOT_VAR) {
			Some(root) if !root.is_empty() => PathBuf::from(root),
			_ if environment.is_test() => env::current_dir().map_err(|e| {
				BootstrapError::Config(format!("Failed to get current directory: {e}"))
			})?,
			_ => PathBuf::new(),
		};

		Ok(Self::new(environment, root))
	}

	/// Replaces the candidate stems.
	pub fn with_candidates<I, P>(mut self, candidates: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		self.candidates = candidates.into_iter().map(Into::into).collect();
		self
	}

	/// Sets the environment.
	pub fn with_environment(mut self, environment: Environment) -> Self {
		self.environment = environment;
		self
	}

	/// Run mode.
	pub fn environment(&self) -> &Environment {
		&self.environment
	}

	/// Base directory.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Candidate stems relative to the root.
	pub fn candidates(&self) -> &[PathBuf] {
		&self.candidates
	}

	/// Candidate stems joined onto the root.
	pub fn candidate_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
		self.candidates.iter().map(|stem| self.root.join(stem))
	}
}
