//! Error types for fixture bootstrapping.

use std::path::PathBuf;

use factory_workers_core::FactoryError;
use thiserror::Error;

/// Errors that can occur while loading fixture sources.
#[derive(Debug, Error)]
pub enum BootstrapError {
	/// A fixture file could not be read.
	#[error("IO error reading {path}: {source}")]
	Io {
		/// File being read.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},

	/// A fixture file has an extension no enabled format handles.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// A fixture file's content is malformed.
	#[error("Parse error in {path}: {message}")]
	Parse {
		/// Offending file, or `<string>` for in-memory content.
		path: PathBuf,
		/// What is wrong.
		message: String,
	},

	/// A fixture source failed to register its fixtures.
	#[error("Fixture source {source_name} failed: {error}")]
	Source {
		/// Name of the registrar.
		source_name: String,
		/// Failure returned by it.
		#[source]
		error: FactoryError,
	},

	/// Registration failed (for example a rejected duplicate).
	#[error(transparent)]
	Factory(#[from] FactoryError),

	/// Settings could not be resolved.
	#[error("Configuration error: {0}")]
	Config(String),
}

impl BootstrapError {
	pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
		Self::Parse {
			path: path.into(),
			message: message.to_string(),
		}
	}
}

/// Result type alias for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_error_names_file() {
		let error = BootstrapError::parse("tests/factories.toml", "expected table");
		assert_eq!(
			error.to_string(),
			"Parse error in tests/factories.toml: expected table"
		);
	}

	#[rstest]
	fn test_factory_error_is_transparent() {
		let error: BootstrapError = FactoryError::DuplicateFactory("monkey".to_string()).into();
		assert_eq!(error.to_string(), "Duplicate factory: monkey");
	}
}
