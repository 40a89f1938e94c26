//! # Factory Workers
//!
//! Test fixtures for Rust: named factories whose attributes are literals,
//! associations to other factories or values computed anew for every
//! instance, plus reusable setup workers. Fixtures are loaded only when the
//! process runs in the `test` environment.
//!
//! ## Feature Flags
//!
//! - `core` - Fixture registry, store and workers
//! - `test` (default) - Bootstrap loader, fixture files and test case integration
//! - `yaml` - YAML fixture files
//! - `full` - All features enabled
//!
//! ## Quick Start
//!
//! ```rust
//! use factory_workers::prelude::*;
//!
//! let mut factories = FactoryRegistry::new();
//! factories.register("monkey", attributes! { "name" => "George" }).unwrap();
//! factories
//!     .register(
//!         "pirate",
//!         attributes! {
//!             "catchphrase" => "Ahhrrrr, Matey!",
//!             "monkey" => AttributeValue::belongs_to("monkey"),
//!             "created_on" => AttributeValue::deferred(|| generators::days_ago(1)),
//!         },
//!     )
//!     .unwrap();
//!
//! let pirate = factories.build("pirate").unwrap();
//! assert_eq!(pirate.association("monkey").unwrap().str("name"), Some("George"));
//! ```
//!
//! ## Environment
//!
//! - `FACTORY_WORKERS_ENV` - fixtures load only when this is exactly `test`
//! - `FACTORY_WORKERS_ROOT` - directory holding `spec/` and `tests/` fixture files

#[cfg(feature = "core")]
pub mod core;
#[cfg(feature = "test")]
pub mod test;

// Re-export commonly used types
#[cfg(feature = "core")]
pub use factory_workers_core::{
	AttributeValue, FactoryDefinition, FactoryError, FactoryRegistry, FactoryResult, FixtureStore,
	InMemoryStore, Instance, WorkerContext, WorkerDefinition, WorkerRegistry, attributes,
};

#[cfg(feature = "test")]
pub use factory_workers_test::{
	Bootstrap, BootstrapError, BootstrapSettings, FactoryTestCase, TestEnvironment, factory_case,
	register_fixtures,
};

/// Convenience re-exports for common usage.
pub mod prelude {
	#[cfg(all(feature = "core", not(feature = "test")))]
	pub use factory_workers_core::prelude::*;

	#[cfg(feature = "test")]
	pub use factory_workers_test::prelude::*;
}
