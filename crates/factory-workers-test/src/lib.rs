//! # Factory Workers Test
//!
//! Loads fixture factories and workers into tests, but only in the test
//! environment.
//!
//! ## Overview
//!
//! - **[`BootstrapSettings`]**: environment and project root, read from
//!   `FACTORY_WORKERS_ENV` and `FACTORY_WORKERS_ROOT`
//! - **[`Bootstrap`]**: applies fixture sources and conventional fixture
//!   files when the environment is `test`
//! - **[`FixtureParser`]**: TOML, JSON and YAML fixture files
//! - **[`FactoryTestCase`]**: per-test store and worker context, also
//!   available as the `factory_case` rstest fixture
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use factory_workers_test::prelude::*;
//! use rstest::rstest;
//!
//! fn pirates(fixtures: &mut FixtureRegistrar<'_>) -> FactoryResult<()> {
//!     fixtures.factory("monkey", attributes! { "name" => "George" })
//! }
//!
//! register_fixtures!("pirates", pirates);
//!
//! #[rstest]
//! fn test_monkey(factory_case: FactoryTestCase) {
//!     assert_eq!(factory_case.build("monkey").unwrap().str("name"), Some("George"));
//! }
//! ```
//!
//! ## Fixture files
//!
//! With the environment set to `test`, these stems are tried under the
//! root with the `toml`, `json`, `yaml` and `yml` extensions, and the first
//! existing file of each is loaded:
//!
//! - `spec/factories`
//! - `spec/factory_workers`
//! - `tests/factories`
//! - `tests/factory_workers`

#![warn(missing_docs)]

pub mod error;
pub mod fixtures;
pub mod loader;
pub mod logging;
pub mod prelude;
pub mod settings;
pub mod source;
pub mod testcase;

#[doc(hidden)]
pub use inventory;

pub use error::{BootstrapError, BootstrapResult};
pub use fixtures::{FixtureFormat, FixtureParser};
pub use loader::{Bootstrap, TestEnvironment};
pub use logging::init_test_logging;
pub use settings::{BootstrapSettings, Environment};
pub use source::{FixtureRegistrar, FixtureSet, FixtureSource};
pub use testcase::{FactoryTestCase, factory_case};
