//! Convenience re-exports for test modules.
//!
//! ```
//! use factory_workers_test::prelude::*;
//!
//! fn monkeys(fixtures: &mut FixtureRegistrar<'_>) -> FactoryResult<()> {
//!     fixtures.factory("monkey", attributes! { "name" => "George" })
//! }
//! # let _ = monkeys;
//! ```

pub use factory_workers_core::prelude::*;

pub use crate::error::{BootstrapError, BootstrapResult};
pub use crate::loader::{Bootstrap, TestEnvironment};
pub use crate::logging::init_test_logging;
pub use crate::register_fixtures;
pub use crate::settings::{BootstrapSettings, Environment};
pub use crate::source::{FixtureRegistrar, FixtureSource};
pub use crate::testcase::{FactoryTestCase, factory_case};
