//! Test bootstrap module.
//!
//! Environment-gated fixture loading and the `factory_case` test fixture.
//!
//! # Examples
//!
//! ```rust,no_run
//! use factory_workers::test::{Bootstrap, BootstrapSettings};
//!
//! let environment = Bootstrap::new(BootstrapSettings::from_env().unwrap())
//!     .with_collected_sources()
//!     .load()
//!     .unwrap();
//! ```

#[cfg(feature = "test")]
pub use factory_workers_test::*;
