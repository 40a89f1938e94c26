//! Fixture factories and setup workers for tests.
//!
//! # Factories
//!
//! A factory is a named template for a test entity. Each attribute is one of:
//!
//! - a literal value, used as-is;
//! - an association to another factory, instantiated recursively;
//! - a deferred computation, evaluated again for every instance;
//! - a `$UNIQ(n)` / `$COUNT` template;
//! - a fake data generator.
//!
//! ```
//! use factory_workers_core::attributes;
//! use factory_workers_core::factory::{generators, AttributeValue, FactoryRegistry};
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register("monkey", attributes! { "name" => "George" }).unwrap();
//! registry
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
//! let pirate = registry.build("pirate").unwrap();
//! assert_eq!(pirate.association("monkey").unwrap().str("name"), Some("George"));
//! ```
//!
//! # Creating
//!
//! [`FactoryRegistry::create`](factory::FactoryRegistry::create) builds an
//! instance and saves it, associations first, through a
//! [`FixtureStore`](store::FixtureStore).
//!
//! # Workers
//!
//! [`WorkerRegistry`](worker::WorkerRegistry) holds named setup routines with
//! dependencies, run at most once per [`WorkerContext`](worker::WorkerContext)
//! and creating their instances through the store they run with.

#![warn(missing_docs)]

pub mod error;
pub mod factory;
pub mod prelude;
pub mod store;
pub mod worker;

pub use error::{FactoryError, FactoryResult};
pub use factory::{AttributeValue, FactoryDefinition, FactoryRegistry, Instance};
pub use store::{FixtureStore, InMemoryStore};
pub use worker::{WorkerContext, WorkerDefinition, WorkerRegistry};
