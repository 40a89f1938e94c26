//! Fixture registry module.
//!
//! Factories, instances, the fixture store and setup workers.
//!
//! # Examples
//!
//! ```rust
//! use factory_workers::core::FactoryRegistry;
//! use factory_workers::core::attributes;
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register("monkey", attributes! { "name" => "George" }).unwrap();
//! ```

#[cfg(feature = "core")]
pub use factory_workers_core::*;
