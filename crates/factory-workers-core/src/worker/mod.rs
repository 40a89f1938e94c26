//! Factory workers.
//!
//! A worker is a named setup routine that builds the fixtures a group of
//! tests shares. Workers declare the workers they depend on; running a worker
//! runs its dependencies first, and every worker runs at most once per
//! [`WorkerContext`].

mod context;
mod definition;
mod registry;

pub use context::{WorkerContext, WorkerScope};
pub use definition::{WorkerAction, WorkerDefinition, WorkerFn, WorkerStep};
pub use registry::WorkerRegistry;
