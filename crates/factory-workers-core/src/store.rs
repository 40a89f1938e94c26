//! Persisting instances.
//!
//! `build` keeps instances in memory; `create` additionally hands every
//! instance of the tree to a [`FixtureStore`], associations first, so the
//! parent is saved with persisted children.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::RwLock;

use crate::error::FactoryResult;
use crate::factory::{FactoryRegistry, FieldValue, Instance, Overrides};

/// Destination for created instances.
///
/// Implement this for whatever backs the entities under test (a database
/// session, an in-process service, ...).
#[async_trait]
pub trait FixtureStore: Send + Sync {
	/// Saves an instance and returns it with its id assigned.
	///
	/// Associated instances have already been saved when this is called.
	async fn save(&self, instance: Instance) -> FactoryResult<Instance>;
}

/// Store that keeps created instances in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
	last_id: AtomicU64,
	records: RwLock<Vec<Instance>>,
}

impl InMemoryStore {
	/// Creates an empty store. Ids start at 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// All saved instances in save order.
	pub fn all(&self) -> Vec<Instance> {
		self.records.read().clone()
	}

	/// Saved instances of one factory in save order.
	pub fn records(&self, factory: &str) -> Vec<Instance> {
		self.records
			.read()
			.iter()
			.filter(|record| record.factory() == factory)
			.cloned()
			.collect()
	}

	/// Finds a saved instance by id.
	pub fn find(&self, id: u64) -> Option<Instance> {
		self.records
			.read()
			.iter()
			.find(|record| record.id() == Some(id))
			.cloned()
	}

	/// Number of saved instances.
	pub fn count(&self) -> usize {
		self.records.read().len()
	}

	/// Removes every saved instance. Ids keep increasing.
	pub fn clear(&self) {
		self.records.write().clear();
	}
}

#[async_trait]
impl FixtureStore for InMemoryStore {
	async fn save(&self, mut instance: Instance) -> FactoryResult<Instance> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
		instance.set_id(id);
		self.records.write().push(instance.clone());
		Ok(instance)
	}
}

impl FactoryRegistry {
	/// Builds and saves an instance of the named factory.
	pub async fn create(&self, store: &dyn FixtureStore, name: &str) -> FactoryResult<Instance> {
		self.create_with(store, name, Overrides::new()).await
	}

	/// Builds with overrides and saves the resulting tree.
	///
	/// Associated instances without an id are saved before their parent;
	/// instances passed in overrides that are already persisted are kept as
	/// they are.
	pub async fn create_with(
		&self,
		store: &dyn FixtureStore,
		name: &str,
		overrides: Overrides,
	) -> FactoryResult<Instance> {
		let instance = self.build_with(name, overrides)?;
		persist(store, instance).await
	}
}

fn persist(store: &dyn FixtureStore, mut instance: Instance) -> BoxFuture<'_, FactoryResult<Instance>> {
	Box::pin(async move {
		for field in instance.fields_mut().values_mut() {
			if let FieldValue::Instance(child) = field {
				if !child.is_persisted() {
					let saved = persist(store, child.as_ref().clone()).await?;
					**child = saved;
				}
			}
		}
		tracing::debug!(factory = instance.factory(), "Saving fixture");
		store.save(instance).await
	})
}
