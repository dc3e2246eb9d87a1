//! Frequent-customer name cache.
//!
//! A small durable set of "given family" strings backed by an explicitly
//! injected storage service. The list is loaded once at session start and
//! persisted on each mutation; the only invariant is uniqueness.

use pedidos_storage::{StorageError, StorageService};
use pedidos_types::StorageKey;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage id of the single persisted name list.
const CACHE_ID: &str = "names";

/// Durable set of frequently used customer names.
pub struct FrequentCustomers {
	storage: Arc<StorageService>,
	names: RwLock<Vec<String>>,
}

impl FrequentCustomers {
	/// Loads the cached list from storage; an absent entry yields an
	/// empty list.
	pub async fn load(storage: Arc<StorageService>) -> Result<Self, StorageError> {
		let names = match storage
			.retrieve::<Vec<String>>(StorageKey::FrequentCustomers.as_str(), CACHE_ID)
			.await
		{
			Ok(names) => names,
			Err(StorageError::NotFound) => Vec::new(),
			Err(e) => return Err(e),
		};

		Ok(Self {
			storage,
			names: RwLock::new(names),
		})
	}

	/// Returns the current list in insertion order.
	pub async fn names(&self) -> Vec<String> {
		self.names.read().await.clone()
	}

	/// Adds a name if it is not already present (case-insensitive).
	///
	/// Returns true when the list changed. Blank names are ignored.
	pub async fn add(&self, name: &str) -> Result<bool, StorageError> {
		let name = name.trim();
		if name.is_empty() {
			return Ok(false);
		}

		let mut names = self.names.write().await;
		if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
			return Ok(false);
		}

		names.push(name.to_string());
		self.persist(&names).await?;
		Ok(true)
	}

	/// Removes a name if present (case-insensitive).
	///
	/// Returns true when the list changed; removing an absent name is a
	/// no-op.
	pub async fn remove(&self, name: &str) -> Result<bool, StorageError> {
		let name = name.trim();
		let mut names = self.names.write().await;

		let before = names.len();
		names.retain(|n| !n.eq_ignore_ascii_case(name));

		if names.len() == before {
			return Ok(false);
		}

		self.persist(&names).await?;
		Ok(true)
	}

	async fn persist(&self, names: &[String]) -> Result<(), StorageError> {
		self.storage
			.store(StorageKey::FrequentCustomers.as_str(), CACHE_ID, &names)
			.await
	}
}
