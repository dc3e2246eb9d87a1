//! Core engine for the pedidos order tracker.
//!
//! This module provides the orchestration logic tying the order builder,
//! status state machine, collection filter, and aggregation engine to the
//! backing store. The engine is store-authoritative: every mutation is a
//! read-modify-write against storage, so a rejected write leaves the
//! observable order collection unchanged.

use pedidos_storage::{StorageError, StorageService};
use pedidos_types::{Order, OrderDraft, OrderStatus, StatisticsSnapshot, StorageKey};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

pub mod builder;
pub mod customers;
pub mod filter;
pub mod state;
pub mod stats;
pub mod total;

pub use builder::{build_order, OrderValidationError, ValidatedOrder};
pub use customers::FrequentCustomers;
pub use filter::{filter_orders, orders_from_value, OrderFilter};
pub use state::{OrderStateError, OrderStateMachine};
pub use stats::{aggregate, amount_for_customer};
pub use total::{line_subtotal, order_total};

/// Utility function to truncate an id for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	/// The submitted draft failed validation; nothing was stored.
	#[error(transparent)]
	Validation(#[from] OrderValidationError),
	/// The targeted order does not exist.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// The backing store failed.
	#[error("Storage error: {0}")]
	Storage(String),
	/// The system clock was unusable.
	#[error("Time error: {0}")]
	Time(String),
}

impl From<OrderStateError> for EngineError {
	fn from(err: OrderStateError) -> Self {
		match err {
			OrderStateError::OrderNotFound(id) => EngineError::NotFound(id),
			OrderStateError::Storage(msg) => EngineError::Storage(msg),
			OrderStateError::Time(msg) => EngineError::Time(msg),
		}
	}
}

/// Main engine coordinating order lifecycle and reporting.
///
/// Owns the storage service, the status state machine, and the
/// frequent-customer cache. All operations complete in a single pass over
/// the materialized order collection; the engine holds no derived state
/// between calls.
pub struct OrderEngine {
	/// Storage service for persisting orders.
	storage: Arc<StorageService>,
	/// State machine for status transitions.
	state: OrderStateMachine,
	/// Durable frequent-customer name list.
	customers: FrequentCustomers,
}

impl OrderEngine {
	/// Builds an engine on top of the given storage service, loading the
	/// frequent-customer cache from it.
	pub async fn new(storage: Arc<StorageService>) -> Result<Self, EngineError> {
		let customers = FrequentCustomers::load(Arc::clone(&storage))
			.await
			.map_err(storage_error)?;

		Ok(Self {
			state: OrderStateMachine::new(Arc::clone(&storage)),
			customers,
			storage,
		})
	}

	/// Validates a draft and stores the canonical order record.
	///
	/// Validation failures surface before any store interaction. The
	/// returned record carries the assigned id and timestamps.
	pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order, EngineError> {
		let validated = build_order(draft)?;

		let order = validated.into_order(Uuid::new_v4().to_string(), now()?);
		self.state.store_order(&order).await?;

		tracing::info!(
			order_id = %truncate_id(&order.id),
			customer = %order.customer_name,
			total = %order.total,
			"Created order"
		);

		Ok(order)
	}

	/// Lists orders newest-first, narrowed by the given filter.
	pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, EngineError> {
		let mut orders: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(storage_error)?;

		// Newest first; the stable sort keeps insertion order within a
		// second
		orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

		Ok(filter_orders(&orders, filter))
	}

	/// Retrieves a single order by id.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, EngineError> {
		Ok(self.state.get_order(order_id).await?)
	}

	/// Moves an order to a new pipeline status.
	pub async fn update_status(
		&self,
		order_id: &str,
		status: OrderStatus,
	) -> Result<Order, EngineError> {
		Ok(self.state.transition_order_status(order_id, status).await?)
	}

	/// Deletes an order; targeting an unknown id is a distinguishable
	/// failure.
	pub async fn delete_order(&self, order_id: &str) -> Result<(), EngineError> {
		let exists = self
			.storage
			.exists(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(storage_error)?;
		if !exists {
			return Err(EngineError::NotFound(order_id.to_string()));
		}

		self.storage
			.remove(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(storage_error)?;

		tracing::info!(order_id = %truncate_id(order_id), "Deleted order");
		Ok(())
	}

	/// Aggregates the current order collection into a statistics
	/// snapshot.
	pub async fn statistics(&self) -> Result<StatisticsSnapshot, EngineError> {
		let orders: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(storage_error)?;
		Ok(aggregate(&orders))
	}

	/// Returns the frequent-customer name list.
	pub async fn frequent_customers(&self) -> Vec<String> {
		self.customers.names().await
	}

	/// Adds a frequent-customer name; returns true when the list changed.
	pub async fn add_frequent_customer(&self, name: &str) -> Result<bool, EngineError> {
		self.customers.add(name).await.map_err(storage_error)
	}

	/// Removes a frequent-customer name if present.
	pub async fn remove_frequent_customer(&self, name: &str) -> Result<bool, EngineError> {
		self.customers.remove(name).await.map_err(storage_error)
	}
}

fn now() -> Result<u64, EngineError> {
	Ok(SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_err(|e| EngineError::Time(e.to_string()))?
		.as_secs())
}

fn storage_error(err: StorageError) -> EngineError {
	EngineError::Storage(err.to_string())
}
