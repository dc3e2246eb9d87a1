//! Order state machine implementation.
//!
//! Manages order status updates against the backing store. The delivery
//! pipeline PENDING -> DISPATCHED -> CUSTOMS -> IN_TRANSIT -> DELIVERED is
//! advisory display order only: any status may move to any other status,
//! including regression and skip-ahead. A self-transition is a no-op.

use pedidos_storage::{StorageError, StorageService};
use pedidos_types::{Order, OrderStatus, StorageKey};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Time error: {0}")]
	Time(String),
}

/// Manages order status transitions and persistence
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Updates an order with a closure and persists it
	pub async fn update_order_with<F>(
		&self,
		order_id: &str,
		updater: F,
	) -> Result<Order, OrderStateError>
	where
		F: FnOnce(&mut Order),
	{
		let mut order: Order = self
			.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| storage_error(order_id, e))?;

		// Apply the update
		updater(&mut order);

		// Automatically set updated_at timestamp
		order.updated_at = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|e| OrderStateError::Time(e.to_string()))?
			.as_secs();

		self.storage
			.update(StorageKey::Orders.as_str(), order_id, &order)
			.await
			.map_err(|e| storage_error(order_id, e))?;

		Ok(order)
	}

	/// Moves an order to a new pipeline status.
	///
	/// Every (current, target) pair is legal. When the target equals the
	/// current status the stored record is returned unchanged, without
	/// touching `updated_at`.
	pub async fn transition_order_status(
		&self,
		order_id: &str,
		new_status: OrderStatus,
	) -> Result<Order, OrderStateError> {
		let order = self.get_order(order_id).await?;

		if order.status == new_status {
			tracing::debug!(order_id, status = %new_status, "Self-transition is a no-op");
			return Ok(order);
		}

		let updated = self
			.update_order_with(order_id, |o| {
				o.status = new_status;
			})
			.await?;

		tracing::info!(
			order_id,
			from = %order.status,
			to = %new_status,
			"Order status updated"
		);

		Ok(updated)
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| storage_error(order_id, e))
	}

	/// Stores a new order
	pub async fn store_order(&self, order: &Order) -> Result<(), OrderStateError> {
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(|e| storage_error(&order.id, e))
	}
}

/// Keeps missing orders distinguishable from backend failures.
fn storage_error(order_id: &str, err: StorageError) -> OrderStateError {
	match err {
		StorageError::NotFound => OrderStateError::OrderNotFound(order_id.to_string()),
		other => OrderStateError::Storage(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use pedidos_storage::implementations::memory::MemoryStorage;
	use pedidos_types::LineItem;
	use rust_decimal_macros::dec;

	fn machine() -> OrderStateMachine {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		OrderStateMachine::new(storage)
	}

	fn sample_order(id: &str, status: OrderStatus) -> Order {
		Order {
			id: id.to_string(),
			customer_name: "David Espinoza".to_string(),
			code: Some("Dx000000007".to_string()),
			order_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
			comments: None,
			status,
			line_items: vec![LineItem {
				name: "mouse".to_string(),
				quantity: dec!(2),
				unit_price: dec!(10.50),
			}],
			total: dec!(21.00),
			attachments: vec![],
			created_at: 1,
			updated_at: 1,
		}
	}

	#[tokio::test]
	async fn every_status_pair_transitions() {
		let machine = machine();

		for from in OrderStatus::pipeline() {
			for to in OrderStatus::pipeline() {
				let id = format!("{}-{}", from, to);
				machine.store_order(&sample_order(&id, from)).await.unwrap();

				let updated = machine.transition_order_status(&id, to).await.unwrap();
				assert_eq!(updated.status, to);
			}
		}
	}

	#[tokio::test]
	async fn transition_leaves_other_fields_untouched() {
		let machine = machine();
		let original = sample_order("o1", OrderStatus::Delivered);
		machine.store_order(&original).await.unwrap();

		// Regression is legal: DELIVERED -> PENDING
		let updated = machine
			.transition_order_status("o1", OrderStatus::Pending)
			.await
			.unwrap();

		assert_eq!(updated.status, OrderStatus::Pending);
		assert_eq!(updated.customer_name, original.customer_name);
		assert_eq!(updated.code, original.code);
		assert_eq!(updated.order_date, original.order_date);
		assert_eq!(updated.line_items, original.line_items);
		assert_eq!(updated.total, original.total);
		assert_eq!(updated.created_at, original.created_at);
	}

	#[tokio::test]
	async fn self_transition_is_a_noop() {
		let machine = machine();
		let original = sample_order("o2", OrderStatus::Customs);
		machine.store_order(&original).await.unwrap();

		let unchanged = machine
			.transition_order_status("o2", OrderStatus::Customs)
			.await
			.unwrap();

		assert_eq!(unchanged, original);
		assert_eq!(machine.get_order("o2").await.unwrap(), original);
	}

	#[tokio::test]
	async fn unknown_order_is_distinguishable() {
		let machine = machine();
		let err = machine
			.transition_order_status("missing", OrderStatus::Delivered)
			.await
			.unwrap_err();
		assert!(matches!(err, OrderStateError::OrderNotFound(id) if id == "missing"));
	}
}
