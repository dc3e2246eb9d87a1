//! Order types for the pedidos tracker.
//!
//! This module defines the canonical order record, its line items, the
//! five-stage delivery status pipeline, and the draft types used when a
//! new order is submitted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single purchased product line within an order.
///
/// The line subtotal is always derived as `quantity * unit_price` and is
/// never stored independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
	/// Free-text product label.
	pub name: String,
	/// Number of units, conventionally an integer count.
	pub quantity: Decimal,
	/// Price of a single unit.
	pub unit_price: Decimal,
}

/// A purchase order placed on behalf of a family member.
///
/// The record is canonical once the store has assigned an `id`. The
/// `total` field is derived from the line items at build time and is
/// recomputed on every line-item mutation; a caller-supplied total is
/// never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier assigned by the store on creation.
	pub id: String,
	/// Full customer name, formed as "given family" and treated as one
	/// opaque string afterwards.
	pub customer_name: String,
	/// Optional external reference code; not required to be unique.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// Calendar date the order was placed.
	pub order_date: NaiveDate,
	/// Optional free-text comments.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub comments: Option<String>,
	/// Current position in the delivery pipeline.
	pub status: OrderStatus,
	/// Ordered sequence of purchased lines.
	pub line_items: Vec<LineItem>,
	/// Derived sum of all line subtotals.
	pub total: Decimal,
	/// Opaque image references attached at creation time.
	#[serde(default)]
	pub attachments: Vec<String>,
	/// Timestamp when this order was created (Unix seconds).
	pub created_at: u64,
	/// Timestamp when this order was last updated (Unix seconds).
	pub updated_at: u64,
}

/// Status of an order in the delivery pipeline.
///
/// The pipeline order Pending -> Dispatched -> Customs -> InTransit ->
/// Delivered is a display hint only; the state machine permits any
/// transition, including regression and skip-ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Order has been placed but not yet shipped.
	Pending,
	/// Order has left the seller's warehouse.
	Dispatched,
	/// Order is held at customs.
	Customs,
	/// Order is out for delivery.
	InTransit,
	/// Order has reached the customer.
	Delivered,
}

impl OrderStatus {
	/// Returns all statuses in display pipeline order.
	pub fn pipeline() -> [OrderStatus; 5] {
		[
			OrderStatus::Pending,
			OrderStatus::Dispatched,
			OrderStatus::Customs,
			OrderStatus::InTransit,
			OrderStatus::Delivered,
		]
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "PENDING"),
			OrderStatus::Dispatched => write!(f, "DISPATCHED"),
			OrderStatus::Customs => write!(f, "CUSTOMS"),
			OrderStatus::InTransit => write!(f, "IN_TRANSIT"),
			OrderStatus::Delivered => write!(f, "DELIVERED"),
		}
	}
}

/// A draft line item as submitted by the form.
///
/// The numeric fields hold the raw input text; parsing happens when the
/// draft is built so that a failed parse surfaces as a validation error
/// instead of silently becoming zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
	/// Free-text product label.
	#[serde(default)]
	pub name: String,
	/// Raw quantity input.
	#[serde(default = "default_quantity", with = "raw_number")]
	pub quantity: String,
	/// Raw unit-price input.
	#[serde(default = "default_unit_price", with = "raw_number")]
	pub unit_price: String,
}

impl Default for LineItemDraft {
	fn default() -> Self {
		Self {
			name: String::new(),
			quantity: default_quantity(),
			unit_price: default_unit_price(),
		}
	}
}

fn default_quantity() -> String {
	"1".to_string()
}

fn default_unit_price() -> String {
	"0".to_string()
}

/// A candidate order as submitted by the user-facing form.
///
/// The given and family name are kept separate until build time, when they
/// are trimmed and joined into the opaque `customer_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
	/// Customer given name.
	#[serde(default)]
	pub given_name: String,
	/// Customer family name.
	#[serde(default)]
	pub family_name: String,
	/// Optional external reference code.
	#[serde(default)]
	pub code: Option<String>,
	/// Calendar date the order was placed.
	pub order_date: NaiveDate,
	/// Optional free-text comments.
	#[serde(default)]
	pub comments: Option<String>,
	/// Initial pipeline status; defaults to Pending when absent.
	#[serde(default)]
	pub status: Option<OrderStatus>,
	/// Draft line items in form order.
	#[serde(default)]
	pub line_items: Vec<LineItemDraft>,
	/// Opaque image references to attach at creation time.
	#[serde(default)]
	pub attachments: Vec<String>,
}

impl OrderDraft {
	/// Appends a fresh line item with default values, keeping the
	/// existing items untouched.
	pub fn add_line_item(&mut self) {
		self.line_items.push(LineItemDraft::default());
	}
}

/// Serde module for raw numeric draft fields.
///
/// Accepts either a JSON number or a JSON string on input and preserves
/// the raw text so coercion can be validated at build time.
pub mod raw_number {
	use serde::{Deserialize, Deserializer, Serialize, Serializer};

	pub fn serialize<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		value.serialize(serializer)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Text(String),
			Number(serde_json::Number),
		}

		Ok(match Raw::deserialize(deserializer)? {
			Raw::Text(s) => s,
			Raw::Number(n) => n.to_string(),
		})
	}
}
