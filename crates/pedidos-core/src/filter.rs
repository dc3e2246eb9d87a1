//! Collection filtering for order listings.
//!
//! Criteria are optional and combined with logical AND. Filtering is
//! stable: the relative order of the input collection is preserved and an
//! all-empty criteria set returns the input unchanged.

use pedidos_types::{Order, OrderStatus};
use serde::Deserialize;

/// Filter criteria over the order collection.
///
/// An empty or absent criterion always matches and never narrows the
/// result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
	/// Exact status match.
	#[serde(default)]
	pub status: Option<OrderStatus>,
	/// Case-insensitive substring match against the customer name.
	#[serde(default)]
	pub customer: Option<String>,
	/// Prefix match against the ISO-formatted order date; a partial date
	/// like "2024" or "2024-03" selects a year or a month.
	#[serde(default)]
	pub date: Option<String>,
	/// Case-insensitive substring match against the order code.
	#[serde(default)]
	pub code: Option<String>,
}

impl OrderFilter {
	/// Returns true when the order satisfies every present criterion.
	pub fn matches(&self, order: &Order) -> bool {
		if let Some(status) = self.status {
			if order.status != status {
				return false;
			}
		}

		if let Some(query) = non_empty(&self.customer) {
			if !contains_ignore_case(&order.customer_name, query) {
				return false;
			}
		}

		if let Some(prefix) = non_empty(&self.date) {
			let iso = order.order_date.format("%Y-%m-%d").to_string();
			if !iso.starts_with(prefix) {
				return false;
			}
		}

		if let Some(query) = non_empty(&self.code) {
			// A missing code simply fails to match, it is not an error
			match order.code.as_deref() {
				Some(code) if contains_ignore_case(code, query) => {}
				_ => return false,
			}
		}

		true
	}
}

/// Applies the filter, preserving the relative order of the input.
pub fn filter_orders(orders: &[Order], filter: &OrderFilter) -> Vec<Order> {
	orders
		.iter()
		.filter(|o| filter.matches(o))
		.cloned()
		.collect()
}

/// Decodes a raw backing collection leniently.
///
/// A non-array value yields an empty collection, and malformed elements
/// are skipped; this function never fails.
pub fn orders_from_value(value: serde_json::Value) -> Vec<Order> {
	match value {
		serde_json::Value::Array(items) => items
			.into_iter()
			.filter_map(|item| serde_json::from_value(item).ok())
			.collect(),
		_ => Vec::new(),
	}
}

fn non_empty(criterion: &Option<String>) -> Option<&str> {
	criterion.as_deref().filter(|c| !c.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
	haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use rust_decimal_macros::dec;

	fn order(id: &str, name: &str, status: OrderStatus, date: (i32, u32, u32), code: Option<&str>) -> Order {
		Order {
			id: id.to_string(),
			customer_name: name.to_string(),
			code: code.map(str::to_string),
			order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
			comments: None,
			status,
			line_items: vec![],
			total: dec!(10),
			attachments: vec![],
			created_at: 0,
			updated_at: 0,
		}
	}

	fn sample_set() -> Vec<Order> {
		vec![
			order("1", "David Espinoza", OrderStatus::Delivered, (2024, 3, 15), Some("Dx01")),
			order("2", "Ana Reyes", OrderStatus::Pending, (2024, 3, 20), None),
			order("3", "Maria Espinoza", OrderStatus::Pending, (2023, 12, 1), Some("Dx02")),
		]
	}

	#[test]
	fn empty_criteria_is_identity() {
		let orders = sample_set();
		let filtered = filter_orders(&orders, &OrderFilter::default());
		assert_eq!(filtered, orders);
	}

	#[test]
	fn filter_is_idempotent() {
		let orders = sample_set();
		let filter = OrderFilter {
			customer: Some("espinoza".to_string()),
			..Default::default()
		};
		let once = filter_orders(&orders, &filter);
		let twice = filter_orders(&once, &filter);
		assert_eq!(once, twice);
	}

	#[test]
	fn status_filter_is_exact() {
		let orders = sample_set();
		let filter = OrderFilter {
			status: Some(OrderStatus::Delivered),
			..Default::default()
		};
		let filtered = filter_orders(&orders, &filter);
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered[0].id, "1");
	}

	#[test]
	fn customer_match_is_case_insensitive_substring() {
		let orders = sample_set();
		let filter = OrderFilter {
			customer: Some("ESPINOZA".to_string()),
			..Default::default()
		};
		let filtered = filter_orders(&orders, &filter);
		let ids: Vec<&str> = filtered.iter().map(|o| o.id.as_str()).collect();
		assert_eq!(ids, vec!["1", "3"]);
	}

	#[test]
	fn date_prefix_selects_year_or_month() {
		let orders = sample_set();

		let year = OrderFilter {
			date: Some("2024".to_string()),
			..Default::default()
		};
		assert_eq!(filter_orders(&orders, &year).len(), 2);

		let month = OrderFilter {
			date: Some("2023-12".to_string()),
			..Default::default()
		};
		let filtered = filter_orders(&orders, &month);
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered[0].id, "3");
	}

	#[test]
	fn code_filter_tolerates_missing_code() {
		let orders = sample_set();
		let filter = OrderFilter {
			code: Some("dx".to_string()),
			..Default::default()
		};
		// Order "2" has no code and is skipped without error
		assert_eq!(filter_orders(&orders, &filter).len(), 2);
	}

	#[test]
	fn criteria_combine_with_and() {
		let orders = sample_set();
		let filter = OrderFilter {
			status: Some(OrderStatus::Pending),
			customer: Some("espinoza".to_string()),
			..Default::default()
		};
		let filtered = filter_orders(&orders, &filter);
		assert_eq!(filtered.len(), 1);
		assert_eq!(filtered[0].id, "3");
	}

	#[test]
	fn empty_string_criteria_match_everything() {
		let orders = sample_set();
		let filter = OrderFilter {
			customer: Some(String::new()),
			date: Some(String::new()),
			code: Some(String::new()),
			..Default::default()
		};
		assert_eq!(filter_orders(&orders, &filter), orders);
	}

	#[test]
	fn malformed_backing_collection_degrades_to_empty() {
		assert!(orders_from_value(serde_json::json!({"not": "an array"})).is_empty());
		assert!(orders_from_value(serde_json::Value::Null).is_empty());

		// Malformed elements are skipped, valid ones survive
		let valid = serde_json::to_value(sample_set()).unwrap();
		let mut items = valid.as_array().unwrap().clone();
		items.push(serde_json::json!({"garbage": true}));
		let decoded = orders_from_value(serde_json::Value::Array(items));
		assert_eq!(decoded.len(), 3);
	}
}
