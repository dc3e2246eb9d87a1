//! Derived statistics types for reporting.

use crate::OrderStatus;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A read-only snapshot of aggregate order statistics.
///
/// Derived entirely from the order collection at query time; it holds no
/// independent identity or lifecycle. The same shape is used whether the
/// snapshot was aggregated locally or delivered pre-aggregated by a
/// remote statistics source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
	/// Summed order totals per "YYYY-MM" month key.
	pub amount_by_month: BTreeMap<String, Decimal>,
	/// Summed order totals per status, keyed in pipeline order with all
	/// five statuses present.
	pub amount_by_status: IndexMap<OrderStatus, Decimal>,
	/// Summed order totals per customer, in first-encountered order.
	pub amount_by_customer: IndexMap<String, Decimal>,
	/// Summed totals of delivered orders, computed independently of the
	/// per-status map.
	pub delivered_amount: Decimal,
}

impl StatisticsSnapshot {
	/// Returns an empty snapshot with all five status buckets at zero.
	pub fn empty() -> Self {
		Self {
			amount_by_month: BTreeMap::new(),
			amount_by_status: OrderStatus::pipeline()
				.into_iter()
				.map(|s| (s, Decimal::ZERO))
				.collect(),
			amount_by_customer: IndexMap::new(),
			delivered_amount: Decimal::ZERO,
		}
	}
}
