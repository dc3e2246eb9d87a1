//! Aggregation engine for reporting statistics.
//!
//! Folds the order collection into a [`StatisticsSnapshot`]: totals per
//! month, per status, per customer, and the delivered grand total. The
//! fold is a pure function of its input and recomputes fully on every
//! invocation; no incremental state is kept.

use pedidos_types::{Order, OrderStatus, StatisticsSnapshot};
use rust_decimal::Decimal;

/// Aggregates the order collection into a statistics snapshot.
///
/// Every order's total is counted exactly once in each grouping. The
/// per-status aggregate sums order totals (not counts), matching the
/// monetary semantics of the other groupings.
pub fn aggregate(orders: &[Order]) -> StatisticsSnapshot {
	let mut snapshot = StatisticsSnapshot::empty();

	for order in orders {
		let month = order.order_date.format("%Y-%m").to_string();
		*snapshot
			.amount_by_month
			.entry(month)
			.or_insert(Decimal::ZERO) += order.total;

		*snapshot
			.amount_by_status
			.entry(order.status)
			.or_insert(Decimal::ZERO) += order.total;

		*snapshot
			.amount_by_customer
			.entry(order.customer_name.clone())
			.or_insert(Decimal::ZERO) += order.total;

		// Computed independently of the per-status map so its meaning
		// never couples to the per-status semantics
		if order.status == OrderStatus::Delivered {
			snapshot.delivered_amount += order.total;
		}
	}

	snapshot
}

/// Looks up a customer's aggregate by partial, case-insensitive name
/// match.
///
/// Returns the first matching group in first-encountered insertion order;
/// multiple customers sharing a substring are not disambiguated.
pub fn amount_for_customer<'a>(
	snapshot: &'a StatisticsSnapshot,
	query: &str,
) -> Option<(&'a str, Decimal)> {
	let needle = query.to_lowercase();
	snapshot
		.amount_by_customer
		.iter()
		.find(|(name, _)| name.to_lowercase().contains(&needle))
		.map(|(name, amount)| (name.as_str(), *amount))
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use rust_decimal_macros::dec;

	fn order(name: &str, status: OrderStatus, date: (i32, u32, u32), total: Decimal) -> Order {
		Order {
			id: format!("{}-{}", name, total),
			customer_name: name.to_string(),
			code: None,
			order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
			comments: None,
			status,
			line_items: vec![],
			total,
			attachments: vec![],
			created_at: 0,
			updated_at: 0,
		}
	}

	fn sample_set() -> Vec<Order> {
		vec![
			order("David Espinoza", OrderStatus::Delivered, (2024, 3, 15), dec!(26.00)),
			order("Ana Reyes", OrderStatus::Pending, (2024, 3, 20), dec!(14.50)),
			order("David Espinoza", OrderStatus::Delivered, (2024, 4, 2), dec!(8.25)),
			order("Maria Lopez", OrderStatus::Customs, (2023, 12, 30), dec!(100)),
		]
	}

	#[test]
	fn conservation_across_groupings() {
		let orders = sample_set();
		let snapshot = aggregate(&orders);

		let grand: Decimal = orders.iter().map(|o| o.total).sum();
		let by_month: Decimal = snapshot.amount_by_month.values().copied().sum();
		let by_customer: Decimal = snapshot.amount_by_customer.values().copied().sum();
		let by_status: Decimal = snapshot.amount_by_status.values().copied().sum();

		assert_eq!(by_month, grand);
		assert_eq!(by_customer, grand);
		assert_eq!(by_status, grand);
	}

	#[test]
	fn months_group_by_year_month() {
		let snapshot = aggregate(&sample_set());
		assert_eq!(snapshot.amount_by_month["2024-03"], dec!(40.50));
		assert_eq!(snapshot.amount_by_month["2024-04"], dec!(8.25));
		assert_eq!(snapshot.amount_by_month["2023-12"], dec!(100));
	}

	#[test]
	fn per_status_sums_amounts_with_all_buckets_present() {
		let snapshot = aggregate(&sample_set());
		assert_eq!(snapshot.amount_by_status.len(), 5);
		assert_eq!(snapshot.amount_by_status[&OrderStatus::Delivered], dec!(34.25));
		assert_eq!(snapshot.amount_by_status[&OrderStatus::Pending], dec!(14.50));
		assert_eq!(snapshot.amount_by_status[&OrderStatus::Customs], dec!(100));
		assert_eq!(snapshot.amount_by_status[&OrderStatus::Dispatched], Decimal::ZERO);
		assert_eq!(snapshot.amount_by_status[&OrderStatus::InTransit], Decimal::ZERO);
	}

	#[test]
	fn delivered_amount_is_independent() {
		let snapshot = aggregate(&sample_set());
		assert_eq!(snapshot.delivered_amount, dec!(34.25));
		assert!(snapshot.delivered_amount >= dec!(26.00));
	}

	#[test]
	fn customer_lookup_matches_first_insertion_order_group() {
		let snapshot = aggregate(&sample_set());

		let (name, amount) = amount_for_customer(&snapshot, "david").unwrap();
		assert_eq!(name, "David Espinoza");
		assert_eq!(amount, dec!(34.25));

		// Substring shared by several customers resolves to the first
		// encountered group
		let (name, _) = amount_for_customer(&snapshot, "a").unwrap();
		assert_eq!(name, "David Espinoza");

		assert!(amount_for_customer(&snapshot, "nobody").is_none());
	}

	#[test]
	fn empty_collection_aggregates_to_empty_snapshot() {
		let snapshot = aggregate(&[]);
		assert!(snapshot.amount_by_month.is_empty());
		assert!(snapshot.amount_by_customer.is_empty());
		assert_eq!(snapshot.delivered_amount, Decimal::ZERO);
	}

	#[test]
	fn aggregation_recomputes_from_scratch() {
		let mut orders = sample_set();
		let before = aggregate(&orders);
		orders.pop();
		let after = aggregate(&orders);
		assert_ne!(before, after);
		assert_eq!(
			after.amount_by_month.values().copied().sum::<Decimal>(),
			orders.iter().map(|o| o.total).sum::<Decimal>()
		);
	}
}
