//! Order construction and validation.
//!
//! Turns a submitted [`OrderDraft`] into a validated order payload: the
//! given and family name are trimmed and joined into one opaque customer
//! name, raw numeric inputs are coerced to decimals, and the order total
//! is recomputed collection-wide from the line items. A failed numeric
//! parse is a validation error surfaced before any store interaction,
//! never a silent zero.

use crate::total::order_total;
use pedidos_types::{LineItem, Order, OrderDraft, OrderStatus};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while validating a submitted order draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderValidationError {
	/// Both name fields were blank after trimming.
	#[error("Customer name must not be blank")]
	EmptyCustomerName,
	/// A quantity field could not be parsed as a number.
	#[error("Line {line}: quantity '{value}' is not a number")]
	InvalidQuantity { line: usize, value: String },
	/// A unit-price field could not be parsed as a number.
	#[error("Line {line}: unit price '{value}' is not a number")]
	InvalidUnitPrice { line: usize, value: String },
	/// A quantity was negative.
	#[error("Line {line}: quantity must not be negative")]
	NegativeQuantity { line: usize },
	/// A unit price was negative.
	#[error("Line {line}: unit price must not be negative")]
	NegativeUnitPrice { line: usize },
}

/// A draft that has passed validation, ready for the store to assign an
/// id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
	pub customer_name: String,
	pub code: Option<String>,
	pub order_date: chrono::NaiveDate,
	pub comments: Option<String>,
	pub status: OrderStatus,
	pub line_items: Vec<LineItem>,
	pub total: Decimal,
	pub attachments: Vec<String>,
}

impl ValidatedOrder {
	/// Materializes the canonical order record with the store-assigned
	/// identity.
	pub fn into_order(self, id: String, created_at: u64) -> Order {
		Order {
			id,
			customer_name: self.customer_name,
			code: self.code,
			order_date: self.order_date,
			comments: self.comments,
			status: self.status,
			line_items: self.line_items,
			total: self.total,
			attachments: self.attachments,
			created_at,
			updated_at: created_at,
		}
	}
}

/// Validates a draft and produces the order payload.
///
/// The total is always recomputed here from the coerced line items; any
/// total carried alongside the draft is ignored as a matter of policy.
pub fn build_order(draft: &OrderDraft) -> Result<ValidatedOrder, OrderValidationError> {
	let customer_name = full_customer_name(&draft.given_name, &draft.family_name);
	if customer_name.is_empty() {
		return Err(OrderValidationError::EmptyCustomerName);
	}

	let mut line_items = Vec::with_capacity(draft.line_items.len());
	for (line, item) in draft.line_items.iter().enumerate() {
		let quantity = parse_decimal(&item.quantity).ok_or_else(|| {
			OrderValidationError::InvalidQuantity {
				line,
				value: item.quantity.clone(),
			}
		})?;
		let unit_price = parse_decimal(&item.unit_price).ok_or_else(|| {
			OrderValidationError::InvalidUnitPrice {
				line,
				value: item.unit_price.clone(),
			}
		})?;

		if quantity.is_sign_negative() && !quantity.is_zero() {
			return Err(OrderValidationError::NegativeQuantity { line });
		}
		if unit_price.is_sign_negative() && !unit_price.is_zero() {
			return Err(OrderValidationError::NegativeUnitPrice { line });
		}

		line_items.push(LineItem {
			name: item.name.trim().to_string(),
			quantity,
			unit_price,
		});
	}

	let total = order_total(&line_items);

	Ok(ValidatedOrder {
		customer_name,
		code: normalize_optional(draft.code.as_deref()),
		order_date: draft.order_date,
		comments: normalize_optional(draft.comments.as_deref()),
		status: draft.status.unwrap_or(OrderStatus::Pending),
		line_items,
		total,
		attachments: draft.attachments.clone(),
	})
}

/// Joins the trimmed given and family name with a single space, skipping
/// blank parts. Both blank yields an empty string.
fn full_customer_name(given: &str, family: &str) -> String {
	let parts: Vec<&str> = [given.trim(), family.trim()]
		.into_iter()
		.filter(|p| !p.is_empty())
		.collect();
	parts.join(" ")
}

/// Parses a raw numeric field, treating surrounding whitespace as noise.
fn parse_decimal(raw: &str) -> Option<Decimal> {
	Decimal::from_str(raw.trim()).ok()
}

/// Maps empty or whitespace-only optional fields to None.
fn normalize_optional(value: Option<&str>) -> Option<String> {
	value
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use pedidos_types::LineItemDraft;
	use rust_decimal_macros::dec;

	fn draft() -> OrderDraft {
		OrderDraft {
			given_name: "David".to_string(),
			family_name: "Espinoza".to_string(),
			code: None,
			order_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
			comments: None,
			status: None,
			line_items: vec![
				LineItemDraft {
					name: "mouse".to_string(),
					quantity: "2".to_string(),
					unit_price: "10.50".to_string(),
				},
				LineItemDraft {
					name: "cable".to_string(),
					quantity: "1".to_string(),
					unit_price: "5.00".to_string(),
				},
			],
			attachments: vec![],
		}
	}

	#[test]
	fn builds_reference_order() {
		let order = build_order(&draft()).unwrap();
		assert_eq!(order.customer_name, "David Espinoza");
		assert_eq!(order.status, OrderStatus::Pending);
		assert_eq!(order.total, dec!(26.00));
	}

	#[test]
	fn name_parts_are_trimmed_and_joined_once() {
		let mut d = draft();
		d.given_name = "  Ana ".to_string();
		d.family_name = " Reyes  ".to_string();
		assert_eq!(build_order(&d).unwrap().customer_name, "Ana Reyes");

		d.family_name = "   ".to_string();
		assert_eq!(build_order(&d).unwrap().customer_name, "Ana");
	}

	#[test]
	fn blank_customer_name_is_rejected() {
		let mut d = draft();
		d.given_name = "  ".to_string();
		d.family_name = "".to_string();
		assert_eq!(
			build_order(&d).unwrap_err(),
			OrderValidationError::EmptyCustomerName
		);
	}

	#[test]
	fn unparseable_quantity_is_an_error_not_zero() {
		let mut d = draft();
		d.line_items[1].quantity = "dos".to_string();
		assert_eq!(
			build_order(&d).unwrap_err(),
			OrderValidationError::InvalidQuantity {
				line: 1,
				value: "dos".to_string()
			}
		);
	}

	#[test]
	fn nan_unit_price_is_an_error() {
		let mut d = draft();
		d.line_items[0].unit_price = "NaN".to_string();
		assert!(matches!(
			build_order(&d).unwrap_err(),
			OrderValidationError::InvalidUnitPrice { line: 0, .. }
		));
	}

	#[test]
	fn negative_values_are_rejected() {
		let mut d = draft();
		d.line_items[0].quantity = "-1".to_string();
		assert_eq!(
			build_order(&d).unwrap_err(),
			OrderValidationError::NegativeQuantity { line: 0 }
		);

		let mut d = draft();
		d.line_items[0].unit_price = "-0.01".to_string();
		assert_eq!(
			build_order(&d).unwrap_err(),
			OrderValidationError::NegativeUnitPrice { line: 0 }
		);
	}

	#[test]
	fn zero_item_order_is_degenerate_but_accepted() {
		let mut d = draft();
		d.line_items.clear();
		let order = build_order(&d).unwrap();
		assert_eq!(order.total, Decimal::ZERO);
		assert!(order.line_items.is_empty());
	}

	#[test]
	fn total_recomputes_after_line_mutation() {
		let mut d = draft();
		d.add_line_item();
		// The appended default line contributes 1 x 0
		assert_eq!(build_order(&d).unwrap().total, dec!(26.00));

		d.line_items[2].quantity = "3".to_string();
		d.line_items[2].unit_price = "2.00".to_string();
		assert_eq!(build_order(&d).unwrap().total, dec!(32.00));
	}

	#[test]
	fn initial_status_can_be_overridden() {
		let mut d = draft();
		d.status = Some(OrderStatus::Dispatched);
		assert_eq!(build_order(&d).unwrap().status, OrderStatus::Dispatched);
	}

	#[test]
	fn empty_code_and_comments_become_none() {
		let mut d = draft();
		d.code = Some("  ".to_string());
		d.comments = Some(String::new());
		let order = build_order(&d).unwrap();
		assert_eq!(order.code, None);
		assert_eq!(order.comments, None);
	}
}
