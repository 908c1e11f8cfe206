// Promotion domain types
//
// Promotions and their details are administrative configuration; the
// engine only reads them. `PromotionOutcome` is the per-line-item result,
// created and consumed within a single order assembly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How a promotion detail reduces the cost of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionDetailType {
    /// "Buy B, get A free": reduces the billable quantity, repeatable
    Subtract,

    /// Flat percentage off the unit price, quantity unchanged
    Discount,
}

impl fmt::Display for PromotionDetailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionDetailType::Subtract => write!(f, "subtract"),
            PromotionDetailType::Discount => write!(f, "discount"),
        }
    }
}

/// A single line-item rule attached to a promotion
///
/// Exactly one detail per (promotion, item) is considered at a time.
/// The parameter fields are optional because they come from loosely
/// validated admin tooling; details with missing or out-of-range
/// parameters are skipped, never applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionDetail {
    pub id: Uuid,
    pub promotion_id: Uuid,
    pub item_id: i32,
    pub detail_type: PromotionDetailType,
    /// SUBTRACT: quantity the customer pays for in each cycle
    pub base_amount: Option<u32>,
    /// SUBTRACT: quantity given free in each cycle
    pub add_amount: Option<u32>,
    /// DISCOUNT: percentage off the unit price, within [0, 100]
    pub discount_percent: Option<Decimal>,
}

/// A promotion window for one business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub business_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub visible: bool,
    pub details: Vec<PromotionDetail>,
}

impl Promotion {
    /// A promotion is active when it is visible and `now` falls inside the
    /// half-open window `[start_date, end_date)`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.visible && self.start_date <= now && now < self.end_date
    }
}

/// One order line as submitted for pricing; immutable during calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub item_id: i32,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Pricing outcome for one order line
///
/// `discounted_unit_price` is set only for DISCOUNT details; when absent,
/// the full `unit_price` is charged for each billable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionOutcome {
    pub item_id: i32,
    pub original_quantity: u32,
    pub charged_quantity: u32,
    pub free_quantity: u32,
    pub unit_price: Decimal,
    pub discounted_unit_price: Option<Decimal>,
    /// Id of the promotion detail that won, if any promotion applied
    pub applied_detail: Option<Uuid>,
}

impl PromotionOutcome {
    /// An outcome that charges every unit at full price
    pub fn full_price(item: &OrderLineItem) -> Self {
        Self {
            item_id: item.item_id,
            original_quantity: item.quantity,
            charged_quantity: item.quantity,
            free_quantity: 0,
            unit_price: item.unit_price,
            discounted_unit_price: None,
            applied_detail: None,
        }
    }

    /// Cost of this line: billable quantity times the effective unit price
    pub fn line_cost(&self) -> Decimal {
        let unit = self.discounted_unit_price.unwrap_or(self.unit_price);
        Decimal::from(self.charged_quantity) * unit
    }
}
