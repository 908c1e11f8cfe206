// Order cost aggregation
//
// Combines promotion outcomes, option costs, and the delivery price into
// the order totals. Purely additive; Decimal arithmetic keeps currency
// exact.

use crate::promotions::types::PromotionOutcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of all line costs after promotions
    pub items_total: Decimal,
    /// Items plus option costs
    pub subtotal: Decimal,
    /// Subtotal plus delivery, less any redeemed bonus
    pub total_sum: Decimal,
}

/// Service for aggregating order costs
pub struct CostAggregator;

impl CostAggregator {
    /// Aggregate line outcomes, option costs, and the delivery price.
    ///
    /// Zero line items and a zero delivery price produce all-zero totals.
    pub fn aggregate(
        line_outcomes: &[PromotionOutcome],
        option_costs: &[Decimal],
        delivery_price: Decimal,
    ) -> OrderTotals {
        let items_total: Decimal = line_outcomes.iter().map(PromotionOutcome::line_cost).sum();
        let options_total: Decimal = option_costs.iter().sum();
        let subtotal = items_total + options_total;

        OrderTotals {
            items_total,
            subtotal,
            total_sum: subtotal + delivery_price,
        }
    }

    /// Aggregate with a redeemed bonus subtracted from the final total.
    ///
    /// The total never goes below zero however large the bonus.
    pub fn aggregate_with_bonus(
        line_outcomes: &[PromotionOutcome],
        option_costs: &[Decimal],
        delivery_price: Decimal,
        bonus_used: Decimal,
    ) -> OrderTotals {
        let mut totals = Self::aggregate(line_outcomes, option_costs, delivery_price);
        totals.total_sum = (totals.total_sum - bonus_used).max(Decimal::ZERO);
        totals
    }
}
