// Promotion-Based Cost Calculation
//
// For each order line item the engine evaluates every detail of every
// active promotion targeting that item, computes the discount each one
// would yield, and applies only the single best detail. Promotions are
// mutually exclusive per item: best-of, never cumulative.

pub mod types;

pub use types::{
    OrderLineItem, Promotion, PromotionDetail, PromotionDetailType, PromotionOutcome,
};

use crate::stores::{bounded, PromotionStore};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// A detail applied to a hypothetical line item, with the discount it yields
#[derive(Debug, Clone)]
struct Candidate {
    detail_id: Uuid,
    charged_quantity: u32,
    free_quantity: u32,
    discounted_unit_price: Option<Decimal>,
    discount_value: Decimal,
}

/// Promotion engine
///
/// Pure and stateless: identical inputs against an unchanged catalog
/// produce identical outcomes. A failing catalog read degrades to
/// full-price ordering rather than failing the calculation.
pub struct PromotionEngine {
    promotions: Arc<dyn PromotionStore>,
    store_timeout: Option<Duration>,
}

impl PromotionEngine {
    /// Create an engine over a promotion catalog
    pub fn new(promotions: Arc<dyn PromotionStore>) -> Self {
        Self {
            promotions,
            store_timeout: None,
        }
    }

    /// Create an engine whose catalog reads are bounded by a deadline
    pub fn with_timeout(promotions: Arc<dyn PromotionStore>, store_timeout: Duration) -> Self {
        Self {
            promotions,
            store_timeout: Some(store_timeout),
        }
    }

    /// Apply the best active promotion to each line item, evaluated now.
    ///
    /// Returns one outcome per input item, in input order.
    pub async fn apply(
        &self,
        business_id: i32,
        line_items: &[OrderLineItem],
    ) -> Vec<PromotionOutcome> {
        self.apply_at(business_id, line_items, Utc::now()).await
    }

    /// Apply promotions as of an explicit evaluation time
    pub async fn apply_at(
        &self,
        business_id: i32,
        line_items: &[OrderLineItem],
        now: DateTime<Utc>,
    ) -> Vec<PromotionOutcome> {
        let promotions = match bounded(
            self.store_timeout,
            self.promotions.get_active(business_id, now),
        )
        .await
        {
            Ok(promotions) => promotions,
            Err(e) => {
                tracing::warn!(business_id, error = %e, "promotion lookup failed, pricing at full price");
                Vec::new()
            }
        };

        // The store pre-filters, but the activity window is re-checked so a
        // stale catalog read can never discount an expired promotion.
        let details: Vec<&PromotionDetail> = promotions
            .iter()
            .filter(|p| p.is_active_at(now))
            .flat_map(|p| p.details.iter())
            .collect();

        line_items
            .iter()
            .map(|item| best_outcome(item, &details))
            .collect()
    }
}

/// Pick the winning detail for one line item and build its outcome
fn best_outcome(item: &OrderLineItem, details: &[&PromotionDetail]) -> PromotionOutcome {
    let best = details
        .iter()
        .filter(|d| d.item_id == item.item_id)
        .filter_map(|d| evaluate_detail(d, item))
        .fold(None::<Candidate>, |best, candidate| match best {
            None => Some(candidate),
            Some(current) => {
                // Largest absolute discount wins; equal discounts break
                // toward the lowest detail id so the result is deterministic
                // regardless of catalog iteration order.
                if candidate.discount_value > current.discount_value
                    || (candidate.discount_value == current.discount_value
                        && candidate.detail_id < current.detail_id)
                {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        });

    match best {
        Some(candidate) => {
            tracing::debug!(
                item_id = item.item_id,
                detail_id = %candidate.detail_id,
                discount = %candidate.discount_value,
                "promotion applied"
            );
            PromotionOutcome {
                item_id: item.item_id,
                original_quantity: item.quantity,
                charged_quantity: candidate.charged_quantity,
                free_quantity: candidate.free_quantity,
                unit_price: item.unit_price,
                discounted_unit_price: candidate.discounted_unit_price,
                applied_detail: Some(candidate.detail_id),
            }
        }
        None => PromotionOutcome::full_price(item),
    }
}

/// Evaluate one detail against one line item.
///
/// Details that would have no effect, and details with missing or invalid
/// parameters, yield no candidate: a zero-value discount must never
/// displace "no promotion".
fn evaluate_detail(detail: &PromotionDetail, item: &OrderLineItem) -> Option<Candidate> {
    match detail.detail_type {
        PromotionDetailType::Subtract => evaluate_subtract(detail, item),
        PromotionDetailType::Discount => evaluate_discount(detail, item),
    }
}

/// "Buy B, get A free", repeatable over full (B + A) cycles.
///
/// The remainder after the last full cycle charges up to B units; anything
/// past B in the remainder is free as well.
fn evaluate_subtract(detail: &PromotionDetail, item: &OrderLineItem) -> Option<Candidate> {
    let (base, add) = match (detail.base_amount, detail.add_amount) {
        (Some(base), Some(add)) if base > 0 && add > 0 => (base, add),
        _ => {
            tracing::warn!(detail_id = %detail.id, "subtract detail with invalid amounts skipped");
            return None;
        }
    };

    if item.quantity < base {
        return None;
    }

    let cycle = base + add;
    let full_sets = item.quantity / cycle;
    let remainder = item.quantity % cycle;

    let charged_from_remainder = if remainder >= base { base } else { remainder };
    let charged_quantity = full_sets * base + charged_from_remainder;
    let free_quantity = item.quantity - charged_quantity;

    if free_quantity == 0 {
        return None;
    }

    Some(Candidate {
        detail_id: detail.id,
        charged_quantity,
        free_quantity,
        discounted_unit_price: None,
        discount_value: Decimal::from(free_quantity) * item.unit_price,
    })
}

/// Flat percentage off the unit price; the full quantity stays billable
fn evaluate_discount(detail: &PromotionDetail, item: &OrderLineItem) -> Option<Candidate> {
    let hundred = Decimal::from(100);
    let percent = match detail.discount_percent {
        Some(p) if p >= Decimal::ZERO && p <= hundred => p,
        _ => {
            tracing::warn!(detail_id = %detail.id, "discount detail with invalid percent skipped");
            return None;
        }
    };

    let discounted_unit_price = item.unit_price * (hundred - percent) / hundred;
    let discount_value =
        (item.unit_price - discounted_unit_price) * Decimal::from(item.quantity);

    if discount_value <= Decimal::ZERO {
        return None;
    }

    Some(Candidate {
        detail_id: detail.id,
        charged_quantity: item.quantity,
        free_quantity: 0,
        discounted_unit_price: Some(discounted_unit_price),
        discount_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: u32, unit_price: Decimal) -> OrderLineItem {
        OrderLineItem {
            item_id: 10,
            quantity,
            unit_price,
        }
    }

    fn subtract_detail(base: u32, add: u32) -> PromotionDetail {
        PromotionDetail {
            id: Uuid::new_v4(),
            promotion_id: Uuid::new_v4(),
            item_id: 10,
            detail_type: PromotionDetailType::Subtract,
            base_amount: Some(base),
            add_amount: Some(add),
            discount_percent: None,
        }
    }

    fn discount_detail(percent: Decimal) -> PromotionDetail {
        PromotionDetail {
            id: Uuid::new_v4(),
            promotion_id: Uuid::new_v4(),
            item_id: 10,
            detail_type: PromotionDetailType::Discount,
            base_amount: None,
            add_amount: None,
            discount_percent: Some(percent),
        }
    }

    #[test]
    fn test_buy_two_get_one_free_quantity_seven() {
        // fullSets = floor(7/3) = 2, remainder = 1 -> charged 5, free 2
        let detail = subtract_detail(2, 1);
        let candidate = evaluate_subtract(&detail, &item(7, dec!(100))).unwrap();
        assert_eq!(candidate.charged_quantity, 5);
        assert_eq!(candidate.free_quantity, 2);
        assert_eq!(candidate.discount_value, dec!(200));
    }

    #[test]
    fn test_subtract_remainder_past_base_is_free() {
        // B=2, A=2, q=7: one full cycle (2 charged, 2 free), remainder 3
        // charges 2 and gives 1 free -> charged 4, free 3
        let detail = subtract_detail(2, 2);
        let candidate = evaluate_subtract(&detail, &item(7, dec!(100))).unwrap();
        assert_eq!(candidate.charged_quantity, 4);
        assert_eq!(candidate.free_quantity, 3);
    }

    #[test]
    fn test_subtract_below_threshold_no_effect() {
        let detail = subtract_detail(3, 1);
        assert!(evaluate_subtract(&detail, &item(2, dec!(100))).is_none());
    }

    #[test]
    fn test_subtract_exact_base_quantity_yields_nothing_free() {
        // q == B: eligible on paper but nothing becomes free
        let detail = subtract_detail(2, 1);
        assert!(evaluate_subtract(&detail, &item(2, dec!(100))).is_none());
    }

    #[test]
    fn test_subtract_invalid_amounts_skipped() {
        let mut detail = subtract_detail(0, 1);
        assert!(evaluate_subtract(&detail, &item(5, dec!(100))).is_none());

        detail = subtract_detail(2, 1);
        detail.add_amount = None;
        assert!(evaluate_subtract(&detail, &item(5, dec!(100))).is_none());
    }

    #[test]
    fn test_discount_twenty_percent() {
        let detail = discount_detail(dec!(20));
        let candidate = evaluate_discount(&detail, &item(3, dec!(1000))).unwrap();
        assert_eq!(candidate.discounted_unit_price, Some(dec!(800)));
        assert_eq!(candidate.charged_quantity, 3);
        assert_eq!(candidate.free_quantity, 0);
        assert_eq!(candidate.discount_value, dec!(600));
    }

    #[test]
    fn test_discount_zero_percent_is_no_candidate() {
        let detail = discount_detail(dec!(0));
        assert!(evaluate_discount(&detail, &item(3, dec!(1000))).is_none());
    }

    #[test]
    fn test_discount_out_of_range_percent_skipped() {
        assert!(evaluate_discount(&discount_detail(dec!(120)), &item(1, dec!(500))).is_none());
        assert!(evaluate_discount(&discount_detail(dec!(-5)), &item(1, dec!(500))).is_none());
    }

    #[test]
    fn test_best_outcome_prefers_larger_discount() {
        let weak = discount_detail(dec!(10));
        let strong = subtract_detail(1, 1); // half the quantity free
        let line = item(4, dec!(1000));

        let outcome = best_outcome(&line, &[&weak, &strong]);
        // subtract frees 2 units = 2000, discount saves 400
        assert_eq!(outcome.applied_detail, Some(strong.id));
        assert_eq!(outcome.charged_quantity, 2);
        assert_eq!(outcome.free_quantity, 2);
    }

    #[test]
    fn test_best_outcome_tie_breaks_on_lowest_detail_id() {
        // Two identical 20% discounts: the lower id must win in both orders
        let mut a = discount_detail(dec!(20));
        let mut b = discount_detail(dec!(20));
        if a.id > b.id {
            std::mem::swap(&mut a, &mut b);
        }
        let line = item(2, dec!(500));

        let forward = best_outcome(&line, &[&a, &b]);
        let reversed = best_outcome(&line, &[&b, &a]);
        assert_eq!(forward.applied_detail, Some(a.id));
        assert_eq!(reversed.applied_detail, Some(a.id));
    }

    #[test]
    fn test_best_outcome_ignores_other_items() {
        let mut foreign = discount_detail(dec!(50));
        foreign.item_id = 99;
        let line = item(2, dec!(500));

        let outcome = best_outcome(&line, &[&foreign]);
        assert!(outcome.applied_detail.is_none());
        assert_eq!(outcome.line_cost(), dec!(1000));
    }
}
