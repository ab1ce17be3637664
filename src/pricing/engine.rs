use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::adjust::{adjust_fee, AdjustedFee};
use super::factors::{resolve_factors, FactorSet};
use super::models::{blend, candidates, BidCandidates};
use super::money::round_cents;
use super::payments::{payment_plan, seasonal_discount, PaymentPlan};
use super::rate_card::RateCard;
use crate::error::Result;
use crate::property::PropertyInputs;

/// A complete fee quote for one engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Fee after adjustments; what the client is asked to pay
    pub final_bid: f64,
    /// Blended bid after the floor, before adjustments
    pub base_quote: f64,
    pub factors: FactorSet,
    pub bids: BidCandidates,
    pub building_value: f64,
    pub land_value: f64,
    pub adjustments: AdjustedFee,
    pub payments: PaymentPlan,
    pub quoted_on: NaiveDate,
}

/// Run the full pricing pipeline.
///
/// `today` selects the seasonal discount window; pass it explicitly so the
/// same inputs always produce the same quote.
pub fn compute_quote(
    inputs: &PropertyInputs,
    card: &RateCard,
    today: NaiveDate,
) -> Result<Quote> {
    let factors = resolve_factors(inputs, card)?;

    let building_value = inputs.building_value();
    let bids = candidates(
        inputs.cost_basis(),
        building_value,
        inputs.num_properties,
        &factors,
    );
    let blended = blend(&bids);
    if blended.floored {
        debug!(selected = blended.selected, "bid raised to floor");
    }
    let base_quote = round_cents(blended.final_bid);

    let adjustments = adjust_fee(base_quote, inputs, card)?;
    let disc = seasonal_discount(today);
    let payments = payment_plan(adjustments.amount, adjustments.rush_fee, disc);

    info!(
        property_type = %inputs.property_type,
        base_quote,
        final_bid = adjustments.amount,
        seasonal_discount = disc,
        "quote computed"
    );

    Ok(Quote {
        final_bid: adjustments.amount,
        base_quote,
        factors,
        bids: BidCandidates {
            linear_bid: round_cents(bids.linear_bid),
            logistic_bid: round_cents(bids.logistic_bid),
            multi_properties_bid: round_cents(bids.multi_properties_bid),
        },
        building_value: round_cents(building_value),
        land_value: round_cents(inputs.land_amount()),
        adjustments,
        payments,
        quoted_on: today,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{sample_inputs, LandValue, PropertyType, RushOption};

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_sample_quote() {
        let quote = compute_quote(&sample_inputs(), &RateCard::default(), jan_15()).unwrap();
        assert_eq!(quote.base_quote, 1908.19);
        assert_eq!(quote.final_bid, 1908.19);
        assert_eq!(quote.bids.linear_bid, 1908.19);
        assert_eq!(quote.bids.multi_properties_bid, 1908.19);
        assert_eq!(quote.building_value, 850_000.0);
        assert_eq!(quote.land_value, 150_000.0);
        assert_eq!(quote.payments.originally_quoted, 1908.19);
        assert_eq!(quote.payments.pay_upfront, 1736.45);
        assert_eq!(quote.payments.seasonal_discount, 1.0);
    }

    #[test]
    fn test_floor_on_negative_building_value() {
        let mut inputs = sample_inputs();
        inputs.purchase_price = 100_000.0;
        inputs.land_value = LandValue::Amount(2_100_000.0);
        inputs.property_type = PropertyType::Warehouse;
        inputs.sqft_building = 0;
        inputs.acres_land = 0.0;
        let quote = compute_quote(&inputs, &RateCard::default(), jan_15()).unwrap();
        // Land worth more than the purchase drives the logistic bid toward zero
        assert!(quote.bids.logistic_bid < 1.0);
        assert_eq!(quote.base_quote, 100.0);
        assert_eq!(quote.final_bid, 100.0);
    }

    #[test]
    fn test_rush_lifts_final_bid_not_base_quote() {
        let mut inputs = sample_inputs();
        inputs.rush = RushOption::TwoWeek;
        let quote = compute_quote(&inputs, &RateCard::default(), jan_15()).unwrap();
        assert_eq!(quote.base_quote, 1908.19);
        assert_eq!(quote.final_bid, 2908.19);
        assert_eq!(quote.payments.rush_fee, 1000.0);
        assert_eq!(quote.payments.originally_quoted, 2908.19);
    }

    #[test]
    fn test_tier_gap_fails_whole_quote() {
        let mut inputs = sample_inputs();
        inputs.sqft_building = 120_000;
        let err = compute_quote(&inputs, &RateCard::default(), jan_15()).unwrap_err();
        assert_eq!(err.field(), Some("sqft_building"));
    }

    #[test]
    fn test_same_inputs_same_quote() {
        let card = RateCard::default();
        let first = compute_quote(&sample_inputs(), &card, jan_15()).unwrap();
        let second = compute_quote(&sample_inputs(), &card, jan_15()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_quote_serializes_with_documented_names() {
        let quote = compute_quote(&sample_inputs(), &RateCard::default(), jan_15()).unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        for key in ["final_bid", "base_quote", "factors", "payments"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        let payments = &json["payments"];
        for key in ["originally_quoted", "pay_upfront", "pay_50_50", "pay_over_time"] {
            assert!(payments.get(key).is_some(), "missing payments.{}", key);
        }
        assert_eq!(json["factors"]["multi_prop"], 0.7);
        assert_eq!(json["quoted_on"], "2026-01-15");
        assert!(json["adjustments"].get("override").is_some());
    }
}
