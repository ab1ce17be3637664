use serde::{Deserialize, Serialize};
use tracing::debug;

use super::factors::FactorSet;

/// Share of cost basis that becomes the linear model's variable cost:
/// 0.0572355 x 0.25 x 0.08.
pub const LINEAR_RATE: f64 = 0.0572355 * 0.25 * 0.08;
/// Fixed component of the linear model's base cost
pub const LINEAR_BASE_FEE: f64 = 4000.0;

/// Sigmoid ceiling (L)
pub const LOGISTIC_CEILING: f64 = 15_000.0;
/// Sigmoid steepness (k)
pub const LOGISTIC_STEEPNESS: f64 = 0.01;
/// Sigmoid midpoint in building-value dollars (x0)
pub const LOGISTIC_MIDPOINT: f64 = 3_500.0;
/// Building value is measured in thousands of dollars inside the exponent
pub const LOGISTIC_SCALE: f64 = 0.001;

/// Largest value the sigmoid may return; f64 rounds the far tail up to the
/// ceiling itself, so the result is held just below it
const LOGISTIC_MAX: f64 = LOGISTIC_CEILING - LOGISTIC_CEILING * f64::EPSILON;

/// Minimum fee for any engagement
pub const BID_FLOOR: f64 = 100.0;

/// The three independent fee estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BidCandidates {
    pub linear_bid: f64,
    pub logistic_bid: f64,
    pub multi_properties_bid: f64,
}

/// Outcome of blending the candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendResult {
    /// Candidate picked by the min/ceiling rule, before the floor
    pub selected: f64,
    pub final_bid: f64,
    /// True when the floor raised the bid
    pub floored: bool,
}

pub fn base_cost(cost_basis: f64) -> f64 {
    cost_basis * LINEAR_RATE + LINEAR_BASE_FEE
}

/// Base cost scaled by every resolved factor.
pub fn linear_bid(cost_basis: f64, factors: &FactorSet) -> f64 {
    base_cost(cost_basis) * factors.product()
}

/// Bounded sigmoid on building value; ignores tier factors. Always strictly
/// between 0 and the ceiling.
pub fn logistic_bid(building_value: f64) -> f64 {
    let exponent = -LOGISTIC_STEEPNESS * (building_value - LOGISTIC_MIDPOINT) * LOGISTIC_SCALE;
    (LOGISTIC_CEILING / (1.0 + exponent.exp())).clamp(f64::MIN_POSITIVE, LOGISTIC_MAX)
}

pub fn multi_properties_bid(linear_bid: f64, num_properties: u32) -> f64 {
    linear_bid * f64::from(num_properties)
}

pub fn candidates(
    cost_basis: f64,
    building_value: f64,
    num_properties: u32,
    factors: &FactorSet,
) -> BidCandidates {
    let linear = linear_bid(cost_basis, factors);
    let bids = BidCandidates {
        linear_bid: linear,
        logistic_bid: logistic_bid(building_value),
        multi_properties_bid: multi_properties_bid(linear, num_properties),
    };
    debug!(
        base_cost = base_cost(cost_basis),
        linear = bids.linear_bid,
        logistic = bids.logistic_bid,
        multi = bids.multi_properties_bid,
        "bid candidates"
    );
    bids
}

/// Pick the smallest candidate unless it ties the multi-property bid, in
/// which case the multi-property bid is used; then apply the floor.
pub fn blend(bids: &BidCandidates) -> BlendResult {
    let minimum_of_three = bids
        .linear_bid
        .min(bids.logistic_bid)
        .min(bids.multi_properties_bid);
    let selected = if minimum_of_three < bids.multi_properties_bid {
        minimum_of_three
    } else {
        bids.multi_properties_bid
    };
    let final_bid = selected.max(BID_FLOOR);
    BlendResult {
        selected,
        final_bid,
        floored: final_bid > selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_factors() -> FactorSet {
        FactorSet {
            cost_basis: 1.0,
            zip: 1.0,
            sqft: 1.0,
            acres: 1.0,
            property_type: 1.0,
            floors: 1.0,
            multi_prop: 1.0,
        }
    }

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_base_cost() {
        assert!(approx(base_cost(0.0), 4000.0, 1e-9));
        assert!(approx(base_cost(1_000_000.0), 5144.71, 1e-6));
    }

    #[test]
    fn test_linear_bid_uses_every_factor() {
        let base = base_cost(1_000_000.0);
        let mut factors = unit_factors();
        assert!(approx(linear_bid(1_000_000.0, &factors), base, 1e-9));

        // Doubling any single factor doubles the bid
        for i in 0..7 {
            factors = unit_factors();
            match i {
                0 => factors.cost_basis = 2.0,
                1 => factors.zip = 2.0,
                2 => factors.sqft = 2.0,
                3 => factors.acres = 2.0,
                4 => factors.property_type = 2.0,
                5 => factors.floors = 2.0,
                _ => factors.multi_prop = 2.0,
            }
            assert!(approx(linear_bid(1_000_000.0, &factors), base * 2.0, 1e-9), "factor {}", i);
        }
    }

    #[test]
    fn test_logistic_midpoint_is_half_ceiling() {
        assert!(approx(logistic_bid(LOGISTIC_MIDPOINT), 7500.0, 1e-9));
    }

    #[test]
    fn test_logistic_bounds() {
        for value in [
            -5_000_000.0,
            -100_000.0,
            0.0,
            3_500.0,
            100_000.0,
            850_000.0,
            2_000_000.0,
        ] {
            let bid = logistic_bid(value);
            assert!(bid > 0.0 && bid < LOGISTIC_CEILING, "value {} -> {}", value, bid);
        }
    }

    #[test]
    fn test_logistic_stays_inside_bounds_when_saturated() {
        for value in [3_700_000.0, 7_000_000.0, 1e12] {
            let bid = logistic_bid(value);
            assert!(bid < LOGISTIC_CEILING, "value {} -> {}", value, bid);
            assert!(bid > 14_999.99);
        }
        for value in [-80_000_000.0, -1e12] {
            let bid = logistic_bid(value);
            assert!(bid > 0.0, "value {} -> {}", value, bid);
            assert!(bid < 1e-6);
        }
    }

    #[test]
    fn test_logistic_is_increasing() {
        let mut previous = logistic_bid(-1_000_000.0);
        let mut value = -1_000_000.0;
        while value < 3_000_000.0 {
            value += 50_000.0;
            let bid = logistic_bid(value);
            assert!(bid > previous);
            previous = bid;
        }
    }

    #[test]
    fn test_multi_properties_bid_scales_linearly() {
        assert_eq!(multi_properties_bid(1000.0, 1), 1000.0);
        assert_eq!(multi_properties_bid(1000.0, 3), 3000.0);
    }

    #[test]
    fn test_blend_picks_minimum() {
        let result = blend(&BidCandidates {
            linear_bid: 4000.0,
            logistic_bid: 3000.0,
            multi_properties_bid: 12_000.0,
        });
        assert_eq!(result.selected, 3000.0);
        assert_eq!(result.final_bid, 3000.0);
        assert!(!result.floored);
    }

    #[test]
    fn test_blend_tie_goes_to_multi_properties_bid() {
        // Single property: linear and multi-property bids are equal
        let result = blend(&BidCandidates {
            linear_bid: 1908.19,
            logistic_bid: 14_996.0,
            multi_properties_bid: 1908.19,
        });
        assert_eq!(result.selected, 1908.19);
    }

    #[test]
    fn test_blend_multi_smallest() {
        let result = blend(&BidCandidates {
            linear_bid: 5000.0,
            logistic_bid: 6000.0,
            multi_properties_bid: 2500.0,
        });
        assert_eq!(result.selected, 2500.0);
    }

    #[test]
    fn test_blend_enforces_floor() {
        let result = blend(&BidCandidates {
            linear_bid: 40.0,
            logistic_bid: 0.5,
            multi_properties_bid: 40.0,
        });
        assert_eq!(result.selected, 0.5);
        assert_eq!(result.final_bid, BID_FLOOR);
        assert!(result.floored);
    }

    #[test]
    fn test_candidates_for_sample() {
        let factors = FactorSet {
            cost_basis: 0.97,
            zip: 1.0,
            sqft: 1.15,
            acres: 0.95,
            property_type: 0.50,
            floors: 1.0,
            multi_prop: 0.70,
        };
        let bids = candidates(1_000_000.0, 850_000.0, 1, &factors);
        assert!(approx(bids.linear_bid, 1908.19, 0.01));
        assert_eq!(bids.linear_bid, bids.multi_properties_bid);
        assert!(bids.logistic_bid > 14_990.0 && bids.logistic_bid < 15_000.0);
    }
}
