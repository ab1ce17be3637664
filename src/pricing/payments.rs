use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::money::round_cents;

/// Paying in full up front earns 9% off
pub const UPFRONT_MULTIPLIER: f64 = 0.91;
pub const PAY_OVER_TIME_NOTE: &str = "Up to 36 months";

/// A calendar-day window (inclusive at both ends) that discounts every
/// payment figure. Dates are `(month, day)` pairs and repeat every year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalWindow {
    pub start: (u32, u32),
    pub end: (u32, u32),
    pub multiplier: f64,
}

impl SeasonalWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        let day = (date.month(), date.day());
        day >= self.start && day <= self.end
    }
}

pub const SEASONAL_WINDOWS: [SeasonalWindow; 4] = [
    SeasonalWindow {
        start: (4, 15),
        end: (5, 15),
        multiplier: 0.90,
    },
    SeasonalWindow {
        start: (5, 16),
        end: (6, 15),
        multiplier: 0.95,
    },
    SeasonalWindow {
        start: (10, 15),
        end: (11, 15),
        multiplier: 0.90,
    },
    SeasonalWindow {
        start: (11, 16),
        end: (12, 15),
        multiplier: 0.95,
    },
];

/// Discount multiplier in effect on `date`: 0.90, 0.95 or 1.00.
pub fn seasonal_discount(date: NaiveDate) -> f64 {
    SEASONAL_WINDOWS
        .iter()
        .find(|w| w.contains(date))
        .map_or(1.0, |w| w.multiplier)
}

/// Equivalent ways to pay the quoted fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub originally_quoted: f64,
    pub standard_before_discounts: f64,
    pub pay_upfront: f64,
    pub pay_50_50: f64,
    pub pay_over_time: f64,
    pub pay_over_time_note: String,
    pub rush_fee: f64,
    pub seasonal_discount: f64,
}

/// Derive payment options from the adjusted fee. Each figure is rounded to
/// cents on its own; the figures are not reconciled against each other.
pub fn payment_plan(originally_quoted: f64, rush_fee: f64, disc: f64) -> PaymentPlan {
    let plan = PaymentPlan {
        originally_quoted: round_cents(originally_quoted),
        standard_before_discounts: round_cents(originally_quoted * disc),
        pay_upfront: round_cents(originally_quoted * UPFRONT_MULTIPLIER * disc),
        pay_50_50: round_cents(originally_quoted / 2.0 * disc),
        pay_over_time: round_cents(originally_quoted / 4.0 * disc),
        pay_over_time_note: PAY_OVER_TIME_NOTE.to_string(),
        rush_fee: round_cents(rush_fee),
        seasonal_discount: disc,
    };
    debug!(?plan, "payment plan");
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_ten_percent_windows() {
        for (m, d) in [(10, 15), (10, 20), (11, 15), (4, 15), (5, 1), (5, 15)] {
            assert_eq!(seasonal_discount(date(m, d)), 0.90, "{}/{}", m, d);
        }
    }

    #[test]
    fn test_five_percent_windows() {
        for (m, d) in [(11, 16), (12, 1), (12, 15), (5, 16), (6, 15)] {
            assert_eq!(seasonal_discount(date(m, d)), 0.95, "{}/{}", m, d);
        }
    }

    #[test]
    fn test_no_discount_outside_windows() {
        for (m, d) in [(1, 15), (4, 14), (6, 16), (7, 4), (10, 14), (12, 16), (12, 31)] {
            assert_eq!(seasonal_discount(date(m, d)), 1.0, "{}/{}", m, d);
        }
    }

    #[test]
    fn test_window_is_year_independent() {
        let leap = NaiveDate::from_ymd_opt(2028, 10, 20).unwrap();
        assert_eq!(seasonal_discount(leap), 0.90);
    }

    #[test]
    fn test_payment_plan_without_discount() {
        let plan = payment_plan(1908.19, 0.0, 1.0);
        assert_eq!(plan.originally_quoted, 1908.19);
        assert_eq!(plan.standard_before_discounts, 1908.19);
        assert_eq!(plan.pay_upfront, 1736.45);
        assert_eq!(plan.pay_50_50, 954.1);
        assert_eq!(plan.pay_over_time, 477.05);
        assert_eq!(plan.pay_over_time_note, "Up to 36 months");
    }

    #[test]
    fn test_discount_applies_to_every_figure() {
        let plain = payment_plan(2000.0, 0.0, 1.0);
        let discounted = payment_plan(2000.0, 0.0, 0.90);
        assert_eq!(discounted.originally_quoted, plain.originally_quoted);
        assert_eq!(discounted.standard_before_discounts, 1800.0);
        assert_eq!(discounted.pay_upfront, 1638.0);
        assert_eq!(discounted.pay_50_50, 900.0);
        assert_eq!(discounted.pay_over_time, 450.0);
        assert_eq!(discounted.seasonal_discount, 0.90);
    }

    #[test]
    fn test_upfront_is_nine_percent_off_standard() {
        for (amount, disc) in [(1908.19, 1.0), (3870.03, 0.95), (15_000.0, 0.90), (100.0, 1.0)] {
            let plan = payment_plan(amount, 0.0, disc);
            let restored = plan.pay_upfront + plan.pay_upfront * (1.0 / UPFRONT_MULTIPLIER - 1.0);
            assert!((restored - plan.standard_before_discounts).abs() < 0.02, "{}", amount);
        }
    }
}
