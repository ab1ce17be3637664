use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::money::round_cents;
use super::rate_card::RateCard;
use crate::error::{QuoteError, Result};
use crate::property::{PropertyInputs, RushOption};

/// One applied adjustment and its effect on the fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub label: String,       // e.g. "Rush", "Premium", "Referral", "Override"
    pub description: String, // e.g. "2-week rush -> +$1000.00", "x1.05"
    pub before: f64,
    pub after: f64,
}

/// Fee after rush, premium, referral and override handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedFee {
    /// Adjusted fee in cents precision
    pub amount: f64,
    pub rush_fee: f64,
    pub premium_uplift_pct: f64,
    pub referral_pct: f64,
    pub r#override: Option<f64>,
    pub steps: Vec<Adjustment>,
}

/// Apply adjustments to the blended bid in fixed order: rush surcharge,
/// premium uplift, referral discount. An authorized override replaces the
/// result of all three.
pub fn adjust_fee(
    final_bid: f64,
    inputs: &PropertyInputs,
    card: &RateCard,
) -> Result<AdjustedFee> {
    if let Some(amount) = inputs.price_override {
        return apply_override(final_bid, amount, inputs.override_approver.as_deref(), card);
    }

    let mut fee = final_bid;
    let mut steps = Vec::new();

    let rush_fee = card.rush_fee(inputs.rush);
    if inputs.rush != RushOption::NoRush {
        let before = fee;
        fee += rush_fee;
        steps.push(Adjustment {
            label: "Rush".to_string(),
            description: format!("{} -> +${:.2}", inputs.rush, rush_fee),
            before,
            after: fee,
        });
    }

    let premium_uplift_pct = if inputs.premium {
        card.premium_uplift_pct
    } else {
        0.0
    };
    if inputs.premium {
        let before = fee;
        fee *= 1.0 + premium_uplift_pct;
        steps.push(Adjustment {
            label: "Premium".to_string(),
            description: format!(
                "uplift {} -> x{}",
                format_pct(premium_uplift_pct),
                1.0 + premium_uplift_pct
            ),
            before,
            after: fee,
        });
    }

    let referral_pct = if inputs.referral {
        card.referral_pct
    } else {
        0.0
    };
    if inputs.referral {
        let before = fee;
        fee *= 1.0 - referral_pct;
        steps.push(Adjustment {
            label: "Referral".to_string(),
            description: format!(
                "discount {} -> x{}",
                format_pct(referral_pct),
                1.0 - referral_pct
            ),
            before,
            after: fee,
        });
    }

    debug!(final_bid, adjusted = fee, steps = steps.len(), "applied fee adjustments");
    Ok(AdjustedFee {
        amount: round_cents(fee),
        rush_fee,
        premium_uplift_pct,
        referral_pct,
        r#override: None,
        steps,
    })
}

fn apply_override(
    final_bid: f64,
    amount: f64,
    approver: Option<&str>,
    card: &RateCard,
) -> Result<AdjustedFee> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(QuoteError::invalid(
            "price_override",
            format!("must be a positive amount, got {}", amount),
        ));
    }
    let approver = match approver {
        Some(name) if card.is_override_approver(name) => name,
        other => {
            return Err(QuoteError::UnauthorizedOverride {
                amount,
                approver: other.map(str::to_string),
            })
        }
    };

    let amount = round_cents(amount);
    info!(approver, amount, computed = final_bid, "price override applied");
    Ok(AdjustedFee {
        amount,
        rush_fee: 0.0,
        premium_uplift_pct: 0.0,
        referral_pct: 0.0,
        r#override: Some(amount),
        steps: vec![Adjustment {
            label: "Override".to_string(),
            description: format!("set to ${:.2} by {}", amount, approver),
            before: final_bid,
            after: amount,
        }],
    })
}

fn format_pct(fraction: f64) -> String {
    format!("{}%", round_cents(fraction * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingConfig;
    use crate::property::sample_inputs;

    fn card_with(premium: f64, referral: f64, approvers: &[&str]) -> RateCard {
        RateCard::from_config(&PricingConfig {
            premium_uplift_pct: premium,
            referral_pct: referral,
            override_approvers: approvers.iter().map(|s| s.to_string()).collect(),
            ..PricingConfig::default()
        })
        .unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_no_adjustments() {
        let adjusted = adjust_fee(1908.19, &sample_inputs(), &RateCard::default()).unwrap();
        assert_eq!(adjusted.amount, 1908.19);
        assert_eq!(adjusted.rush_fee, 0.0);
        assert!(adjusted.steps.is_empty());
        assert!(adjusted.r#override.is_none());
    }

    #[test]
    fn test_rush_surcharges() {
        let card = RateCard::default();
        let mut inputs = sample_inputs();

        inputs.rush = RushOption::FourWeek;
        assert_eq!(adjust_fee(1000.0, &inputs, &card).unwrap().amount, 1500.0);

        inputs.rush = RushOption::TwoWeek;
        let adjusted = adjust_fee(1000.0, &inputs, &card).unwrap();
        assert_eq!(adjusted.amount, 2000.0);
        assert_eq!(adjusted.rush_fee, 1000.0);
        assert_eq!(adjusted.steps[0].label, "Rush");
    }

    #[test]
    fn test_premium_defaults_to_no_uplift() {
        let mut inputs = sample_inputs();
        inputs.premium = true;
        let adjusted = adjust_fee(1000.0, &inputs, &RateCard::default()).unwrap();
        assert_eq!(adjusted.amount, 1000.0);
        assert_eq!(adjusted.premium_uplift_pct, 0.0);
    }

    #[test]
    fn test_adjustments_apply_in_order() {
        let card = card_with(0.05, 0.10, &[]);
        let mut inputs = sample_inputs();
        inputs.rush = RushOption::FourWeek;
        inputs.premium = true;
        inputs.referral = true;

        let adjusted = adjust_fee(1000.0, &inputs, &card).unwrap();
        // (1000 + 500) x 1.05 x 0.90
        assert_eq!(adjusted.amount, 1417.5);
        let labels: Vec<_> = adjusted.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Rush", "Premium", "Referral"]);
        assert!(approx(adjusted.steps[1].before, 1500.0));
        assert!(approx(adjusted.steps[1].after, 1575.0));
        assert!(approx(adjusted.steps[2].after, 1417.5));
    }

    #[test]
    fn test_flags_off_ignore_configured_pcts() {
        let card = card_with(0.05, 0.10, &[]);
        let adjusted = adjust_fee(1000.0, &sample_inputs(), &card).unwrap();
        assert_eq!(adjusted.amount, 1000.0);
        assert_eq!(adjusted.premium_uplift_pct, 0.0);
        assert_eq!(adjusted.referral_pct, 0.0);
    }

    #[test]
    fn test_authorized_override_replaces_fee() {
        let card = card_with(0.05, 0.10, &["sroelofs"]);
        let mut inputs = sample_inputs();
        inputs.rush = RushOption::TwoWeek;
        inputs.premium = true;
        inputs.price_override = Some(2500.0);
        inputs.override_approver = Some("SRoelofs".to_string());

        let adjusted = adjust_fee(1908.19, &inputs, &card).unwrap();
        assert_eq!(adjusted.amount, 2500.0);
        assert_eq!(adjusted.r#override, Some(2500.0));
        assert_eq!(adjusted.rush_fee, 0.0);
        assert_eq!(adjusted.steps.len(), 1);
        assert_eq!(adjusted.steps[0].before, 1908.19);
    }

    #[test]
    fn test_override_without_approver_is_unauthorized() {
        let card = card_with(0.0, 0.0, &["sroelofs"]);
        let mut inputs = sample_inputs();
        inputs.price_override = Some(2500.0);

        let err = adjust_fee(1908.19, &inputs, &card).unwrap_err();
        assert_eq!(
            err,
            QuoteError::UnauthorizedOverride {
                amount: 2500.0,
                approver: None
            }
        );
    }

    #[test]
    fn test_override_with_unknown_approver_is_unauthorized() {
        let card = card_with(0.0, 0.0, &["sroelofs"]);
        let mut inputs = sample_inputs();
        inputs.price_override = Some(2500.0);
        inputs.override_approver = Some("mallory".to_string());

        let err = adjust_fee(1908.19, &inputs, &card).unwrap_err();
        assert!(matches!(err, QuoteError::UnauthorizedOverride { .. }));
    }

    #[test]
    fn test_override_rejected_when_no_approvers_configured() {
        let mut inputs = sample_inputs();
        inputs.price_override = Some(2500.0);
        inputs.override_approver = Some("sroelofs".to_string());
        assert!(adjust_fee(1908.19, &inputs, &RateCard::default()).is_err());
    }

    #[test]
    fn test_non_positive_override_is_invalid() {
        let card = card_with(0.0, 0.0, &["sroelofs"]);
        let mut inputs = sample_inputs();
        inputs.override_approver = Some("sroelofs".to_string());
        for bad in [0.0, -10.0, f64::NAN] {
            inputs.price_override = Some(bad);
            let err = adjust_fee(1908.19, &inputs, &card).unwrap_err();
            assert_eq!(err.field(), Some("price_override"));
            assert!(matches!(err, QuoteError::InvalidInput { .. }));
        }
    }
}
