use super::config::{PricingConfig, TierBucket};
use super::tiers::RangeOp;
use crate::property::PropertyType;

/// Validate pricing configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_pricing(config: &PricingConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let tables = [
        ("cost_basis", &config.tiers.cost_basis),
        ("sqft", &config.tiers.sqft),
        ("acres", &config.tiers.acres),
        ("floors", &config.tiers.floors),
        ("multi_properties", &config.tiers.multi_properties),
    ];
    for (name, buckets) in tables {
        validate_buckets(name, buckets, &mut errors);
    }

    for t in PropertyType::ALL {
        match config.property_types.get(&t) {
            None => errors.push(format!("pricing.property_types: missing factor for '{}'", t)),
            Some(f) if !is_valid_factor(*f) => errors.push(format!(
                "pricing.property_types.{}: factor must be positive, got {}",
                t, f
            )),
            Some(_) => {}
        }
    }

    let fees = [
        ("four_week", config.rush_fees.four_week),
        ("two_week", config.rush_fees.two_week),
    ];
    for (name, fee) in fees {
        if !fee.is_finite() || fee < 0.0 {
            errors.push(format!(
                "pricing.rush_fees.{}: must be non-negative, got {}",
                name, fee
            ));
        }
    }

    let pcts = [
        ("premium_uplift_pct", config.premium_uplift_pct),
        ("referral_pct", config.referral_pct),
    ];
    for (name, pct) in pcts {
        if !(0.0..=1.0).contains(&pct) {
            errors.push(format!(
                "pricing.{}: must be a fraction between 0 and 1, got {}",
                name, pct
            ));
        }
    }

    if config
        .override_approvers
        .iter()
        .any(|name| name.trim().is_empty())
    {
        errors.push("pricing.override_approvers: names must not be blank".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_buckets(name: &str, buckets: &[TierBucket], errors: &mut Vec<String>) {
    if buckets.is_empty() {
        errors.push(format!("pricing.tiers.{}: at least one tier is required", name));
        return;
    }
    for (i, bucket) in buckets.iter().enumerate() {
        if let Err(e) = RangeOp::parse(&bucket.range) {
            errors.push(format!(
                "pricing.tiers.{}[{}].range: invalid '{}' - {}",
                name, i, bucket.range, e
            ));
        }
        if !is_valid_factor(bucket.factor) {
            errors.push(format!(
                "pricing.tiers.{}[{}].factor: must be positive, got {}",
                name, i, bucket.factor
            ));
        }
    }
}

fn is_valid_factor(factor: f64) -> bool {
    factor.is_finite() && factor > 0.0
}
