use anyhow::{Context, Result};
use std::collections::BTreeMap;

use super::config::{PricingConfig, RushFees};
use super::tiers::TierTable;
use super::validation::validate_pricing;
use crate::property::{PropertyType, RushOption};

/// Pricing configuration with every tier range parsed, ready for quoting.
///
/// Immutable once built; share it freely across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard {
    pub cost_basis: TierTable,
    pub sqft: TierTable,
    pub acres: TierTable,
    pub floors: TierTable,
    pub multi_properties: TierTable,
    pub property_types: BTreeMap<PropertyType, f64>,
    pub rush_fees: RushFees,
    pub premium_uplift_pct: f64,
    pub referral_pct: f64,
    override_approvers: Vec<String>,
}

impl RateCard {
    /// Validate and compile a pricing config. All validation problems are
    /// reported together in the error message.
    pub fn from_config(config: &PricingConfig) -> Result<Self> {
        if let Err(errors) = validate_pricing(config) {
            anyhow::bail!("Invalid pricing config:\n  - {}", errors.join("\n  - "));
        }

        let tiers = &config.tiers;
        Ok(Self {
            cost_basis: TierTable::from_buckets(&tiers.cost_basis)
                .context("pricing.tiers.cost_basis")?,
            sqft: TierTable::from_buckets(&tiers.sqft).context("pricing.tiers.sqft")?,
            acres: TierTable::from_buckets(&tiers.acres).context("pricing.tiers.acres")?,
            floors: TierTable::from_buckets(&tiers.floors).context("pricing.tiers.floors")?,
            multi_properties: TierTable::from_buckets(&tiers.multi_properties)
                .context("pricing.tiers.multi_properties")?,
            property_types: config.property_types.clone(),
            rush_fees: config.rush_fees.clone(),
            premium_uplift_pct: config.premium_uplift_pct,
            referral_pct: config.referral_pct,
            override_approvers: config
                .override_approvers
                .iter()
                .map(|name| name.trim().to_lowercase())
                .collect(),
        })
    }

    pub fn rush_fee(&self, rush: RushOption) -> f64 {
        match rush {
            RushOption::NoRush => 0.0,
            RushOption::FourWeek => self.rush_fees.four_week,
            RushOption::TwoWeek => self.rush_fees.two_week,
        }
    }

    /// Case-insensitive approver check
    pub fn is_override_approver(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.override_approvers.iter().any(|a| *a == name)
    }
}

impl Default for RateCard {
    fn default() -> Self {
        // Built-in tables are static and always compile
        Self::from_config(&PricingConfig::default())
            .expect("default pricing config must compile")
    }
}
