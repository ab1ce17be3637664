use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::property::PropertyType;

/// Main pricing configuration (the rate card).
///
/// Every field has a default, so a config file only needs to list what it
/// changes. The defaults reproduce the published tier tables.
///
/// Example YAML:
/// ```yaml
/// pricing:
///   premium_uplift_pct: 0.05
///   referral_pct: 0.10
///   override_approvers: ["sroelofs"]
///   rush_fees:
///     four_week: 500
///     two_week: 1000
///   tiers:
///     floors:
///       - { range: "<=2", factor: 1.0 }
///       - { range: ">=3", factor: 1.1 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Ordered tier tables, one per tiered dimension
    pub tiers: TierTablesConfig,

    /// Multiplier per property type
    pub property_types: BTreeMap<PropertyType, f64>,

    /// Flat surcharges for expedited delivery
    pub rush_fees: RushFees,

    /// Uplift applied when premium service is requested (0.05 = 5%)
    pub premium_uplift_pct: f64,

    /// Discount applied to referred clients (0.10 = 10%)
    pub referral_pct: f64,

    /// Names allowed to authorize a manual price override
    pub override_approvers: Vec<String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tiers: TierTablesConfig::default(),
            property_types: default_property_types(),
            rush_fees: RushFees::default(),
            premium_uplift_pct: 0.0,
            referral_pct: 0.0,
            override_approvers: Vec::new(),
        }
    }
}

fn default_property_types() -> BTreeMap<PropertyType, f64> {
    PropertyType::ALL
        .into_iter()
        .map(|t| {
            let factor = match t {
                PropertyType::Industrial => 1.01,
                PropertyType::Medical => 1.15,
                PropertyType::Office => 1.05,
                PropertyType::Other => 1.10,
                PropertyType::Restaurant => 1.15,
                PropertyType::Retail => 1.05,
                PropertyType::Warehouse => 0.40,
                PropertyType::MultiFamily => 0.50,
                PropertyType::ResidentialLtr => 1.05,
                PropertyType::ShortTermRental => 1.05,
            };
            (t, factor)
        })
        .collect()
}

/// Rush delivery surcharges in dollars.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RushFees {
    pub four_week: f64,
    pub two_week: f64,
}

impl Default for RushFees {
    fn default() -> Self {
        Self {
            four_week: 500.0,
            two_week: 1000.0,
        }
    }
}

/// Tier tables for the tiered pricing dimensions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TierTablesConfig {
    /// Keyed on purchase price plus capex
    pub cost_basis: Vec<TierBucket>,
    pub sqft: Vec<TierBucket>,
    pub acres: Vec<TierBucket>,
    pub floors: Vec<TierBucket>,
    pub multi_properties: Vec<TierBucket>,
}

impl Default for TierTablesConfig {
    fn default() -> Self {
        Self {
            cost_basis: buckets(&[
                ("<500000", 0.95),
                ("<750000", 0.95),
                ("<1000000", 0.96),
                ("<2000000", 0.97),
                ("<3000000", 0.98),
                ("<4000000", 0.99),
                ("<5000000", 1.00),
                ("<6000000", 1.01),
                ("<7000000", 1.02),
                ("<8000000", 1.03),
                ("<9000000", 1.04),
                (">=9000000", 1.05),
            ]),
            sqft: buckets(&[
                ("0", 0.75),
                ("<=2500", 0.80),
                ("<=5000", 0.85),
                ("<=10000", 0.90),
                ("<=15000", 0.95),
                ("<=20000", 1.00),
                ("<=30000", 1.05),
                ("<=35000", 1.10),
                ("<=40000", 1.15),
                ("<=45000", 1.20),
                ("<=50000", 1.25),
                (">=550000", 9.00),
            ]),
            acres: buckets(&[
                ("0", 0.75),
                ("<=0.25", 0.80),
                ("<=0.5", 0.85),
                ("<=1", 0.90),
                ("<=2", 0.95),
                ("<=3", 1.00),
                ("<=4", 1.05),
                ("<=5", 1.10),
                ("<=6", 1.15),
                ("<=7", 1.20),
                ("<=8", 1.25),
                (">=12", 12.00),
            ]),
            floors: buckets(&[
                ("1-2", 1.00),
                ("3", 1.05),
                ("4-6", 1.10),
                ("7-9", 1.15),
                ("10", 1.20),
                (">=11", 1.30),
            ]),
            multi_properties: buckets(&[
                ("1", 0.70),
                ("2", 1.00),
                ("3", 1.05),
                ("4", 1.10),
                ("5-6", 1.15),
                ("7", 1.20),
                ("8-10", 1.25),
                ("11", 1.30),
                (">=12", 12.00),
            ]),
        }
    }
}

fn buckets(rows: &[(&str, f64)]) -> Vec<TierBucket> {
    rows.iter()
        .map(|(range, factor)| TierBucket {
            range: range.to_string(),
            factor: *factor,
        })
        .collect()
}

/// One tier: a range expression and the multiplier it selects.
///
/// Range format: "<N", "<=N", ">N", ">=N", "N", "N-M" (inclusive range)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TierBucket {
    pub range: String,
    pub factor: f64,
}
