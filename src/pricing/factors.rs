use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_card::RateCard;
use super::tiers::TierTable;
use crate::error::{QuoteError, Result};
use crate::property::PropertyInputs;

/// Zip codes do not yet move the price.
pub const ZIP_FACTOR: f64 = 1.0;

/// One multiplier per pricing dimension. Each factor depends on exactly one
/// input field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorSet {
    pub cost_basis: f64,
    pub zip: f64,
    pub sqft: f64,
    pub acres: f64,
    pub property_type: f64,
    pub floors: f64,
    pub multi_prop: f64,
}

impl FactorSet {
    /// Product of all seven factors
    pub fn product(&self) -> f64 {
        self.cost_basis
            * self.zip
            * self.sqft
            * self.acres
            * self.property_type
            * self.floors
            * self.multi_prop
    }
}

pub fn resolve_factors(inputs: &PropertyInputs, card: &RateCard) -> Result<FactorSet> {
    let property_type = card
        .property_types
        .get(&inputs.property_type)
        .copied()
        .ok_or_else(|| {
            QuoteError::invalid(
                "property_type",
                format!("no factor configured for '{}'", inputs.property_type),
            )
        })?;

    let factors = FactorSet {
        cost_basis: resolve_tier(&card.cost_basis, inputs.cost_basis(), "purchase_price")?,
        zip: zip_factor(inputs.zip_code.as_deref()),
        sqft: resolve_tier(&card.sqft, inputs.sqft_building as f64, "sqft_building")?,
        acres: resolve_tier(&card.acres, inputs.acres_land, "acres_land")?,
        property_type,
        floors: resolve_tier(&card.floors, f64::from(inputs.floors), "floors")?,
        multi_prop: resolve_tier(
            &card.multi_properties,
            f64::from(inputs.num_properties),
            "num_properties",
        )?,
    };

    debug!(?factors, "resolved pricing factors");
    Ok(factors)
}

/// Look up `value` in `table`. Values that fall between tiers are an error
/// rather than a silent default.
pub fn resolve_tier(table: &TierTable, value: f64, field: &'static str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(QuoteError::invalid(
            field,
            format!("must be a non-negative number, got {}", value),
        ));
    }
    table
        .resolve(value)
        .ok_or_else(|| QuoteError::invalid(field, format!("no pricing tier covers {}", value)))
}

pub fn zip_factor(_zip_code: Option<&str>) -> f64 {
    ZIP_FACTOR
}
