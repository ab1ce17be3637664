use serde::{Deserialize, Serialize};

use crate::pricing::PricingConfig;

#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rate card; built-in defaults apply when omitted
    #[serde(default)]
    pub pricing: Option<PricingConfig>,
}

impl Config {
    /// Pricing config in effect: the file's rate card or the defaults
    pub fn effective_pricing(&self) -> PricingConfig {
        self.pricing.clone().unwrap_or_default()
    }
}
