pub mod adjust;
pub mod config;
pub mod engine;
pub mod factors;
pub mod models;
pub mod money;
pub mod payments;
pub mod rate_card;
pub mod tiers;
pub mod validation;

pub use adjust::{AdjustedFee, Adjustment};
pub use config::*;
pub use engine::{compute_quote, Quote};
pub use factors::FactorSet;
pub use models::BidCandidates;
pub use payments::{seasonal_discount, PaymentPlan};
pub use rate_card::RateCard;
pub use tiers::{RangeOp, Tier, TierTable};
pub use validation::validate_pricing;
