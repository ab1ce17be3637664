//! Fee quoting for cost-segregation engagements.
//!
//! The `seg-quote` binary is a thin wrapper; everything it does is available
//! from these modules.

pub mod config;
pub mod error;
pub mod output;
pub mod pricing;
pub mod property;

pub use error::QuoteError;
pub use pricing::{compute_quote, Quote, RateCard};
pub use property::{PropertyInputs, QuoteRequest};
