pub mod load;
pub mod types;

pub use load::load_request;
pub use types::{LandValue, PropertyInputs, PropertyType, QuoteRequest, RushOption};

#[cfg(test)]
pub(crate) use types::sample_inputs;
