pub mod formatter;

pub use formatter::{
    format_factor, format_money, format_quote, format_tiers, format_tsv, should_use_colors,
};
