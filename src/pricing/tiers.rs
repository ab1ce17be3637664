use anyhow::{bail, Context, Result};
use std::fmt;

use super::config::TierBucket;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let op = if let Some(val) = s.strip_prefix(">=") {
            RangeOp::GreaterEqual(parse_bound(val)?)
        } else if let Some(val) = s.strip_prefix("<=") {
            RangeOp::LessEqual(parse_bound(val)?)
        } else if let Some(val) = s.strip_prefix('>') {
            RangeOp::GreaterThan(parse_bound(val)?)
        } else if let Some(val) = s.strip_prefix('<') {
            RangeOp::LessThan(parse_bound(val)?)
        } else if s.contains('-') && !s.starts_with('-') {
            // Range format: "2501-5000"
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() != 2 {
                bail!("Invalid range format: {}", s)
            }
            let low = parse_bound(parts[0])?;
            let high = parse_bound(parts[1])?;
            if low > high {
                bail!("Range start {} is above its end {}", low, high)
            }
            RangeOp::Between(low, high)
        } else {
            RangeOp::Equal(parse_bound(s)?)
        };
        Ok(op)
    }

    pub fn matches(&self, value: f64) -> bool {
        match *self {
            RangeOp::LessThan(n) => value < n,
            RangeOp::LessEqual(n) => value <= n,
            RangeOp::GreaterThan(n) => value > n,
            RangeOp::GreaterEqual(n) => value >= n,
            RangeOp::Equal(n) => value == n,
            RangeOp::Between(low, high) => value >= low && value <= high,
        }
    }
}

/// Bounds accept thousands separators and a leading `$` ("$1,000,000").
fn parse_bound(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let value: f64 = cleaned
        .parse()
        .with_context(|| format!("Invalid number '{}'", s.trim()))?;
    if !value.is_finite() {
        bail!("Bound must be finite: {}", s.trim())
    }
    Ok(value)
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::LessEqual(n) => write!(f, "<={}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::GreaterEqual(n) => write!(f, ">={}", n),
            RangeOp::Equal(n) => write!(f, "{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub range: RangeOp,
    pub factor: f64,
}

/// Ordered tiers for one pricing dimension. The first tier whose range
/// contains the value wins.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self { tiers }
    }

    pub fn from_buckets(buckets: &[TierBucket]) -> Result<Self> {
        let tiers = buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let range = RangeOp::parse(&bucket.range)
                    .with_context(|| format!("tier {}: bad range '{}'", i, bucket.range))?;
                Ok(Tier {
                    range,
                    factor: bucket.factor,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tiers })
    }

    /// Factor of the first matching tier, or `None` when the value falls
    /// outside every tier.
    pub fn resolve(&self, value: f64) -> Option<f64> {
        self.tiers
            .iter()
            .find(|tier| tier.range.matches(value))
            .map(|tier| tier.factor)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}
