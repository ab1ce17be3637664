use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{self, QuoteError};

/// Property classes the rate card prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Industrial,
    Medical,
    Office,
    Other,
    Restaurant,
    Retail,
    Warehouse,
    #[serde(rename = "Multi-Family")]
    MultiFamily,
    #[serde(rename = "Residential/LTR")]
    ResidentialLtr,
    #[serde(rename = "Short-Term Rental")]
    ShortTermRental,
}

impl PropertyType {
    pub const ALL: [PropertyType; 10] = [
        PropertyType::Industrial,
        PropertyType::Medical,
        PropertyType::Office,
        PropertyType::Other,
        PropertyType::Restaurant,
        PropertyType::Retail,
        PropertyType::Warehouse,
        PropertyType::MultiFamily,
        PropertyType::ResidentialLtr,
        PropertyType::ShortTermRental,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Industrial => "Industrial",
            PropertyType::Medical => "Medical",
            PropertyType::Office => "Office",
            PropertyType::Other => "Other",
            PropertyType::Restaurant => "Restaurant",
            PropertyType::Retail => "Retail",
            PropertyType::Warehouse => "Warehouse",
            PropertyType::MultiFamily => "Multi-Family",
            PropertyType::ResidentialLtr => "Residential/LTR",
            PropertyType::ShortTermRental => "Short-Term Rental",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyType {
    type Err = QuoteError;

    /// Case-insensitive; spaces, hyphens and underscores are interchangeable
    /// ("multi family", "Multi-Family" and "multi_family" all match).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        PropertyType::ALL
            .into_iter()
            .find(|t| normalize_label(t.label()) == wanted)
            .ok_or_else(|| {
                QuoteError::invalid(
                    "property_type",
                    format!("unknown property type '{}'", s.trim()),
                )
            })
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Delivery speed requested for the engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RushOption {
    #[default]
    NoRush,
    FourWeek,
    TwoWeek,
}

impl RushOption {
    pub fn label(&self) -> &'static str {
        match self {
            RushOption::NoRush => "No Rush",
            RushOption::FourWeek => "4-week rush",
            RushOption::TwoWeek => "2-week rush",
        }
    }
}

impl fmt::Display for RushOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RushOption {
    type Err = QuoteError;

    /// Accepts the canonical labels and the intake form's labels
    /// ("No Rush", "4W $500", "2W $1000").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let rush = match lower.as_str() {
            "" | "no rush" | "no_rush" | "none" | "no" => RushOption::NoRush,
            "4w $500" | "4w" | "4-week" | "4-week rush" | "4 week" | "four_week" => {
                RushOption::FourWeek
            }
            "2w $1000" | "2w" | "2-week" | "2-week rush" | "2 week" | "two_week" => {
                RushOption::TwoWeek
            }
            _ => {
                return Err(QuoteError::invalid(
                    "rush",
                    format!("unknown rush option '{}'", s.trim()),
                ))
            }
        };
        Ok(rush)
    }
}

/// Land portion of the purchase, either in dollars or as a share of the price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LandValue {
    Amount(f64),
    /// Fraction of the purchase price in `[0, 1]`
    Fraction(f64),
}

impl LandValue {
    /// Interpret a raw land value. When the dollar amount is not known the
    /// value is a percentage: `10` and `0.10` both mean ten percent.
    pub fn from_raw(value: f64, known_land_value: bool) -> error::Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(QuoteError::invalid(
                "land_value",
                format!("must be a non-negative number, got {}", value),
            ));
        }
        if known_land_value {
            return Ok(LandValue::Amount(value));
        }
        let fraction = if value > 1.0 { value / 100.0 } else { value };
        if fraction > 1.0 {
            return Err(QuoteError::invalid(
                "land_value",
                format!("percentage {} exceeds 100", value),
            ));
        }
        Ok(LandValue::Fraction(fraction))
    }

    /// Land value in dollars
    pub fn resolve(&self, purchase_price: f64) -> f64 {
        match self {
            LandValue::Amount(amount) => *amount,
            LandValue::Fraction(fraction) => purchase_price * fraction,
        }
    }
}

/// Quote request as it arrives from a form or request file.
///
/// Numeric fields are deliberately loose; [`PropertyInputs::try_from`] does
/// the domain checks and names the offending field on failure.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QuoteRequest {
    pub purchase_price: f64,

    /// Dollars when `known_land_value` is true, otherwise a percentage
    pub land_value: f64,

    #[serde(default)]
    pub known_land_value: bool,

    #[serde(default)]
    pub capex: f64,

    #[serde(default)]
    pub sqft_building: f64,

    #[serde(default)]
    pub acres_land: f64,

    pub property_type: String,

    #[serde(default = "default_count")]
    pub floors: i64,

    #[serde(default = "default_count")]
    pub num_properties: i64,

    /// Optional; the zip factor is neutral, so a missing zip prices the same
    #[serde(default)]
    pub zip_code: Option<String>,

    #[serde(default)]
    pub rush: Option<String>,

    #[serde(default)]
    pub premium: bool,

    #[serde(default)]
    pub referral: bool,

    #[serde(default)]
    pub price_override: Option<f64>,

    #[serde(default)]
    pub override_approver: Option<String>,
}

fn default_count() -> i64 {
    1
}

/// Validated attributes for one quote.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInputs {
    pub purchase_price: f64,
    pub land_value: LandValue,
    pub capex: f64,
    pub sqft_building: u64,
    pub acres_land: f64,
    pub property_type: PropertyType,
    pub floors: u32,
    pub num_properties: u32,
    pub zip_code: Option<String>,
    pub rush: RushOption,
    pub premium: bool,
    pub referral: bool,
    pub price_override: Option<f64>,
    pub override_approver: Option<String>,
}

impl PropertyInputs {
    /// Purchase price plus capital expenditures
    pub fn cost_basis(&self) -> f64 {
        self.purchase_price + self.capex
    }

    /// Resolved land value in dollars
    pub fn land_amount(&self) -> f64 {
        self.land_value.resolve(self.purchase_price)
    }

    /// Depreciable building value: purchase price minus land plus capex
    pub fn building_value(&self) -> f64 {
        self.purchase_price - self.land_amount() + self.capex
    }
}

impl TryFrom<QuoteRequest> for PropertyInputs {
    type Error = QuoteError;

    fn try_from(req: QuoteRequest) -> Result<Self, Self::Error> {
        let purchase_price = non_negative("purchase_price", req.purchase_price)?;
        let capex = non_negative("capex", req.capex)?;
        let land_value = LandValue::from_raw(req.land_value, req.known_land_value)?;
        let sqft_building = whole_number("sqft_building", req.sqft_building)?;
        let acres_land = non_negative("acres_land", req.acres_land)?;
        let property_type = req.property_type.parse()?;
        let floors = positive_count("floors", req.floors)?;
        let num_properties = positive_count("num_properties", req.num_properties)?;
        let zip_code = zip_code(req.zip_code.as_deref())?;
        let rush = match req.rush.as_deref() {
            Some(label) => label.parse()?,
            None => RushOption::NoRush,
        };
        let override_approver = req
            .override_approver
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(PropertyInputs {
            purchase_price,
            land_value,
            capex,
            sqft_building,
            acres_land,
            property_type,
            floors,
            num_properties,
            zip_code,
            rush,
            premium: req.premium,
            referral: req.referral,
            price_override: req.price_override,
            override_approver,
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> error::Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(QuoteError::invalid(
            field,
            format!("must be a non-negative number, got {}", value),
        ))
    }
}

fn whole_number(field: &'static str, value: f64) -> error::Result<u64> {
    let value = non_negative(field, value)?;
    if value.fract() != 0.0 {
        return Err(QuoteError::invalid(
            field,
            format!("must be a whole number, got {}", value),
        ));
    }
    Ok(value as u64)
}

fn positive_count(field: &'static str, value: i64) -> error::Result<u32> {
    if value < 1 {
        return Err(QuoteError::invalid(
            field,
            format!("must be at least 1, got {}", value),
        ));
    }
    u32::try_from(value)
        .map_err(|_| QuoteError::invalid(field, format!("{} is too large", value)))
}

/// Five digits, optionally followed by a ZIP+4 suffix. Absent or blank is
/// accepted as no zip.
fn zip_code(raw: Option<&str>) -> error::Result<Option<String>> {
    let zip = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(zip) => zip,
    };
    let (base, plus4) = match zip.split_once('-') {
        Some((base, plus4)) => (base, Some(plus4)),
        None => (zip, None),
    };
    let digits = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_digit());
    if digits(base, 5) && plus4.map_or(true, |p| digits(p, 4)) {
        Ok(Some(zip.to_string()))
    } else {
        Err(QuoteError::invalid(
            "zip_code",
            format!("expected a 5-digit ZIP code, got '{}'", zip),
        ))
    }
}

/// Scenario A inputs shared by unit tests across the crate
#[cfg(test)]
pub(crate) fn sample_inputs() -> PropertyInputs {
    PropertyInputs {
        purchase_price: 1_000_000.0,
        land_value: LandValue::Amount(150_000.0),
        capex: 0.0,
        sqft_building: 38_000,
        acres_land: 2.0,
        property_type: PropertyType::MultiFamily,
        floors: 2,
        num_properties: 1,
        zip_code: Some("85260".to_string()),
        rush: RushOption::NoRush,
        premium: false,
        referral: false,
        price_override: None,
        override_approver: None,
    }
}
