//! Credit card catalog model and the CSV importer that hydrates it.

mod parser;
mod sample;

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub String);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reward currency tag carried by each catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardsType {
    CashBack,
    TravelPoints,
    AirlineMiles,
    HotelPoints,
}

impl RewardsType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashBack => "cash_back",
            Self::TravelPoints => "travel_points",
            Self::AirlineMiles => "airline_miles",
            Self::HotelPoints => "hotel_points",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash_back" | "cashback" | "cash back" => Some(Self::CashBack),
            "travel_points" | "travel" | "points" => Some(Self::TravelPoints),
            "airline_miles" | "miles" => Some(Self::AirlineMiles),
            "hotel_points" => Some(Self::HotelPoints),
            _ => None,
        }
    }
}

/// Dollar value of a signup bonus when redeemed through each partner program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerValuations {
    #[serde(default)]
    pub cash: Option<f64>,
    #[serde(default)]
    pub hyatt: Option<f64>,
    #[serde(default)]
    pub southwest: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub united: Option<f64>,
    #[serde(default)]
    pub american: Option<f64>,
    #[serde(default)]
    pub marriott: Option<f64>,
}

/// Immutable catalog entry supplied by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardProduct {
    pub id: CardId,
    pub name: String,
    pub issuer: String,
    pub signup_bonus_value: f64,
    #[serde(default)]
    pub signup_bonus_requirement: Option<String>,
    #[serde(default)]
    pub signup_bonus_timeframe: Option<String>,
    pub annual_fee: f64,
    #[serde(default)]
    pub first_year_waived: bool,
    /// Percentage earned per dollar, stored as a plain number (`2.0` is 2%).
    pub rewards_rate: f64,
    pub rewards_type: RewardsType,
    #[serde(default)]
    pub min_credit_score: Option<u16>,
    #[serde(default)]
    pub is_business: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub partner_valuations: PartnerValuations,
}

fn default_active() -> bool {
    true
}

/// Errors raised while reading a catalog export.
#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read card catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid card catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Loads catalog exports into [`CreditCardProduct`] values.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CreditCardProduct>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CreditCardProduct>, CatalogImportError> {
        parser::parse_products(reader)
    }
}

/// Built-in catalog used by the demo command and when no export is configured.
pub struct CardCatalog;

impl CardCatalog {
    pub fn sample() -> Vec<CreditCardProduct> {
        sample::products()
    }
}
