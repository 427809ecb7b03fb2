use super::{CardId, CatalogImportError, CreditCardProduct, PartnerValuations, RewardsType};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_products<R: Read>(
    reader: R,
) -> Result<Vec<CreditCardProduct>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut products = Vec::new();

    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = record?;
        // Header is line 1, so data rows start at 2.
        products.push(row.into_product(index + 2)?);
    }

    Ok(products)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    issuer: String,
    #[serde(default)]
    signup_bonus_value: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    signup_bonus_requirement: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    signup_bonus_timeframe: Option<String>,
    #[serde(default)]
    annual_fee: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    first_year_waived: bool,
    #[serde(default)]
    rewards_rate: Option<f64>,
    rewards_type: String,
    #[serde(default)]
    min_credit_score: Option<u16>,
    #[serde(default, deserialize_with = "flag")]
    is_business: bool,
    #[serde(default, deserialize_with = "optional_flag")]
    is_active: Option<bool>,
    #[serde(default)]
    cash_value: Option<f64>,
    #[serde(default)]
    hyatt_value: Option<f64>,
    #[serde(default)]
    southwest_value: Option<f64>,
    #[serde(default)]
    delta_value: Option<f64>,
    #[serde(default)]
    united_value: Option<f64>,
    #[serde(default)]
    american_value: Option<f64>,
    #[serde(default)]
    marriott_value: Option<f64>,
}

impl CatalogRow {
    fn into_product(self, row: usize) -> Result<CreditCardProduct, CatalogImportError> {
        let rewards_type =
            RewardsType::parse(&self.rewards_type).ok_or_else(|| CatalogImportError::InvalidRow {
                row,
                message: format!("unknown rewards_type '{}'", self.rewards_type),
            })?;

        Ok(CreditCardProduct {
            id: CardId(self.id),
            name: self.name,
            issuer: self.issuer,
            signup_bonus_value: self.signup_bonus_value.unwrap_or(0.0),
            signup_bonus_requirement: self.signup_bonus_requirement,
            signup_bonus_timeframe: self.signup_bonus_timeframe,
            annual_fee: self.annual_fee.unwrap_or(0.0),
            first_year_waived: self.first_year_waived,
            rewards_rate: self.rewards_rate.unwrap_or(0.0),
            rewards_type,
            min_credit_score: self.min_credit_score,
            is_business: self.is_business,
            is_active: self.is_active.unwrap_or(true),
            partner_valuations: PartnerValuations {
                cash: self.cash_value,
                hyatt: self.hyatt_value,
                southwest: self.southwest_value,
                delta: self.delta_value,
                united: self.united_value,
                american: self.american_value,
                marriott: self.marriott_value,
            },
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_flag(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid boolean '{value}'"))),
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    optional_flag(deserializer).map(|value| value.unwrap_or(false))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
