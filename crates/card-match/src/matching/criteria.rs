use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const MIN_TUITION: f64 = 100.0;
pub const MAX_TUITION: f64 = 500_000.0;

/// Score assumed when the caller does not state a credit tier.
pub const DEFAULT_IMPLIED_SCORE: u16 = 700;

/// Self-reported credit band collected by the assessment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTier {
    Excellent,
    Good,
    Fair,
    Below,
}

impl CreditTier {
    pub const fn implied_score(self) -> u16 {
        match self {
            Self::Excellent => 750,
            Self::Good => 700,
            Self::Fair => 650,
            Self::Below => 300,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "below" => Some(Self::Below),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardsPreference {
    CashBack,
    TravelPoints,
    Flexible,
}

impl RewardsPreference {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashBack => "cash_back",
            Self::TravelPoints => "travel_points",
            Self::Flexible => "flexible",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "cash_back" => Some(Self::CashBack),
            "travel_points" => Some(Self::TravelPoints),
            "flexible" => Some(Self::Flexible),
            _ => None,
        }
    }
}

/// Bucketed count of card applications in the last 24 months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecentApplications {
    #[default]
    #[serde(rename = "0")]
    None,
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-4")]
    ThreeToFour,
    #[serde(rename = "5+")]
    FivePlus,
}

impl RecentApplications {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "0" => Some(Self::None),
            "1-2" => Some(Self::OneToTwo),
            "3-4" => Some(Self::ThreeToFour),
            "5+" => Some(Self::FivePlus),
            _ => None,
        }
    }
}

/// Normalized matching request produced by [`validate_criteria`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingCriteria {
    pub tuition_amount: f64,
    pub credit_score: Option<CreditTier>,
    pub preferred_rewards_type: RewardsPreference,
    pub current_cards: Vec<String>,
    pub amex_history: Vec<String>,
    pub preferred_airlines: Vec<String>,
    pub preferred_hotels: Vec<String>,
    pub open_to_business_cards: bool,
    pub recent_card_applications: RecentApplications,
    pub monthly_spend_capacity: Option<f64>,
}

impl MatchingCriteria {
    /// Criteria with every optional field at its default.
    pub fn new(tuition_amount: f64, preferred_rewards_type: RewardsPreference) -> Self {
        Self {
            tuition_amount,
            credit_score: None,
            preferred_rewards_type,
            current_cards: Vec::new(),
            amex_history: Vec::new(),
            preferred_airlines: Vec::new(),
            preferred_hotels: Vec::new(),
            open_to_business_cards: false,
            recent_card_applications: RecentApplications::None,
            monthly_spend_capacity: None,
        }
    }

    pub fn implied_credit_score(&self) -> u16 {
        self.credit_score
            .map(CreditTier::implied_score)
            .unwrap_or(DEFAULT_IMPLIED_SCORE)
    }
}

/// Single field-level problem reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validation failure carrying every offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriteriaValidationError {
    pub fields: Vec<FieldError>,
}

impl fmt::Display for CriteriaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self
            .fields
            .iter()
            .map(|error| format!("{} {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid matching criteria: {details}")
    }
}

impl std::error::Error for CriteriaValidationError {}

/// Validate an arbitrary JSON payload and normalize it into [`MatchingCriteria`].
///
/// Keys are read in camelCase with snake_case accepted as an alias. Every problem is
/// collected before returning so the caller can highlight all fields at once.
pub fn validate_criteria(raw: &Value) -> Result<MatchingCriteria, CriteriaValidationError> {
    let Some(object) = raw.as_object() else {
        return Err(CriteriaValidationError {
            fields: vec![FieldError::new("criteria", "must be a JSON object")],
        });
    };

    let mut errors = Vec::new();

    let tuition_amount = match lookup(object, "tuitionAmount") {
        None => {
            errors.push(FieldError::new("tuitionAmount", "is required"));
            0.0
        }
        Some(value) => match value.as_f64() {
            Some(amount) if amount.is_finite() && (MIN_TUITION..=MAX_TUITION).contains(&amount) => {
                amount
            }
            Some(_) => {
                errors.push(FieldError::new(
                    "tuitionAmount",
                    "must be between $100 and $500,000",
                ));
                0.0
            }
            None => {
                errors.push(FieldError::new("tuitionAmount", "must be a number"));
                0.0
            }
        },
    };

    let preferred_rewards_type = match lookup(object, "preferredRewardsType") {
        Some(Value::String(tag)) => RewardsPreference::parse(tag),
        _ => None,
    };
    if preferred_rewards_type.is_none() {
        errors.push(FieldError::new(
            "preferredRewardsType",
            "must be one of cash_back, travel_points, flexible",
        ));
    }

    let credit_score = optional_tag(
        object,
        "creditScore",
        CreditTier::parse,
        "excellent, good, fair, below",
        &mut errors,
    );
    let recent_card_applications = optional_tag(
        object,
        "recentCardApplications",
        RecentApplications::parse,
        "0, 1-2, 3-4, 5+",
        &mut errors,
    )
    .unwrap_or_default();

    let current_cards = string_list(object, "currentCards", &mut errors);
    let amex_history = string_list(object, "amexHistory", &mut errors);
    let preferred_airlines = string_list(object, "preferredAirlines", &mut errors);
    let preferred_hotels = string_list(object, "preferredHotels", &mut errors);

    let open_to_business_cards = match lookup(object, "openToBusinessCards") {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            errors.push(FieldError::new("openToBusinessCards", "must be a boolean"));
            false
        }
    };

    let monthly_spend_capacity = match lookup(object, "monthlySpendCapacity") {
        None => None,
        Some(value) => match value.as_f64() {
            Some(amount) if amount.is_finite() && amount >= 0.0 => Some(amount),
            _ => {
                errors.push(FieldError::new(
                    "monthlySpendCapacity",
                    "must be a non-negative number",
                ));
                None
            }
        },
    };

    match preferred_rewards_type {
        Some(preferred_rewards_type) if errors.is_empty() => Ok(MatchingCriteria {
            tuition_amount,
            credit_score,
            preferred_rewards_type,
            current_cards,
            amex_history,
            preferred_airlines,
            preferred_hotels,
            open_to_business_cards,
            recent_card_applications,
            monthly_spend_capacity,
        }),
        _ => Err(CriteriaValidationError { fields: errors }),
    }
}

/// Looks up a camelCase key, falling back to its snake_case spelling. JSON `null` counts as
/// absent.
fn lookup<'a>(object: &'a Map<String, Value>, camel: &str) -> Option<&'a Value> {
    object
        .get(camel)
        .or_else(|| object.get(&snake_case(camel)))
        .filter(|value| !value.is_null())
}

fn snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for ch in camel.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn optional_tag<T>(
    object: &Map<String, Value>,
    field: &str,
    parse: fn(&str) -> Option<T>,
    allowed: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = lookup(object, field)?;
    let parsed = value.as_str().and_then(parse);
    if parsed.is_none() {
        errors.push(FieldError::new(field, format!("must be one of {allowed}")));
    }
    parsed
}

fn string_list(object: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Vec<String> {
    let Some(value) = lookup(object, field) else {
        return Vec::new();
    };

    let Some(items) = value.as_array() else {
        errors.push(FieldError::new(field, "must be a list"));
        return Vec::new();
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(entry) if !entry.trim().is_empty() => entries.push(entry.trim().to_string()),
            Some(_) => {}
            None => {
                errors.push(FieldError::new(field, "must contain only strings"));
                return Vec::new();
            }
        }
    }
    entries
}
