use super::{CardId, CreditCardProduct, PartnerValuations, RewardsType};

struct Entry {
    id: &'static str,
    name: &'static str,
    issuer: &'static str,
    bonus: f64,
    requirement: Option<&'static str>,
    annual_fee: f64,
    first_year_waived: bool,
    rate: f64,
    rewards_type: RewardsType,
    min_credit_score: Option<u16>,
    is_business: bool,
    valuations: PartnerValuations,
}

fn cash_only(value: f64) -> PartnerValuations {
    PartnerValuations {
        cash: Some(value),
        ..PartnerValuations::default()
    }
}

fn timeframe_of(requirement: &str) -> Option<String> {
    requirement
        .split_once("first ")
        .map(|(_, window)| window.trim().to_string())
}

pub(super) fn products() -> Vec<CreditCardProduct> {
    entries()
        .into_iter()
        .map(|entry| CreditCardProduct {
            id: CardId(entry.id.to_string()),
            name: entry.name.to_string(),
            issuer: entry.issuer.to_string(),
            signup_bonus_value: entry.bonus,
            signup_bonus_requirement: entry.requirement.map(str::to_string),
            signup_bonus_timeframe: entry.requirement.and_then(timeframe_of),
            annual_fee: entry.annual_fee,
            first_year_waived: entry.first_year_waived,
            rewards_rate: entry.rate,
            rewards_type: entry.rewards_type,
            min_credit_score: entry.min_credit_score,
            is_business: entry.is_business,
            is_active: true,
            partner_valuations: entry.valuations,
        })
        .collect()
}

fn entries() -> Vec<Entry> {
    vec![
        Entry {
            id: "chase-sapphire-preferred",
            name: "Chase Sapphire Preferred",
            issuer: "Chase",
            bonus: 750.0,
            requirement: Some("Spend $4,000 in the first 3 months"),
            annual_fee: 95.0,
            first_year_waived: false,
            rate: 1.0,
            rewards_type: RewardsType::TravelPoints,
            min_credit_score: Some(700),
            is_business: false,
            valuations: PartnerValuations {
                cash: Some(600.0),
                hyatt: Some(1320.0),
                southwest: Some(900.0),
                united: Some(720.0),
                marriott: Some(420.0),
                ..PartnerValuations::default()
            },
        },
        Entry {
            id: "chase-ink-business-preferred",
            name: "Chase Ink Business Preferred",
            issuer: "Chase",
            bonus: 1000.0,
            requirement: Some("Spend $8,000 in the first 3 months"),
            annual_fee: 95.0,
            first_year_waived: false,
            rate: 1.0,
            rewards_type: RewardsType::TravelPoints,
            min_credit_score: Some(700),
            is_business: true,
            valuations: PartnerValuations {
                cash: Some(1000.0),
                hyatt: Some(2200.0),
                ..PartnerValuations::default()
            },
        },
        Entry {
            id: "amex-platinum",
            name: "The Platinum Card from American Express",
            issuer: "American Express",
            bonus: 1600.0,
            requirement: Some("Spend $8,000 in your first 6 months"),
            annual_fee: 695.0,
            first_year_waived: false,
            rate: 1.0,
            rewards_type: RewardsType::TravelPoints,
            min_credit_score: Some(720),
            is_business: false,
            valuations: PartnerValuations {
                cash: Some(800.0),
                delta: Some(960.0),
                marriott: Some(560.0),
                ..PartnerValuations::default()
            },
        },
        Entry {
            id: "amex-gold",
            name: "American Express Gold Card",
            issuer: "American Express",
            bonus: 600.0,
            requirement: Some("Spend $6,000 in your first 6 months"),
            annual_fee: 325.0,
            first_year_waived: false,
            rate: 1.0,
            rewards_type: RewardsType::TravelPoints,
            min_credit_score: Some(700),
            is_business: false,
            valuations: PartnerValuations {
                cash: Some(600.0),
                delta: Some(720.0),
                ..PartnerValuations::default()
            },
        },
        Entry {
            id: "amex-business-gold",
            name: "American Express Business Gold Card",
            issuer: "American Express",
            bonus: 1000.0,
            requirement: Some("Spend $15,000 in the first 3 months"),
            annual_fee: 375.0,
            first_year_waived: false,
            rate: 1.0,
            rewards_type: RewardsType::TravelPoints,
            min_credit_score: Some(700),
            is_business: true,
            valuations: cash_only(1000.0),
        },
        Entry {
            id: "capital-one-venture-x",
            name: "Capital One Venture X Rewards",
            issuer: "Capital One",
            bonus: 750.0,
            requirement: Some("Spend $4,000 in the first 3 months"),
            annual_fee: 395.0,
            first_year_waived: false,
            rate: 2.0,
            rewards_type: RewardsType::TravelPoints,
            min_credit_score: Some(720),
            is_business: false,
            valuations: PartnerValuations {
                cash: Some(750.0),
                united: Some(900.0),
                ..PartnerValuations::default()
            },
        },
        Entry {
            id: "citi-double-cash",
            name: "Citi Double Cash",
            issuer: "Citi",
            bonus: 200.0,
            requirement: Some("Spend $1,500 in the first 6 months"),
            annual_fee: 0.0,
            first_year_waived: true,
            rate: 2.0,
            rewards_type: RewardsType::CashBack,
            min_credit_score: Some(670),
            is_business: false,
            valuations: cash_only(200.0),
        },
        Entry {
            id: "wells-fargo-active-cash",
            name: "Wells Fargo Active Cash",
            issuer: "Wells Fargo",
            bonus: 200.0,
            requirement: Some("Spend $500 in the first 3 months"),
            annual_fee: 0.0,
            first_year_waived: true,
            rate: 2.0,
            rewards_type: RewardsType::CashBack,
            min_credit_score: Some(670),
            is_business: false,
            valuations: cash_only(200.0),
        },
        Entry {
            id: "delta-skymiles-blue",
            name: "Delta SkyMiles Blue American Express Card",
            issuer: "American Express",
            bonus: 120.0,
            requirement: Some("Spend $1,000 in the first 6 months"),
            annual_fee: 0.0,
            first_year_waived: true,
            rate: 1.0,
            rewards_type: RewardsType::AirlineMiles,
            min_credit_score: Some(670),
            is_business: false,
            valuations: PartnerValuations {
                delta: Some(120.0),
                ..PartnerValuations::default()
            },
        },
        Entry {
            id: "world-of-hyatt",
            name: "World of Hyatt Credit Card",
            issuer: "Chase",
            bonus: 660.0,
            requirement: Some("Spend $3,000 in the first 3 months"),
            annual_fee: 95.0,
            first_year_waived: false,
            rate: 1.0,
            rewards_type: RewardsType::HotelPoints,
            min_credit_score: Some(690),
            is_business: false,
            valuations: PartnerValuations {
                hyatt: Some(660.0),
                ..PartnerValuations::default()
            },
        },
        Entry {
            id: "discover-it-cash-back",
            name: "Discover it Cash Back",
            issuer: "Discover",
            bonus: 150.0,
            requirement: None,
            annual_fee: 0.0,
            first_year_waived: true,
            rate: 1.0,
            rewards_type: RewardsType::CashBack,
            min_credit_score: Some(640),
            is_business: false,
            valuations: cash_only(150.0),
        },
    ]
}
