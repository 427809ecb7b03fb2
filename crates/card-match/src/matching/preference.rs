use super::criteria::{MatchingCriteria, RewardsPreference};
use super::metadata::{CardCategory, CardMetadata};
use super::names::{PartnerKind, TravelPartner};
use super::savings::round_cents;

pub const CATEGORY_MATCH_MULTIPLIER: f64 = 1.2;
pub const PARTNER_MATCH_MULTIPLIER: f64 = 1.4;

/// Ranking-only multiplier. Never affects eligibility or the displayed breakdown.
pub fn preference_multiplier(metadata: &CardMetadata, criteria: &MatchingCriteria) -> f64 {
    match (criteria.preferred_rewards_type, metadata.category) {
        (RewardsPreference::CashBack | RewardsPreference::Flexible, CardCategory::CashBack) => {
            CATEGORY_MATCH_MULTIPLIER
        }
        (RewardsPreference::TravelPoints | RewardsPreference::Flexible, CardCategory::Travel) => {
            match metadata.partner {
                Some(partner) if prefers_partner(partner, criteria) => PARTNER_MATCH_MULTIPLIER,
                _ => CATEGORY_MATCH_MULTIPLIER,
            }
        }
        _ => 1.0,
    }
}

/// Net first-year value scaled by the preference multiplier. Negative values keep their sign,
/// so a boosted loss ranks lower than an unboosted one.
pub fn adjusted_savings(net_value: f64, metadata: &CardMetadata, criteria: &MatchingCriteria) -> f64 {
    round_cents(net_value * preference_multiplier(metadata, criteria))
}

pub(crate) fn prefers_partner(partner: TravelPartner, criteria: &MatchingCriteria) -> bool {
    let preferences = match partner.kind() {
        PartnerKind::Airline => &criteria.preferred_airlines,
        PartnerKind::Hotel => &criteria.preferred_hotels,
    };
    preferences
        .iter()
        .any(|entry| partner.matches_preference(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardId, CreditCardProduct, PartnerValuations, RewardsType};
    use crate::matching::metadata::MetadataCache;
    use std::sync::Arc;

    fn metadata(name: &str, rewards_type: RewardsType) -> Arc<CardMetadata> {
        let card = CreditCardProduct {
            id: CardId(name.to_string()),
            name: name.to_string(),
            issuer: "Bank".to_string(),
            signup_bonus_value: 0.0,
            signup_bonus_requirement: None,
            signup_bonus_timeframe: None,
            annual_fee: 0.0,
            first_year_waived: false,
            rewards_rate: 1.0,
            rewards_type,
            min_credit_score: None,
            is_business: false,
            is_active: true,
            partner_valuations: PartnerValuations::default(),
        };
        MetadataCache::new().metadata(&card)
    }

    #[test]
    fn cash_back_preference_boosts_only_cash_back_cards() {
        let criteria = MatchingCriteria::new(10_000.0, RewardsPreference::CashBack);
        let cash = metadata("Double Cash", RewardsType::CashBack);
        let travel = metadata("Venture", RewardsType::TravelPoints);

        assert_eq!(preference_multiplier(&cash, &criteria), 1.2);
        assert_eq!(preference_multiplier(&travel, &criteria), 1.0);
    }

    #[test]
    fn travel_preference_rewards_partner_matches() {
        let mut criteria = MatchingCriteria::new(10_000.0, RewardsPreference::TravelPoints);
        let delta = metadata("Delta SkyMiles Blue", RewardsType::AirlineMiles);
        let hyatt = metadata("World of Hyatt", RewardsType::HotelPoints);
        let cash = metadata("Double Cash", RewardsType::CashBack);

        assert_eq!(preference_multiplier(&delta, &criteria), 1.2);

        criteria.preferred_airlines = vec!["Delta".to_string()];
        assert_eq!(preference_multiplier(&delta, &criteria), 1.4);
        assert_eq!(preference_multiplier(&hyatt, &criteria), 1.2);
        assert_eq!(preference_multiplier(&cash, &criteria), 1.0);
    }

    #[test]
    fn flexible_preference_applies_both_rules() {
        let mut criteria = MatchingCriteria::new(10_000.0, RewardsPreference::Flexible);
        criteria.preferred_hotels = vec!["hyatt".to_string()];
        let hyatt = metadata("World of Hyatt", RewardsType::HotelPoints);
        let cash = metadata("Double Cash", RewardsType::CashBack);

        assert_eq!(preference_multiplier(&hyatt, &criteria), 1.4);
        assert_eq!(preference_multiplier(&cash, &criteria), 1.2);
    }

    #[test]
    fn negative_values_keep_their_sign() {
        let criteria = MatchingCriteria::new(25_000.0, RewardsPreference::CashBack);
        let cash = metadata("Double Cash", RewardsType::CashBack);
        assert_eq!(adjusted_savings(-50.0, &cash, &criteria), -60.0);
        assert_eq!(adjusted_savings(f64::NAN, &cash, &criteria), 0.0);
    }
}
