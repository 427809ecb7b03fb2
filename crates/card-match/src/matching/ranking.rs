use serde::Serialize;

use super::criteria::RewardsPreference;
use super::metadata::CardCategory;
use super::partners::{partner_values, PartnerValue};
use super::savings::SavingsBreakdown;
use crate::catalog::CreditCardProduct;

/// Cards kept before the diversity rule appends alternates.
pub const SHORT_LIST_SIZE: usize = 3;

/// Eligible card with its unadjusted breakdown and preference-adjusted score.
#[derive(Debug, Clone)]
pub struct ScoredCard<'a> {
    pub card: &'a CreditCardProduct,
    pub category: CardCategory,
    pub breakdown: SavingsBreakdown,
    pub estimated_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardRecommendationResult {
    /// 1-based display position.
    pub rank: usize,
    pub card: CreditCardProduct,
    pub category: CardCategory,
    pub estimated_savings: f64,
    pub breakdown: SavingsBreakdown,
    pub partner_values: Vec<PartnerValue>,
}

/// Sort by adjusted savings, keep the short list and guarantee category diversity.
///
/// * `flexible`: both categories appear when both are eligible.
/// * `cash_back` / `travel_points`: the best card of the opposite category is appended when it
///   is not already shown, whatever its score.
///
/// Ties keep catalog order.
pub fn rank(scored: &[ScoredCard<'_>], preference: RewardsPreference) -> Vec<CardRecommendationResult> {
    let mut ordered: Vec<&ScoredCard<'_>> = scored.iter().collect();
    ordered.sort_by(|left, right| right.estimated_savings.total_cmp(&left.estimated_savings));

    let mut picked: Vec<&ScoredCard<'_>> = ordered.iter().take(SHORT_LIST_SIZE).copied().collect();

    let wanted: &[CardCategory] = match preference {
        RewardsPreference::Flexible => &[CardCategory::CashBack, CardCategory::Travel],
        RewardsPreference::CashBack => &[CardCategory::Travel],
        RewardsPreference::TravelPoints => &[CardCategory::CashBack],
    };

    for category in wanted {
        let Some(best) = ordered
            .iter()
            .copied()
            .find(|entry| entry.category == *category)
        else {
            continue;
        };
        let shown = picked.iter().any(|entry| entry.card.id == best.card.id);
        let represented = picked.iter().any(|entry| entry.category == *category);

        let missing = match preference {
            RewardsPreference::Flexible => !represented,
            _ => !shown,
        };
        if missing {
            picked.push(best);
        }
    }

    picked
        .into_iter()
        .enumerate()
        .map(|(index, entry)| CardRecommendationResult {
            rank: index + 1,
            card: entry.card.clone(),
            category: entry.category,
            estimated_savings: entry.estimated_savings,
            breakdown: entry.breakdown,
            partner_values: partner_values(entry.card),
        })
        .collect()
}
