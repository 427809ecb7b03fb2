use std::sync::Arc;

use serde_json::json;

use super::common::*;

use crate::catalog::{CardCatalog, CreditCardProduct};
use crate::matching::criteria::{CreditTier, RewardsPreference};
use crate::matching::engine::{MatchWarning, MatchingEngine};
use crate::matching::metadata::{CardCategory, MetadataCache};
use crate::matching::savings::SavingsBreakdown;

#[test]
fn tuition_scenario_ranks_travel_above_boosted_loss() {
    let catalog = scenario_catalog();
    let outcome = engine().recommend(&catalog, &criteria(25_000.0, RewardsPreference::CashBack));

    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.eligible_count, 2);
    assert_eq!(
        ids(outcome.recommendations.iter().map(|result| &result.card)),
        vec!["voyager-travel", "everyday-cash"]
    );

    let travel = &outcome.recommendations[0];
    assert_eq!(travel.rank, 1);
    assert_eq!(travel.category, CardCategory::Travel);
    assert_eq!(travel.breakdown.signup_bonus, 750.0);
    assert_eq!(travel.breakdown.rewards_earned, 500.0);
    assert_eq!(travel.breakdown.annual_fee_impact, -95.0);
    assert_eq!(travel.breakdown.processing_fee, 750.0);
    assert_eq!(travel.breakdown.net_first_year_value, 405.0);
    assert_eq!(travel.estimated_savings, 405.0);

    let cash = &outcome.recommendations[1];
    assert_eq!(cash.rank, 2);
    assert_eq!(cash.category, CardCategory::CashBack);
    assert_eq!(cash.breakdown.net_first_year_value, -50.0);
    assert_eq!(cash.estimated_savings, -60.0);
}

#[test]
fn tuition_scenario_offers_cross_issuer_split() {
    let catalog = scenario_catalog();
    let outcome = engine().recommend(&catalog, &criteria(25_000.0, RewardsPreference::CashBack));

    let split = outcome.split_strategy.expect("split proposed");
    assert_eq!(split.primary.card.id.0, "voyager-travel");
    assert_eq!(split.primary.amount, 4_000.0);
    assert!(split.primary.bonus_earned);
    assert_eq!(split.secondary.card.id.0, "everyday-cash");
    assert_eq!(split.secondary.amount, 21_000.0);
    assert!(split.secondary.bonus_earned);
    assert_eq!(split.total_savings, 605.0);
    assert_eq!(split.total_tuition, 25_000.0);
    assert_eq!(split.savings_percentage, 2.42);
}

#[test]
fn flexible_preference_shows_both_categories() {
    let catalog = CardCatalog::sample();
    let mut criteria = criteria(25_000.0, RewardsPreference::Flexible);
    criteria.credit_score = Some(CreditTier::Excellent);
    criteria.open_to_business_cards = true;

    let outcome = engine().recommend(&catalog, &criteria);
    let categories: Vec<_> = outcome
        .recommendations
        .iter()
        .map(|result| result.category)
        .collect();
    assert!(categories.contains(&CardCategory::CashBack));
    assert!(categories.contains(&CardCategory::Travel));
    assert!((3..=4).contains(&outcome.recommendations.len()));

    let ranks: Vec<_> = outcome.recommendations.iter().map(|result| result.rank).collect();
    let expected: Vec<_> = (1..=outcome.recommendations.len()).collect();
    assert_eq!(ranks, expected);
}

#[test]
fn ranking_is_repeatable_across_runs() {
    let catalog = CardCatalog::sample();
    let mut criteria = criteria(40_000.0, RewardsPreference::TravelPoints);
    criteria.credit_score = Some(CreditTier::Excellent);
    let engine = engine();

    let first = engine.recommend(&catalog, &criteria);
    let second = engine.recommend(&catalog, &criteria);
    assert_eq!(first.recommendations, second.recommendations);
    assert_eq!(first.split_strategy, second.split_strategy);
}

#[test]
fn empty_catalog_warns_instead_of_failing() {
    let outcome = engine().recommend(&[], &criteria(10_000.0, RewardsPreference::Flexible));
    assert!(outcome.recommendations.is_empty());
    assert!(outcome.split_strategy.is_none());
    assert_eq!(outcome.warnings, vec![MatchWarning::EmptyCatalog]);
}

#[test]
fn fully_filtered_catalog_warns_no_eligible_cards() {
    let catalog = CardCatalog::sample();
    let mut criteria = criteria(10_000.0, RewardsPreference::Flexible);
    criteria.credit_score = Some(CreditTier::Below);

    let outcome = engine().recommend(&catalog, &criteria);
    assert!(outcome.recommendations.is_empty());
    assert_eq!(outcome.eligible_count, 0);
    assert_eq!(outcome.warnings, vec![MatchWarning::NoEligibleCards]);
}

#[test]
fn overflowing_breakdown_is_scored_as_zero() {
    let overflow = CreditCardProduct {
        rewards_rate: f64::MAX,
        ..card("overflow", "Overflow Card", "Harbor Bank")
    };
    let catalog = vec![overflow, everyday_cash()];

    let outcome = engine().recommend(&catalog, &criteria(25_000.0, RewardsPreference::CashBack));
    assert_eq!(outcome.eligible_count, 2);

    let zeroed = outcome
        .recommendations
        .iter()
        .find(|result| result.card.id.0 == "overflow")
        .expect("overflowing card kept");
    assert_eq!(zeroed.breakdown, SavingsBreakdown::default());
    assert_eq!(zeroed.estimated_savings, 0.0);
    assert!(outcome
        .recommendations
        .iter()
        .all(|result| result.estimated_savings.is_finite()));
}

#[test]
fn raw_criteria_are_validated_before_matching() {
    let engine = engine();
    let catalog = scenario_catalog();

    let outcome = engine
        .recommend_raw(&catalog, &raw_criteria())
        .expect("valid criteria");
    assert_eq!(outcome.recommendations.len(), 2);

    let error = engine
        .recommend_raw(
            &catalog,
            &json!({ "tuitionAmount": 50, "preferredRewardsType": "miles" }),
        )
        .expect_err("invalid criteria");
    let fields: Vec<_> = error.fields.iter().map(|field| field.field.as_str()).collect();
    assert_eq!(fields, vec!["tuitionAmount", "preferredRewardsType"]);
}

#[test]
fn injected_cache_is_shared_and_resettable() {
    let cache = Arc::new(MetadataCache::new());
    let engine = MatchingEngine::with_cache(Arc::clone(&cache));
    let catalog = scenario_catalog();

    engine.recommend(&catalog, &criteria(25_000.0, RewardsPreference::CashBack));
    assert_eq!(cache.len(), 2);
    assert!(!cache.requirements().is_empty());

    cache.clear();
    assert!(engine.cache().is_empty());
    assert!(cache.requirements().is_empty());
}
