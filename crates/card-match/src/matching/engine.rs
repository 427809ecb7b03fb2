use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::criteria::{validate_criteria, CriteriaValidationError, MatchingCriteria};
use super::eligibility::{filter_eligible, EligibleCard};
use super::metadata::MetadataCache;
use super::preference::adjusted_savings;
use super::ranking::{rank, CardRecommendationResult, ScoredCard};
use super::savings::{calculate_savings, SavingsBreakdown};
use super::split::{optimize_split, SplitStrategy};
use crate::catalog::CreditCardProduct;

/// Non-fatal conditions surfaced alongside an empty or partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchWarning {
    EmptyCatalog,
    NoEligibleCards,
}

impl MatchWarning {
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyCatalog => "no cards are available in the catalog",
            Self::NoEligibleCards => "no cards match the provided criteria",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub recommendations: Vec<CardRecommendationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_strategy: Option<SplitStrategy>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MatchWarning>,
    pub eligible_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl MatchOutcome {
    pub fn top(&self) -> Option<&CardRecommendationResult> {
        self.recommendations.first()
    }
}

/// Runs the filter, savings, preference, ranking and split stages over one catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    cache: Arc<MetadataCache>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing metadata cache, e.g. a fresh one per test or per catalog refresh.
    pub fn with_cache(cache: Arc<MetadataCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    pub fn recommend(&self, catalog: &[CreditCardProduct], criteria: &MatchingCriteria) -> MatchOutcome {
        let generated_at = Utc::now();

        if catalog.is_empty() {
            warn!("recommendation requested against an empty catalog");
            return MatchOutcome {
                recommendations: Vec::new(),
                split_strategy: None,
                warnings: vec![MatchWarning::EmptyCatalog],
                eligible_count: 0,
                generated_at,
            };
        }

        let eligible = filter_eligible(catalog, criteria, &self.cache);
        if eligible.is_empty() {
            info!(
                catalog_size = catalog.len(),
                tuition = criteria.tuition_amount,
                "no eligible cards"
            );
            return MatchOutcome {
                recommendations: Vec::new(),
                split_strategy: None,
                warnings: vec![MatchWarning::NoEligibleCards],
                eligible_count: 0,
                generated_at,
            };
        }

        let scored = self.score_eligible(&eligible, criteria);
        let recommendations = rank(&scored, criteria.preferred_rewards_type);
        let split_strategy = optimize_split(&eligible, criteria.tuition_amount);

        info!(
            catalog_size = catalog.len(),
            eligible = eligible.len(),
            recommended = recommendations.len(),
            preference = criteria.preferred_rewards_type.label(),
            split = split_strategy.is_some(),
            "recommendations computed"
        );

        MatchOutcome {
            recommendations,
            split_strategy,
            warnings: Vec::new(),
            eligible_count: eligible.len(),
            generated_at,
        }
    }

    /// Validate raw criteria before matching; no partial results on validation failure.
    pub fn recommend_raw(
        &self,
        catalog: &[CreditCardProduct],
        raw: &Value,
    ) -> Result<MatchOutcome, CriteriaValidationError> {
        let criteria = validate_criteria(raw)?;
        Ok(self.recommend(catalog, &criteria))
    }

    /// Full-tuition breakdown and preference-adjusted score per eligible card.
    ///
    /// A card whose breakdown cannot be computed is kept with a zero breakdown so one bad
    /// entry never aborts the batch.
    pub fn score_eligible<'a>(
        &self,
        eligible: &[EligibleCard<'a>],
        criteria: &MatchingCriteria,
    ) -> Vec<ScoredCard<'a>> {
        eligible
            .iter()
            .map(|entry| {
                let breakdown = match calculate_savings(entry.card, criteria.tuition_amount) {
                    Ok(breakdown) => breakdown,
                    Err(error) => {
                        warn!(card_id = %entry.card.id, %error, "savings computation failed");
                        SavingsBreakdown::default()
                    }
                };
                ScoredCard {
                    card: entry.card,
                    category: entry.metadata.category,
                    breakdown,
                    estimated_savings: adjusted_savings(
                        breakdown.net_first_year_value,
                        &entry.metadata,
                        criteria,
                    ),
                }
            })
            .collect()
    }
}
