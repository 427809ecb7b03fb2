use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use super::criteria::{validate_criteria, CriteriaValidationError, MatchingCriteria};
use super::engine::{MatchOutcome, MatchingEngine};
use super::format::{explain_recommendation, explain_split, format_currency};
use super::partners::{partner_values, PartnerValue};
use super::repository::{CatalogError, CatalogSource, RecommendationNotice, ResultsPublisher};
use crate::catalog::CardId;

/// Template name attached to every published recommendation summary.
pub const NOTICE_TEMPLATE: &str = "tuition_card_recommendations";

/// Service composing the catalog source, the matching engine, and the results publisher.
pub struct RecommendationService<C, P> {
    catalog: Arc<C>,
    publisher: Arc<P>,
    engine: MatchingEngine,
}

impl<C, P> RecommendationService<C, P>
where
    C: CatalogSource + 'static,
    P: ResultsPublisher + 'static,
{
    pub fn new(catalog: Arc<C>, publisher: Arc<P>) -> Self {
        Self::with_engine(catalog, publisher, MatchingEngine::new())
    }

    pub fn with_engine(catalog: Arc<C>, publisher: Arc<P>, engine: MatchingEngine) -> Self {
        Self {
            catalog,
            publisher,
            engine,
        }
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Validate raw form criteria, then match against the current catalog.
    pub fn recommend(&self, raw: &Value) -> Result<MatchOutcome, RecommendationServiceError> {
        let criteria = validate_criteria(raw)?;
        self.recommend_criteria(&criteria)
    }

    pub fn recommend_criteria(
        &self,
        criteria: &MatchingCriteria,
    ) -> Result<MatchOutcome, RecommendationServiceError> {
        let catalog = self.catalog.active_cards()?;
        let outcome = self.engine.recommend(&catalog, criteria);

        if let Some(notice) = notice_for(&outcome, criteria) {
            if let Err(error) = self.publisher.publish(notice) {
                warn!(%error, "recommendation notice not delivered");
            }
        }

        Ok(outcome)
    }

    /// Partner redemption values for a single catalog entry.
    pub fn partner_values(
        &self,
        card_id: &CardId,
    ) -> Result<Vec<PartnerValue>, RecommendationServiceError> {
        let card = self
            .catalog
            .find(card_id)?
            .ok_or_else(|| RecommendationServiceError::CardNotFound(card_id.clone()))?;
        Ok(partner_values(&card))
    }
}

fn notice_for(outcome: &MatchOutcome, criteria: &MatchingCriteria) -> Option<RecommendationNotice> {
    let top = outcome.top()?;

    let mut details = BTreeMap::new();
    details.insert(
        "tuition".to_string(),
        format_currency(criteria.tuition_amount),
    );
    details.insert(
        "preference".to_string(),
        criteria.preferred_rewards_type.label().to_string(),
    );
    details.insert("top_card".to_string(), top.card.name.clone());
    details.insert(
        "estimated_savings".to_string(),
        format_currency(top.breakdown.net_first_year_value),
    );
    details.insert(
        "explanation".to_string(),
        explain_recommendation(top, criteria),
    );
    details.insert(
        "recommendation_count".to_string(),
        outcome.recommendations.len().to_string(),
    );
    if let Some(strategy) = &outcome.split_strategy {
        details.insert("split".to_string(), explain_split(strategy));
    }

    Some(RecommendationNotice {
        template: NOTICE_TEMPLATE.to_string(),
        top_card: top.card.id.clone(),
        details,
    })
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationServiceError {
    #[error(transparent)]
    Validation(#[from] CriteriaValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("card {0} not found")]
    CardNotFound(CardId),
}
