use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CardId, CreditCardProduct};

/// Persistence collaborator supplying the active card catalog.
pub trait CatalogSource: Send + Sync {
    fn active_cards(&self) -> Result<Vec<CreditCardProduct>, CatalogError>;

    fn find(&self, id: &CardId) -> Result<Option<CreditCardProduct>, CatalogError> {
        Ok(self
            .active_cards()?
            .into_iter()
            .find(|card| &card.id == id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for recommendation summaries (e-mail or CRM adapters).
pub trait ResultsPublisher: Send + Sync {
    fn publish(&self, notice: RecommendationNotice) -> Result<(), PublishError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationNotice {
    pub template: String,
    pub top_card: CardId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("results transport unavailable: {0}")]
    Transport(String),
}
