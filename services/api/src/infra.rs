use card_match::catalog::{CardCatalog, CardId, CatalogImportError, CatalogImporter, CreditCardProduct};
use card_match::config::CatalogConfig;
use card_match::matching::{
    CatalogError, CatalogSource, PublishError, RecommendationNotice, ResultsPublisher,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog_size: usize,
    pub(crate) catalog_loaded_at: DateTime<Utc>,
}

/// Catalog snapshot loaded once at startup and shared by every request.
#[derive(Clone)]
pub(crate) struct StaticCatalog {
    cards: Arc<Vec<CreditCardProduct>>,
}

impl StaticCatalog {
    pub(crate) fn new(cards: Vec<CreditCardProduct>) -> Self {
        Self {
            cards: Arc::new(cards),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.cards.len()
    }
}

impl CatalogSource for StaticCatalog {
    fn active_cards(&self) -> Result<Vec<CreditCardProduct>, CatalogError> {
        Ok(self
            .cards
            .iter()
            .filter(|card| card.is_active)
            .cloned()
            .collect())
    }

    fn find(&self, id: &CardId) -> Result<Option<CreditCardProduct>, CatalogError> {
        Ok(self.cards.iter().find(|card| &card.id == id).cloned())
    }
}

/// Keeps notices in memory until a mail adapter is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResultsPublisher {
    notices: Arc<Mutex<Vec<RecommendationNotice>>>,
}

impl ResultsPublisher for InMemoryResultsPublisher {
    fn publish(&self, notice: RecommendationNotice) -> Result<(), PublishError> {
        let mut guard = self
            .notices
            .lock()
            .map_err(|_| PublishError::Transport("notice queue poisoned".to_string()))?;
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryResultsPublisher {
    pub(crate) fn notices(&self) -> Vec<RecommendationNotice> {
        self.notices
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Configured CSV export if present, otherwise the built-in sample catalog.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<StaticCatalog, CatalogImportError> {
    let cards = match &config.path {
        Some(path) => {
            let cards = CatalogImporter::from_path(path)?;
            info!(path = %path.display(), cards = cards.len(), "card catalog imported");
            cards
        }
        None => {
            let cards = CardCatalog::sample();
            info!(cards = cards.len(), "using built-in sample catalog");
            cards
        }
    };
    Ok(StaticCatalog::new(cards))
}
