use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};

use crate::catalog::{CardCatalog, CardId, CreditCardProduct, PartnerValuations, RewardsType};
use crate::matching::criteria::{CreditTier, MatchingCriteria, RewardsPreference};
use crate::matching::engine::MatchingEngine;
use crate::matching::metadata::MetadataCache;
use crate::matching::repository::{
    CatalogError, CatalogSource, PublishError, RecommendationNotice, ResultsPublisher,
};
use crate::matching::{recommendation_router, RecommendationService};

/// Plain personal card with no bonus, no fee and a 1% rate.
pub(super) fn card(id: &str, name: &str, issuer: &str) -> CreditCardProduct {
    CreditCardProduct {
        id: CardId(id.to_string()),
        name: name.to_string(),
        issuer: issuer.to_string(),
        signup_bonus_value: 0.0,
        signup_bonus_requirement: None,
        signup_bonus_timeframe: None,
        annual_fee: 0.0,
        first_year_waived: true,
        rewards_rate: 1.0,
        rewards_type: RewardsType::CashBack,
        min_credit_score: None,
        is_business: false,
        is_active: true,
        partner_valuations: PartnerValuations::default(),
    }
}

pub(super) fn bonus_card(
    id: &str,
    name: &str,
    issuer: &str,
    bonus: f64,
    requirement: f64,
) -> CreditCardProduct {
    CreditCardProduct {
        signup_bonus_value: bonus,
        signup_bonus_requirement: Some(format!("Spend ${requirement} in the first 3 months")),
        signup_bonus_timeframe: Some("3 months".to_string()),
        ..card(id, name, issuer)
    }
}

/// $200 bonus, no fee, 2% cash back.
pub(super) fn everyday_cash() -> CreditCardProduct {
    CreditCardProduct {
        rewards_rate: 2.0,
        min_credit_score: Some(670),
        partner_valuations: PartnerValuations {
            cash: Some(200.0),
            ..PartnerValuations::default()
        },
        ..bonus_card("everyday-cash", "Everyday Cash Rewards", "Harbor Bank", 200.0, 500.0)
    }
}

/// $750 bonus on $4,000 spend, $95 fee not waived, 2% points.
pub(super) fn voyager_travel() -> CreditCardProduct {
    CreditCardProduct {
        rewards_rate: 2.0,
        rewards_type: RewardsType::TravelPoints,
        annual_fee: 95.0,
        first_year_waived: false,
        min_credit_score: Some(700),
        partner_valuations: PartnerValuations {
            cash: Some(750.0),
            hyatt: Some(1650.0),
            ..PartnerValuations::default()
        },
        ..bonus_card("voyager-travel", "Voyager Travel", "Summit Bank", 750.0, 4000.0)
    }
}

pub(super) fn scenario_catalog() -> Vec<CreditCardProduct> {
    vec![everyday_cash(), voyager_travel()]
}

pub(super) fn criteria(tuition: f64, preference: RewardsPreference) -> MatchingCriteria {
    MatchingCriteria {
        credit_score: Some(CreditTier::Good),
        ..MatchingCriteria::new(tuition, preference)
    }
}

pub(super) fn engine() -> MatchingEngine {
    MatchingEngine::with_cache(Arc::new(MetadataCache::new()))
}

pub(super) fn ids<'a, I>(cards: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CreditCardProduct>,
{
    cards.into_iter().map(|card| card.id.0.clone()).collect()
}

pub(super) fn raw_criteria() -> Value {
    json!({
        "tuitionAmount": 25000,
        "creditScore": "good",
        "preferredRewardsType": "cash_back",
        "currentCards": [],
        "openToBusinessCards": false,
        "recentCardApplications": "1-2"
    })
}

#[derive(Clone)]
pub(super) struct MemoryCatalog {
    cards: Arc<Mutex<HashMap<CardId, CreditCardProduct>>>,
    order: Vec<CardId>,
}

impl MemoryCatalog {
    pub(super) fn new(cards: Vec<CreditCardProduct>) -> Self {
        let order = cards.iter().map(|card| card.id.clone()).collect();
        let cards = cards
            .into_iter()
            .map(|card| (card.id.clone(), card))
            .collect();
        Self {
            cards: Arc::new(Mutex::new(cards)),
            order,
        }
    }

    pub(super) fn sample() -> Self {
        Self::new(CardCatalog::sample())
    }
}

impl CatalogSource for MemoryCatalog {
    fn active_cards(&self) -> Result<Vec<CreditCardProduct>, CatalogError> {
        let guard = self.cards.lock().expect("catalog mutex poisoned");
        Ok(self
            .order
            .iter()
            .filter_map(|id| guard.get(id).cloned())
            .filter(|card| card.is_active)
            .collect())
    }

    fn find(&self, id: &CardId) -> Result<Option<CreditCardProduct>, CatalogError> {
        let guard = self.cards.lock().expect("catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableCatalog;

impl CatalogSource for UnavailableCatalog {
    fn active_cards(&self) -> Result<Vec<CreditCardProduct>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    notices: Arc<Mutex<Vec<RecommendationNotice>>>,
}

impl MemoryPublisher {
    pub(super) fn notices(&self) -> Vec<RecommendationNotice> {
        self.notices.lock().expect("publisher mutex poisoned").clone()
    }
}

impl ResultsPublisher for MemoryPublisher {
    fn publish(&self, notice: RecommendationNotice) -> Result<(), PublishError> {
        self.notices
            .lock()
            .expect("publisher mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflinePublisher;

impl ResultsPublisher for OfflinePublisher {
    fn publish(&self, _notice: RecommendationNotice) -> Result<(), PublishError> {
        Err(PublishError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    RecommendationService<MemoryCatalog, MemoryPublisher>,
    Arc<MemoryPublisher>,
) {
    let publisher = Arc::new(MemoryPublisher::default());
    let service = RecommendationService::with_engine(
        Arc::new(MemoryCatalog::sample()),
        publisher.clone(),
        engine(),
    );
    (service, publisher)
}

pub(super) fn router_with_service<C, P>(service: RecommendationService<C, P>) -> Router
where
    C: CatalogSource + 'static,
    P: ResultsPublisher + 'static,
{
    recommendation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
