use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::names::{self, AmexFamily, TravelPartner};
use crate::catalog::{CardId, CreditCardProduct, RewardsType};

/// Distinct requirement strings retained before the requirement cache is cleared.
pub const SPEND_REQUIREMENT_CACHE_LIMIT: usize = 500;

const FLEXIBLE_MARKERS: &[&str] = &["sapphire", "venture", "membership rewards"];

/// Broad reward category used by the scorer and the diversity rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    CashBack,
    Travel,
}

impl CardCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashBack => "cash back",
            Self::Travel => "travel",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::CashBack => Self::Travel,
            Self::Travel => Self::CashBack,
        }
    }
}

/// Derived facts about a catalog entry, computed once and shared.
#[derive(Debug, Clone, PartialEq)]
pub struct CardMetadata {
    pub normalized_name: String,
    pub normalized_issuer: String,
    pub ownership_key: String,
    pub is_amex: bool,
    pub is_chase: bool,
    pub personal_platinum: bool,
    pub personal_gold: bool,
    pub business_platinum: bool,
    pub business_gold: bool,
    pub chase_ink: bool,
    /// Product flag or Chase Ink naming.
    pub business: bool,
    pub spend_requirement: f64,
    pub category: CardCategory,
    pub partner: Option<TravelPartner>,
    pub flexible_points: bool,
}

impl CardMetadata {
    fn derive(card: &CreditCardProduct, spend_requirement: f64) -> Self {
        let normalized_name = names::normalize(&card.name);
        let normalized_issuer = names::normalize(&card.issuer);

        let is_amex = names::is_amex(&normalized_issuer) || names::is_amex(&normalized_name);
        let is_chase = names::is_chase(&normalized_issuer) || names::is_chase(&normalized_name);

        let mentions_business = normalized_name.contains("business");
        let platinum = normalized_name.contains("platinum");
        let gold = normalized_name.contains("gold");
        let chase_ink = is_chase && names::has_word(&normalized_name, "ink");

        let category = if card.rewards_type == RewardsType::CashBack
            || normalized_name.contains("cash")
        {
            CardCategory::CashBack
        } else {
            CardCategory::Travel
        };

        let flexible_points = FLEXIBLE_MARKERS
            .iter()
            .any(|marker| normalized_name.contains(marker))
            || (is_amex && (gold || platinum));

        Self {
            ownership_key: names::ownership_key(&card.name, &card.issuer),
            partner: TravelPartner::detect(&normalized_name),
            normalized_name,
            normalized_issuer,
            is_amex,
            is_chase,
            personal_platinum: platinum && !mentions_business,
            personal_gold: gold && !mentions_business,
            business_platinum: platinum && mentions_business,
            business_gold: gold && mentions_business,
            chase_ink,
            business: card.is_business || chase_ink,
            spend_requirement,
            category,
            flexible_points,
        }
    }

    /// AMEX family this product belongs to, if any. Platinum wins over Gold.
    pub fn amex_family(&self) -> Option<AmexFamily> {
        if !self.is_amex {
            return None;
        }
        if self.personal_platinum {
            Some(AmexFamily::PersonalPlatinum)
        } else if self.business_platinum {
            Some(AmexFamily::BusinessPlatinum)
        } else if self.personal_gold {
            Some(AmexFamily::PersonalGold)
        } else if self.business_gold {
            Some(AmexFamily::BusinessGold)
        } else {
            None
        }
    }

    /// Bank identity used to enforce one card per issuer in a split.
    pub fn issuer_key(&self) -> &str {
        if self.is_amex {
            "amex"
        } else if self.is_chase {
            "chase"
        } else {
            &self.normalized_issuer
        }
    }
}

fn requirement_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\s*([0-9][0-9,]*(?:\.[0-9]+)?)").expect("spend requirement pattern")
    })
}

/// First dollar amount in a free-text requirement, or zero when none parses.
pub fn parse_spend_requirement(text: &str) -> f64 {
    requirement_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().replace(',', "").parse::<f64>().ok())
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .unwrap_or(0.0)
}

/// Parsed requirements keyed by the exact requirement text.
#[derive(Debug, Default)]
pub struct SpendRequirementCache {
    entries: RwLock<HashMap<String, f64>>,
}

impl SpendRequirementCache {
    pub fn requirement(&self, text: &str) -> f64 {
        {
            let guard = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(amount) = guard.get(text) {
                return *amount;
            }
        }

        let amount = parse_spend_requirement(text);
        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.len() >= SPEND_REQUIREMENT_CACHE_LIMIT {
            guard.clear();
        }
        guard.insert(text.to_string(), amount);
        amount
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// Process- or request-scoped cache of [`CardMetadata`] keyed by card id.
///
/// Catalog entries are treated as immutable for the life of the cache: an entry is derived on
/// first sight and never recomputed until [`MetadataCache::clear`] is called.
#[derive(Debug, Default)]
pub struct MetadataCache {
    cards: RwLock<HashMap<CardId, Arc<CardMetadata>>>,
    requirements: SpendRequirementCache,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&self, card: &CreditCardProduct) -> Arc<CardMetadata> {
        {
            let guard = self.cards.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(metadata) = guard.get(&card.id) {
                return Arc::clone(metadata);
            }
        }

        let requirement = self.spend_requirement(card.signup_bonus_requirement.as_deref());
        let derived = Arc::new(CardMetadata::derive(card, requirement));

        let mut guard = self
            .cards
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // A concurrent caller may have won the race; keep the first entry.
        Arc::clone(guard.entry(card.id.clone()).or_insert(derived))
    }

    pub fn spend_requirement(&self, text: Option<&str>) -> f64 {
        match text {
            Some(text) if !text.trim().is_empty() => self.requirements.requirement(text),
            _ => 0.0,
        }
    }

    pub fn requirements(&self) -> &SpendRequirementCache {
        &self.requirements
    }

    pub fn len(&self) -> usize {
        self.cards
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cards
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
        self.requirements.clear();
    }
}
