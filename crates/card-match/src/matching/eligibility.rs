use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::criteria::{MatchingCriteria, RecentApplications};
use super::metadata::{CardMetadata, MetadataCache};
use super::names::{self, AmexFamily, PartnerKind, TravelPartner};
use crate::catalog::CreditCardProduct;

/// Catalog entries considered per request.
pub const MAX_CATALOG_SIZE: usize = 500;

/// First gate a catalog entry failed, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum ExclusionReason {
    MalformedEntry { field: &'static str },
    Inactive,
    CreditScore { required: u16, implied: u16 },
    BusinessCard,
    AlreadyOwned { held: String },
    IssuerApplicationLimit,
    AmexBonusHistory { family: AmexFamily, held: AmexFamily },
    UnreachableSpend { required: f64, tuition: f64 },
    PartnerMismatch { partner: TravelPartner },
}

impl ExclusionReason {
    pub fn summary(&self) -> String {
        match self {
            Self::MalformedEntry { field } => format!("catalog entry missing or invalid {field}"),
            Self::Inactive => "card is no longer offered".to_string(),
            Self::CreditScore { required, implied } => {
                format!("requires credit score {required}, applicant implies {implied}")
            }
            Self::BusinessCard => "business card without business opt-in".to_string(),
            Self::AlreadyOwned { held } => format!("already holds {held}"),
            Self::IssuerApplicationLimit => {
                "5+ recent applications exceed Chase's 5/24 rule".to_string()
            }
            Self::AmexBonusHistory { family, held } => format!(
                "AMEX {} bonus unavailable after holding {}",
                family.label(),
                held.label()
            ),
            Self::UnreachableSpend { required, tuition } => format!(
                "spend requirement ${required:.0} exceeds tuition ${tuition:.0}"
            ),
            Self::PartnerMismatch { partner } => {
                format!("{} is not among preferred partners", partner.label())
            }
        }
    }
}

/// Catalog entry that passed every gate, with its cached metadata.
#[derive(Debug, Clone)]
pub struct EligibleCard<'a> {
    pub card: &'a CreditCardProduct,
    pub metadata: Arc<CardMetadata>,
}

#[derive(Debug, Default, Clone, Copy)]
struct AmexHistory {
    personal_platinum: bool,
    personal_gold: bool,
    business_platinum: bool,
    business_gold: bool,
}

impl AmexHistory {
    fn from_criteria(criteria: &MatchingCriteria) -> Self {
        let mut history = Self::default();
        for family in criteria
            .amex_history
            .iter()
            .filter_map(|entry| AmexFamily::from_name(entry))
        {
            match family {
                AmexFamily::PersonalPlatinum => history.personal_platinum = true,
                AmexFamily::PersonalGold => history.personal_gold = true,
                AmexFamily::BusinessPlatinum => history.business_platinum = true,
                AmexFamily::BusinessGold => history.business_gold = true,
            }
        }
        history
    }

    /// Platinum history blocks Gold and Platinum; Gold history blocks only Gold. Personal and
    /// business families are independent.
    fn blocking(&self, metadata: &CardMetadata) -> Option<(AmexFamily, AmexFamily)> {
        let family = metadata.amex_family()?;

        let held = match family {
            AmexFamily::PersonalPlatinum | AmexFamily::PersonalGold => {
                if self.personal_platinum {
                    Some(AmexFamily::PersonalPlatinum)
                } else if self.personal_gold && metadata.personal_gold {
                    Some(AmexFamily::PersonalGold)
                } else {
                    None
                }
            }
            AmexFamily::BusinessPlatinum | AmexFamily::BusinessGold => {
                if self.business_platinum {
                    Some(AmexFamily::BusinessPlatinum)
                } else if self.business_gold && metadata.business_gold {
                    Some(AmexFamily::BusinessGold)
                } else {
                    None
                }
            }
        }?;

        Some((family, held))
    }
}

/// Request-level facts computed once and reused for every catalog entry.
struct Screening<'c> {
    criteria: &'c MatchingCriteria,
    implied_score: u16,
    held_cards: Vec<&'c str>,
    history: AmexHistory,
}

impl<'c> Screening<'c> {
    fn new(criteria: &'c MatchingCriteria) -> Self {
        let held_cards = criteria
            .current_cards
            .iter()
            .map(String::as_str)
            .filter(|held| !held.trim().is_empty())
            .collect();

        Self {
            criteria,
            implied_score: criteria.implied_credit_score(),
            held_cards,
            history: AmexHistory::from_criteria(criteria),
        }
    }

    fn evaluate(
        &self,
        card: &CreditCardProduct,
        cache: &MetadataCache,
    ) -> Result<Arc<CardMetadata>, ExclusionReason> {
        check_structure(card)?;

        if let Some(required) = card.min_credit_score {
            if required > self.implied_score {
                return Err(ExclusionReason::CreditScore {
                    required,
                    implied: self.implied_score,
                });
            }
        }

        let metadata = cache.metadata(card);

        if metadata.business && !self.criteria.open_to_business_cards {
            return Err(ExclusionReason::BusinessCard);
        }

        // Held names are keyed per entry: only this entry's issuer is stripped from them.
        if let Some(held) = self.held_cards.iter().find(|held| {
            names::keys_overlap(
                &names::ownership_key(held, &card.issuer),
                &metadata.ownership_key,
            )
        }) {
            return Err(ExclusionReason::AlreadyOwned {
                held: (*held).to_string(),
            });
        }

        if self.criteria.recent_card_applications == RecentApplications::FivePlus
            && metadata.is_chase
        {
            return Err(ExclusionReason::IssuerApplicationLimit);
        }

        if let Some((family, held)) = self.history.blocking(&metadata) {
            return Err(ExclusionReason::AmexBonusHistory { family, held });
        }

        if metadata.spend_requirement > self.criteria.tuition_amount {
            return Err(ExclusionReason::UnreachableSpend {
                required: metadata.spend_requirement,
                tuition: self.criteria.tuition_amount,
            });
        }

        if let Some(partner) = metadata.partner {
            if !metadata.flexible_points && !self.partner_allowed(partner) {
                return Err(ExclusionReason::PartnerMismatch { partner });
            }
        }

        Ok(metadata)
    }

    fn partner_allowed(&self, partner: TravelPartner) -> bool {
        let preferences = match partner.kind() {
            PartnerKind::Airline => &self.criteria.preferred_airlines,
            PartnerKind::Hotel => &self.criteria.preferred_hotels,
        };

        if preferences.is_empty()
            || preferences
                .iter()
                .any(|entry| names::is_any_preference(entry))
        {
            return true;
        }

        preferences
            .iter()
            .any(|entry| partner.matches_preference(entry))
    }
}

fn check_structure(card: &CreditCardProduct) -> Result<(), ExclusionReason> {
    let required_text = [
        ("id", card.id.0.as_str()),
        ("name", card.name.as_str()),
        ("issuer", card.issuer.as_str()),
    ];
    if let Some((field, _)) = required_text
        .iter()
        .find(|(_, value)| value.trim().is_empty())
    {
        return Err(ExclusionReason::MalformedEntry { field });
    }

    let money = [
        ("signup_bonus_value", card.signup_bonus_value),
        ("annual_fee", card.annual_fee),
    ];
    if let Some((field, _)) = money
        .iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
    {
        return Err(ExclusionReason::MalformedEntry { field });
    }

    if !card.rewards_rate.is_finite() {
        return Err(ExclusionReason::MalformedEntry {
            field: "rewards_rate",
        });
    }

    if !card.is_active {
        return Err(ExclusionReason::Inactive);
    }

    Ok(())
}

/// Run a single catalog entry through every gate, returning the first failure.
pub fn evaluate_card(
    card: &CreditCardProduct,
    criteria: &MatchingCriteria,
    cache: &MetadataCache,
) -> Result<Arc<CardMetadata>, ExclusionReason> {
    Screening::new(criteria).evaluate(card, cache)
}

/// Apply every hard exclusion rule to the (capped) catalog, preserving catalog order.
pub fn filter_eligible<'a>(
    catalog: &'a [CreditCardProduct],
    criteria: &MatchingCriteria,
    cache: &MetadataCache,
) -> Vec<EligibleCard<'a>> {
    let screening = Screening::new(criteria);

    catalog
        .iter()
        .take(MAX_CATALOG_SIZE)
        .filter_map(|card| match screening.evaluate(card, cache) {
            Ok(metadata) => Some(EligibleCard { card, metadata }),
            Err(reason) => {
                debug!(card_id = %card.id, reason = %reason.summary(), "card excluded");
                None
            }
        })
        .collect()
}
