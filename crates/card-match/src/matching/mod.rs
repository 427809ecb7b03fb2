//! Tuition card matching: criteria validation, eligibility gates, savings math, preference
//! scoring, ranking, and the two-card split optimizer, plus the service and HTTP surface
//! that expose them.

pub mod criteria;
pub mod eligibility;
pub mod engine;
pub mod format;
pub mod metadata;
pub mod names;
pub mod partners;
pub mod preference;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod savings;
pub mod service;
pub mod split;

#[cfg(test)]
mod tests;

pub use criteria::{
    validate_criteria, CreditTier, CriteriaValidationError, FieldError, MatchingCriteria,
    RecentApplications, RewardsPreference,
};
pub use eligibility::{evaluate_card, filter_eligible, EligibleCard, ExclusionReason};
pub use engine::{MatchOutcome, MatchWarning, MatchingEngine};
pub use format::{
    explain_recommendation, explain_split, format_currency, format_currency_cents,
    format_percentage,
};
pub use metadata::{CardCategory, CardMetadata, MetadataCache};
pub use names::{AmexFamily, TravelPartner};
pub use partners::{partner_values, PartnerValue};
pub use ranking::CardRecommendationResult;
pub use repository::{
    CatalogError, CatalogSource, PublishError, RecommendationNotice, ResultsPublisher,
};
pub use router::recommendation_router;
pub use savings::{calculate_savings, ComputationError, SavingsBreakdown};
pub use service::{RecommendationService, RecommendationServiceError};
pub use split::{optimize_split, SplitAllocation, SplitStrategy};
