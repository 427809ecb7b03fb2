use serde::Serialize;
use tracing::warn;

use super::eligibility::EligibleCard;
use super::savings::{calculate_savings, round_cents, SavingsBreakdown};
use crate::catalog::CreditCardProduct;

/// Smallest tuition for which a split is proposed.
pub const SPLIT_MIN_TUITION: f64 = 6_000.0;
/// Highest-bonus candidates considered for pairing.
pub const MAX_SPLIT_CANDIDATES: usize = 10;
/// A pair is degenerate when both spend requirements exceed this multiple of the tuition.
pub const REQUIREMENT_HEADROOM: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitAllocation {
    pub card: CreditCardProduct,
    pub amount: f64,
    pub spend_requirement: f64,
    pub bonus_earned: bool,
    pub breakdown: SavingsBreakdown,
}

/// Two cards from different issuers sharing one tuition payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitStrategy {
    pub primary: SplitAllocation,
    pub secondary: SplitAllocation,
    pub total_savings: f64,
    pub total_tuition: f64,
    pub savings_percentage: f64,
}

struct Candidate<'a> {
    card: &'a CreditCardProduct,
    requirement: f64,
    issuer: &'a str,
}

/// Best two-card allocation of `tuition` across the eligible cards, if any pair is viable.
pub fn optimize_split(eligible: &[EligibleCard<'_>], tuition: f64) -> Option<SplitStrategy> {
    if !tuition.is_finite() || tuition < SPLIT_MIN_TUITION {
        return None;
    }

    let mut candidates: Vec<Candidate<'_>> = eligible
        .iter()
        .filter(|entry| entry.card.signup_bonus_value > 0.0)
        .map(|entry| Candidate {
            card: entry.card,
            requirement: entry.metadata.spend_requirement,
            issuer: entry.metadata.issuer_key(),
        })
        .collect();
    candidates.sort_by(|left, right| {
        right
            .card
            .signup_bonus_value
            .total_cmp(&left.card.signup_bonus_value)
    });
    candidates.truncate(MAX_SPLIT_CANDIDATES);

    let mut best: Option<SplitStrategy> = None;
    for (index, first) in candidates.iter().enumerate() {
        for second in &candidates[index + 1..] {
            if first.issuer == second.issuer {
                continue;
            }
            if degenerate(first.requirement, second.requirement, tuition) {
                continue;
            }

            for (primary, secondary) in [(first, second), (second, first)] {
                let Some(strategy) = evaluate_pair(primary, secondary, tuition) else {
                    continue;
                };
                let improves = best
                    .as_ref()
                    .map_or(true, |current| strategy.total_savings > current.total_savings);
                if improves {
                    best = Some(strategy);
                }
            }
        }
    }

    best
}

fn evaluate_pair(primary: &Candidate<'_>, secondary: &Candidate<'_>, tuition: f64) -> Option<SplitStrategy> {
    let (amount_primary, amount_secondary) = allocate(primary.requirement, tuition);
    let (amount_primary, amount_secondary) = rebalance(
        amount_primary,
        primary.requirement,
        amount_secondary,
        secondary.requirement,
    );
    if amount_primary <= 0.0 || amount_secondary <= 0.0 {
        return None;
    }

    let primary = allocation(primary, amount_primary)?;
    let secondary = allocation(secondary, amount_secondary)?;
    let total_savings = round_cents(
        primary.breakdown.net_first_year_value + secondary.breakdown.net_first_year_value,
    );

    Some(SplitStrategy {
        primary,
        secondary,
        total_savings,
        total_tuition: tuition,
        savings_percentage: round_cents(total_savings / tuition * 100.0),
    })
}

fn allocation(candidate: &Candidate<'_>, amount: f64) -> Option<SplitAllocation> {
    let breakdown = match calculate_savings(candidate.card, amount) {
        Ok(breakdown) => breakdown,
        Err(error) => {
            warn!(card_id = %candidate.card.id, %error, "split allocation skipped");
            return None;
        }
    };
    let bonus_earned = amount >= candidate.requirement;

    Some(SplitAllocation {
        card: candidate.card.clone(),
        amount,
        spend_requirement: candidate.requirement,
        bonus_earned,
        breakdown: if bonus_earned {
            breakdown
        } else {
            breakdown.without_signup_bonus()
        },
    })
}

/// Neither card can reach its bonus even with the whole tuition plus headroom.
fn degenerate(first_requirement: f64, second_requirement: f64, tuition: f64) -> bool {
    let limit = tuition * REQUIREMENT_HEADROOM;
    first_requirement > limit && second_requirement > limit
}

/// Primary receives its requirement (capped at the tuition), secondary the remainder.
pub fn allocate(primary_requirement: f64, tuition: f64) -> (f64, f64) {
    let primary = primary_requirement.min(tuition).max(0.0);
    (primary, tuition - primary)
}

/// Move the primary card's slack above its requirement toward the secondary card's shortfall.
/// After [`allocate`] the primary has no slack, so this only changes amounts when the primary
/// allocation is set some other way.
pub fn rebalance(
    primary: f64,
    primary_requirement: f64,
    secondary: f64,
    secondary_requirement: f64,
) -> (f64, f64) {
    let slack = primary - primary_requirement;
    let shortfall = secondary_requirement - secondary;
    if slack <= 0.0 || shortfall <= 0.0 {
        return (primary, secondary);
    }

    let transfer = slack.min(shortfall);
    (primary - transfer, secondary + transfer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_caps_primary_at_tuition() {
        assert_eq!(allocate(4_000.0, 10_000.0), (4_000.0, 6_000.0));
        assert_eq!(allocate(15_000.0, 10_000.0), (10_000.0, 0.0));
        assert_eq!(allocate(0.0, 10_000.0), (0.0, 10_000.0));
    }

    #[test]
    fn degenerate_only_when_both_requirements_overshoot() {
        assert!(degenerate(15_001.0, 16_000.0, 10_000.0));
        assert!(!degenerate(15_001.0, 4_000.0, 10_000.0));
        assert!(!degenerate(8_000.0, 8_000.0, 10_000.0));
        assert!(!degenerate(15_000.0, 15_000.0, 10_000.0));
    }

    #[test]
    fn rebalance_moves_only_available_slack() {
        assert_eq!(rebalance(7_000.0, 4_000.0, 3_000.0, 5_000.0), (5_000.0, 5_000.0));
        assert_eq!(rebalance(7_000.0, 6_000.0, 3_000.0, 5_000.0), (6_000.0, 4_000.0));
    }

    #[test]
    fn rebalance_leaves_satisfied_or_tight_allocations_alone() {
        assert_eq!(rebalance(4_000.0, 4_000.0, 3_000.0, 5_000.0), (4_000.0, 3_000.0));
        assert_eq!(rebalance(7_000.0, 4_000.0, 3_000.0, 2_000.0), (7_000.0, 3_000.0));
    }
}
