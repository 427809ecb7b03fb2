use super::criteria::{MatchingCriteria, RewardsPreference};
use super::metadata::CardCategory;
use super::ranking::CardRecommendationResult;
use super::split::{SplitAllocation, SplitStrategy};

/// Whole-dollar amount with thousands separators, e.g. `$25,000` or `-$50`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let dollars = value.abs().round() as u64;
    let sign = if value < 0.0 && dollars > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(dollars))
}

/// Amount with cents, e.g. `$1,234.56`.
pub fn format_currency_cents(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// One decimal place, e.g. `1.6%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    format!("{:.1}%", if rounded == 0.0 { 0.0 } else { rounded })
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Sentence summarising why a card was recommended for this applicant.
pub fn explain_recommendation(result: &CardRecommendationResult, criteria: &MatchingCriteria) -> String {
    let card = &result.card;
    let breakdown = &result.breakdown;
    let mut sentences = Vec::new();

    let bonus = match (&card.signup_bonus_requirement, breakdown.signup_bonus > 0.0) {
        (Some(requirement), true) => format!(
            "{} offers a {} sign-up bonus ({requirement}).",
            card.name,
            format_currency(breakdown.signup_bonus)
        ),
        (None, true) => format!(
            "{} offers a {} sign-up bonus.",
            card.name,
            format_currency(breakdown.signup_bonus)
        ),
        (_, false) => format!("{} has no sign-up bonus.", card.name),
    };
    sentences.push(bonus);

    sentences.push(format!(
        "Charging {} of tuition earns {} in rewards against a {} processing fee.",
        format_currency(criteria.tuition_amount),
        format_currency(breakdown.rewards_earned),
        format_currency(breakdown.processing_fee)
    ));

    if breakdown.annual_fee_impact < 0.0 {
        sentences.push(format!(
            "The {} annual fee applies in the first year.",
            format_currency(-breakdown.annual_fee_impact)
        ));
    } else if card.annual_fee > 0.0 && card.first_year_waived {
        sentences.push("The annual fee is waived for the first year.".to_string());
    }

    let net = breakdown.net_first_year_value;
    sentences.push(if net >= 0.0 {
        format!("Net first-year value: {}.", format_currency(net))
    } else {
        format!(
            "Net first-year cost: {}; the processing fee outweighs the rewards.",
            format_currency(-net)
        )
    });

    let alternative = match criteria.preferred_rewards_type {
        RewardsPreference::Flexible => false,
        RewardsPreference::CashBack => result.category == CardCategory::Travel,
        RewardsPreference::TravelPoints => result.category == CardCategory::CashBack,
    };
    if alternative {
        sentences.push(format!(
            "Shown as a {} alternative to your preferred rewards type.",
            result.category.label()
        ));
    }

    sentences.join(" ")
}

fn describe_allocation(allocation: &SplitAllocation) -> String {
    let outcome = if allocation.bonus_earned {
        format!(
            "unlocking its {} bonus",
            format_currency(allocation.breakdown.signup_bonus)
        )
    } else {
        format!(
            "short of its {} requirement, so no bonus",
            format_currency(allocation.spend_requirement)
        )
    };
    format!(
        "put {} on {} ({outcome})",
        format_currency(allocation.amount),
        allocation.card.name
    )
}

/// Sentence describing a two-card split.
pub fn explain_split(strategy: &SplitStrategy) -> String {
    format!(
        "Split your {} payment: {} and {}. Combined first-year value: {} ({} of tuition).",
        format_currency(strategy.total_tuition),
        describe_allocation(&strategy.primary),
        describe_allocation(&strategy.secondary),
        format_currency(strategy.total_savings),
        format_percentage(strategy.savings_percentage)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_rounds_to_whole_dollars() {
        assert_eq!(format_currency(25_000.0), "$25,000");
        assert_eq!(format_currency(-50.0), "-$50");
        assert_eq!(format_currency(999.5), "$1,000");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(-0.4), "$0");
        assert_eq!(format_currency(f64::NAN), "$0");
    }

    #[test]
    fn currency_with_cents() {
        assert_eq!(format_currency_cents(1_234.56), "$1,234.56");
        assert_eq!(format_currency_cents(0.5), "$0.50");
        assert_eq!(format_currency_cents(-95.0), "-$95.00");
    }

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(format_percentage(1.62), "1.6%");
        assert_eq!(format_percentage(12.0), "12.0%");
        assert_eq!(format_percentage(f64::INFINITY), "0.0%");
    }
}
