use serde::{Deserialize, Serialize};

use crate::catalog::{CardId, CreditCardProduct};

/// Surcharge modeled on every dollar charged to a card.
pub const PROCESSING_FEE_RATE: f64 = 0.03;

/// Net first-year value of charging an amount to a card, in dollars rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsBreakdown {
    pub signup_bonus: f64,
    pub rewards_earned: f64,
    /// Zero when the first-year fee is waived, otherwise the negated annual fee.
    pub annual_fee_impact: f64,
    pub processing_fee: f64,
    pub net_first_year_value: f64,
}

impl SavingsBreakdown {
    fn from_parts(
        signup_bonus: f64,
        rewards_earned: f64,
        annual_fee_impact: f64,
        processing_fee: f64,
    ) -> Self {
        let signup_bonus = round_cents(signup_bonus);
        let rewards_earned = round_cents(rewards_earned);
        let annual_fee_impact = round_cents(annual_fee_impact);
        let processing_fee = round_cents(processing_fee);

        Self {
            signup_bonus,
            rewards_earned,
            annual_fee_impact,
            processing_fee,
            net_first_year_value: round_cents(
                signup_bonus + rewards_earned + annual_fee_impact - processing_fee,
            ),
        }
    }

    /// Same breakdown for an allocation that misses the spend requirement.
    pub fn without_signup_bonus(self) -> Self {
        Self::from_parts(
            0.0,
            self.rewards_earned,
            self.annual_fee_impact,
            self.processing_fee,
        )
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputationError {
    #[error("card {card} has a non-finite {field}")]
    NonFiniteInput { card: CardId, field: &'static str },
    #[error("cannot charge {amount} to card {card}")]
    InvalidAmount { card: CardId, amount: f64 },
    #[error("savings for card {card} did not produce a finite value")]
    NonFiniteResult { card: CardId },
}

/// Round to cents, mapping non-finite values and negative zero to `0.0`.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Savings from charging `amount` to `card`. Pure; safe to call repeatedly with different
/// amounts for the same card.
pub fn calculate_savings(
    card: &CreditCardProduct,
    amount: f64,
) -> Result<SavingsBreakdown, ComputationError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ComputationError::InvalidAmount {
            card: card.id.clone(),
            amount,
        });
    }

    for (field, value) in [
        ("signup_bonus_value", card.signup_bonus_value),
        ("annual_fee", card.annual_fee),
        ("rewards_rate", card.rewards_rate),
    ] {
        if !value.is_finite() {
            return Err(ComputationError::NonFiniteInput {
                card: card.id.clone(),
                field,
            });
        }
    }

    let rewards_earned = amount * (card.rewards_rate / 100.0);
    let annual_fee_impact = if card.first_year_waived {
        0.0
    } else {
        -card.annual_fee
    };
    let processing_fee = amount * PROCESSING_FEE_RATE;

    if !(rewards_earned.is_finite() && processing_fee.is_finite()) {
        return Err(ComputationError::NonFiniteResult {
            card: card.id.clone(),
        });
    }

    Ok(SavingsBreakdown::from_parts(
        card.signup_bonus_value,
        rewards_earned,
        annual_fee_impact,
        processing_fee,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PartnerValuations, RewardsType};

    fn card(bonus: f64, fee: f64, waived: bool, rate: f64) -> CreditCardProduct {
        CreditCardProduct {
            id: CardId("test".to_string()),
            name: "Test Card".to_string(),
            issuer: "Test Bank".to_string(),
            signup_bonus_value: bonus,
            signup_bonus_requirement: None,
            signup_bonus_timeframe: None,
            annual_fee: fee,
            first_year_waived: waived,
            rewards_rate: rate,
            rewards_type: RewardsType::CashBack,
            min_credit_score: None,
            is_business: false,
            is_active: true,
            partner_valuations: PartnerValuations::default(),
        }
    }

    #[test]
    fn computes_tuition_scenario_values() {
        let cash_back = calculate_savings(&card(200.0, 0.0, true, 2.0), 25_000.0)
            .expect("breakdown computes");
        assert_eq!(cash_back.rewards_earned, 500.0);
        assert_eq!(cash_back.processing_fee, 750.0);
        assert_eq!(cash_back.annual_fee_impact, 0.0);
        assert_eq!(cash_back.net_first_year_value, -50.0);

        let travel = calculate_savings(&card(750.0, 95.0, false, 2.0), 25_000.0)
            .expect("breakdown computes");
        assert_eq!(travel.annual_fee_impact, -95.0);
        assert_eq!(travel.net_first_year_value, 405.0);
    }

    #[test]
    fn net_value_equals_sum_of_rounded_components() {
        let subject = card(333.333, 89.999, false, 1.37);
        for amount in [100.0, 1234.56, 7777.77, 48_213.19, 500_000.0] {
            let breakdown = calculate_savings(&subject, amount).expect("breakdown computes");
            let expected = breakdown.signup_bonus + breakdown.rewards_earned
                + breakdown.annual_fee_impact
                - breakdown.processing_fee;
            assert!((breakdown.net_first_year_value - expected).abs() < 0.005);
            assert_eq!(breakdown.processing_fee, round_cents(amount * 0.03));
        }
    }

    #[test]
    fn waived_zero_fee_has_no_negative_zero() {
        let breakdown = calculate_savings(&card(0.0, 0.0, false, 0.0), 0.0).expect("computes");
        assert!(breakdown.annual_fee_impact.is_sign_positive());
        assert_eq!(breakdown.net_first_year_value, 0.0);
    }

    #[test]
    fn without_signup_bonus_recomputes_net() {
        let breakdown = calculate_savings(&card(750.0, 95.0, false, 2.0), 3_000.0)
            .expect("computes")
            .without_signup_bonus();
        assert_eq!(breakdown.signup_bonus, 0.0);
        assert_eq!(breakdown.net_first_year_value, 60.0 - 95.0 - 90.0);
    }

    #[test]
    fn rejects_non_finite_inputs() {
        assert!(matches!(
            calculate_savings(&card(100.0, 0.0, true, f64::NAN), 1_000.0),
            Err(ComputationError::NonFiniteInput {
                field: "rewards_rate",
                ..
            })
        ));
        assert!(matches!(
            calculate_savings(&card(100.0, 0.0, true, 1.0), f64::INFINITY),
            Err(ComputationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn round_cents_guards_non_finite_values() {
        assert_eq!(round_cents(f64::NAN), 0.0);
        assert_eq!(round_cents(f64::NEG_INFINITY), 0.0);
        assert_eq!(round_cents(12.345_6), 12.35);
        assert_eq!(round_cents(-0.001), 0.0);
    }
}
