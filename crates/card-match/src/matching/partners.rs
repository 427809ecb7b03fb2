use serde::Serialize;

use crate::catalog::CreditCardProduct;

/// Display-only valuation of a card's bonus through one redemption partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerValue {
    pub partner: &'static str,
    pub value: f64,
    pub cents_per_point: f64,
}

/// Every present valuation on the card with its implied cents-per-point, cash first.
pub fn partner_values(card: &CreditCardProduct) -> Vec<PartnerValue> {
    let valuations = &card.partner_valuations;
    [
        ("Cash", valuations.cash, 1.0),
        ("Hyatt", valuations.hyatt, 2.2),
        ("Southwest", valuations.southwest, 1.5),
        ("Delta", valuations.delta, 1.2),
        ("United", valuations.united, 1.2),
        ("American Airlines", valuations.american, 1.3),
        ("Marriott", valuations.marriott, 0.7),
    ]
    .into_iter()
    .filter_map(|(partner, value, cents_per_point)| {
        value
            .filter(|value| value.is_finite())
            .map(|value| PartnerValue {
                partner,
                value,
                cents_per_point,
            })
    })
    .collect()
}
