//! Name normalization and the fuzzy matching rules used for ownership, issuer family and
//! travel-partner detection.
//!
//! Rules:
//! * Normalization lowercases, drops trademark glyphs and punctuation, and collapses
//!   whitespace.
//! * Ownership keys strip the compared entry's issuer (with its [`ISSUER_ALIASES`]) and filler
//!   words, so "Chase Sapphire Preferred® Card" and "Sapphire Preferred" compare equal. A held
//!   card matches when one key is a whole-token run inside the other. A key that is a single
//!   [`GENERIC_WORDS`] entry ("gold", "platinum") only matches an identical key.
//! * Issuer families ("chase", "amex") are whole-word hits, never substrings of other words.
//! * AMEX product families come from "platinum"/"gold" combined with the presence or absence of
//!   "business".
//! * Travel partners are detected with the first keyword hit in [`TravelPartner::ALL`] order.

use serde::{Deserialize, Serialize};

/// Spellings of the same issuer. Stripping one issuer strips every spelling in its group.
pub const ISSUER_ALIASES: &[&[&str]] = &[
    &["american express", "amex"],
    &["citi", "citibank"],
    &["bank of america", "bofa"],
    &["us bank", "u.s. bank"],
];

const FILLER_WORDS: &[&str] = &["the", "card", "credit", "from", "rewards"];

/// Tier and marketing words too common to identify a product on their own.
pub const GENERIC_WORDS: &[&str] = &[
    "gold",
    "platinum",
    "preferred",
    "premier",
    "plus",
    "cash",
    "business",
    "select",
    "signature",
    "blue",
    "green",
    "everyday",
    "travel",
];

pub fn normalize(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|ch| match ch {
            '\u{ae}' | '\u{2122}' | '\u{feff}' | '\u{200b}' => ' ',
            ch if ch.is_alphanumeric() || ch == '$' || ch == ',' || ch == '.' => ch,
            _ => ' ',
        })
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn words(value: &str) -> Vec<String> {
    normalize(value)
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}

fn remove_phrase(tokens: &mut Vec<String>, phrase: &[String]) {
    if phrase.is_empty() {
        return;
    }

    let mut index = 0;
    while index + phrase.len() <= tokens.len() {
        if tokens[index..index + phrase.len()] == *phrase {
            tokens.drain(index..index + phrase.len());
        } else {
            index += 1;
        }
    }
}

/// The issuer as written plus every alias in its group.
fn issuer_spellings(issuer: &str) -> Vec<Vec<String>> {
    let own = words(issuer);
    let mut spellings = vec![own.clone()];
    for group in ISSUER_ALIASES {
        let group: Vec<Vec<String>> = group.iter().map(|alias| words(alias)).collect();
        if group.iter().any(|alias| contains_run(&own, alias)) {
            spellings.extend(group);
        }
    }
    spellings
}

/// Issuer-stripped key used to compare held cards against a catalog entry from `issuer`.
pub fn ownership_key(name: &str, issuer: &str) -> String {
    let mut tokens = words(name);
    for spelling in issuer_spellings(issuer) {
        remove_phrase(&mut tokens, &spelling);
    }
    tokens.retain(|token| !FILLER_WORDS.contains(&token.as_str()));
    tokens.join(" ")
}

/// Whole-token containment of two ownership keys in either direction. Empty keys never
/// match, and a lone generic word only matches itself.
pub fn keys_overlap(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }
    if left == right {
        return true;
    }

    let left: Vec<String> = left.split(' ').map(str::to_string).collect();
    let right: Vec<String> = right.split(' ').map(str::to_string).collect();
    let generic = |key: &[String]| key.len() == 1 && GENERIC_WORDS.contains(&key[0].as_str());
    if generic(&left) || generic(&right) {
        return false;
    }
    contains_run(&left, &right) || contains_run(&right, &left)
}

pub fn has_word(normalized: &str, word: &str) -> bool {
    normalized
        .split(|ch: char| !ch.is_alphanumeric())
        .any(|token| token == word)
}

fn has_phrase(normalized: &str, phrase: &str) -> bool {
    contains_run(&words(normalized), &words(phrase))
}

pub fn is_amex(normalized: &str) -> bool {
    has_phrase(normalized, "amex") || has_phrase(normalized, "american express")
}

pub fn is_chase(normalized: &str) -> bool {
    has_phrase(normalized, "chase")
}

/// AMEX product families subject to the once-per-lifetime bonus rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmexFamily {
    PersonalPlatinum,
    PersonalGold,
    BusinessPlatinum,
    BusinessGold,
}

impl AmexFamily {
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = normalize(name);
        let business = normalized.contains("business");
        if normalized.contains("platinum") {
            Some(if business {
                Self::BusinessPlatinum
            } else {
                Self::PersonalPlatinum
            })
        } else if normalized.contains("gold") {
            Some(if business {
                Self::BusinessGold
            } else {
                Self::PersonalGold
            })
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalPlatinum => "Personal Platinum",
            Self::PersonalGold => "Personal Gold",
            Self::BusinessPlatinum => "Business Platinum",
            Self::BusinessGold => "Business Gold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerKind {
    Airline,
    Hotel,
}

/// Co-brand partners recognised in card names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelPartner {
    Delta,
    United,
    Southwest,
    AmericanAirlines,
    Hyatt,
    Marriott,
    Hilton,
}

impl TravelPartner {
    pub const ALL: [Self; 7] = [
        Self::Delta,
        Self::United,
        Self::Southwest,
        Self::AmericanAirlines,
        Self::Hyatt,
        Self::Marriott,
        Self::Hilton,
    ];

    pub const fn kind(self) -> PartnerKind {
        match self {
            Self::Delta | Self::United | Self::Southwest | Self::AmericanAirlines => {
                PartnerKind::Airline
            }
            Self::Hyatt | Self::Marriott | Self::Hilton => PartnerKind::Hotel,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Delta => "Delta",
            Self::United => "United",
            Self::Southwest => "Southwest",
            Self::AmericanAirlines => "American Airlines",
            Self::Hyatt => "Hyatt",
            Self::Marriott => "Marriott",
            Self::Hilton => "Hilton",
        }
    }

    // "american" alone would also hit "American Express".
    const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Delta => &["delta"],
            Self::United => &["united"],
            Self::Southwest => &["southwest"],
            Self::AmericanAirlines => &["american airlines", "aadvantage"],
            Self::Hyatt => &["hyatt"],
            Self::Marriott => &["marriott", "bonvoy"],
            Self::Hilton => &["hilton"],
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::AmericanAirlines => &["american", "aa"],
            _ => &[],
        }
    }

    pub fn detect(normalized_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|partner| {
            partner
                .keywords()
                .iter()
                .any(|keyword| normalized_name.contains(keyword))
        })
    }

    /// Whether a user-entered preference such as "Delta" or "AA" names this partner.
    pub fn matches_preference(self, entry: &str) -> bool {
        let entry = normalize(entry);
        if entry.is_empty() {
            return false;
        }
        self.keywords().iter().any(|keyword| entry.contains(keyword))
            || self.aliases().contains(&entry.as_str())
    }
}

/// "any" in a preference list disables partner filtering for that kind.
pub fn is_any_preference(entry: &str) -> bool {
    normalize(entry) == "any"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_marks_and_collapses_whitespace() {
        assert_eq!(
            normalize("  Chase Sapphire\u{ae}  Preferred\u{2122} Card "),
            "chase sapphire preferred card"
        );
        assert_eq!(normalize("Spend $4,000"), "spend $4,000");
    }

    #[test]
    fn ownership_key_strips_only_the_given_issuer() {
        assert_eq!(
            ownership_key("Chase Sapphire Preferred\u{ae} Card", "Chase"),
            "sapphire preferred"
        );
        assert_eq!(
            ownership_key("The Platinum Card from American Express", "American Express"),
            "platinum"
        );
        assert_eq!(ownership_key("AMEX Platinum", "American Express"), "platinum");
        assert_eq!(ownership_key("AMEX Platinum", "Citi"), "amex platinum");
        assert_eq!(ownership_key("Citibank Double Cash", "Citi"), "double cash");
        assert_eq!(ownership_key("Citizens Cash Back Plus", "Citizens"), "cash back plus");
    }

    #[test]
    fn keys_overlap_on_whole_tokens() {
        assert!(keys_overlap("sapphire preferred", "sapphire"));
        assert!(keys_overlap("sapphire", "sapphire preferred"));
        assert!(!keys_overlap("sapphire reserve", "sapphire preferred"));
        assert!(!keys_overlap("", "platinum"));
        assert!(!keys_overlap("ink", "inkwell cash"));
        assert!(keys_overlap("gold", "gold"));
        assert!(!keys_overlap("gold", "business gold"));
        assert!(!keys_overlap("delta skymiles gold", "gold"));
    }

    fn holds(held: &str, name: &str, issuer: &str) -> bool {
        keys_overlap(&ownership_key(held, issuer), &ownership_key(name, issuer))
    }

    #[test]
    fn held_names_are_keyed_against_the_entry_issuer() {
        assert!(holds(
            "AMEX Platinum",
            "The Platinum Card from American Express",
            "American Express"
        ));
        assert!(!holds("AMEX Platinum", "Citi AAdvantage Platinum Select", "Citi"));
        assert!(!holds(
            "American Express Gold Card",
            "Delta SkyMiles Gold American Express Card",
            "American Express"
        ));
        assert!(holds("citi double cash card", "Citi Double Cash", "Citi"));
    }

    #[test]
    fn issuer_families_need_whole_words() {
        assert!(is_chase(&normalize("JPMorgan Chase")));
        assert!(!is_chase(&normalize("BankAmericard Purchase Rewards")));
        assert!(is_amex(&normalize("Delta SkyMiles Gold AMEX")));
        assert!(!is_amex(&normalize("Flamex Travel")));
    }

    #[test]
    fn amex_family_parsing() {
        assert_eq!(
            AmexFamily::from_name("AMEX Personal Platinum"),
            Some(AmexFamily::PersonalPlatinum)
        );
        assert_eq!(
            AmexFamily::from_name("Business Gold Card"),
            Some(AmexFamily::BusinessGold)
        );
        assert_eq!(AmexFamily::from_name("Blue Cash Everyday"), None);
    }

    #[test]
    fn partner_detection_avoids_american_express() {
        assert_eq!(
            TravelPartner::detect(&normalize("Delta SkyMiles Gold American Express Card")),
            Some(TravelPartner::Delta)
        );
        assert_eq!(
            TravelPartner::detect(&normalize("The Platinum Card from American Express")),
            None
        );
        assert_eq!(
            TravelPartner::detect(&normalize("Citi AAdvantage Platinum Select")),
            Some(TravelPartner::AmericanAirlines)
        );
        assert_eq!(TravelPartner::Hilton.kind(), PartnerKind::Hotel);
    }

    #[test]
    fn preference_matching_accepts_aliases() {
        assert!(TravelPartner::AmericanAirlines.matches_preference("AA"));
        assert!(TravelPartner::AmericanAirlines.matches_preference("American"));
        assert!(TravelPartner::Delta.matches_preference("Delta Air Lines"));
        assert!(!TravelPartner::United.matches_preference("Southwest"));
        assert!(is_any_preference(" Any "));
    }
}
