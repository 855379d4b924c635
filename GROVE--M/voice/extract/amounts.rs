use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    cues::UNITS,
    helper::{parse_amount, parse_count},
};

const NUMBER: &str = r"\d[\d,]*(?:\.\d+)?";
const COUNT_WORD: &str = "an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";

// Digits may touch the unit ("5kg"); number words must stand apart from it.
static QUANTITY_RULES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        format!(r"\b(?:(?P<n>{NUMBER})\s*|(?P<w>{COUNT_WORD})\s+)(?:{UNITS})\b"),
        format!(r"\b(?:quantity|qty)(?:\s+of)?\s*:?\s*(?P<n>{NUMBER})"),
        format!(r"\bneeds?\s+(?:(?P<n>{NUMBER})|(?P<w>{COUNT_WORD})\b)"),
    ]
    .map(|pattern| Regex::new(&pattern).expect("quantity regex"))
});

static PRICE_RULES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        format!(r"\$\s?(?P<n>{NUMBER})"),
        format!(r"\b(?P<n>{NUMBER})\s*(?:dollars?|bucks|usd)\b"),
        format!(
            r"\b(?:costs?|costing|priced?(?:\s+(?:is|of|at))?|worth|value of)\s+(?:about\s+|around\s+|roughly\s+)?\$?(?P<n>{NUMBER})"
        ),
    ]
    .map(|pattern| Regex::new(&pattern).expect("price regex"))
});

/// First number before a unit word, after "quantity/qty of", or after "need".
#[must_use]
pub fn quantity(normalized: &str) -> Option<f64> {
    QUANTITY_RULES.iter().find_map(|rule| {
        let caps = rule.captures(normalized)?;
        match (caps.name("n"), caps.name("w")) {
            (Some(digits), _) => parse_amount(digits.as_str()),
            (None, Some(word)) => parse_count(word.as_str()).map(|count| count as f64),
            (None, None) => None,
        }
    })
}

/// First of `$N`, `N dollars`, or a number after "costs/price/worth/value of".
#[must_use]
pub fn price(normalized: &str) -> Option<f64> {
    PRICE_RULES
        .iter()
        .find_map(|rule| parse_amount(rule.captures(normalized)?.name("n")?.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_before_unit_word() {
        assert_eq!(quantity("i need 5 bags of compost for $40"), Some(5.0));
        assert_eq!(quantity("pick up 2.5 gallons of neem oil"), Some(2.5));
        assert_eq!(quantity("order two bales of straw"), Some(2.0));
    }

    #[test]
    fn quantity_after_keywords() {
        assert_eq!(quantity("seed garlic, quantity of 40"), Some(40.0));
        assert_eq!(quantity("we need 12 fruit trees"), Some(12.0));
        assert_eq!(quantity("buy a wheelbarrow"), None);
    }

    #[test]
    fn grouped_digits_are_read_whole() {
        assert_eq!(quantity("i need 1,000 bags of compost"), Some(1000.0));
        assert_eq!(quantity("qty 2,500"), Some(2500.0));
        assert_eq!(quantity("we need 1,200 seedlings"), Some(1200.0));
    }

    #[test]
    fn number_words_must_stand_apart_from_units() {
        assert_eq!(quantity("spread 5kg of lime"), Some(5.0));
        assert_eq!(quantity("stack it aft of the shed"), None);
        assert_eq!(quantity("aloads"), None);
        assert_eq!(quantity("a load of woodchips"), Some(1.0));
    }

    #[test]
    fn price_forms_in_order() {
        assert_eq!(price("i need 5 bags of compost for $40"), Some(40.0));
        assert_eq!(price("a tiller for 1,200 dollars"), Some(1200.0));
        assert_eq!(price("the pump costs about 85.50"), Some(85.5));
        assert_eq!(price("worth $300"), Some(300.0));
        assert_eq!(price("five bags of compost"), None);
    }
}
