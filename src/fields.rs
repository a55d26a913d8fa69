// Field parsers: pure functions from a text fragment to a typed value.
// A parser that finds nothing returns None; malformed input is never an error.
use regex::Regex;
use std::collections::BTreeSet;

use crate::config::{CurrencyMarker, MarkerPosition};
use crate::model::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedPrice {
    pub amount: i64,
    pub currency: Currency,
}

/// Scans for a numeric amount adjacent to a currency marker. Markers are
/// tried in config order and the first hit wins, so `$` shadows `UF` when a
/// fragment carries both. Thousands separators are stripped before the
/// integer conversion. Range plausibility is the validator's job, not ours.
pub fn parse_price(text: &str, markers: &[CurrencyMarker]) -> Option<ParsedPrice> {
    for marker in markers {
        let token = regex::escape(&marker.token);
        let pattern = match marker.position {
            MarkerPosition::Prefix => format!(r"(?i){token}\s*(\d[\d.,]*)"),
            MarkerPosition::Suffix => format!(r"(?i)(\d[\d.,]*)\s*{token}"),
        };
        let Ok(re) = Regex::new(&pattern) else { continue };
        if let Some(caps) = re.captures(text) {
            let digits: String = caps[1].chars().filter(char::is_ascii_digit).collect();
            if let Ok(amount) = digits.parse::<i64>() {
                return Some(ParsedPrice { amount, currency: marker.currency });
            }
        }
    }
    None
}

/// Finds an integer next to one of the label keywords ("3 dormitorios",
/// "baños: 2"). Number-before-label is tried first since that is how the
/// site phrases attributes; only the first match counts, multiple mentions
/// are never summed.
pub fn parse_count(text: &str, labels: &[String]) -> Option<u32> {
    if labels.is_empty() {
        return None;
    }
    let alternation = labels
        .iter()
        .map(|label| regex::escape(label))
        .collect::<Vec<_>>()
        .join("|");
    if let Ok(re) = Regex::new(&format!(r"(?i)(\d+)\s*(?:{alternation})")) {
        if let Some(caps) = re.captures(text) {
            if let Ok(count) = caps[1].parse() {
                return Some(count);
            }
        }
    }
    let re = Regex::new(&format!(r"(?i)(?:{alternation})\s*:?\s*(\d+)")).ok()?;
    re.captures(text)?[1].parse().ok()
}

/// Number immediately before an area-unit marker, integer or decimal with
/// either separator ("65 m²", "65,5 m2"). Non-positive results are a miss.
pub fn parse_area(text: &str, units: &[String]) -> Option<f64> {
    if units.is_empty() {
        return None;
    }
    let alternation = units
        .iter()
        .map(|unit| regex::escape(unit))
        .collect::<Vec<_>>()
        .join("|");
    let re = Regex::new(&format!(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:{alternation})")).ok()?;
    let caps = re.captures(text)?;
    let value: f64 = caps[1].replace(',', ".").parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Verbatim text of a location/address/title zone with whitespace collapsed.
/// No semantic parsing beyond that.
pub fn parse_text(text: &str) -> Option<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() { None } else { Some(normalized) }
}

/// Membership test of every vocabulary keyword against the lowercased text.
/// Only vocabulary words can enter the set, so unrecognized text never leaks
/// into `features`.
pub fn parse_features(text: &str, vocabulary: &[String]) -> BTreeSet<String> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .filter(|keyword| haystack.contains(keyword.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;

    fn cfg() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn price_clp_with_dot_separators() {
        let price = parse_price("$168.000.000", &cfg().currency_markers).unwrap();
        assert_eq!(price.amount, 168_000_000);
        assert_eq!(price.currency, Currency::Clp);
    }

    #[test]
    fn price_clp_with_comma_separators_and_space() {
        let price = parse_price("Desde $ 95,500,000", &cfg().currency_markers).unwrap();
        assert_eq!(price.amount, 95_500_000);
        assert_eq!(price.currency, Currency::Clp);
    }

    #[test]
    fn price_uf_prefix_marker() {
        let price = parse_price("UF 5.200", &cfg().currency_markers).unwrap();
        assert_eq!(price.amount, 5_200);
        assert_eq!(price.currency, Currency::Uf);
    }

    #[test]
    fn price_pesos_suffix_marker() {
        let price = parse_price("120000000 pesos", &cfg().currency_markers).unwrap();
        assert_eq!(price.amount, 120_000_000);
        assert_eq!(price.currency, Currency::Clp);
    }

    #[test]
    fn price_clp_suffix_marker() {
        let price = parse_price("168000000 CLP", &cfg().currency_markers).unwrap();
        assert_eq!(price.amount, 168_000_000);
        assert_eq!(price.currency, Currency::Clp);
    }

    #[test]
    fn price_without_marker_is_a_miss() {
        assert_eq!(parse_price("168.000.000", &cfg().currency_markers), None);
        assert_eq!(parse_price("Casa en Ñuñoa", &cfg().currency_markers), None);
    }

    #[test]
    fn price_out_of_plausible_range_still_parses() {
        // Parsing and validation are separate layers.
        let low = parse_price("$1.000", &cfg().currency_markers).unwrap();
        assert_eq!(low.amount, 1_000);
        let high = parse_price("$900.000.000.000", &cfg().currency_markers).unwrap();
        assert_eq!(high.amount, 900_000_000_000);
    }

    #[test]
    fn price_first_marker_wins_when_both_present() {
        let price = parse_price("$80.000.000 equivalente a UF 2.100", &cfg().currency_markers)
            .unwrap();
        assert_eq!(price.currency, Currency::Clp);
        assert_eq!(price.amount, 80_000_000);
    }

    #[test]
    fn count_number_before_label() {
        assert_eq!(parse_count("3 dormitorios", &cfg().bedroom_labels), Some(3));
        assert_eq!(parse_count("1 baño", &cfg().bathroom_labels), Some(1));
        assert_eq!(parse_count("2 baños", &cfg().bathroom_labels), Some(2));
    }

    #[test]
    fn count_label_before_number() {
        assert_eq!(
            parse_count("dormitorios: 4", &cfg().bedroom_labels),
            Some(4)
        );
    }

    #[test]
    fn count_takes_first_match_only() {
        assert_eq!(
            parse_count("3 dormitorios 2 dormitorios en suite", &cfg().bedroom_labels),
            Some(3)
        );
    }

    #[test]
    fn count_alternate_spanish_labels() {
        assert_eq!(parse_count("4 habitaciones", &cfg().bedroom_labels), Some(4));
        assert_eq!(parse_count("2 piezas", &cfg().bedroom_labels), Some(2));
    }

    #[test]
    fn count_without_label_is_a_miss() {
        assert_eq!(parse_count("casa amplia", &cfg().bedroom_labels), None);
        assert_eq!(parse_count("65 m²", &cfg().bathroom_labels), None);
    }

    #[test]
    fn area_integer_value() {
        assert_eq!(parse_area("65 m²", &cfg().area_units), Some(65.0));
        assert_eq!(parse_area("226m2", &cfg().area_units), Some(226.0));
        assert_eq!(parse_area("120 metros", &cfg().area_units), Some(120.0));
    }

    #[test]
    fn area_decimal_value_with_comma() {
        assert_eq!(parse_area("65,5 m²", &cfg().area_units), Some(65.5));
        assert_eq!(parse_area("82.3 m2", &cfg().area_units), Some(82.3));
    }

    #[test]
    fn area_utiles_variant() {
        assert_eq!(parse_area("140 m² útiles", &cfg().area_units), Some(140.0));
    }

    #[test]
    fn area_zero_or_missing_is_a_miss() {
        assert_eq!(parse_area("0 m²", &cfg().area_units), None);
        assert_eq!(parse_area("metros cuadrados", &cfg().area_units), None);
    }

    #[test]
    fn text_zone_is_whitespace_normalized() {
        assert_eq!(
            parse_text("  Av. Grecia 4200,\n  Ñuñoa  "),
            Some("Av. Grecia 4200, Ñuñoa".to_string())
        );
    }

    #[test]
    fn empty_text_zone_is_a_miss() {
        assert_eq!(parse_text("   \n\t "), None);
    }

    #[test]
    fn features_only_vocabulary_words_enter_the_set() {
        let features = parse_features(
            "Hermosa casa con JARDÍN, piscina y quincho techado",
            &cfg().amenity_vocabulary,
        );
        let expected: Vec<&str> = vec!["jardín", "piscina", "quincho"];
        assert_eq!(features.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn features_absent_when_no_keyword_matches() {
        let features = parse_features("Departamento céntrico", &cfg().amenity_vocabulary);
        assert!(features.is_empty());
    }

    #[test]
    fn features_deduplicated_by_set_semantics() {
        let features = parse_features(
            "jardín delantero y jardín trasero",
            &cfg().amenity_vocabulary,
        );
        assert_eq!(features.len(), 1);
        assert!(features.contains("jardín"));
    }
}
