// Portal Inmobiliario-specific HTML parsing
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::model::ListingFragment;

pub trait Parser {
    fn parse(&self, html: &str) -> Vec<ListingFragment>;
}

/// Locates listing containers in a rendered search-results page and slices
/// each one into the sub-regions the extractor consumes. The selector lists
/// target the markup shape the site serves today, ordered from the current
/// component classes down to generic fallbacks; markup drift means updating
/// these lists, not the extraction logic.
pub struct PortalParser;

const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    ".ui-search-result",
    ".ui-search-result__wrapper",
    "[data-testid*=\"result\"]",
    ".ui-search-result__content",
    "div[class*=\"result\"]",
    "div[class*=\"item\"]",
    "div[class*=\"property\"]",
    "div[class*=\"listing\"]",
    "li[class*=\"result\"]",
    "div[class*=\"card\"]",
];

const TITLE_SELECTORS: &[&str] = &[
    ".poly-component__title",
    "h3",
    "h2",
    "h1",
    ".ui-search-item__title",
    "[class*=\"title\"]",
];

const PRICE_SELECTORS: &[&str] = &[
    ".poly-component__price",
    ".andes-money-amount",
    ".ui-search-price__part",
    ".ui-search-price",
    "[class*=\"price\"]",
];

const ATTRIBUTE_SELECTORS: &[&str] = &[
    ".poly-attributes_list__item",
    ".ui-search-item__group__element",
    "[class*=\"attribute\"]",
];

const LOCATION_SELECTORS: &[&str] = &[
    ".poly-component__location",
    "[class*=\"location\"]",
    "[class*=\"neighborhood\"]",
];

const ADDRESS_SELECTORS: &[&str] = &["[class*=\"address\"]"];

impl PortalParser {
    pub fn new() -> Self {
        Self
    }

    fn first_text(element: ElementRef, selectors: &[&str]) -> Option<String> {
        for sel_str in selectors {
            let Ok(selector) = Selector::parse(sel_str) else { continue };
            if let Some(node) = element.select(&selector).next() {
                let text = collapse(node.text());
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }

    fn all_texts(element: ElementRef, selectors: &[&str]) -> Vec<String> {
        for sel_str in selectors {
            let Ok(selector) = Selector::parse(sel_str) else { continue };
            let texts: Vec<String> = element
                .select(&selector)
                .map(|node| collapse(node.text()))
                .filter(|text| !text.is_empty())
                .collect();
            if !texts.is_empty() {
                return texts;
            }
        }
        Vec::new()
    }

    /// A container with none of the known sub-regions still yields a
    /// fragment; raw text alone is enough for the extractor to work with.
    fn fragment_from(element: ElementRef) -> ListingFragment {
        ListingFragment {
            title: Self::first_text(element, TITLE_SELECTORS),
            price: Self::first_text(element, PRICE_SELECTORS),
            attributes: Self::all_texts(element, ATTRIBUTE_SELECTORS),
            location: Self::first_text(element, LOCATION_SELECTORS),
            address: Self::first_text(element, ADDRESS_SELECTORS),
            raw_text: collapse(element.text()),
        }
    }
}

impl Parser for PortalParser {
    fn parse(&self, html: &str) -> Vec<ListingFragment> {
        let document = Html::parse_document(html);

        for sel_str in CONTAINER_SELECTORS {
            let Ok(selector) = Selector::parse(sel_str) else { continue };
            let fragments: Vec<ListingFragment> =
                document.select(&selector).map(Self::fragment_from).collect();
            if !fragments.is_empty() {
                debug!(
                    "found {} listing containers using selector {}",
                    fragments.len(),
                    sel_str
                );
                return fragments;
            }
        }

        warn!("no listing containers found on page");
        Vec::new()
    }
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
