// Candidate assembly: one fragment in, exactly one record out.
use chrono::Utc;

use crate::config::ExtractionConfig;
use crate::fields;
use crate::model::{ListingFragment, PropertyRecord};

/// Turns a listing fragment into a candidate record by running each field
/// parser against its sub-region, falling back to the fragment's full raw
/// text when the zone is absent or yields nothing. Extraction never fails:
/// a fragment where nothing parses still produces a record carrying its raw
/// text, and the validator decides whether that record survives.
pub struct ListingExtractor {
    config: ExtractionConfig,
}

impl ListingExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, fragment: &ListingFragment) -> PropertyRecord {
        let cfg = &self.config;

        let price = fragment
            .price
            .as_deref()
            .and_then(|zone| fields::parse_price(zone, &cfg.currency_markers))
            .or_else(|| fields::parse_price(&fragment.raw_text, &cfg.currency_markers));

        let attribute_text = fragment.attributes.join(" ");
        let bedrooms = fields::parse_count(&attribute_text, &cfg.bedroom_labels)
            .or_else(|| fields::parse_count(&fragment.raw_text, &cfg.bedroom_labels));
        let bathrooms = fields::parse_count(&attribute_text, &cfg.bathroom_labels)
            .or_else(|| fields::parse_count(&fragment.raw_text, &cfg.bathroom_labels));
        let square_meters = fields::parse_area(&attribute_text, &cfg.area_units)
            .or_else(|| fields::parse_area(&fragment.raw_text, &cfg.area_units));

        PropertyRecord {
            title: fragment.title.as_deref().and_then(fields::parse_text),
            price: price.map(|p| p.amount),
            price_currency: price.map(|p| p.currency),
            // location and address are independent zones; neither falls back
            // to the other
            location: fragment.location.as_deref().and_then(fields::parse_text),
            bedrooms,
            bathrooms,
            square_meters,
            address: fragment.address.as_deref().and_then(fields::parse_text),
            features: fields::parse_features(&fragment.raw_text, &cfg.amenity_vocabulary),
            raw_text: fragment.raw_text.clone(),
            timestamp: Utc::now(),
        }
    }
}
