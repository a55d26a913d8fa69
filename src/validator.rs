// Plausibility gate between candidate and accepted records.
use crate::config::ValidationConfig;
use crate::model::{Currency, PropertyRecord};

/// Why a candidate was turned away. Rejections are run statistics, not
/// errors; nothing here propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingTitleAndPrice,
    PriceOutOfRange,
    AreaOutOfRange,
}

/// Applies the configured plausibility rules to a candidate record. Rules are
/// conjunctive: the first hard failure rejects the whole record. Out-of-range
/// values are treated as extraction artifacts rather than genuine outliers,
/// so the validator rejects instead of coercing.
pub struct Validator {
    rules: ValidationConfig,
}

impl Validator {
    pub fn new(rules: ValidationConfig) -> Self {
        Self { rules }
    }

    pub fn validate(&self, record: &PropertyRecord) -> Result<(), RejectReason> {
        let rules = &self.rules;

        if rules.require_title_or_price && record.title.is_none() && record.price.is_none() {
            return Err(RejectReason::MissingTitleAndPrice);
        }

        if let Some(price) = record.price {
            // An unknown currency tag is held to the nominal range.
            let bounds = match record.price_currency {
                Some(Currency::Uf) => rules.uf_price,
                _ => rules.clp_price,
            };
            if !bounds.contains(&price) {
                return Err(RejectReason::PriceOutOfRange);
            }
        }

        if let Some(square_meters) = record.square_meters {
            if !rules.square_meters.contains(&square_meters) {
                return Err(RejectReason::AreaOutOfRange);
            }
        }

        Ok(())
    }
}
