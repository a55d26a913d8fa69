// Core structs: ListingFragment, PropertyRecord, SummaryReport, RunStats
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Price denomination used on Portal Inmobiliario listings: Chilean pesos or
/// the inflation-indexed Unidad de Fomento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "CLP")]
    Clp,
    #[serde(rename = "UF")]
    Uf,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Clp => "CLP",
            Currency::Uf => "UF",
            Currency::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Currency {
        match label {
            "CLP" => Currency::Clp,
            "UF" => Currency::Uf,
            _ => Currency::Unknown,
        }
    }
}

/// One listing's region within a search-results page, split into the
/// sub-regions the markup exposes. A fragment with every sub-region missing is
/// still usable: `raw_text` is always populated.
#[derive(Debug, Clone, Default)]
pub struct ListingFragment {
    pub title: Option<String>,
    pub price: Option<String>,
    pub attributes: Vec<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub raw_text: String,
}

/// Canonical output entity. Built once per fragment by the extractor, gated by
/// the validator, immutable once accepted.
///
/// `price` and `price_currency` are set together or not at all. `raw_text` is
/// never empty-optional: it is the source of truth when structured parsing
/// finds nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub price_currency: Option<Currency>,
    pub location: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub square_meters: Option<f64>,
    pub address: Option<String>,
    pub features: BTreeSet<String>,
    pub raw_text: String,
    pub timestamp: DateTime<Utc>,
}

/// Min/max/mean over the records where a numeric field is present. Absent
/// values are excluded, not counted as zero.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceStats {
    pub currency: Currency,
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
}

/// Read-only projection over the final accepted-record collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryReport {
    pub total: usize,
    pub prices: Vec<PriceStats>,
    pub bedrooms: Option<FieldStats>,
    pub square_meters: Option<FieldStats>,
}

/// Counters for the end-of-run report, owned by the pipeline context.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunStats {
    pub pages_fetched: usize,
    pub fragments_found: usize,
    pub candidates_extracted: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("giving up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
