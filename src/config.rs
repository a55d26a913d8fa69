use serde::Deserialize;
use std::fs;

use crate::model::{ConfigError, Currency};

/// Top-level configuration, loaded from a JSON file. Every knob the pipeline
/// depends on lives here so the scraper can be retargeted to another market
/// without code changes; the defaults encode the Ñuñoa / Villa Los Jardines
/// market the binary ships for.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub max_pages: u32,
    pub delay_between_pages_secs: u64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub user_agent: String,
    pub output_prefix: String,
    pub database_path: String,
    pub extraction: ExtractionConfig,
    pub validation: ValidationConfig,
}

/// Vocabulary the field parsers match against. All of it is data, none of it
/// is code: new markers, labels, and amenity words are config edits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub currency_markers: Vec<CurrencyMarker>,
    pub bedroom_labels: Vec<String>,
    pub bathroom_labels: Vec<String>,
    pub area_units: Vec<String>,
    pub amenity_vocabulary: Vec<String>,
}

/// A currency token as it appears next to an amount, e.g. `$` before the
/// number or `pesos` after it. Markers are tried in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyMarker {
    pub token: String,
    pub currency: Currency,
    pub position: MarkerPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPosition {
    Prefix,
    Suffix,
}

/// Plausibility bounds for the validator. Values outside these ranges are far
/// more likely parsing artifacts than genuine listings in this market.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub require_title_or_price: bool,
    pub clp_price: Bounds<i64>,
    pub uf_price: Bounds<i64>,
    pub square_meters: Bounds<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> Bounds<T> {
    pub fn contains(&self, value: &T) -> bool {
        value >= &self.min && value <= &self.max
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.portalinmobiliario.com/venta/casa/rm-metropolitana/nunoa/villa-los-jardines---villa-los-presidentes".to_string(),
            max_pages: 10,
            delay_between_pages_secs: 3,
            request_timeout_secs: 30,
            max_retries: 3,
            retry_delay_secs: 5,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            output_prefix: "portal_properties".to_string(),
            database_path: "data.db".to_string(),
            extraction: ExtractionConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            currency_markers: vec![
                CurrencyMarker {
                    token: "$".to_string(),
                    currency: Currency::Clp,
                    position: MarkerPosition::Prefix,
                },
                CurrencyMarker {
                    token: "UF".to_string(),
                    currency: Currency::Uf,
                    position: MarkerPosition::Prefix,
                },
                CurrencyMarker {
                    token: "pesos".to_string(),
                    currency: Currency::Clp,
                    position: MarkerPosition::Suffix,
                },
                CurrencyMarker {
                    token: "CLP".to_string(),
                    currency: Currency::Clp,
                    position: MarkerPosition::Suffix,
                },
            ],
            bedroom_labels: strings(&[
                "dormitorios",
                "dormitorio",
                "habitaciones",
                "habitación",
                "piezas",
                "pieza",
            ]),
            bathroom_labels: strings(&["baños", "baño"]),
            // Longer variants first so alternation prefers them.
            area_units: strings(&["m² útiles", "m²", "m2", "metros"]),
            amenity_vocabulary: strings(&[
                "jardín",
                "estacionamiento",
                "piscina",
                "parrilla",
                "alarma",
                "aire acondicionado",
                "gimnasio",
                "quincho",
                "bodega",
                "terraza",
                "seguridad",
            ]),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_title_or_price: true,
            clp_price: Bounds { min: 50_000_000, max: 500_000_000 },
            uf_price: Bounds { min: 1_000, max: 20_000 },
            square_meters: Bounds { min: 30.0, max: 500.0 },
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
