mod analyzer;
mod config;
mod exporter;
mod extractor;
mod fields;
mod model;
mod parser;
mod pipeline;
mod scraper;
mod storage;
mod validator;

use std::path::Path;

use chrono::Utc;
use rand::Rng;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};

use crate::config::{AppConfig, load_config};
use crate::extractor::ListingExtractor;
use crate::parser::{Parser, PortalParser};
use crate::pipeline::{PipelineContext, PipelineOutput};
use crate::scraper::{PortalFetcher, Scraper};
use crate::storage::SqliteStorage;
use crate::validator::Validator;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("config load failed ({e}), using built-in defaults");
            AppConfig::default()
        }
    };
    info!("target: {}", config.base_url);

    let fetcher = match PortalFetcher::new(&config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("failed to build http client: {e}");
            return;
        }
    };
    let page_parser = PortalParser::new();
    let mut ctx = PipelineContext::new(
        ListingExtractor::new(config.extraction.clone()),
        Validator::new(config.validation.clone()),
    );

    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(storage) => Some(storage),
        Err(e) => {
            warn!("storage init failed: {e}");
            None
        }
    };
    if let Some(storage) = &storage {
        if let (Ok(previous), Ok(runs)) = (storage.load_records(), storage.run_count()) {
            info!("previous dataset: {} records over {} runs", previous.len(), runs);
        }
    }

    let started_at = Utc::now();
    for page in 1..=config.max_pages {
        let html = match fetcher.fetch_page(page).await {
            Ok(html) => html,
            Err(e) => {
                error!("page {page}: {e}");
                break;
            }
        };

        let fragments = page_parser.parse(&html);
        if fragments.is_empty() {
            info!("page {page}: no listings found, stopping pagination");
            break;
        }
        info!("page {page}: {} listing fragments", fragments.len());
        ctx.process_page(&fragments);

        if page < config.max_pages {
            let jitter = rand::rng().random_range(0..1000);
            sleep(Duration::from_secs(config.delay_between_pages_secs) + Duration::from_millis(jitter))
                .await;
        }
    }

    let output = ctx.finish();
    log_summary(&output);

    if output.stats.pages_fetched == 0 {
        error!("could not obtain any page content, aborting run");
        std::process::exit(1);
    }

    if let Some(storage) = &storage {
        if let Err(e) = storage.replace_all(&output.records) {
            warn!("saving records failed: {e}");
        }
        if let Err(e) = storage.record_run(started_at, &output.stats) {
            warn!("saving run stats failed: {e}");
        }
    }

    if output.records.is_empty() {
        warn!("no records extracted, skipping export");
        return;
    }

    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let json_path = format!("{}_{stamp}.json", config.output_prefix);
    let csv_path = format!("{}_{stamp}.csv", config.output_prefix);
    let summary_path = format!("{}_summary_{stamp}.json", config.output_prefix);

    if let Err(e) = exporter::export_json(&output.records, Path::new(&json_path)) {
        warn!("json export failed: {e}");
    }
    if let Err(e) = exporter::export_csv(&output.records, Path::new(&csv_path)) {
        warn!("csv export failed: {e}");
    }
    if let Err(e) = exporter::export_summary(&output.summary, Path::new(&summary_path)) {
        warn!("summary export failed: {e}");
    }

    info!("run finished");
}

fn log_summary(output: &PipelineOutput) {
    let stats = &output.stats;
    info!(
        "run summary: {} pages, {} fragments, {} candidates, {} accepted, {} rejected, {} duplicates removed",
        stats.pages_fetched,
        stats.fragments_found,
        stats.candidates_extracted,
        stats.accepted,
        stats.rejected,
        stats.duplicates_removed,
    );
    info!("final records: {}", output.summary.total);

    for price in &output.summary.prices {
        info!(
            "{}: {} records, {} - {} (mean {:.0})",
            price.currency.as_str(),
            price.count,
            price.min,
            price.max,
            price.mean,
        );
    }
    if let Some(bedrooms) = &output.summary.bedrooms {
        info!(
            "bedrooms: {} - {} (mean {:.1})",
            bedrooms.min, bedrooms.max, bedrooms.mean
        );
    }
    if let Some(square_meters) = &output.summary.square_meters {
        info!(
            "size: {} - {} m² (mean {:.1})",
            square_meters.min, square_meters.max, square_meters.mean
        );
    }
}
