// CSV/JSON export of the final dataset and its summary.
use std::fs;
use std::path::Path;
use tracing::info;

use crate::model::{ExportError, PropertyRecord, SummaryReport};

const CSV_HEADER: &str = "title,price,price_currency,location,bedrooms,bathrooms,\
square_meters,address,features,raw_text,timestamp";

pub fn export_json(records: &[PropertyRecord], path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    info!("exported {} records to {}", records.len(), path.display());
    Ok(())
}

/// Flat projection of the record schema; `features` collapses into one
/// `;`-joined field.
pub fn export_csv(records: &[PropertyRecord], path: &Path) -> Result<(), ExportError> {
    let mut out = String::with_capacity(records.len() * 256);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        let features = record
            .features
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(";");
        let row = [
            csv_field(record.title.as_deref().unwrap_or("")),
            record.price.map(|p| p.to_string()).unwrap_or_default(),
            record
                .price_currency
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            csv_field(record.location.as_deref().unwrap_or("")),
            record.bedrooms.map(|n| n.to_string()).unwrap_or_default(),
            record.bathrooms.map(|n| n.to_string()).unwrap_or_default(),
            record
                .square_meters
                .map(|m| m.to_string())
                .unwrap_or_default(),
            csv_field(record.address.as_deref().unwrap_or("")),
            csv_field(&features),
            csv_field(&record.raw_text),
            record.timestamp.to_rfc3339(),
        ]
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }

    fs::write(path, out)?;
    info!("exported {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn export_summary(summary: &SummaryReport, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    info!("wrote summary report to {}", path.display());
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
