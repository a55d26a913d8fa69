use crate::model::{Currency, FieldStats, PriceStats, PropertyRecord, SummaryReport};

/// Recomputes the summary from the full accepted-record collection. Absent
/// fields are excluded from their aggregate entirely; a record without a
/// price does not drag any currency's mean toward zero.
pub fn summarize(records: &[PropertyRecord]) -> SummaryReport {
    let mut prices = Vec::new();
    for currency in [Currency::Clp, Currency::Uf, Currency::Unknown] {
        let amounts: Vec<i64> = records
            .iter()
            .filter(|record| record.price_currency == Some(currency))
            .filter_map(|record| record.price)
            .collect();
        if let (Some(&min), Some(&max)) = (amounts.iter().min(), amounts.iter().max()) {
            prices.push(PriceStats {
                currency,
                count: amounts.len(),
                min,
                max,
                mean: amounts.iter().sum::<i64>() as f64 / amounts.len() as f64,
            });
        }
    }

    let bedrooms: Vec<f64> = records
        .iter()
        .filter_map(|record| record.bedrooms)
        .map(f64::from)
        .collect();
    let square_meters: Vec<f64> = records
        .iter()
        .filter_map(|record| record.square_meters)
        .collect();

    SummaryReport {
        total: records.len(),
        prices,
        bedrooms: field_stats(&bedrooms),
        square_meters: field_stats(&square_meters),
    }
}

fn field_stats(values: &[f64]) -> Option<FieldStats> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(FieldStats { count: values.len(), min, max, mean })
}
