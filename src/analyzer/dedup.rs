use std::collections::HashSet;

use crate::model::{Currency, PropertyRecord};

/// Identity of a listing across pages. Absent fields are part of the key as a
/// distinct wildcard value: two records with no address are comparable to
/// each other, but an absent address never matches a present one.
type IdentityKey = (Option<String>, Option<(i64, Currency)>, Option<String>);

fn identity_key(record: &PropertyRecord) -> IdentityKey {
    (
        record.title.clone(),
        record
            .price
            .map(|amount| (amount, record.price_currency.unwrap_or(Currency::Unknown))),
        record.address.clone(),
    )
}

/// Drops every record whose identity was already seen, keeping the first
/// occurrence and the input order. Returns the surviving records and the
/// number removed. Partial duplicates are never merged.
pub fn dedup_records(records: Vec<PropertyRecord>) -> (Vec<PropertyRecord>, usize) {
    let mut seen: HashSet<IdentityKey> = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());
    let mut removed = 0;

    for record in records {
        if seen.insert(identity_key(&record)) {
            unique.push(record);
        } else {
            removed += 1;
        }
    }

    (unique, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn record(title: Option<&str>, price: Option<i64>, address: Option<&str>) -> PropertyRecord {
        PropertyRecord {
            title: title.map(String::from),
            price,
            price_currency: price.map(|_| Currency::Clp),
            location: None,
            bedrooms: None,
            bathrooms: None,
            square_meters: None,
            address: address.map(String::from),
            features: BTreeSet::new(),
            raw_text: "raw".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let mut duplicate = record(Some("Casa A"), Some(80_000_000), Some("Calle 1"));
        duplicate.raw_text = "different raw text, later capture".to_string();

        let (unique, removed) = dedup_records(vec![
            record(Some("Casa A"), Some(80_000_000), Some("Calle 1")),
            duplicate,
        ]);

        assert_eq!(unique.len(), 1);
        assert_eq!(removed, 1);
        assert_eq!(unique[0].raw_text, "raw");
    }

    #[test]
    fn preserves_relative_order_of_first_seen_records() {
        let (unique, _) = dedup_records(vec![
            record(Some("Casa A"), Some(80_000_000), None),
            record(Some("Casa B"), Some(90_000_000), None),
            record(Some("Casa A"), Some(80_000_000), None),
            record(Some("Casa C"), Some(70_000_000), None),
        ]);

        let titles: Vec<_> = unique.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["Casa A", "Casa B", "Casa C"]);
    }

    #[test]
    fn is_idempotent() {
        let records = vec![
            record(Some("Casa A"), Some(80_000_000), None),
            record(Some("Casa A"), Some(80_000_000), None),
            record(Some("Casa B"), None, Some("Calle 2")),
        ];

        let (once, removed_once) = dedup_records(records);
        assert_eq!(removed_once, 1);

        let (twice, removed_twice) = dedup_records(once.clone());
        assert_eq!(removed_twice, 0);

        let once_titles: Vec<_> = once.iter().map(|r| r.title.clone()).collect();
        let twice_titles: Vec<_> = twice.iter().map(|r| r.title.clone()).collect();
        assert_eq!(once_titles, twice_titles);
    }

    #[test]
    fn absent_field_never_matches_a_present_one() {
        let (unique, removed) = dedup_records(vec![
            record(Some("Casa A"), Some(80_000_000), None),
            record(Some("Casa A"), Some(80_000_000), Some("Calle 1")),
        ]);

        assert_eq!(unique.len(), 2);
        assert_eq!(removed, 0);
    }

    #[test]
    fn same_amount_in_different_currencies_is_not_a_duplicate() {
        let mut uf = record(Some("Casa A"), Some(5_000), None);
        uf.price_currency = Some(Currency::Uf);
        let mut clp = record(Some("Casa A"), Some(5_000), None);
        clp.price_currency = Some(Currency::Clp);

        let (unique, removed) = dedup_records(vec![uf, clp]);
        assert_eq!(unique.len(), 2);
        assert_eq!(removed, 0);
    }
}
