use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use std::collections::BTreeSet;

use crate::model::{Currency, PropertyRecord, RunStats, StorageError};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and runs the schema migration.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS properties (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                price INTEGER,
                price_currency TEXT,
                location TEXT,
                bedrooms INTEGER,
                bathrooms INTEGER,
                square_meters REAL,
                address TEXT,
                features TEXT NOT NULL DEFAULT '',
                raw_text TEXT NOT NULL,
                captured_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at TEXT NOT NULL,
                pages_fetched INTEGER NOT NULL,
                fragments_found INTEGER NOT NULL,
                candidates_extracted INTEGER NOT NULL,
                accepted INTEGER NOT NULL,
                rejected INTEGER NOT NULL,
                duplicates_removed INTEGER NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Mirrors the latest scrape: the table always holds exactly the final
    /// deduplicated dataset of the most recent run.
    pub fn replace_all(&self, records: &[PropertyRecord]) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM properties", [])?;
        for record in records {
            self.save_record(record)?;
        }
        Ok(())
    }

    pub fn save_record(&self, record: &PropertyRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO properties (
                title, price, price_currency, location, bedrooms, bathrooms,
                square_meters, address, features, raw_text, captured_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.title,
                record.price,
                record.price_currency.map(Currency::as_str),
                record.location,
                record.bedrooms,
                record.bathrooms,
                record.square_meters,
                record.address,
                join_features(&record.features),
                record.raw_text,
                record.timestamp,
            ],
        )?;
        Ok(())
    }

    /// Returns all stored records in insertion order.
    pub fn load_records(&self) -> Result<Vec<PropertyRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT title, price, price_currency, location, bedrooms, bathrooms,
                    square_meters, address, features, raw_text, captured_at
             FROM properties ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], Self::map_record)?;
        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    pub fn record_run(
        &self,
        started_at: DateTime<Utc>,
        stats: &RunStats,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO runs (
                started_at, pages_fetched, fragments_found, candidates_extracted,
                accepted, rejected, duplicates_removed
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                started_at,
                stats.pages_fetched as i64,
                stats.fragments_found as i64,
                stats.candidates_extracted as i64,
                stats.accepted as i64,
                stats.rejected as i64,
                stats.duplicates_removed as i64,
            ],
        )?;
        Ok(())
    }

    pub fn run_count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn map_record(row: &Row) -> Result<PropertyRecord, rusqlite::Error> {
        let currency: Option<String> = row.get(2)?;
        let features: String = row.get(8)?;

        Ok(PropertyRecord {
            title: row.get(0)?,
            price: row.get(1)?,
            price_currency: currency.as_deref().map(Currency::from_label),
            location: row.get(3)?,
            bedrooms: row.get(4)?,
            bathrooms: row.get(5)?,
            square_meters: row.get(6)?,
            address: row.get(7)?,
            features: split_features(&features),
            raw_text: row.get(9)?,
            timestamp: row.get(10)?,
        })
    }
}

fn join_features(features: &BTreeSet<String>) -> String {
    features.iter().cloned().collect::<Vec<_>>().join(";")
}

fn split_features(joined: &str) -> BTreeSet<String> {
    joined
        .split(';')
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SubsecRound;

    fn storage() -> SqliteStorage {
        SqliteStorage::new(":memory:").unwrap()
    }

    fn record() -> PropertyRecord {
        PropertyRecord {
            title: Some("Casa 3d Ñuñoa".to_string()),
            price: Some(168_000_000),
            price_currency: Some(Currency::Clp),
            location: Some("Villa Los Jardines, Ñuñoa".to_string()),
            bedrooms: Some(3),
            bathrooms: Some(1),
            square_meters: Some(65.0),
            address: None,
            features: BTreeSet::from(["jardín".to_string(), "piscina".to_string()]),
            raw_text: "Casa 3d $168.000.000 jardín piscina".to_string(),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    #[test]
    fn records_round_trip_through_the_database() {
        let storage = storage();
        let original = record();
        storage.save_record(&original).unwrap();

        let loaded = storage.load_records().unwrap();
        assert_eq!(loaded.len(), 1);

        let restored = &loaded[0];
        assert_eq!(restored.title, original.title);
        assert_eq!(restored.price, original.price);
        assert_eq!(restored.price_currency, original.price_currency);
        assert_eq!(restored.bedrooms, original.bedrooms);
        assert_eq!(restored.bathrooms, original.bathrooms);
        assert_eq!(restored.square_meters, original.square_meters);
        assert_eq!(restored.features, original.features);
        assert_eq!(restored.raw_text, original.raw_text);
        assert_eq!(restored.timestamp, original.timestamp);
    }

    #[test]
    fn absent_fields_stay_absent_after_a_round_trip() {
        let storage = storage();
        let mut sparse = record();
        sparse.price = None;
        sparse.price_currency = None;
        sparse.bedrooms = None;
        sparse.square_meters = None;
        sparse.features.clear();
        storage.save_record(&sparse).unwrap();

        let restored = &storage.load_records().unwrap()[0];
        assert_eq!(restored.price, None);
        assert_eq!(restored.price_currency, None);
        assert_eq!(restored.bedrooms, None);
        assert_eq!(restored.square_meters, None);
        assert!(restored.features.is_empty());
    }

    #[test]
    fn replace_all_mirrors_the_latest_dataset() {
        let storage = storage();
        storage.save_record(&record()).unwrap();
        storage.save_record(&record()).unwrap();

        let mut newer = record();
        newer.title = Some("Casa nueva".to_string());
        storage.replace_all(&[newer]).unwrap();

        let loaded = storage.load_records().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title.as_deref(), Some("Casa nueva"));
    }

    #[test]
    fn runs_accumulate_one_row_per_run() {
        let storage = storage();
        let stats = RunStats { pages_fetched: 2, accepted: 10, ..Default::default() };
        storage.record_run(Utc::now(), &stats).unwrap();
        storage.record_run(Utc::now(), &stats).unwrap();
        assert_eq!(storage.run_count().unwrap(), 2);
    }
}
