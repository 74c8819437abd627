//! Append-only offer history.
//!
//! Every successful fetch cycle writes one batch of records sharing a single
//! `queried_at`. Records are never updated or deleted.

use super::connection::CacheDb;
use crate::Error;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Row};

/// Storage format of `queried_at` (local time, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_COLUMNS: &str =
    "SELECT search_term, item_name, price, store_name, offer_url, expiry_display, queried_at, id FROM offer_history";

/// The cheapest offer found for one item during one fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRecord {
    /// Normalized term the offer was fetched for.
    pub search_term: String,
    pub item_name: String,
    pub price: f64,
    pub store_name: String,
    pub offer_url: Option<String>,
    /// `dd/mm/yyyy` or the "no expiry" sentinel.
    pub expiry_display: String,
    pub queried_at: NaiveDateTime,
}

/// A record together with its storage row id, as written by exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOffer {
    pub id: i64,
    #[serde(flatten)]
    pub record: OfferRecord,
}

/// Format a timestamp the way it is stored.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, Error> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| Error::InvalidTimestamp(raw.to_string()))
}

/// Raw row as read from SQLite, before timestamp parsing.
struct StoredRow {
    search_term: String,
    item_name: String,
    price: f64,
    store_name: String,
    offer_url: Option<String>,
    expiry_display: String,
    queried_at: String,
    id: i64,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            search_term: row.get(0)?,
            item_name: row.get(1)?,
            price: row.get(2)?,
            store_name: row.get(3)?,
            offer_url: row.get(4)?,
            expiry_display: row.get(5)?,
            queried_at: row.get(6)?,
            id: row.get(7)?,
        })
    }

    fn into_stored(self) -> Result<StoredOffer, Error> {
        let id = self.id;
        Ok(StoredOffer { id, record: self.into_record()? })
    }

    fn into_record(self) -> Result<OfferRecord, Error> {
        Ok(OfferRecord {
            queried_at: parse_timestamp(&self.queried_at)?,
            search_term: self.search_term,
            item_name: self.item_name,
            price: self.price,
            store_name: self.store_name,
            offer_url: self.offer_url,
            expiry_display: self.expiry_display,
        })
    }
}

fn insert(conn: &rusqlite::Connection, record: &OfferRecord) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO offer_history
            (search_term, item_name, price, store_name, offer_url, expiry_display, queried_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &record.search_term,
            &record.item_name,
            record.price,
            &record.store_name,
            &record.offer_url,
            &record.expiry_display,
            format_timestamp(&record.queried_at),
        ],
    )
}

fn query_rows(conn: &rusqlite::Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<StoredRow>, Error> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, StoredRow::from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn query_records(
    conn: &rusqlite::Connection, sql: &str, params: impl rusqlite::Params,
) -> Result<Vec<OfferRecord>, Error> {
    query_rows(conn, sql, params)?.into_iter().map(StoredRow::into_record).collect()
}

impl CacheDb {
    /// Most recent `queried_at` stored for a term.
    ///
    /// Returns None if the term has never been fetched.
    pub async fn latest_timestamp(&self, term: &str) -> Result<Option<NaiveDateTime>, Error> {
        let term = term.to_string();
        self.conn
            .call(move |conn| -> Result<Option<NaiveDateTime>, Error> {
                let latest: Option<String> = conn.query_row(
                    "SELECT MAX(queried_at) FROM offer_history WHERE search_term = ?1",
                    params![term],
                    |row| row.get(0),
                )?;

                latest.as_deref().map(parse_timestamp).transpose()
            })
            .await
            .map_err(Error::from)
    }

    /// All records of one batch: `term` at exactly `queried_at`, in insertion order.
    pub async fn rows_at(&self, term: &str, queried_at: NaiveDateTime) -> Result<Vec<OfferRecord>, Error> {
        let term = term.to_string();
        let queried_at = format_timestamp(&queried_at);
        self.conn
            .call(move |conn| -> Result<Vec<OfferRecord>, Error> {
                query_records(
                    conn,
                    &format!("{SELECT_COLUMNS} WHERE search_term = ?1 AND queried_at = ?2 ORDER BY id"),
                    params![term, queried_at],
                )
            })
            .await
            .map_err(Error::from)
    }

    /// Append a single record.
    pub async fn append(&self, record: &OfferRecord) -> Result<(), Error> {
        let record = record.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                insert(conn, &record)?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Append a whole batch in one transaction.
    ///
    /// Either every record is written or none is. Returns the number written.
    pub async fn append_batch(&self, records: &[OfferRecord]) -> Result<usize, Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let records = records.to_vec();
        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.transaction()?;
                for record in &records {
                    insert(&tx, record)?;
                }
                tx.commit()?;
                Ok(records.len())
            })
            .await
            .map_err(Error::from)
    }

    /// Every record for a term, newest batch first and cheapest first within a batch.
    pub async fn history(&self, term: &str) -> Result<Vec<OfferRecord>, Error> {
        let term = term.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<OfferRecord>, Error> {
                query_records(
                    conn,
                    &format!("{SELECT_COLUMNS} WHERE search_term = ?1 ORDER BY queried_at DESC, price ASC, id ASC"),
                    params![term],
                )
            })
            .await
            .map_err(Error::from)
    }

    /// Every stored record in storage order.
    pub async fn all_offers(&self) -> Result<Vec<OfferRecord>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<OfferRecord>, Error> {
                query_records(conn, &format!("{SELECT_COLUMNS} ORDER BY id"), [])
            })
            .await
            .map_err(Error::from)
    }

    /// Every stored record with its row id, in storage order.
    pub async fn stored_offers(&self) -> Result<Vec<StoredOffer>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<StoredOffer>, Error> {
                query_rows(conn, &format!("{SELECT_COLUMNS} ORDER BY id"), [])?
                    .into_iter()
                    .map(StoredRow::into_stored)
                    .collect()
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> NaiveDateTime {
        parse_timestamp(raw).unwrap()
    }

    fn make_record(term: &str, name: &str, price: f64, queried_at: &str) -> OfferRecord {
        OfferRecord {
            search_term: term.to_string(),
            item_name: name.to_string(),
            price,
            store_name: "Steam".to_string(),
            offer_url: Some(format!("https://store.example/{name}")),
            expiry_display: "no expiry".to_string(),
            queried_at: ts(queried_at),
        }
    }

    #[test]
    fn test_timestamp_round_trip_format() {
        let parsed = ts("2024-03-05 07:08:09");
        assert_eq!(format_timestamp(&parsed), "2024-03-05 07:08:09");
        assert!(matches!(parse_timestamp("05/03/2024"), Err(Error::InvalidTimestamp(_))));
    }

    #[tokio::test]
    async fn test_latest_timestamp_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.latest_timestamp("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_timestamp_is_max_for_term() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.append(&make_record("hades", "Hades", 20.0, "2024-01-01 10:00:00")).await.unwrap();
        db.append(&make_record("hades", "Hades", 18.0, "2024-01-02 09:00:00")).await.unwrap();
        db.append(&make_record("celeste", "Celeste", 5.0, "2024-01-03 09:00:00")).await.unwrap();

        let latest = db.latest_timestamp("hades").await.unwrap();
        assert_eq!(latest, Some(ts("2024-01-02 09:00:00")));
    }

    #[tokio::test]
    async fn test_rows_at_returns_single_batch() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let old = "2024-01-01 10:00:00";
        let new = "2024-01-02 10:00:00";
        db.append_batch(&[make_record("hades", "Hades", 20.0, old), make_record("hades", "Hades OST", 5.0, old)])
            .await
            .unwrap();
        db.append_batch(&[make_record("hades", "Hades", 15.0, new)]).await.unwrap();
        db.append(&make_record("celeste", "Celeste", 5.0, new)).await.unwrap();

        let rows = db.rows_at("hades", ts(new)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 15.0);

        let rows = db.rows_at("hades", ts(old)).await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, ["Hades", "Hades OST"]);
    }

    #[tokio::test]
    async fn test_append_preserves_fields() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let mut record = make_record("hades", "Hades", 37.49, "2024-01-01 10:00:00");
        record.offer_url = None;
        record.expiry_display = "31/01/2024".to_string();
        db.append(&record).await.unwrap();

        let rows = db.rows_at("hades", record.queried_at).await.unwrap();
        assert_eq!(rows, vec![record]);
    }

    #[tokio::test]
    async fn test_append_batch_empty() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert_eq!(db.append_batch(&[]).await.unwrap(), 0);
        assert!(db.all_offers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_batch_rejects_negative_price_atomically() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let at = "2024-01-01 10:00:00";
        let result = db
            .append_batch(&[make_record("hades", "Hades", 10.0, at), make_record("hades", "Broken", -1.0, at)])
            .await;

        assert!(matches!(result, Err(Error::Database(_))));
        assert!(db.all_offers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_ordering() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let old = "2024-01-01 10:00:00";
        let new = "2024-01-02 10:00:00";
        db.append_batch(&[make_record("hades", "Old B", 9.0, old), make_record("hades", "Old A", 3.0, old)])
            .await
            .unwrap();
        db.append_batch(&[make_record("hades", "New B", 7.0, new), make_record("hades", "New A", 1.0, new)])
            .await
            .unwrap();

        let history = db.history("hades").await.unwrap();
        let names: Vec<_> = history.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, ["New A", "New B", "Old A", "Old B"]);
    }

    #[tokio::test]
    async fn test_all_offers_storage_order() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.append(&make_record("b", "Second term", 1.0, "2024-01-02 10:00:00")).await.unwrap();
        db.append(&make_record("a", "First term", 2.0, "2024-01-01 10:00:00")).await.unwrap();

        let all = db.all_offers().await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, ["Second term", "First term"]);
    }

    #[tokio::test]
    async fn test_stored_offers_carry_row_ids() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.append(&make_record("hades", "Hades", 18.5, "2024-01-01 10:00:00")).await.unwrap();
        db.append(&make_record("celeste", "Celeste", 5.0, "2024-01-01 10:00:00")).await.unwrap();

        let stored = db.stored_offers().await.unwrap();
        let ids: Vec<_> = stored.iter().map(|s| s.id).collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(stored[1].record.item_name, "Celeste");

        let json = serde_json::to_value(&stored[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["search_term"], "hades");
    }
}
