//! Watchlist of titles refreshed in bulk.

use super::connection::CacheDb;
use crate::Error;
use tokio_rusqlite::{params, rusqlite};

impl CacheDb {
    /// Add a title to the watchlist.
    ///
    /// Returns false if the title is already watched.
    pub async fn watch_add(&self, name: &str) -> Result<bool, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("title cannot be empty".into()));
        }

        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                match conn.execute("INSERT INTO watchlist (name) VALUES (?1)", params![name]) {
                    Ok(_) => Ok(true),
                    Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
                        Ok(false)
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// All watched titles, alphabetically.
    pub async fn watch_list(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM watchlist ORDER BY name")?;
                let names = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watch_add_and_list() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.watch_add("Hades").await.unwrap());
        assert!(db.watch_add("  Celeste ").await.unwrap());

        assert_eq!(db.watch_list().await.unwrap(), ["Celeste", "Hades"]);
    }

    #[tokio::test]
    async fn test_watch_add_duplicate() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.watch_add("Hades").await.unwrap());
        assert!(!db.watch_add("Hades").await.unwrap());
        assert_eq!(db.watch_list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_watch_add_empty() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.watch_add("   ").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
