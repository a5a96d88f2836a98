//! Tag-to-URL repository.
//!
//! Entries are append-only: there is no update or delete path. Tag
//! uniqueness comes from the `UNIQUE` constraint on `entries.tag`, so two
//! racing saves for the same tag cannot both succeed even across
//! connections.

use std::sync::Arc;

use rusqlite::{ErrorCode, OptionalExtension};
use tracing::debug;

use waypost_core::error::WaypostError;
use waypost_core::types::Entry;

use crate::db::Database;

/// Repository for tag-to-URL entries.
#[derive(Debug, Clone)]
pub struct TagRepository {
    db: Arc<Database>,
}

impl TagRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new entry and return its row id.
    ///
    /// Fails with [`WaypostError::DuplicateTag`] when `tag` already exists.
    /// Empty strings are stored as given.
    pub fn save(&self, tag: &str, url: &str) -> Result<i64, WaypostError> {
        self.db.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO entries (tag, url) VALUES (?1, ?2)",
                rusqlite::params![tag, url],
            ) {
                Ok(_) => {
                    let id = conn.last_insert_rowid();
                    debug!(tag = %tag, id, "Saved entry");
                    Ok(id)
                }
                Err(e) if is_unique_violation(&e) => {
                    Err(WaypostError::DuplicateTag(tag.to_string()))
                }
                Err(e) => Err(WaypostError::Storage(format!("Failed to save entry: {}", e))),
            }
        })
    }

    /// Return the URL stored for `tag`.
    pub fn lookup(&self, tag: &str) -> Result<String, WaypostError> {
        match self.find(tag)? {
            Some(entry) => Ok(entry.url),
            None => Err(WaypostError::NotFound(tag.to_string())),
        }
    }

    /// Find the full entry for `tag`, if any.
    pub fn find(&self, tag: &str) -> Result<Option<Entry>, WaypostError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, tag, url FROM entries WHERE tag = ?1",
                rusqlite::params![tag],
                |row| {
                    Ok(Entry {
                        id: row.get(0)?,
                        tag: row.get(1)?,
                        url: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| WaypostError::Storage(format!("Failed to query entry: {}", e)))
        })
    }

    /// Count stored entries.
    pub fn count(&self) -> Result<u64, WaypostError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
                .map_err(|e| WaypostError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn make_repo() -> TagRepository {
        TagRepository::new(Arc::new(Database::in_memory().unwrap()))
    }

    #[test]
    fn test_save_and_lookup() {
        let repo = make_repo();
        repo.save("docs", "https://docs.rs").unwrap();
        repo.save("crates", "https://crates.io").unwrap();

        assert_eq!(repo.lookup("docs").unwrap(), "https://docs.rs");
        assert_eq!(repo.lookup("crates").unwrap(), "https://crates.io");
    }

    #[test]
    fn test_save_assigns_increasing_ids() {
        let repo = make_repo();
        let first = repo.save("a", "https://a.example").unwrap();
        let second = repo.save("b", "https://b.example").unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let repo = make_repo();
        repo.save("home", "https://first.example").unwrap();

        let err = repo.save("home", "https://second.example").unwrap_err();
        assert!(matches!(err, WaypostError::DuplicateTag(ref t) if t == "home"));

        assert_eq!(repo.lookup("home").unwrap(), "https://first.example");
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let repo = make_repo();
        repo.save("Home", "https://upper.example").unwrap();
        repo.save("home", "https://lower.example").unwrap();
        assert_eq!(repo.lookup("Home").unwrap(), "https://upper.example");
        assert_eq!(repo.lookup("home").unwrap(), "https://lower.example");
    }

    #[test]
    fn test_lookup_unknown_tag() {
        let repo = make_repo();
        let err = repo.lookup("missing").unwrap_err();
        assert!(matches!(err, WaypostError::NotFound(ref t) if t == "missing"));
    }

    #[test]
    fn test_empty_values_are_accepted() {
        let repo = make_repo();
        repo.save("", "").unwrap();
        assert_eq!(repo.lookup("").unwrap(), "");
    }

    #[test]
    fn test_find_returns_entry() {
        let repo = make_repo();
        let id = repo.save("blog", "https://blog.example").unwrap();

        let entry = repo.find("blog").unwrap().unwrap();
        assert_eq!(
            entry,
            Entry {
                id,
                tag: "blog".to_string(),
                url: "https://blog.example".to_string(),
            }
        );
        assert!(repo.find("nope").unwrap().is_none());
    }

    #[test]
    fn test_concurrent_saves_same_tag() {
        let repo = make_repo();
        let workers = 16;

        let handles: Vec<_> = (0..workers)
            .map(|i| {
                let repo = repo.clone();
                thread::spawn(move || repo.save("race", &format!("https://{}.example", i)))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(WaypostError::DuplicateTag(_))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(duplicates, workers - 1);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_saves_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypost.db");
        // Initialize schema once before racing.
        Database::new(&path).unwrap();

        let workers = 8;
        let handles: Vec<_> = (0..workers)
            .map(|i| {
                let path = path.clone();
                thread::spawn(move || {
                    let repo = TagRepository::new(Arc::new(Database::new(&path).unwrap()));
                    repo.save("shared", &format!("https://{}.example", i))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(WaypostError::DuplicateTag(_))))
                .count(),
            workers - 1
        );
    }

    #[test]
    fn test_concurrent_saves_distinct_tags() {
        let repo = make_repo();
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo = repo.clone();
                thread::spawn(move || repo.save(&format!("tag-{}", i), "https://example.com"))
            })
            .collect();

        for h in handles {
            h.join().unwrap().unwrap();
        }
        assert_eq!(repo.count().unwrap(), 10);
    }
}
