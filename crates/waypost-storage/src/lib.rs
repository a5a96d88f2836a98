//! Waypost storage crate - SQLite persistence for tag-to-URL entries.
//!
//! Provides a WAL-mode SQLite database with migrations and the
//! repository backing `/puturl` and `/geturl`.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::TagRepository;
