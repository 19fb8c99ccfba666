//! Ticket persistence.
//!
//! [`TicketStore`] is implemented by a PostgreSQL backend for production and
//! an in-memory backend for tests and database-less local runs. [`Database`]
//! picks one at startup and derefs to the trait object.

use std::ops::Deref;

use thiserror::Error;

use crate::config::Config;
use crate::models::{Ticket, TicketStatus};

pub mod definition;
mod memory;
mod postgres;

pub use definition::TicketStore;
pub use memory::MemoryTicketStore;
pub use postgres::PgTicketStore;

/// `DATABASE_URL` value selecting the in-memory backend.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ticket code already exists")]
    DuplicateCode,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ticket totals as stored; `expires` only counts rows whose stored status is
/// literally `expire`, which verification never writes. The three buckets
/// always sum to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: i64,
    pub valides: i64,
    pub utilises: i64,
    pub expires: i64,
}

impl StatusCounts {
    pub(crate) fn add(&mut self, status: &str, count: i64) {
        let bucket = match status.parse::<TicketStatus>() {
            Ok(TicketStatus::Valid) => &mut self.valides,
            Ok(TicketStatus::Used) => &mut self.utilises,
            Ok(TicketStatus::Expired) => &mut self.expires,
            Err(_) => {
                tracing::warn!(status, count, "Skipping tickets with unknown stored status");
                return;
            }
        };
        *bucket += count;
        self.total += count;
    }
}

/// Directory query. Both filters are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring matched against name or external id.
    pub search: Option<String>,
    /// Exact stored status label.
    pub status: Option<String>,
}

impl DirectoryFilter {
    /// Build a filter from raw query parameters. Blank values are ignored,
    /// as is the `tous` status which means "all statuses".
    pub fn from_params(search: Option<&str>, status: Option<&str>) -> Self {
        let search = search.filter(|s| !s.is_empty()).map(str::to_string);
        let status = status
            .filter(|s| !s.is_empty() && *s != "tous")
            .map(str::to_string);
        Self { search, status }
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |needle| {
            let needle = needle.to_lowercase();
            ticket.name.to_lowercase().contains(&needle)
                || ticket.external_id.to_lowercase().contains(&needle)
        });
        let status_ok = self
            .status
            .as_deref()
            .map_or(true, |status| ticket.status.as_str() == status);
        search_ok && status_ok
    }
}

#[derive(Clone)]
pub enum Database {
    Memory(MemoryTicketStore),
    Postgres(PgTicketStore),
}

impl Database {
    /// Open the backend named by the configured database URL, running
    /// migrations for PostgreSQL.
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        if config.database_url == MEMORY_DATABASE_URL {
            tracing::warn!("Using in-memory ticket store; data is lost on restart");
            return Ok(Database::Memory(MemoryTicketStore::default()));
        }

        let store = PgTicketStore::connect(&config.database_url, config.max_connections).await?;
        Ok(Database::Postgres(store))
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::Memory(MemoryTicketStore::default())
    }
}

impl Deref for Database {
    type Target = dyn TicketStore;

    fn deref(&self) -> &Self::Target {
        match self {
            Database::Memory(memory) => memory,
            Database::Postgres(postgres) => postgres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_params_drops_blank_and_tous() {
        assert_eq!(
            DirectoryFilter::from_params(Some(""), Some("tous")),
            DirectoryFilter::default()
        );
        assert_eq!(
            DirectoryFilter::from_params(Some("ali"), Some("utilise")),
            DirectoryFilter {
                search: Some("ali".into()),
                status: Some("utilise".into()),
            }
        );
    }

    #[test]
    fn test_counts_skip_unknown_statuses() {
        let mut counts = StatusCounts::default();
        counts.add("valide", 3);
        counts.add("utilise", 2);
        counts.add("archive", 1);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.valides, 3);
        assert_eq!(counts.utilises, 2);
        assert_eq!(counts.expires, 0);
        assert_eq!(counts.valides + counts.utilises + counts.expires, counts.total);
    }
}
