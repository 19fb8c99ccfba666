use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{NewTicket, Ticket};

use super::{DirectoryFilter, StatusCounts, StoreResult};

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket with status `valide`.
    ///
    /// Fails with [`super::StoreError::DuplicateCode`] if another ticket
    /// already holds the same code.
    async fn insert(&self, ticket: NewTicket) -> StoreResult<Ticket>;

    /// Find ticket by its public code
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Ticket>>;

    /// Consume a ticket: flip `valide` to `utilise` if, and only if, it is
    /// still `valide` and `now` is within its validity window.
    ///
    /// Returns the updated ticket, or `None` when no row matched the
    /// condition. The check and the write happen as one operation, so two
    /// concurrent callers can never both get `Some`.
    async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> StoreResult<Option<Ticket>>;

    /// Count tickets grouped by stored status
    async fn count_by_status(&self) -> StoreResult<StatusCounts>;

    /// List tickets matching the filter, newest first
    async fn search(&self, filter: &DirectoryFilter) -> StoreResult<Vec<Ticket>>;
}
