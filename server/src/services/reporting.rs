//! Admin reporting over stored tickets.
//!
//! Counts and the status filter work on the *stored* status. Since expiry is
//! never persisted, an unused ticket past its window is still counted under
//! `valides`; pages show [`Ticket::effective_status`] next to each row to make
//! that visible.

use crate::models::Ticket;
use crate::store::{DirectoryFilter, StatusCounts, StoreResult, TicketStore};

pub async fn dashboard(store: &dyn TicketStore) -> StoreResult<StatusCounts> {
    store.count_by_status().await
}

pub async fn directory(
    store: &dyn TicketStore,
    filter: &DirectoryFilter,
) -> StoreResult<Vec<Ticket>> {
    store.search(filter).await
}
