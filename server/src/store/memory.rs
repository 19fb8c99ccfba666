use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{NewTicket, Ticket, TicketStatus};

use super::{DirectoryFilter, StatusCounts, StoreError, StoreResult, TicketStore};

#[derive(Default)]
struct Inner {
    tickets: Vec<Ticket>,
    next_id: i64,
}

/// Process-local ticket store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryTicketStore {
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn insert(&self, ticket: NewTicket) -> StoreResult<Ticket> {
        let mut inner = self.inner.write().await;
        if inner.tickets.iter().any(|t| t.code == ticket.code) {
            return Err(StoreError::DuplicateCode);
        }

        inner.next_id += 1;
        let ticket = Ticket {
            id: inner.next_id,
            name: ticket.name,
            external_id: ticket.external_id,
            code: ticket.code,
            status: TicketStatus::Valid,
            expires_at: ticket.expires_at,
            created_at: ticket.created_at,
        };
        inner.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<Ticket>> {
        let inner = self.inner.read().await;
        Ok(inner.tickets.iter().find(|t| t.code == code).cloned())
    }

    async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> StoreResult<Option<Ticket>> {
        let mut inner = self.inner.write().await;
        let ticket = inner.tickets.iter_mut().find(|t| {
            t.code == code && t.status == TicketStatus::Valid && !t.is_expired_at(now)
        });

        Ok(ticket.map(|t| {
            t.status = TicketStatus::Used;
            t.clone()
        }))
    }

    async fn count_by_status(&self) -> StoreResult<StatusCounts> {
        let inner = self.inner.read().await;
        let mut counts = StatusCounts::default();
        for ticket in &inner.tickets {
            counts.add(ticket.status.as_str(), 1);
        }
        Ok(counts)
    }

    async fn search(&self, filter: &DirectoryFilter) -> StoreResult<Vec<Ticket>> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tickets)
    }
}
