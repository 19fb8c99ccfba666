//! Ticket lifecycle: purchase and verification.
//!
//! A ticket is created `valide` and becomes `utilise` at most once, through
//! a successful [`verify`]. Expiry is never written back: a ticket past its
//! window keeps its stored `valide` status and is reported as expired on
//! every check.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{ticket_validity, NewTicket, Ticket, TicketStatus};
use crate::store::{StoreError, StoreResult, TicketStore};

/// Length of the public ticket code.
pub const CODE_LENGTH: usize = 8;

/// How many fresh codes a purchase tries before giving up on collisions.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Short public code: the leading characters of a random v4 UUID.
pub fn generate_code() -> String {
    let mut code = Uuid::new_v4().to_string();
    code.truncate(CODE_LENGTH);
    code
}

/// Result of checking a code at the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    NotFound,
    AlreadyUsed,
    Expired,
    /// The ticket was accepted and is now stored as used.
    Valid(Ticket),
}

impl VerificationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationOutcome::NotFound => "introuvable",
            VerificationOutcome::AlreadyUsed => "utilise",
            VerificationOutcome::Expired => "expire",
            VerificationOutcome::Valid(_) => "valide",
        }
    }
}

/// Create a `valide` ticket expiring [`ticket_validity`] after `now`.
pub async fn purchase(
    store: &dyn TicketStore,
    name: String,
    external_id: String,
    now: DateTime<Utc>,
) -> StoreResult<Ticket> {
    purchase_with(store, name, external_id, now, generate_code).await
}

pub(crate) async fn purchase_with<G>(
    store: &dyn TicketStore,
    name: String,
    external_id: String,
    now: DateTime<Utc>,
    mut next_code: G,
) -> StoreResult<Ticket>
where
    G: FnMut() -> String,
{
    let mut attempt = 1;
    loop {
        let new_ticket = NewTicket {
            name: name.clone(),
            external_id: external_id.clone(),
            code: next_code(),
            expires_at: now + ticket_validity(),
            created_at: now,
        };

        match store.insert(new_ticket).await {
            Ok(ticket) => {
                info!(ticket_id = ticket.id, code = %ticket.code, "Ticket purchased");
                return Ok(ticket);
            }
            Err(StoreError::DuplicateCode) if attempt < MAX_CODE_ATTEMPTS => {
                warn!(attempt, "Ticket code collision, generating a new one");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Check a code and consume the ticket if it is still usable.
///
/// Outcomes take precedence in this order: unknown code, already used,
/// expired, valid. Only the last one writes, through the store's atomic
/// conditional update; losing a race against a concurrent check of the same
/// code reports `AlreadyUsed`.
pub async fn verify(
    store: &dyn TicketStore,
    code: &str,
    now: DateTime<Utc>,
) -> StoreResult<VerificationOutcome> {
    let outcome = match store.find_by_code(code).await? {
        None => VerificationOutcome::NotFound,
        Some(ticket) if ticket.status == TicketStatus::Used => VerificationOutcome::AlreadyUsed,
        Some(ticket) if ticket.is_expired_at(now) => VerificationOutcome::Expired,
        Some(_) => match store.mark_used(code, now).await? {
            Some(ticket) => VerificationOutcome::Valid(ticket),
            None => VerificationOutcome::AlreadyUsed,
        },
    };

    info!(code, outcome = outcome.label(), "Ticket verified");
    Ok(outcome)
}

/// Read-only lookup used by staff; never changes the ticket.
pub async fn lookup(store: &dyn TicketStore, code: &str) -> StoreResult<Option<Ticket>> {
    store.find_by_code(code).await
}
