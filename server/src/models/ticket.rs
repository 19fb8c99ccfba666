use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use thiserror::Error;

/// How long a ticket stays usable after purchase.
pub const TICKET_VALIDITY_HOURS: i64 = 4;

pub fn ticket_validity() -> Duration {
    Duration::hours(TICKET_VALIDITY_HOURS)
}

/// Stored lifecycle state of a ticket.
///
/// Only `Valid` and `Used` are ever written. `Expired` exists so that rows
/// written by other tools still decode, and so views can label tickets whose
/// validity window has passed (see [`Ticket::effective_status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Valid,
    Used,
    Expired,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Valid,
        TicketStatus::Used,
        TicketStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Valid => "valide",
            TicketStatus::Used => "utilise",
            TicketStatus::Expired => "expire",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown ticket status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for TicketStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub name: String,
    pub external_id: String,
    pub code: String,
    #[sqlx(try_from = "String")]
    pub status: TicketStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Status as a customer at the gate would experience it: a ticket that
    /// was never used but whose window has passed reads as expired.
    pub fn effective_status(&self, now: DateTime<Utc>) -> TicketStatus {
        match self.status {
            TicketStatus::Valid if self.is_expired_at(now) => TicketStatus::Expired,
            status => status,
        }
    }
}

/// Insert payload; the store assigns `id` and the status is always `Valid`.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub name: String,
    pub external_id: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
