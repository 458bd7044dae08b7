use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::HelpdeskError;

/// Default Firestore collection holding ticket documents.
pub const TICKETS_COLLECTION: &str = "orders";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Open,
    Closed,
}

impl TicketStatus {
    /// Human-facing label shown next to the status indicator.
    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "in progress",
            TicketStatus::Closed => "finalized",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(HelpdeskError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_STATUSES: &[&str] = &["open", "closed"];

/// Opaque ticket identifier, assigned by the store at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Canonical persisted shape of a ticket.
///
/// `status`, `solution` and `closed_at` move together: a closed ticket has a
/// non-empty solution and a server-stamped close time, an open ticket has
/// neither. [`TicketRecord::is_consistent`] checks that triple equivalence;
/// store adapters uphold it on every record they return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: TicketId,
    /// Equipment asset tag, immutable after creation.
    pub patrimony: String,
    pub description: String,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Timestamp>,
}

impl TicketRecord {
    /// Whether the closed/solution/closed_at triple equivalence holds.
    pub fn is_consistent(&self) -> bool {
        let has_solution = self
            .solution
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        match self.status {
            TicketStatus::Open => !has_solution && self.closed_at.is_none(),
            TicketStatus::Closed => has_solution && self.closed_at.is_some(),
        }
    }
}

/// Payload for the ticket-creation path. The store assigns the id, sets the
/// status to open and stamps `created_at` with the server commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub patrimony: String,
    pub description: String,
}
