//! Ticket store boundary.
//!
//! The persisted document store is an external collaborator; this module
//! defines the contract the controllers consume and the two adapters that
//! satisfy it: the hosted Firestore REST backend and an in-memory store for
//! tests and offline fixtures.
//!
//! Timestamps are server-assigned. The close and create paths send a
//! sentinel meaning "stamp this field with the commit time"; the client
//! never fabricates `created_at` or `closed_at` values.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewTicket, TicketId, TicketRecord, TicketStatus};

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Common interface for ticket stores.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Fetch a single ticket by id.
    ///
    /// Fails with [`HelpdeskError::TicketNotFound`] when no such document
    /// exists, or [`HelpdeskError::Transport`] when the backend is
    /// unreachable.
    ///
    /// [`HelpdeskError::TicketNotFound`]: crate::error::HelpdeskError::TicketNotFound
    /// [`HelpdeskError::Transport`]: crate::error::HelpdeskError::Transport
    async fn get_ticket(&self, id: &TicketId) -> Result<TicketRecord>;

    /// Close an open ticket: a partial update setting `status = "closed"`,
    /// the given solution, and a server-stamped `closed_at`.
    async fn close_ticket(&self, id: &TicketId, solution: &str) -> Result<()>;

    /// Create a ticket with status open and a server-stamped `created_at`.
    /// Returns the assigned id.
    async fn create_ticket(&self, new: NewTicket) -> Result<TicketId>;

    /// List tickets with the given status, newest first.
    async fn list_tickets(&self, status: TicketStatus) -> Result<Vec<TicketRecord>>;
}
