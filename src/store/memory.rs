//! In-memory ticket store.
//!
//! Backs tests and offline fixtures. "Server" timestamps are stamped from
//! the local clock at the moment a write commits, mirroring the hosted
//! backend's commit-time transform.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use uuid::Uuid;

use crate::error::{HelpdeskError, Result};
use crate::types::{NewTicket, TicketId, TicketRecord, TicketStatus};

use super::TicketStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: DashMap<TicketId, TicketRecord>,
    fail_writes: AtomicBool,
    close_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the creation path.
    pub fn seed(&self, record: TicketRecord) {
        debug_assert!(record.is_consistent());
        self.tickets.insert(record.id.clone(), record);
    }

    /// Make subsequent writes fail with a transport error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `close_ticket` calls that reached this store.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Current snapshot of a stored record, if any.
    pub fn snapshot(&self, id: &TicketId) -> Option<TicketRecord> {
        self.tickets.get(id).map(|r| r.clone())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn get_ticket(&self, id: &TicketId) -> Result<TicketRecord> {
        self.tickets
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| HelpdeskError::TicketNotFound(id.to_string()))
    }

    async fn close_ticket(&self, id: &TicketId, solution: &str) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HelpdeskError::Transport(
                "simulated write failure".to_string(),
            ));
        }
        let mut record = self
            .tickets
            .get_mut(id)
            .ok_or_else(|| HelpdeskError::TicketNotFound(id.to_string()))?;
        record.status = TicketStatus::Closed;
        record.solution = Some(solution.to_string());
        record.closed_at = Some(Timestamp::now());
        debug_assert!(record.is_consistent());
        Ok(())
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<TicketId> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HelpdeskError::Transport(
                "simulated write failure".to_string(),
            ));
        }
        let id = TicketId::new(Uuid::new_v4().simple().to_string());
        let record = TicketRecord {
            id: id.clone(),
            patrimony: new.patrimony,
            description: new.description,
            status: TicketStatus::Open,
            solution: None,
            created_at: Timestamp::now(),
            closed_at: None,
        };
        self.tickets.insert(id.clone(), record);
        Ok(id)
    }

    async fn list_tickets(&self, status: TicketStatus) -> Result<Vec<TicketRecord>> {
        let mut tickets: Vec<TicketRecord> = self
            .tickets
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.clone())
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.as_str().cmp(b.id.as_str())));
        Ok(tickets)
    }
}
