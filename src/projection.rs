//! Display projections of ticket records.
//!
//! The view models here are recomputed from a [`TicketRecord`] snapshot on
//! every read; they hold no identity of their own and are never mutated
//! independently.

use crate::types::{TicketId, TicketRecord, TicketStatus};
use crate::utils::format_timestamp;

/// Display-ready shape of a ticket detail.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketViewModel {
    pub id: TicketId,
    pub patrimony: String,
    pub description: String,
    pub status: TicketStatus,
    /// Presentational label: "in progress" for open, "finalized" for closed.
    pub status_label: &'static str,
    pub solution: Option<String>,
    /// Formatted creation time.
    pub when: String,
    /// Formatted close time; present iff the record carries one.
    pub closed: Option<String>,
}

/// Display-ready shape of a ticket list row.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketSummary {
    pub id: TicketId,
    pub patrimony: String,
    pub when: String,
    pub status: TicketStatus,
}

/// Project a record snapshot into its detail view model.
///
/// Pure and total: a record that came from a store adapter always projects.
pub fn project(record: &TicketRecord) -> TicketViewModel {
    TicketViewModel {
        id: record.id.clone(),
        patrimony: record.patrimony.clone(),
        description: record.description.clone(),
        status: record.status,
        status_label: record.status.label(),
        solution: record.solution.clone(),
        when: format_timestamp(record.created_at),
        closed: record.closed_at.map(format_timestamp),
    }
}

/// Project a record snapshot into its list-row summary.
pub fn summarize(record: &TicketRecord) -> TicketSummary {
    TicketSummary {
        id: record.id.clone(),
        patrimony: record.patrimony.clone(),
        when: format_timestamp(record.created_at),
        status: record.status,
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn record(status: TicketStatus) -> TicketRecord {
        let closed = status == TicketStatus::Closed;
        TicketRecord {
            id: TicketId::new("T1"),
            patrimony: "654321".to_string(),
            description: "no power".to_string(),
            status,
            solution: closed.then(|| "replaced psu".to_string()),
            created_at: "2024-01-03T14:05:00Z".parse().unwrap(),
            closed_at: closed.then(|| "2024-01-04T09:30:00Z".parse::<Timestamp>().unwrap()),
        }
    }

    #[test]
    fn test_project_is_pure() {
        let r = record(TicketStatus::Closed);
        assert_eq!(project(&r), project(&r));
    }

    #[test]
    fn test_project_open_ticket() {
        let vm = project(&record(TicketStatus::Open));
        assert_eq!(vm.status, TicketStatus::Open);
        assert_eq!(vm.status_label, "in progress");
        assert_eq!(vm.when, "03/01/2024 at 14:05");
        assert_eq!(vm.closed, None);
        assert_eq!(vm.solution, None);
    }

    #[test]
    fn test_project_closed_ticket() {
        let vm = project(&record(TicketStatus::Closed));
        assert_eq!(vm.status_label, "finalized");
        assert_eq!(vm.closed.as_deref(), Some("04/01/2024 at 09:30"));
        assert_eq!(vm.solution.as_deref(), Some("replaced psu"));
    }

    #[test]
    fn test_closed_field_present_iff_status_closed() {
        assert!(project(&record(TicketStatus::Open)).closed.is_none());
        assert!(project(&record(TicketStatus::Closed)).closed.is_some());
    }

    #[test]
    fn test_summarize() {
        let s = summarize(&record(TicketStatus::Open));
        assert_eq!(s.id, TicketId::new("T1"));
        assert_eq!(s.patrimony, "654321");
        assert_eq!(s.when, "03/01/2024 at 14:05");
        assert_eq!(s.status, TicketStatus::Open);
    }
}
