//! Ticket detail controller.
//!
//! Owns the detail-view lifecycle for one ticket: a single-shot load on
//! entry, a locally held solution draft, and the close mutation. The view
//! layer drives it through `load`, `set_draft_solution` and `close`, renders
//! from `state()`, and calls `detach()` on teardown.
//!
//! Lifecycle over the owned state:
//!
//! ```text
//! Loading --load ok--> Viewing(open) --close ok--> leave view
//!    |                     |    ^
//!    | load err (logged,   |    | close err: draft kept, notice surfaced
//!    |  stays Loading)     +----+
//!    +--load ok--> Viewing(closed)   (terminal: close is rejected)
//! ```
//!
//! The close mutation is issued at most once per user action: a close in
//! flight turns further close requests into no-ops until it settles, and it
//! is never issued before an open status has been observed locally.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::projection::{self, TicketViewModel};
use crate::store::TicketStore;
use crate::types::{TicketId, TicketRecord, TicketStatus};

pub const MSG_SOLUTION_REQUIRED: &str = "Provide a solution to close the ticket.";
pub const MSG_NOT_OPEN: &str = "Only an open ticket can be closed.";
pub const MSG_CLOSE_FAILED: &str = "Could not close the ticket.";

/// What the view should render.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Viewing(TicketViewModel),
}

/// Result of a close request, for the caller to pattern-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The ticket was closed; leave the detail view.
    Closed,
    /// Local rejection with a validation message; no store call was made.
    Rejected(&'static str),
    /// The remote update failed; state and draft are unchanged.
    Failed(&'static str),
    /// No-op: a close was already in flight, or the view was detached.
    Ignored,
}

struct Inner {
    record: Option<TicketRecord>,
    draft_solution: String,
    loading: bool,
}

pub struct TicketDetailController {
    store: Arc<dyn TicketStore>,
    ticket_id: TicketId,
    inner: Mutex<Inner>,
    close_in_flight: AtomicBool,
    /// Cleared on teardown; completions check it before touching state.
    active: AtomicBool,
}

impl TicketDetailController {
    pub fn new(store: Arc<dyn TicketStore>, ticket_id: TicketId) -> Self {
        Self {
            store,
            ticket_id,
            inner: Mutex::new(Inner {
                record: None,
                draft_solution: String::new(),
                loading: true,
            }),
            close_in_flight: AtomicBool::new(false),
            active: AtomicBool::new(true),
        }
    }

    pub fn ticket_id(&self) -> &TicketId {
        &self.ticket_id
    }

    /// Fetch the ticket once, on detail-view entry.
    ///
    /// On failure the view stays in `Loading`; the error is logged rather
    /// than surfaced, since nothing at this layer can act on it.
    pub async fn load(&self) {
        if !self.active.load(Ordering::SeqCst) {
            return;
        }

        let fetched = self.store.get_ticket(&self.ticket_id).await;

        // The view may have been torn down while the fetch was in flight.
        if !self.active.load(Ordering::SeqCst) {
            return;
        }

        match fetched {
            Ok(record) => {
                debug_assert!(record.is_consistent());
                let mut inner = self.inner.lock();
                inner.record = Some(record);
                inner.loading = false;
            }
            Err(err) => {
                tracing::error!(ticket = %self.ticket_id, "failed to load ticket: {err}");
            }
        }
    }

    /// Replace the solution draft. Local state only; no remote effect.
    pub fn set_draft_solution(&self, value: impl Into<String>) {
        self.inner.lock().draft_solution = value.into();
    }

    pub fn draft_solution(&self) -> String {
        self.inner.lock().draft_solution.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    /// Current state, projected fresh from the record snapshot.
    pub fn state(&self) -> DetailState {
        let inner = self.inner.lock();
        match &inner.record {
            Some(record) if !inner.loading => DetailState::Viewing(projection::project(record)),
            _ => DetailState::Loading,
        }
    }

    /// Close the ticket with the current draft solution.
    ///
    /// Validation and the open-status check happen locally and never reach
    /// the store. At most one close mutation is in flight at a time; further
    /// requests are ignored until it settles.
    pub async fn close(&self) -> CloseOutcome {
        if !self.active.load(Ordering::SeqCst) {
            return CloseOutcome::Ignored;
        }
        if self
            .close_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return CloseOutcome::Ignored;
        }

        let solution = {
            let inner = self.inner.lock();
            let open = matches!(
                &inner.record,
                Some(record) if record.status == TicketStatus::Open
            ) && !inner.loading;
            if !open {
                drop(inner);
                self.close_in_flight.store(false, Ordering::SeqCst);
                return CloseOutcome::Rejected(MSG_NOT_OPEN);
            }
            let trimmed = inner.draft_solution.trim();
            if trimmed.is_empty() {
                drop(inner);
                self.close_in_flight.store(false, Ordering::SeqCst);
                return CloseOutcome::Rejected(MSG_SOLUTION_REQUIRED);
            }
            trimmed.to_string()
        };

        let result = self.store.close_ticket(&self.ticket_id, &solution).await;
        self.close_in_flight.store(false, Ordering::SeqCst);

        if !self.active.load(Ordering::SeqCst) {
            // Torn down mid-request; apply nothing.
            return CloseOutcome::Ignored;
        }

        match result {
            // The record is not patched locally: the caller leaves the view
            // and the next read re-fetches the server-stamped document.
            Ok(()) => CloseOutcome::Closed,
            Err(err) => {
                tracing::error!(ticket = %self.ticket_id, "failed to close ticket: {err}");
                CloseOutcome::Failed(MSG_CLOSE_FAILED)
            }
        }
    }

    /// Tear down: completions of in-flight calls no longer touch state.
    pub fn detach(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
