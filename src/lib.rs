pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod projection;
pub mod store;
pub mod types;
pub mod utils;

pub use auth::{AuthFailure, AuthFailureKind, AuthProvider, FirebaseAuth, Session};
pub use config::Config;
pub use controller::{
    CloseOutcome, DetailState, SignInController, SignInOutcome, TicketDetailController,
};
pub use error::{HelpdeskError, Result};
pub use projection::{TicketSummary, TicketViewModel, project, summarize};
pub use store::{FirestoreStore, MemoryStore, TicketStore};
pub use types::{NewTicket, TicketId, TicketRecord, TicketStatus};
