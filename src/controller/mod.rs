//! Screen-facing controllers.
//!
//! Each controller owns the state for one view instance and exposes a small
//! operation surface the presentation layer drives. State is never ambient:
//! a torn-down view calls `detach` (or drops the controller) and in-flight
//! completions become no-ops.

pub mod detail;
pub mod signin;

pub use detail::{
    CloseOutcome, DetailState, MSG_CLOSE_FAILED, MSG_NOT_OPEN, MSG_SOLUTION_REQUIRED,
    TicketDetailController,
};
pub use signin::{MSG_CREDENTIALS_REQUIRED, SignInController, SignInOutcome};
