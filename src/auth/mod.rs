//! Authentication boundary.
//!
//! Sign-in is consumed as a capability: `sign_in(email, password)` either
//! yields a [`Session`] or an [`AuthFailure`] carrying the provider's
//! canonical `auth/...` code. Each failure kind maps to a fixed user-facing
//! message; wrong-password and user-not-found deliberately share one message
//! so a failed attempt does not reveal which half of the credential was
//! wrong.

pub mod firebase;

use async_trait::async_trait;
use secrecy::SecretString;

pub use firebase::FirebaseAuth;

pub const MSG_INVALID_EMAIL: &str = "Invalid email.";
pub const MSG_BAD_CREDENTIALS: &str = "Invalid email or password.";
pub const MSG_SIGN_IN_FAILED: &str = "Could not sign in.";

/// Classified sign-in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    InvalidEmail,
    WrongPassword,
    UserNotFound,
    Other,
}

impl AuthFailureKind {
    /// Classify a provider failure code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/invalid-email" => AuthFailureKind::InvalidEmail,
            "auth/wrong-password" => AuthFailureKind::WrongPassword,
            "auth/user-not-found" => AuthFailureKind::UserNotFound,
            _ => AuthFailureKind::Other,
        }
    }

    /// Fixed user-facing message for this failure kind.
    pub fn message(self) -> &'static str {
        match self {
            AuthFailureKind::InvalidEmail => MSG_INVALID_EMAIL,
            AuthFailureKind::WrongPassword | AuthFailureKind::UserNotFound => MSG_BAD_CREDENTIALS,
            AuthFailureKind::Other => MSG_SIGN_IN_FAILED,
        }
    }
}

/// A sign-in failure: the raw provider code plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub code: String,
    pub kind: AuthFailureKind,
}

impl AuthFailure {
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        let kind = AuthFailureKind::from_code(&code);
        Self { code, kind }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    /// Bearer token for store requests.
    pub id_token: SecretString,
}

/// Common interface for authentication providers.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, AuthFailure>;
}
