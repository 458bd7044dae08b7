//! Sign-in controller.
//!
//! Holds the credential draft and drives the authentication provider.
//! Both fields must be non-empty before a provider call is made; failures
//! map to the fixed messages in [`crate::auth`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};

use crate::auth::{AuthProvider, Session};
use crate::utils::is_blank;

pub const MSG_CREDENTIALS_REQUIRED: &str = "Enter email and password.";

/// Result of a sign-in request.
#[derive(Debug, Clone)]
pub enum SignInOutcome {
    SignedIn(Session),
    /// Local rejection; no provider call was made.
    Rejected(&'static str),
    /// The provider rejected the attempt or was unreachable.
    Failed(&'static str),
    /// No-op: a sign-in was already in flight.
    Ignored,
}

pub struct SignInController {
    provider: Arc<dyn AuthProvider>,
    email: Mutex<String>,
    password: Mutex<SecretString>,
    in_flight: AtomicBool,
}

impl SignInController {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            email: Mutex::new(String::new()),
            password: Mutex::new(SecretString::from(String::new())),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn set_email(&self, email: impl Into<String>) {
        *self.email.lock() = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        *self.password.lock() = SecretString::from(password.into());
    }

    /// Whether a provider call is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Attempt to sign in with the current credential draft.
    pub async fn sign_in(&self) -> SignInOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SignInOutcome::Ignored;
        }

        let email = self.email.lock().trim().to_string();
        let password = self.password.lock().clone();
        if is_blank(&email) || is_blank(password.expose_secret()) {
            self.in_flight.store(false, Ordering::SeqCst);
            return SignInOutcome::Rejected(MSG_CREDENTIALS_REQUIRED);
        }

        let result = self.provider.sign_in(&email, &password).await;
        self.in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(session) => SignInOutcome::SignedIn(session),
            Err(failure) => {
                tracing::warn!(code = %failure.code, "sign-in failed");
                SignInOutcome::Failed(failure.message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::auth::AuthFailure;

    use super::*;

    /// Provider that answers from a fixed script and counts calls.
    struct ScriptedProvider {
        response: Result<(), &'static str>,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl ScriptedProvider {
        fn ok() -> Self {
            Self {
                response: Ok(()),
                calls: Default::default(),
            }
        }

        fn failing(code: &'static str) -> Self {
            Self {
                response: Err(code),
                calls: Default::default(),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthProvider for ScriptedProvider {
        async fn sign_in(
            &self,
            email: &str,
            _password: &SecretString,
        ) -> Result<Session, AuthFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Ok(()) => Ok(Session {
                    user_id: "u1".to_string(),
                    email: email.to_string(),
                    id_token: SecretString::from("token"),
                }),
                Err(code) => Err(AuthFailure::from_code(code)),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected_locally() {
        let provider = Arc::new(ScriptedProvider::ok());
        let controller = SignInController::new(Arc::clone(&provider) as _);
        controller.set_email("   ");
        controller.set_password("");

        let outcome = controller.sign_in().await;
        assert!(matches!(
            outcome,
            SignInOutcome::Rejected(MSG_CREDENTIALS_REQUIRED)
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_sign_in() {
        let provider = Arc::new(ScriptedProvider::ok());
        let controller = SignInController::new(Arc::clone(&provider) as _);
        controller.set_email("user@example.com");
        controller.set_password("hunter2");

        match controller.sign_in().await {
            SignInOutcome::SignedIn(session) => {
                assert_eq!(session.email, "user@example.com");
                assert_eq!(session.user_id, "u1");
            }
            other => panic!("expected SignedIn, got {other:?}"),
        }
        assert_eq!(provider.calls(), 1);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_failure_surfaces_fixed_message() {
        let provider = Arc::new(ScriptedProvider::failing("auth/wrong-password"));
        let controller = SignInController::new(Arc::clone(&provider) as _);
        controller.set_email("user@example.com");
        controller.set_password("wrong");

        match controller.sign_in().await {
            SignInOutcome::Failed(message) => {
                assert_eq!(message, crate::auth::MSG_BAD_CREDENTIALS);
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
