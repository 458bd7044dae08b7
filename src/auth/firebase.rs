//! Identity Toolkit REST adapter.
//!
//! Calls `accounts:signInWithPassword` and normalizes the REST error codes
//! to the canonical `auth/...` codes before classification, the same mapping
//! the hosted client SDKs apply.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{HelpdeskError, Result};

use super::{AuthFailure, AuthProvider, Session};

const IDENTITY_HOST: &str = "https://identitytoolkit.googleapis.com/v1";

pub struct FirebaseAuth {
    client: reqwest::Client,
    api_key: SecretString,
}

impl FirebaseAuth {
    /// Create a provider from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            HelpdeskError::Config(
                "API key not configured. Set HELPDESK_API_KEY or add api_key to the config file"
                    .to_string(),
            )
        })?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> std::result::Result<Session, AuthFailure> {
        let url = format!(
            "{IDENTITY_HOST}/accounts:signInWithPassword?key={}",
            self.api_key.expose_secret()
        );
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
            "returnSecureToken": true,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("sign-in request failed: {err}");
                AuthFailure::from_code("auth/network-request-failed")
            })?;

        if response.status().is_success() {
            let ok: SignInResponse = response.json().await.map_err(|err| {
                tracing::error!("sign-in response malformed: {err}");
                AuthFailure::from_code("auth/network-request-failed")
            })?;
            return Ok(Session {
                user_id: ok.local_id,
                email: ok.email,
                id_token: SecretString::from(ok.id_token),
            });
        }

        let rest_code = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_default();
        let code = canonical_code(&rest_code);
        tracing::warn!(code = %code, "sign-in rejected: {rest_code}");
        Err(AuthFailure::from_code(code))
    }
}

/// Map an Identity Toolkit REST error code to the canonical `auth/...` form.
///
/// REST codes may carry a trailing explanation ("INVALID_PASSWORD : ...");
/// only the leading token matters. `INVALID_LOGIN_CREDENTIALS` is the newer
/// collapsed code issued for both bad-password and unknown-email attempts,
/// so it maps to wrong-password and shares that message.
fn canonical_code(rest_code: &str) -> &'static str {
    let token = rest_code.split_whitespace().next().unwrap_or_default();
    match token {
        "INVALID_EMAIL" | "MISSING_EMAIL" => "auth/invalid-email",
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => "auth/wrong-password",
        "EMAIL_NOT_FOUND" => "auth/user-not-found",
        _ => "auth/unknown",
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use crate::auth::AuthFailureKind;

    use super::*;

    #[test]
    fn test_canonical_code_mapping() {
        assert_eq!(canonical_code("INVALID_EMAIL"), "auth/invalid-email");
        assert_eq!(canonical_code("INVALID_PASSWORD"), "auth/wrong-password");
        assert_eq!(canonical_code("EMAIL_NOT_FOUND"), "auth/user-not-found");
        assert_eq!(
            canonical_code("INVALID_LOGIN_CREDENTIALS"),
            "auth/wrong-password"
        );
        assert_eq!(canonical_code("USER_DISABLED"), "auth/unknown");
        assert_eq!(canonical_code(""), "auth/unknown");
    }

    #[test]
    fn test_canonical_code_strips_trailing_explanation() {
        assert_eq!(
            canonical_code("INVALID_PASSWORD : The password is invalid"),
            "auth/wrong-password"
        );
    }

    #[test]
    fn test_collapsed_code_classifies_like_wrong_password() {
        let failure = AuthFailure::from_code(canonical_code("INVALID_LOGIN_CREDENTIALS"));
        assert_eq!(failure.kind, AuthFailureKind::WrongPassword);
    }

    #[test]
    fn test_error_response_parses() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND","errors":[]}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "EMAIL_NOT_FOUND");
    }
}
