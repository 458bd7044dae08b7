//! Configuration for the hosted backend.
//!
//! Configuration is stored in `helpdesk.yaml` and includes:
//! - Firestore project id and ticket collection
//! - Identity Toolkit API key
//!
//! Environment variables take precedence over the file.

use std::env;
use std::fs;
use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::TICKETS_COLLECTION;

pub const ENV_PROJECT_ID: &str = "HELPDESK_PROJECT_ID";
pub const ENV_API_KEY: &str = "HELPDESK_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Firestore project id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Identity Toolkit API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Ticket collection name (defaults to "orders")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl Config {
    /// Load configuration from file, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Get the project id from environment variable or config
    pub fn project_id(&self) -> Option<String> {
        if let Ok(id) = env::var(ENV_PROJECT_ID)
            && !id.is_empty()
        {
            return Some(id);
        }

        self.project_id.clone()
    }

    /// Get the API key from environment variable or config
    pub fn api_key(&self) -> Option<SecretString> {
        if let Ok(key) = env::var(ENV_API_KEY)
            && !key.is_empty()
        {
            return Some(SecretString::from(key));
        }

        self.api_key.clone().map(SecretString::from)
    }

    /// Ticket collection name
    pub fn collection(&self) -> String {
        self.collection
            .clone()
            .unwrap_or_else(|| TICKETS_COLLECTION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use serial_test::serial;

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.project_id.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.collection(), "orders");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = Config::load(Path::new("/nonexistent/helpdesk.yaml")).unwrap();
        assert!(config.project_id.is_none());
    }

    #[test]
    #[serial]
    fn test_load_from_yaml() {
        unsafe {
            env::remove_var(ENV_PROJECT_ID);
            env::remove_var(ENV_API_KEY);
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "project_id: demo-project").unwrap();
        writeln!(file, "api_key: AIza-test").unwrap();
        writeln!(file, "collection: tickets").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project_id().as_deref(), Some("demo-project"));
        assert!(config.api_key().is_some());
        assert_eq!(config.collection(), "tickets");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "project_id: from-file").unwrap();

        unsafe {
            env::set_var(ENV_PROJECT_ID, "from-env");
        }
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.project_id().as_deref(), Some("from-env"));
        unsafe {
            env::remove_var(ENV_PROJECT_ID);
        }
    }
}
