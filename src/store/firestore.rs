//! Firestore REST adapter.
//!
//! Speaks the `firestore.googleapis.com/v1` document API. All wire encoding
//! for ticket documents lives here: field names are exactly `patrimony`,
//! `description`, `status`, `solution`, `created_at` and `closed_at`, with
//! statuses as the strings `"open"`/`"closed"` and timestamps as RFC 3339.
//!
//! Server-assigned timestamps are requested with the commit-time field
//! transform (`setToServerValue: REQUEST_TIME`); the client never sends a
//! concrete value for `created_at` or `closed_at`.

use std::collections::BTreeMap;
use std::str::FromStr;

use jiff::Timestamp;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{HelpdeskError, Result};
use crate::types::{NewTicket, TicketId, TicketRecord, TicketStatus};

use super::TicketStore;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";

/// Firestore-backed ticket store.
pub struct FirestoreStore {
    client: reqwest::Client,
    project_id: String,
    collection: String,
    /// Identity Toolkit id token for authenticated requests.
    bearer: Option<SecretString>,
}

impl FirestoreStore {
    /// Create a store from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let project_id = config.project_id().ok_or_else(|| {
            HelpdeskError::Config(
                "Firestore project not configured. Set HELPDESK_PROJECT_ID or add project_id to the config file".to_string(),
            )
        })?;

        Ok(Self::new(project_id, config.collection()))
    }

    pub fn new(project_id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            project_id: project_id.into(),
            collection: collection.into(),
            bearer: None,
        }
    }

    /// Attach a signed-in user's id token to every request.
    pub fn with_bearer(mut self, id_token: SecretString) -> Self {
        self.bearer = Some(id_token);
        self
    }

    fn documents_url(&self) -> String {
        format!(
            "{FIRESTORE_HOST}/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    fn document_name(&self, id: &TicketId) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, self.collection, id
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send_commit(&self, writes: Vec<Write>, id: &TicketId) -> Result<()> {
        let url = format!("{}:commit", self.documents_url());
        let response = self
            .request(self.client.post(&url))
            .json(&CommitRequest { writes })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HelpdeskError::TicketNotFound(id.to_string()));
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(ticket = %id, %status, "Firestore commit failed: {body}");
        Err(HelpdeskError::Transport(format!(
            "Firestore commit failed with status {status}"
        )))
    }
}

#[async_trait::async_trait]
impl TicketStore for FirestoreStore {
    async fn get_ticket(&self, id: &TicketId) -> Result<TicketRecord> {
        let url = format!("{}/{}/{}", self.documents_url(), self.collection, id);
        let response = self.request(self.client.get(&url)).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HelpdeskError::TicketNotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(HelpdeskError::Transport(format!(
                "Firestore read failed with status {status}"
            )));
        }

        let document: Document = response.json().await?;
        decode_document(&document)
    }

    async fn close_ticket(&self, id: &TicketId, solution: &str) -> Result<()> {
        let mut fields = BTreeMap::new();
        fields.insert(
            "status".to_string(),
            WireValue::StringValue(TicketStatus::Closed.to_string()),
        );
        fields.insert(
            "solution".to_string(),
            WireValue::StringValue(solution.to_string()),
        );

        let write = Write {
            update: DocumentWrite {
                name: self.document_name(id),
                fields,
            },
            update_mask: Some(FieldMask {
                field_paths: vec!["status".to_string(), "solution".to_string()],
            }),
            update_transforms: vec![FieldTransform::request_time("closed_at")],
            current_document: Some(Precondition { exists: true }),
        };
        self.send_commit(vec![write], id).await
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<TicketId> {
        // Document ids are client-generated, as the hosted SDKs do.
        let id = TicketId::new(Uuid::new_v4().simple().to_string());

        let mut fields = BTreeMap::new();
        fields.insert(
            "patrimony".to_string(),
            WireValue::StringValue(new.patrimony),
        );
        fields.insert(
            "description".to_string(),
            WireValue::StringValue(new.description),
        );
        fields.insert(
            "status".to_string(),
            WireValue::StringValue(TicketStatus::Open.to_string()),
        );

        let write = Write {
            update: DocumentWrite {
                name: self.document_name(&id),
                fields,
            },
            update_mask: None,
            update_transforms: vec![FieldTransform::request_time("created_at")],
            current_document: Some(Precondition { exists: false }),
        };
        self.send_commit(vec![write], &id).await?;
        Ok(id)
    }

    async fn list_tickets(&self, status: TicketStatus) -> Result<Vec<TicketRecord>> {
        let url = format!("{}:runQuery", self.documents_url());
        let query = serde_json::json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "status" },
                        "op": "EQUAL",
                        "value": { "stringValue": status.to_string() },
                    }
                },
                "orderBy": [
                    { "field": { "fieldPath": "created_at" }, "direction": "DESCENDING" }
                ],
            }
        });

        let response = self.request(self.client.post(&url)).json(&query).send().await?;
        let status_code = response.status();
        if !status_code.is_success() {
            return Err(HelpdeskError::Transport(format!(
                "Firestore query failed with status {status_code}"
            )));
        }

        let rows: Vec<QueryRow> = response.json().await?;
        rows.iter()
            .filter_map(|row| row.document.as_ref())
            .map(decode_document)
            .collect()
    }
}

// --- Wire types -------------------------------------------------------------

/// Firestore `Value`, restricted to the kinds ticket documents use.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum WireValue {
    #[serde(rename = "stringValue")]
    StringValue(String),
    #[serde(rename = "timestampValue")]
    TimestampValue(Timestamp),
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, WireValue>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Serialize)]
struct CommitRequest {
    writes: Vec<Write>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Write {
    update: DocumentWrite,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_mask: Option<FieldMask>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    update_transforms: Vec<FieldTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_document: Option<Precondition>,
}

#[derive(Debug, Serialize)]
struct DocumentWrite {
    name: String,
    fields: BTreeMap<String, WireValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldMask {
    field_paths: Vec<String>,
}

/// The server-assigned timestamp sentinel: asks the store to stamp the
/// field with its commit time instead of a client-supplied value.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldTransform {
    field_path: String,
    set_to_server_value: &'static str,
}

impl FieldTransform {
    fn request_time(field_path: &str) -> Self {
        Self {
            field_path: field_path.to_string(),
            set_to_server_value: "REQUEST_TIME",
        }
    }
}

#[derive(Debug, Serialize)]
struct Precondition {
    exists: bool,
}

// --- Decoding ---------------------------------------------------------------

fn decode_document(document: &Document) -> Result<TicketRecord> {
    let id = document
        .name
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            HelpdeskError::MalformedDocument(format!("bad document name '{}'", document.name))
        })?;

    let string_field = |key: &str| -> Result<String> {
        match document.fields.get(key) {
            Some(WireValue::StringValue(s)) => Ok(s.clone()),
            Some(_) => Err(HelpdeskError::MalformedDocument(format!(
                "field '{key}' is not a string"
            ))),
            None => Err(HelpdeskError::MalformedDocument(format!(
                "missing field '{key}'"
            ))),
        }
    };
    let timestamp_field = |key: &str| -> Result<Option<Timestamp>> {
        match document.fields.get(key) {
            Some(WireValue::TimestampValue(ts)) => Ok(Some(*ts)),
            Some(_) => Err(HelpdeskError::MalformedDocument(format!(
                "field '{key}' is not a timestamp"
            ))),
            None => Ok(None),
        }
    };

    let status = TicketStatus::from_str(&string_field("status")?)?;
    let created_at = timestamp_field("created_at")?.ok_or_else(|| {
        HelpdeskError::MalformedDocument("missing field 'created_at'".to_string())
    })?;
    let solution = match document.fields.get("solution") {
        Some(WireValue::StringValue(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    Ok(TicketRecord {
        id: TicketId::new(id),
        patrimony: string_field("patrimony")?,
        description: string_field("description")?,
        status,
        solution,
        created_at,
        closed_at: timestamp_field("closed_at")?,
    })
}
