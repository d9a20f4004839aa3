//! Firestore document query and update client

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::HttpClient;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// A single typed Firestore value
///
/// The REST representation is an object with exactly one of these keys set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
}

impl FieldValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_value
    }
}

/// A Firestore document: full resource name plus typed fields
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl Document {
    /// The document id: the last segment of the resource name
    pub fn doc_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// String field accessor, `None` when absent or not a string
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_str)
    }

    /// Timestamp field accessor, `None` when absent or not a timestamp
    pub fn field_timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.fields.get(field).and_then(FieldValue::as_timestamp)
    }
}

/// One row of a `runQuery` response; rows without a document carry only a read time
#[derive(Debug, Deserialize)]
struct QueryRow {
    document: Option<Document>,
}

/// Client for the Firestore documents REST API
pub struct FirestoreClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for FirestoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FirestoreClient {
    pub fn new(project_id: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            FIRESTORE_URL, project_id
        );
        tracing::debug!("Created FirestoreClient at {}", base_url);
        Self { base_url, http }
    }

    /// Run a single field-equality query against a collection
    pub async fn run_query(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
        bearer: &str,
    ) -> crate::Result<Vec<Document>> {
        let url = format!("{}:runQuery", self.base_url);
        let body = serde_json::json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": value,
                    }
                },
            }
        });

        tracing::debug!("Querying '{}' where {} == {:?}", collection, field, value);
        let auth_header = format!("Bearer {}", bearer);
        let response = self
            .http
            .post_json(&url, &body, &[("Authorization", &auth_header)])
            .await?;

        if !response.is_success() {
            return Err(crate::FirebaseError::Api {
                status: response.status,
                body: response.body,
            });
        }

        let rows: Vec<QueryRow> = serde_json::from_str(&response.body)?;
        let documents: Vec<Document> = rows.into_iter().filter_map(|row| row.document).collect();
        tracing::debug!("Query on '{}' returned {} documents", collection, documents.len());
        Ok(documents)
    }

    /// Patch the named fields of a document, leaving all others untouched
    pub async fn update_fields(
        &self,
        collection: &str,
        doc_id: &str,
        fields: &[(&str, FieldValue)],
        bearer: &str,
    ) -> crate::Result<()> {
        let mask: Vec<String> = fields
            .iter()
            .map(|(name, _)| format!("updateMask.fieldPaths={}", name))
            .collect();
        let url = format!(
            "{}/{}/{}?{}",
            self.base_url,
            collection,
            doc_id,
            mask.join("&")
        );
        let field_map: HashMap<&str, &FieldValue> =
            fields.iter().map(|(name, value)| (*name, value)).collect();
        let body = serde_json::json!({ "fields": field_map });

        tracing::debug!("Updating '{}/{}' fields {:?}", collection, doc_id, mask);
        let auth_header = format!("Bearer {}", bearer);
        let response = self
            .http
            .patch_json(&url, &body, &[("Authorization", &auth_header)])
            .await?;

        if !response.is_success() {
            return Err(crate::FirebaseError::Api {
                status: response.status,
                body: response.body,
            });
        }

        Ok(())
    }
}
