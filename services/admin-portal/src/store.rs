//! Driver application records and the document-store gateway

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firebase_rest::firestore::{Document, FieldValue, FirestoreClient};
use serde::{Deserialize, Serialize};

use crate::session::SessionWatch;

/// Review status of a driver application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A driver application as returned by the backend
///
/// All fields except `id` and `status` are optional; the views render a
/// placeholder for anything missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverApplication {
    pub id: String,
    pub full_name: Option<String>,
    pub vehicle_model: Option<String>,
    pub plate_number: Option<String>,
    pub submission_date: Option<DateTime<Utc>>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub license_url: Option<String>,
    pub orcr_url: Option<String>,
    pub status: ApplicationStatus,
}

/// Capability contract to the document-store collaborator
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ApplicationStore: Send + Sync {
    /// All applications whose status equals the given value, backend order
    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> crate::Result<Vec<DriverApplication>>;

    /// Set one application's status to the given value
    async fn update_status(&self, id: &str, status: ApplicationStatus) -> crate::Result<()>;
}

/// Application store backed by the Firestore REST API
///
/// Holds a watch on the auth-state stream; every call uses the bearer token
/// of the session current at that moment.
pub struct FirestoreApplicationStore {
    firestore: FirestoreClient,
    collection: String,
    sessions: SessionWatch,
}

impl std::fmt::Debug for FirestoreApplicationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreApplicationStore")
            .field("collection", &self.collection)
            .finish()
    }
}

impl FirestoreApplicationStore {
    pub fn new(firestore: FirestoreClient, collection: &str, sessions: SessionWatch) -> Self {
        Self {
            firestore,
            collection: collection.to_string(),
            sessions,
        }
    }

    fn bearer(&self) -> crate::Result<String> {
        self.sessions
            .current()
            .map(|session| session.id_token)
            .ok_or_else(|| crate::PortalError::Store("No active session".to_string()))
    }
}

fn application_from_document(doc: &Document, queried: ApplicationStatus) -> DriverApplication {
    let status = doc
        .field_str("status")
        .and_then(ApplicationStatus::parse)
        .unwrap_or(queried);

    DriverApplication {
        id: doc.doc_id().to_string(),
        full_name: doc.field_str("fullName").map(str::to_string),
        vehicle_model: doc.field_str("vehicleModel").map(str::to_string),
        plate_number: doc.field_str("plateNumber").map(str::to_string),
        submission_date: doc.field_timestamp("submissionDate"),
        email: doc.field_str("email").map(str::to_string),
        phone: doc.field_str("phone").map(str::to_string),
        license_url: doc.field_str("licenseUrl").map(str::to_string),
        orcr_url: doc.field_str("orcrUrl").map(str::to_string),
        status,
    }
}

#[async_trait]
impl ApplicationStore for FirestoreApplicationStore {
    async fn list_by_status(
        &self,
        status: ApplicationStatus,
    ) -> crate::Result<Vec<DriverApplication>> {
        let bearer = self.bearer()?;
        let documents = self
            .firestore
            .run_query(
                &self.collection,
                "status",
                &FieldValue::string(status.as_str()),
                &bearer,
            )
            .await
            .map_err(|e| crate::PortalError::Store(e.to_string()))?;

        let applications = documents
            .iter()
            .map(|doc| application_from_document(doc, status))
            .collect::<Vec<_>>();
        tracing::debug!(
            "Listed {} '{}' applications",
            applications.len(),
            status
        );
        Ok(applications)
    }

    async fn update_status(&self, id: &str, status: ApplicationStatus) -> crate::Result<()> {
        let bearer = self.bearer()?;
        self.firestore
            .update_fields(
                &self.collection,
                id,
                &[("status", FieldValue::string(status.as_str()))],
                &bearer,
            )
            .await
            .map_err(|e| crate::PortalError::Store(e.to_string()))?;

        tracing::info!("Application '{}' marked {}", id, status);
        Ok(())
    }
}
