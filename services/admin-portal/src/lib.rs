//! Admin portal for reviewing driver applications
//!
//! Serves a login-gated dashboard over pending driver applications held in
//! Firestore, authenticating operators against Firebase Authentication.

pub mod auth;
pub mod config;
pub mod error;
pub mod portal;
pub mod render;
pub mod session;
pub mod store;

pub use config::{load_config, Config};
pub use error::{PortalError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use firebase_rest::auth::AuthClient;
use firebase_rest::firestore::FirestoreClient;
use firebase_rest::http::{HttpClient, ReqwestHttpClient};

use crate::auth::{AuthGateway, FirebaseAuthGateway};
use crate::store::{ApplicationStore, FirestoreApplicationStore};

/// Run the portal service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::default());

    // Build the collaborator gateways
    let auth_client = AuthClient::new(&config.firebase.api_key, Arc::clone(&http));
    let auth: Arc<dyn AuthGateway> = Arc::new(FirebaseAuthGateway::new(auth_client));
    let firestore = FirestoreClient::new(&config.firebase.project_id, Arc::clone(&http));
    let store: Arc<dyn ApplicationStore> = Arc::new(FirestoreApplicationStore::new(
        firestore,
        &config.firebase.collection,
        auth.subscribe(),
    ));

    // Setup shutdown handler
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let router = portal::build_router(auth, store);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Admin portal listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Admin portal stopped");
    Ok(())
}
