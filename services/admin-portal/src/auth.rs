//! Auth gateway trait and the Firebase-backed implementation

use async_trait::async_trait;
use firebase_rest::auth::AuthClient;

use crate::session::{Session, SessionHub, SessionWatch};

/// Capability contract to the authentication collaborator
///
/// Sign-in and sign-out publish the resulting auth state on the stream
/// returned by [`AuthGateway::subscribe`]; callers observe session changes
/// there rather than through the return values.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session
    async fn sign_in(&self, email: &str, password: &str) -> crate::Result<Session>;

    /// End the current session
    async fn sign_out(&self) -> crate::Result<()>;

    /// Subscribe to the auth-state stream
    fn subscribe(&self) -> SessionWatch;
}

/// Auth gateway backed by the Identity Toolkit REST API
pub struct FirebaseAuthGateway {
    client: AuthClient,
    hub: SessionHub,
}

impl std::fmt::Debug for FirebaseAuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseAuthGateway").finish()
    }
}

impl FirebaseAuthGateway {
    pub fn new(client: AuthClient) -> Self {
        Self {
            client,
            hub: SessionHub::new(),
        }
    }
}

#[async_trait]
impl AuthGateway for FirebaseAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> crate::Result<Session> {
        let response = self
            .client
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| crate::PortalError::Auth(e.to_string()))?;

        let session = Session {
            uid: response.local_id,
            email: response.email,
            id_token: response.id_token,
        };
        tracing::info!("Signed in '{}' as uid {}", email, session.uid);
        self.hub.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> crate::Result<()> {
        // Identity Toolkit has no sign-out endpoint; discarding the token
        // ends the session.
        tracing::info!("Signed out");
        self.hub.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> SessionWatch {
        self.hub.subscribe()
    }
}
