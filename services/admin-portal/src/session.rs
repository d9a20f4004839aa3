//! Session type and the auth-state observable

use std::sync::Arc;

use tokio::sync::watch;

/// Proof of authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque user id assigned by the auth backend
    pub uid: String,
    pub email: Option<String>,
    /// Bearer token for document-store calls
    pub id_token: String,
}

/// Publisher side of the auth-state stream
///
/// The auth gateway owns a hub and publishes `Some(session)` on sign-in and
/// `None` on sign-out. Publishing never blocks and does not require any live
/// subscriber.
#[derive(Debug, Clone)]
pub struct SessionHub {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl SessionHub {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current auth state and notify all subscribers
    pub fn publish(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    /// The auth state as of the last publish
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Subscribe to auth-state changes
    pub fn subscribe(&self) -> SessionWatch {
        SessionWatch {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription handle onto the auth-state stream
///
/// Dropping the watch is the unsubscribe; no explicit cancellation call is
/// needed and the publisher is never blocked by a dropped subscriber.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionWatch {
    /// The auth state as of the last publish
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    /// Wait for the next auth-state change
    ///
    /// Returns `false` once the publisher is gone, after which no further
    /// notifications will arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
