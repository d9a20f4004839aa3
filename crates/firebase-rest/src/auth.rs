//! Identity Toolkit password sign-in client

use std::sync::Arc;

use serde::Deserialize;

use crate::http::HttpClient;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Successful response from `accounts:signInWithPassword`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Client for the Identity Toolkit REST API
pub struct AuthClient {
    base_url: String,
    api_key: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AuthClient {
    pub fn new(api_key: &str, http: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
            api_key: api_key.to_string(),
            http,
        }
    }

    /// Exchange an email/password pair for ID and refresh tokens
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> crate::Result<SignInResponse> {
        let url = format!(
            "{}/accounts:signInWithPassword?key={}",
            self.base_url, self.api_key
        );
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        tracing::debug!("Signing in '{}'", email);
        let response = self.http.post_json(&url, &body, &[]).await?;

        if !response.is_success() {
            return Err(crate::FirebaseError::Api {
                status: response.status,
                body: response.body,
            });
        }

        let parsed: SignInResponse = serde_json::from_str(&response.body)?;
        tracing::debug!("Signed in '{}' as uid {}", email, parsed.local_id);
        Ok(parsed)
    }
}
