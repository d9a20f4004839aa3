//! Axum router wiring the portal views to the injected collaborators

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::auth::AuthGateway;
use crate::render;
use crate::session::SessionWatch;
use crate::store::{ApplicationStatus, ApplicationStore, DriverApplication};

/// Portal application state: the two collaborator gateways and the session
/// gate's watch on the auth-state stream (subscribed once, at router build)
#[derive(Clone)]
pub struct PortalState {
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn ApplicationStore>,
    sessions: SessionWatch,
}

/// Build the portal axum router
pub fn build_router(auth: Arc<dyn AuthGateway>, store: Arc<dyn ApplicationStore>) -> Router {
    let sessions = auth.subscribe();
    let state = PortalState {
        auth,
        store,
        sessions,
    };

    let api = Router::new()
        .route("/api/applications", get(api_applications_handler))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/applications/{id}/approve", post(approve_handler))
        .route("/applications/{id}/reject", post(reject_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct IndexParams {
    review: Option<String>,
}

/// Session gate plus dashboard: renders Login without a session, otherwise
/// runs the pending query and renders the table (and the review modal when
/// the `review` parameter names a listed application)
async fn index_handler(
    State(portal): State<PortalState>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    if portal.sessions.current().is_none() {
        return Html(render::login_page(None));
    }

    match portal.store.list_by_status(ApplicationStatus::Pending).await {
        Ok(applications) => {
            let selected = params
                .review
                .as_deref()
                .and_then(|id| applications.iter().find(|app| app.id == id));
            Html(render::dashboard_page(&applications, None, selected))
        }
        Err(e) => {
            tracing::warn!("Failed to list pending applications: {}", e);
            Html(render::dashboard_page(
                &[],
                Some(render::FETCH_FAILED_MSG),
                None,
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

/// Sign in; the session gate observes the new session through its
/// subscription, so success just redirects back to the gate
async fn login_handler(
    State(portal): State<PortalState>,
    Form(credentials): Form<LoginForm>,
) -> Response {
    match portal
        .auth
        .sign_in(&credentials.email, &credentials.password)
        .await
    {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::warn!("Sign-in failed for '{}': {}", credentials.email, e);
            Html(render::login_page(Some(render::LOGIN_FAILED_MSG))).into_response()
        }
    }
}

async fn logout_handler(State(portal): State<PortalState>) -> Response {
    match portal.auth.sign_out().await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::warn!("Sign-out failed: {}", e);
            Html(render::alert_redirect(render::LOGOUT_FAILED_MSG)).into_response()
        }
    }
}

async fn approve_handler(State(portal): State<PortalState>, Path(id): Path<String>) -> Response {
    decide(portal, &id, ApplicationStatus::Approved).await
}

async fn reject_handler(State(portal): State<PortalState>, Path(id): Path<String>) -> Response {
    decide(portal, &id, ApplicationStatus::Rejected).await
}

/// Apply an operator decision. Success and failure both land back on `/`,
/// clearing the selection; the redirect re-runs the pending query.
async fn decide(portal: PortalState, id: &str, status: ApplicationStatus) -> Response {
    match portal.store.update_status(id, status).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::warn!("Failed to mark application '{}' {}: {}", id, status, e);
            let message = match status {
                ApplicationStatus::Approved => render::APPROVE_FAILED_MSG,
                _ => render::REJECT_FAILED_MSG,
            };
            Html(render::alert_redirect(message)).into_response()
        }
    }
}

async fn api_applications_handler(
    State(portal): State<PortalState>,
) -> std::result::Result<Json<Vec<DriverApplication>>, axum::http::StatusCode> {
    if portal.sessions.current().is_none() {
        return Err(axum::http::StatusCode::UNAUTHORIZED);
    }

    portal
        .store
        .list_by_status(ApplicationStatus::Pending)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::warn!("Failed to list pending applications: {}", e);
            axum::http::StatusCode::BAD_GATEWAY
        })
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::auth::MockAuthGateway;
    use crate::session::{Session, SessionHub};
    use crate::store::MockApplicationStore;

    fn test_session() -> Session {
        Session {
            uid: "uid-1".to_string(),
            email: Some("admin@example.com".to_string()),
            id_token: "tok".to_string(),
        }
    }

    fn test_application(id: &str, full_name: Option<&str>) -> DriverApplication {
        DriverApplication {
            id: id.to_string(),
            full_name: full_name.map(str::to_string),
            vehicle_model: Some("Mio i125".to_string()),
            plate_number: Some("ABC 1234".to_string()),
            submission_date: None,
            email: Some("juan@example.com".to_string()),
            phone: None,
            license_url: None,
            orcr_url: None,
            status: ApplicationStatus::Pending,
        }
    }

    /// Router whose auth gateway publishes on the given hub
    fn router_with(hub: &SessionHub, store: MockApplicationStore) -> Router {
        let mut auth = MockAuthGateway::new();
        let subscribe_hub = hub.clone();
        auth.expect_subscribe()
            .returning(move || subscribe_hub.subscribe());
        build_router(Arc::new(auth), Arc::new(store))
    }

    fn signed_in_hub() -> SessionHub {
        let hub = SessionHub::new();
        hub.publish(Some(test_session()));
        hub
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn no_session_renders_login_never_dashboard() {
        let app = router_with(&SessionHub::new(), MockApplicationStore::new());
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Admin Portal Login"));
        assert!(!html.contains("Pending Driver Applications"));
    }

    #[tokio::test]
    async fn active_session_renders_dashboard_never_login() {
        let mut store = MockApplicationStore::new();
        store.expect_list_by_status().returning(|_| {
            Box::pin(async { Ok(vec![test_application("abc123", Some("Juan Dela Cruz"))]) })
        });

        let app = router_with(&signed_in_hub(), store);
        let response = app.oneshot(get("/")).await.unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Pending Driver Applications"));
        assert!(!html.contains("Admin Portal Login"));
    }

    #[tokio::test]
    async fn dashboard_renders_one_row_per_record() {
        let mut store = MockApplicationStore::new();
        store.expect_list_by_status().returning(|_| {
            Box::pin(async {
                Ok(vec![
                    test_application("a1", Some("First Driver")),
                    test_application("a2", Some("Second Driver")),
                    test_application("a3", None),
                ])
            })
        });

        let app = router_with(&signed_in_hub(), store);
        let html = body_string(app.oneshot(get("/")).await.unwrap()).await;
        assert_eq!(html.matches("/?review=").count(), 3);
        // The record without a name falls back to the placeholder
        assert!(html.contains("N/A"));
    }

    #[tokio::test]
    async fn dashboard_renders_empty_state() {
        let mut store = MockApplicationStore::new();
        store
            .expect_list_by_status()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let app = router_with(&signed_in_hub(), store);
        let html = body_string(app.oneshot(get("/")).await.unwrap()).await;
        assert!(html.contains("No pending applications found."));
    }

    #[tokio::test]
    async fn dashboard_renders_fetch_error() {
        let mut store = MockApplicationStore::new();
        store.expect_list_by_status().returning(|_| {
            Box::pin(async { Err(crate::PortalError::Store("permission denied".to_string())) })
        });

        let app = router_with(&signed_in_hub(), store);
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Failed to fetch drivers."));
    }

    #[tokio::test]
    async fn review_parameter_opens_modal_for_listed_record() {
        let mut store = MockApplicationStore::new();
        store.expect_list_by_status().returning(|_| {
            Box::pin(async { Ok(vec![test_application("abc123", Some("Juan Dela Cruz"))]) })
        });

        let app = router_with(&signed_in_hub(), store);
        let html = body_string(app.oneshot(get("/?review=abc123")).await.unwrap()).await;
        assert!(html.contains("Driver Application Details"));
        assert!(html.contains("/applications/abc123/approve"));
    }

    #[tokio::test]
    async fn review_parameter_for_unknown_record_renders_no_modal() {
        let mut store = MockApplicationStore::new();
        store.expect_list_by_status().returning(|_| {
            Box::pin(async { Ok(vec![test_application("abc123", Some("Juan Dela Cruz"))]) })
        });

        let app = router_with(&signed_in_hub(), store);
        let html = body_string(app.oneshot(get("/?review=ghost")).await.unwrap()).await;
        assert!(!html.contains("Driver Application Details"));
    }

    #[tokio::test]
    async fn login_success_redirects_to_gate() {
        let hub = SessionHub::new();
        let mut auth = MockAuthGateway::new();
        let subscribe_hub = hub.clone();
        auth.expect_subscribe()
            .returning(move || subscribe_hub.subscribe());
        let publish_hub = hub.clone();
        auth.expect_sign_in()
            .withf(|email, password| email == "admin@example.com" && password == "pw")
            .returning(move |_, _| {
                let hub = publish_hub.clone();
                Box::pin(async move {
                    hub.publish(Some(test_session()));
                    Ok(test_session())
                })
            });

        let app = build_router(Arc::new(auth), Arc::new(MockApplicationStore::new()));
        let response = app
            .oneshot(post_form("/login", "email=admin%40example.com&password=pw"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        // The gate now observes the published session
        assert!(hub.current().is_some());
    }

    #[tokio::test]
    async fn login_failure_shows_fixed_message() {
        let hub = SessionHub::new();
        let mut auth = MockAuthGateway::new();
        let subscribe_hub = hub.clone();
        auth.expect_subscribe()
            .returning(move || subscribe_hub.subscribe());
        auth.expect_sign_in().returning(|_, _| {
            Box::pin(async { Err(crate::PortalError::Auth("INVALID_PASSWORD".to_string())) })
        });

        let app = build_router(Arc::new(auth), Arc::new(MockApplicationStore::new()));
        let response = app
            .oneshot(post_form("/login", "email=admin%40example.com&password=bad"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Failed to login. Please check your email and password."));
        // The backend detail is not surfaced
        assert!(!html.contains("INVALID_PASSWORD"));
    }

    #[tokio::test]
    async fn approve_redirects_and_next_render_requeries() {
        let mut store = MockApplicationStore::new();
        store
            .expect_update_status()
            .withf(|id, status| id == "abc123" && *status == ApplicationStatus::Approved)
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        store
            .expect_list_by_status()
            .times(1)
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let app = router_with(&signed_in_hub(), store);
        let response = app
            .clone()
            .oneshot(post("/applications/abc123/approve"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        // Selection is gone from the redirect target
        assert_eq!(response.headers()[header::LOCATION], "/");

        // Following the redirect re-runs the pending query
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn reject_updates_to_rejected() {
        let mut store = MockApplicationStore::new();
        store
            .expect_update_status()
            .withf(|id, status| id == "abc123" && *status == ApplicationStatus::Rejected)
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let app = router_with(&signed_in_hub(), store);
        let response = app
            .oneshot(post("/applications/abc123/reject"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn approve_failure_alerts_and_clears_selection() {
        let mut store = MockApplicationStore::new();
        store.expect_update_status().returning(|_, _| {
            Box::pin(async { Err(crate::PortalError::Store("conflict".to_string())) })
        });

        let app = router_with(&signed_in_hub(), store);
        let response = app
            .oneshot(post("/applications/abc123/approve"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Failed to approve driver."));
        assert!(html.contains("window.location.replace('/')"));
    }

    #[tokio::test]
    async fn reject_failure_alerts_with_reject_message() {
        let mut store = MockApplicationStore::new();
        store.expect_update_status().returning(|_, _| {
            Box::pin(async { Err(crate::PortalError::Store("conflict".to_string())) })
        });

        let app = router_with(&signed_in_hub(), store);
        let html = body_string(
            app.oneshot(post("/applications/abc123/reject"))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Failed to reject driver."));
    }

    #[tokio::test]
    async fn logout_delegates_clearing_to_the_gate() {
        let hub = signed_in_hub();
        let mut auth = MockAuthGateway::new();
        let subscribe_hub = hub.clone();
        auth.expect_subscribe()
            .returning(move || subscribe_hub.subscribe());
        let publish_hub = hub.clone();
        auth.expect_sign_out().times(1).returning(move || {
            let hub = publish_hub.clone();
            Box::pin(async move {
                hub.publish(None);
                Ok(())
            })
        });
        let mut store = MockApplicationStore::new();
        store.expect_list_by_status().never();

        let app = build_router(Arc::new(auth), Arc::new(store));
        let response = app.clone().oneshot(post("/logout")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // The gate observes the signed-out state and renders Login again
        let html = body_string(app.oneshot(get("/")).await.unwrap()).await;
        assert!(html.contains("Admin Portal Login"));
    }

    #[tokio::test]
    async fn logout_failure_alerts() {
        let hub = signed_in_hub();
        let mut auth = MockAuthGateway::new();
        let subscribe_hub = hub.clone();
        auth.expect_subscribe()
            .returning(move || subscribe_hub.subscribe());
        auth.expect_sign_out().returning(|| {
            Box::pin(async { Err(crate::PortalError::Auth("stream closed".to_string())) })
        });

        let app = build_router(Arc::new(auth), Arc::new(MockApplicationStore::new()));
        let html = body_string(app.oneshot(post("/logout")).await.unwrap()).await;
        assert!(html.contains("Failed to log out."));
        // The handler did not clear the session itself
        assert!(hub.current().is_some());
    }

    #[tokio::test]
    async fn api_returns_pending_applications_as_json() {
        let mut store = MockApplicationStore::new();
        store.expect_list_by_status().returning(|_| {
            Box::pin(async { Ok(vec![test_application("abc123", Some("Juan Dela Cruz"))]) })
        });

        let app = router_with(&signed_in_hub(), store);
        let response = app.oneshot(get("/api/applications")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 1);
        assert_eq!(json[0]["id"], "abc123");
        assert_eq!(json[0]["status"], "pending");
    }

    #[tokio::test]
    async fn api_requires_a_session() {
        let app = router_with(&SessionHub::new(), MockApplicationStore::new());
        let response = app.oneshot(get("/api/applications")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn api_maps_store_failure_to_bad_gateway() {
        let mut store = MockApplicationStore::new();
        store
            .expect_list_by_status()
            .returning(|_| Box::pin(async { Err(crate::PortalError::Store("down".to_string())) }));

        let app = router_with(&signed_in_hub(), store);
        let response = app.oneshot(get("/api/applications")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = router_with(&SessionHub::new(), MockApplicationStore::new());
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }
}
