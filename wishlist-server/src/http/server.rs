//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing and request timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, bounded by a grace period

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::middleware::map_response;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::error::timeout_as_json;
use super::routes;
use crate::service::WishService;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    /// Upper bound for handling a single request
    pub request_timeout: Duration,

    /// How long in-flight requests may keep running after a shutdown signal
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_permissive: false,
            request_timeout: Duration::from_secs(5),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub wishes: WishService,
}

/// Build the application router with all routes and middleware.
pub fn build_router(wishes: WishService, config: &ServerConfig) -> Router {
    layered(routes::wishes::router(), config).with_state(Arc::new(AppState { wishes }))
}

fn layered(routes: Router<Arc<AppState>>, config: &ServerConfig) -> Router<Arc<AppState>> {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:8080"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:8080"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    routes
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(map_response(timeout_as_json))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind `config.bind_addr` and serve until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let repo = Arc::new(PgWishRepo::new(pool.clone()));
/// run_server(WishService::new(repo), ServerConfig::default()).await?;
/// pool.close().await;
/// ```
pub async fn run_server(wishes: WishService, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(wishes, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    serve(listener, app, shutdown_signal(), config.shutdown_grace).await
}

/// Serve `app` until `signal` resolves, then drain in-flight requests for
/// at most `grace` before returning.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, mut signalled_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = signalled_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    let grace_expired = async move {
        if signalled_rx.wait_for(|signalled| *signalled).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = &mut server => result?,
        _ = grace_expired => {
            tracing::warn!(?grace, "Grace period elapsed, abandoning in-flight requests");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryWishRepo;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::routing::get;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app_with_repo() -> (Router, Arc<MemoryWishRepo>) {
        let repo = Arc::new(MemoryWishRepo::new());
        let app = build_router(WishService::new(repo.clone()), &ServerConfig::default());
        (app, repo)
    }

    fn app() -> Router {
        app_with_repo().0
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_owned())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, body: &str) -> Value {
        let response = send(app, "POST", "/wishes", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_of(response).await
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(!config.cors_permissive);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn buy_flow_end_to_end() {
        let app = app();
        let created = create(&app, r#"{"owner_email":"a@x.com","title":"Book"}"#).await;
        assert_eq!(created["is_bought"], false);
        assert!(created.get("bought_at").is_none());
        assert!(created.get("description").is_none());
        let id = created["id"].as_i64().unwrap();

        let response = send(&app, "PATCH", &format!("/wishes/{id}/buy"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let response = send(&app, "GET", &format!("/wishes/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = json_of(response).await;
        assert_eq!(fetched["is_bought"], true);
        assert!(fetched["bought_at"].is_string());
        assert_eq!(fetched["created_at"], created["created_at"]);

        let response = send(&app, "PATCH", &format!("/wishes/{id}/buy"), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await, json!({ "error": "wish already bought" }));
    }

    #[tokio::test]
    async fn create_validation_errors() {
        let (app, repo) = app_with_repo();

        let response = send(&app, "POST", "/wishes", Some(r#"{"title":"Book"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "email not provided");

        let response = send(&app, "POST", "/wishes", Some(r#"{"owner_email":"a@x.com","title":""}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "title not provided");

        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let app = app();
        let response = send(&app, "POST", "/wishes", Some("{not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "invalid JSON");

        let created = create(&app, r#"{"owner_email":"a@x.com","title":"Book"}"#).await;
        let uri = format!("/wishes/{}", created["id"]);
        let response = send(&app, "PATCH", &uri, Some(r#"["title"]"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "invalid JSON");
    }

    #[tokio::test]
    async fn array_body_is_not_a_wish() {
        let (app, repo) = app_with_repo();
        let response = send(&app, "POST", "/wishes", Some(r#"["a@x.com","Book"]"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "invalid JSON");
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn null_description_reads_as_empty() {
        let app = app();
        let created = create(
            &app,
            r#"{"owner_email":"a@x.com","title":"Book","description":null}"#,
        )
        .await;
        assert!(created.get("description").is_none());

        let uri = format!("/wishes/{}", created["id"]);
        let response = send(&app, "PATCH", &uri, Some(r#"{"title":"Novel","description":null}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_of(response).await;
        assert_eq!(updated["title"], "Novel");
        assert!(updated.get("description").is_none());

        let response = send(&app, "POST", "/wishes", Some(r#"{"owner_email":null,"title":"Book"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "email not provided");
    }

    #[tokio::test]
    async fn timestamps_are_utc_rfc3339() {
        let app = app();
        let created = create(&app, r#"{"owner_email":"a@x.com","title":"Book"}"#).await;
        let created_at = created["created_at"].as_str().unwrap();
        assert!(created_at.ends_with('Z'), "{created_at}");
    }

    #[tokio::test]
    async fn non_integer_id_is_400() {
        let app = app();
        for (method, uri) in [
            ("GET", "/wishes/abc"),
            ("DELETE", "/wishes/1.5"),
            ("PATCH", "/wishes/x/buy"),
        ] {
            let response = send(&app, method, uri, None).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(json_of(response).await["error"], "invalid wish ID");
        }
    }

    #[tokio::test]
    async fn unknown_id_is_404_everywhere() {
        let app = app();
        for (method, uri, body) in [
            ("GET", "/wishes/99", None),
            ("PATCH", "/wishes/99", Some(r#"{"title":"t"}"#)),
            ("DELETE", "/wishes/99", None),
            ("PATCH", "/wishes/99/buy", None),
        ] {
            let response = send(&app, method, uri, body).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(json_of(response).await, json!({ "error": "wish not found" }));
        }
    }

    #[tokio::test]
    async fn update_returns_new_fields() {
        let app = app();
        let created = create(&app, r#"{"owner_email":"a@x.com","title":"Book"}"#).await;
        let uri = format!("/wishes/{}", created["id"]);

        let response = send(&app, "PATCH", &uri, Some(r#"{"title":"Novel","description":"used is fine"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_of(response).await;
        assert_eq!(updated["title"], "Novel");
        assert_eq!(updated["description"], "used is fine");
        assert_eq!(updated["is_bought"], false);
    }

    #[tokio::test]
    async fn delete_then_get_is_404() {
        let app = app();
        let created = create(&app, r#"{"owner_email":"a@x.com","title":"Book"}"#).await;
        let uri = format!("/wishes/{}", created["id"]);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_bought() {
        let app = app();
        let first = create(&app, r#"{"owner_email":"a@x.com","title":"first"}"#).await;
        create(&app, r#"{"owner_email":"a@x.com","title":"second"}"#).await;
        create(&app, r#"{"owner_email":"b@x.com","title":"other"}"#).await;
        send(&app, "PATCH", &format!("/wishes/{}/buy", first["id"]), None).await;

        let response = send(&app, "GET", "/wishes?owner_email=a@x.com", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let all = json_of(response).await;
        let titles: Vec<_> = all.as_array().unwrap().iter().map(|w| w["title"].clone()).collect();
        assert_eq!(titles, vec![json!("second"), json!("first")]);

        let response = send(&app, "GET", "/wishes?owner_email=a@x.com&bought=true", None).await;
        let bought = json_of(response).await;
        assert_eq!(bought.as_array().unwrap().len(), 1);
        assert_eq!(bought[0]["title"], "first");

        let response = send(&app, "GET", "/wishes?owner_email=nobody@x.com", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await, json!([]));
    }

    #[tokio::test]
    async fn repeated_owner_param_uses_first() {
        let app = app();
        create(&app, r#"{"owner_email":"a@x.com","title":"mine"}"#).await;
        create(&app, r#"{"owner_email":"b@x.com","title":"theirs"}"#).await;

        let response = send(&app, "GET", "/wishes?owner_email=a@x.com&owner_email=b@x.com", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let listed = json_of(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "mine");

        let response = send(&app, "GET", "/wishes/stats?owner_email=b@x.com&owner_email=a@x.com", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await["total"], 1);
    }

    #[tokio::test]
    async fn list_rejects_bad_input() {
        let app = app();
        let response = send(&app, "GET", "/wishes?owner_email=a@x.com&bought=maybe", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "invalid bought parameter");

        let response = send(&app, "GET", "/wishes", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"], "email not provided");
    }

    #[tokio::test]
    async fn stats_for_owner() {
        let app = app();
        let first = create(&app, r#"{"owner_email":"a@x.com","title":"first"}"#).await;
        create(&app, r#"{"owner_email":"a@x.com","title":"second"}"#).await;
        send(&app, "PATCH", &format!("/wishes/{}/buy", first["id"]), None).await;

        let response = send(&app, "GET", "/wishes/stats?owner_email=a@x.com", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await, json!({ "total": 2, "bought": 1, "pending": 1 }));

        let response = send(&app, "GET", "/wishes/stats?owner_email=new@x.com", None).await;
        assert_eq!(json_of(response).await, json!({ "total": 0, "bought": 0, "pending": 0 }));

        let response = send(&app, "GET", "/wishes/stats", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_failure_is_generic_500() {
        let (app, repo) = app_with_repo();
        repo.set_unavailable(true);

        let response = send(&app, "GET", "/wishes?owner_email=a@x.com", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_of(response).await, json!({ "error": "an internal error occurred" }));
    }

    #[tokio::test]
    async fn slow_request_times_out_with_json_body() {
        let config = ServerConfig {
            request_timeout: Duration::from_millis(20),
            ..ServerConfig::default()
        };
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        );
        let wishes = WishService::new(Arc::new(MemoryWishRepo::new()));
        let app = layered(slow, &config).with_state(Arc::new(AppState { wishes }));

        let response = send(&app, "GET", "/slow", None).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(json_of(response).await, json!({ "error": "request timed out" }));
    }

    #[tokio::test]
    async fn serve_returns_after_signal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            serve(listener, app(), async {}, Duration::from_secs(1)),
        )
        .await
        .expect("server did not stop");
        assert!(result.is_ok());
    }
}
