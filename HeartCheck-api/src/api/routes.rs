use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use heart_check_domain::health::HealthServiceTrait;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::debug;

use crate::api::handlers::{health, heart_check, tips};
use crate::api::handlers::heart_check::HeartCheckService;
use crate::openapi::configure_swagger_routes;

/// Create the application router with the default services
pub fn create_app() -> Router {
    create_app_with_services(heart_check::create_service(), health::create_health_service())
}

/// Create the application router around the given services
pub fn create_app_with_services(
    heart_check_service: HeartCheckService,
    health_service: Arc<dyn HealthServiceTrait + Send + Sync>,
) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/tips", get(tips::get_tips))
        .route("/heart-check", post(heart_check::analyze_json))
        .route("/heart-check/form", post(heart_check::analyze_form))
        .route("/heart-check/session", get(heart_check::get_session_result))
        .route("/heart-check/reset", post(heart_check::reset_session));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(heart_check_service);

    debug!("API routes configured");

    let app = add_swagger_ui(app);
    let app = configure_security(app).layer(TraceLayer::new_for_http());

    health::initialize_server_start_time();

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

/// Apply CORS and security headers to every response
pub fn configure_security(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    app.layer(security_headers).layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use heart_check_domain::testing::{MockHealthService, MockHeartCheckService};
    use tower::ServiceExt;

    fn test_app() -> Router {
        create_app_with_services(
            Arc::new(MockHeartCheckService::new()),
            Arc::new(MockHealthService::new()),
        )
    }

    async fn get_request(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = get_request(test_app(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tips_route() {
        let response = get_request(test_app(), "/api/v1/tips").await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!body["categories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = get_request(test_app(), "/api-docs/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_security_headers() {
        let response = get_request(test_app(), "/health").await;
        let headers = response.headers();
        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get("referrer-policy").unwrap(), "strict-origin-when-cross-origin");
    }

    #[tokio::test]
    async fn test_session_route_without_cookie() {
        let response = get_request(test_app(), "/api/v1/heart-check/session").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = get_request(test_app(), "/api/v1/blood-pressure").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
