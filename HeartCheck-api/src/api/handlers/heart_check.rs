use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use heart_check_domain::entities::HealthInput;
use heart_check_domain::services::{HeartCheckServiceError, HeartCheckServiceTrait};

use crate::entities::common::ErrorResponse;
use crate::entities::heart_check::{
    AnalysisResponse, HeartCheckForm, HeartCheckRequest, SessionResultResponse,
};

/// Name of the cookie carrying the caller's session id
pub const SESSION_COOKIE: &str = "heart_check_session";

/// Shared heart check service used as router state
pub type HeartCheckService = Arc<dyn HeartCheckServiceTrait + Send + Sync>;

/// Create the heart check service backed by the data layer
pub fn create_service() -> HeartCheckService {
    Arc::new(heart_check_domain::services::create_default_heart_check_service())
}

/// Read the session id from the request cookies
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn session_cookie(session_id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session_id)
}

fn expired_session_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", SESSION_COOKIE)
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(e) => error!("Failed to build session cookie: {}", e),
    }
    response
}

fn map_service_error(err: HeartCheckServiceError) -> Response {
    match err {
        HeartCheckServiceError::NotFound(_) => {
            ErrorResponse::not_found("heart check result").into_response()
        }
        other => {
            error!("Heart check service error: {}", other);
            ErrorResponse::internal_error().into_response()
        }
    }
}

/// Score the input, store it for the session and build the response
async fn analyze_and_store(
    service: &HeartCheckService,
    headers: &HeaderMap,
    name: String,
    input: HealthInput,
    exercise_label: Option<String>,
) -> Response {
    let mut result = service.analyze(&input);
    if let Some(label) = exercise_label {
        result.lifestyle.exercise = label;
    }

    let existing = session_id_from_headers(headers);
    let is_new_session = existing.is_none();
    let session_id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());

    // Storage is best-effort; the caller still gets the analysis
    let stored = match service.save_session_result(&session_id, &name, &result).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Failed to store heart check result for session {}: {}", session_id, e);
            false
        }
    };

    info!(
        total_score = result.total_score,
        status = %result.health_status.status,
        "Heart check completed"
    );

    let body = AnalysisResponse {
        name,
        session_id: session_id.clone(),
        stored,
        result,
    };

    let response = (StatusCode::OK, Json(body)).into_response();
    if is_new_session {
        with_cookie(response, &session_cookie(&session_id))
    } else {
        response
    }
}

/// Run a heart check from a JSON request
#[utoipa::path(
    post,
    path = "/api/v1/heart-check",
    request_body = HeartCheckRequest,
    responses(
        (status = 200, description = "Heart check completed", body = AnalysisResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    ),
    tag = "heart_check"
)]
#[instrument(skip(service, headers, payload))]
pub async fn analyze_json(
    State(service): State<HeartCheckService>,
    headers: HeaderMap,
    payload: Result<Json<HeartCheckRequest>, JsonRejection>,
) -> Result<impl IntoResponse, Response> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected heart check body: {}", rejection);
        ErrorResponse::bad_request(&format!("Invalid input: {}", rejection.body_text())).into_response()
    })?;

    if let Err(validation_errors) = request.validate() {
        let details = serde_json::to_value(&validation_errors).ok();
        return Err(ErrorResponse::validation_error("Invalid heart check input", details).into_response());
    }

    let input = request.to_input();
    Ok(analyze_and_store(&service, &headers, request.name, input, None).await)
}

/// Run a heart check from an urlencoded form
#[utoipa::path(
    post,
    path = "/api/v1/heart-check/form",
    request_body(content = HeartCheckForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Heart check completed", body = AnalysisResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    ),
    tag = "heart_check"
)]
#[instrument(skip(service, headers, payload))]
pub async fn analyze_form(
    State(service): State<HeartCheckService>,
    headers: HeaderMap,
    payload: Result<Form<HeartCheckForm>, FormRejection>,
) -> Result<impl IntoResponse, Response> {
    let Form(form) = payload.map_err(|rejection| {
        debug!("Rejected heart check form: {}", rejection);
        ErrorResponse::bad_request(&format!("Invalid input: {}", rejection.body_text())).into_response()
    })?;

    let parsed = form
        .into_input()
        .map_err(|e| ErrorResponse::bad_request(&e.to_string()).into_response())?;

    Ok(analyze_and_store(&service, &headers, parsed.name, parsed.input, Some(parsed.exercise)).await)
}

/// Get the last heart check result stored for the caller's session
#[utoipa::path(
    get,
    path = "/api/v1/heart-check/session",
    responses(
        (status = 200, description = "Stored heart check result", body = SessionResultResponse),
        (status = 404, description = "No result stored for this session", body = ErrorResponse)
    ),
    tag = "heart_check"
)]
#[instrument(skip(service, headers))]
pub async fn get_session_result(
    State(service): State<HeartCheckService>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Response> {
    let session_id = session_id_from_headers(&headers)
        .ok_or_else(|| ErrorResponse::not_found("heart check result").into_response())?;

    let session = service
        .get_session_result(&session_id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(SessionResultResponse {
        session_id: session.session_id,
        name: session.name,
        result: session.result,
        created_at: session.created_at.to_rfc3339(),
    }))
}

/// Forget the caller's session
#[utoipa::path(
    post,
    path = "/api/v1/heart-check/reset",
    responses(
        (status = 204, description = "Session cleared"),
        (status = 500, description = "Session could not be cleared", body = ErrorResponse)
    ),
    tag = "heart_check"
)]
#[instrument(skip(service, headers))]
pub async fn reset_session(
    State(service): State<HeartCheckService>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Response> {
    if let Some(session_id) = session_id_from_headers(&headers) {
        service
            .clear_session(&session_id)
            .await
            .map_err(map_service_error)?;
        info!("Session {} cleared", session_id);
    }

    Ok(with_cookie(StatusCode::NO_CONTENT.into_response(), &expired_session_cookie()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::{get, post}, Router};
    use heart_check_domain::testing::MockHeartCheckService;
    use tower::ServiceExt;

    fn app(service: HeartCheckService) -> Router {
        Router::new()
            .route("/api/v1/heart-check", post(analyze_json))
            .route("/api/v1/heart-check/form", post(analyze_form))
            .route("/api/v1/heart-check/session", get(get_session_result))
            .route("/api/v1/heart-check/reset", post(reset_session))
            .with_state(service)
    }

    fn mock_service() -> HeartCheckService {
        Arc::new(MockHeartCheckService::new())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn form_request(body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/heart-check/form")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    const EXAMPLE_FORM: &str = "name=Alice&age=50&gender=male&systolic_bp=135&diastolic_bp=85\
        &heart_rate=95&cholesterol=210&smoker=yes&exercise=none";

    #[test]
    fn test_session_id_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; heart_check_session=abc-123"));
        assert_eq!(session_id_from_headers(&headers), Some("abc-123".to_string()));

        headers.insert(header::COOKIE, HeaderValue::from_static("heart_check_session="));
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[tokio::test]
    async fn test_unknown_exercise_level_is_echoed_back() {
        let service = mock_service();
        let body = "name=Bob&age=30&gender=female&systolic_bp=110&diastolic_bp=70\
            &heart_rate=65&cholesterol=180&exercise=daily";
        let response = app(service.clone())
            .oneshot(form_request(body, Some("heart_check_session=daily-session")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["result"]["lifestyle"]["exercise"], "daily");
        // Scored like an active level
        assert_eq!(json["result"]["lifestyle"]["score"], 0);

        let stored = service.get_session_result("daily-session").await.unwrap();
        assert_eq!(stored.result.lifestyle.exercise, "daily");
    }

    #[tokio::test]
    async fn test_analyze_form_issues_session_cookie() {
        let response = app(mock_service())
            .oneshot(form_request(EXAMPLE_FORM, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
        assert!(cookie.starts_with("heart_check_session="));

        let body = body_json(response).await;
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["stored"], true);
        assert_eq!(body["result"]["total_score"], 8);
        assert_eq!(body["result"]["health_status"]["status"], "Fair");
        assert_eq!(body["result"]["blood_pressure"]["value"], "135/85 mmHg");
        assert!(cookie.contains(body["session_id"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_analyze_form_keeps_existing_session() {
        let response = app(mock_service())
            .oneshot(form_request(EXAMPLE_FORM, Some("heart_check_session=existing")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_json(response).await["session_id"], "existing");
    }

    #[tokio::test]
    async fn test_analyze_form_rejects_bad_number() {
        let response = app(mock_service())
            .oneshot(form_request("age=old", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid input"));
    }

    #[tokio::test]
    async fn test_analyze_form_with_defaults() {
        let response = app(mock_service())
            .oneshot(form_request("", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "User");
        assert!(body["result"]["recommendations"].as_array().unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_storage_failure_still_returns_analysis() {
        let service: HeartCheckService = Arc::new(MockHeartCheckService::new().with_storage_failure());
        let response = app(service)
            .oneshot(form_request(EXAMPLE_FORM, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["stored"], false);
        assert_eq!(body["result"]["total_score"], 8);
    }

    #[tokio::test]
    async fn test_analyze_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/heart-check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({
                "name": "Bob",
                "age": 30,
                "gender": "female",
                "systolic_bp": 118,
                "diastolic_bp": 75,
                "heart_rate": 70,
                "cholesterol": 180,
                "smoker": false,
                "exercise_level": "active"
            }).to_string()))
            .unwrap();

        let response = app(mock_service()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["result"]["total_score"], 0);
        assert_eq!(body["result"]["health_status"]["status"], "Excellent");
        assert_eq!(
            body["result"]["recommendations"],
            serde_json::json!(["Maintain your current healthy lifestyle", "Continue regular health checkups"])
        );
    }

    #[tokio::test]
    async fn test_analyze_json_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/heart-check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({
                "age": 30,
                "systolic_bp": 500,
                "diastolic_bp": 75,
                "heart_rate": 70,
                "cholesterol": 180
            }).to_string()))
            .unwrap();

        let response = app(mock_service()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_analyze_json_malformed_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/heart-check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"age\": \"fifty\"}"))
            .unwrap();

        let response = app(mock_service()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_session_round_trip_and_reset() {
        let service = mock_service();

        let response = app(service.clone())
            .oneshot(form_request(EXAMPLE_FORM, Some("heart_check_session=s1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let session_request = || {
            Request::builder()
                .uri("/api/v1/heart-check/session")
                .header(header::COOKIE, "heart_check_session=s1")
                .body(Body::empty())
                .unwrap()
        };

        let response = app(service.clone()).oneshot(session_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Alice");
        assert_eq!(body["result"]["total_score"], 8);

        let reset = Request::builder()
            .method("POST")
            .uri("/api/v1/heart-check/reset")
            .header(header::COOKIE, "heart_check_session=s1")
            .body(Body::empty())
            .unwrap();
        let response = app(service.clone()).oneshot(reset).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let response = app(service).oneshot(session_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_without_cookie_is_not_found() {
        let request = Request::builder()
            .uri("/api/v1/heart-check/session")
            .body(Body::empty())
            .unwrap();

        let response = app(mock_service()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }
}
