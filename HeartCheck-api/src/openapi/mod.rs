use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Heart check endpoints
        crate::api::handlers::heart_check::analyze_json,
        crate::api::handlers::heart_check::analyze_form,
        crate::api::handlers::heart_check::get_session_result,
        crate::api::handlers::heart_check::reset_session,
        crate::api::handlers::tips::get_tips
    ),
    components(
        schemas(
            // Requests and responses
            crate::entities::heart_check::HeartCheckRequest,
            crate::entities::heart_check::HeartCheckForm,
            crate::entities::heart_check::AnalysisResponse,
            crate::entities::heart_check::SessionResultResponse,
            crate::entities::heart_check::TipCategory,
            crate::entities::heart_check::TipsResponse,
            crate::entities::common::ErrorResponse,

            // Analysis result
            heart_check_domain::entities::Gender,
            heart_check_domain::entities::ExerciseLevel,
            heart_check_domain::entities::AnalysisResult,
            heart_check_domain::entities::HealthStatus,
            heart_check_domain::entities::HealthStatusLevel,
            heart_check_domain::entities::CategoryResult,
            heart_check_domain::entities::LifestyleResult,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "heart_check", description = "Heart health scoring, session results and tips")
    ),
    info(
        title = "HeartCheck API",
        version = "0.1.0",
        description = "Rule-based heart health scoring from vital signs and lifestyle answers",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
