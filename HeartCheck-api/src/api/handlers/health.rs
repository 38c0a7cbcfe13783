use axum::{http::StatusCode, response::IntoResponse, Json, Extension};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use std::time::{SystemTime, UNIX_EPOCH};
use std::sync::Arc;
use once_cell::sync::OnceCell;
use heart_check_domain::health::{self, HealthServiceTrait, SystemStatus, ComponentStatus as DomainComponentStatus, SystemHealth};
use async_trait::async_trait;

/// Health check response with version, uptime and component details
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Unix timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub components: ComponentStatus,
    /// Value of APP_ENV
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Session storage status
    pub database: ComponentHealthStatus,
    /// Scoring rules self-check
    pub scorer: ComponentHealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<serde_json::Value>,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time for uptime reporting. Later calls are ignored.
pub fn initialize_server_start_time() {
    let _ = SERVER_START_TIME.get_or_init(unix_now);
}

fn component_health(system_health: &SystemHealth, name: &str) -> ComponentHealthStatus {
    let component = system_health.components.get(name);
    ComponentHealthStatus {
        status: map_component_status(
            component.map(|c| &c.status).unwrap_or(&DomainComponentStatus::Healthy),
        ),
        message: component.and_then(|c| c.details.clone()),
    }
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy or running in a degraded mode", body = HealthResponse),
        (status = 503, description = "API is not healthy", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(
    Extension(health_service): Extension<Arc<dyn HealthServiceTrait + Send + Sync>>,
) -> impl IntoResponse {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;

    let mut components = ComponentStatus {
        database: component_health(&system_health, "database"),
        scorer: component_health(&system_health, "scorer"),
        additional: None,
    };

    let additional: serde_json::Map<String, serde_json::Value> = system_health.components.iter()
        .filter(|(name, _)| name.as_str() != "database" && name.as_str() != "scorer")
        .map(|(name, component)| {
            (name.clone(), serde_json::json!({
                "status": map_component_status(&component.status),
                "message": component.details,
            }))
        })
        .collect();
    if !additional.is_empty() {
        components.additional = Some(additional.into());
    }

    // Sessions fall back to memory, so a degraded system still serves requests
    let (status_code, overall_status) = match system_health.status {
        SystemStatus::Healthy => (StatusCode::OK, "ok"),
        SystemStatus::Degraded => (StatusCode::OK, "degraded"),
        SystemStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, "error"),
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components,
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    (status_code, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }.to_string()
}

/// Health service reporting on the real database pool and scorer
#[derive(Debug, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        HealthService
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        health::get_system_health().await
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        health::check_database_status().await
    }
}

/// Factory function to create a health service
pub fn create_health_service() -> Arc<dyn HealthServiceTrait + Send + Sync> {
    Arc::new(HealthService::new())
}
