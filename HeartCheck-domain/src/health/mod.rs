//! Domain layer health check functionality
//! Reports on session storage and on the scoring rules themselves.

use heart_check_data::database::{self, ConnectionInfo, DatabaseError};
use std::collections::HashMap;
use async_trait::async_trait;

use crate::entities::heart_health::{ExerciseLevel, Gender, HealthInput};
use crate::services::scoring;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database
    /// Returns true if the database is healthy, false if sessions are
    /// being kept in memory instead
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Turn a description of the session database into a health component
///
/// - no pool: degraded, sessions live in process memory
/// - in-memory SQLite fallback: degraded, results are lost on restart
/// - file-backed pool: healthy
/// - pool that cannot hand out a connection: unhealthy
pub fn database_component(info: Option<Result<ConnectionInfo, DatabaseError>>) -> HealthComponent {
    match info {
        None => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Database not configured, session results are kept in memory".to_string()),
        },
        Some(Ok(info)) if info.is_in_memory() => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(format!("{}, session results will not survive a restart", info)),
        },
        Some(Ok(_)) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        Some(Err(e)) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(format!("Database connection error: {}", e)),
        },
    }
}

/// Check whether session results are being persisted to disk
///
/// Returns:
/// - Ok(true) if a file-backed pool is up and answering
/// - Ok(false) if sessions live in memory, either without a pool or in the in-memory fallback
/// - Err if the pool exists but a connection could not be obtained
pub async fn check_database_status() -> Result<bool, String> {
    match database::get_connection_info() {
        None => Ok(false),
        Some(Ok(info)) => Ok(!info.is_in_memory()),
        Some(Err(e)) => Err(format!("Database connection error: {}", e)),
    }
}

/// Run the scorer on a fixed reference input and compare with the known answer
pub fn check_scorer_status() -> Result<(), String> {
    let reference = HealthInput {
        age: 50,
        gender: Gender::Male,
        systolic_bp: 135,
        diastolic_bp: 85,
        heart_rate: 95,
        cholesterol: 210,
        smoker: true,
        exercise_level: ExerciseLevel::None,
    };

    let result = scoring::evaluate(&reference);
    if result.total_score == 8 && result.health_status.status == "Fair" {
        Ok(())
    } else {
        Err(format!(
            "Scorer self-check failed: expected total 8 (Fair), got {} ({})",
            result.total_score, result.health_status.status
        ))
    }
}

/// Derive the overall status from the individual components
pub fn overall_status(components: &HashMap<String, HealthComponent>) -> SystemStatus {
    if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
        SystemStatus::Unhealthy
    } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
        SystemStatus::Degraded
    } else {
        SystemStatus::Healthy
    }
}

/// Get overall system health
pub async fn get_system_health() -> SystemHealth {
    let db_component = database_component(database::get_connection_info());

    let scorer_component = match check_scorer_status() {
        Ok(()) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e),
        },
    };

    let components: HashMap<String, HealthComponent> = vec![
        ("database".to_string(), db_component),
        ("scorer".to_string(), scorer_component),
    ].into_iter().collect();

    SystemHealth {
        status: overall_status(&components),
        components,
    }
}
