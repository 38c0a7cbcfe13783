// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use heart_check_data::repository::tests::MockSessionRepository;

use crate::entities::heart_health::{AnalysisResult, HealthInput, SessionResult};
use crate::services::heart_check::{retention_cutoff, HeartCheckServiceTrait, HeartCheckServiceError};
use crate::services::scoring;
use crate::health::{SystemHealth, SystemStatus, ComponentStatus, HealthComponent, HealthServiceTrait};
use std::sync::RwLock;
use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;

/// Mock implementation of the HeartCheckServiceTrait for testing.
/// Scoring is real; only session storage is simulated.
pub struct MockHeartCheckService {
    sessions: RwLock<HashMap<String, SessionResult>>,
    should_fail_storage: bool,
}

impl Default for MockHeartCheckService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHeartCheckService {
    /// Create a new mock heart check service
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            should_fail_storage: false,
        }
    }

    /// Configure the mock to fail every storage call
    pub fn with_storage_failure(mut self) -> Self {
        self.should_fail_storage = true;
        self
    }

    fn storage_check(&self) -> Result<(), HeartCheckServiceError> {
        if self.should_fail_storage {
            Err(HeartCheckServiceError::Storage(
                "Storage failed - mock is configured to fail".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HeartCheckServiceTrait for MockHeartCheckService {
    fn analyze(&self, input: &HealthInput) -> AnalysisResult {
        scoring::evaluate(input)
    }

    async fn save_session_result(
        &self,
        session_id: &str,
        name: &str,
        result: &AnalysisResult,
    ) -> Result<SessionResult, HeartCheckServiceError> {
        self.storage_check()?;

        let session = SessionResult {
            session_id: session_id.to_string(),
            name: name.to_string(),
            result: result.clone(),
            created_at: Utc::now(),
        };

        let mut sessions = self.sessions.write()
            .map_err(|e| HeartCheckServiceError::Storage(e.to_string()))?;
        sessions.insert(session_id.to_string(), session.clone());
        Ok(session)
    }

    async fn get_session_result(&self, session_id: &str) -> Result<SessionResult, HeartCheckServiceError> {
        self.storage_check()?;

        let sessions = self.sessions.read()
            .map_err(|e| HeartCheckServiceError::Storage(e.to_string()))?;
        sessions.get(session_id)
            .cloned()
            .ok_or_else(|| HeartCheckServiceError::NotFound(session_id.to_string()))
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), HeartCheckServiceError> {
        self.storage_check()?;

        let mut sessions = self.sessions.write()
            .map_err(|e| HeartCheckServiceError::Storage(e.to_string()))?;
        sessions.remove(session_id);
        Ok(())
    }

    async fn prune_sessions(&self, max_age: std::time::Duration) -> Result<usize, HeartCheckServiceError> {
        self.storage_check()?;
        let cutoff = retention_cutoff(max_age)?;

        let mut sessions = self.sessions.write()
            .map_err(|e| HeartCheckServiceError::Storage(e.to_string()))?;
        let before = sessions.len();
        sessions.retain(|_, session| session.created_at >= cutoff);
        Ok(before - sessions.len())
    }
}

/// Mock implementation of the HealthServiceTrait with a fixed answer
#[derive(Debug)]
pub struct MockHealthService {
    status: SystemStatus,
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a mock reporting every component healthy
    pub fn new() -> Self {
        let mut components = HashMap::new();
        for name in ["database", "scorer"] {
            components.insert(
                name.to_string(),
                HealthComponent {
                    status: ComponentStatus::Healthy,
                    details: None,
                },
            );
        }

        Self {
            status: SystemStatus::Healthy,
            components,
        }
    }

    /// Override one component and recompute the overall status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components.insert(name.to_string(), HealthComponent { status, details });
        self.status = crate::health::overall_status(&self.components);
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        SystemHealth {
            status: self.status.clone(),
            components: self.components.clone(),
        }
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        match self.components.get("database").map(|c| &c.status) {
            Some(ComponentStatus::Unhealthy) => Err("Database connection failed".to_string()),
            Some(ComponentStatus::Degraded) => Ok(false),
            _ => Ok(true),
        }
    }
}
