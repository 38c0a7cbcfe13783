use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use async_trait::async_trait;

use crate::entities::heart_health::{AnalysisResult, HealthInput, SessionResult};
use crate::entities::conversions;
use crate::services::scoring;
use heart_check_data::repository::{RepositoryError, SessionRepositoryTrait};

/// Heart check service errors
#[derive(Debug, Error)]
pub enum HeartCheckServiceError {
    /// No result stored for the session
    #[error("Session not found: {0}")]
    NotFound(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored result could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Retention window cannot be expressed as a cutoff
    #[error("Invalid retention window: {0}")]
    InvalidRetention(String),
}

/// Trait for heart check service operations
#[async_trait]
pub trait HeartCheckServiceTrait {
    /// Score a set of inputs. Never fails.
    fn analyze(&self, input: &HealthInput) -> AnalysisResult;

    /// Store the latest result for a session
    async fn save_session_result(
        &self,
        session_id: &str,
        name: &str,
        result: &AnalysisResult,
    ) -> Result<SessionResult, HeartCheckServiceError>;

    /// Get the latest result stored for a session
    async fn get_session_result(&self, session_id: &str) -> Result<SessionResult, HeartCheckServiceError>;

    /// Forget everything stored for a session. Clearing an empty session succeeds.
    async fn clear_session(&self, session_id: &str) -> Result<(), HeartCheckServiceError>;

    /// Drop every stored result older than `max_age`, returning how many went
    async fn prune_sessions(&self, max_age: Duration) -> Result<usize, HeartCheckServiceError>;
}

/// Oldest creation time a result may have and still be kept
pub fn retention_cutoff(max_age: Duration) -> Result<chrono::DateTime<Utc>, HeartCheckServiceError> {
    let max_age = chrono::Duration::from_std(max_age)
        .map_err(|e| HeartCheckServiceError::InvalidRetention(e.to_string()))?;
    Utc::now()
        .checked_sub_signed(max_age)
        .ok_or_else(|| HeartCheckServiceError::InvalidRetention(format!("{} is too long", max_age)))
}

/// Heart check service backed by a session repository
pub struct HeartCheckService<R: SessionRepositoryTrait> {
    repository: R,
}

impl<R: SessionRepositoryTrait> HeartCheckService<R> {
    /// Create a new heart check service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> HeartCheckServiceError {
        match err {
            RepositoryError::Serialization(e) => HeartCheckServiceError::Serialization(e.to_string()),
            _ => HeartCheckServiceError::Storage(err.to_string()),
        }
    }
}

#[async_trait]
impl<R: SessionRepositoryTrait + Send + Sync> HeartCheckServiceTrait for HeartCheckService<R> {
    fn analyze(&self, input: &HealthInput) -> AnalysisResult {
        let result = scoring::evaluate(input);
        debug!(
            total_score = result.total_score,
            status = %result.health_status.status,
            "Heart health evaluated"
        );
        result
    }

    async fn save_session_result(
        &self,
        session_id: &str,
        name: &str,
        result: &AnalysisResult,
    ) -> Result<SessionResult, HeartCheckServiceError> {
        let result_json = conversions::convert_to_data_result_json(result)
            .map_err(|e| HeartCheckServiceError::Serialization(e.to_string()))?;

        let record = self.repository.save(session_id, name, result_json)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Stored heart check result for session {}", session_id);

        conversions::convert_to_domain_session_result(record)
            .map_err(|e| HeartCheckServiceError::Serialization(e.to_string()))
    }

    async fn get_session_result(&self, session_id: &str) -> Result<SessionResult, HeartCheckServiceError> {
        let record = self.repository.get(session_id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| HeartCheckServiceError::NotFound(
                format!("No heart check result stored for session {}", session_id)
            ))?;

        conversions::convert_to_domain_session_result(record)
            .map_err(|e| HeartCheckServiceError::Serialization(e.to_string()))
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), HeartCheckServiceError> {
        let removed = self.repository.delete(session_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        debug!("Cleared session {} (had result: {})", session_id, removed);
        Ok(())
    }

    async fn prune_sessions(&self, max_age: Duration) -> Result<usize, HeartCheckServiceError> {
        let cutoff = retention_cutoff(max_age)?;
        let removed = self.repository.prune_older_than(cutoff)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        if removed > 0 {
            info!("Pruned {} sessions stored before {}", removed, cutoff);
        }
        Ok(removed)
    }
}

/// Create a default heart check service using the repository from data layer
pub fn create_default_heart_check_service() -> impl HeartCheckServiceTrait + Send + Sync {
    let repository = heart_check_data::repository::SessionRepository::new();
    HeartCheckService::new(repository)
}
