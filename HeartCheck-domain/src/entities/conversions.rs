use chrono::{DateTime, Utc};

use crate::entities::heart_health::{AnalysisResult, SessionResult};
use heart_check_data::models::session::SessionRecord;

// Conversion functions between domain entities and data models.
// These follow the pattern convert_to_[target_layer]_[model_name].

/// Serialize an analysis for storage
pub fn convert_to_data_result_json(result: &AnalysisResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Convert a stored session record back into a domain entity
pub fn convert_to_domain_session_result(record: SessionRecord) -> Result<SessionResult, serde_json::Error> {
    let result: AnalysisResult = serde_json::from_str(&record.result_json)?;

    // A malformed timestamp should not make the stored analysis unreadable
    let created_at = DateTime::parse_from_rfc3339(&record.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(SessionResult {
        session_id: record.session_id,
        name: record.name,
        result,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::heart_health::{ExerciseLevel, Gender, HealthInput};
    use crate::services::scoring::evaluate;

    fn sample_result() -> AnalysisResult {
        evaluate(&HealthInput {
            age: 50,
            gender: Gender::Male,
            systolic_bp: 135,
            diastolic_bp: 85,
            heart_rate: 95,
            cholesterol: 210,
            smoker: true,
            exercise_level: ExerciseLevel::None,
        })
    }

    #[test]
    fn test_session_record_conversion() {
        let result = sample_result();
        let record = SessionRecord {
            session_id: "abc".to_string(),
            name: "Alice".to_string(),
            result_json: convert_to_data_result_json(&result).unwrap(),
            created_at: "2024-05-01T08:30:00+00:00".to_string(),
        };

        let session = convert_to_domain_session_result(record).unwrap();
        assert_eq!(session.session_id, "abc");
        assert_eq!(session.name, "Alice");
        assert_eq!(session.result, result);
        assert_eq!(session.created_at.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[test]
    fn test_corrupt_result_json_is_an_error() {
        let record = SessionRecord {
            session_id: "abc".to_string(),
            name: "Alice".to_string(),
            result_json: "not json".to_string(),
            created_at: "2024-05-01T08:30:00Z".to_string(),
        };
        assert!(convert_to_domain_session_result(record).is_err());
    }
}
