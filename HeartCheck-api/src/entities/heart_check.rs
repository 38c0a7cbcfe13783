use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use heart_check_domain::entities::{AnalysisResult, ExerciseLevel, Gender, HealthInput};

/// Display name used when the caller does not give one
pub const DEFAULT_NAME: &str = "User";

/// A form field that could not be turned into a number
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid input: {field} must be a whole number, got '{value}'")]
pub struct FormParseError {
    pub field: &'static str,
    pub value: String,
}

/// Heart check submitted as an HTML form would post it.
///
/// Every field is optional and arrives as text; missing fields take their
/// defaults and numbers are only checked for being whole numbers.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct HeartCheckForm {
    /// Display name (defaults to "User")
    pub name: Option<String>,
    /// Age in years
    pub age: Option<String>,
    /// "male", "female" or anything else for other
    pub gender: Option<String>,
    /// Systolic blood pressure in mmHg
    pub systolic_bp: Option<String>,
    /// Diastolic blood pressure in mmHg
    pub diastolic_bp: Option<String>,
    /// Resting heart rate in bpm
    pub heart_rate: Option<String>,
    /// Total cholesterol in mg/dL
    pub cholesterol: Option<String>,
    /// "yes" for smokers, anything else otherwise
    pub smoker: Option<String>,
    /// "none", "light", "moderate" or "active"
    pub exercise: Option<String>,
}

fn parse_int(field: &'static str, value: Option<&str>) -> Result<i32, FormParseError> {
    match value {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<i32>().map_err(|_| FormParseError {
            field,
            value: raw.to_string(),
        }),
    }
}

/// A form after parsing, ready to score
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHeartCheck {
    pub name: String,
    pub input: HealthInput,
    /// Exercise level exactly as submitted, echoed back in the result
    pub exercise: String,
}

impl HeartCheckForm {
    /// Convert the raw form into the display name and scorer input
    pub fn into_input(self) -> Result<ParsedHeartCheck, FormParseError> {
        let exercise = self.exercise.unwrap_or_else(|| "none".to_string());
        let input = HealthInput {
            age: parse_int("age", self.age.as_deref())?,
            gender: Gender::from_form_value(self.gender.as_deref().unwrap_or("other")),
            systolic_bp: parse_int("systolic_bp", self.systolic_bp.as_deref())?,
            diastolic_bp: parse_int("diastolic_bp", self.diastolic_bp.as_deref())?,
            heart_rate: parse_int("heart_rate", self.heart_rate.as_deref())?,
            cholesterol: parse_int("cholesterol", self.cholesterol.as_deref())?,
            smoker: self.smoker.as_deref() == Some("yes"),
            exercise_level: ExerciseLevel::from_form_value(&exercise),
        };

        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        Ok(ParsedHeartCheck { name, input, exercise })
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_gender() -> Gender {
    Gender::Other
}

fn default_exercise() -> ExerciseLevel {
    ExerciseLevel::None
}

/// Typed heart check request for JSON clients
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct HeartCheckRequest {
    /// Display name
    #[serde(default = "default_name")]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,

    /// Age in years
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,

    #[serde(default = "default_gender")]
    pub gender: Gender,

    /// Systolic blood pressure in mmHg
    #[validate(range(min = 0, max = 400, message = "Systolic pressure must be between 0 and 400 mmHg"))]
    pub systolic_bp: i32,

    /// Diastolic blood pressure in mmHg
    #[validate(range(min = 0, max = 300, message = "Diastolic pressure must be between 0 and 300 mmHg"))]
    pub diastolic_bp: i32,

    /// Resting heart rate in bpm
    #[validate(range(min = 0, max = 300, message = "Heart rate must be between 0 and 300 bpm"))]
    pub heart_rate: i32,

    /// Total cholesterol in mg/dL
    #[validate(range(min = 0, max = 1000, message = "Cholesterol must be between 0 and 1000 mg/dL"))]
    pub cholesterol: i32,

    #[serde(default)]
    pub smoker: bool,

    #[serde(default = "default_exercise")]
    pub exercise_level: ExerciseLevel,
}

impl HeartCheckRequest {
    pub fn to_input(&self) -> HealthInput {
        HealthInput {
            age: self.age,
            gender: self.gender,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            heart_rate: self.heart_rate,
            cholesterol: self.cholesterol,
            smoker: self.smoker,
            exercise_level: self.exercise_level,
        }
    }
}

/// Result of a heart check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    /// Display name the check was run for
    pub name: String,
    /// Session the result was stored under
    pub session_id: String,
    /// Whether the result was stored for later retrieval
    pub stored: bool,
    pub result: AnalysisResult,
}

/// Stored result for the caller's session
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResultResponse {
    pub session_id: String,
    pub name: String,
    pub result: AnalysisResult,
    /// RFC 3339 timestamp of when the result was stored
    pub created_at: String,
}

/// A titled group of heart-health tips
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TipCategory {
    pub title: String,
    pub tips: Vec<String>,
}

/// All heart-health tips
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TipsResponse {
    pub categories: Vec<TipCategory>,
}
