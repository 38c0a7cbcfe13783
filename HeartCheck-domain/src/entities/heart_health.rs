use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Gender as submitted with a heart check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Parse a form value. Anything other than `male` or `female` is `Other`.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

/// Self-reported exercise level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExerciseLevel {
    None,
    Light,
    Moderate,
    Active,
}

impl ExerciseLevel {
    /// Parse a form value. Unrecognised levels score like `Active`.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "none" => ExerciseLevel::None,
            "light" => ExerciseLevel::Light,
            "moderate" => ExerciseLevel::Moderate,
            _ => ExerciseLevel::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseLevel::None => "none",
            ExerciseLevel::Light => "light",
            ExerciseLevel::Moderate => "moderate",
            ExerciseLevel::Active => "active",
        }
    }
}

/// Vital signs and lifestyle answers for a single evaluation.
///
/// Values are assumed to have been validated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthInput {
    /// Age in years
    pub age: i32,

    pub gender: Gender,

    /// Systolic blood pressure in mmHg
    pub systolic_bp: i32,

    /// Diastolic blood pressure in mmHg
    pub diastolic_bp: i32,

    /// Resting heart rate in beats per minute
    pub heart_rate: i32,

    /// Total cholesterol in mg/dL
    pub cholesterol: i32,

    pub smoker: bool,

    pub exercise_level: ExerciseLevel,
}

/// Blood pressure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureCategory {
    Normal,
    Elevated,
    Stage1,
    Stage2,
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Stage1 => "High Blood Pressure (Stage 1)",
            BloodPressureCategory::Stage2 => "High Blood Pressure (Stage 2)",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive Crisis",
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            BloodPressureCategory::Normal => 0,
            BloodPressureCategory::Elevated => 1,
            BloodPressureCategory::Stage1 => 2,
            BloodPressureCategory::Stage2 => 3,
            BloodPressureCategory::HypertensiveCrisis => 4,
        }
    }
}

/// Heart rate classification relative to the age-dependent normal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum HeartRateCategory {
    Normal,
    Bradycardia,
    Tachycardia,
}

impl HeartRateCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HeartRateCategory::Normal => "Normal",
            HeartRateCategory::Bradycardia => "Low (Bradycardia)",
            HeartRateCategory::Tachycardia => "High (Tachycardia)",
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            HeartRateCategory::Normal => 0,
            HeartRateCategory::Bradycardia => 1,
            HeartRateCategory::Tachycardia => 2,
        }
    }
}

/// Total cholesterol classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum CholesterolCategory {
    Desirable,
    BorderlineHigh,
    High,
}

impl CholesterolCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CholesterolCategory::Desirable => "Desirable",
            CholesterolCategory::BorderlineHigh => "Borderline High",
            CholesterolCategory::High => "High",
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            CholesterolCategory::Desirable => 0,
            CholesterolCategory::BorderlineHigh => 1,
            CholesterolCategory::High => 2,
        }
    }
}

/// Label and score for one measured category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CategoryResult {
    /// Human readable classification, e.g. "Borderline High"
    pub status: String,

    /// The measured value with its unit, e.g. "210 mg/dL"
    pub value: String,

    /// Contribution to the total score
    pub score: u32,
}

/// Lifestyle portion of an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LifestyleResult {
    pub smoker: bool,
    /// Exercise level as submitted, e.g. "moderate"
    pub exercise: String,
    /// Lifestyle risk score, never negative
    pub score: u32,
}

/// Overall status band derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum HealthStatusLevel {
    Excellent,
    Good,
    Fair,
    AtRisk,
    HighRisk,
}

impl HealthStatusLevel {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatusLevel::Excellent => "Excellent",
            HealthStatusLevel::Good => "Good",
            HealthStatusLevel::Fair => "Fair",
            HealthStatusLevel::AtRisk => "At Risk",
            HealthStatusLevel::HighRisk => "High Risk",
        }
    }

    /// Severity colour tag used by the presentation layer
    pub fn color(&self) -> &'static str {
        match self {
            HealthStatusLevel::Excellent => "green",
            HealthStatusLevel::Good => "lightgreen",
            HealthStatusLevel::Fair => "orange",
            HealthStatusLevel::AtRisk => "darkorange",
            HealthStatusLevel::HighRisk => "red",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            HealthStatusLevel::Excellent => "Your heart health appears to be in great shape! Keep up the good work.",
            HealthStatusLevel::Good => "Your heart health is generally good, but there's room for improvement.",
            HealthStatusLevel::Fair => "Your heart health needs attention. Consider lifestyle changes.",
            HealthStatusLevel::AtRisk => "You have several risk factors. Please consult a healthcare provider.",
            HealthStatusLevel::HighRisk => "You have significant risk factors. Seek medical attention soon.",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            HealthStatusLevel::Excellent => "💚",
            HealthStatusLevel::Good => "✅",
            HealthStatusLevel::Fair | HealthStatusLevel::AtRisk => "⚠️",
            HealthStatusLevel::HighRisk => "🚨",
        }
    }
}

/// Status band with its display attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthStatus {
    pub level: HealthStatusLevel,
    pub status: String,
    pub color: String,
    pub message: String,
    pub emoji: String,
}

impl From<HealthStatusLevel> for HealthStatus {
    fn from(level: HealthStatusLevel) -> Self {
        Self {
            level,
            status: level.label().to_string(),
            color: level.color().to_string(),
            message: level.message().to_string(),
            emoji: level.emoji().to_string(),
        }
    }
}

/// Complete result of one heart health evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AnalysisResult {
    /// Sum of the blood pressure, heart rate, cholesterol and lifestyle scores
    pub total_score: u32,
    pub health_status: HealthStatus,
    pub blood_pressure: CategoryResult,
    pub heart_rate: CategoryResult,
    pub cholesterol: CategoryResult,
    pub lifestyle: LifestyleResult,
    /// Ordered recommendations, never empty
    pub recommendations: Vec<String>,
}

/// The latest analysis stored for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SessionResult {
    pub session_id: String,
    pub name: String,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}
