// Domain entities and value objects
pub mod heart_health;
pub mod conversions;

// Re-export common types for easier imports
pub use heart_health::{
    AnalysisResult, BloodPressureCategory, CategoryResult, CholesterolCategory, ExerciseLevel, Gender,
    HealthInput, HealthStatus, HealthStatusLevel, HeartRateCategory, LifestyleResult, SessionResult,
};
