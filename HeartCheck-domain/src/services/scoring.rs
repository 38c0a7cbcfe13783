//! Rule-based heart health scoring.
//!
//! Every function here is pure: the same input always produces the same
//! output and nothing is read from or written to shared state.

use crate::entities::heart_health::{
    AnalysisResult, BloodPressureCategory, CategoryResult, CholesterolCategory, ExerciseLevel, Gender,
    HealthInput, HealthStatus, HealthStatusLevel, HeartRateCategory, LifestyleResult,
};

/// Classify a blood pressure reading.
///
/// The arms are evaluated in order and the first match wins. Stage 1 and
/// Stage 2 use OR conditions, so a reading such as 190/85 lands in Stage 1
/// because the diastolic value alone satisfies that arm.
pub fn classify_blood_pressure(systolic: i32, diastolic: i32) -> BloodPressureCategory {
    match (systolic, diastolic) {
        (s, d) if s < 120 && d < 80 => BloodPressureCategory::Normal,
        (s, d) if s < 130 && d < 80 => BloodPressureCategory::Elevated,
        (s, d) if s < 140 || d < 90 => BloodPressureCategory::Stage1,
        (s, d) if s < 180 || d < 120 => BloodPressureCategory::Stage2,
        _ => BloodPressureCategory::HypertensiveCrisis,
    }
}

/// Inclusive normal heart rate range for an age.
///
/// Under-18s share the adult range.
pub fn normal_heart_rate_range(age: i32) -> (i32, i32) {
    if age < 60 {
        (60, 100)
    } else {
        (60, 90)
    }
}

/// Classify a resting heart rate against the age-dependent normal range
pub fn classify_heart_rate(heart_rate: i32, age: i32) -> HeartRateCategory {
    let (low, high) = normal_heart_rate_range(age);

    if heart_rate < low {
        HeartRateCategory::Bradycardia
    } else if heart_rate > high {
        HeartRateCategory::Tachycardia
    } else {
        HeartRateCategory::Normal
    }
}

/// Classify a total cholesterol level
pub fn classify_cholesterol(cholesterol: i32) -> CholesterolCategory {
    match cholesterol {
        c if c < 200 => CholesterolCategory::Desirable,
        c if c < 240 => CholesterolCategory::BorderlineHigh,
        _ => CholesterolCategory::High,
    }
}

/// Lifestyle risk score from age, gender, smoking and exercise, floored at 0
pub fn lifestyle_score(age: i32, gender: Gender, smoker: bool, exercise: ExerciseLevel) -> u32 {
    let mut score: i32 = 0;

    // Male and female age thresholds are exclusive of each other
    if age > 45 && gender == Gender::Male {
        score += 1;
    } else if age > 55 && gender == Gender::Female {
        score += 1;
    }

    if age > 65 {
        score += 1;
    }

    if smoker {
        score += 2;
    }

    score += match exercise {
        ExerciseLevel::None => 2,
        ExerciseLevel::Light => 1,
        ExerciseLevel::Moderate => 0,
        ExerciseLevel::Active => -1,
    };

    score.max(0) as u32
}

/// Map a total score to its status band
pub fn health_status_level(total_score: u32) -> HealthStatusLevel {
    match total_score {
        0..=2 => HealthStatusLevel::Excellent,
        3..=5 => HealthStatusLevel::Good,
        6..=8 => HealthStatusLevel::Fair,
        9..=12 => HealthStatusLevel::AtRisk,
        _ => HealthStatusLevel::HighRisk,
    }
}

/// Component scores that drive recommendation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub blood_pressure: u32,
    pub heart_rate: u32,
    pub cholesterol: u32,
    pub lifestyle: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.blood_pressure + self.heart_rate + self.cholesterol + self.lifestyle
    }
}

/// Build the ordered recommendation list.
///
/// Rules are independent and several may fire. When none fire the two
/// maintenance tips are returned instead.
pub fn recommendations(scores: &ScoreBreakdown, smoker: bool, exercise: ExerciseLevel) -> Vec<String> {
    let mut tips: Vec<&'static str> = Vec::new();

    if scores.blood_pressure > 1 {
        tips.push("Monitor your blood pressure regularly");
        tips.push("Reduce sodium intake in your diet");
    }

    if scores.heart_rate > 0 {
        tips.push("Discuss your heart rate with a doctor");
    }

    if scores.cholesterol > 0 {
        tips.push("Reduce saturated fats in your diet");
        tips.push("Increase fiber intake");
    }

    if smoker {
        tips.push("Consider a smoking cessation program");
    }

    if matches!(exercise, ExerciseLevel::None | ExerciseLevel::Light) {
        tips.push("Aim for at least 150 minutes of moderate exercise per week");
    }

    if scores.total() > 8 {
        tips.push("Schedule a comprehensive health checkup with your doctor");
    }

    if tips.is_empty() {
        tips.push("Maintain your current healthy lifestyle");
        tips.push("Continue regular health checkups");
    }

    tips.into_iter().map(String::from).collect()
}

/// Evaluate a complete set of inputs
pub fn evaluate(input: &HealthInput) -> AnalysisResult {
    let bp = classify_blood_pressure(input.systolic_bp, input.diastolic_bp);
    let hr = classify_heart_rate(input.heart_rate, input.age);
    let chol = classify_cholesterol(input.cholesterol);
    let lifestyle = lifestyle_score(input.age, input.gender, input.smoker, input.exercise_level);

    let scores = ScoreBreakdown {
        blood_pressure: bp.score(),
        heart_rate: hr.score(),
        cholesterol: chol.score(),
        lifestyle,
    };
    let total_score = scores.total();

    AnalysisResult {
        total_score,
        health_status: HealthStatus::from(health_status_level(total_score)),
        blood_pressure: CategoryResult {
            status: bp.label().to_string(),
            value: format!("{}/{} mmHg", input.systolic_bp, input.diastolic_bp),
            score: scores.blood_pressure,
        },
        heart_rate: CategoryResult {
            status: hr.label().to_string(),
            value: format!("{} bpm", input.heart_rate),
            score: scores.heart_rate,
        },
        cholesterol: CategoryResult {
            status: chol.label().to_string(),
            value: format!("{} mg/dL", input.cholesterol),
            score: scores.cholesterol,
        },
        lifestyle: LifestyleResult {
            smoker: input.smoker,
            exercise: input.exercise_level.as_str().to_string(),
            score: lifestyle,
        },
        recommendations: recommendations(&scores, input.smoker, input.exercise_level),
    }
}

/// Stateless scorer, for callers that want an object rather than free functions
#[derive(Debug, Clone, Copy, Default)]
pub struct HeartHealthScorer;

impl HeartHealthScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, input: &HealthInput) -> AnalysisResult {
        evaluate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_input() -> HealthInput {
        HealthInput {
            age: 50,
            gender: Gender::Male,
            systolic_bp: 135,
            diastolic_bp: 85,
            heart_rate: 95,
            cholesterol: 210,
            smoker: true,
            exercise_level: ExerciseLevel::None,
        }
    }

    fn healthy_input() -> HealthInput {
        HealthInput {
            age: 30,
            gender: Gender::Female,
            systolic_bp: 110,
            diastolic_bp: 70,
            heart_rate: 70,
            cholesterol: 180,
            smoker: false,
            exercise_level: ExerciseLevel::Active,
        }
    }

    #[test]
    fn test_bp_examples() {
        let category = classify_blood_pressure(118, 75);
        assert_eq!(category, BloodPressureCategory::Normal);
        assert_eq!((category.label(), category.score()), ("Normal", 0));

        let category = classify_blood_pressure(135, 85);
        assert_eq!((category.label(), category.score()), ("High Blood Pressure (Stage 1)", 2));

        let category = classify_blood_pressure(190, 125);
        assert_eq!((category.label(), category.score()), ("Hypertensive Crisis", 4));
    }

    #[test]
    fn test_bp_elevated() {
        assert_eq!(classify_blood_pressure(125, 75), BloodPressureCategory::Elevated);
        assert_eq!(classify_blood_pressure(120, 79), BloodPressureCategory::Elevated);
    }

    #[test]
    fn test_bp_or_arms_follow_evaluation_order() {
        // Diastolic alone satisfies the Stage 1 arm
        assert_eq!(classify_blood_pressure(190, 85), BloodPressureCategory::Stage1);
        // Systolic alone satisfies the Stage 1 arm
        assert_eq!(classify_blood_pressure(135, 110), BloodPressureCategory::Stage1);
        assert_eq!(classify_blood_pressure(150, 95), BloodPressureCategory::Stage2);
        assert_eq!(classify_blood_pressure(170, 125), BloodPressureCategory::Stage2);
        assert_eq!(classify_blood_pressure(185, 100), BloodPressureCategory::Stage2);
        assert_eq!(classify_blood_pressure(180, 120), BloodPressureCategory::HypertensiveCrisis);
    }

    #[test]
    fn test_bp_is_total_over_integer_grid() {
        for systolic in 0..=260 {
            for diastolic in 0..=160 {
                let category = classify_blood_pressure(systolic, diastolic);
                let expected = if systolic < 120 && diastolic < 80 {
                    0
                } else if systolic < 130 && diastolic < 80 {
                    1
                } else if systolic < 140 || diastolic < 90 {
                    2
                } else if systolic < 180 || diastolic < 120 {
                    3
                } else {
                    4
                };
                assert_eq!(category.score(), expected, "{}/{}", systolic, diastolic);
            }
        }
    }

    #[test]
    fn test_heart_rate_ranges() {
        assert_eq!(classify_heart_rate(95, 70), HeartRateCategory::Tachycardia);
        assert_eq!(classify_heart_rate(95, 50), HeartRateCategory::Normal);
        assert_eq!(classify_heart_rate(90, 60), HeartRateCategory::Normal);
        assert_eq!(classify_heart_rate(91, 60), HeartRateCategory::Tachycardia);
        assert_eq!(classify_heart_rate(60, 70), HeartRateCategory::Normal);
        assert_eq!(classify_heart_rate(59, 70), HeartRateCategory::Bradycardia);
        assert_eq!(classify_heart_rate(59, 30), HeartRateCategory::Bradycardia);
        assert_eq!(classify_heart_rate(100, 59), HeartRateCategory::Normal);
        assert_eq!(classify_heart_rate(101, 59), HeartRateCategory::Tachycardia);
    }

    #[test]
    fn test_heart_rate_minors_use_adult_range() {
        assert_eq!(normal_heart_rate_range(10), normal_heart_rate_range(40));
        assert_eq!(classify_heart_rate(100, 12), HeartRateCategory::Normal);
        assert_eq!(HeartRateCategory::Tachycardia.label(), "High (Tachycardia)");
    }

    #[test]
    fn test_cholesterol_boundaries() {
        assert_eq!(classify_cholesterol(199), CholesterolCategory::Desirable);
        assert_eq!(classify_cholesterol(200), CholesterolCategory::BorderlineHigh);
        assert_eq!(classify_cholesterol(239), CholesterolCategory::BorderlineHigh);
        assert_eq!(classify_cholesterol(240), CholesterolCategory::High);
    }

    #[test]
    fn test_lifestyle_example() {
        assert_eq!(lifestyle_score(50, Gender::Male, true, ExerciseLevel::None), 5);
    }

    #[test]
    fn test_lifestyle_gender_thresholds() {
        assert_eq!(lifestyle_score(50, Gender::Female, false, ExerciseLevel::Moderate), 0);
        assert_eq!(lifestyle_score(56, Gender::Female, false, ExerciseLevel::Moderate), 1);
        assert_eq!(lifestyle_score(46, Gender::Male, false, ExerciseLevel::Moderate), 1);
        assert_eq!(lifestyle_score(80, Gender::Other, false, ExerciseLevel::Moderate), 1);
        // Over 65 stacks with the gender threshold
        assert_eq!(lifestyle_score(70, Gender::Male, false, ExerciseLevel::Moderate), 2);
    }

    #[test]
    fn test_lifestyle_is_floored_at_zero() {
        assert_eq!(lifestyle_score(20, Gender::Other, false, ExerciseLevel::Active), 0);
        assert_eq!(lifestyle_score(50, Gender::Male, false, ExerciseLevel::Active), 0);
        assert_eq!(lifestyle_score(70, Gender::Male, false, ExerciseLevel::Active), 1);
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(health_status_level(0), HealthStatusLevel::Excellent);
        assert_eq!(health_status_level(2), HealthStatusLevel::Excellent);
        assert_eq!(health_status_level(3), HealthStatusLevel::Good);
        assert_eq!(health_status_level(5), HealthStatusLevel::Good);
        assert_eq!(health_status_level(8), HealthStatusLevel::Fair);
        assert_eq!(health_status_level(9), HealthStatusLevel::AtRisk);
        assert_eq!(health_status_level(12), HealthStatusLevel::AtRisk);
        assert_eq!(health_status_level(13), HealthStatusLevel::HighRisk);
    }

    #[test]
    fn test_full_example() {
        let result = evaluate(&example_input());

        assert_eq!(result.blood_pressure.score, 2);
        assert_eq!(result.heart_rate.score, 0);
        assert_eq!(result.cholesterol.score, 1);
        assert_eq!(result.lifestyle.score, 5);
        assert_eq!(result.total_score, 8);
        assert_eq!(result.health_status.status, "Fair");
        assert_eq!(result.health_status.color, "orange");
        assert_eq!(result.blood_pressure.value, "135/85 mmHg");
        assert_eq!(result.heart_rate.value, "95 bpm");
        assert_eq!(result.cholesterol.value, "210 mg/dL");

        assert_eq!(
            result.recommendations,
            vec![
                "Monitor your blood pressure regularly",
                "Reduce sodium intake in your diet",
                "Reduce saturated fats in your diet",
                "Increase fiber intake",
                "Consider a smoking cessation program",
                "Aim for at least 150 minutes of moderate exercise per week",
            ]
        );
    }

    #[test]
    fn test_default_recommendations_when_no_rule_fires() {
        let result = evaluate(&healthy_input());
        assert_eq!(result.total_score, 0);
        assert_eq!(result.health_status.status, "Excellent");
        assert_eq!(
            result.recommendations,
            vec!["Maintain your current healthy lifestyle", "Continue regular health checkups"]
        );
    }

    #[test]
    fn test_checkup_recommendation_above_eight() {
        let input = HealthInput {
            heart_rate: 120,
            ..example_input()
        };
        let result = evaluate(&input);
        assert_eq!(result.total_score, 10);
        assert_eq!(result.health_status.status, "At Risk");
        assert_eq!(result.recommendations.first().map(String::as_str), Some("Monitor your blood pressure regularly"));
        assert!(result.recommendations.contains(&"Discuss your heart rate with a doctor".to_string()));
        assert_eq!(
            result.recommendations.last().map(String::as_str),
            Some("Schedule a comprehensive health checkup with your doctor")
        );
    }

    #[test]
    fn test_elevated_bp_does_not_trigger_bp_tips() {
        let input = HealthInput {
            systolic_bp: 125,
            diastolic_bp: 75,
            ..healthy_input()
        };
        let result = evaluate(&input);
        assert_eq!(result.blood_pressure.score, 1);
        assert!(!result.recommendations.iter().any(|tip| tip.contains("sodium")));
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let genders = [Gender::Male, Gender::Female, Gender::Other];
        let levels = [ExerciseLevel::None, ExerciseLevel::Light, ExerciseLevel::Moderate, ExerciseLevel::Active];

        for age in [0, 17, 46, 56, 66, 90] {
            for gender in genders {
                for exercise_level in levels {
                    for smoker in [false, true] {
                        for (systolic_bp, diastolic_bp) in [(110, 70), (125, 75), (135, 85), (150, 95), (200, 130)] {
                            for heart_rate in [40, 75, 95, 130] {
                                for cholesterol in [150, 220, 300] {
                                    let input = HealthInput {
                                        age,
                                        gender,
                                        systolic_bp,
                                        diastolic_bp,
                                        heart_rate,
                                        cholesterol,
                                        smoker,
                                        exercise_level,
                                    };
                                    let result = evaluate(&input);
                                    assert_eq!(
                                        result.total_score,
                                        result.blood_pressure.score
                                            + result.heart_rate.score
                                            + result.cholesterol.score
                                            + result.lifestyle.score
                                    );
                                    assert!(!result.recommendations.is_empty());
                                    assert_eq!(result.health_status.level, health_status_level(result.total_score));
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let scorer = HeartHealthScorer::new();
        let input = example_input();
        assert_eq!(scorer.evaluate(&input), scorer.evaluate(&input));
        assert_eq!(
            serde_json::to_string(&scorer.evaluate(&input)).unwrap(),
            serde_json::to_string(&evaluate(&input)).unwrap()
        );
    }
}
