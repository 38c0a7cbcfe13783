use axum::{response::IntoResponse, Json};
use tracing::{debug, instrument};

use crate::entities::heart_check::{TipCategory, TipsResponse};

const TIPS: &[(&str, &[&str])] = &[
    (
        "Diet",
        &[
            "Eat plenty of fruits, vegetables and whole grains",
            "Limit saturated fats, trans fats and red meat",
            "Keep sodium under 2,300 mg a day",
            "Choose fish, poultry, beans and nuts for protein",
        ],
    ),
    (
        "Exercise",
        &[
            "Aim for at least 150 minutes of moderate exercise per week",
            "Add muscle-strengthening activity on two or more days a week",
            "Break up long periods of sitting",
        ],
    ),
    (
        "Lifestyle",
        &[
            "Don't smoke, and avoid second-hand smoke",
            "Limit alcohol",
            "Sleep seven to nine hours a night",
            "Manage stress with relaxation techniques",
            "Keep a healthy weight",
        ],
    ),
    (
        "Monitoring",
        &[
            "Check your blood pressure regularly",
            "Have your cholesterol tested at least every four to six years",
            "Know your resting heart rate",
            "See your doctor for regular checkups",
        ],
    ),
    (
        "Warning signs",
        &[
            "Chest pain or discomfort",
            "Shortness of breath",
            "Pain in the arm, neck, jaw or back",
            "Sudden dizziness or fainting",
            "Call emergency services if you notice these symptoms",
        ],
    ),
];

/// Build the full list of heart-health tips
pub fn all_tips() -> TipsResponse {
    TipsResponse {
        categories: TIPS
            .iter()
            .map(|(title, tips)| TipCategory {
                title: title.to_string(),
                tips: tips.iter().map(|tip| tip.to_string()).collect(),
            })
            .collect(),
    }
}

/// General heart-health tips
#[utoipa::path(
    get,
    path = "/api/v1/tips",
    responses(
        (status = 200, description = "Heart-health tips", body = TipsResponse)
    ),
    tag = "heart_check"
)]
#[instrument]
pub async fn get_tips() -> impl IntoResponse {
    debug!("Tips requested");
    Json(all_tips())
}
