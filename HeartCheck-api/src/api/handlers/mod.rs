pub mod health;
pub mod heart_check;
pub mod tips;

// Re-export handlers for easier imports
pub use heart_check::{analyze_form, analyze_json, get_session_result, reset_session};
pub use health::health_check;
pub use tips::get_tips;
