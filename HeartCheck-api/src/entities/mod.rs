// Public entities for the HeartCheck API
// This module contains data structures that are shared across the application boundary

// Heart check requests and responses
pub mod heart_check;

// Common entities for error handling
pub mod common;
