use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one lesson within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonOutcome {
    pub lesson_id: String,
    pub display_name: String,
    pub completed_at: DateTime<Utc>,
    pub help_requested: bool,
}

/// End-of-session summary handed to the Presenter when the curriculum
/// finishes. Owned by the session controller; nothing here lives in
/// process-global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub lessons_completed: usize,
    pub lessons_total: usize,
    pub outcomes: Vec<LessonOutcome>,
}
