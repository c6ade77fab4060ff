use log::info;

use crate::session::report::SessionReport;

/// Rendering collaborator. The core never draws anything itself; everything
/// user-visible goes through this seam.
pub trait Presenter: Send {
    /// Free-form status line: lesson prompts, assistance text, errors.
    fn show_status(&mut self, text: &str);

    /// Rolling score for the current lesson: correct samples over samples held.
    fn show_progress(&mut self, correct: usize, total: usize);

    fn on_lesson_passed(&mut self, lesson_id: &str);

    /// Curriculum finished; the report is the session's full outcome record.
    fn on_session_finished(&mut self, report: &SessionReport);
}

/// Presenter that writes everything to the log. Stands in for the real
/// rendering layer when running headless.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl LogPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for LogPresenter {
    fn show_status(&mut self, text: &str) {
        info!("status: {text}");
    }

    fn show_progress(&mut self, correct: usize, total: usize) {
        let pct = if total > 0 {
            correct as f32 / total as f32 * 100.0
        } else {
            0.0
        };
        info!("progress: {correct}/{total} correct ({pct:.1} percent)");
    }

    fn on_lesson_passed(&mut self, lesson_id: &str) {
        info!("lesson passed: {lesson_id}");
    }

    fn on_session_finished(&mut self, report: &SessionReport) {
        info!(
            "session {} finished: {}/{} lessons completed",
            report.session_id, report.lessons_completed, report.lessons_total
        );
    }
}
