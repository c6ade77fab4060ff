use std::time::{Duration, Instant};

use chrono::Utc;
use log::info;

use crate::assist::AssistThrottle;
use crate::config::TrainerConfig;
use crate::lesson::types::Lesson;
use crate::lesson::window::AccuracyWindow;
use crate::net::ResultsSnapshot;
use crate::presenter::Presenter;
use crate::session::report::LessonOutcome;

/// Label the server sends when nothing was detected in the frame.
pub const NO_DETECTION_LABEL: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonPhase {
    Loading,
    Active,
    Completed,
    Finished,
}

/// Per-session lesson state machine.
///
/// Driven once per sender tick with a snapshot of the latest server results.
/// Scores one sample per newly observed classification, accumulates continuous
/// confusion time, requests help at most once per lesson, and advances after
/// the configured success hold.
pub struct LessonEngine {
    lessons: Vec<Lesson>,
    min_confidence: f32,
    required_accuracy: f32,
    min_samples_to_evaluate: usize,
    confusion_threshold: Duration,
    success_hold: Duration,

    phase: LessonPhase,
    current: usize,
    window: AccuracyWindow,
    confused_for: Duration,
    help_requested: bool,
    completed_at: Option<Instant>,
    last_tick: Option<Instant>,
    last_scored_seq: u64,
    outcomes: Vec<LessonOutcome>,
}

impl LessonEngine {
    pub fn new(lessons: Vec<Lesson>, config: &TrainerConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            required_accuracy: config.required_accuracy,
            min_samples_to_evaluate: config.min_samples_to_evaluate,
            confusion_threshold: config.confusion_threshold(),
            success_hold: config.success_hold(),
            phase: LessonPhase::Loading,
            current: 0,
            window: AccuracyWindow::new(config.window_size),
            confused_for: Duration::ZERO,
            help_requested: false,
            completed_at: None,
            last_tick: None,
            last_scored_seq: 0,
            outcomes: Vec::new(),
            lessons,
        }
    }

    pub fn phase(&self) -> LessonPhase {
        self.phase
    }

    pub fn finished(&self) -> bool {
        self.phase == LessonPhase::Finished
    }

    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.lessons.get(self.current)
    }

    pub fn lessons_total(&self) -> usize {
        self.lessons.len()
    }

    pub fn outcomes(&self) -> &[LessonOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<LessonOutcome> {
        self.outcomes
    }

    /// Load the first lesson. Loading resets per-lesson state and moves
    /// straight to Active.
    pub fn start(&mut self, presenter: &mut dyn Presenter) {
        self.load_current(presenter);
    }

    fn load_current(&mut self, presenter: &mut dyn Presenter) {
        self.window.reset();
        self.confused_for = Duration::ZERO;
        self.help_requested = false;
        self.completed_at = None;
        self.phase = LessonPhase::Active;

        let lesson = &self.lessons[self.current];
        info!(
            "loaded lesson {} of {} ({})",
            self.current + 1,
            self.lessons.len(),
            lesson.display_name
        );
        presenter.show_status(&format!("Try to copy this sign: {}", lesson.display_name));
        presenter.show_progress(0, 0);
    }

    /// One evaluation tick. `now` comes from the sender's schedule; elapsed
    /// time since the previous tick feeds the confusion timer.
    pub fn tick(
        &mut self,
        now: Instant,
        snapshot: &ResultsSnapshot,
        throttle: &AssistThrottle,
        presenter: &mut dyn Presenter,
    ) {
        let elapsed = match self.last_tick.replace(now) {
            Some(previous) => now.saturating_duration_since(previous),
            None => Duration::ZERO,
        };

        match self.phase {
            LessonPhase::Finished => {}
            LessonPhase::Completed => self.tick_completed(now, presenter),
            LessonPhase::Loading | LessonPhase::Active => {
                self.tick_active(now, elapsed, snapshot, throttle, presenter)
            }
        }
    }

    fn tick_completed(&mut self, now: Instant, presenter: &mut dyn Presenter) {
        let held_since = match self.completed_at {
            Some(at) => at,
            None => return,
        };
        if now.saturating_duration_since(held_since) < self.success_hold {
            return;
        }

        // currentLessonIndex only ever moves forward
        self.current += 1;
        if self.current >= self.lessons.len() {
            self.phase = LessonPhase::Finished;
            info!("all {} lessons completed", self.lessons.len());
            presenter.show_status("You finished all signs. Nice work.");
        } else {
            self.load_current(presenter);
        }
    }

    fn tick_active(
        &mut self,
        now: Instant,
        elapsed: Duration,
        snapshot: &ResultsSnapshot,
        throttle: &AssistThrottle,
        presenter: &mut dyn Presenter,
    ) {
        // Confusion accumulates on wall time whether or not a detection
        // arrived this tick; any unconfused tick resets it.
        if snapshot.confused {
            self.confused_for += elapsed;
        } else {
            self.confused_for = Duration::ZERO;
        }

        // Score only against a classification we have not scored yet.
        let observation = match &snapshot.observation {
            Some(observation) if observation.seq != self.last_scored_seq => observation,
            _ => return,
        };
        self.last_scored_seq = observation.seq;

        if observation.label.is_empty() || observation.label == NO_DETECTION_LABEL {
            return;
        }

        let lesson = &self.lessons[self.current];
        let is_correct = observation.label == lesson.expected_label
            && observation.confidence >= self.min_confidence;

        self.window.push(is_correct);
        presenter.show_progress(self.window.correct_count(), self.window.len());

        if !is_correct && self.confused_for >= self.confusion_threshold && !self.help_requested {
            self.help_requested = true;
            throttle.request_help(lesson.id.clone());
            info!("requested help for sign {}", lesson.id);
            presenter.show_status("This one looks tricky. Let me help you a bit more.");
        }

        if self.window.len() >= self.min_samples_to_evaluate
            && self.window.accuracy() >= self.required_accuracy
        {
            self.phase = LessonPhase::Completed;
            self.completed_at = Some(now);
            self.outcomes.push(LessonOutcome {
                lesson_id: lesson.id.clone(),
                display_name: lesson.display_name.clone(),
                completed_at: Utc::now(),
                help_requested: self.help_requested,
            });
            info!(
                "lesson passed: {} (accuracy {:.2}, samples {})",
                lesson.display_name,
                self.window.accuracy(),
                self.window.len()
            );
            presenter.on_lesson_passed(&lesson.id);
            presenter.show_status(&format!(
                "Nice job. Your sign for {} looks good.",
                lesson.display_name
            ));
        }
    }
}
