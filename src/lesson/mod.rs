pub mod engine;
pub mod types;
pub mod window;

pub use engine::{LessonEngine, LessonPhase, NO_DETECTION_LABEL};
pub use types::{build_lessons, Lesson};
pub use window::AccuracyWindow;
