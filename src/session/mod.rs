pub mod controller;
pub mod report;

pub use controller::SessionController;
pub use report::{LessonOutcome, SessionReport};
