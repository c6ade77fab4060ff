pub mod assist;
pub mod config;
pub mod lesson;
pub mod net;
pub mod presenter;
pub mod protocol;
pub mod session;
pub mod source;

pub use assist::AssistThrottle;
pub use config::TrainerConfig;
pub use presenter::{LogPresenter, Presenter};
pub use session::{SessionController, SessionReport};
pub use source::{FileFrameSource, FrameSource};
