pub mod channel;
pub mod receiver;
pub mod results;

pub use channel::{ConnError, FrameChannel, SendError};
pub use receiver::receive_loop;
pub use results::{Observation, ResultStore, ResultsSnapshot};
