pub mod frame;
pub mod lines;
pub mod message;

pub use frame::{FrameMode, OutboundFrame};
pub use lines::LineAssembler;
pub use message::{decode_line, Classification, DecodeError, ReplyPayload, ServerReply};
