/// Mode byte values on the wire.
pub const MODE_CLASSIFY: u8 = 0;
pub const MODE_ASSIST: u8 = 1;

/// The context prefix length is carried in a single byte.
pub const MAX_CONTEXT_BYTES: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    Classify,
    Assist,
}

/// One outbound frame: an encoded image blob plus, in assist mode, a short
/// context string naming what the user needs help with.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub image: Vec<u8>,
    pub assist_context: Option<String>,
}

impl OutboundFrame {
    pub fn classify(image: Vec<u8>) -> Self {
        Self {
            image,
            assist_context: None,
        }
    }

    pub fn assist(image: Vec<u8>, context: impl Into<String>) -> Self {
        Self {
            image,
            assist_context: Some(context.into()),
        }
    }

    pub fn mode(&self) -> FrameMode {
        if self.assist_context.is_some() {
            FrameMode::Assist
        } else {
            FrameMode::Classify
        }
    }

    /// Serialize as `[1 byte mode][4 bytes big-endian payload length]` followed
    /// by the payload. An assist payload is `[1 byte contextLen][context][image]`;
    /// a classify payload is the image alone.
    ///
    /// Returning one contiguous buffer lets the channel write header and body
    /// in a single call under its write lock, so frames never interleave.
    pub fn encode(&self) -> Vec<u8> {
        let (mode, context) = match &self.assist_context {
            Some(context) => {
                let bytes = context.as_bytes();
                let len = bytes.len().min(MAX_CONTEXT_BYTES);
                (MODE_ASSIST, &bytes[..len])
            }
            None => (MODE_CLASSIFY, &[][..]),
        };

        let payload_len = if mode == MODE_ASSIST {
            1 + context.len() + self.image.len()
        } else {
            self.image.len()
        };

        let mut out = Vec::with_capacity(5 + payload_len);
        out.push(mode);
        out.extend_from_slice(&(payload_len as u32).to_be_bytes());
        if mode == MODE_ASSIST {
            out.push(context.len() as u8);
            out.extend_from_slice(context);
        }
        out.extend_from_slice(&self.image);
        out
    }
}
