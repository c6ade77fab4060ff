use serde::Deserialize;
use thiserror::Error;

/// Raw shape of one server line. Every field is optional so partial or
/// oddly shaped messages decode without tearing down the receive loop.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawReply {
    mode: String,
    label: String,
    confidence: f32,
    #[serde(rename = "assistText")]
    assist_text: String,
    #[serde(rename = "confusionFlag")]
    confusion_flag: u8,
    #[serde(rename = "errorText")]
    error_text: String,
}

/// One classification observation. Label and confidence travel as a pair so
/// the evaluator can never combine a label with a stale confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

/// Mode-specific payload of a decoded server line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPayload {
    Classify(Classification),
    Assist { text: String },
    Error { text: String },
}

/// One decoded server line. The confusion flag rides alongside the payload
/// because the server attaches it to every message mode; a line without the
/// flag means not confused, it is not a gap in the signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerReply {
    pub payload: ReplyPayload,
    pub confusion: bool,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown message mode {0:?}")]
    UnknownMode(String),
}

/// Decode one newline-delimited server message.
pub fn decode_line(line: &str) -> Result<ServerReply, DecodeError> {
    let raw: RawReply = serde_json::from_str(line)?;

    let payload = match raw.mode.as_str() {
        "classify" => ReplyPayload::Classify(Classification {
            label: raw.label,
            confidence: raw.confidence,
        }),
        "assist" => ReplyPayload::Assist {
            text: raw.assist_text,
        },
        "error" => ReplyPayload::Error {
            text: raw.error_text,
        },
        other => return Err(DecodeError::UnknownMode(other.to_string())),
    };

    Ok(ServerReply {
        payload,
        confusion: raw.confusion_flag != 0,
    })
}
