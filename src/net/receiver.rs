use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio_util::sync::CancellationToken;

use crate::assist::AssistThrottle;
use crate::net::results::ResultStore;
use crate::protocol::{decode_line, LineAssembler, ReplyPayload};

const READ_CHUNK_BYTES: usize = 4096;

/// Receive loop: reassembles newline-terminated server messages from raw read
/// chunks and publishes the latest values to the shared store.
///
/// Runs until the connection ends or the token cancels. Published values are
/// left intact on exit so the rest of the session degrades to stale data.
pub async fn receive_loop(
    mut stream: OwnedReadHalf,
    results: Arc<ResultStore>,
    throttle: Arc<AssistThrottle>,
    cancel_token: CancellationToken,
) {
    let mut assembler = LineAssembler::new();
    let mut chunk = vec![0u8; READ_CHUNK_BYTES];

    loop {
        let read = tokio::select! {
            read = stream.read(&mut chunk) => read,
            _ = cancel_token.cancelled() => {
                info!("receive loop shutting down");
                return;
            }
        };

        match read {
            Ok(0) => {
                info!("server closed the connection");
                return;
            }
            Ok(n) => {
                for line in assembler.push(&chunk[..n]) {
                    if line.is_empty() {
                        continue;
                    }
                    handle_line(&line, &results, &throttle);
                }
            }
            Err(err) => {
                warn!("connection read failed: {err}");
                return;
            }
        }
    }
}

/// Apply one decoded server line to the shared state. A line that fails to
/// decode is dropped; it must never take the receive loop down with it.
fn handle_line(line: &str, results: &ResultStore, throttle: &AssistThrottle) {
    let reply = match decode_line(line) {
        Ok(reply) => reply,
        Err(err) => {
            warn!("dropping undecodable server line: {err}");
            return;
        }
    };

    // Every decoded line restates the confusion signal; a line without the
    // flag clears it rather than leaving the previous value to linger.
    results.publish_confusion(reply.confusion);

    match reply.payload {
        ReplyPayload::Classify(classification) => {
            if !classification.label.is_empty() {
                results.publish_classification(classification);
            }
        }
        ReplyPayload::Assist { text } => {
            debug!("assist reply arrived ({} bytes)", text.len());
            throttle.release(Instant::now());
            results.publish_assist_text(text);
        }
        ReplyPayload::Error { text } => {
            warn!("server reported an error: {text}");
            throttle.release(Instant::now());
            results.publish_assist_text(format!("[server error] {text}"));
        }
    }
}
