use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct ThrottleState {
    outstanding: bool,
    next_eligible: Instant,
    pending_context: Option<String>,
}

/// Gates assist requests behind a minimum inter-request interval and a
/// single-outstanding-request rule.
///
/// Grant and release both go through the one mutex so a grant on the send
/// tick cannot cross a release from the receive loop.
#[derive(Debug)]
pub struct AssistThrottle {
    cooldown: Duration,
    state: Mutex<ThrottleState>,
}

impl AssistThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: Mutex::new(ThrottleState {
                outstanding: false,
                next_eligible: Instant::now(),
                pending_context: None,
            }),
        }
    }

    /// Queue a help request with the given context. The slot holds a single
    /// request; a second call before a grant replaces the pending context
    /// (last caller wins). Only the grant path can turn a queued request into
    /// a sent one, so queuing never violates the single-outstanding rule.
    pub fn request_help(&self, context: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.pending_context = Some(context.into());
    }

    /// Called once per send tick. Returns the context to attach to the next
    /// frame when a pending request may go out now; the request is then
    /// outstanding until [`release`](Self::release).
    pub fn try_grant(&self, now: Instant) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        if state.outstanding || now < state.next_eligible {
            return None;
        }
        let context = state.pending_context.take()?;
        state.outstanding = true;
        Some(context)
    }

    /// Observe a reply or a server error for the outstanding request. The
    /// cooldown restarts from reply arrival, not from when the request was
    /// sent, so slow replies cannot let requests pile up.
    pub fn release(&self, now: Instant) {
        let mut state = self.state.lock().unwrap();
        state.outstanding = false;
        state.next_eligible = now + self.cooldown;
    }

    pub fn outstanding(&self) -> bool {
        self.state.lock().unwrap().outstanding
    }
}
