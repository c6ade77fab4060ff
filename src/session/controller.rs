use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::assist::AssistThrottle;
use crate::config::TrainerConfig;
use crate::lesson::{build_lessons, LessonEngine};
use crate::net::{receive_loop, FrameChannel, ResultStore};
use crate::presenter::Presenter;
use crate::protocol::OutboundFrame;
use crate::session::report::SessionReport;
use crate::source::FrameSource;

const RECEIVER_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Orchestrates one training session: owns the connection, runs the periodic
/// send loop, spawns the receive loop, and drives the lesson engine.
///
/// A connection failure is terminal for the session; there is no retry or
/// reconnect anywhere in this path.
pub struct SessionController {
    config: TrainerConfig,
}

impl SessionController {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run the session to completion. Returns the session report when the
    /// curriculum finishes; returns an error when the connection is lost or
    /// frame capture fails.
    pub async fn run(
        &self,
        frame_source: &mut dyn FrameSource,
        presenter: &mut dyn Presenter,
    ) -> Result<SessionReport> {
        let lessons = build_lessons(&self.config.lesson_names, &self.config.reference_media)?;
        let mut engine = LessonEngine::new(lessons, &self.config);

        let (channel, read_half) = FrameChannel::connect(&self.config.server_addr)
            .await
            .context("could not connect to the inference server")?;

        let results = Arc::new(ResultStore::new());
        let throttle = Arc::new(AssistThrottle::new(self.config.assist_cooldown()));
        let cancel_token = CancellationToken::new();
        let receiver = tokio::spawn(receive_loop(
            read_half,
            Arc::clone(&results),
            Arc::clone(&throttle),
            cancel_token.clone(),
        ));

        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!(
            "session {session_id} started against {} with {} lessons",
            self.config.server_addr,
            engine.lessons_total()
        );

        engine.start(presenter);

        let mut ticker = tokio::time::interval(self.config.send_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut assist_seen: u64 = 0;

        let outcome: Result<()> = loop {
            ticker.tick().await;
            let now = Instant::now();

            // surface assistance text that arrived since the last tick
            if let Some((text, watermark)) = results.assist_text_since(assist_seen) {
                assist_seen = watermark;
                presenter.show_status(&text);
            }

            let image = match frame_source.capture_encoded_frame(self.config.image_quality) {
                Ok(image) => image,
                Err(err) => break Err(err).context("frame capture failed"),
            };

            // the granted assist request rides on this tick's frame
            let frame = match throttle.try_grant(now) {
                Some(context) => OutboundFrame::assist(image, context),
                None => OutboundFrame::classify(image),
            };
            if let Err(err) = channel.send_frame(&frame).await {
                presenter.show_status("Connection to the server was lost.");
                break Err(err).context("frame send failed; session is over");
            }

            engine.tick(now, &results.snapshot(), &throttle, presenter);
            if engine.finished() {
                break Ok(());
            }
        };

        // Stop scheduling sends, close the socket, then give the receiver a
        // bounded window to observe EOF and exit.
        cancel_token.cancel();
        channel.close().await;
        match tokio::time::timeout(RECEIVER_JOIN_TIMEOUT, receiver).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!("receive loop task failed to join: {err}"),
            Err(_) => warn!("receive loop did not exit within {RECEIVER_JOIN_TIMEOUT:?}"),
        }

        outcome?;

        let lessons_total = engine.lessons_total();
        let outcomes = engine.into_outcomes();
        let report = SessionReport {
            session_id,
            started_at,
            finished_at: Utc::now(),
            lessons_completed: outcomes.len(),
            lessons_total,
            outcomes,
        };
        presenter.on_session_finished(&report);
        Ok(report)
    }
}
