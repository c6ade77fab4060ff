//! Full-session tests against a scripted fake inference server.
//!
//! The server end of the wire protocol is small enough to script inline:
//! read length-framed frames, answer with newline-delimited JSON.

use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use signcoach::{FrameSource, Presenter, SessionController, SessionReport, TrainerConfig};

const MODE_ASSIST: u8 = 1;

#[derive(Debug, PartialEq)]
enum Event {
    Status(String),
    Progress(usize, usize),
    LessonPassed(String),
    SessionFinished(usize, usize),
}

#[derive(Default)]
struct RecordingPresenter {
    events: Vec<Event>,
}

impl Presenter for RecordingPresenter {
    fn show_status(&mut self, text: &str) {
        self.events.push(Event::Status(text.to_string()));
    }
    fn show_progress(&mut self, correct: usize, total: usize) {
        self.events.push(Event::Progress(correct, total));
    }
    fn on_lesson_passed(&mut self, lesson_id: &str) {
        self.events.push(Event::LessonPassed(lesson_id.to_string()));
    }
    fn on_session_finished(&mut self, report: &SessionReport) {
        self.events.push(Event::SessionFinished(
            report.lessons_completed,
            report.lessons_total,
        ));
    }
}

#[derive(Default)]
struct StaticFrameSource {
    quality_seen: Option<u8>,
}

impl FrameSource for StaticFrameSource {
    fn capture_encoded_frame(&mut self, quality: u8) -> Result<Vec<u8>> {
        self.quality_seen = Some(quality);
        Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
    }
}

fn fast_config(server_addr: String, lesson_names: Vec<&str>) -> TrainerConfig {
    TrainerConfig {
        server_addr,
        send_interval_secs: 0.02,
        assist_cooldown_secs: 0.05,
        confusion_threshold_secs: 0.05,
        min_confidence: 0.6,
        window_size: 3,
        required_accuracy: 0.5,
        min_samples_to_evaluate: 2,
        success_hold_secs: 0.0,
        lesson_names: lesson_names.iter().map(|name| name.to_string()).collect(),
        reference_media: lesson_names
            .iter()
            .map(|name| format!("media/{name}.png"))
            .collect(),
        ..TrainerConfig::default()
    }
}

/// Read one outbound frame; returns the mode byte and the assist context, if any.
async fn read_frame(stream: &mut TcpStream) -> std::io::Result<(u8, Option<String>)> {
    let mut header = [0u8; 5];
    stream.read_exact(&mut header).await?;
    let mode = header[0];
    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;

    let mut payload = vec![0u8; payload_len];
    stream.read_exact(&mut payload).await?;

    let context = if mode == MODE_ASSIST {
        let context_len = payload[0] as usize;
        Some(String::from_utf8_lossy(&payload[1..1 + context_len]).to_string())
    } else {
        None
    };
    Ok((mode, context))
}

#[tokio::test]
async fn completes_a_lesson_end_to_end() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");

        // a malformed line first: the client must shrug it off
        stream
            .write_all(b"<<<< not json >>>>\n")
            .await
            .expect("write garbage");

        while read_frame(&mut stream).await.is_ok() {
            let reply = b"{\"mode\":\"classify\",\"label\":\"egg\",\"confidence\":0.9}\n";
            if stream.write_all(reply).await.is_err() {
                break;
            }
        }
    });

    let controller =
        SessionController::new(fast_config(addr, vec!["egg"])).expect("valid config");
    let mut frame_source = StaticFrameSource::default();
    let mut presenter = RecordingPresenter::default();

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        controller.run(&mut frame_source, &mut presenter),
    )
    .await
    .expect("session should finish well before the timeout")
    .expect("session should succeed");

    assert_eq!(report.lessons_completed, 1);
    assert_eq!(report.lessons_total, 1);
    assert_eq!(report.outcomes[0].lesson_id, "egg");
    assert!(!report.outcomes[0].help_requested);

    assert!(presenter
        .events
        .contains(&Event::LessonPassed("egg".into())));
    assert!(presenter.events.contains(&Event::SessionFinished(1, 1)));

    // the configured encoding quality reaches every capture
    assert_eq!(frame_source.quality_seen, Some(70));

    server.await.expect("server task");
}

#[tokio::test]
async fn requests_assistance_when_confusion_persists() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut saw_assist_context = None;

        // wrong sign + confusion until the client asks for help
        loop {
            let (mode, context) = match read_frame(&mut stream).await {
                Ok(frame) => frame,
                Err(_) => panic!("client disconnected before requesting assistance"),
            };
            if mode == MODE_ASSIST {
                saw_assist_context = context;
                break;
            }
            let reply =
                b"{\"mode\":\"classify\",\"label\":\"bread\",\"confidence\":0.9,\"confusionFlag\":1}\n";
            stream.write_all(reply).await.expect("write reply");
        }
        assert_eq!(saw_assist_context.as_deref(), Some("egg"));

        stream
            .write_all(b"{\"mode\":\"assist\",\"assistText\":\"Curl your fingers into an O\"}\n")
            .await
            .expect("write assist reply");

        // from here on the learner gets it right
        while read_frame(&mut stream).await.is_ok() {
            let reply =
                b"{\"mode\":\"classify\",\"label\":\"egg\",\"confidence\":0.9,\"confusionFlag\":0}\n";
            if stream.write_all(reply).await.is_err() {
                break;
            }
        }
    });

    let controller =
        SessionController::new(fast_config(addr, vec!["egg"])).expect("valid config");
    let mut frame_source = StaticFrameSource::default();
    let mut presenter = RecordingPresenter::default();

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        controller.run(&mut frame_source, &mut presenter),
    )
    .await
    .expect("session should finish well before the timeout")
    .expect("session should succeed");

    assert_eq!(report.lessons_completed, 1);
    assert!(report.outcomes[0].help_requested);

    let assist_shown = presenter.events.iter().any(|event| {
        matches!(event, Event::Status(text) if text.contains("Curl your fingers"))
    });
    assert!(assist_shown, "assist text should reach the presenter");

    server.await.expect("server task");
}

#[tokio::test]
async fn a_dropped_connection_ends_the_session_with_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        // serve two frames, then drop the connection without a word
        for _ in 0..2 {
            let _ = read_frame(&mut stream).await;
        }
    });

    let controller =
        SessionController::new(fast_config(addr, vec!["egg"])).expect("valid config");
    let mut frame_source = StaticFrameSource::default();
    let mut presenter = RecordingPresenter::default();

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        controller.run(&mut frame_source, &mut presenter),
    )
    .await
    .expect("send failure should surface well before the timeout");

    assert!(result.is_err(), "a lost connection is terminal");
    let lost_status = presenter.events.iter().any(|event| {
        matches!(event, Event::Status(text) if text.contains("Connection to the server was lost"))
    });
    assert!(lost_status, "connection loss should surface as a status");
    assert!(
        !presenter
            .events
            .iter()
            .any(|event| matches!(event, Event::SessionFinished(..))),
        "no session report on failure"
    );

    server.await.expect("server task");
}
