use anyhow::{Context, Result};
use std::path::Path;

/// Capture collaborator: produces one encoded image per call, at the sender's
/// cadence. `quality` is the configured encoding quality (1-100) applied when
/// the frame is compressed. Implementations must not block materially; the
/// send tick waits on this before anything else.
pub trait FrameSource: Send {
    fn capture_encoded_frame(&mut self, quality: u8) -> Result<Vec<u8>>;
}

/// Frame source that replays one encoded image from disk on every capture.
/// Stands in for a live camera when running the client headless or against a
/// test server.
pub struct FileFrameSource {
    image: Vec<u8>,
}

impl FileFrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        let image = std::fs::read(path)
            .with_context(|| format!("failed to read frame image {}", path.display()))?;
        Ok(Self { image })
    }
}

impl FrameSource for FileFrameSource {
    // The replayed image is already encoded, so the quality hint has nothing
    // left to act on here.
    fn capture_encoded_frame(&mut self, _quality: u8) -> Result<Vec<u8>> {
        Ok(self.image.clone())
    }
}
