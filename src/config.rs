use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Session configuration with tunable thresholds. Loadable from a JSON file;
/// every field has a documented default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Address of the inference server, e.g. "192.168.0.42:5000"
    pub server_addr: String,

    /// Seconds between outbound frames
    pub send_interval_secs: f64,

    /// Encoding quality hint handed to the frame source (1-100)
    pub image_quality: u8,

    /// Minimum seconds between the end of one assist exchange and the next request
    pub assist_cooldown_secs: f64,

    /// Seconds of continuous confusion before help is requested
    pub confusion_threshold_secs: f64,

    /// Minimum confidence to count a detection as correct
    pub min_confidence: f32,

    /// How many recent samples the sliding window holds
    pub window_size: usize,

    /// Required fraction of correct samples in the window to pass a lesson
    pub required_accuracy: f32,

    /// Minimum number of samples before the pass condition is evaluated
    pub min_samples_to_evaluate: usize,

    /// Seconds to hold the success state before moving to the next lesson
    pub success_hold_secs: f64,

    /// Lesson display names, in curriculum order
    pub lesson_names: Vec<String>,

    /// Reference media handles, parallel to `lesson_names`
    pub reference_media: Vec<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        let lesson_names = ["egg", "mushroom", "hamburger", "fish", "bread"];
        Self {
            server_addr: "127.0.0.1:5000".into(),
            send_interval_secs: 0.15,
            image_quality: 70,
            assist_cooldown_secs: 15.0,
            confusion_threshold_secs: 2.5,
            min_confidence: 0.6,
            window_size: 40,
            required_accuracy: 0.5,
            min_samples_to_evaluate: 15,
            success_hold_secs: 5.0,
            lesson_names: lesson_names.iter().map(|name| name.to_string()).collect(),
            reference_media: lesson_names
                .iter()
                .map(|name| format!("media/{name}.png"))
                .collect(),
        }
    }
}

impl TrainerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the lesson engine cannot run with. Called at
    /// startup; the engine refuses to start rather than run with undefined
    /// lesson state.
    pub fn validate(&self) -> Result<()> {
        if self.lesson_names.is_empty() {
            bail!("lesson_names must not be empty");
        }
        if self.lesson_names.len() != self.reference_media.len() {
            bail!(
                "lesson_names ({}) and reference_media ({}) must have the same length",
                self.lesson_names.len(),
                self.reference_media.len()
            );
        }
        if self.window_size == 0 {
            bail!("window_size must be at least 1");
        }
        if self.min_samples_to_evaluate == 0 {
            bail!("min_samples_to_evaluate must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.required_accuracy) {
            bail!("required_accuracy must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            bail!("min_confidence must be within 0..=1");
        }
        if self.send_interval_secs <= 0.0 {
            bail!("send_interval_secs must be positive");
        }
        Ok(())
    }

    pub fn send_interval(&self) -> Duration {
        Duration::from_secs_f64(self.send_interval_secs)
    }

    pub fn assist_cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.assist_cooldown_secs)
    }

    pub fn confusion_threshold(&self) -> Duration {
        Duration::from_secs_f64(self.confusion_threshold_secs)
    }

    pub fn success_hold(&self) -> Duration {
        Duration::from_secs_f64(self.success_hold_secs)
    }
}
