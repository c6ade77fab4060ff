use std::sync::RwLock;

use crate::protocol::Classification;

/// Latest classification published by the receive loop, stamped with a
/// sequence number so the evaluator can tell a fresh result from a re-read.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub label: String,
    pub confidence: f32,
    pub seq: u64,
}

/// What the evaluator reads once per tick, taken under a single lock.
#[derive(Debug, Clone, Default)]
pub struct ResultsSnapshot {
    pub observation: Option<Observation>,
    pub confused: bool,
}

#[derive(Debug, Default)]
struct Inner {
    observation: Option<Observation>,
    next_seq: u64,
    confused: bool,
    assist_text: Option<String>,
    assist_seq: u64,
}

/// Last-value-wins store shared between the receive loop and the evaluator.
/// No history is kept, and values survive receiver shutdown so consumers see
/// stale data instead of a flicker to empty.
#[derive(Debug, Default)]
pub struct ResultStore {
    inner: RwLock<Inner>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_classification(&self, classification: Classification) {
        let mut inner = self.inner.write().unwrap();
        inner.next_seq += 1;
        inner.observation = Some(Observation {
            label: classification.label,
            confidence: classification.confidence,
            seq: inner.next_seq,
        });
    }

    pub fn publish_confusion(&self, confused: bool) {
        self.inner.write().unwrap().confused = confused;
    }

    pub fn publish_assist_text(&self, text: String) {
        let mut inner = self.inner.write().unwrap();
        inner.assist_seq += 1;
        inner.assist_text = Some(text);
    }

    pub fn snapshot(&self) -> ResultsSnapshot {
        let inner = self.inner.read().unwrap();
        ResultsSnapshot {
            observation: inner.observation.clone(),
            confused: inner.confused,
        }
    }

    /// Assist text newer than `last_seen`, together with the new watermark.
    pub fn assist_text_since(&self, last_seen: u64) -> Option<(String, u64)> {
        let inner = self.inner.read().unwrap();
        if inner.assist_seq > last_seen {
            inner
                .assist_text
                .clone()
                .map(|text| (text, inner.assist_seq))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_bumps_the_sequence() {
        let store = ResultStore::new();
        store.publish_classification(Classification {
            label: "egg".into(),
            confidence: 0.9,
        });
        store.publish_classification(Classification {
            label: "fish".into(),
            confidence: 0.7,
        });

        let snapshot = store.snapshot();
        let observation = snapshot.observation.expect("published");
        assert_eq!(observation.label, "fish");
        assert_eq!(observation.seq, 2);
    }

    #[test]
    fn assist_text_is_reported_once_per_watermark() {
        let store = ResultStore::new();
        assert_eq!(store.assist_text_since(0), None);

        store.publish_assist_text("try again".into());
        let (text, seq) = store.assist_text_since(0).expect("new text");
        assert_eq!(text, "try again");

        assert_eq!(store.assist_text_since(seq), None);

        store.publish_assist_text("better".into());
        assert!(store.assist_text_since(seq).is_some());
    }

    #[test]
    fn confusion_is_independent_of_classifications() {
        let store = ResultStore::new();
        store.publish_confusion(true);

        let snapshot = store.snapshot();
        assert!(snapshot.confused);
        assert!(snapshot.observation.is_none());
    }
}
