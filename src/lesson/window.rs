use std::collections::VecDeque;

/// Bounded FIFO of recent correctness samples with an incrementally
/// maintained correct count; never recounted by scanning except on reset.
#[derive(Debug)]
pub struct AccuracyWindow {
    samples: VecDeque<bool>,
    capacity: usize,
    correct: usize,
}

impl AccuracyWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            correct: 0,
        }
    }

    /// Push one sample, evicting the oldest entries while over capacity.
    pub fn push(&mut self, correct: bool) {
        self.samples.push_back(correct);
        if correct {
            self.correct += 1;
        }
        while self.samples.len() > self.capacity {
            if let Some(true) = self.samples.pop_front() {
                self.correct -= 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.correct
    }

    /// Fraction of correct samples over the samples currently held, not the
    /// configured capacity. Zero while empty.
    pub fn accuracy(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.correct as f32 / self.samples.len() as f32
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.correct = 0;
    }
}
