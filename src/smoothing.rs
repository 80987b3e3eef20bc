//! Bounded moving-average smoothing for noisy landmark readings.

use std::collections::VecDeque;

/// Moving average over the last `window` values.
///
/// One smoother is kept per hand side so a reading from one hand never
/// bleeds into the other hand's average.
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    history: VecDeque<f32>,
    window: usize,
}

impl LandmarkSmoother {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            history: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Push `value`, dropping the oldest reading beyond the window, and
    /// return the mean of the retained readings.
    pub fn smooth(&mut self, value: f32) -> f32 {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(value);
        self.mean()
    }

    fn mean(&self) -> f32 {
        let sum: f32 = self.history.iter().copied().sum();
        sum / self.history.len() as f32
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::new(5)
    }
}
