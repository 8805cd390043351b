#![forbid(unsafe_code)]

//! Horizontal swipe detection.

use crate::input::{TouchInput, TouchPhase};

/// Direction of a detected swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swipe {
    /// Finger moved toward negative x.
    Left,
    /// Finger moved toward positive x.
    Right,
}

/// Tracks one touch gesture from start to end on the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Option<f64>,
}

impl SwipeTracker {
    /// `threshold` is exclusive: travel must be strictly greater.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed a touch event. Returns a swipe when a gesture ends past the threshold.
    pub fn feed(&mut self, touch: &TouchInput) -> Option<Swipe> {
        match touch.phase {
            TouchPhase::Start => {
                self.start_x = touch.primary().map(|p| p.screen_x);
                None
            }
            TouchPhase::Cancel => {
                self.start_x = None;
                None
            }
            TouchPhase::End => {
                let start = self.start_x.take()?;
                let end = touch.primary()?.screen_x;
                classify(end - start, self.threshold)
            }
        }
    }
}

/// Classify a horizontal delta.
#[must_use]
pub fn classify(dx: f64, threshold: f64) -> Option<Swipe> {
    if dx.abs() <= threshold {
        return None;
    }
    Some(if dx < 0.0 { Swipe::Left } else { Swipe::Right })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gesture(tracker: &mut SwipeTracker, from: f64, to: f64) -> Option<Swipe> {
        assert_eq!(
            tracker.feed(&TouchInput::single(TouchPhase::Start, from, 0.0)),
            None
        );
        tracker.feed(&TouchInput::single(TouchPhase::End, to, 0.0))
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(classify(40.0, 40.0), None);
        assert_eq!(classify(-40.0, 40.0), None);
        assert_eq!(classify(40.5, 40.0), Some(Swipe::Right));
        assert_eq!(classify(-50.0, 40.0), Some(Swipe::Left));
    }

    #[test]
    fn tracks_start_to_end() {
        let mut t = SwipeTracker::new(40.0);
        assert_eq!(gesture(&mut t, 200.0, 150.0), Some(Swipe::Left));
        assert_eq!(gesture(&mut t, 100.0, 120.0), None);
        assert_eq!(gesture(&mut t, 100.0, 160.0), Some(Swipe::Right));
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut t = SwipeTracker::new(40.0);
        assert_eq!(
            t.feed(&TouchInput::single(TouchPhase::End, 500.0, 0.0)),
            None
        );
    }

    #[test]
    fn cancel_discards_gesture() {
        let mut t = SwipeTracker::new(40.0);
        t.feed(&TouchInput::single(TouchPhase::Start, 0.0, 0.0));
        t.feed(&TouchInput::single(TouchPhase::Cancel, 0.0, 0.0));
        assert_eq!(
            t.feed(&TouchInput::single(TouchPhase::End, 300.0, 0.0)),
            None
        );
    }
}
