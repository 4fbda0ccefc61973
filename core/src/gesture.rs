//! Touch gesture recognition: tap, double-tap and horizontal swipes.
//!
//! Input adapters only translate raw events into these gestures; the viewer
//! controller maps them onto its navigation and modal operations.

/// Gestures recognized from raw touch samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Quick touch with no significant movement. Opens the modal.
    Tap,
    /// Two taps within the double-tap window. Toggles playback.
    DoubleTap,
    /// Horizontal drag to the left. Advances.
    SwipeLeft,
    /// Horizontal drag to the right. Retreats.
    SwipeRight,
}

/// Pixel movement below which a touch still counts as a tap.
const TAP_MOVE_LIMIT: f32 = 10.0;
/// Horizontal distance a drag must cover to count as a swipe.
const SWIPE_THRESHOLD: f32 = 40.0;
/// Window within which a second tap becomes a double-tap.
const DOUBLE_TAP_MS: u64 = 300;

/// Recognizes gestures from `{start, move, end}` touch samples.
///
/// Timestamps are caller-supplied milliseconds, so recognition is
/// deterministic and clock-free. A single tap is withheld until the
/// double-tap window lapses; call [`GestureRecognizer::poll`] with the
/// current time to flush it. A double-tap therefore never also fires the
/// single-tap action.
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    start: Option<(f32, f32)>,
    moved: bool,
    pending_tap: Option<u64>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
        self.moved = false;
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        if let Some((sx, sy)) = self.start {
            if (x - sx).abs() > TAP_MOVE_LIMIT || (y - sy).abs() > TAP_MOVE_LIMIT {
                self.moved = true;
            }
        }
    }

    /// Finish a touch. Swipes and double-taps resolve immediately; a lone
    /// tap is deferred (returns `None`) until [`GestureRecognizer::poll`]
    /// releases it.
    pub fn touch_end(&mut self, x: f32, y: f32, at_ms: u64) -> Option<Gesture> {
        let (sx, sy) = self.start.take()?;
        let dx = x - sx;
        let dy = y - sy;

        if !self.moved && dx.abs() < TAP_MOVE_LIMIT && dy.abs() < TAP_MOVE_LIMIT {
            if let Some(last) = self.pending_tap {
                if at_ms.saturating_sub(last) <= DOUBLE_TAP_MS {
                    self.pending_tap = None;
                    return Some(Gesture::DoubleTap);
                }
            }
            self.pending_tap = Some(at_ms);
            return None;
        }

        // Horizontal swipe: must dominate the vertical component.
        if dx.abs() > dy.abs() && dx.abs() > SWIPE_THRESHOLD {
            return Some(if dx < 0.0 {
                Gesture::SwipeLeft
            } else {
                Gesture::SwipeRight
            });
        }

        None
    }

    /// Release a deferred single tap once the double-tap window has lapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<Gesture> {
        let last = self.pending_tap?;
        if now_ms.saturating_sub(last) > DOUBLE_TAP_MS {
            self.pending_tap = None;
            return Some(Gesture::Tap);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(recognizer: &mut GestureRecognizer, at_ms: u64) -> Option<Gesture> {
        recognizer.touch_start(100.0, 100.0);
        recognizer.touch_end(102.0, 101.0, at_ms)
    }

    #[test]
    fn lone_tap_resolves_after_window() {
        let mut recognizer = GestureRecognizer::new();
        assert_eq!(tap(&mut recognizer, 1000), None);
        // Still inside the double-tap window.
        assert_eq!(recognizer.poll(1200), None);
        assert_eq!(recognizer.poll(1301), Some(Gesture::Tap));
        // Flushed once only.
        assert_eq!(recognizer.poll(1400), None);
    }

    #[test]
    fn two_quick_taps_are_a_double_tap() {
        let mut recognizer = GestureRecognizer::new();
        assert_eq!(tap(&mut recognizer, 1000), None);
        assert_eq!(tap(&mut recognizer, 1250), Some(Gesture::DoubleTap));
        // The deferred first tap must not also fire.
        assert_eq!(recognizer.poll(2000), None);
    }

    #[test]
    fn slow_second_tap_is_not_a_double_tap() {
        let mut recognizer = GestureRecognizer::new();
        assert_eq!(tap(&mut recognizer, 1000), None);
        assert_eq!(tap(&mut recognizer, 1400), None);
        assert_eq!(recognizer.poll(1701), Some(Gesture::Tap));
    }

    #[test]
    fn horizontal_drags_are_swipes() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch_start(200.0, 100.0);
        recognizer.touch_move(150.0, 105.0);
        assert_eq!(
            recognizer.touch_end(150.0, 105.0, 1000),
            Some(Gesture::SwipeLeft)
        );

        recognizer.touch_start(100.0, 100.0);
        recognizer.touch_move(160.0, 95.0);
        assert_eq!(
            recognizer.touch_end(160.0, 95.0, 2000),
            Some(Gesture::SwipeRight)
        );
    }

    #[test]
    fn vertical_drag_is_not_a_swipe() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch_start(100.0, 100.0);
        recognizer.touch_move(130.0, 200.0);
        assert_eq!(recognizer.touch_end(130.0, 200.0, 1000), None);
    }

    #[test]
    fn short_drag_is_neither_tap_nor_swipe() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch_start(100.0, 100.0);
        recognizer.touch_move(125.0, 100.0);
        assert_eq!(recognizer.touch_end(125.0, 100.0, 1000), None);
        assert_eq!(recognizer.poll(2000), None);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut recognizer = GestureRecognizer::new();
        assert_eq!(recognizer.touch_end(10.0, 10.0, 100), None);
    }
}
