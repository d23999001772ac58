//! Time-window debouncer for mechanical switches.

use embassy_time::{Duration, Instant};

/// A filtered transition of a debounced input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Inactive -> active.
    Pressed,
    /// Active -> inactive.
    Released,
}

/// Debounces a stream of raw samples into press/release edges.
///
/// Every change of the raw level restarts the stability timer. The steady
/// level only follows the raw level once it has been unchanged for at least
/// the debounce window, so bounce shorter than the window never produces an
/// edge.
///
/// # Example
///
/// ```
/// use embassy_time::{Duration, Instant};
/// use paddle_core::{Debouncer, Edge};
///
/// let mut button = Debouncer::new(Duration::from_millis(10));
/// assert_eq!(button.update(true, Instant::from_millis(0)), None);
/// assert_eq!(button.update(true, Instant::from_millis(10)), Some(Edge::Pressed));
/// assert!(button.is_pressed());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: Duration,
    raw: bool,
    changed_at: Instant,
    steady: bool,
    edge: Option<Edge>,
}

impl Debouncer {
    /// Create a debouncer whose input starts out inactive.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            raw: false,
            changed_at: Instant::from_ticks(0),
            steady: false,
            edge: None,
        }
    }

    /// Feed one raw sample taken at `now`.
    ///
    /// Returns the edge produced by this sample, if any. The result is also
    /// kept until the next call and can be queried with [`is_pressed`] and
    /// [`is_released`].
    ///
    /// [`is_pressed`]: Self::is_pressed
    /// [`is_released`]: Self::is_released
    pub fn update(&mut self, active: bool, now: Instant) -> Option<Edge> {
        self.edge = None;

        if active != self.raw {
            self.raw = active;
            self.changed_at = now;
        }

        if self.raw != self.steady && now.saturating_duration_since(self.changed_at) >= self.window
        {
            self.steady = self.raw;
            self.edge = Some(if self.steady {
                Edge::Pressed
            } else {
                Edge::Released
            });
        }

        self.edge
    }

    /// Take back the edge reported by the last [`update`](Self::update).
    ///
    /// The steady level returns to what it was before, so the next update
    /// reports the same edge again if the raw level still holds.
    pub fn revert(&mut self) {
        if self.edge.take().is_some() {
            self.steady = !self.steady;
        }
    }

    /// Whether the last [`update`](Self::update) observed a press edge.
    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.edge == Some(Edge::Pressed)
    }

    /// Whether the last [`update`](Self::update) observed a release edge.
    #[inline]
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.edge == Some(Edge::Released)
    }

    /// Current filtered level.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.steady
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(10);

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_stable_press_and_release_produce_one_edge_each() {
        let mut button = Debouncer::new(WINDOW);
        let mut edges = 0;
        let mut last = None;

        for ms in 0..30 {
            if let Some(edge) = button.update(true, at(ms)) {
                edges += 1;
                last = Some(edge);
            }
        }
        assert_eq!(edges, 1);
        assert_eq!(last, Some(Edge::Pressed));
        assert!(button.is_active());

        for ms in 30..60 {
            if let Some(edge) = button.update(false, at(ms)) {
                edges += 1;
                last = Some(edge);
            }
        }
        assert_eq!(edges, 2);
        assert_eq!(last, Some(Edge::Released));
        assert!(!button.is_active());
    }

    #[test]
    fn test_press_reported_once_window_elapses() {
        let mut button = Debouncer::new(WINDOW);
        assert_eq!(button.update(true, at(100)), None);
        assert_eq!(button.update(true, at(109)), None);
        assert_eq!(button.update(true, at(110)), Some(Edge::Pressed));
        assert!(button.is_pressed());
        assert_eq!(button.update(true, at(111)), None);
        assert!(!button.is_pressed());
    }

    #[test]
    fn test_short_pulse_is_ignored() {
        let mut button = Debouncer::new(WINDOW);
        assert_eq!(button.update(true, at(100)), None);
        assert_eq!(button.update(true, at(105)), None);
        assert_eq!(button.update(false, at(109)), None);
        for ms in 110..200 {
            assert_eq!(button.update(false, at(ms)), None);
        }
        assert!(!button.is_active());
    }

    #[test]
    fn test_bounce_restarts_window() {
        let mut button = Debouncer::new(WINDOW);
        // Chatter for a while, then settle active at t=108.
        for (ms, level) in [(100, true), (102, false), (104, true), (106, false), (108, true)] {
            assert_eq!(button.update(level, at(ms)), None);
        }
        assert_eq!(button.update(true, at(117)), None);
        assert_eq!(button.update(true, at(118)), Some(Edge::Pressed));
    }

    #[test]
    fn test_reverted_edge_is_reported_again() {
        let mut button = Debouncer::new(WINDOW);
        button.update(true, at(0));
        assert_eq!(button.update(true, at(10)), Some(Edge::Pressed));

        button.revert();
        assert!(!button.is_active());
        assert!(!button.is_pressed());
        assert_eq!(button.update(true, at(11)), Some(Edge::Pressed));
        assert_eq!(button.update(true, at(12)), None);
    }

    #[test]
    fn test_reverted_edge_dropped_if_level_went_back() {
        let mut button = Debouncer::new(WINDOW);
        button.update(true, at(0));
        assert_eq!(button.update(true, at(10)), Some(Edge::Pressed));
        button.revert();

        for ms in 11..40 {
            assert_eq!(button.update(false, at(ms)), None);
        }
        assert!(!button.is_active());
    }

    #[test]
    fn test_revert_without_edge_is_noop() {
        let mut button = Debouncer::new(WINDOW);
        button.update(true, at(0));
        button.update(true, at(10));
        button.update(true, at(11));
        button.revert();
        assert!(button.is_active());
    }

    #[test]
    fn test_release_glitch_while_held_is_ignored() {
        let mut button = Debouncer::new(WINDOW);
        button.update(true, at(0));
        assert_eq!(button.update(true, at(10)), Some(Edge::Pressed));

        assert_eq!(button.update(false, at(50)), None);
        assert_eq!(button.update(true, at(53)), None);
        for ms in 54..100 {
            assert_eq!(button.update(true, at(ms)), None);
        }
        assert!(button.is_active());
    }
}
