//! Short/long press classification for the per-axis settings buttons.
//!
//! ```text
//! Idle --press--> Held(fired=false) --hold > long--> Held(fired=true)
//!  ^                 |                                   |
//!  |                 | short <= release < long: Toggle   |
//!  |                 | otherwise: nothing                |
//!  +-----------------+-----------------------------------+ release: nothing
//! ```

use embassy_time::{Duration, Instant};

use crate::config::ControllerConfig;
use crate::debounce::Edge;

/// Action requested by a settings-button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsAction {
    /// Short press: flip the axis direction.
    ToggleDirection,
    /// Long press: advance the axis speed.
    CycleSpeed,
}

/// Press-tracking state of one settings button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsButton {
    pressed: bool,
    press_start: Instant,
    long_press_fired: bool,
    press_duration: Duration,
}

impl SettingsButton {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: false,
            press_start: Instant::from_ticks(0),
            long_press_fired: false,
            press_duration: Duration::from_ticks(0),
        }
    }

    /// Advance the state machine by one loop iteration.
    ///
    /// `edge` is the debounced edge observed this iteration, if any. The long
    /// press fires while the button is still held, at most once per hold; a
    /// release in the same iteration sees it as already fired.
    pub fn update(
        &mut self,
        edge: Option<Edge>,
        now: Instant,
        config: &ControllerConfig,
    ) -> Option<SettingsAction> {
        if edge == Some(Edge::Pressed) && !self.pressed {
            self.pressed = true;
            self.press_start = now;
            self.long_press_fired = false;
            self.press_duration = Duration::from_ticks(0);
        }

        let mut action = None;

        if self.pressed && !self.long_press_fired {
            self.press_duration = now.saturating_duration_since(self.press_start);
            if self.press_duration > config.long_press {
                self.long_press_fired = true;
                action = Some(SettingsAction::CycleSpeed);
            }
        }

        if edge == Some(Edge::Released) && self.pressed {
            if !self.long_press_fired
                && self.press_duration >= config.short_press
                && self.press_duration < config.long_press
            {
                action = Some(SettingsAction::ToggleDirection);
            }
            self.pressed = false;
            self.press_duration = Duration::from_ticks(0);
        }

        action
    }

    /// Whether the button is between a press and its release.
    #[inline]
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.pressed
    }

    /// Hold time so far, or zero when idle.
    #[inline]
    #[must_use]
    pub fn press_duration(&self) -> Duration {
        self.press_duration
    }
}

impl Default for SettingsButton {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    const CONFIG: ControllerConfig = ControllerConfig::DEFAULT;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    /// Press at `start`, poll every millisecond while held, release at `start + held_ms`.
    fn hold(button: &mut SettingsButton, start: u64, held_ms: u64) -> Vec<SettingsAction> {
        let mut actions = Vec::new();
        actions.extend(button.update(Some(Edge::Pressed), at(start), &CONFIG));
        for ms in start + 1..start + held_ms {
            actions.extend(button.update(None, at(ms), &CONFIG));
        }
        actions.extend(button.update(Some(Edge::Released), at(start + held_ms), &CONFIG));
        actions
    }

    #[test]
    fn test_long_press_fires_once_for_very_long_hold() {
        let mut button = SettingsButton::new();
        let actions = hold(&mut button, 1_000, 10 * 1_000);
        assert_eq!(actions, [SettingsAction::CycleSpeed]);
        assert!(!button.is_held());
    }

    #[test]
    fn test_long_press_fires_while_held() {
        let mut button = SettingsButton::new();
        assert_eq!(button.update(Some(Edge::Pressed), at(0), &CONFIG), None);
        assert_eq!(button.update(None, at(999), &CONFIG), None);
        assert_eq!(
            button.update(None, at(1_001), &CONFIG),
            Some(SettingsAction::CycleSpeed)
        );
        assert!(button.is_held());
        assert_eq!(button.update(None, at(1_500), &CONFIG), None);
        assert_eq!(button.update(Some(Edge::Released), at(1_600), &CONFIG), None);
    }

    #[test]
    fn test_release_below_short_threshold_is_ignored() {
        let mut button = SettingsButton::new();
        assert!(hold(&mut button, 0, 249).is_empty());
        assert!(!button.is_held());
    }

    #[test]
    fn test_release_between_thresholds_toggles_direction() {
        for held in [250, 251, 600, 999] {
            let mut button = SettingsButton::new();
            assert_eq!(
                hold(&mut button, 5_000, held),
                [SettingsAction::ToggleDirection],
                "held for {held} ms"
            );
        }
    }

    #[test]
    fn test_hold_of_exactly_long_threshold_does_nothing() {
        let mut button = SettingsButton::new();
        assert_eq!(button.update(Some(Edge::Pressed), at(0), &CONFIG), None);
        assert_eq!(button.update(None, at(1_000), &CONFIG), None);
        assert_eq!(button.update(Some(Edge::Released), at(1_000), &CONFIG), None);
        assert!(!button.is_held());

        // Sparse polling: the release is the first look at the hold.
        button.update(Some(Edge::Pressed), at(2_000), &CONFIG);
        assert_eq!(button.update(Some(Edge::Released), at(3_000), &CONFIG), None);
    }

    #[test]
    fn test_long_press_fires_one_tick_past_threshold() {
        let mut button = SettingsButton::new();
        let start = at(0);
        button.update(Some(Edge::Pressed), start, &CONFIG);
        assert_eq!(button.update(None, start + CONFIG.long_press, &CONFIG), None);
        assert_eq!(
            button.update(None, start + CONFIG.long_press + Duration::from_ticks(1), &CONFIG),
            Some(SettingsAction::CycleSpeed)
        );
    }

    #[test]
    fn test_sparse_polling_still_fires_long_press() {
        let mut button = SettingsButton::new();
        button.update(Some(Edge::Pressed), at(0), &CONFIG);
        // The release is the first poll after the threshold.
        assert_eq!(
            button.update(Some(Edge::Released), at(1_200), &CONFIG),
            Some(SettingsAction::CycleSpeed)
        );
        assert!(!button.is_held());
    }

    #[test]
    fn test_duration_resets_on_release() {
        let mut button = SettingsButton::new();
        button.update(Some(Edge::Pressed), at(0), &CONFIG);
        button.update(None, at(300), &CONFIG);
        assert_eq!(button.press_duration(), Duration::from_millis(300));
        button.update(Some(Edge::Released), at(400), &CONFIG);
        assert_eq!(button.press_duration(), Duration::from_ticks(0));
    }

    #[test]
    fn test_stray_release_is_ignored() {
        let mut button = SettingsButton::new();
        assert_eq!(button.update(Some(Edge::Released), at(10), &CONFIG), None);
        assert!(!button.is_held());
    }

    #[test]
    fn test_each_hold_rearms_long_press() {
        let mut button = SettingsButton::new();
        for round in 0..3 {
            let actions = hold(&mut button, round * 5_000, 1_500);
            assert_eq!(actions, [SettingsAction::CycleSpeed]);
        }
    }

    #[test]
    fn test_quick_thresholds() {
        let config = ControllerConfig::QUICK;
        let mut button = SettingsButton::new();
        button.update(Some(Edge::Pressed), at(0), &config);
        assert_eq!(
            button.update(Some(Edge::Released), at(70), &config),
            Some(SettingsAction::ToggleDirection)
        );

        button.update(Some(Edge::Pressed), at(100), &config);
        assert_eq!(button.update(None, at(600), &config), None);
        assert_eq!(
            button.update(None, at(601), &config),
            Some(SettingsAction::CycleSpeed)
        );
    }
}
