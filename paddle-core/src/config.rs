//! Compile-time controller configuration.
//!
//! Customize the behaviour by building your own `const` [`ControllerConfig`]
//! and passing it to [`Controller::new`](crate::Controller::new).

use embassy_time::Duration;

/// Number of fire buttons forwarded to the HID sink.
pub const FIRE_BUTTON_COUNT: usize = 4;

/// Lowest absolute gamepad axis value.
pub const GAMEPAD_AXIS_MIN: i16 = i16::MIN;

/// Highest absolute gamepad axis value.
pub const GAMEPAD_AXIS_MAX: i16 = i16::MAX;

/// Timing and scaling parameters of the fusion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Raw input must be stable this long before an edge is reported.
    pub debounce: Duration,
    /// Settings-button releases shorter than this are treated as bounce.
    pub short_press: Duration,
    /// Holding a settings button this long cycles the speed.
    pub long_press: Duration,
    /// Mouse counts per scaled encoder step.
    pub mouse_step_base: i32,
    /// Gamepad axis units per scaled encoder step.
    pub gamepad_step_base: i32,
}

impl ControllerConfig {
    /// Default tuning: 10 ms debounce, 250 ms / 1 s press thresholds.
    pub const DEFAULT: Self = Self {
        debounce: Duration::from_millis(10),
        short_press: Duration::from_millis(250),
        long_press: Duration::from_millis(1000),
        mouse_step_base: 1,
        gamepad_step_base: 50,
    };

    /// Snappier settings buttons: 60 ms / 500 ms press thresholds.
    pub const QUICK: Self = Self {
        short_press: Duration::from_millis(60),
        long_press: Duration::from_millis(500),
        ..Self::DEFAULT
    };
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
