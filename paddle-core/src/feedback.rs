//! Status LED colors for direction and speed of each axis.

use core::future::Future;

use crate::output::OutputError;
use crate::types::{Axis, DirectionMultiplier, SpeedMultiplier};

/// Number of feedback LEDs.
pub const LED_COUNT: usize = 4;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const DARK_RED: Self = Self::new(0x8B, 0x00, 0x00);
    pub const YELLOW: Self = Self::new(0xFF, 0xFF, 0x00);
    pub const DARK_GREEN: Self = Self::new(0x00, 0x64, 0x00);
}

/// Speed indicator colors, slowest first.
pub const SPEED_PALETTE: [Rgb; 3] = [Rgb::DARK_RED, Rgb::YELLOW, Rgb::DARK_GREEN];

/// Direction indicator colors: normal, reversed.
pub const DIRECTION_PALETTE: [Rgb; 2] = [Rgb::DARK_GREEN, Rgb::DARK_RED];

#[must_use]
pub const fn speed_color(speed: SpeedMultiplier) -> Rgb {
    match speed {
        SpeedMultiplier::Slow => SPEED_PALETTE[0],
        SpeedMultiplier::Medium => SPEED_PALETTE[1],
        SpeedMultiplier::Fast => SPEED_PALETTE[2],
    }
}

#[must_use]
pub const fn direction_color(direction: DirectionMultiplier) -> Rgb {
    match direction {
        DirectionMultiplier::Normal => DIRECTION_PALETTE[0],
        DirectionMultiplier::Reversed => DIRECTION_PALETTE[1],
    }
}

// LED chain order: X direction, Y direction, Y speed, X speed.
const fn direction_led(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
    }
}

const fn speed_led(axis: Axis) -> usize {
    match axis {
        Axis::X => 3,
        Axis::Y => 2,
    }
}

/// Sink for the LED colors (e.g. a WS2812 chain).
pub trait FeedbackSink {
    /// Display the given colors.
    fn show(
        &mut self,
        colors: &[Rgb; LED_COUNT],
    ) -> impl Future<Output = Result<(), OutputError>>;
}

/// Current LED colors plus a pending-show flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackLeds {
    colors: [Rgb; LED_COUNT],
    dirty: bool,
}

impl FeedbackLeds {
    /// Power-on colors for default multipliers. Starts out pending so the
    /// first loop iteration pushes them.
    #[must_use]
    pub const fn new() -> Self {
        let dir = direction_color(DirectionMultiplier::Normal);
        let speed = speed_color(SpeedMultiplier::Medium);
        Self {
            colors: [dir, dir, speed, speed],
            dirty: true,
        }
    }

    pub fn set_direction(&mut self, axis: Axis, direction: DirectionMultiplier) {
        self.colors[direction_led(axis)] = direction_color(direction);
        self.dirty = true;
    }

    pub fn set_speed(&mut self, axis: Axis, speed: SpeedMultiplier) {
        self.colors[speed_led(axis)] = speed_color(speed);
        self.dirty = true;
    }

    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[Rgb; LED_COUNT] {
        &self.colors
    }

    /// Colors to push if anything changed since the last call.
    pub fn take_pending(&mut self) -> Option<[Rgb; LED_COUNT]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.colors)
    }

    /// Request another push of the current colors.
    #[inline]
    pub fn mark_pending(&mut self) {
        self.dirty = true;
    }
}

impl Default for FeedbackLeds {
    fn default() -> Self {
        Self::new()
    }
}
