//! Core controller types: Mode, Axis, Direction and the per-axis multipliers.

/// Output personality of the controller.
///
/// Sampled once from the mode-select line at boot and fixed until the next
/// restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Relative pointer (mouse) output.
    Mouse,
    /// Absolute, clamped gamepad axes.
    Gamepad,
}

impl Mode {
    /// Decode the mode-select line.
    ///
    /// The line is pulled up; grounding it selects gamepad mode.
    #[inline]
    #[must_use]
    pub const fn from_select_line(line_low: bool) -> Self {
        if line_low {
            Mode::Gamepad
        } else {
            Mode::Mouse
        }
    }
}

/// One of the two encoder axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, in processing order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Position of this axis in per-axis arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Rotation direction decoded from a single quadrature edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Clockwise = 0,
    CounterClockwise = 1,
}

impl Direction {
    #[inline]
    pub(crate) const fn from_raw(raw: u8) -> Self {
        if raw == Direction::CounterClockwise as u8 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Counter step contributed by one edge in this direction.
    #[inline]
    #[must_use]
    pub const fn step(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Sign applied to an axis' motion. Toggled by a short press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DirectionMultiplier {
    #[default]
    Normal,
    Reversed,
}

impl DirectionMultiplier {
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            DirectionMultiplier::Normal => 1,
            DirectionMultiplier::Reversed => -1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            DirectionMultiplier::Normal => DirectionMultiplier::Reversed,
            DirectionMultiplier::Reversed => DirectionMultiplier::Normal,
        }
    }
}

/// Speed factor applied to an axis' motion. Cycled by a long press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedMultiplier {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl SpeedMultiplier {
    #[inline]
    #[must_use]
    pub const fn factor(self) -> i32 {
        match self {
            SpeedMultiplier::Slow => 1,
            SpeedMultiplier::Medium => 2,
            SpeedMultiplier::Fast => 3,
        }
    }

    /// Next speed in the 1 -> 2 -> 3 -> 1 cycle.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            SpeedMultiplier::Slow => SpeedMultiplier::Medium,
            SpeedMultiplier::Medium => SpeedMultiplier::Fast,
            SpeedMultiplier::Fast => SpeedMultiplier::Slow,
        }
    }
}
