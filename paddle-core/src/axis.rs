//! Per-axis motion derivation and sensitivity state.

use embassy_time::Instant;

use crate::config::ControllerConfig;
use crate::debounce::Edge;
use crate::output::GamepadPosition;
use crate::quadrature::{CounterReader, EncoderSample};
use crate::settings::{SettingsAction, SettingsButton};
use crate::types::{Axis, DirectionMultiplier, SpeedMultiplier};

/// Scaled motion of one axis for one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMotion {
    pub axis: Axis,
    /// `direction * speed * counter delta`.
    pub scaled_delta: i32,
}

/// Loop-owned state of one encoder axis.
///
/// Reads the interrupt-owned counter through a [`CounterReader`] and never
/// writes it.
pub struct AxisController<'a> {
    axis: Axis,
    reader: CounterReader<'a>,
    prev_counter: i32,
    speed: SpeedMultiplier,
    direction: DirectionMultiplier,
    gamepad_position: GamepadPosition,
    settings: SettingsButton,
}

impl<'a> AxisController<'a> {
    /// Create the controller with power-on defaults.
    ///
    /// The current counter becomes the baseline, so edges recorded before
    /// this call never turn into motion.
    #[must_use]
    pub fn new(axis: Axis, reader: CounterReader<'a>) -> Self {
        Self {
            axis,
            prev_counter: reader.sample().counter,
            reader,
            speed: SpeedMultiplier::default(),
            direction: DirectionMultiplier::default(),
            gamepad_position: GamepadPosition::CENTER,
            settings: SettingsButton::new(),
        }
    }

    /// Discard all loop-owned state and re-baseline on the current counter.
    pub fn reset(&mut self) {
        *self = Self::new(self.axis, self.reader);
    }

    #[inline]
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> DirectionMultiplier {
        self.direction
    }

    /// `direction * speed`, recomputed on every call.
    #[inline]
    #[must_use]
    pub fn effective_multiplier(&self) -> i32 {
        self.direction.sign() * self.speed.factor()
    }

    #[inline]
    #[must_use]
    pub fn gamepad_position(&self) -> GamepadPosition {
        self.gamepad_position
    }

    #[inline]
    pub fn gamepad_position_mut(&mut self) -> &mut GamepadPosition {
        &mut self.gamepad_position
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SettingsButton {
        &self.settings
    }

    /// Motion recorded since the last acknowledged sample, if any.
    ///
    /// The counter is sampled exactly once. The returned sample becomes the
    /// next baseline only when passed to [`acknowledge`](Self::acknowledge),
    /// so motion that could not be delivered is offered again.
    #[must_use]
    pub fn pending_motion(&self) -> Option<(AxisMotion, EncoderSample)> {
        let sample = self.reader.sample();
        let delta = sample.counter.wrapping_sub(self.prev_counter);
        if delta == 0 {
            return None;
        }

        debug!(
            "axis {:?}: direction {:?}, counter {=i32}",
            self.axis, sample.direction, sample.counter
        );

        let motion = AxisMotion {
            axis: self.axis,
            scaled_delta: delta.saturating_mul(self.effective_multiplier()),
        };
        Some((motion, sample))
    }

    /// Mark motion up to `sample` as delivered.
    #[inline]
    pub fn acknowledge(&mut self, sample: EncoderSample) {
        self.prev_counter = sample.counter;
    }

    /// Run the settings-button state machine and apply its action.
    pub fn update_settings(
        &mut self,
        edge: Option<Edge>,
        now: Instant,
        config: &ControllerConfig,
    ) -> Option<SettingsAction> {
        let action = self.settings.update(edge, now, config)?;
        match action {
            SettingsAction::ToggleDirection => self.direction = self.direction.toggled(),
            SettingsAction::CycleSpeed => self.speed = self.speed.next(),
        }
        info!(
            "axis {:?}: {:?} -> direction {:?}, speed {=i32}",
            self.axis,
            action,
            self.direction,
            self.speed.factor()
        );
        Some(action)
    }
}
