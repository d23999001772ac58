//! Raw input sampling: active-low pins and the per-cycle input snapshot.

use crate::config::FIRE_BUTTON_COUNT;
use crate::types::{Axis, Mode};
use embedded_hal::digital::InputPin;

/// Error type for pin sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinError;

/// Raw (undebounced) button levels sampled once per loop iteration.
///
/// `true` means the button is currently active (pulled low).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    pub fire: [bool; FIRE_BUTTON_COUNT],
    pub settings: [bool; 2],
    pub center: bool,
}

impl InputSample {
    /// Raw level of the settings button belonging to `axis`.
    #[inline]
    #[must_use]
    pub const fn settings(&self, axis: Axis) -> bool {
        self.settings[axis.index()]
    }
}

/// Read a pulled-up switch: low means active.
#[inline]
pub fn is_active_low<P: InputPin>(pin: &mut P) -> Result<bool, PinError> {
    pin.is_low().map_err(|_| PinError)
}

/// Sample the mode-select line.
pub fn sample_mode<P: InputPin>(pin: &mut P) -> Result<Mode, PinError> {
    is_active_low(pin).map(Mode::from_select_line)
}

/// All button pins of the controller.
///
/// The center button is optional; without it the sample always reports the
/// center button as inactive.
pub struct ButtonPins<P> {
    pub fire: [P; FIRE_BUTTON_COUNT],
    pub settings: [P; 2],
    pub center: Option<P>,
}

impl<P: InputPin> ButtonPins<P> {
    /// Take one raw snapshot of every button.
    pub fn sample(&mut self) -> Result<InputSample, PinError> {
        let mut sample = InputSample::default();

        for (level, pin) in sample.fire.iter_mut().zip(self.fire.iter_mut()) {
            *level = is_active_low(pin)?;
        }
        for (level, pin) in sample.settings.iter_mut().zip(self.settings.iter_mut()) {
            *level = is_active_low(pin)?;
        }
        if let Some(pin) = self.center.as_mut() {
            sample.center = is_active_low(pin)?;
        }

        Ok(sample)
    }
}
