//! The cooperative controller loop.
//!
//! [`Controller::step`] runs one iteration: debounce every button, forward
//! fire buttons, handle the center button, run both settings machines, push
//! feedback colors, map encoder motion, and commit the gamepad report.

use embassy_time::Instant;
use embedded_hal::digital::InputPin;

use crate::axis::AxisController;
use crate::config::{ControllerConfig, FIRE_BUTTON_COUNT};
use crate::debounce::{Debouncer, Edge};
use crate::feedback::{FeedbackLeds, FeedbackSink};
use crate::input::{ButtonPins, InputSample, PinError};
use crate::output::{AbsoluteGamepad, HidSink, OutputError, RelativePointer};
use crate::quadrature::CounterReader;
use crate::settings::SettingsAction;
use crate::types::{Axis, Mode};

/// Error type for controller iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Error from the HID sink.
    Hid(OutputError),
    /// Error from the feedback LED sink.
    Feedback(OutputError),
    /// Error sampling the button pins.
    Pin(PinError),
}

impl From<PinError> for ControllerError {
    fn from(err: PinError) -> Self {
        ControllerError::Pin(err)
    }
}

/// Everything the loop owns about the controller: mode, both axes and the
/// LED colors.
pub struct ControllerState<'a> {
    mode: Mode,
    axes: [AxisController<'a>; 2],
    feedback: FeedbackLeds,
}

impl<'a> ControllerState<'a> {
    #[must_use]
    pub fn new(mode: Mode, x: CounterReader<'a>, y: CounterReader<'a>) -> Self {
        Self {
            mode,
            axes: [AxisController::new(Axis::X, x), AxisController::new(Axis::Y, y)],
            feedback: FeedbackLeds::new(),
        }
    }

    /// Return to power-on state in `mode`.
    pub fn reset(&mut self, mode: Mode) {
        self.mode = mode;
        for axis in &mut self.axes {
            axis.reset();
        }
        self.feedback = FeedbackLeds::new();
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisController<'a> {
        &self.axes[axis.index()]
    }
}

/// Drives the fusion engine once per loop iteration.
pub struct Controller<'a, M, G, F> {
    config: ControllerConfig,
    state: ControllerState<'a>,
    fire: [Debouncer; FIRE_BUTTON_COUNT],
    settings: [Debouncer; 2],
    center: Debouncer,
    hid: HidSink<M, G>,
    feedback_sink: F,
}

impl<'a, M, G, F> Controller<'a, M, G, F>
where
    M: RelativePointer,
    G: AbsoluteGamepad,
    F: FeedbackSink,
{
    /// Create a controller. The mode follows the HID capability set passed in.
    pub fn new(
        config: ControllerConfig,
        hid: HidSink<M, G>,
        feedback_sink: F,
        x: CounterReader<'a>,
        y: CounterReader<'a>,
    ) -> Self {
        let mode = hid.mode();
        info!("controller starting in {:?} mode", mode);

        Self {
            config,
            state: ControllerState::new(mode, x, y),
            fire: [Debouncer::new(config.debounce); FIRE_BUTTON_COUNT],
            settings: [Debouncer::new(config.debounce); 2],
            center: Debouncer::new(config.debounce),
            hid,
            feedback_sink,
        }
    }

    /// Re-initialize everything the loop owns with a freshly selected HID
    /// capability set.
    ///
    /// Motion recorded by the encoders before this call is discarded. The
    /// encoder counters themselves are left untouched. Returns the previous
    /// HID sink.
    pub fn restart(&mut self, hid: HidSink<M, G>) -> HidSink<M, G> {
        let mode = hid.mode();
        info!("controller restarting in {:?} mode", mode);

        let previous = core::mem::replace(&mut self.hid, hid);
        self.state.reset(mode);
        self.fire = [Debouncer::new(self.config.debounce); FIRE_BUTTON_COUNT];
        self.settings = [Debouncer::new(self.config.debounce); 2];
        self.center = Debouncer::new(self.config.debounce);
        previous
    }

    /// Sample the button pins and run one iteration.
    pub async fn poll<P: InputPin>(
        &mut self,
        pins: &mut ButtonPins<P>,
        now: Instant,
    ) -> Result<(), ControllerError> {
        let sample = pins.sample()?;
        self.step(&sample, now).await
    }

    /// Run one loop iteration on a raw input snapshot taken at `now`.
    ///
    /// A failed output does not cut the iteration short: every stage still
    /// runs, the gamepad report is still committed, and the first error is
    /// returned. A fire or center edge that could not be delivered is
    /// reported again next iteration; undelivered motion stays pending.
    pub async fn step(&mut self, input: &InputSample, now: Instant) -> Result<(), ControllerError> {
        let mut first_error = None;

        for (index, button) in self.fire.iter_mut().enumerate() {
            let result = match button.update(input.fire[index], now) {
                Some(Edge::Pressed) => {
                    trace!("fire {=usize} pressed", index);
                    self.hid.press_fire(index).await
                }
                Some(Edge::Released) => {
                    trace!("fire {=usize} released", index);
                    self.hid.release_fire(index).await
                }
                None => continue,
            };
            if let Err(e) = result {
                warn!("fire {=usize} not delivered: {:?}", index, e);
                button.revert();
                first_error.get_or_insert(ControllerError::Hid(e));
            }
        }

        if self.center.update(input.center, now) == Some(Edge::Pressed) {
            debug!("center pressed");
            let [x, y] = &mut self.state.axes;
            if let Err(e) = self
                .hid
                .center([x.gamepad_position_mut(), y.gamepad_position_mut()])
                .await
            {
                warn!("center not delivered: {:?}", e);
                self.center.revert();
                first_error.get_or_insert(ControllerError::Hid(e));
            }
        }

        for axis in Axis::ALL {
            let edge = self.settings[axis.index()].update(input.settings(axis), now);
            let controller = &mut self.state.axes[axis.index()];
            match controller.update_settings(edge, now, &self.config) {
                Some(SettingsAction::ToggleDirection) => {
                    self.state.feedback.set_direction(axis, controller.direction());
                }
                Some(SettingsAction::CycleSpeed) => {
                    self.state.feedback.set_speed(axis, controller.speed());
                }
                None => {}
            }
        }

        if let Some(colors) = self.state.feedback.take_pending() {
            if let Err(e) = self.feedback_sink.show(&colors).await {
                self.state.feedback.mark_pending();
                first_error.get_or_insert(ControllerError::Feedback(e));
            }
        }

        for axis in &mut self.state.axes {
            let Some((motion, sample)) = axis.pending_motion() else {
                continue;
            };
            match self.hid.emit_motion(motion, axis.gamepad_position_mut(), &self.config).await {
                Ok(()) => axis.acknowledge(sample),
                Err(e) => {
                    first_error.get_or_insert(ControllerError::Hid(e));
                }
            }
        }

        if let Err(e) = self.hid.commit().await {
            first_error.get_or_insert(ControllerError::Hid(e));
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ControllerState<'a> {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn hid(&self) -> &HidSink<M, G> {
        &self.hid
    }

    #[inline]
    pub fn hid_mut(&mut self) -> &mut HidSink<M, G> {
        &mut self.hid
    }

    #[inline]
    #[must_use]
    pub fn feedback_sink(&self) -> &F {
        &self.feedback_sink
    }

    #[inline]
    pub fn feedback_sink_mut(&mut self) -> &mut F {
        &mut self.feedback_sink
    }
}
