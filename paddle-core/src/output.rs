//! HID output capabilities and the mode-dependent output mapper.
//!
//! The controller talks to the host through one of two capability sets:
//! [`RelativePointer`] in mouse mode and [`AbsoluteGamepad`] in gamepad
//! mode. [`HidSink`] holds exactly one of them for the lifetime of the
//! process, so calls for the inactive mode cannot be expressed.

use core::future::Future;

use crate::axis::AxisMotion;
use crate::config::{ControllerConfig, FIRE_BUTTON_COUNT, GAMEPAD_AXIS_MAX, GAMEPAD_AXIS_MIN};
use crate::types::{Axis, Mode};

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
    /// Report dropped (e.g., host not polling fast enough).
    Dropped,
    /// Endpoint busy.
    Busy,
}

/// Mouse buttons the fire buttons can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
}

impl MouseButton {
    /// Bit of this button in a HID mouse report.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u8 {
        match self {
            MouseButton::Left => 1 << 0,
            MouseButton::Right => 1 << 1,
            MouseButton::Middle => 1 << 2,
            MouseButton::Back => 1 << 3,
        }
    }
}

/// Gamepad button number, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GamepadButton(pub u8);

/// Fire button index -> mouse button.
pub const FIRE_MOUSE_BUTTONS: [MouseButton; FIRE_BUTTON_COUNT] = [
    MouseButton::Left,
    MouseButton::Right,
    MouseButton::Middle,
    MouseButton::Back,
];

/// Fire button index -> gamepad button.
pub const FIRE_GAMEPAD_BUTTONS: [GamepadButton; FIRE_BUTTON_COUNT] = [
    GamepadButton(1),
    GamepadButton(2),
    GamepadButton(3),
    GamepadButton(4),
];

/// Relative pointer capability (mouse mode).
pub trait RelativePointer {
    fn press(&mut self, button: MouseButton) -> impl Future<Output = Result<(), OutputError>>;

    fn release(&mut self, button: MouseButton) -> impl Future<Output = Result<(), OutputError>>;

    /// Emit a one-shot relative displacement.
    fn move_by(&mut self, dx: i32, dy: i32, dz: i32)
        -> impl Future<Output = Result<(), OutputError>>;
}

/// Absolute gamepad capability (gamepad mode).
///
/// Axis writes and button changes are staged by the transport and sent
/// together on [`commit`](Self::commit).
pub trait AbsoluteGamepad {
    fn press(&mut self, button: GamepadButton) -> impl Future<Output = Result<(), OutputError>>;

    fn release(&mut self, button: GamepadButton)
        -> impl Future<Output = Result<(), OutputError>>;

    fn set_axis(&mut self, axis: Axis, value: i16)
        -> impl Future<Output = Result<(), OutputError>>;

    fn commit(&mut self) -> impl Future<Output = Result<(), OutputError>>;
}

/// Absolute gamepad position of one axis, always within
/// [`GAMEPAD_AXIS_MIN`, `GAMEPAD_AXIS_MAX`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GamepadPosition(i16);

impl GamepadPosition {
    pub const CENTER: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn value(self) -> i16 {
        self.0
    }

    /// Add `delta` and saturate at the axis bounds.
    pub fn accumulate(&mut self, delta: i32) -> i16 {
        let next = i32::from(self.0)
            .saturating_add(delta)
            .clamp(i32::from(GAMEPAD_AXIS_MIN), i32::from(GAMEPAD_AXIS_MAX));
        // In range after the clamp above.
        self.0 = next as i16;
        self.0
    }

    #[inline]
    pub fn center(&mut self) {
        *self = Self::CENTER;
    }
}

/// The HID capability set selected for this boot.
pub enum HidSink<M, G> {
    Mouse(M),
    Gamepad(G),
}

impl<M: RelativePointer, G: AbsoluteGamepad> HidSink<M, G> {
    /// Mode implied by the selected capability set.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            HidSink::Mouse(_) => Mode::Mouse,
            HidSink::Gamepad(_) => Mode::Gamepad,
        }
    }

    /// Forward a fire-button press.
    pub async fn press_fire(&mut self, index: usize) -> Result<(), OutputError> {
        match self {
            HidSink::Mouse(mouse) => mouse.press(FIRE_MOUSE_BUTTONS[index]).await,
            HidSink::Gamepad(pad) => pad.press(FIRE_GAMEPAD_BUTTONS[index]).await,
        }
    }

    /// Forward a fire-button release.
    pub async fn release_fire(&mut self, index: usize) -> Result<(), OutputError> {
        match self {
            HidSink::Mouse(mouse) => mouse.release(FIRE_MOUSE_BUTTONS[index]).await,
            HidSink::Gamepad(pad) => pad.release(FIRE_GAMEPAD_BUTTONS[index]).await,
        }
    }

    /// Map one axis' scaled motion onto the active output.
    ///
    /// Mouse mode emits a relative move and leaves `position` untouched.
    /// Gamepad mode accumulates into `position`, clamps, and stages the new
    /// absolute value. `position` only changes once the value is staged.
    pub async fn emit_motion(
        &mut self,
        motion: AxisMotion,
        position: &mut GamepadPosition,
        config: &ControllerConfig,
    ) -> Result<(), OutputError> {
        match self {
            HidSink::Mouse(mouse) => {
                let step = motion.scaled_delta.saturating_mul(config.mouse_step_base);
                match motion.axis {
                    Axis::X => mouse.move_by(step, 0, 0).await,
                    Axis::Y => mouse.move_by(0, step, 0).await,
                }
            }
            HidSink::Gamepad(pad) => {
                let step = motion.scaled_delta.saturating_mul(config.gamepad_step_base);
                let mut next = *position;
                let value = next.accumulate(step);
                pad.set_axis(motion.axis, value).await?;
                *position = next;
                Ok(())
            }
        }
    }

    /// Re-center both gamepad axes. No effect in mouse mode.
    ///
    /// The positions are only reset once both axes are staged.
    pub async fn center(
        &mut self,
        positions: [&mut GamepadPosition; 2],
    ) -> Result<(), OutputError> {
        let HidSink::Gamepad(pad) = self else {
            return Ok(());
        };

        for axis in Axis::ALL {
            pad.set_axis(axis, GamepadPosition::CENTER.value()).await?;
        }
        for position in positions {
            position.center();
        }
        Ok(())
    }

    /// Flush staged gamepad state. No effect in mouse mode.
    pub async fn commit(&mut self) -> Result<(), OutputError> {
        match self {
            HidSink::Mouse(_) => Ok(()),
            HidSink::Gamepad(pad) => pad.commit().await,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::test_util::{block_on, GamepadCall, MockGamepad, MockMouse, MouseCall, Sink};
    use std::vec;

    fn motion(axis: Axis, scaled_delta: i32) -> AxisMotion {
        AxisMotion { axis, scaled_delta }
    }

    #[test]
    fn test_position_clamps_high() {
        let mut position = GamepadPosition::default();
        for _ in 0..100 {
            position.accumulate(1000);
            assert!(position.value() <= GAMEPAD_AXIS_MAX);
        }
        assert_eq!(position.value(), GAMEPAD_AXIS_MAX);
    }

    #[test]
    fn test_position_clamps_low() {
        let mut position = GamepadPosition::default();
        for _ in 0..100 {
            position.accumulate(-1000);
            assert!(position.value() >= GAMEPAD_AXIS_MIN);
        }
        assert_eq!(position.value(), GAMEPAD_AXIS_MIN);
    }

    #[test]
    fn test_position_survives_extreme_delta() {
        let mut position = GamepadPosition::default();
        assert_eq!(position.accumulate(i32::MAX), GAMEPAD_AXIS_MAX);
        assert_eq!(position.accumulate(i32::MIN), GAMEPAD_AXIS_MIN);
    }

    #[test]
    fn test_mouse_motion_is_relative() {
        let mut sink: Sink = HidSink::Mouse(MockMouse::default());
        let mut position = GamepadPosition::default();
        let config = ControllerConfig::DEFAULT;

        block_on(sink.emit_motion(motion(Axis::X, 10), &mut position, &config)).unwrap();
        block_on(sink.emit_motion(motion(Axis::Y, -4), &mut position, &config)).unwrap();

        let HidSink::Mouse(mouse) = &sink else {
            panic!("mouse sink expected");
        };
        assert_eq!(
            mouse.calls,
            vec![MouseCall::Move(10, 0, 0), MouseCall::Move(0, -4, 0)]
        );
        assert_eq!(position, GamepadPosition::CENTER);
    }

    #[test]
    fn test_gamepad_motion_accumulates() {
        let mut sink: Sink = HidSink::Gamepad(MockGamepad::default());
        let mut position = GamepadPosition::default();
        let config = ControllerConfig {
            gamepad_step_base: 40,
            ..ControllerConfig::DEFAULT
        };

        block_on(sink.emit_motion(motion(Axis::Y, 9), &mut position, &config)).unwrap();
        block_on(sink.emit_motion(motion(Axis::Y, -2), &mut position, &config)).unwrap();

        assert_eq!(position.value(), 280);
        let HidSink::Gamepad(pad) = &sink else {
            panic!("gamepad sink expected");
        };
        assert_eq!(
            pad.calls,
            vec![GamepadCall::SetAxis(Axis::Y, 360), GamepadCall::SetAxis(Axis::Y, 280)]
        );
    }

    #[test]
    fn test_rejected_gamepad_motion_keeps_position() {
        let mut sink: Sink = HidSink::Gamepad(MockGamepad {
            fail: true,
            ..MockGamepad::default()
        });
        let mut position = GamepadPosition::default();
        position.accumulate(100);
        let config = ControllerConfig::DEFAULT;

        assert_eq!(
            block_on(sink.emit_motion(motion(Axis::X, 4), &mut position, &config)),
            Err(OutputError::NotReady)
        );
        assert_eq!(position.value(), 100);

        let mut other = GamepadPosition::default();
        assert_eq!(
            block_on(sink.center([&mut position, &mut other])),
            Err(OutputError::NotReady)
        );
        assert_eq!(position.value(), 100);
    }

    #[test]
    fn test_center_only_in_gamepad_mode() {
        let mut x = GamepadPosition::default();
        let mut y = GamepadPosition::default();
        x.accumulate(1234);
        y.accumulate(-99);

        let mut mouse: Sink = HidSink::Mouse(MockMouse::default());
        block_on(mouse.center([&mut x, &mut y])).unwrap();
        assert_eq!((x.value(), y.value()), (1234, -99));

        let mut pad: Sink = HidSink::Gamepad(MockGamepad::default());
        block_on(pad.center([&mut x, &mut y])).unwrap();
        assert_eq!((x.value(), y.value()), (0, 0));
        let HidSink::Gamepad(pad) = &pad else {
            panic!("gamepad sink expected");
        };
        assert_eq!(
            pad.calls,
            vec![GamepadCall::SetAxis(Axis::X, 0), GamepadCall::SetAxis(Axis::Y, 0)]
        );
    }

    #[test]
    fn test_fire_button_mapping() {
        let mut mouse: Sink = HidSink::Mouse(MockMouse::default());
        block_on(mouse.press_fire(1)).unwrap();
        block_on(mouse.release_fire(1)).unwrap();
        let HidSink::Mouse(m) = &mouse else {
            panic!("mouse sink expected");
        };
        assert_eq!(
            m.calls,
            vec![MouseCall::Press(MouseButton::Right), MouseCall::Release(MouseButton::Right)]
        );

        let mut pad: Sink = HidSink::Gamepad(MockGamepad::default());
        block_on(pad.press_fire(3)).unwrap();
        let HidSink::Gamepad(p) = &pad else {
            panic!("gamepad sink expected");
        };
        assert_eq!(p.calls, vec![GamepadCall::Press(GamepadButton(4))]);
    }

    #[test]
    fn test_commit_is_gamepad_only() {
        let mut mouse: Sink = HidSink::Mouse(MockMouse::default());
        block_on(mouse.commit()).unwrap();
        let HidSink::Mouse(m) = &mouse else {
            panic!("mouse sink expected");
        };
        assert!(m.calls.is_empty());

        let mut pad: Sink = HidSink::Gamepad(MockGamepad::default());
        block_on(pad.commit()).unwrap();
        let HidSink::Gamepad(p) = &pad else {
            panic!("gamepad sink expected");
        };
        assert_eq!(p.calls, vec![GamepadCall::Commit]);
    }
}
