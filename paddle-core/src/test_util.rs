//! Mocks and a minimal executor shared by the unit tests.

extern crate std;

use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::vec::Vec;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use embedded_hal_async::digital::Wait;

use crate::feedback::{FeedbackSink, Rgb, LED_COUNT};
use crate::output::{
    AbsoluteGamepad, GamepadButton, HidSink, MouseButton, OutputError, RelativePointer,
};
use crate::types::Axis;

/// Run a future that never pends to completion.
pub fn block_on<F: Future>(f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = pin!(f);

    match f.as_mut().poll(&mut cx) {
        Poll::Ready(result) => result,
        Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseCall {
    Press(MouseButton),
    Release(MouseButton),
    Move(i32, i32, i32),
}

#[derive(Default)]
pub struct MockMouse {
    pub calls: Vec<MouseCall>,
    pub fail: bool,
}

impl MockMouse {
    fn record(&mut self, call: MouseCall) -> Result<(), OutputError> {
        if self.fail {
            return Err(OutputError::Io);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl RelativePointer for MockMouse {
    async fn press(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.record(MouseCall::Press(button))
    }

    async fn release(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.record(MouseCall::Release(button))
    }

    async fn move_by(&mut self, dx: i32, dy: i32, dz: i32) -> Result<(), OutputError> {
        self.record(MouseCall::Move(dx, dy, dz))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadCall {
    Press(GamepadButton),
    Release(GamepadButton),
    SetAxis(Axis, i16),
    Commit,
}

#[derive(Default)]
pub struct MockGamepad {
    pub calls: Vec<GamepadCall>,
    pub fail: bool,
    /// Reject `set_axis` for this axis only.
    pub fail_axis: Option<Axis>,
}

impl MockGamepad {
    fn record(&mut self, call: GamepadCall) -> Result<(), OutputError> {
        if self.fail {
            return Err(OutputError::NotReady);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl AbsoluteGamepad for MockGamepad {
    async fn press(&mut self, button: GamepadButton) -> Result<(), OutputError> {
        self.record(GamepadCall::Press(button))
    }

    async fn release(&mut self, button: GamepadButton) -> Result<(), OutputError> {
        self.record(GamepadCall::Release(button))
    }

    async fn set_axis(&mut self, axis: Axis, value: i16) -> Result<(), OutputError> {
        if self.fail_axis == Some(axis) {
            return Err(OutputError::NotReady);
        }
        self.record(GamepadCall::SetAxis(axis, value))
    }

    async fn commit(&mut self) -> Result<(), OutputError> {
        self.record(GamepadCall::Commit)
    }
}

pub type Sink = HidSink<MockMouse, MockGamepad>;

#[derive(Default)]
pub struct MockFeedback {
    pub shown: Vec<[Rgb; LED_COUNT]>,
    pub fail: bool,
}

impl FeedbackSink for MockFeedback {
    async fn show(&mut self, colors: &[Rgb; LED_COUNT]) -> Result<(), OutputError> {
        if self.fail {
            return Err(OutputError::Busy);
        }
        self.shown.push(*colors);
        Ok(())
    }
}

/// Input pin with a fixed level, or one that always fails to read.
pub struct MockPin(Option<bool>);

impl MockPin {
    pub fn high() -> Self {
        Self(Some(true))
    }

    pub fn low() -> Self {
        Self(Some(false))
    }

    pub fn broken() -> Self {
        Self(None)
    }
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.ok_or(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Phase-A stand-in whose edges are always already there.
pub struct RisingEdges;

impl ErrorType for RisingEdges {
    type Error = ErrorKind;
}

impl Wait for RisingEdges {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
