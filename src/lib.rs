//! Rotary-encoder paddle controller for RP2040.
//!
//! This crate provides the embedded side of a two-paddle controller that
//! presents itself to the host as either a USB HID mouse or a USB HID
//! gamepad.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Samples the mode-select line once at boot (low = gamepad)
//! 2. Counts quadrature edges of both encoders in interrupt context
//! 3. Polls buttons and encoder counters every millisecond
//! 4. Outputs relative mouse motion or absolute gamepad axes over USB HID
//! 5. Shows per-axis direction and speed on four WS2812 LEDs
//!
//! # Hardware Configuration
//!
//! All inputs are active-low with internal pull-ups.
//!
//! | Function          | GPIO | Description |
//! |-------------------|------|-------------|
//! | Encoder X phase A | 2    | Rising edge triggers a count |
//! | Encoder X phase B | 3    | Level selects direction |
//! | Encoder Y phase A | 4    | Rising edge triggers a count |
//! | Encoder Y phase B | 5    | Level selects direction |
//! | Fire 1..4         | 6-9  | Mouse left/right/middle/back, gamepad 1..4 |
//! | Settings X        | 10   | Short press: reverse, long press: speed |
//! | Settings Y        | 11   | Short press: reverse, long press: speed |
//! | Center            | 12   | Re-center gamepad axes |
//! | Mode select       | 13   | Low = gamepad, high = mouse; change resets |
//! | LED data          | 16   | WS2812 chain (PIO0) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with two executors:
//!
//! - **Interrupt executor** (high priority): one task per encoder waiting
//!   for phase-A edges and updating the shared counter
//! - **Thread executor**: USB stack, controller loop, LED writer, and the
//!   mode-select watcher that resets the chip
//!
//! The controller loop talks to the LED writer through an Embassy
//! [`Signal`](embassy_sync::signal::Signal), so slow LED writes never stall
//! HID output.
//!
//! # Modules
//!
//! - [`usb_output`]: USB HID outputs ([`UsbMouse`], [`UsbGamepad`])
//! - [`leds`]: WS2812 feedback ([`SignalFeedback`], [`run_leds`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`quick-press`**: Shorter settings-button thresholds (60 ms / 500 ms)
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`paddle_core`] that the
//! binary needs, so consumers only need to depend on this crate.

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

// Re-export core types for convenience
pub use paddle_core::{
    sample_mode, ButtonPins, Controller, ControllerConfig, ControllerError, CounterReader,
    EncoderCell, FeedbackSink, HidSink, Mode, OutputError, QuadratureDecoder, LED_COUNT,
};

pub mod leds;
pub mod usb_output;

pub use leds::{run_leds, ColorSignal, SignalFeedback, LED_BRIGHTNESS};
pub use usb_output::{
    configure_gamepad_hid, configure_mouse_hid, GamepadReport, UsbGamepad, UsbMouse,
};

/// Controller timing selected at build time.
#[cfg(not(feature = "quick-press"))]
pub const CONTROLLER_CONFIG: ControllerConfig = ControllerConfig::DEFAULT;

/// Controller timing selected at build time.
#[cfg(feature = "quick-press")]
pub const CONTROLLER_CONFIG: ControllerConfig = ControllerConfig::QUICK;

/// HID sink type used by the firmware.
pub type PaddleHid = HidSink<UsbMouse<'static>, UsbGamepad<'static>>;

/// Wait until the selected HID interface is enumerated.
pub async fn wait_hid_ready(hid: &mut PaddleHid) {
    match hid {
        HidSink::Mouse(mouse) => mouse.wait_ready().await,
        HidSink::Gamepad(pad) => pad.wait_ready().await,
    }
}
