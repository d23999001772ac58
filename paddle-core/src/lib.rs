//! Platform-agnostic encoder/button fusion engine for the paddle controller.
//!
//! This crate turns two rotary encoders and a handful of buttons into mouse
//! or gamepad HID output without any platform-specific dependencies. It can
//! be used both in embedded `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`types`]: Core enums ([`Mode`], [`Axis`], [`Direction`], multipliers)
//! - [`config`]: Compile-time tuning ([`ControllerConfig`])
//! - [`debounce`]: Switch debouncing ([`Debouncer`], [`Edge`])
//! - [`input`]: Pin sampling ([`ButtonPins`], [`InputSample`])
//! - [`quadrature`]: Interrupt-side decoding ([`EncoderCell`], [`QuadratureDecoder`])
//! - [`axis`]: Per-axis motion and sensitivity ([`AxisController`])
//! - [`settings`]: Short/long press classification ([`SettingsButton`])
//! - [`feedback`]: Status LED colors ([`FeedbackLeds`], [`FeedbackSink`])
//! - [`output`]: HID capabilities and mapping ([`HidSink`], [`RelativePointer`], [`AbsoluteGamepad`])
//! - [`controller`]: The per-iteration loop ([`Controller`])
//!
//! # Execution contexts
//!
//! Encoder edges are decoded in interrupt context and only ever touch the
//! axis' [`EncoderCell`]. Everything else is owned by the cooperative loop
//! that calls [`Controller::step`] (or [`Controller::poll`]) once per
//! iteration.
//!
//! # Example
//!
//! ```ignore
//! static ENCODER_X: EncoderCell = EncoderCell::new();
//! static ENCODER_Y: EncoderCell = EncoderCell::new();
//!
//! let (decoder_x, reader_x) = ENCODER_X.split().unwrap();
//! let (decoder_y, reader_y) = ENCODER_Y.split().unwrap();
//! // decoder_x / decoder_y run in the encoder interrupt context.
//!
//! let hid = HidSink::Gamepad(my_gamepad);
//! let config = ControllerConfig::DEFAULT;
//! let mut controller = Controller::new(config, hid, my_leds, reader_x, reader_y);
//! loop {
//!     controller.poll(&mut pins, Instant::now()).await?;
//! }
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible to all modules.
mod fmt;

pub mod axis;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod feedback;
pub mod input;
pub mod output;
pub mod quadrature;
pub mod settings;
pub mod types;

#[cfg(test)]
mod test_util;

// Re-export main types at crate root
pub use axis::{AxisController, AxisMotion};
pub use config::{ControllerConfig, FIRE_BUTTON_COUNT, GAMEPAD_AXIS_MAX, GAMEPAD_AXIS_MIN};
pub use controller::{Controller, ControllerError, ControllerState};
pub use debounce::{Debouncer, Edge};
pub use feedback::{FeedbackLeds, FeedbackSink, Rgb, LED_COUNT};
pub use input::{is_active_low, sample_mode, ButtonPins, InputSample, PinError};
pub use output::{
    AbsoluteGamepad, GamepadButton, GamepadPosition, HidSink, MouseButton, OutputError,
    RelativePointer,
};
pub use quadrature::{CounterReader, EncoderCell, EncoderSample, QuadratureDecoder};
pub use settings::{SettingsAction, SettingsButton};
pub use types::{Axis, Direction, DirectionMultiplier, Mode, SpeedMultiplier};
