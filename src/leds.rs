//! WS2812 status LEDs driven from a PIO state machine.
//!
//! The controller loop never waits on the LED chain: [`SignalFeedback`]
//! hands the latest colors to [`run_leds`] through a [`Signal`], and only
//! the newest set is ever written out.

use embassy_rp::pio::Instance;
use embassy_rp::pio_programs::ws2812::PioWs2812;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use paddle_core::{FeedbackSink, OutputError, Rgb, LED_COUNT};
use smart_leds::RGB8;

/// Global brightness applied to every LED (0-255).
pub const LED_BRIGHTNESS: u8 = 32;

/// Latest colors waiting to be written to the chain.
pub type ColorSignal = Signal<CriticalSectionRawMutex, [Rgb; LED_COUNT]>;

/// Scale a color by `brightness / 256`, as the WS2812 chain's global
/// brightness.
#[must_use]
pub fn dim(color: Rgb, brightness: u8) -> RGB8 {
    let scale = |c: u8| ((u16::from(c) * (u16::from(brightness) + 1)) >> 8) as u8;
    RGB8::new(scale(color.r), scale(color.g), scale(color.b))
}

/// [`FeedbackSink`] that forwards colors to the LED task.
pub struct SignalFeedback {
    signal: &'static ColorSignal,
}

impl SignalFeedback {
    pub fn new(signal: &'static ColorSignal) -> Self {
        Self { signal }
    }
}

impl FeedbackSink for SignalFeedback {
    async fn show(&mut self, colors: &[Rgb; LED_COUNT]) -> Result<(), OutputError> {
        self.signal.signal(*colors);
        Ok(())
    }
}

/// Write every signaled color set to the chain.
pub async fn run_leds<P: Instance, const S: usize>(
    ws2812: &mut PioWs2812<'_, P, S, LED_COUNT>,
    signal: &'static ColorSignal,
) -> ! {
    loop {
        let colors = signal.wait().await;
        let pixels = colors.map(|c| dim(c, LED_BRIGHTNESS));
        ws2812.write(&pixels).await;
    }
}
