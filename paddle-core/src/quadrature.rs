//! Quadrature decoding shared between the encoder interrupt and the loop.
//!
//! Each axis owns one [`EncoderCell`]. The cell is split exactly once into a
//! [`QuadratureDecoder`], the only handle that can change the counter, and a
//! [`CounterReader`], which can only sample it. The decoder lives in the
//! interrupt context, the reader in the controller loop.

use crate::input::PinError;
use crate::types::Direction;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;
use portable_atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};

/// Interrupt-writable state of one encoder axis.
///
/// Intended to live in a `static`:
///
/// ```
/// use paddle_core::EncoderCell;
///
/// static ENCODER_X: EncoderCell = EncoderCell::new();
///
/// let (decoder, reader) = ENCODER_X.split().unwrap();
/// decoder.on_rising_edge(false);
/// assert_eq!(reader.sample().counter, 1);
/// assert!(ENCODER_X.split().is_none());
/// ```
pub struct EncoderCell {
    counter: AtomicI32,
    direction: AtomicU8,
    taken: AtomicBool,
}

impl EncoderCell {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicI32::new(0),
            direction: AtomicU8::new(Direction::Clockwise as u8),
            taken: AtomicBool::new(false),
        }
    }

    /// Split the cell into its writer and reader halves.
    ///
    /// Returns `None` if the cell was already split.
    pub fn split(&self) -> Option<(QuadratureDecoder<'_>, CounterReader<'_>)> {
        if self.taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some((QuadratureDecoder { cell: self }, CounterReader { cell: self }))
    }
}

impl Default for EncoderCell {
    fn default() -> Self {
        Self::new()
    }
}

/// One consistent read of an encoder cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderSample {
    pub counter: i32,
    /// Direction of the most recent edge. Diagnostic only.
    pub direction: Direction,
}

/// Writer half of an [`EncoderCell`]. Runs in interrupt context.
pub struct QuadratureDecoder<'a> {
    cell: &'a EncoderCell,
}

impl QuadratureDecoder<'_> {
    /// Record one rising edge of phase A.
    ///
    /// Phase B high means counter-clockwise, low means clockwise. Constant
    /// time and lock-free.
    #[inline]
    pub fn on_rising_edge(&self, phase_b_high: bool) -> Direction {
        let direction = if phase_b_high {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        };

        self.cell.direction.store(direction as u8, Ordering::Relaxed);
        self.cell.counter.fetch_add(direction.step(), Ordering::Release);
        direction
    }

    /// Wait for the next rising edge of phase A and decode it.
    pub async fn next_edge<A, B>(
        &self,
        phase_a: &mut A,
        phase_b: &mut B,
    ) -> Result<Direction, PinError>
    where
        A: Wait,
        B: InputPin,
    {
        phase_a.wait_for_rising_edge().await.map_err(|_| PinError)?;
        let phase_b_high = phase_b.is_high().map_err(|_| PinError)?;
        Ok(self.on_rising_edge(phase_b_high))
    }

    /// Decode edges forever.
    ///
    /// Pin errors drop the affected edge and are logged.
    pub async fn run<A, B>(&self, mut phase_a: A, mut phase_b: B) -> !
    where
        A: Wait,
        B: InputPin,
    {
        loop {
            match self.next_edge(&mut phase_a, &mut phase_b).await {
                Ok(direction) => trace!("encoder edge: {:?}", direction),
                Err(e) => warn!("encoder pin error: {:?}", e),
            }
        }
    }
}

/// Reader half of an [`EncoderCell`]. Used by the controller loop.
#[derive(Clone, Copy)]
pub struct CounterReader<'a> {
    cell: &'a EncoderCell,
}

impl CounterReader<'_> {
    /// Sample the counter and last direction once.
    #[inline]
    #[must_use]
    pub fn sample(&self) -> EncoderSample {
        let counter = self.cell.counter.load(Ordering::Acquire);
        let direction = Direction::from_raw(self.cell.direction.load(Ordering::Relaxed));
        EncoderSample { counter, direction }
    }
}
