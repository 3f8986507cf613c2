//! Duty cycle frame for the timer + DMA backend.
//!
//! One 16-bit compare value per protocol bit. The frame is wrapped in one
//! zero-bit slot at each end: the first one covers the period in which the
//! timer starts, the last one is on the line while the stream winds down.

use heapless::Vec;

use super::{BITS_PER_LED, FrameEncoder, wire_bits};
use crate::color::Rgb;
use crate::config::PwmTiming;

/// Most LEDs one PWM frame can hold
pub const PWM_MAX_LEDS: usize = 34;

/// Leading and trailing zero-bit slots
pub const GUARD_SLOTS: usize = 2;

/// Capacity of the duty buffer
pub const PWM_FRAME_SLOTS: usize = PWM_MAX_LEDS * BITS_PER_LED + GUARD_SLOTS;

/// Compare values for one frame
#[derive(Debug, Clone)]
pub struct PwmFrame {
    timing: PwmTiming,
    slots: Vec<u16, PWM_FRAME_SLOTS>,
}

impl PwmFrame {
    pub const fn new(timing: PwmTiming) -> Self {
        Self {
            timing,
            slots: Vec::new(),
        }
    }

    pub const fn timing(&self) -> PwmTiming {
        self.timing
    }

    /// Compare values between the guard slots
    pub fn data_slots(&self) -> &[u16] {
        match self.slots.len() {
            0 => &[],
            len => &self.slots[1..len - 1],
        }
    }
}

impl FrameEncoder for PwmFrame {
    type Code = u16;

    fn encode(&mut self, pixels: &[Rgb], brightness: u8) -> &[u16] {
        let pixels = &pixels[..pixels.len().min(PWM_MAX_LEDS)];
        let timing = self.timing;
        let guard = timing.duty(false);

        self.slots.clear();
        self.slots.extend(
            core::iter::once(guard)
                .chain(wire_bits(pixels, brightness).map(|bit| timing.duty(bit)))
                .chain(core::iter::once(guard)),
        );
        &self.slots
    }

    fn codes(&self) -> &[u16] {
        &self.slots
    }
}

/// Map compare values back to protocol bits
///
/// Yields `None` for any value that is neither the 0 nor the 1 duty.
pub fn decode_duties(duties: &[u16], timing: PwmTiming) -> impl Iterator<Item = Option<bool>> + '_ {
    duties.iter().map(move |&duty| timing.bit(duty))
}
