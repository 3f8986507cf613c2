//! Oversampled byte frame for the SPI backend.
//!
//! Every protocol bit becomes four MOSI bits. At 3 MHz a 0 is 333 ns high and
//! 1 µs low, a 1 is 1 µs high and 333 ns low. Two codes share a byte, the
//! earlier bit in the high nibble, so one LED takes 12 bytes.

use heapless::Vec;

use super::{BITS_PER_LED, FrameEncoder, wire_bytes};
use crate::color::Rgb;

/// Most LEDs one SPI frame can hold
pub const SPI_MAX_LEDS: usize = 32;

/// MOSI pattern of a 0 bit
pub const CODE0: u8 = 0b1000;
/// MOSI pattern of a 1 bit
pub const CODE1: u8 = 0b1110;

/// Encoded bytes per LED
pub const BYTES_PER_LED: usize = BITS_PER_LED / 2;

/// Capacity of the byte buffer
pub const SPI_FRAME_BYTES: usize = SPI_MAX_LEDS * BYTES_PER_LED;

#[inline]
const fn code(bit: bool) -> u8 {
    if bit { CODE1 } else { CODE0 }
}

/// Pack the two most significant bits of `value` into one byte
#[inline]
const fn pack_pair(value: u8) -> u8 {
    (code(value & 0x80 != 0) << 4) | code(value & 0x40 != 0)
}

/// Expand one wire byte into its four SPI bytes
pub const fn expand_byte(mut value: u8) -> [u8; 4] {
    let mut out = [0; 4];
    let mut i = 0;
    while i < out.len() {
        out[i] = pack_pair(value);
        value <<= 2;
        i += 1;
    }
    out
}

/// SPI bytes for one frame, latch blocks excluded
#[derive(Debug, Clone, Default)]
pub struct SpiFrame {
    bytes: Vec<u8, SPI_FRAME_BYTES>,
}

impl SpiFrame {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }
}

impl FrameEncoder for SpiFrame {
    type Code = u8;

    fn encode(&mut self, pixels: &[Rgb], brightness: u8) -> &[u8] {
        let pixels = &pixels[..pixels.len().min(SPI_MAX_LEDS)];

        self.bytes.clear();
        for &color in pixels {
            for channel in wire_bytes(color, brightness) {
                self.bytes.extend(expand_byte(channel));
            }
        }
        &self.bytes
    }

    fn codes(&self) -> &[u8] {
        &self.bytes
    }
}

const fn decode_nibble(nibble: u8) -> Option<bool> {
    match nibble {
        CODE1 => Some(true),
        CODE0 => Some(false),
        _ => None,
    }
}

/// Map SPI bytes back to protocol bits, two per byte
///
/// Yields `None` for a nibble that is neither code.
pub fn decode_bytes(bytes: &[u8]) -> impl Iterator<Item = Option<bool>> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| [decode_nibble(byte >> 4), decode_nibble(byte & 0x0F)])
}
