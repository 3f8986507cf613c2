//! Frame encoding
//!
//! Turns strip state into the code sequence a transport pushes out. Every
//! encoder goes through the same steps: scale by brightness, reorder to
//! G-R-B, then emit one code per bit, most significant bit first. Only the
//! last step differs between backends.

#[cfg(feature = "pwm-dma")]
pub mod pwm;
#[cfg(feature = "spi")]
pub mod spi;

use crate::color::{CHANNELS_PER_LED, Rgb, to_wire_order};
use crate::math8::scale_color;

/// Protocol bits per LED
pub const BITS_PER_LED: usize = CHANNELS_PER_LED * 8;

/// Encoder for a transport specific frame buffer
///
/// The buffer is rebuilt from scratch on every call.
pub trait FrameEncoder {
    /// One element of the encoded frame
    type Code: Copy;

    /// Encode `pixels` at `brightness` and return the finished frame
    fn encode(&mut self, pixels: &[Rgb], brightness: u8) -> &[Self::Code];

    /// Frame produced by the last call to [`FrameEncoder::encode`]
    fn codes(&self) -> &[Self::Code];
}

/// Bytes sent for one LED: brightness applied, wire order
#[inline]
pub const fn wire_bytes(color: Rgb, brightness: u8) -> [u8; CHANNELS_PER_LED] {
    to_wire_order(scale_color(color, brightness))
}

/// Bits of one byte, most significant first
#[inline]
pub fn byte_bits(byte: u8) -> impl Iterator<Item = bool> {
    (0..8).rev().map(move |shift| byte & (1 << shift) != 0)
}

/// Logical bit stream of a whole frame
///
/// Yields `24 * pixels.len()` bits: LED 0 first, G-R-B per LED, MSB first.
pub fn wire_bits(pixels: &[Rgb], brightness: u8) -> impl Iterator<Item = bool> + '_ {
    pixels
        .iter()
        .flat_map(move |&color| wire_bytes(color, brightness))
        .flat_map(byte_bits)
}
