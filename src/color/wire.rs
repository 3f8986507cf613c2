use super::Rgb;

/// Number of color channels sent for one LED
pub const CHANNELS_PER_LED: usize = 3;

/// Reorder a stored color into the bytes sent on the wire
///
/// WS2812B latches green first, then red, then blue. This is fixed by the chip.
#[inline]
pub const fn to_wire_order(color: Rgb) -> [u8; CHANNELS_PER_LED] {
    [color.g, color.r, color.b]
}
