use crate::color::Rgb;

/// Full scale, leaves a channel untouched
pub const FULL_SCALE: u8 = 255;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Rounds half up with integer math only: `(value * scale + 127) / 255`.
/// Unlike the `>> 8` shortcut this keeps `scale8(v, 255) == v` for every `v`.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * scale as u16 + 127) / 255) as u8
}

/// Scale every channel of a color by the global brightness
///
/// Full brightness returns the color as is.
#[inline]
pub const fn scale_color(color: Rgb, brightness: u8) -> Rgb {
    if brightness == FULL_SCALE {
        return color;
    }
    Rgb {
        r: scale8(color.r, brightness),
        g: scale8(color.g, brightness),
        b: scale8(color.b, brightness),
    }
}
