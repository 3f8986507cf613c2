//! Logical LED chain: pixel colors plus a global brightness.
//!
//! The strip never owns pixel memory. It borrows a caller supplied slice and
//! keeps the colors exactly as written; brightness is applied by the encoder
//! at transmission time only.

use crate::Error;
use crate::color::{BLACK, Rgb};

/// Brightness set at init, low enough to keep a freshly powered strip within
/// a small supply budget
pub const DEFAULT_BRIGHTNESS: u8 = 64;

/// Addressable LED chain state
#[derive(Debug)]
pub struct Strip<'a> {
    pixels: &'a mut [Rgb],
    brightness: u8,
}

impl<'a> Strip<'a> {
    /// Bind the strip to the first `count` entries of `storage`
    ///
    /// If `count` is rejected by [`Strip::check_count`] the strip is left
    /// unbound: it has no LEDs and every pixel operation is a no-op.
    /// All bound pixels are cleared and brightness is set to [`DEFAULT_BRIGHTNESS`].
    pub fn new(storage: &'a mut [Rgb], count: usize, max_leds: usize) -> Self {
        let len = match Self::check_count(count, storage.len(), max_leds) {
            Ok(()) => count,
            Err(_) => 0,
        };
        let mut strip = Self {
            pixels: &mut storage[..len],
            brightness: DEFAULT_BRIGHTNESS,
        };
        strip.clear();
        strip
    }

    /// Validate an LED count against the backing storage and the backend limit
    pub const fn check_count(count: usize, storage_len: usize, max_leds: usize) -> Result<(), Error> {
        if count == 0 || count > max_leds || count > storage_len {
            return Err(Error::LedCount {
                count,
                max: if max_leds < storage_len { max_leds } else { storage_len },
            });
        }
        Ok(())
    }

    /// Number of LEDs, zero for an unbound strip
    pub const fn len(&self) -> usize {
        self.pixels.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Turn every pixel off. Nothing is transmitted.
    pub fn clear(&mut self) {
        self.pixels.fill(BLACK);
    }

    /// Set one pixel, ignoring indices past the end of the strip
    pub fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) {
        self.set_color(index, Rgb { r, g, b });
    }

    /// Set one pixel from a color, ignoring indices past the end of the strip
    pub fn set_color(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    /// Stored color of one pixel, before brightness
    ///
    /// Returns black for indices past the end of the strip.
    pub fn get_pixel(&self, index: usize) -> Rgb {
        self.pixels.get(index).copied().unwrap_or(BLACK)
    }

    /// Set the global brightness, applied on the next transmission
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Stored colors in strip order
    pub fn pixels(&self) -> &[Rgb] {
        &*self.pixels
    }

    /// Mutable access to the stored colors, e.g. for bulk fills
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut *self.pixels
    }
}
