use smart_leds::SmartLedsWrite;

use crate::color::{BLACK, Rgb};
use crate::strip::Strip;
use crate::{Error, Transport};

/// Check an LED count the way [`Ws2812::new`] does, but report the reason
///
/// `new` silently falls back to an unbound driver on a bad count; call this
/// first when a diagnostic is needed.
pub const fn check_led_count<T: Transport>(count: usize, storage_len: usize) -> Result<(), Error> {
    Strip::check_count(count, storage_len, T::MAX_LEDS)
}

/// WS2812B strip driver
///
/// Owns the strip state and a [`Transport`]. Setters only touch the stored
/// colors; nothing reaches the LEDs until [`Ws2812::show`].
pub struct Ws2812<'a, T: Transport> {
    strip: Strip<'a>,
    transport: T,
}

impl<'a, T: Transport> Ws2812<'a, T> {
    /// Bind `count` LEDs of `storage` and set up the transport
    ///
    /// A zero count, or one above the backend limit or the storage length,
    /// gives an unbound driver: no LEDs, no hardware touched, and every
    /// later call is a no-op. Pixels start off and brightness starts at
    /// [`DEFAULT_BRIGHTNESS`](crate::DEFAULT_BRIGHTNESS).
    pub fn new(mut transport: T, storage: &'a mut [Rgb], count: usize) -> Result<Self, Error> {
        let strip = Strip::new(storage, count, T::MAX_LEDS);
        if strip.is_empty() {
            #[cfg(feature = "log")]
            log::warn!("ws2812: LED count {} rejected, driver left unbound", count);
        } else {
            transport.setup()?;
        }
        Ok(Self { strip, transport })
    }

    /// Whether the driver holds any LEDs
    pub const fn is_bound(&self) -> bool {
        !self.strip.is_empty()
    }

    pub const fn len(&self) -> usize {
        self.strip.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.strip.is_empty()
    }

    pub fn clear(&mut self) {
        self.strip.clear();
    }

    pub fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) {
        self.strip.set_pixel(index, r, g, b);
    }

    pub fn set_color(&mut self, index: usize, color: Rgb) {
        self.strip.set_color(index, color);
    }

    pub fn get_pixel(&self, index: usize) -> Rgb {
        self.strip.get_pixel(index)
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.strip.set_brightness(brightness);
    }

    pub const fn brightness(&self) -> u8 {
        self.strip.brightness()
    }

    /// Send the current pixels to the strip
    ///
    /// Blocks until the frame and the latch gap after it are on the wire.
    /// An unbound driver returns `Ok(())` without touching the transport.
    pub fn show(&mut self) -> Result<(), Error> {
        let count = self.strip.len();
        if count == 0 || count > T::MAX_LEDS {
            return Ok(());
        }
        self.transport
            .transmit(self.strip.pixels(), self.strip.brightness())
    }

    /// Hold the line idle for one latch period, keeping the pixels
    pub fn reset(&mut self) -> Result<(), Error> {
        if !self.is_bound() {
            return Ok(());
        }
        self.transport.reset()
    }

    pub const fn strip(&self) -> &Strip<'a> {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut Strip<'a> {
        &mut self.strip
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Drop the strip binding and give back the transport
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T: Transport> SmartLedsWrite for Ws2812<'_, T> {
    type Error = Error;
    type Color = Rgb;

    /// Load the strip from `iterator` and show it
    ///
    /// Colors fill the strip from LED 0; LEDs the iterator does not reach are
    /// turned off and extra colors are dropped.
    fn write<I, C>(&mut self, iterator: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = C>,
        C: Into<Self::Color>,
    {
        let pixels = self.strip.pixels_mut();
        let mut written = 0;
        for (pixel, color) in pixels.iter_mut().zip(iterator) {
            *pixel = color.into();
            written += 1;
        }
        pixels[written..].fill(BLACK);

        self.show()
    }
}
