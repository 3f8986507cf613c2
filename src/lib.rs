#![no_std]

pub mod color;
pub mod config;
mod driver;
pub mod encoder;
mod error;
#[cfg(feature = "pwm-dma")]
pub mod hal;
pub mod math8;
pub mod strip;
pub mod transport;

pub use config::{PwmConfig, PwmTiming, SpiConfig, TransferTimeout};
pub use driver::{Ws2812, check_led_count};
pub use encoder::{BITS_PER_LED, FrameEncoder, wire_bits};
pub use error::Error;
pub use strip::{DEFAULT_BRIGHTNESS, Strip};

#[cfg(feature = "pwm-dma")]
pub use transport::{LineState, PwmDmaTransport};
#[cfg(feature = "spi")]
pub use transport::SpiTransport;

pub use color::Rgb;
pub use embassy_time::Duration;

/// Physical link to the LED chain
///
/// Implement this trait to support another peripheral. [`Ws2812`] is generic
/// over it and exposes the same API whichever backend is plugged in.
pub trait Transport {
    /// Most LEDs one frame can carry
    const MAX_LEDS: usize;

    /// One-time peripheral setup, run when the driver is created
    fn setup(&mut self) -> Result<(), Error>;

    /// Encode and send one frame
    ///
    /// Blocks until the last bit is on the wire and the latch gap after it
    /// has elapsed.
    fn transmit(&mut self, pixels: &[Rgb], brightness: u8) -> Result<(), Error>;

    /// Hold the line low for one latch period without sending data
    fn reset(&mut self) -> Result<(), Error>;
}
