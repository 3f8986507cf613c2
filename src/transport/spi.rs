//! SPI backend
//!
//! Only MOSI is used. The bus must run MSB first in [`MODE`], idle low, at
//! [`SpiConfig::clock_hz`]. The latch gap is produced by clocking out zero
//! bytes, so no pin juggling is needed.

use embedded_hal::spi::{MODE_0, Mode, SpiBus};

use crate::config::SpiConfig;
use crate::encoder::FrameEncoder;
use crate::encoder::spi::{SPI_MAX_LEDS, SpiFrame};
use crate::{Error, Rgb, Transport};

/// SPI mode expected by this transport
///
/// If the first LED misbehaves, check that the bus idles low.
pub const MODE: Mode = MODE_0;

const ZEROS: [u8; 16] = [0; 16];

/// WS2812B transport on a plain SPI bus
pub struct SpiTransport<SPI> {
    spi: SPI,
    frame: SpiFrame,
    reset_bytes: usize,
}

impl<SPI: SpiBus<u8>> SpiTransport<SPI> {
    /// Wrap a bus already configured for `config.clock_hz`
    pub fn new(spi: SPI, config: SpiConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            spi,
            frame: SpiFrame::new(),
            reset_bytes: config.reset_bytes(),
        })
    }

    /// Zero bytes sent around each frame
    pub const fn reset_bytes(&self) -> usize {
        self.reset_bytes
    }

    /// Frame buffer of the last transmission
    pub fn frame(&self) -> &SpiFrame {
        &self.frame
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    /// Clock out the latch gap and wait for the bus to go idle
    fn send_reset(&mut self) -> Result<(), Error> {
        let mut remaining = self.reset_bytes;
        while remaining > 0 {
            let chunk = remaining.min(ZEROS.len());
            self.spi.write(&ZEROS[..chunk]).map_err(Error::spi)?;
            remaining -= chunk;
        }
        self.spi.flush().map_err(Error::spi)
    }

    /// Push the encoded pixels without gaps
    ///
    /// A pause longer than the latch time would make the strip latch a half
    /// frame, so interrupts are held off until the bus is idle again.
    fn send_pixels(&mut self) -> Result<(), Error> {
        let Self { spi, frame, .. } = self;
        let bytes = frame.codes();
        critical_section::with(|_| {
            spi.write(bytes)?;
            spi.flush()
        })
        .map_err(Error::spi)
    }
}

impl<SPI: SpiBus<u8>> Transport for SpiTransport<SPI> {
    const MAX_LEDS: usize = SPI_MAX_LEDS;

    fn setup(&mut self) -> Result<(), Error> {
        #[cfg(feature = "log")]
        log::debug!("ws2812 spi: reset block is {} bytes", self.reset_bytes);

        self.spi.flush().map_err(Error::spi)
    }

    fn transmit(&mut self, pixels: &[Rgb], brightness: u8) -> Result<(), Error> {
        self.frame.encode(pixels, brightness);

        #[cfg(feature = "log")]
        log::trace!("ws2812 spi: sending {} bytes", self.frame.codes().len());

        self.spi.flush().map_err(Error::spi)?;
        self.send_reset()?;
        self.send_pixels()?;
        self.send_reset()
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.send_reset()
    }
}
