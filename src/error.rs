use core::fmt;

use embedded_hal::{digital, spi};

/// Errors reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// LED count is zero, above the backend limit or above the storage length
    LedCount { count: usize, max: usize },
    /// Pulse widths derived from the configured clock miss the WS2812B windows
    Timing,
    /// The DMA stream did not report completion within the transfer timeout
    TransferStalled,
    /// Data line pin error
    Pin(digital::ErrorKind),
    /// SPI bus error
    Spi(spi::ErrorKind),
}

impl Error {
    #[cfg(feature = "pwm-dma")]
    pub(crate) fn pin<E: digital::Error>(err: E) -> Self {
        Self::Pin(err.kind())
    }

    #[cfg(feature = "spi")]
    pub(crate) fn spi<E: spi::Error>(err: E) -> Self {
        Self::Spi(err.kind())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LedCount { count, max } => {
                write!(f, "invalid LED count {} (allowed 1..={})", count, max)
            }
            Self::Timing => write!(f, "pulse timing out of WS2812B range"),
            Self::TransferStalled => write!(f, "DMA transfer did not complete"),
            Self::Pin(kind) => write!(f, "data pin error: {:?}", kind),
            Self::Spi(kind) => write!(f, "spi error: {:?}", kind),
        }
    }
}

impl core::error::Error for Error {}
