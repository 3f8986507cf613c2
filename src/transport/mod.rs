#[cfg(feature = "pwm-dma")]
mod pwm_dma;
#[cfg(feature = "spi")]
mod spi;

#[cfg(feature = "pwm-dma")]
pub use pwm_dma::{LineState, PwmDmaTransport};
#[cfg(feature = "spi")]
pub use spi::{MODE, SpiTransport};
