//! Peripheral traits for the timer + DMA backend.
//!
//! Implement these on top of a chip HAL or the raw register block. The driver
//! only ever calls them in the order documented on
//! [`PwmDmaTransport`](crate::transport::PwmDmaTransport), so an
//! implementation is a thin register write per method.

use embedded_hal::digital::OutputPin;

/// Timer channel in PWM mode 1, output high while the counter is below the compare value
pub trait PulseTimer {
    /// Program the period (auto-reload + 1) and an initial compare value.
    ///
    /// Compare preload must be off so that DMA writes land immediately.
    /// Counter and output stay disabled.
    fn configure(&mut self, period: u16, duty: u16);

    /// Start or stop the counter
    fn set_counter_enabled(&mut self, enabled: bool);

    /// Connect or disconnect the channel output (main output enable)
    fn set_output_enabled(&mut self, enabled: bool);

    /// Raise a DMA request on every update event
    fn set_update_dma_request(&mut self, enabled: bool);

    /// Zero the counter
    fn reset_counter(&mut self);

    /// Software update event, also raises the DMA request when enabled
    fn generate_update(&mut self);

    fn clear_update_flag(&mut self);

    /// Set once the counter wraps
    fn update_flag(&self) -> bool;
}

/// DMA channel wired from memory to the compare register of the [`PulseTimer`]
///
/// Half-word transfers, memory increment on, peripheral increment off,
/// normal (one shot) mode.
pub trait DutyDma {
    /// Load a transfer of `duties` and enable the channel
    ///
    /// Clears any stale completion and error flags first.
    ///
    /// # Safety
    ///
    /// The hardware keeps reading `duties` after this returns. The caller must
    /// keep the slice alive and unmodified until [`DutyDma::stop`] has returned.
    unsafe fn start(&mut self, duties: &[u16]);

    /// Transfer complete flag
    fn is_complete(&self) -> bool;

    /// Disable the channel and clear its flags
    fn stop(&mut self);
}

/// Data line pin that can be driven as plain GPIO or handed to the timer
pub trait LinePin: OutputPin {
    /// Switch to push-pull GPIO output
    fn select_gpio(&mut self);

    /// Switch to the timer channel alternate function
    fn select_timer(&mut self);
}
