//! Timing configuration for both backends.
//!
//! All pulse widths are given in nanoseconds and quantised to the peripheral
//! clock here, once, so the encoders only ever deal with ready tick counts.

use embassy_time::Duration;

use crate::Error;

/// Minimum low time that makes WS2812B latch a frame, with margin
pub const DEFAULT_LATCH: Duration = Duration::from_micros(80);

/// Accepted high time for a 0 bit
pub const T0H_NS: (u32, u32) = (200, 550);
/// Accepted high time for a 1 bit
pub const T1H_NS: (u32, u32) = (650, 1250);
/// Accepted bit period
pub const PERIOD_NS: (u32, u32) = (1000, 1850);

const NS_PER_SECOND: u64 = 1_000_000_000;

/// Convert nanoseconds to peripheral clock ticks, rounding
#[allow(clippy::cast_possible_truncation)]
pub const fn ns_to_ticks(ns: u32, clock_hz: u32) -> u32 {
    ((ns as u64 * clock_hz as u64 + NS_PER_SECOND / 2) / NS_PER_SECOND) as u32
}

/// Convert peripheral clock ticks to nanoseconds, rounding
#[allow(clippy::cast_possible_truncation)]
pub const fn ticks_to_ns(ticks: u32, clock_hz: u32) -> u32 {
    if clock_hz == 0 {
        return u32::MAX;
    }
    ((ticks as u64 * NS_PER_SECOND + clock_hz as u64 / 2) / clock_hz as u64) as u32
}

const fn within(value: u32, window: (u32, u32)) -> bool {
    value >= window.0 && value <= window.1
}

/// Check that the pulse widths a backend will actually produce can be told
/// apart by the LED
pub const fn check_pulse_widths(zero_high_ns: u32, one_high_ns: u32, period_ns: u32) -> Result<(), Error> {
    let ordered = zero_high_ns < one_high_ns && one_high_ns < period_ns;
    if ordered
        && within(zero_high_ns, T0H_NS)
        && within(one_high_ns, T1H_NS)
        && within(period_ns, PERIOD_NS)
    {
        Ok(())
    } else {
        Err(Error::Timing)
    }
}

/// Bound on the wait for the DMA stream to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferTimeout {
    /// Busy-wait until the hardware reports completion, however long it takes
    Never,
    /// Twice the frame air time plus the latch time
    Auto,
    /// Fixed budget in microseconds
    Micros(u32),
}

/// Timer + DMA backend configuration
#[derive(Debug, Clone, Copy)]
pub struct PwmConfig {
    /// Timer counter clock after the prescaler
    pub timer_clock_hz: u32,
    /// Length of one protocol bit
    pub bit_period_ns: u32,
    /// High time of a 0 bit
    pub zero_high_ns: u32,
    /// High time of a 1 bit
    pub one_high_ns: u32,
    /// Low time forced before and after every frame
    pub latch: Duration,
    pub transfer_timeout: TransferTimeout,
}

impl PwmConfig {
    /// 48 MHz timer clock, 60 ticks per bit
    pub const DEFAULT: Self = Self {
        timer_clock_hz: 48_000_000,
        bit_period_ns: 1250,
        zero_high_ns: 400,
        one_high_ns: 850,
        latch: DEFAULT_LATCH,
        transfer_timeout: TransferTimeout::Auto,
    };
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tick counts programmed into the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmTiming {
    /// Timer period (auto-reload + 1)
    pub period: u16,
    /// Compare value encoding a 0 bit
    pub zero_high: u16,
    /// Compare value encoding a 1 bit
    pub one_high: u16,
}

impl PwmTiming {
    /// Derive tick counts from a configuration
    ///
    /// The period is rounded to whole ticks first; both high times are then
    /// taken as the same fraction of that period as in the configuration.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_config(config: &PwmConfig) -> Result<Self, Error> {
        if config.bit_period_ns == 0 {
            return Err(Error::Timing);
        }
        let period = ns_to_ticks(config.bit_period_ns, config.timer_clock_hz);
        if period < 2 || period > u32::from(u16::MAX) {
            return Err(Error::Timing);
        }
        let share = |high_ns: u32| -> u32 {
            let half = u64::from(config.bit_period_ns) / 2;
            ((u64::from(period) * u64::from(high_ns) + half) / u64::from(config.bit_period_ns))
                as u32
        };
        let zero_high = share(config.zero_high_ns);
        let one_high = share(config.one_high_ns);

        let clock = config.timer_clock_hz;
        check_pulse_widths(
            ticks_to_ns(zero_high, clock),
            ticks_to_ns(one_high, clock),
            ticks_to_ns(period, clock),
        )?;

        #[cfg(feature = "log")]
        log::debug!(
            "ws2812 pwm timing: period={} zero={} one={} ticks @ {} Hz",
            period,
            zero_high,
            one_high,
            clock
        );

        Ok(Self {
            period: period as u16,
            zero_high: zero_high as u16,
            one_high: one_high as u16,
        })
    }

    /// Compare value for one protocol bit
    #[inline]
    pub const fn duty(self, bit: bool) -> u16 {
        if bit { self.one_high } else { self.zero_high }
    }

    /// Decode a compare value back to a protocol bit
    #[inline]
    pub const fn bit(self, duty: u16) -> Option<bool> {
        if duty == self.one_high {
            Some(true)
        } else if duty == self.zero_high {
            Some(false)
        } else {
            None
        }
    }
}

/// SPI backend configuration
#[derive(Debug, Clone, Copy)]
pub struct SpiConfig {
    /// MOSI bit rate, each protocol bit takes four of these
    pub clock_hz: u32,
    /// Low time sent before and after every frame
    pub latch: Duration,
}

impl SpiConfig {
    /// 3 MHz, 333 ns per SPI bit
    pub const DEFAULT: Self = Self {
        clock_hz: 3_000_000,
        latch: DEFAULT_LATCH,
    };

    /// Check the 1/3/4 bit spans of the nibble codes at this clock
    pub const fn validate(&self) -> Result<(), Error> {
        check_pulse_widths(
            ticks_to_ns(1, self.clock_hz),
            ticks_to_ns(3, self.clock_hz),
            ticks_to_ns(4, self.clock_hz),
        )
    }

    /// Number of zero bytes covering the latch time
    #[allow(clippy::cast_possible_truncation)]
    pub const fn reset_bytes(&self) -> usize {
        let bits_x_us = self.latch.as_micros() * self.clock_hz as u64;
        let per_byte = 8 * 1_000_000;
        bits_x_us.div_ceil(per_byte) as usize
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
