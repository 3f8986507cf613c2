//! Timer + DMA backend
//!
//! A timer channel runs PWM at one protocol bit per period. On every update
//! event the DMA stream writes the next compare value from the frame buffer,
//! so the pulse width changes bit by bit with no CPU involvement. The CPU
//! only arms the transfer, then polls for completion.
//!
//! Line states:
//!
//! ```text
//! Idle --latch--> Armed --start DMA, enable output--> Transmitting
//!  ^                                                        |
//!  +---------------latch <-- stop <-- DMA done + 1 period --+
//! ```

use embedded_hal::delay::DelayNs;

use crate::config::{PwmConfig, PwmTiming, TransferTimeout};
use crate::encoder::FrameEncoder;
use crate::encoder::pwm::{PWM_MAX_LEDS, PwmFrame};
use crate::hal::{DutyDma, LinePin, PulseTimer};
use crate::{Error, Rgb, Transport};

/// Where the data line is in the frame cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Line low, timer stopped
    Idle,
    /// Latch gap done, pin handed back to the timer
    Armed,
    /// DMA is feeding the timer
    Transmitting,
}

/// WS2812B transport driving a PWM timer channel from DMA
pub struct PwmDmaTransport<TIM, DMA, PIN, D> {
    timer: TIM,
    dma: DMA,
    pin: PIN,
    delay: D,
    config: PwmConfig,
    frame: PwmFrame,
    state: LineState,
}

impl<TIM, DMA, PIN, D> PwmDmaTransport<TIM, DMA, PIN, D>
where
    TIM: PulseTimer,
    DMA: DutyDma,
    PIN: LinePin,
    D: DelayNs,
{
    /// Create the transport, deriving tick counts from `config`
    ///
    /// Peripherals are not touched until [`Transport::setup`].
    pub fn new(timer: TIM, dma: DMA, pin: PIN, delay: D, config: PwmConfig) -> Result<Self, Error> {
        let timing = PwmTiming::from_config(&config)?;
        Ok(Self {
            timer,
            dma,
            pin,
            delay,
            config,
            frame: PwmFrame::new(timing),
            state: LineState::Idle,
        })
    }

    pub const fn state(&self) -> LineState {
        self.state
    }

    pub const fn timing(&self) -> PwmTiming {
        self.frame.timing()
    }

    /// Frame buffer of the last transmission
    pub fn frame(&self) -> &PwmFrame {
        &self.frame
    }

    /// Give back the peripherals
    pub fn release(self) -> (TIM, DMA, PIN, D) {
        (self.timer, self.dma, self.pin, self.delay)
    }

    /// Drive the line low as GPIO for the latch time, then return it to the timer
    fn latch(&mut self) -> Result<(), Error> {
        self.timer.set_counter_enabled(false);
        self.timer.set_output_enabled(false);

        self.pin.select_gpio();
        self.pin.set_low().map_err(Error::pin)?;
        self.delay.delay_us(latch_micros(&self.config));
        self.pin.select_timer();
        Ok(())
    }

    /// Stop every source of pulses
    fn halt(&mut self) {
        self.timer.set_counter_enabled(false);
        self.timer.set_output_enabled(false);
        self.timer.set_update_dma_request(false);
        self.dma.stop();
    }

    /// Poll budget in microseconds for the current frame, `None` to wait forever
    #[allow(clippy::cast_possible_truncation)]
    fn wait_budget(&self) -> Option<u32> {
        match self.config.transfer_timeout {
            TransferTimeout::Never => None,
            TransferTimeout::Micros(micros) => Some(micros),
            TransferTimeout::Auto => {
                let ticks = self.frame.codes().len() as u64 * u64::from(self.timing().period);
                let airtime = (ticks * 1_000_000).div_ceil(u64::from(self.config.timer_clock_hz));
                let budget = 2 * airtime + u64::from(latch_micros(&self.config));
                Some(budget.min(u64::from(u32::MAX)) as u32)
            }
        }
    }

    /// Start the DMA stream and the timer
    ///
    /// The stream is enabled and primed by a software update before the
    /// output is switched on, so the first period already carries the
    /// first compare value.
    fn arm(&mut self) {
        let Self {
            timer, dma, frame, ..
        } = self;
        let duties = frame.codes();

        critical_section::with(|_| {
            timer.set_counter_enabled(false);
            timer.set_output_enabled(false);
            timer.set_update_dma_request(false);
            dma.stop();

            timer.reset_counter();
            timer.clear_update_flag();
            timer.set_update_dma_request(true);

            // SAFETY: `duties` borrows `self.frame`, which is only rebuilt in
            // `transmit` after `halt` has stopped the stream.
            unsafe { dma.start(duties) };

            timer.generate_update();
            timer.clear_update_flag();

            timer.set_output_enabled(true);
            timer.set_counter_enabled(true);
        });
    }

    /// Wait for the stream to drain and the last slot to reach the pin
    fn drain(&mut self) -> Result<(), Error> {
        let budget = self.wait_budget();

        if !poll(&mut self.delay, budget, || self.dma.is_complete()) {
            return Err(Error::TransferStalled);
        }

        self.timer.clear_update_flag();
        if !poll(&mut self.delay, budget, || self.timer.update_flag()) {
            return Err(Error::TransferStalled);
        }
        Ok(())
    }

    fn send_frame(&mut self) -> Result<(), Error> {
        self.latch()?;
        self.state = LineState::Armed;

        self.arm();
        self.state = LineState::Transmitting;

        #[cfg(feature = "log")]
        log::trace!("ws2812 pwm: streaming {} slots", self.frame.codes().len());

        let drained = self.drain();
        self.halt();

        if let Err(err) = drained {
            #[cfg(feature = "log")]
            log::warn!("ws2812 pwm: DMA stream stalled, line forced idle");
            self.latch()?;
            return Err(err);
        }

        self.latch()
    }
}

impl<TIM, DMA, PIN, D> Transport for PwmDmaTransport<TIM, DMA, PIN, D>
where
    TIM: PulseTimer,
    DMA: DutyDma,
    PIN: LinePin,
    D: DelayNs,
{
    const MAX_LEDS: usize = PWM_MAX_LEDS;

    fn setup(&mut self) -> Result<(), Error> {
        let timing = self.timing();
        self.halt();
        self.timer.configure(timing.period, timing.zero_high);

        #[cfg(feature = "log")]
        log::debug!(
            "ws2812 pwm: timer configured, period={} ticks",
            timing.period
        );

        let result = self.latch();
        self.state = LineState::Idle;
        result
    }

    fn transmit(&mut self, pixels: &[Rgb], brightness: u8) -> Result<(), Error> {
        self.frame.encode(pixels, brightness);

        let result = self.send_frame();
        self.state = LineState::Idle;
        result
    }

    fn reset(&mut self) -> Result<(), Error> {
        let result = self.latch();
        self.state = LineState::Idle;
        result
    }
}

#[allow(clippy::cast_possible_truncation)]
fn latch_micros(config: &PwmConfig) -> u32 {
    config.latch.as_micros().min(u64::from(u32::MAX)) as u32
}

/// Busy-wait until `ready` holds
///
/// With a budget, sleeps 1 µs between polls and gives up once the budget is
/// spent. Returns whether `ready` was seen.
fn poll<D: DelayNs>(delay: &mut D, budget_us: Option<u32>, mut ready: impl FnMut() -> bool) -> bool {
    let Some(budget) = budget_us else {
        while !ready() {
            core::hint::spin_loop();
        }
        return true;
    };

    let mut waited = 0;
    while !ready() {
        if waited >= budget {
            return false;
        }
        delay.delay_us(1);
        waited += 1;
    }
    true
}
