//! Recording stand-ins for the peripherals.
//!
//! Every mock shares one `Bench`, so a test can check the exact order in
//! which the driver touched timer, DMA, pin and delay.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
#[cfg(feature = "pwm-dma")]
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};
#[cfg(feature = "pwm-dma")]
use ws2812_dma::hal::{DutyDma, LinePin, PulseTimer};
#[cfg(feature = "pwm-dma")]
use ws2812_dma::{PwmConfig, PwmDmaTransport};
#[cfg(feature = "spi")]
use ws2812_dma::{SpiConfig, SpiTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure { period: u16, duty: u16 },
    Counter(bool),
    Output(bool),
    DmaRequest(bool),
    ResetCounter,
    GenerateUpdate,
    ClearUpdate,
    DmaStart(usize),
    DmaStop,
    PinGpio,
    PinTimer,
    PinLow,
    PinHigh,
    DelayNs(u32),
    SpiWrite(usize),
    SpiFlush,
}

#[derive(Debug, Default)]
pub struct Bench {
    pub events: Vec<Event>,
    /// Every buffer handed to the DMA
    pub streams: Vec<Vec<u16>>,
    /// Every byte written to SPI, in order
    pub mosi: Vec<u8>,
    pub dma_stall: bool,
    pub timer_stall: bool,
    pub spi_fail: bool,
}

pub type Shared = Rc<RefCell<Bench>>;

pub fn bench() -> Shared {
    Rc::new(RefCell::new(Bench::default()))
}

fn record(bench: &Shared, event: Event) {
    bench.borrow_mut().events.push(event);
}

pub fn events(bench: &Shared) -> Vec<Event> {
    bench.borrow().events.clone()
}

pub fn position(events: &[Event], event: &Event) -> usize {
    events
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("{:?} not recorded", event))
}

pub fn last_position(events: &[Event], event: &Event) -> usize {
    events
        .iter()
        .rposition(|e| e == event)
        .unwrap_or_else(|| panic!("{:?} not recorded", event))
}

/// Events of one latch sequence at the default 80 µs
pub fn latch_events() -> Vec<Event> {
    vec![
        Event::Counter(false),
        Event::Output(false),
        Event::PinGpio,
        Event::PinLow,
        Event::DelayNs(80_000),
        Event::PinTimer,
    ]
}

#[cfg(feature = "pwm-dma")]
pub struct MockTimer(pub Shared);

#[cfg(feature = "pwm-dma")]
impl PulseTimer for MockTimer {
    fn configure(&mut self, period: u16, duty: u16) {
        record(&self.0, Event::Configure { period, duty });
    }

    fn set_counter_enabled(&mut self, enabled: bool) {
        record(&self.0, Event::Counter(enabled));
    }

    fn set_output_enabled(&mut self, enabled: bool) {
        record(&self.0, Event::Output(enabled));
    }

    fn set_update_dma_request(&mut self, enabled: bool) {
        record(&self.0, Event::DmaRequest(enabled));
    }

    fn reset_counter(&mut self) {
        record(&self.0, Event::ResetCounter);
    }

    fn generate_update(&mut self) {
        record(&self.0, Event::GenerateUpdate);
    }

    fn clear_update_flag(&mut self) {
        record(&self.0, Event::ClearUpdate);
    }

    fn update_flag(&self) -> bool {
        !self.0.borrow().timer_stall
    }
}

#[cfg(feature = "pwm-dma")]
pub struct MockDma(pub Shared);

#[cfg(feature = "pwm-dma")]
impl DutyDma for MockDma {
    unsafe fn start(&mut self, duties: &[u16]) {
        let mut bench = self.0.borrow_mut();
        bench.events.push(Event::DmaStart(duties.len()));
        bench.streams.push(duties.to_vec());
    }

    fn is_complete(&self) -> bool {
        !self.0.borrow().dma_stall
    }

    fn stop(&mut self) {
        record(&self.0, Event::DmaStop);
    }
}

#[cfg(feature = "pwm-dma")]
pub struct MockPin(pub Shared);

#[cfg(feature = "pwm-dma")]
impl digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

#[cfg(feature = "pwm-dma")]
impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        record(&self.0, Event::PinLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        record(&self.0, Event::PinHigh);
        Ok(())
    }
}

#[cfg(feature = "pwm-dma")]
impl LinePin for MockPin {
    fn select_gpio(&mut self) {
        record(&self.0, Event::PinGpio);
    }

    fn select_timer(&mut self) {
        record(&self.0, Event::PinTimer);
    }
}

pub struct MockDelay(pub Shared);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        record(&self.0, Event::DelayNs(ns));
    }
}

pub struct MockSpi(pub Shared);

impl MockSpi {
    fn check(&self) -> Result<(), spi::ErrorKind> {
        if self.0.borrow().spi_fail {
            Err(spi::ErrorKind::Other)
        } else {
            Ok(())
        }
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        self.check()
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        let mut bench = self.0.borrow_mut();
        bench.events.push(Event::SpiWrite(words.len()));
        bench.mosi.extend_from_slice(words);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let copy = words.to_vec();
        words.fill(0);
        self.write(&copy)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        record(&self.0, Event::SpiFlush);
        Ok(())
    }
}

#[cfg(feature = "pwm-dma")]
pub type PwmBench = PwmDmaTransport<MockTimer, MockDma, MockPin, MockDelay>;

#[cfg(feature = "pwm-dma")]
pub fn pwm_transport(bench: &Shared, config: PwmConfig) -> PwmBench {
    PwmDmaTransport::new(
        MockTimer(bench.clone()),
        MockDma(bench.clone()),
        MockPin(bench.clone()),
        MockDelay(bench.clone()),
        config,
    )
    .expect("default timing is valid")
}

#[cfg(feature = "spi")]
pub fn spi_transport(bench: &Shared) -> SpiTransport<MockSpi> {
    SpiTransport::new(MockSpi(bench.clone()), SpiConfig::default()).expect("3 MHz is valid")
}
