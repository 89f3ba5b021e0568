use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::tick_ns;
use crate::driver::{OokDriver, OokMode};
use crate::error::DriverError;
use crate::radio::{Radio, RadioConfig};

/// Ticks the driver with a blocking delay until the loaded burst has been sent.
///
/// This is a simple timing loop for use in environments where interrupts are unavailable
/// or undesired. It drives the driver's timing using a delay provider implementing
/// `embedded_hal::delay::DelayNs`.
///
/// # Arguments
/// - `driver`: A mutable reference to an `OokDriver` instance with a burst loaded.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `tick_ns`: The delay between each tick call, in nanoseconds (e.g. 52_083 for 8
///   ticks per bit at 2400 baud).
///
/// # Notes
/// - The time spent in `tick()` itself adds to every interval; on slow cores, shorten
///   `tick_ns` accordingly.
/// - Returns immediately if the driver is idle.
pub fn run_until_idle<D: DelayNs, TX, PTT>(
    driver: &mut OokDriver<TX, PTT>,
    delay: &mut D,
    tick_ns: u32,
) -> Result<(), DriverError>
where
    TX: OutputPin,
    PTT: OutputPin,
{
    while driver.mode == OokMode::Tx {
        driver.tick()?;
        delay.delay_ns(tick_ns);
    }
    Ok(())
}

/// A blocking [`Radio`] built from an [`OokDriver`] and a delay provider.
///
/// ```rust
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use proflame::driver::OokDriver;
/// use proflame::timer::BlockingTransmitter;
///
/// # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
/// let driver: OokDriver<Pin, Pin> = OokDriver::new(tx_pin, None, 8, None).unwrap();
/// let radio = BlockingTransmitter::new(driver, NoopDelay::new());
/// # let (mut driver, _) = radio.release();
/// # driver.tx.done();
/// ```
#[derive(Debug)]
pub struct BlockingTransmitter<TX, PTT, D>
where
    TX: OutputPin,
    PTT: OutputPin,
{
    driver: OokDriver<TX, PTT>,
    delay: D,
    tick_ns: u32,
}

impl<TX, PTT, D> BlockingTransmitter<TX, PTT, D>
where
    TX: OutputPin,
    PTT: OutputPin,
    D: DelayNs,
{
    /// Wraps `driver`; the tick interval is derived when the radio is configured.
    pub fn new(driver: OokDriver<TX, PTT>, delay: D) -> Self {
        Self {
            driver,
            delay,
            tick_ns: 0,
        }
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &OokDriver<TX, PTT> {
        &self.driver
    }

    /// The wrapped driver, mutably.
    pub fn driver_mut(&mut self) -> &mut OokDriver<TX, PTT> {
        &mut self.driver
    }

    /// Interval between ticks in nanoseconds, 0 until configured.
    pub fn tick_interval_ns(&self) -> u32 {
        self.tick_ns
    }

    /// Returns the driver and the delay provider.
    pub fn release(self) -> (OokDriver<TX, PTT>, D) {
        (self.driver, self.delay)
    }
}

impl<TX, PTT, D> Radio for BlockingTransmitter<TX, PTT, D>
where
    TX: OutputPin,
    PTT: OutputPin,
    D: DelayNs,
{
    type Error = DriverError;

    fn configure(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        self.driver.configure(config)?;
        self.tick_ns = tick_ns(config.baud, self.driver.ticks_per_bit());
        debug!("bit clock {} ns per tick", self.tick_ns);
        Ok(())
    }

    fn set_mode_idle(&mut self) -> Result<(), Self::Error> {
        self.driver.set_mode_idle()
    }

    fn transmit(&mut self, data: &[u8], repeat: u8) -> Result<(), Self::Error> {
        loop {
            match self.driver.load(data, repeat) {
                Ok(()) => break,
                Err(nb::Error::WouldBlock) => {
                    run_until_idle(&mut self.driver, &mut self.delay, self.tick_ns)?
                }
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        run_until_idle(&mut self.driver, &mut self.delay, self.tick_ns)
    }
}
