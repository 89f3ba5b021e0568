use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

use crate::driver::OokDriver;
use crate::error::DriverError;
use crate::radio::{Radio, RadioConfig};

/// A global `OokDriver` slot shared between the main loop and a timer interrupt.
pub type GlobalDriver<TX, PTT> = Mutex<RefCell<Option<OokDriver<TX, PTT>>>>;

/// Used to initialize the global static `OokDriver` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::digital::Mock as Pin;
/// use proflame::timer::{GlobalDriver, global_ook_driver_init};
///
/// static OOK_DRIVER: GlobalDriver<Pin, Pin> = global_ook_driver_init();
/// ```
pub const fn global_ook_driver_init<TX: OutputPin, PTT: OutputPin>() -> GlobalDriver<TX, PTT> {
    Mutex::new(RefCell::new(None))
}

/// Builds an `OokDriver` and stores it in the global slot, replacing any previous one.
///
/// # Arguments
/// * The global static `OokDriver`
/// * The tx pin
/// * The optional push to talk pin
/// * The number of ticks per bit such that:
///     `interrupt frequency / ticks per bit = 2400 bits per second`
///     e.g. with an interrupt every `~52.08µs`, 8 ticks per bit
/// * Whether the push to talk pin is active low
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use proflame::timer::{GlobalDriver, global_ook_driver_init, global_ook_driver_setup};
///
/// static OOK_DRIVER: GlobalDriver<Pin, Pin> = global_ook_driver_init();
///
/// # let tx = Pin::new(&[PinTransaction::set(PinState::Low)]);
/// global_ook_driver_setup(&OOK_DRIVER, tx, None, 8, None).unwrap();
/// # proflame::timer::global_ook_driver_take(&OOK_DRIVER).unwrap().tx.done();
/// ```
pub fn global_ook_driver_setup<TX: OutputPin, PTT: OutputPin>(
    global_driver: &'static GlobalDriver<TX, PTT>,
    tx: TX,
    ptt: Option<PTT>,
    ticks_per_bit: u8,
    ptt_inverted: Option<bool>,
) -> Result<(), DriverError> {
    let driver = OokDriver::new(tx, ptt, ticks_per_bit, ptt_inverted)?;
    critical_section::with(|cs| {
        let _ = global_driver.borrow(cs).replace(Some(driver));
    });
    Ok(())
}

/// Removes the driver from the global slot, leaving it empty.
pub fn global_ook_driver_take<TX: OutputPin, PTT: OutputPin>(
    global_driver: &'static GlobalDriver<TX, PTT>,
) -> Option<OokDriver<TX, PTT>> {
    critical_section::with(|cs| global_driver.borrow(cs).take())
}

/// Runs the tick at each interrupt
///
/// Pin failures are kept by the driver and reported to the transmitting side.
///
/// # Arguments
/// * The global static `OokDriver`
///# Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     global_ook_timer_tick(&OOK_DRIVER);
/// }
/// ```
pub fn global_ook_timer_tick<TX: OutputPin, PTT: OutputPin>(
    global_driver: &'static GlobalDriver<TX, PTT>,
) {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            let _ = driver.tick();
        }
    });
}

/// A blocking [`Radio`] over a global driver clocked by a timer interrupt.
///
/// [`transmit`](Radio::transmit) loads the burst and spins until the interrupt has keyed
/// every copy, so the timer must be running.
pub struct GlobalRadio<TX, PTT>
where
    TX: OutputPin + 'static,
    PTT: OutputPin + 'static,
{
    driver: &'static GlobalDriver<TX, PTT>,
}

impl<TX, PTT> GlobalRadio<TX, PTT>
where
    TX: OutputPin + 'static,
    PTT: OutputPin + 'static,
{
    /// Wraps the global slot. The driver may be set up before or after.
    pub const fn new(driver: &'static GlobalDriver<TX, PTT>) -> Self {
        Self { driver }
    }

    fn with_driver<T>(
        &self,
        f: impl FnOnce(&mut OokDriver<TX, PTT>) -> T,
    ) -> Result<T, DriverError> {
        critical_section::with(|cs| {
            self.driver
                .borrow(cs)
                .borrow_mut()
                .as_mut()
                .map(f)
                .ok_or(DriverError::Uninitialized)
        })
    }
}

impl<TX, PTT> core::fmt::Debug for GlobalRadio<TX, PTT>
where
    TX: OutputPin + 'static,
    PTT: OutputPin + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlobalRadio").finish_non_exhaustive()
    }
}

impl<TX, PTT> Radio for GlobalRadio<TX, PTT>
where
    TX: OutputPin + 'static,
    PTT: OutputPin + 'static,
{
    type Error = DriverError;

    fn configure(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        self.with_driver(|driver| driver.configure(config))?
    }

    fn set_mode_idle(&mut self) -> Result<(), Self::Error> {
        self.with_driver(|driver| driver.set_mode_idle())?
    }

    fn transmit(&mut self, data: &[u8], repeat: u8) -> Result<(), Self::Error> {
        loop {
            match self.with_driver(|driver| driver.load(data, repeat))? {
                Ok(()) => break,
                Err(nb::Error::WouldBlock) => core::hint::spin_loop(),
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        while !self.with_driver(|driver| driver.wait_burst_sent().is_ok())? {
            core::hint::spin_loop();
        }
        match self.with_driver(|driver| driver.take_fault())? {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
