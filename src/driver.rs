//! On-off keyed transmitter driver for 315 MHz RF modules.
//!
//! This module provides the [`OokDriver`] struct, which keys a transmitter module's data
//! pin directly from a packed [`Burst`](crate::codec::Burst). Any OOK transmitter tuned
//! to 314.973 MHz works, as it only needs a digital input to gate the carrier.
//!
//! The driver operates independently of the target platform's oscillator speed,
//! provided that the [`tick()`](OokDriver::tick) method is called at regular intervals
//! (`ticks_per_bit` times per bit, i.e. every ~52 µs for 8 ticks at 2400 baud).
//!
//! ## Features
//!
//! - Bit-level transmission using On-Off Keying (OOK), MSB first
//! - Repeats the loaded burst back to back, with no gap beyond its own pad symbols
//! - Optional push-to-talk pin, optionally inverted
//! - Uses `embedded-hal` for pin abstraction and portability
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use proflame::driver::OokDriver;
//!
//! fn main() {
//!     # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
//!     let mut driver: OokDriver<Pin, Pin> = OokDriver::new(tx_pin, None, 8, None).unwrap();
//!
//!     loop {
//!         driver.tick().unwrap(); // Called every ~52 µs by a delay or timer interrupt
//!         # break; // For testing purposes
//!     }
//!     # driver.tx.done();
//! }
//! ```
//!
//! ## Design Notes
//!
//! This module does **not** build packets; feed it the bytes of an encoded burst.
//! The driver is not a [`Radio`](crate::radio::Radio) by itself, since it has no notion
//! of time. For tick scheduling helpers and the timed blocking adapters, see
//! [`crate::timer`].

use core::convert::Infallible;

use embedded_hal::digital::{Error as _, OutputPin};

use crate::consts::BURST_LEN;
use crate::error::DriverError;
use crate::radio::{Modulation, RadioConfig};

/// Operational mode of the [`OokDriver`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum OokMode {
    ///   Carrier off and push-to-talk released. The resting state between bursts.
    #[default]
    Idle,
    ///   The driver is keying a burst. Bit timing is handled by `tick()` calls.
    Tx,
}

/// A software-driven On-Off Keying transmitter.
///
/// Transmission is handled by toggling a digital output pin (`TX`), where:
/// - `HIGH` = carrier on = logical `1`
/// - `LOW`  = carrier off = logical `0`
///
/// You must call [`tick()`](#method.tick) at regular intervals to advance the internal
/// state machine and emit bits with accurate timing.
///
/// ## Type Parameters
///
/// - `TX`: A type implementing [`embedded_hal::digital::OutputPin`] used for RF transmission
/// - `PTT`: A type implementing [`embedded_hal::digital::OutputPin`] used to power up the
///   transmitter
///
/// ## Notes
///
/// - Only one `OokDriver` instance should be active if you're using interrupts.
/// - A pin failure aborts the burst, drops the driver back to idle, and is kept in
///   [`take_fault()`](OokDriver::take_fault) for callers that are not the ticker.
#[derive(Debug)]
pub struct OokDriver<TX, PTT>
where
    TX: OutputPin,
    PTT: OutputPin,
{
    /// The current mode of the RF module
    pub mode: OokMode,
    /// TX pin
    pub tx: TX,
    /// Push To Talk (PTT) pin
    pub ptt: Option<PTT>,
    ptt_inverted: bool,
    config: Option<RadioConfig>,
    ticks_per_bit: u8,
    tick_counter: u8,
    tx_buf: [u8; BURST_LEN],
    tx_buf_bits: usize,

    /// Index of the next bit of the transmit buffer to key.
    pub(crate) tx_index: usize,

    /// Copies of the buffer still to send after the current one.
    pub(crate) tx_repeats: u8,

    /// Counter of completed bursts, repeats included.
    /// Incremented when the last copy has been keyed and the driver returns to idle.
    /// Wraps around after `u16::MAX`.
    pub tx_good: u16,

    fault: Option<DriverError>,
}

impl<TX, PTT> OokDriver<TX, PTT>
where
    TX: OutputPin,
    PTT: OutputPin,
{
    /// Creates a new `OokDriver` instance with the given pins.
    ///
    /// # Arguments
    /// - `tx`: The output pin used to gate the transmitter's carrier.
    /// - `ptt`: The optional push to talk pin output signal.
    /// - `ticks_per_bit`: Number of `tick()` calls per bit period (e.g., 8).
    /// - `ptt_inverted`: Whether the ptt signals should be inverted (On = LOW, Off = HIGH)
    ///
    /// # Returns
    /// An idle driver. It still has to be [configured](OokDriver::configure) before the
    /// first burst.
    ///
    /// # Notes
    /// TX is driven `LOW` initially (carrier off).
    pub fn new(
        tx: TX,
        ptt: Option<PTT>,
        ticks_per_bit: u8,
        ptt_inverted: Option<bool>,
    ) -> Result<Self, DriverError> {
        let mut driver = Self {
            mode: OokMode::Idle,
            tx,
            ptt,
            ptt_inverted: ptt_inverted.unwrap_or(false),
            config: None,
            ticks_per_bit: ticks_per_bit.max(1),
            tick_counter: 0,
            tx_buf: [0; BURST_LEN],
            tx_buf_bits: 0,
            tx_index: 0,
            tx_repeats: 0,
            tx_good: 0,
            fault: None,
        };
        driver.write_tx(false)?;
        Ok(driver)
    }

    /// Number of ticks per keyed bit.
    pub fn ticks_per_bit(&self) -> u8 {
        self.ticks_per_bit
    }

    /// The configuration accepted by [`configure`](OokDriver::configure), if any.
    pub fn config(&self) -> Option<&RadioConfig> {
        self.config.as_ref()
    }

    /// Accepts `config` if it asks for plain on-off keying.
    ///
    /// Carrier frequency is a property of the transmitter module, so it is recorded but
    /// not checked. The data rate is set by the tick interval.
    pub fn configure(&mut self, config: &RadioConfig) -> Result<(), DriverError> {
        if config.modulation != Modulation::AskOok {
            return Err(DriverError::UnsupportedModulation(config.modulation));
        }
        self.config = Some(*config);
        Ok(())
    }

    fn write_tx(&mut self, mode: bool) -> Result<(), DriverError> {
        let result = if mode {
            self.tx.set_high()
        } else {
            self.tx.set_low()
        };
        result.map_err(|e| DriverError::Pin(e.kind()))
    }

    fn write_ptt(&mut self, mode: bool) -> Result<(), DriverError> {
        let state = if self.ptt_inverted { !mode } else { mode };
        if let Some(ref mut ptt) = self.ptt {
            let result = if state { ptt.set_high() } else { ptt.set_low() };
            result.map_err(|e| DriverError::Pin(e.kind()))?;
        }
        Ok(())
    }

    /// Sets the driver into idle mode, aborting any burst in progress.
    pub fn set_mode_idle(&mut self) -> Result<(), DriverError> {
        if self.mode != OokMode::Idle {
            self.mode = OokMode::Idle;
            self.write_ptt(false)?;
            self.write_tx(false)?;
        }
        Ok(())
    }

    /// Sets the driver into transmit mode.
    fn set_mode_tx(&mut self) -> Result<(), DriverError> {
        if self.mode != OokMode::Tx {
            self.tx_index = 0;
            self.tick_counter = 0;

            self.write_ptt(true)?;
            self.mode = OokMode::Tx;
        }
        Ok(())
    }

    /// Polls for the end of the current burst.
    pub fn wait_burst_sent(&self) -> nb::Result<(), Infallible> {
        if self.mode == OokMode::Tx {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Takes the fault that aborted the last burst, if any.
    pub fn take_fault(&mut self) -> Option<DriverError> {
        self.fault.take()
    }

    /// Queues `data` for transmission, followed by `repeat` identical copies.
    ///
    /// # Returns
    /// - `Err(nb::Error::WouldBlock)` while a previous burst is still on air
    /// - `Err(nb::Error::Other(_))` if the driver is not configured, `data` does not
    ///   fit the transmit buffer, or the PTT pin fails
    ///
    /// # Note
    /// Actual bit-by-bit transmission is handled incrementally in `tick()`.
    pub fn load(&mut self, data: &[u8], repeat: u8) -> nb::Result<(), DriverError> {
        if self.config.is_none() {
            return Err(nb::Error::Other(DriverError::NotConfigured));
        }
        if data.len() > BURST_LEN {
            return Err(nb::Error::Other(DriverError::BufferOverflow {
                len: data.len(),
                max: BURST_LEN,
            }));
        }

        // Wait for transmitter to become available
        self.wait_burst_sent().map_err(|_| nb::Error::WouldBlock)?;

        self.tx_buf[..data.len()].copy_from_slice(data);
        self.tx_buf_bits = data.len() * 8;
        self.tx_repeats = repeat;
        self.fault = None;

        if self.tx_buf_bits == 0 {
            return Ok(());
        }
        trace!("loaded {} bits, {} repeats", self.tx_buf_bits, repeat);
        self.set_mode_tx().map_err(nb::Error::Other)
    }

    /// Advances the transmit state machine by one timing tick.
    ///
    /// This function must be called at fixed intervals. Every `ticks_per_bit` ticks the
    /// next bit is keyed onto the TX pin.
    ///
    /// # Timing
    /// Must be called precisely and regularly—ideally via timer interrupt or delay loop.
    pub fn tick(&mut self) -> Result<(), DriverError> {
        if self.mode != OokMode::Tx {
            return Ok(());
        }
        // TX advances only every `ticks_per_bit` ticks
        self.tick_counter += 1;
        if self.tick_counter < self.ticks_per_bit {
            return Ok(());
        }
        self.tick_counter = 0;
        let result = self.transmit_bit();
        if let Err(e) = result {
            self.fault = Some(e);
            self.mode = OokMode::Idle;
            let _ = self.write_ptt(false);
            let _ = self.write_tx(false);
        }
        result
    }

    /// Keys the next bit, wrapping to the start of the buffer for each repeat.
    ///
    /// Copies follow each other with no gap. One bit period after the last bit of the
    /// last copy the driver returns to idle.
    fn transmit_bit(&mut self) -> Result<(), DriverError> {
        if self.tx_index >= self.tx_buf_bits {
            if self.tx_repeats == 0 {
                self.tx_good = self.tx_good.wrapping_add(1);
                return self.set_mode_idle();
            }
            self.tx_repeats -= 1;
            self.tx_index = 0;
        }
        let byte = self.tx_buf[self.tx_index / 8];
        let bit = byte & (0x80 >> (self.tx_index % 8));
        self.tx_index += 1;
        self.write_tx(bit != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use std::vec::Vec;

    fn pin_states(bits: &[u8]) -> Vec<PinTransaction> {
        bits.iter()
            .map(|&s| {
                PinTransaction::set(if s == 0 {
                    PinState::Low
                } else {
                    PinState::High
                })
            })
            .collect()
    }

    #[test]
    fn test_driver_initialization() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let ptt = PinMock::new(&[]);

        let mut driver = OokDriver::new(tx, Some(ptt), 8, Some(false)).unwrap();

        assert_eq!(driver.mode, OokMode::Idle);
        assert_eq!(driver.ticks_per_bit(), 8);
        assert!(driver.config().is_none());
        driver.tx.done();
        let _ = driver.ptt.as_mut().map(|ptt| ptt.done());
    }

    #[test]
    fn test_configure_rejects_fsk() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut driver: OokDriver<PinMock, PinMock> = OokDriver::new(tx, None, 8, None).unwrap();

        let fsk = RadioConfig {
            modulation: Modulation::Fsk2,
            ..RadioConfig::PROFLAME
        };
        assert_eq!(
            driver.configure(&fsk),
            Err(DriverError::UnsupportedModulation(Modulation::Fsk2))
        );
        assert_eq!(driver.configure(&RadioConfig::PROFLAME), Ok(()));
        assert_eq!(driver.config(), Some(&RadioConfig::PROFLAME));
        driver.tx.done();
    }

    #[test]
    fn test_load_requires_configuration() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut driver: OokDriver<PinMock, PinMock> = OokDriver::new(tx, None, 8, None).unwrap();

        assert_eq!(
            driver.load(&[0xff], 0),
            Err(nb::Error::Other(DriverError::NotConfigured))
        );
        assert_eq!(driver.mode, OokMode::Idle);
        driver.tx.done();
    }

    #[test]
    fn test_load_rejects_oversized_data() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut driver: OokDriver<PinMock, PinMock> = OokDriver::new(tx, None, 8, None).unwrap();
        driver.configure(&RadioConfig::PROFLAME).unwrap();

        assert_eq!(
            driver.load(&[0u8; BURST_LEN + 1], 0),
            Err(nb::Error::Other(DriverError::BufferOverflow {
                len: BURST_LEN + 1,
                max: BURST_LEN
            }))
        );
        driver.tx.done();
    }

    #[test]
    fn test_load_starts_transmission() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let ptt = PinMock::new(&[PinTransaction::set(PinState::High)]);

        let mut driver = OokDriver::new(tx, Some(ptt), 8, Some(false)).unwrap();
        driver.configure(&RadioConfig::PROFLAME).unwrap();

        assert_eq!(driver.load(&[0xa5, 0x0f], 4), Ok(()));
        assert_eq!(driver.mode, OokMode::Tx);
        assert_eq!(driver.tx_repeats, 4);
        assert_eq!(driver.wait_burst_sent(), Err(nb::Error::WouldBlock));
        assert_eq!(driver.load(&[0xff], 0), Err(nb::Error::WouldBlock));
        driver.tx.done();
        let _ = driver.ptt.as_mut().map(|ptt| ptt.done());
    }

    #[test]
    fn test_tick_keys_bits_and_repeats() {
        // init low, then 0b1011_0001 twice, then idle low
        let mut states = vec![0];
        states.extend_from_slice(&[1, 0, 1, 1, 0, 0, 0, 1]);
        states.extend_from_slice(&[1, 0, 1, 1, 0, 0, 0, 1]);
        states.push(0);
        let tx = PinMock::new(&pin_states(&states));
        let ptt = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        // inverted PTT: active low
        let mut driver = OokDriver::new(tx, Some(ptt), 2, Some(true)).unwrap();
        driver.configure(&RadioConfig::PROFLAME).unwrap();
        driver.load(&[0b1011_0001], 1).unwrap();

        // 16 bits + 1 idle bit period, 2 ticks per bit, with some slack
        for _ in 0..(17 * 2 + 6) {
            driver.tick().unwrap();
        }

        assert_eq!(driver.mode, OokMode::Idle);
        assert_eq!(driver.tx_good, 1);
        assert_eq!(driver.tx_index, 8);
        assert_eq!(driver.wait_burst_sent(), Ok(()));
        driver.tx.done();
        let _ = driver.ptt.as_mut().map(|ptt| ptt.done());
    }

    #[test]
    fn test_pin_fault_aborts_burst() {
        use embedded_hal::digital::ErrorKind;
        use embedded_hal_mock::eh1::MockError;
        use std::io::ErrorKind as IoErrorKind;

        let tx = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High)
                .with_error(MockError::Io(IoErrorKind::NotConnected)),
            PinTransaction::set(PinState::Low),
        ]);
        let mut driver: OokDriver<PinMock, PinMock> = OokDriver::new(tx, None, 1, None).unwrap();
        driver.configure(&RadioConfig::PROFLAME).unwrap();
        driver.load(&[0x80], 0).unwrap();

        assert_eq!(driver.tick(), Err(DriverError::Pin(ErrorKind::Other)));
        assert_eq!(driver.mode, OokMode::Idle);
        assert_eq!(driver.take_fault(), Some(DriverError::Pin(ErrorKind::Other)));
        assert_eq!(driver.take_fault(), None);
        assert_eq!(driver.tx_good, 0);
        driver.tx.done();
    }

    #[test]
    fn test_burst_counter_wraps() {
        let mut states = vec![0];
        states.extend_from_slice(&[1, 1, 1, 1, 1, 1, 1, 1]);
        states.push(0);
        let tx = PinMock::new(&pin_states(&states));
        let mut driver: OokDriver<PinMock, PinMock> = OokDriver::new(tx, None, 1, None).unwrap();
        driver.configure(&RadioConfig::PROFLAME).unwrap();
        driver.tx_good = u16::MAX;

        driver.load(&[0xff], 0).unwrap();
        while driver.mode == OokMode::Tx {
            driver.tick().unwrap();
        }

        assert_eq!(driver.tx_good, 0);
        driver.tx.done();
    }
}
