//! Error types for state validation, serial parsing, the OOK driver, and the controller.

use embedded_hal::digital::ErrorKind;

use crate::radio::Modulation;
use crate::state::Field;

/// A rejected state update.
///
/// Raised before anything is encoded or transmitted, so the previous state stays in
/// effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ValidationError {
    /// A light, fan, or flame level outside `0..=6`.
    #[error("{field} level {value} is out of range (0..=6)")]
    OutOfRange {
        /// The channel the level was meant for.
        field: Field,
        /// The rejected value.
        value: i32,
    },
}

/// A malformed serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SerialError {
    /// A raw word does not fit in 9 bits.
    #[error("serial word {index} ({value}) does not fit in 9 bits")]
    WordOutOfRange {
        /// Position of the word in the serial number.
        index: usize,
        /// The rejected value.
        value: u16,
    },
    /// A binary word is not exactly 9 digits long.
    #[error("serial word {index} has {len} digits, expected 9")]
    InvalidLength {
        /// Position of the word in the serial number.
        index: usize,
        /// Number of digits found.
        len: usize,
    },
    /// A binary word contains something other than `0` or `1`.
    #[error("serial word {index} is not a binary string")]
    InvalidDigit {
        /// Position of the word in the serial number.
        index: usize,
    },
    /// The input does not hold exactly three words.
    #[error("expected 3 serial words, found {count}")]
    WordCount {
        /// Number of words found.
        count: usize,
    },
}

/// Errors raised by the OOK transmitter driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DriverError {
    /// The TX or PTT pin failed to change state.
    #[error("pin error: {0:?}")]
    Pin(ErrorKind),
    /// The data handed to the driver does not fit its transmit buffer.
    #[error("{len} bytes exceed the {max} byte transmit buffer")]
    BufferOverflow {
        /// Length of the rejected data.
        len: usize,
        /// Capacity of the transmit buffer.
        max: usize,
    },
    /// The driver can only key an on-off carrier.
    #[error("unsupported modulation {0:?}")]
    UnsupportedModulation(Modulation),
    /// A burst was loaded before the driver was configured.
    #[error("driver has not been configured")]
    NotConfigured,
    /// The global driver slot is empty.
    #[error("global driver has not been set up")]
    Uninitialized,
}

/// Errors returned by the [`Controller`](crate::controller::Controller).
///
/// Transport failures are passed through unchanged and never retried; the 5x
/// repetition of every burst is the protocol's only resilience against RF loss.
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    /// The update was rejected and nothing was transmitted.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The radio failed to configure or transmit.
    #[error("radio transport failed: {0:?}")]
    Transport(E),
}
