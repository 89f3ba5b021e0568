//! Radio transport abstraction.
//!
//! The codec hands each [`Burst`](crate::codec::Burst) to a [`Radio`]. Anything that
//! can key a 314.973 MHz on-off carrier at 2400 baud can implement it. The bundled
//! [`BlockingTransmitter`](crate::timer) and [`GlobalRadio`](crate::timer) clock an
//! [`OokDriver`](crate::driver::OokDriver) from a delay or a timer interrupt, while a
//! USB dongle or a sub-GHz transceiver would program its own registers in
//! [`Radio::configure`].

use crate::consts::{BAUD_RATE, FREQUENCY_HZ};

/// Carrier modulation.
///
/// Proflame receivers only demodulate [`AskOok`](Modulation::AskOok). The other
/// schemes are those a general purpose transceiver can be asked for; radios that
/// cannot produce the requested one reject it in [`Radio::configure`]. More may be
/// added, so matches need a wildcard arm:
///
/// ```rust,compile_fail
/// use proflame::radio::Modulation;
///
/// fn name(modulation: Modulation) -> &'static str {
///     match modulation {
///         Modulation::AskOok => "ask/ook",
///         Modulation::Fsk2 => "2-fsk",
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[non_exhaustive]
pub enum Modulation {
    /// Amplitude shift keying, on-off keyed variant.
    #[default]
    AskOok,
    /// Two-level frequency shift keying.
    Fsk2,
}

/// Fixed radio parameters for a device family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RadioConfig {
    /// Carrier frequency in Hz.
    pub frequency_hz: u32,
    /// Carrier modulation.
    pub modulation: Modulation,
    /// Data rate in bits per second.
    pub baud: u32,
}

impl RadioConfig {
    /// 314.973 MHz, ASK/OOK, 2400 baud.
    pub const PROFLAME: RadioConfig = RadioConfig {
        frequency_hz: FREQUENCY_HZ,
        modulation: Modulation::AskOok,
        baud: BAUD_RATE,
    };
}

impl Default for RadioConfig {
    fn default() -> Self {
        RadioConfig::PROFLAME
    }
}

/// A transmitter able to send Proflame bursts.
///
/// Implementations must not be shared between concurrent callers; the
/// [`Controller`](crate::controller::Controller) owns its radio and takes `&mut self`
/// for every transmission.
pub trait Radio {
    /// Transport failure.
    type Error: core::fmt::Debug;

    /// Programs carrier, modulation, and data rate. Called once before any transmission.
    fn configure(&mut self, config: &RadioConfig) -> Result<(), Self::Error>;

    /// Puts the radio in its quiescent state, dropping any residual carrier.
    fn set_mode_idle(&mut self) -> Result<(), Self::Error>;

    /// Sends `data` (packed MSB first) once, then `repeat` more times back to back.
    ///
    /// Blocks until the last copy is on air.
    fn transmit(&mut self, data: &[u8], repeat: u8) -> Result<(), Self::Error>;
}

impl<R: Radio + ?Sized> Radio for &mut R {
    type Error = R::Error;

    fn configure(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        (**self).configure(config)
    }

    fn set_mode_idle(&mut self) -> Result<(), Self::Error> {
        (**self).set_mode_idle()
    }

    fn transmit(&mut self, data: &[u8], repeat: u8) -> Result<(), Self::Error> {
        (**self).transmit(data, repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proflame_parameters() {
        let config = RadioConfig::default();
        assert_eq!(config.frequency_hz, 314_973_000);
        assert_eq!(config.modulation, Modulation::AskOok);
        assert_eq!(config.baud, 2_400);
        assert_eq!(config, RadioConfig::PROFLAME);
        assert_eq!(Modulation::default(), Modulation::AskOok);
    }
}
