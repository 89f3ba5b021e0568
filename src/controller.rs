//! High-level fireplace controller.
//!
//! A [`Controller`] owns a [`Radio`] and the last state the fireplace was told about.
//! Every accepted update re-encodes the whole packet and sends it as one burst of 5
//! transmissions. The fireplace's echo is never read back, so [`Controller::state`] is
//! what was last sent, not what the receiver confirmed.
//!
//! ```rust
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use proflame::controller::Controller;
//! use proflame::driver::OokDriver;
//! use proflame::state::{SerialNumber, Update};
//! use proflame::timer::BlockingTransmitter;
//!
//! # let mut states = vec![PinTransaction::set(PinState::Low)];
//! # let burst = proflame::codec::encode(
//! #     &proflame::state::DeviceState::new(SerialNumber::default())
//! #         .apply(&Update::new().power(true).flame(1))
//! #         .unwrap(),
//! # );
//! # for _ in 0..5 {
//! #     for bit in burst.bits() {
//! #         states.push(PinTransaction::set(if bit { PinState::High } else { PinState::Low }));
//! #     }
//! # }
//! # states.push(PinTransaction::set(PinState::Low));
//! # let tx_pin = Pin::new(&states);
//! # let delay = NoopDelay::new();
//! let driver: OokDriver<Pin, Pin> = OokDriver::new(tx_pin, None, 8, None).unwrap();
//! let radio = BlockingTransmitter::new(driver, delay);
//! let mut fireplace = Controller::new(SerialNumber::default(), radio).unwrap();
//!
//! let state = fireplace.apply(&Update::new().power(true).flame(1)).unwrap();
//! assert!(state.power);
//! assert_eq!(state.flame.get(), 1);
//! # fireplace.release().release().0.tx.done();
//! ```

use crate::codec::{Burst, encode};
use crate::consts::REPEAT_COUNT;
use crate::error::Error;
use crate::radio::{Radio, RadioConfig};
use crate::state::{DeviceState, SerialNumber, Setting, Update};

/// Sends state updates to one paired fireplace.
#[derive(Debug)]
pub struct Controller<R: Radio> {
    state: DeviceState,
    radio: R,
    last_burst: Option<Burst>,
}

impl<R: Radio> Controller<R> {
    /// Configures `radio` for Proflame and starts from the power-on defaults.
    ///
    /// Nothing is transmitted until the first update.
    pub fn new(serial: SerialNumber, mut radio: R) -> Result<Self, Error<R::Error>> {
        radio
            .configure(&RadioConfig::PROFLAME)
            .map_err(Error::Transport)?;
        info!("controller ready for serial {:?}", serial.words());
        Ok(Controller {
            state: DeviceState::new(serial),
            radio,
            last_burst: None,
        })
    }

    /// Applies `update` and transmits the resulting state.
    ///
    /// The update is validated as a whole before anything is sent. The new state is
    /// only kept once the radio has accepted the burst; on any error the previous
    /// state stays current.
    pub fn apply(&mut self, update: &Update) -> Result<DeviceState, Error<R::Error>> {
        let next = match self.state.apply(update) {
            Ok(next) => next,
            Err(e) => {
                warn!("rejected update: {:?}", e);
                return Err(e.into());
            }
        };
        let burst = encode(&next);

        self.radio.set_mode_idle().map_err(Error::Transport)?;
        self.radio
            .transmit(burst.as_bytes(), REPEAT_COUNT)
            .map_err(Error::Transport)?;
        info!(
            "sent power {} flame {} fan {} light {}",
            next.power,
            next.flame.get(),
            next.fan.get(),
            next.light.get()
        );

        self.state = next;
        self.last_burst = Some(burst);
        Ok(next)
    }

    /// Applies and transmits a single setting.
    pub fn set(&mut self, setting: Setting) -> Result<DeviceState, Error<R::Error>> {
        self.apply(&Update::from(setting))
    }

    /// The last state sent.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// The paired serial number.
    pub fn serial(&self) -> &SerialNumber {
        self.state.serial()
    }

    /// The last burst sent, if any.
    pub fn last_burst(&self) -> Option<&Burst> {
        self.last_burst.as_ref()
    }

    /// The owned radio.
    pub fn radio(&self) -> &R {
        &self.radio
    }

    /// The owned radio, mutably.
    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    /// Returns the radio.
    pub fn release(self) -> R {
        self.radio
    }
}
