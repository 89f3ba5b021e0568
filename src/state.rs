//! Device state model for a Proflame 2 fireplace.
//!
//! [`DeviceState`] is the single source of truth the codec consumes. It holds what this
//! remote last commanded, not what the fireplace is physically doing; the protocol has
//! no way to query the receiver back.
//!
//! Levels are carried as [`Level`], so a `DeviceState` can never hold a light, fan, or
//! flame level outside `0..=6`. Changes are expressed as a [`Setting`] or a batched
//! [`Update`] and applied with [`DeviceState::apply`], which validates every field
//! before touching any of them.

use core::fmt;
use core::str::FromStr;

use crate::consts::{DEFAULT_SERIAL, MAX_LEVEL, SERIAL_WORDS, WORD_BITS, WORD_MASK};
use crate::error::{SerialError, ValidationError};

/// The eight control channels of the fireplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Field {
    /// Pilot mode: continuous (`true`) or intermittent (`false`) pilot ignition.
    Pilot,
    /// Accent light level.
    Light,
    /// Thermostat or smart thermostat mode.
    Thermostat,
    /// Main power.
    Power,
    /// Front burner / flame split.
    Front,
    /// Blower fan level.
    Fan,
    /// Auxiliary power outlet.
    Aux,
    /// Main flame level.
    Flame,
}

impl Field {
    /// Lowercase channel name, as used in logs and errors.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Pilot => "pilot",
            Field::Light => "light",
            Field::Thermostat => "thermostat",
            Field::Power => "power",
            Field::Front => "front",
            Field::Fan => "fan",
            Field::Aux => "aux",
            Field::Flame => "flame",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A light, fan, or flame level between 0 (off) and 6 (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Level(u8);

impl Level {
    /// Level 0, off.
    pub const OFF: Level = Level(0);
    /// Level 6, high.
    pub const MAX: Level = Level(MAX_LEVEL);

    /// Returns the level, or `None` if `value` is above 6.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= MAX_LEVEL {
            Some(Level(value))
        } else {
            None
        }
    }

    /// Validates an untyped request for `field`.
    pub fn for_field(field: Field, value: i32) -> Result<Self, ValidationError> {
        u8::try_from(value)
            .ok()
            .and_then(Level::new)
            .ok_or(ValidationError::OutOfRange { field, value })
    }

    /// The level as a number.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

/// The serial number a remote is paired with.
///
/// Three 9-bit words, each including the remote's own trailing pad bit. The words are
/// opaque bit patterns and are copied into every packet verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SerialNumber([u16; SERIAL_WORDS]);

impl SerialNumber {
    /// Builds a serial number from raw 9-bit words.
    pub fn new(words: [u16; SERIAL_WORDS]) -> Result<Self, SerialError> {
        for (index, &value) in words.iter().enumerate() {
            if value > WORD_MASK {
                return Err(SerialError::WordOutOfRange { index, value });
            }
        }
        Ok(SerialNumber(words))
    }

    /// Parses three 9-digit binary strings, e.g. `["001001011", "011110100", "000000100"]`.
    pub fn parse(words: [&str; SERIAL_WORDS]) -> Result<Self, SerialError> {
        let mut out = [0u16; SERIAL_WORDS];
        for (index, word) in words.iter().enumerate() {
            out[index] = parse_word(index, word)?;
        }
        Ok(SerialNumber(out))
    }

    /// The three serial words.
    pub const fn words(&self) -> [u16; SERIAL_WORDS] {
        self.0
    }
}

fn parse_word(index: usize, word: &str) -> Result<u16, SerialError> {
    if word.len() != WORD_BITS as usize {
        return Err(SerialError::InvalidLength {
            index,
            len: word.len(),
        });
    }
    word.bytes().try_fold(0u16, |acc, digit| match digit {
        b'0' => Ok(acc << 1),
        b'1' => Ok((acc << 1) | 1),
        _ => Err(SerialError::InvalidDigit { index }),
    })
}

impl Default for SerialNumber {
    fn default() -> Self {
        SerialNumber(DEFAULT_SERIAL)
    }
}

impl FromStr for SerialNumber {
    type Err = SerialError;

    /// Parses three binary words separated by commas and/or whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = [""; SERIAL_WORDS];
        let mut count = 0;
        for word in s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|w| !w.is_empty())
        {
            if count < SERIAL_WORDS {
                words[count] = word;
            }
            count += 1;
        }
        if count != SERIAL_WORDS {
            return Err(SerialError::WordCount { count });
        }
        SerialNumber::parse(words)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a:09b},{b:09b},{c:09b}")
    }
}

/// The full control surface of the fireplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DeviceState {
    /// Continuous pilot (`true`) or intermittent pilot (`false`).
    pub pilot: bool,
    /// Accent light level.
    pub light: Level,
    /// Thermostat mode.
    pub thermostat: bool,
    /// Main power.
    pub power: bool,
    /// Front burner / flame split.
    pub front: bool,
    /// Blower fan level.
    pub fan: Level,
    /// Auxiliary outlet.
    pub aux: bool,
    /// Main flame level.
    pub flame: Level,
    serial: SerialNumber,
}

impl DeviceState {
    /// Power-on defaults: continuous pilot, everything else off.
    pub const fn new(serial: SerialNumber) -> Self {
        DeviceState {
            pilot: true,
            light: Level::OFF,
            thermostat: false,
            power: false,
            front: false,
            fan: Level::OFF,
            aux: false,
            flame: Level::OFF,
            serial,
        }
    }

    /// The paired serial number. It is fixed for the life of the state; updates
    /// carry it over unchanged.
    ///
    /// ```rust,compile_fail
    /// use proflame::state::{DeviceState, SerialNumber};
    ///
    /// let mut state = DeviceState::new(SerialNumber::default());
    /// state.serial = SerialNumber::new([0, 0, 0]).unwrap();
    /// ```
    pub const fn serial(&self) -> &SerialNumber {
        &self.serial
    }

    /// Returns the state with every field in `update` applied.
    ///
    /// All levels are validated first; if any is out of range nothing is applied and
    /// the first offending field is reported.
    pub fn apply(&self, update: &Update) -> Result<DeviceState, ValidationError> {
        let light = update
            .light
            .map(|v| Level::for_field(Field::Light, v))
            .transpose()?;
        let fan = update
            .fan
            .map(|v| Level::for_field(Field::Fan, v))
            .transpose()?;
        let flame = update
            .flame
            .map(|v| Level::for_field(Field::Flame, v))
            .transpose()?;

        Ok(DeviceState {
            pilot: update.pilot.unwrap_or(self.pilot),
            light: light.unwrap_or(self.light),
            thermostat: update.thermostat.unwrap_or(self.thermostat),
            power: update.power.unwrap_or(self.power),
            front: update.front.unwrap_or(self.front),
            fan: fan.unwrap_or(self.fan),
            aux: update.aux.unwrap_or(self.aux),
            flame: flame.unwrap_or(self.flame),
            serial: self.serial,
        })
    }

    /// Returns the state with a single setting applied.
    pub fn set(&self, setting: Setting) -> Result<DeviceState, ValidationError> {
        self.apply(&Update::from(setting))
    }
}

/// A single field assignment.
///
/// Levels are untyped so that requests from loosely typed callers reach validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Setting {
    /// Set the pilot mode.
    Pilot(bool),
    /// Set the light level.
    Light(i32),
    /// Set the thermostat mode.
    Thermostat(bool),
    /// Set main power.
    Power(bool),
    /// Set the front burner.
    Front(bool),
    /// Set the fan level.
    Fan(i32),
    /// Set the auxiliary outlet.
    Aux(bool),
    /// Set the flame level.
    Flame(i32),
}

impl Setting {
    /// The channel this setting targets.
    pub const fn field(&self) -> Field {
        match self {
            Setting::Pilot(_) => Field::Pilot,
            Setting::Light(_) => Field::Light,
            Setting::Thermostat(_) => Field::Thermostat,
            Setting::Power(_) => Field::Power,
            Setting::Front(_) => Field::Front,
            Setting::Fan(_) => Field::Fan,
            Setting::Aux(_) => Field::Aux,
            Setting::Flame(_) => Field::Flame,
        }
    }
}

/// A batch of field assignments, applied atomically.
///
/// ```rust
/// use proflame::state::{DeviceState, SerialNumber, Update};
///
/// let state = DeviceState::new(SerialNumber::default());
/// let on = state.apply(&Update::new().power(true).flame(1).light(1)).unwrap();
/// assert!(on.power);
/// assert_eq!(on.flame.get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Update {
    /// New pilot mode.
    pub pilot: Option<bool>,
    /// New light level.
    pub light: Option<i32>,
    /// New thermostat mode.
    pub thermostat: Option<bool>,
    /// New main power.
    pub power: Option<bool>,
    /// New front burner state.
    pub front: Option<bool>,
    /// New fan level.
    pub fan: Option<i32>,
    /// New auxiliary outlet state.
    pub aux: Option<bool>,
    /// New flame level.
    pub flame: Option<i32>,
}

impl Update {
    /// An update that changes nothing.
    pub const fn new() -> Self {
        Update {
            pilot: None,
            light: None,
            thermostat: None,
            power: None,
            front: None,
            fan: None,
            aux: None,
            flame: None,
        }
    }

    /// Whether the update assigns no field.
    pub fn is_empty(&self) -> bool {
        *self == Update::new()
    }

    /// Adds a setting to the batch, replacing an earlier one for the same field.
    pub const fn with(mut self, setting: Setting) -> Self {
        match setting {
            Setting::Pilot(v) => self.pilot = Some(v),
            Setting::Light(v) => self.light = Some(v),
            Setting::Thermostat(v) => self.thermostat = Some(v),
            Setting::Power(v) => self.power = Some(v),
            Setting::Front(v) => self.front = Some(v),
            Setting::Fan(v) => self.fan = Some(v),
            Setting::Aux(v) => self.aux = Some(v),
            Setting::Flame(v) => self.flame = Some(v),
        }
        self
    }

    /// Sets the pilot mode.
    pub const fn pilot(self, on: bool) -> Self {
        self.with(Setting::Pilot(on))
    }

    /// Sets the light level.
    pub const fn light(self, level: i32) -> Self {
        self.with(Setting::Light(level))
    }

    /// Sets the thermostat mode.
    pub const fn thermostat(self, on: bool) -> Self {
        self.with(Setting::Thermostat(on))
    }

    /// Sets main power.
    pub const fn power(self, on: bool) -> Self {
        self.with(Setting::Power(on))
    }

    /// Sets the front burner.
    pub const fn front(self, on: bool) -> Self {
        self.with(Setting::Front(on))
    }

    /// Sets the fan level.
    pub const fn fan(self, level: i32) -> Self {
        self.with(Setting::Fan(level))
    }

    /// Sets the auxiliary outlet.
    pub const fn aux(self, on: bool) -> Self {
        self.with(Setting::Aux(on))
    }

    /// Sets the flame level.
    pub const fn flame(self, level: i32) -> Self {
        self.with(Setting::Flame(level))
    }
}

impl From<Setting> for Update {
    fn from(setting: Setting) -> Self {
        Update::new().with(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_defaults() {
        let state = DeviceState::new(SerialNumber::default());
        assert!(state.pilot);
        assert_eq!(state.light, Level::OFF);
        assert!(!state.thermostat);
        assert!(!state.power);
        assert!(!state.front);
        assert_eq!(state.fan, Level::OFF);
        assert!(!state.aux);
        assert_eq!(state.flame, Level::OFF);
        assert_eq!(state.serial().words(), DEFAULT_SERIAL);
    }

    #[test]
    fn test_level_bounds() {
        assert_eq!(Level::new(6), Some(Level::MAX));
        assert_eq!(Level::new(7), None);
        assert_eq!(
            Level::for_field(Field::Fan, 7),
            Err(ValidationError::OutOfRange {
                field: Field::Fan,
                value: 7
            })
        );
        assert_eq!(
            Level::for_field(Field::Light, -1),
            Err(ValidationError::OutOfRange {
                field: Field::Light,
                value: -1
            })
        );
        assert_eq!(Level::for_field(Field::Flame, 0), Ok(Level::OFF));
    }

    #[test]
    fn test_apply_batch() {
        let state = DeviceState::new(SerialNumber::default());
        let next = state
            .apply(&Update::new().power(true).flame(6).light(6).fan(6).front(true))
            .unwrap();
        assert!(next.power);
        assert!(next.front);
        assert_eq!(next.flame, Level::MAX);
        assert_eq!(next.light, Level::MAX);
        assert_eq!(next.fan, Level::MAX);
        assert!(next.pilot);
        assert_eq!(next.serial(), state.serial());
    }

    #[test]
    fn test_apply_rejects_whole_batch() {
        let state = DeviceState::new(SerialNumber::default());
        let err = state
            .apply(&Update::new().power(true).light(2).flame(7))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: Field::Flame,
                value: 7
            }
        );
        // `state` is untouched and nothing partial was produced
        assert!(!state.power);
        assert_eq!(state.light, Level::OFF);
    }

    #[test]
    fn test_set_single_field() {
        let state = DeviceState::new(SerialNumber::default());
        let next = state.set(Setting::Aux(true)).unwrap();
        assert!(next.aux);
        assert_eq!(next, state.apply(&Update::new().aux(true)).unwrap());
        assert!(state.set(Setting::Light(-3)).is_err());
        assert_eq!(Setting::Light(-3).field(), Field::Light);
    }

    #[test]
    fn test_serial_survives_updates() {
        let serial = SerialNumber::new([0x1ff, 0x0aa, 0x001]).unwrap();
        let state = DeviceState::new(serial);
        let next = state
            .apply(&Update::new().power(true).light(3))
            .unwrap()
            .set(Setting::Flame(6))
            .unwrap();
        assert_eq!(next.serial(), &serial);
    }

    #[test]
    fn test_empty_update_is_identity() {
        let state = DeviceState::new(SerialNumber::default());
        assert!(Update::new().is_empty());
        assert!(!Update::from(Setting::Pilot(false)).is_empty());
        assert_eq!(state.apply(&Update::new()), Ok(state));
    }

    #[test]
    fn test_serial_parse() {
        let serial = SerialNumber::parse(["001001011", "011110100", "000000100"]).unwrap();
        assert_eq!(serial, SerialNumber::default());
        assert_eq!(
            "001001011, 011110100 000000100".parse::<SerialNumber>(),
            Ok(serial)
        );
        assert_eq!(
            SerialNumber::parse(["00100101", "011110100", "000000100"]),
            Err(SerialError::InvalidLength { index: 0, len: 8 })
        );
        assert_eq!(
            SerialNumber::parse(["001001011", "011112100", "000000100"]),
            Err(SerialError::InvalidDigit { index: 1 })
        );
        assert_eq!(
            "001001011,011110100".parse::<SerialNumber>(),
            Err(SerialError::WordCount { count: 2 })
        );
        assert_eq!(
            SerialNumber::new([0, 512, 0]),
            Err(SerialError::WordOutOfRange {
                index: 1,
                value: 512
            })
        );
    }

    #[test]
    fn test_serial_display() {
        let mut buf = heapless::String::<32>::new();
        fmt::write(&mut buf, format_args!("{}", SerialNumber::default())).unwrap();
        assert_eq!(buf.as_str(), "001001011,011110100,000000100");
    }

    #[test]
    fn test_validation_error_message() {
        let mut buf = heapless::String::<64>::new();
        let err = ValidationError::OutOfRange {
            field: Field::Light,
            value: 7,
        };
        fmt::write(&mut buf, format_args!("{err}")).unwrap();
        assert_eq!(buf.as_str(), "light level 7 is out of range (0..=6)");
    }
}
