//! Packet word assembly.
//!
//! A packet is seven 9-bit words in a fixed order: the three serial number words,
//! two command words derived from the [`DeviceState`], and two checksum words derived
//! from the command words. The receiver indexes fields by position, so the order is
//! part of the protocol.
//!
//! ## Command Words
//!
//! ```text
//!        8     7  6  5    4  3    2      1      0
//! cmd1 | CPI | Light   | 0  0  | Th. | Pwr  | pad |
//! cmd2 | Fnt | Fan     | Aux   | Flame        | pad |
//! ```
//!
//! Bit 8 is sent first. The `hi` nibble of a command word is bits 8..=5 and the `lo`
//! nibble bits 4..=1; the pad bit takes part in neither.
//!
//! ## Checksum Words
//!
//! ```text
//! high = (C ^ hi ^ (hi << 1) ^ (lo << 1)) & 0xf
//! low  =  D ^ hi ^ lo
//! ```
//!
//! with `C = 0xd, D = 0` for the first checksum word and `C = 0, D = 0x7` for the second.

use crate::consts::{
    ECC1_HIGH_MIX, ECC1_LOW_MIX, ECC2_HIGH_MIX, ECC2_LOW_MIX, PACKET_WORDS, SERIAL_WORDS,
    WORD_BITS, WORD_MASK,
};
use crate::ecc::{ecc_high, ecc_low, nibble};
use crate::state::{DeviceState, SerialNumber};

/// Nine content bits, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Word(u16);

impl Word {
    /// Wraps the low 9 bits of `bits`.
    pub const fn from_bits(bits: u16) -> Self {
        Word(bits & WORD_MASK)
    }

    /// The 9 content bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// The 9 content bits in transmission order.
    pub fn iter_bits(self) -> impl Iterator<Item = bool> {
        (0..WORD_BITS).map(move |i| self.bit(i))
    }

    // `index` < 9, 0 is the first bit on air
    const fn bit(self, index: u8) -> bool {
        (self.0 >> (WORD_BITS - 1 - index)) & 1 != 0
    }

    /// The first four content bits.
    pub const fn high_nibble(self) -> u8 {
        nibble((self.0 >> 5) as u8)
    }

    /// Content bits five to eight.
    pub const fn low_nibble(self) -> u8 {
        nibble((self.0 >> 1) as u8)
    }

    /// Even parity over all 9 content bits: `true` when the count of ones is odd.
    pub const fn parity(self) -> bool {
        self.0.count_ones() % 2 == 1
    }

    /// The first command word: pilot, light, thermostat, power.
    pub fn command1(state: &DeviceState) -> Self {
        Word(
            (u16::from(state.pilot) << 8)
                | (u16::from(state.light.get()) << 5)
                | (u16::from(state.thermostat) << 2)
                | (u16::from(state.power) << 1),
        )
    }

    /// The second command word: front, fan, aux, flame.
    pub fn command2(state: &DeviceState) -> Self {
        Word(
            (u16::from(state.front) << 8)
                | (u16::from(state.fan.get()) << 5)
                | (u16::from(state.aux) << 4)
                | (u16::from(state.flame.get()) << 1),
        )
    }

    /// The first checksum word, computed from the first command word.
    pub fn ecc1(command1: Word) -> Self {
        Word::checksum(command1, ECC1_HIGH_MIX, ECC1_LOW_MIX)
    }

    /// The second checksum word, computed from the second command word.
    pub fn ecc2(command2: Word) -> Self {
        Word::checksum(command2, ECC2_HIGH_MIX, ECC2_LOW_MIX)
    }

    fn checksum(command: Word, high_mix: u8, low_mix: u8) -> Self {
        let hi = command.high_nibble();
        let lo = command.low_nibble();
        let high = u16::from(ecc_high(high_mix, hi, lo));
        let low = u16::from(ecc_low(low_mix, hi, lo));
        Word((high << 5) | (low << 1))
    }
}

impl From<Word> for u16 {
    fn from(word: Word) -> u16 {
        word.0
    }
}

/// The seven words of one command, in transmission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Packet {
    words: [Word; PACKET_WORDS],
}

impl Packet {
    /// Assembles the packet for `state`.
    pub fn from_state(state: &DeviceState) -> Self {
        let command1 = Word::command1(state);
        let command2 = Word::command2(state);
        Packet::from_parts(state.serial(), command1, command2)
    }

    /// Assembles a packet from a serial number and two command words.
    pub fn from_parts(serial: &SerialNumber, command1: Word, command2: Word) -> Self {
        let [s0, s1, s2] = serial.words();
        Packet {
            words: [
                Word::from_bits(s0),
                Word::from_bits(s1),
                Word::from_bits(s2),
                command1,
                command2,
                Word::ecc1(command1),
                Word::ecc2(command2),
            ],
        }
    }

    /// All seven words.
    pub const fn words(&self) -> &[Word; PACKET_WORDS] {
        &self.words
    }

    /// The serial number words.
    pub fn serial(&self) -> &[Word] {
        &self.words[..SERIAL_WORDS]
    }

    /// The two command words.
    pub const fn commands(&self) -> [Word; 2] {
        [self.words[3], self.words[4]]
    }

    /// The two checksum words.
    pub const fn checksums(&self) -> [Word; 2] {
        [self.words[5], self.words[6]]
    }
}
