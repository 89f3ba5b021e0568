//! Packet codec: [`DeviceState`] in, on-air [`Burst`] out.
//!
//! [`encode`] is a total, pure function. It assembles the seven [`Word`]s of a
//! [`Packet`], frames them into symbols, and line codes the symbols into 200 bits.
//! There is no decoder for received bursts; [`Burst::symbols`] only reverses the line
//! code for inspection.
//!
//! ```rust
//! use proflame::codec::encode;
//! use proflame::encoding::Symbol;
//! use proflame::state::{DeviceState, SerialNumber};
//!
//! let burst = encode(&DeviceState::new(SerialNumber::default()));
//! assert_eq!(burst.as_bytes().len(), 25);
//! assert_eq!(burst.symbols()[0], Symbol::Sync);
//! ```

use heapless::Vec;

use crate::consts::{BURST_BITS, BURST_LEN, FRAME_SYMBOLS, PACKET_SYMBOLS, PACKET_WORDS};
use crate::encoding::{Symbol, decode_buffer, encode_buffer, frame_packet};
use crate::state::DeviceState;
use crate::word::{Packet, Word};

/// One line coded packet, ready to be handed to a radio for 5 transmissions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Burst {
    bytes: [u8; BURST_LEN],
}

impl Burst {
    /// The packed bits, MSB first.
    pub const fn as_bytes(&self) -> &[u8; BURST_LEN] {
        &self.bytes
    }

    /// Number of meaningful bits; always 200.
    pub const fn len_bits(&self) -> usize {
        BURST_BITS
    }

    /// The on-air bits in transmission order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..BURST_BITS).map(move |i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }

    /// The framed symbols, recovered by reversing the line code.
    pub fn symbols(&self) -> Vec<Symbol, PACKET_SYMBOLS> {
        // every 2-bit code is a valid symbol and the buffer holds exactly one packet
        decode_buffer(&self.bytes, PACKET_SYMBOLS).unwrap_or_default()
    }
}

impl core::fmt::Debug for Burst {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Burst(")?;
        for byte in &self.bytes {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

/// Encodes `state` into its on-air burst.
pub fn encode(state: &DeviceState) -> Burst {
    encode_packet(&Packet::from_state(state))
}

/// Frames and line codes an assembled packet.
pub fn encode_packet(packet: &Packet) -> Burst {
    let symbols = frame_packet(packet);
    let mut bytes = [0u8; BURST_LEN];
    let written = encode_buffer(&symbols, &mut bytes);
    debug_assert_eq!(written, BURST_BITS);
    let [command1, command2] = packet.commands();
    debug!(
        "encoded commands {} {} as {:?}",
        command1.bits(),
        command2.bits(),
        &bytes[..]
    );
    Burst { bytes }
}

/// Recovers the content bits of each framed word in `burst`, for inspection.
///
/// Returns `None` if a frame does not start with a sync symbol and a start guard.
pub fn frame_words(burst: &Burst) -> Option<[Word; PACKET_WORDS]> {
    let symbols = burst.symbols();
    let mut words = [Word::default(); PACKET_WORDS];
    for (word, frame) in words.iter_mut().zip(symbols.chunks(FRAME_SYMBOLS)) {
        if frame[0] != Symbol::Sync || frame[1] != Symbol::One {
            return None;
        }
        let mut bits = 0u16;
        for &symbol in &frame[2..11] {
            bits = (bits << 1) | u16::from(symbol == Symbol::One);
        }
        *word = Word::from_bits(bits);
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{SerialNumber, Update};

    /// Demodulated capture of a real remote: pilot off, light 5, thermostat off,
    /// power on, front on, fan 6, aux off, flame 2. The capture ends one bit short of
    /// the final pad symbols.
    const CAPTURE: &str = "11100101100101100110100110111001101010100110010110101110010101010101\
                           10010110101110011001100101011001101011101010100101011001010110111001\
                           010101011001010110101110011010011001101001101";

    fn reference_state() -> DeviceState {
        DeviceState::new(SerialNumber::default())
            .apply(
                &Update::new()
                    .pilot(false)
                    .light(5)
                    .thermostat(false)
                    .power(true)
                    .front(true)
                    .fan(6)
                    .aux(false)
                    .flame(2),
            )
            .unwrap()
    }

    fn symbol_string(burst: &Burst) -> heapless::String<PACKET_SYMBOLS> {
        let mut s = heapless::String::new();
        for symbol in burst.symbols() {
            let c = match symbol {
                Symbol::Sync => 'S',
                Symbol::Zero => '0',
                Symbol::One => '1',
                Symbol::Pad => 'Z',
            };
            s.push(c).unwrap();
        }
        s
    }

    #[test]
    fn test_reference_capture_is_bit_exact() {
        let burst = encode(&reference_state());
        assert_eq!(CAPTURE.len(), 181);
        for (i, (bit, expected)) in burst.bits().zip(CAPTURE.bytes()).enumerate() {
            assert_eq!(bit, expected == b'1', "bit {i} differs from capture");
        }
        assert!(burst.bits().skip(CAPTURE.len()).all(|b| !b));
    }

    #[test]
    fn test_reference_symbols() {
        let burst = encode(&reference_state());
        assert_eq!(
            symbol_string(&burst).as_str(),
            "S100100101101S101111010011S100000010011S101010001011\
             S111100010001S100000100011S101101011011ZZZZZZZZZ"
        );
    }

    #[test]
    fn test_reference_command_windows() {
        // The 9 symbols after each command sync: the start guard and the first 8
        // content bits.
        let burst = encode(&reference_state());
        let symbols = symbol_string(&burst);
        assert_eq!(&symbols[40..49], "101010001");
        assert_eq!(&symbols[53..62], "111100010");
    }

    #[test]
    fn test_reference_bytes() {
        let burst = encode(&reference_state());
        assert_eq!(
            burst.as_bytes(),
            &[
                0xe5, 0x96, 0x69, 0xb9, 0xaa, 0x65, 0xae, 0x55, 0x59, 0x6b, 0x99, 0x95, 0x9a, 0xea,
                0x95, 0x95, 0xb9, 0x55, 0x95, 0xae, 0x69, 0x9a, 0x68, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn test_frame_words_recovers_packet() {
        let state = reference_state();
        let burst = encode(&state);
        assert_eq!(frame_words(&burst), Some(*Packet::from_state(&state).words()));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let state = reference_state();
        assert_eq!(encode(&state), encode(&state));
        assert_eq!(encode(&state), encode_packet(&Packet::from_state(&state)));
    }

    #[test]
    fn test_length_is_constant() {
        let base = DeviceState::new(SerialNumber::default());
        for level in 0..=6 {
            let state = base
                .apply(&Update::new().light(level).fan(6 - level).flame(level))
                .unwrap();
            let burst = encode(&state);
            assert_eq!(burst.bits().count(), 200);
            assert_eq!(burst.symbols().len(), PACKET_SYMBOLS);
        }
    }

    #[test]
    fn test_single_bit_flip_changes_one_parity() {
        let state = reference_state();
        let packet = Packet::from_state(&state);
        let [c1, c2] = packet.commands();
        let base = symbol_string(&encode_packet(&packet));
        for bit in 0..9 {
            let flipped = Word::from_bits(c1.bits() ^ (1 << bit));
            let other = Packet::from_parts(state.serial(), flipped, c2);
            let symbols = symbol_string(&encode_packet(&other));
            // frame 4 parity flips
            assert_ne!(&symbols[50..51], &base[50..51]);
            // serial frames and command 2 frame are untouched
            assert_eq!(&symbols[..39], &base[..39]);
            assert_eq!(&symbols[52..65], &base[52..65]);
        }
    }

    #[test]
    fn test_debug_is_hex() {
        let mut buf = heapless::String::<64>::new();
        let burst = encode(&reference_state());
        core::fmt::write(&mut buf, format_args!("{burst:?}")).unwrap();
        assert!(buf.starts_with("Burst(e59669b9"));
        assert!(buf.ends_with("680000)"));
    }
}
