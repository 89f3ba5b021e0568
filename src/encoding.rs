//! Symbol framing and line coding for Proflame 2 packets.
//!
//! Encoding happens in two separate stages:
//!
//! 1. **Framing** turns each 9-bit [`Word`] into 13 symbols,
//!    `S 1 <content bits> parity 1`, and closes the packet with 9 pad symbols.
//!    Parity and guard bits only exist at this level.
//! 2. **Line coding** expands every symbol into 2 on-air bits.
//!
//! ## Symbol Table
//!
//! | Symbol | Bits |
//! |--------|------|
//! | `Sync` | `11` |
//! | `Zero` | `01` |
//! | `One`  | `10` |
//! | `Pad`  | `00` |
//!
//! Data symbols are Manchester coded; the two extra symbols give the receiver a
//! word boundary (`11`) and a quiet gap between repetitions (`00`).
//!
//! ## Functions
//!
//! - [`frame_word`]: Frames one word into 13 symbols
//! - [`frame_packet`]: Frames a whole packet, pad symbols included
//! - [`encode_symbol`]: Line codes a single symbol
//! - [`decode_symbol`]: Recovers a symbol from its 2-bit code
//! - [`encode_buffer`]: Line codes a symbol slice into packed bytes
//! - [`decode_buffer`]: Recovers symbols from packed bytes

use heapless::Vec;

use crate::consts::{BITS_PER_SYMBOL, FRAME_SYMBOLS, PACKET_SYMBOLS, PAD_SYMBOLS};
use crate::word::{Packet, Word};

/// A framing symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Symbol {
    /// Word boundary.
    Sync,
    /// A `0` bit.
    Zero,
    /// A `1` bit.
    One,
    /// Carrier off, used after the last word.
    #[default]
    Pad,
}

impl Symbol {
    /// The data symbol for `bit`.
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Symbol::One } else { Symbol::Zero }
    }

    const fn index(self) -> usize {
        match self {
            Symbol::Sync => 0,
            Symbol::Zero => 1,
            Symbol::One => 2,
            Symbol::Pad => 3,
        }
    }
}

static CODES: [u8; 4] = [0b11, 0b01, 0b10, 0b00];
static REV_CODES: [Symbol; 4] = [Symbol::Pad, Symbol::Zero, Symbol::One, Symbol::Sync];

/// Returns the 2-bit line code of `symbol`.
pub fn encode_symbol(symbol: Symbol) -> u8 {
    CODES[symbol.index()]
}

/// Recovers the symbol for a 2-bit line code.
///
/// Returns `None` if `code` is wider than 2 bits.
pub fn decode_symbol(code: u8) -> Option<Symbol> {
    REV_CODES.get(usize::from(code)).copied()
}

/// Frames one word: sync, start guard, 9 content bits, parity, end guard.
pub fn frame_word(word: Word) -> [Symbol; FRAME_SYMBOLS] {
    let mut frame = [Symbol::One; FRAME_SYMBOLS];
    frame[0] = Symbol::Sync;
    for (slot, bit) in frame[2..11].iter_mut().zip(word.iter_bits()) {
        *slot = Symbol::from_bit(bit);
    }
    frame[11] = Symbol::from_bit(word.parity());
    frame
}

/// Frames all seven words of `packet` and appends the trailing pad symbols.
pub fn frame_packet(packet: &Packet) -> Vec<Symbol, PACKET_SYMBOLS> {
    let mut symbols = Vec::new();
    for &word in packet.words() {
        let frame = frame_word(word);
        trace!("word {} parity {}", word.bits(), frame[11] == Symbol::One);
        let _ = symbols.extend_from_slice(&frame);
    }
    for _ in 0..PAD_SYMBOLS {
        let _ = symbols.push(Symbol::Pad);
    }
    symbols
}

/// Line codes `input` into `output`, MSB first.
///
/// Stops early if `output` is full.
///
/// # Returns
/// The number of bits written
pub fn encode_buffer(input: &[Symbol], output: &mut [u8]) -> usize {
    let mut bits = 0;
    for &symbol in input {
        let byte = bits / 8;
        if byte >= output.len() {
            break;
        }
        // symbols are 2 bits wide and never straddle a byte
        let shift = 8 - BITS_PER_SYMBOL - bits % 8;
        if shift == 8 - BITS_PER_SYMBOL {
            output[byte] = 0;
        }
        output[byte] |= encode_symbol(symbol) << shift;
        bits += BITS_PER_SYMBOL;
    }
    bits
}

/// Recovers the first `count` symbols from line coded `input`.
///
/// # Returns
/// The symbols read, or `None` if `input` is shorter than `count` symbols or `count`
/// exceeds the capacity of one packet.
pub fn decode_buffer(input: &[u8], count: usize) -> Option<Vec<Symbol, PACKET_SYMBOLS>> {
    let bits = count.checked_mul(BITS_PER_SYMBOL)?;
    if count > PACKET_SYMBOLS || bits > input.len().saturating_mul(8) {
        return None;
    }
    let mut symbols = Vec::new();
    for i in 0..count {
        let bit = i * BITS_PER_SYMBOL;
        let shift = 8 - BITS_PER_SYMBOL - bit % 8;
        let code = (input[bit / 8] >> shift) & 0b11;
        symbols.push(decode_symbol(code)?).ok()?;
    }
    Some(symbols)
}
