//! Constants used across the Proflame 2 protocol implementation.
//!
//! This module defines the protocol-wide constants used for radio setup,
//! word and frame layout, checksum mixing, and buffer sizing.
//!
//! These values come from captures of the vendor's handheld remote and must be
//! reproduced exactly: the fireplace receiver silently drops any burst that is
//! off by a single bit.
//!
//! ## Key Concepts
//!
//! - **Radio**: fixed carrier, modulation rate, and burst repetition count.
//! - **Words**: 9-bit units, three of serial number, two of command, two of checksum.
//! - **Frames**: each word is framed into 13 symbols; 9 pad symbols close the packet.
//! - **Line code**: every symbol becomes 2 bits on air.

/// Carrier frequency of the Proflame 2 receiver, in Hz.
pub const FREQUENCY_HZ: u32 = 314_973_000;

/// On-air data rate, in bits per second.
pub const BAUD_RATE: u32 = 2_400;

/// Number of repeats after the initial transmission of a packet.
///
/// The receiver expects 5 identical copies per command, so the transport is asked
/// for the packet plus 4 repeats.
pub const REPEAT_COUNT: u8 = 4;

/// Total number of on-air copies of one packet.
pub const TRANSMISSIONS_PER_BURST: u8 = REPEAT_COUNT + 1;

/// Highest valid light, fan, or flame level. 7 is not a burner level.
pub const MAX_LEVEL: u8 = 6;

/// Number of content bits in a word, including the trailing pad bit.
pub const WORD_BITS: u8 = 9;

/// Mask selecting the 9 content bits of a word.
pub const WORD_MASK: u16 = 0x1ff;

/// Number of serial number words at the head of every packet.
pub const SERIAL_WORDS: usize = 3;

/// Number of words in a packet: serial, command, and checksum words.
pub const PACKET_WORDS: usize = 7;

/// Number of symbols in one framed word: sync, guard, 9 content bits, parity, guard.
pub const FRAME_SYMBOLS: usize = 13;

/// Number of pad symbols that close every packet.
///
/// These also separate consecutive repetitions within a burst.
pub const PAD_SYMBOLS: usize = 9;

/// Number of symbols in a framed packet.
pub const PACKET_SYMBOLS: usize = PACKET_WORDS * FRAME_SYMBOLS + PAD_SYMBOLS;

/// Number of on-air bits per symbol after line coding.
pub const BITS_PER_SYMBOL: usize = 2;

/// Number of on-air bits in one encoded packet.
pub const BURST_BITS: usize = PACKET_SYMBOLS * BITS_PER_SYMBOL;

/// Number of bytes in one encoded packet, packed MSB first.
pub const BURST_LEN: usize = BURST_BITS.div_ceil(8);

/// Constant mixed into the high nibble of the first checksum word.
pub const ECC1_HIGH_MIX: u8 = 0xd;

/// Constant mixed into the low nibble of the first checksum word.
pub const ECC1_LOW_MIX: u8 = 0x0;

/// Constant mixed into the high nibble of the second checksum word.
pub const ECC2_HIGH_MIX: u8 = 0x0;

/// Constant mixed into the low nibble of the second checksum word.
pub const ECC2_LOW_MIX: u8 = 0x7;

/// A serial number known to pair with Proflame 2 receivers, pad bits included.
pub const DEFAULT_SERIAL: [u16; SERIAL_WORDS] = [0b001001011, 0b011110100, 0b000000100];
