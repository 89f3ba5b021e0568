//! The nibble-wise checksum behind both checksum words.

pub(crate) const fn ecc_high(mix: u8, hi: u8, lo: u8) -> u8 {
    let hi = nibble(hi);
    let lo = nibble(lo);
    (mix ^ hi ^ (hi << 1) ^ (lo << 1)) & 0xf
}

pub(crate) const fn ecc_low(mix: u8, hi: u8, lo: u8) -> u8 {
    (mix ^ nibble(hi) ^ nibble(lo)) & 0xf
}

pub(crate) const fn nibble(x: u8) -> u8 {
    x & 0xf
}
