//! Timer and tick-loop utilities for the OOK driver.
//!
//! Logic for clocking bits out of the [`OokDriver`](crate::driver::OokDriver). This
//! employs two approaches: an interrupt service routine using `critical_section::with`
//! (`timer-isr` feature), or a busy-loop delay timer (`delay-loop` feature). Each
//! provides a blocking [`Radio`](crate::radio::Radio) adapter.
//!
//! Contains helpers for polling- and ISR-based scheduling, including:
//! - `compute_ocr_value`: runtime OCR calculator
//! - `ticks_per_bit`: ticks per bit for a given tick interval
//! - `tick_ns`: tick interval for a given data rate
//! - `BlockingTransmitter` and `run_until_idle`: blocking driver loop for `DelayNs`
//! (feature `delay-loop`)
//! - `global_ook_timer_tick`, `tick_ook_timer!()` and `GlobalRadio`: interrupt-based
//! tick callback wrapper (feature `timer-isr`)
//!
//! Common prescalers for 8 ticks per bit at 2400 baud (~52.08 µs per tick):
//!
//! | F_CPU  | PRESCALER | OCR |
//! |--------|-----------|-----|
//! | 16 MHz |         8 | 104 |
//! |  8 MHz |         8 |  52 |
//! | 16 MHz |        64 |  13 |

use libm::round;

use crate::consts::BAUD_RATE;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// 2400 bits / second
pub const BITS_PER_SECOND: u32 = BAUD_RATE;
/// 1,000,000 microseconds = 1 second
pub const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;
/// 1,000,000,000 nanoseconds = 1 second
pub const NANOSECONDS_PER_SECOND: u32 = 1_000_000_000;

/// Computes the OCR value for an AVR timer (CTC mode)
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
/// - `tick_us`: desired tick interval in microseconds (e.g., 52.08)
///
/// # Returns
/// - OCR value for OCRnA (rounds to nearest integer)
/// - Number of ticks per bit at 2400 baud (for initializing the `OokDriver`)
pub fn compute_ocr_value(f_cpu: u32, prescaler: u32, tick_us: f32) -> (u16, u8) {
    let counts_per_second = f64::from(f_cpu) / f64::from(prescaler);
    let counts_per_tick = counts_per_second * (f64::from(tick_us) / MICROSECONDS_PER_SECOND);
    (round(counts_per_tick) as u16, ticks_per_bit(tick_us))
}

/// Compute ticks per bit value
///
/// # Arguments
/// - `tick_us`: desired tick interval in microseconds (e.g., 52.08)
///
/// # Returns
/// - Number of ticks per bit at 2400 baud (for initializing the `OokDriver`), at least 1
pub fn ticks_per_bit(tick_us: f32) -> u8 {
    let bit_us = MICROSECONDS_PER_SECOND / f64::from(BITS_PER_SECOND);
    let ticks = round(bit_us / f64::from(tick_us));
    if ticks < 1.0 {
        1
    } else if ticks > f64::from(u8::MAX) {
        u8::MAX
    } else {
        ticks as u8
    }
}

/// Tick interval in nanoseconds for `ticks_per_bit` ticks per bit at `baud`.
///
/// Returns 0 for a zero rate.
pub const fn tick_ns(baud: u32, ticks_per_bit: u8) -> u32 {
    let per_second = baud as u64 * ticks_per_bit as u64;
    if per_second == 0 {
        0
    } else {
        (NANOSECONDS_PER_SECOND as u64 / per_second) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_ocr_value() {
        assert_eq!(compute_ocr_value(16_000_000, 8, 52.083), (104, 8));
        assert_eq!(compute_ocr_value(8_000_000, 8, 52.083), (52, 8));
        assert_eq!(compute_ocr_value(16_000_000, 64, 52.083), (13, 8));
    }

    #[test]
    fn test_ticks_per_bit() {
        assert_eq!(ticks_per_bit(52.083), 8);
        assert_eq!(ticks_per_bit(104.17), 4);
        assert_eq!(ticks_per_bit(1000.0), 1);
        assert_eq!(ticks_per_bit(0.5), u8::MAX);
    }

    #[test]
    fn test_tick_ns() {
        assert_eq!(tick_ns(BITS_PER_SECOND, 8), 52_083);
        assert_eq!(tick_ns(BITS_PER_SECOND, 1), 416_666);
        assert_eq!(tick_ns(0, 8), 0);
    }
}
