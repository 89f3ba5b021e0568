//! # proflame
//!
//! A portable, no_std Rust remote emulator for Proflame 2 gas fireplace receivers
//! (FCC ID T99058402300), the control system used by most modern gas fireplace inserts.
//!
//! The crate encodes the fireplace's control state into the exact burst the vendor's
//! handheld remote sends, and keys it out through any on-off keyed 314.973 MHz
//! transmitter:
//! - a pure packet codec: serial + command words, the two-word checksum, symbol framing
//!   and the 4-symbol line code
//! - a validated device state model with atomic batched updates
//! - `embedded-hal` pin driven OOK transmitter with optional push-to-talk pin
//! - optional tick sources using either timer interrupts or blocking delay
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` for bit timing |
//! | `timer-isr` (default) | Uses `critical_section::with` for bit timing |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Protocol
//!
//! - 314.973 MHz, ASK/OOK, 2400 baud
//! - 7 words of 9 bits: 3 serial words, 2 command words, 2 checksum words
//! - each word framed as `S 1 <9 bits> parity 1`, followed by 9 pad symbols
//! - symbols line coded as `S = 11`, `0 = 01`, `1 = 10`, `pad = 00`
//! - every command is sent 5 times back to back
//!
//! ## Usage
//!
//! ```rust,ignore
//! use proflame::controller::Controller;
//! use proflame::state::{SerialNumber, Update};
//!
//! let mut fireplace = Controller::new(SerialNumber::default(), radio)?;
//! fireplace.apply(&Update::new().power(true).flame(1).light(1))?;
//! ```
//!
//! Or, encode a burst without a radio:
//!
//! ```rust
//! use proflame::codec::encode;
//! use proflame::state::{DeviceState, SerialNumber};
//!
//! let burst = encode(&DeviceState::new(SerialNumber::default()));
//! assert_eq!(burst.len_bits(), 200);
//! ```
//!
//! ## Integration Notes
//!
//! - The transmitter must be idle before each burst; the controller does this for you
//! - Only one driver instance should be active at a time in interrupt-driven mode
//! - The fireplace echoes accepted commands, but this crate never listens for the echo
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

#[macro_use]
mod fmt;

pub mod codec;
pub mod consts;
pub mod controller;
pub mod driver;
pub(crate) mod ecc;
pub mod encoding;
pub mod error;
pub mod radio;
pub mod state;
pub mod timer;
pub mod word;
