//! # Spinal Rateless Code Engine
//!
//! This crate implements a spinal-style rateless channel code: an encoder
//! that turns a finite message into an unbounded, reorderable, repeatable
//! stream of quantized amplitudes, and a decoder that reconstructs the
//! most likely message from a partial, noisy prefix of that stream using
//! a bounded-memory tree search.
//!
//! ## Overview
//!
//! The backbone of the code is the *spine*: a hash chain over the
//! message's k-bit blocks. Every spine value seeds a deterministic
//! pseudo-random word stream, and every word maps to a fixed-point
//! amplitude. Because the decoder can rebuild any hypothesized spine value
//! and its symbol stream on its own, the only thing transmitted is noisy
//! amplitudes: any number of them, from any spine position, in any order,
//! which is what makes the code rateless.
//!
//! ## Signal Flow
//!
//! ```text
//! TX: message → k-bit blocks → spine (hash chain) → per-index RNG → mapper → symbols
//! RX: symbols → wavefront expand (2^k hypotheses/node) → squared-error metric
//!              → subtree prune (best B of depth-d groups) → most likely message
//! ```
//!
//! ## Example
//!
//! ```rust
//! use spinal_core::{Decoder, Encoder, SymbolMapper};
//!
//! # fn main() -> spinal_core::Result<()> {
//! let mapper = SymbolMapper::new(8, 8)?;
//! let mut encoder = Encoder::new(4, mapper, b"rateless")?;
//!
//! // A noiseless channel: hand the decoder two symbols per spine value.
//! let mut decoder = Decoder::new(4, 4, 1, mapper)?;
//! for i in 0..encoder.spine_len() {
//!     let symbols = [encoder.get_symbol(i)?, encoder.get_symbol(i)?];
//!     decoder.advance(&symbols)?;
//! }
//! assert_eq!(decoder.get_most_likely()?, b"rateless");
//! # Ok(())
//! # }
//! ```
//!
//! ## Scope
//!
//! This is the encode/decode engine only. Channel noise, SNR calibration,
//! puncturing schedules (which spine index to draw from, and when), and
//! experiment bookkeeping belong to the surrounding harness. The decoder
//! never learns the true message length and never declares success; it
//! reports its best guess and a [`Decoder::detection_metric`] the driver
//! can use to decide when to stop.
//!
//! Decoders for different packets share nothing and may run on different
//! threads freely; a single decoder or symbol stream must not be driven
//! concurrently.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod hash;
pub mod mapper;
pub mod rng;

// Re-export main types
pub use decoder::{Decoder, WavefrontNode};
pub use encoder::Encoder;
pub use error::{Result, SpinalError};
pub use hash::{Lookup3, Salsa8, SpineHash};
pub use mapper::SymbolMapper;
pub use rng::SymbolRng;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::decoder::{Decoder, WavefrontNode};
    pub use crate::encoder::Encoder;
    pub use crate::error::{Result, SpinalError};
    pub use crate::hash::{Lookup3, Salsa8, SpineHash};
    pub use crate::mapper::SymbolMapper;
    pub use crate::rng::SymbolRng;
}
