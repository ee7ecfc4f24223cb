//! Symbol mapping
//!
//! A [`SymbolMapper`] turns pseudo-random 16-bit words into quantized
//! channel amplitudes. The low `c` bits of each word become a
//! constellation point, left-shifted so the full amplitude carries
//! `precision` bits. Doing everything in fixed point keeps encoder and
//! decoder arithmetic bit-exact and lets path metrics stay integral.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpinalError};

/// Maps 16-bit pseudo-random words to fixed-point amplitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMapper {
    c: u32,
    precision: u32,
}

impl SymbolMapper {
    /// Creates a mapper extracting `c` bits per word at `precision` total
    /// bits per amplitude.
    ///
    /// Requires `1 <= c <= 16` and `c <= precision <= 32`.
    pub fn new(c: u32, precision: u32) -> Result<Self> {
        if c == 0 || c > 16 {
            return Err(SpinalError::MapperBits(c));
        }
        if precision < c || precision > 32 {
            return Err(SpinalError::MapperPrecision { c, precision });
        }
        Ok(Self { c, precision })
    }

    /// Maps one pseudo-random word to an amplitude.
    pub fn map(&self, value: u16) -> i64 {
        let bits = i64::from(value) & ((1 << self.c) - 1);
        bits << (self.precision - self.c)
    }

    /// Average power of the output signal over uniform inputs.
    ///
    /// This is the second moment of the discrete uniform distribution over
    /// the `2^c` constellation points, scaled by the squared precision
    /// shift. Consumed externally for noise calibration; the engine itself
    /// never uses it.
    pub fn average_power(&self) -> f64 {
        let n = f64::from(1u32 << self.c);
        let base = (n - 1.0) * (n + 1.0) / 12.0;
        base * (1u64 << (2 * (self.precision - self.c))) as f64
    }

    /// Number of bits extracted from each word.
    pub fn c(&self) -> u32 {
        self.c
    }

    /// Total bits per amplitude.
    pub fn precision(&self) -> u32 {
        self.precision
    }
}
