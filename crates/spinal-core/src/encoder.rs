//! Spinal encoder
//!
//! The encoder turns a finite message into an unbounded, reorderable
//! stream of amplitudes. Construction splits the message into k-bit
//! blocks, folds the spine once, and seeds one [`SymbolRng`] per spine
//! value. After that, [`Encoder::get_symbol`] draws the next amplitude
//! from any spine index on demand: any index, any number of times, in any
//! order relative to other indices. That property is what makes the code
//! rateless and lets an external protocol puncture arbitrarily.

use crate::error::{Result, SpinalError};
use crate::hash::{Lookup3, SpineHash};
use crate::mapper::SymbolMapper;
use crate::rng::SymbolRng;

/// Splits a message into k-bit blocks, bit 0 of the message being the
/// least-significant bit of block 0.
pub(crate) fn split_into_blocks(message: &[u8], k: usize) -> Vec<u32> {
    let mask = (1u64 << k) - 1;
    let mut blocks = Vec::with_capacity(message.len() * 8 / k);
    let mut acc = 0u64;
    let mut acc_bits = 0;
    for &byte in message {
        acc |= u64::from(byte) << acc_bits;
        acc_bits += 8;
        while acc_bits >= k {
            blocks.push((acc & mask) as u32);
            acc >>= k;
            acc_bits -= k;
        }
    }
    blocks
}

/// Rateless spinal encoder.
///
/// The spine and the per-index word streams are computed once at
/// construction and owned by the encoder; each index's cursor advances
/// independently and only forward. There is no random access to "the j-th
/// symbol of index i"; callers needing reproducible access patterns must
/// track how many symbols they have already drawn per index.
#[derive(Debug, Clone)]
pub struct Encoder<H: SpineHash = Lookup3> {
    k: usize,
    mapper: SymbolMapper,
    spine: Vec<u32>,
    rngs: Vec<SymbolRng<H>>,
}

impl Encoder {
    /// Creates an encoder for `message` using the default [`Lookup3`]
    /// spine mixer.
    ///
    /// `k` is the number of message bits folded into each spine value.
    /// The message bit length must be an exact multiple of `k`; callers
    /// wanting other lengths must apply their own padding rule first.
    /// Silent truncation is never performed.
    pub fn new(k: usize, mapper: SymbolMapper, message: &[u8]) -> Result<Self> {
        Self::with_hash(Lookup3, k, mapper, message)
    }
}

impl<H: SpineHash> Encoder<H> {
    /// Creates an encoder mixing the spine with `hash`.
    ///
    /// The decoder for this stream must be constructed with the same
    /// variant.
    pub fn with_hash(hash: H, k: usize, mapper: SymbolMapper, message: &[u8]) -> Result<Self> {
        if k == 0 || k > 16 {
            return Err(SpinalError::InvalidBlockSize(k));
        }
        let bits = message.len() * 8;
        if bits % k != 0 {
            return Err(SpinalError::MessageLength { bits, k });
        }

        // spine[-1] = 0; spine[i] = hash(spine[i-1], block[i])
        let blocks = split_into_blocks(message, k);
        let mut spine = Vec::with_capacity(blocks.len());
        let mut value = 0u32;
        for &block in &blocks {
            value = hash.hash(value, block);
            spine.push(value);
        }

        let rngs = spine
            .iter()
            .map(|&seed| SymbolRng::with_hash(hash.clone(), seed))
            .collect();

        tracing::debug!(
            "spinal encoder: k={}, {} blocks, {} message bits",
            k,
            spine.len(),
            bits
        );

        Ok(Self {
            k,
            mapper,
            spine,
            rngs,
        })
    }

    /// Draws the next amplitude from the given spine index.
    pub fn get_symbol(&mut self, spine_index: usize) -> Result<i64> {
        let len = self.rngs.len();
        let rng = self
            .rngs
            .get_mut(spine_index)
            .ok_or(SpinalError::SpineIndexOutOfRange {
                index: spine_index,
                len,
            })?;
        Ok(self.mapper.map(rng.next()))
    }

    /// Number of spine values (equals the number of message blocks).
    pub fn spine_len(&self) -> usize {
        self.spine.len()
    }

    /// The spine itself.
    pub fn spine(&self) -> &[u32] {
        &self.spine
    }

    /// The block size this encoder was constructed with.
    pub fn k(&self) -> usize {
        self.k
    }
}
