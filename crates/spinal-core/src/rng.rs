//! Seeded pseudo-random symbol word streams
//!
//! Every spine value seeds one [`SymbolRng`], an unbounded stream of 16-bit
//! words from which channel symbols are drawn. The decoder reconstructs
//! these streams from hypothesized spine values and compares them against
//! received data; there is no other channel of agreement between encoder
//! and decoder, so two instances with the same seed must produce
//! byte-identical output for any number of draws.

use std::collections::VecDeque;

use crate::hash::{Lookup3, SpineHash};

/// First refill counter value.
const REFILL_COUNTER_INIT: u32 = 3_610_617_884;

/// Fixed odd counter increment applied after each refill, mod 2^32.
const REFILL_COUNTER_STEP: u32 = 3_243_335_647;

/// Deterministic, restartable stream of pseudo-random 16-bit words.
///
/// The seed itself supplies the first two output words (its high half,
/// then its low half), saving one hash application. Afterwards each refill
/// hashes the seed with a running counter and queues the digest's two
/// halves, high word first. Words are always released oldest-first.
///
/// A `SymbolRng` is owned exclusively by whoever created it; `next`
/// mutates the queue and counter and is not safe for concurrent calls.
/// Instances for different seeds are fully independent.
#[derive(Debug, Clone)]
pub struct SymbolRng<H: SpineHash = Lookup3> {
    seed: u32,
    counter: u32,
    queue: VecDeque<u16>,
    hash: H,
}

impl SymbolRng {
    /// Creates a word stream seeded by `seed`, mixing with [`Lookup3`].
    pub fn new(seed: u32) -> Self {
        Self::with_hash(Lookup3, seed)
    }
}

impl<H: SpineHash> SymbolRng<H> {
    /// Creates a word stream seeded by `seed`, mixing with `hash`.
    ///
    /// The variant must match the one used to build the spine; see
    /// [`SpineHash`].
    pub fn with_hash(hash: H, seed: u32) -> Self {
        let mut queue = VecDeque::with_capacity(2);
        queue.push_back((seed >> 16) as u16);
        queue.push_back(seed as u16);
        Self {
            seed,
            counter: REFILL_COUNTER_INIT,
            queue,
            hash,
        }
    }

    /// Returns the next 16-bit word of the stream.
    pub fn next(&mut self) -> u16 {
        match self.queue.pop_front() {
            Some(word) => word,
            None => {
                // Refill: the digest's high half is released now, its low
                // half is queued.
                let digest = self.hash.hash(self.seed, self.counter);
                self.counter = self.counter.wrapping_add(REFILL_COUNTER_STEP);
                self.queue.push_back(digest as u16);
                (digest >> 16) as u16
            }
        }
    }

    /// The seed this stream was constructed from.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}
