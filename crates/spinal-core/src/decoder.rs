//! Spinal decoder
//!
//! The decoder reconstructs the most likely message from a noisy prefix of
//! the encoder's symbol stream with a bounded-memory tree search. It keeps
//! a wavefront of candidate partial decodings; every [`Decoder::advance`]
//! call expands each candidate over all `2^k` possible next blocks, scores
//! the hypothesized symbols against the received ones, and prunes the
//! result back down at subtree granularity.
//!
//! Pruning keeps whole subtrees of `d` layers rather than individual
//! nodes: the expanded wavefront is partitioned into consecutive groups of
//! `2^(k(d-1))` leaves sharing an ancestor `d-1` layers up, groups are
//! ranked by their best member, and only the `B` best groups survive. One
//! lucky leaf therefore cannot keep an otherwise-wrong branch alive on its
//! own.
//!
//! The decoder never knows the true message length and never declares
//! success; it always reports its current best guess. The surrounding
//! driver decides when to stop issuing rounds, typically from a symbol
//! budget or from [`Decoder::detection_metric`].

use crate::error::{Result, SpinalError};
use crate::hash::{Lookup3, SpineHash};
use crate::mapper::SymbolMapper;
use crate::rng::SymbolRng;

/// One surviving candidate partial decoding.
///
/// `spine_value` is exactly the spine hash folded over `path`, and
/// `metric` is the accumulated squared error of every symbol comparison
/// along the way: non-negative, and non-decreasing as the path grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavefrontNode {
    /// Sum of squared symbol distances from the root to this node.
    pub metric: u64,
    /// Spine value at this node's depth.
    pub spine_value: u32,
    /// Blocks hypothesized on the way here, one per completed round.
    pub path: Vec<u32>,
}

/// Beam-search decoder for a spinal symbol stream.
#[derive(Debug, Clone)]
pub struct Decoder<H: SpineHash = Lookup3> {
    k: usize,
    beam_width: usize,
    subtree_depth: usize,
    mapper: SymbolMapper,
    hash: H,
    wavefront: Vec<WavefrontNode>,
    rounds: usize,
}

impl Decoder {
    /// Creates a decoder using the default [`Lookup3`] spine mixer.
    ///
    /// `k` must match the encoder's block size, `beam_width` is the
    /// maximum number of subtrees retained per round, and `subtree_depth`
    /// is the number of tree layers grouped into one pruning unit.
    pub fn new(
        k: usize,
        beam_width: usize,
        subtree_depth: usize,
        mapper: SymbolMapper,
    ) -> Result<Self> {
        Self::with_hash(Lookup3, k, beam_width, subtree_depth, mapper)
    }
}

impl<H: SpineHash> Decoder<H> {
    /// Creates a decoder mixing the spine with `hash`.
    ///
    /// The variant must be the one the paired encoder was constructed
    /// with.
    pub fn with_hash(
        hash: H,
        k: usize,
        beam_width: usize,
        subtree_depth: usize,
        mapper: SymbolMapper,
    ) -> Result<Self> {
        if k == 0 || k > 16 {
            return Err(SpinalError::InvalidBlockSize(k));
        }
        if beam_width == 0 {
            return Err(SpinalError::InvalidBeamWidth);
        }
        if subtree_depth == 0 {
            return Err(SpinalError::InvalidSubtreeDepth);
        }
        // The post-prune wavefront holds B * 2^(k(d-1)) nodes and each
        // round expands it by 2^k; B * 2^(kd) must be addressable.
        let capacity = k
            .checked_mul(subtree_depth)
            .filter(|bits| *bits < usize::BITS as usize)
            .and_then(|bits| beam_width.checked_mul(1usize << bits));
        if capacity.is_none() {
            return Err(SpinalError::SearchTooLarge {
                beam_width,
                bits: k.saturating_mul(subtree_depth),
            });
        }

        tracing::debug!(
            "spinal decoder: k={}, beam_width={}, subtree_depth={}",
            k,
            beam_width,
            subtree_depth
        );

        Ok(Self {
            k,
            beam_width,
            subtree_depth,
            mapper,
            hash,
            wavefront: vec![WavefrontNode {
                metric: 0,
                spine_value: 0,
                path: Vec::new(),
            }],
            rounds: 0,
        })
    }

    /// Advances the wavefront to the next spine position.
    ///
    /// `symbols` are all received amplitudes drawn from that position, in
    /// the order the encoder produced them. The slice must not be empty:
    /// a round with no evidence is a caller bug, not a no-op.
    pub fn advance(&mut self, symbols: &[i64]) -> Result<()> {
        if symbols.is_empty() {
            return Err(SpinalError::EmptySymbols);
        }
        self.expand(symbols);
        self.prune();
        self.rounds += 1;
        Ok(())
    }

    /// The most likely message so far, as little-endian bytes.
    ///
    /// Selects the node with the smallest metric, breaking ties toward the
    /// smaller spine value, and folds its path back into
    /// `ceil(rounds * k / 8)` bytes. The decoder does not know the true
    /// message length; the caller must apply it.
    pub fn get_most_likely(&self) -> Result<Vec<u8>> {
        Ok(pack_blocks(&self.best_node()?.path, self.k))
    }

    /// Ratio of the best path metric to the second best, in `[0, 1]`.
    ///
    /// Values near zero mean the leader is well separated, which is the
    /// external driver's cue that the decode has probably converged.
    /// Defined as 1.0 when both metrics are zero.
    pub fn detection_metric(&self) -> Result<f64> {
        if self.rounds == 0 {
            return Err(SpinalError::NotStarted);
        }
        if self.wavefront.len() < 2 {
            return Err(SpinalError::NotEnoughCandidates);
        }
        let mut best = u64::MAX;
        let mut second = u64::MAX;
        for node in &self.wavefront {
            if node.metric < best {
                second = best;
                best = node.metric;
            } else if node.metric < second {
                second = node.metric;
            }
        }
        if second == 0 {
            return Ok(1.0);
        }
        Ok(best as f64 / second as f64)
    }

    /// The surviving candidates, for inspection by harnesses and tests.
    pub fn wavefront(&self) -> &[WavefrontNode] {
        &self.wavefront
    }

    /// Number of completed [`advance`](Self::advance) calls.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn best_node(&self) -> Result<&WavefrontNode> {
        if self.rounds == 0 {
            return Err(SpinalError::NotStarted);
        }
        // Ties break toward the smaller spine value, a fixed rule so
        // independent decoders agree on the readout.
        self.wavefront
            .iter()
            .min_by_key(|node| (node.metric, node.spine_value))
            .ok_or(SpinalError::NotStarted)
    }

    fn expand(&mut self, symbols: &[i64]) {
        let fanout = 1usize << self.k;
        let mut expanded = Vec::with_capacity(self.wavefront.len() * fanout);
        for node in &self.wavefront {
            for block in 0..fanout as u32 {
                let spine_value = self.hash.hash(node.spine_value, block);
                let mut rng = SymbolRng::with_hash(self.hash.clone(), spine_value);
                let mut metric = node.metric;
                for &received in symbols {
                    let hypothesized = self.mapper.map(rng.next());
                    let distance = received - hypothesized;
                    metric += (distance * distance) as u64;
                }
                let mut path = Vec::with_capacity(node.path.len() + 1);
                path.extend_from_slice(&node.path);
                path.push(block);
                expanded.push(WavefrontNode {
                    metric,
                    spine_value,
                    path,
                });
            }
        }
        self.wavefront = expanded;
    }

    fn prune(&mut self) {
        let group = 1usize << (self.k * (self.subtree_depth - 1));
        if self.wavefront.len() <= group {
            // Bootstrap: fewer than d rounds have run, so the whole
            // wavefront is still one subtree and nothing can be pruned.
            return;
        }
        assert!(
            self.wavefront.len() % group == 0,
            "expanded wavefront is not subtree-aligned"
        );

        let mut remaining = std::mem::take(&mut self.wavefront);
        let mut subtrees = Vec::with_capacity(remaining.len() / group);
        while !remaining.is_empty() {
            let rest = remaining.split_off(group);
            subtrees.push(remaining);
            remaining = rest;
        }

        // Rank subtrees by their best member. The sort is stable, so
        // subtrees tying on metric keep their original partition order.
        let mut ranked: Vec<(u64, Vec<WavefrontNode>)> = subtrees
            .into_iter()
            .map(|nodes| {
                let best = nodes.iter().map(|n| n.metric).min().unwrap_or(u64::MAX);
                (best, nodes)
            })
            .collect();
        ranked.sort_by_key(|(best, _)| *best);

        if ranked.len() > self.beam_width && ranked[self.beam_width - 1].0 == ranked[self.beam_width].0
        {
            tracing::warn!(
                "two subtrees share metric {} at the pruning boundary; keeping the earlier one",
                ranked[self.beam_width].0
            );
        }

        ranked.truncate(self.beam_width);
        self.wavefront = ranked.into_iter().flat_map(|(_, nodes)| nodes).collect();
    }
}

/// Folds a block path back into bytes, block 0 contributing the
/// least-significant bits, bytes emitted little end first.
fn pack_blocks(path: &[u32], k: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((path.len() * k + 7) / 8);
    let mut acc = 0u64;
    let mut acc_bits = 0;
    for &block in path {
        acc |= u64::from(block) << acc_bits;
        acc_bits += k;
        while acc_bits >= 8 {
            bytes.push(acc as u8);
            acc >>= 8;
            acc_bits -= 8;
        }
    }
    if acc_bits > 0 {
        bytes.push(acc as u8);
    }
    bytes
}
