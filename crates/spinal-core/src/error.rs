//! Error types for the spinal code engine.

use thiserror::Error;

/// Spinal code error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpinalError {
    /// Block size outside the supported range
    #[error("block size k={0} is outside the supported range 1..=16")]
    InvalidBlockSize(usize),

    /// Message bit length is not an exact multiple of the block size
    #[error("message is {bits} bits, which is not a multiple of block size k={k}")]
    MessageLength {
        /// Bit length of the offending message
        bits: usize,
        /// Block size the encoder was asked to use
        k: usize,
    },

    /// Mapper extracts an unsupported number of bits
    #[error("mapper extracts c={0} bits, outside the supported range 1..=16")]
    MapperBits(u32),

    /// Mapper precision incompatible with the number of extracted bits
    #[error("mapper precision {precision} is invalid for c={c} (need c <= precision <= 32)")]
    MapperPrecision {
        /// Bits extracted per symbol
        c: u32,
        /// Requested total precision
        precision: u32,
    },

    /// Beam width must be at least one subtree
    #[error("beam width must be at least 1")]
    InvalidBeamWidth,

    /// Subtree depth must be at least one layer
    #[error("subtree depth must be at least 1")]
    InvalidSubtreeDepth,

    /// The expanded wavefront would not be addressable in memory
    #[error("search with beam width {beam_width} and {bits} expansion bits per round is too large")]
    SearchTooLarge {
        /// Requested beam width
        beam_width: usize,
        /// `k * subtree_depth`, the per-round expansion exponent
        bits: usize,
    },

    /// Symbol requested from a spine position that does not exist
    #[error("spine index {index} is out of range for a spine of length {len}")]
    SpineIndexOutOfRange {
        /// Requested spine index
        index: usize,
        /// Number of spine values in the encoder
        len: usize,
    },

    /// `advance` was called with no symbols
    #[error("advance called with an empty symbol slice")]
    EmptySymbols,

    /// A result was requested before any decode round completed
    #[error("no decode rounds have completed yet")]
    NotStarted,

    /// The wavefront is too small to compare best against second best
    #[error("detection metric requires at least two surviving candidates")]
    NotEnoughCandidates,
}

/// Result type alias for spinal code operations
pub type Result<T> = std::result::Result<T, SpinalError>;
