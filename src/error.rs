//! Error types shared by the builder, deriver and codec.
//!
//! Every failure here is a caller-input error: nothing is transient and
//! nothing is retried.

use thiserror::Error;

/// Result type for Huffman coding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building trees, loading code tables, or coding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The symbol/weight input cannot form a code tree: length mismatch,
    /// empty alphabet, a negative weight, or a repeated symbol.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `encode` met a symbol that has no codeword.
    #[error("unknown symbol {symbol} at position {position}")]
    UnknownSymbol {
        /// Debug rendering of the offending symbol.
        symbol: String,
        /// Index of the symbol in the input text.
        position: usize,
    },

    /// The bit string is not a concatenation of complete codewords.
    #[error("truncated code: {pending:?} at bit offset {offset} does not complete a codeword")]
    TruncatedCode {
        /// Bit offset where the unmatched codeword started.
        offset: usize,
        /// The unmatched bits. Diagnostic only.
        pending: String,
        /// Number of symbols decoded before the failure. Diagnostic only.
        decoded: usize,
    },

    /// A character other than `'0'` or `'1'` appeared in a bit string.
    #[error("invalid bit {bit:?} at offset {offset}")]
    InvalidBit {
        /// The rejected character.
        bit: char,
        /// Its offset in the bit string.
        offset: usize,
    },

    /// A persisted code table failed validation.
    #[error("invalid code table: {0}")]
    InvalidCodeTable(String),
}

impl Error {
    pub(crate) fn unknown_symbol<S: std::fmt::Debug>(symbol: &S, position: usize) -> Self {
        Error::UnknownSymbol {
            symbol: format!("{:?}", symbol),
            position,
        }
    }
}
