//! Deterministic Huffman coding.
//!
//! Builds an optimal prefix-free code from a symbol/weight table, derives the
//! symbol-to-codeword mapping, and encodes or decodes symbol streams against
//! it. Trees are reproducible: equal weights are ordered by node creation.
pub mod error;
pub mod huffman;

pub use error::{Error, Result};
pub use huffman::{
    build_tree, decode, derive_code_table, encode, Bit, CodeTable, CodeTree, Codec,
    FrequencyTable, HuffmanConfig, HuffmanNode, MergeObserver, MergeStep,
};
