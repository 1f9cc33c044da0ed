//! Huffman coding.
//!
//! This module provides:
//! - Frequency tables over any hashable symbol type and any non-negative weight
//! - Deterministic Huffman tree construction (ties broken by creation order)
//! - Code table derivation and validated reloading of persisted tables
//! - A reusable codec for bit strings and packed bit vectors
//!
//! # Examples
//!
//! ```rust
//! use huffcodec::huffman::{build_tree, decode, derive_code_table, encode, FrequencyTable};
//!
//! let freqs = FrequencyTable::new(
//!     vec!['A', 'B', 'C', 'D', '_'],
//!     vec![0.4, 0.1, 0.2, 0.15, 0.15],
//! )
//! .unwrap();
//! let tree = build_tree(&freqs).unwrap();
//! let table = derive_code_table(&tree);
//!
//! let text: Vec<char> = "ABACABAD".chars().collect();
//! let bits = encode(&table, &text).unwrap();
//! assert_eq!(decode(&table, &bits).unwrap(), text);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use num_traits::Zero;

use crate::error::Result;

pub mod codec;
pub mod frequency;
pub mod table;
pub mod tree;

pub use codec::Codec;
pub use frequency::FrequencyTable;
pub use table::CodeTable;
pub use tree::{CodeTree, HuffmanNode, MergeObserver, MergeStep, Preorder};

/// A token that can be assigned a codeword.
pub trait Symbol: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Symbol for T {}

/// A symbol weight: a frequency or probability.
///
/// Implemented for the primitive integers and floats. NaN weights are rejected
/// because they do not compare `>=` zero.
pub trait Weight: Copy + PartialOrd + Zero + Debug {
    /// `self + other`, or `None` if the sum is not representable.
    fn checked_add(self, other: Self) -> Option<Self>;
}

macro_rules! int_weight {
    ($($t:ty),*) => {
        $(impl Weight for $t {
            fn checked_add(self, other: Self) -> Option<Self> {
                <$t>::checked_add(self, other)
            }
        })*
    };
}

macro_rules! float_weight {
    ($($t:ty),*) => {
        $(impl Weight for $t {
            fn checked_add(self, other: Self) -> Option<Self> {
                Some(self + other)
            }
        })*
    };
}

int_weight!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
float_weight!(f32, f64);

/// A single code bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bit {
    /// `'0'`, taken when descending to a left child
    #[default]
    Zero,
    /// `'1'`, taken when descending to a right child
    One,
}

impl Bit {
    /// The character used for this bit in bit strings.
    pub fn as_char(self) -> char {
        match self {
            Bit::Zero => '0',
            Bit::One => '1',
        }
    }
}

/// Options for tree construction and code derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanConfig {
    /// Whether symbols with weight exactly zero are accepted.
    pub allow_zero_weights: bool,
    /// Codeword given to the only symbol of a one-symbol alphabet.
    pub single_symbol_bit: Bit,
}

impl Default for HuffmanConfig {
    fn default() -> Self {
        HuffmanConfig {
            allow_zero_weights: true,
            single_symbol_bit: Bit::Zero,
        }
    }
}

/// Build the Huffman tree for a frequency table.
pub fn build_tree<S: Symbol, W: Weight>(freqs: &FrequencyTable<S, W>) -> Result<CodeTree<S, W>> {
    CodeTree::build(freqs)
}

/// Derive the code table of a tree using the default configuration.
pub fn derive_code_table<S: Symbol, W: Weight>(tree: &CodeTree<S, W>) -> CodeTable<S> {
    CodeTable::derive(tree)
}

/// Encode `text` as a bit string of `'0'` and `'1'` characters.
pub fn encode<S: Symbol>(table: &CodeTable<S>, text: &[S]) -> Result<String> {
    codec::encode_with(table, text)
}

/// Decode a bit string produced by [`encode`] with the same table.
pub fn decode<S: Symbol>(table: &CodeTable<S>, bits: &str) -> Result<Vec<S>> {
    codec::decode_with(table, bits)
}
