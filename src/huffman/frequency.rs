use std::cmp::Ordering;
use std::collections::HashMap;

use log::trace;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::huffman::{HuffmanConfig, Symbol, Weight};

/// An ordered symbol/weight table.
///
/// Order matters: leaves are numbered in table order, and that numbering breaks
/// ties between equal weights during tree construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable<S, W> {
    symbols: Vec<S>,
    weights: Vec<W>,
}

impl<S: Symbol, W: Weight> FrequencyTable<S, W> {
    /// Create a table from parallel symbol and weight lists.
    ///
    /// Fails with [`Error::InvalidInput`] if the lists differ in length, are
    /// empty, contain a negative or NaN weight, repeat a symbol, or sum to
    /// more than `W` can hold.
    pub fn new(symbols: Vec<S>, weights: Vec<W>) -> Result<Self> {
        Self::new_with(symbols, weights, &HuffmanConfig::default())
    }

    /// Like [`FrequencyTable::new`], applying the zero-weight policy in `config`.
    pub fn new_with(symbols: Vec<S>, weights: Vec<W>, config: &HuffmanConfig) -> Result<Self> {
        if symbols.len() != weights.len() {
            return Err(Error::InvalidInput(format!(
                "{} symbols but {} weights",
                symbols.len(),
                weights.len()
            )));
        }
        if symbols.is_empty() {
            return Err(Error::InvalidInput("alphabet is empty".to_string()));
        }

        let mut seen: HashMap<&S, usize> = HashMap::with_capacity(symbols.len());
        for (i, (symbol, weight)) in symbols.iter().zip(&weights).enumerate() {
            // NaN compares as None and is rejected with the negatives.
            if matches!(weight.partial_cmp(&W::zero()), None | Some(Ordering::Less)) {
                return Err(Error::InvalidInput(format!(
                    "weight {:?} of symbol {:?} is negative",
                    weight, symbol
                )));
            }
            if !config.allow_zero_weights && weight.is_zero() {
                return Err(Error::InvalidInput(format!(
                    "symbol {:?} has zero weight",
                    symbol
                )));
            }
            if let Some(first) = seen.insert(symbol, i) {
                return Err(Error::InvalidInput(format!(
                    "symbol {:?} appears at positions {} and {}",
                    symbol, first, i
                )));
            }
        }

        // Every internal node weighs at most the total, so once the total
        // fits, all merge sums do too.
        let total = weights
            .iter()
            .try_fold(W::zero(), |acc, &w| acc.checked_add(w));
        if total.is_none() {
            return Err(Error::InvalidInput(format!(
                "total weight overflows {}",
                std::any::type_name::<W>()
            )));
        }

        Ok(FrequencyTable { symbols, weights })
    }

    /// Create a table from `(symbol, weight)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, W)>,
    {
        let (symbols, weights) = pairs.into_iter().unzip();
        Self::new(symbols, weights)
    }

    /// Number of symbols in the table.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false` for a validated table; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[S] {
        &self.symbols
    }

    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Iterate over `(symbol, weight)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, W)> + '_ {
        self.symbols.iter().zip(self.weights.iter().copied())
    }

    /// Weight of `symbol`, if present.
    pub fn weight_of(&self, symbol: &S) -> Option<W> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.weights[i])
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> W {
        self.weights.iter().fold(W::zero(), |acc, &w| acc + w)
    }
}

impl<S: Symbol> FrequencyTable<S, usize> {
    /// Count occurrences of each symbol in `items`.
    ///
    /// Symbols are ordered by first appearance, so the same input always yields
    /// the same table (and therefore the same tree).
    pub fn count<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
    {
        let mut index: HashMap<S, usize> = HashMap::new();
        let mut symbols: Vec<S> = Vec::new();
        let mut weights: Vec<usize> = Vec::new();
        for item in items {
            match index.get(&item) {
                Some(&i) => weights[i] += 1,
                None => {
                    trace!("new symbol {:?} at index {}", item, symbols.len());
                    index.insert(item.clone(), symbols.len());
                    symbols.push(item);
                    weights.push(1);
                }
            }
        }
        Self::new(symbols, weights)
    }
}

impl FrequencyTable<char, usize> {
    /// Count character occurrences in `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::count(text.chars())
    }
}

impl FrequencyTable<u8, usize> {
    /// Count byte occurrences in `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::count(data.iter().copied())
    }
}
