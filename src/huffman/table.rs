use std::collections::HashMap;

use log::{debug, warn};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::huffman::{CodeTree, FrequencyTable, HuffmanConfig, HuffmanNode, Symbol, Weight};

/// Symbol-to-codeword mapping and its exact inverse.
///
/// Codewords are strings of `'0'` and `'1'`. Entries keep the order in which
/// they were derived (leaf order, left to right) or loaded.
#[derive(Debug, Clone)]
pub struct CodeTable<S> {
    entries: Vec<(S, String)>,
    forward: HashMap<S, usize>,
    reverse: HashMap<String, usize>,
    max_len: usize,
}

impl<S: Symbol> CodeTable<S> {
    /// Build the code table by walking `tree`: `'0'` for each left edge and
    /// `'1'` for each right edge.
    ///
    /// If the tree consists of a single leaf (i.e. one unique symbol), the
    /// code "0" is assigned.
    pub fn derive<W: Weight>(tree: &CodeTree<S, W>) -> Self {
        Self::derive_with(tree, &HuffmanConfig::default())
    }

    /// Like [`CodeTable::derive`], taking the single-symbol placeholder bit
    /// from `config`.
    pub fn derive_with<W: Weight>(tree: &CodeTree<S, W>, config: &HuffmanConfig) -> Self {
        let mut entries = Vec::with_capacity(tree.leaf_count());

        // Explicit stack so skewed trees cannot exhaust the call stack. Right
        // is pushed first so left subtrees are assigned first.
        let mut stack = vec![(tree.root(), String::new())];
        while let Some((node, prefix)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    let code = if prefix.is_empty() {
                        warn!(
                            "single-symbol alphabet, assigning {:?} the code {:?}",
                            symbol,
                            config.single_symbol_bit.as_char()
                        );
                        config.single_symbol_bit.as_char().to_string()
                    } else {
                        prefix
                    };
                    entries.push((symbol.clone(), code));
                }
                HuffmanNode::Internal { left, right, .. } => {
                    let mut right_prefix = prefix.clone();
                    right_prefix.push('1');
                    stack.push((&**right, right_prefix));
                    let mut left_prefix = prefix;
                    left_prefix.push('0');
                    stack.push((&**left, left_prefix));
                }
            }
        }

        let table = Self::index(entries);
        debug!(
            "derived {} codewords, longest {} bits",
            table.len(),
            table.max_len
        );
        table
    }

    /// Load a table from `(symbol, codeword)` pairs, e.g. ones saved with
    /// [`CodeTable::to_pairs`].
    ///
    /// The pairs must be non-empty, use only `'0'`/`'1'` in non-empty
    /// codewords, repeat no symbol or codeword, and be prefix-free. Any
    /// violation is reported as [`Error::InvalidCodeTable`].
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, String)>,
    {
        let entries: Vec<(S, String)> = pairs.into_iter().collect();
        if entries.is_empty() {
            return Err(Error::InvalidCodeTable("no codewords".to_string()));
        }

        for (symbol, code) in &entries {
            if code.is_empty() {
                return Err(Error::InvalidCodeTable(format!(
                    "symbol {:?} has an empty codeword",
                    symbol
                )));
            }
            if let Some(bad) = code.chars().find(|c| *c != '0' && *c != '1') {
                return Err(Error::InvalidCodeTable(format!(
                    "codeword {:?} of symbol {:?} contains {:?}",
                    code, symbol, bad
                )));
            }
        }

        let mut symbols: HashMap<&S, &str> = HashMap::with_capacity(entries.len());
        for (symbol, code) in &entries {
            if symbols.insert(symbol, code).is_some() {
                return Err(Error::InvalidCodeTable(format!(
                    "symbol {:?} listed twice",
                    symbol
                )));
            }
        }

        if let Some((shorter, longer)) = prefix_violation(entries.iter().map(|(_, c)| c.as_str()))
        {
            return Err(Error::InvalidCodeTable(if shorter == longer {
                format!("codeword {:?} assigned twice", shorter)
            } else {
                format!("codeword {:?} is a prefix of {:?}", shorter, longer)
            }));
        }

        Ok(Self::index(entries))
    }

    fn index(entries: Vec<(S, String)>) -> Self {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut reverse = HashMap::with_capacity(entries.len());
        let mut max_len = 0;
        for (i, (symbol, code)) in entries.iter().enumerate() {
            forward.insert(symbol.clone(), i);
            reverse.insert(code.clone(), i);
            max_len = max_len.max(code.len());
        }
        CodeTable {
            entries,
            forward,
            reverse,
            max_len,
        }
    }

    /// Codeword assigned to `symbol`.
    pub fn codeword(&self, symbol: &S) -> Option<&str> {
        self.forward
            .get(symbol)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Symbol whose codeword is exactly `code`.
    pub fn symbol(&self, code: &str) -> Option<&S> {
        self.reverse.get(code).map(|&i| &self.entries[i].0)
    }

    pub fn contains(&self, symbol: &S) -> bool {
        self.forward.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(symbol, codeword)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&S, &str)> + '_ {
        self.entries.iter().map(|(s, c)| (s, c.as_str()))
    }

    /// Owned `(symbol, codeword)` pairs suitable for persisting; feed them back
    /// through [`CodeTable::from_pairs`].
    pub fn to_pairs(&self) -> Vec<(S, String)> {
        self.entries.clone()
    }

    /// Length of the longest codeword.
    pub fn max_codeword_len(&self) -> usize {
        self.max_len
    }

    /// Length of the shortest codeword. Always at least 1.
    pub fn min_codeword_len(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, c)| c.len())
            .min()
            .unwrap_or(0)
    }

    /// Whether no codeword is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        prefix_violation(self.entries.iter().map(|(_, c)| c.as_str())).is_none()
    }

    /// Expected codeword length in bits under the weights in `freqs`.
    ///
    /// Returns `None` if the total weight is zero or a weighted symbol has no
    /// codeword.
    pub fn average_length<W>(&self, freqs: &FrequencyTable<S, W>) -> Option<f64>
    where
        W: Weight + ToPrimitive,
    {
        let total = freqs.total_weight().to_f64()?;
        if total == 0.0 {
            return None;
        }
        let mut bits = 0.0;
        for (symbol, weight) in freqs.iter() {
            let len = self.codeword(symbol)?.len() as f64;
            bits += weight.to_f64()? * len;
        }
        Some(bits / total)
    }

    /// Entries sorted by symbol, for stable listings.
    pub fn sorted_entries(&self) -> Vec<(&S, &str)>
    where
        S: Ord,
    {
        let mut sorted: Vec<_> = self.entries().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted
    }
}

/// Finds a codeword that is a prefix of (or equal to) another one.
///
/// After sorting, any prefix relation shows up between neighbours: every
/// string sorting between `p` and `p + rest` also starts with `p`.
fn prefix_violation<'a, I>(codes: I) -> Option<(&'a str, &'a str)>
where
    I: Iterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = codes.collect();
    sorted.sort_unstable();
    sorted
        .windows(2)
        .find(|pair| pair[1].starts_with(pair[0]))
        .map(|pair| (pair[0], pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::Bit;

    fn sample_table() -> CodeTable<char> {
        let freqs = FrequencyTable::new(
            vec!['A', 'B', 'C', 'D', '_'],
            vec![0.4, 0.1, 0.2, 0.15, 0.15],
        )
        .unwrap();
        CodeTable::derive(&CodeTree::build(&freqs).unwrap())
    }

    #[test]
    fn test_derived_codewords() {
        let table = sample_table();
        assert_eq!(table.codeword(&'A'), Some("0"));
        assert_eq!(table.codeword(&'B'), Some("100"));
        assert_eq!(table.codeword(&'D'), Some("101"));
        assert_eq!(table.codeword(&'_'), Some("110"));
        assert_eq!(table.codeword(&'C'), Some("111"));
        assert_eq!(table.codeword(&'Z'), None);
        assert_eq!(table.max_codeword_len(), 3);
        assert_eq!(table.min_codeword_len(), 1);
    }

    #[test]
    fn test_entries_in_leaf_order() {
        let table = sample_table();
        let symbols: Vec<char> = table.entries().map(|(s, _)| *s).collect();
        assert_eq!(symbols, vec!['A', 'B', 'D', '_', 'C']);
    }

    #[test]
    fn test_forward_and_reverse_are_inverse() {
        let table = sample_table();
        for (symbol, code) in table.entries() {
            assert_eq!(table.symbol(code), Some(symbol));
            assert_eq!(table.codeword(symbol), Some(code));
        }
        assert_eq!(table.symbol("1"), None);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_single_symbol_code() {
        let freqs = FrequencyTable::new(vec!['A'], vec![1u32]).unwrap();
        let tree = CodeTree::build(&freqs).unwrap();
        assert_eq!(CodeTable::derive(&tree).codeword(&'A'), Some("0"));

        let config = HuffmanConfig {
            single_symbol_bit: Bit::One,
            ..HuffmanConfig::default()
        };
        let table = CodeTable::derive_with(&tree, &config);
        assert_eq!(table.codeword(&'A'), Some("1"));
        assert_eq!(table.min_codeword_len(), 1);
    }

    #[test]
    fn test_every_counted_symbol_has_code() {
        let input = "pack my box with five dozen liquor jugs";
        let freq = FrequencyTable::from_text(input).unwrap();
        let table = CodeTable::derive(&CodeTree::build(&freq).unwrap());
        for ch in input.chars() {
            assert!(table.contains(&ch), "no codeword for {:?}", ch);
        }
        assert_eq!(table.len(), freq.len());
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_average_length() {
        let freqs = FrequencyTable::new(vec!['a', 'b', 'c'], vec![1u32, 1, 2]).unwrap();
        let table = CodeTable::derive(&CodeTree::build(&freqs).unwrap());
        // (1*2 + 1*2 + 2*1) / 4
        assert_eq!(table.average_length(&freqs), Some(1.5));

        let zeros = FrequencyTable::new(vec!['a', 'b'], vec![0u32, 0]).unwrap();
        assert_eq!(table.average_length(&zeros), None);
    }

    #[test]
    fn test_pairs_reload() {
        let table = sample_table();
        let reloaded = CodeTable::from_pairs(table.to_pairs()).unwrap();
        for (symbol, code) in table.entries() {
            assert_eq!(reloaded.codeword(symbol), Some(code));
        }
        assert_eq!(reloaded.max_codeword_len(), 3);
    }

    #[test]
    fn test_from_pairs_rejects_prefix() {
        let result = CodeTable::from_pairs(vec![
            ('a', "0".to_string()),
            ('b', "01".to_string()),
            ('c', "1".to_string()),
        ]);
        match result {
            Err(Error::InvalidCodeTable(msg)) => assert!(msg.contains("prefix")),
            other => panic!("expected InvalidCodeTable, got {:?}", other),
        }
    }

    #[test]
    fn test_from_pairs_rejects_malformed() {
        assert!(CodeTable::<char>::from_pairs(vec![]).is_err());
        assert!(CodeTable::from_pairs(vec![('a', String::new())]).is_err());
        assert!(CodeTable::from_pairs(vec![('a', "02".to_string())]).is_err());
        assert!(CodeTable::from_pairs(vec![('a', "0".to_string()), ('a', "1".to_string())]).is_err());
        let duplicate = CodeTable::from_pairs(vec![('a', "0".to_string()), ('b', "0".to_string())]);
        match duplicate {
            Err(Error::InvalidCodeTable(msg)) => assert!(msg.contains("twice")),
            other => panic!("expected InvalidCodeTable, got {:?}", other),
        }
    }

    #[test]
    fn test_from_pairs_accepts_incomplete_code() {
        // Prefix-free but not full: "11" is never assigned.
        let table = CodeTable::from_pairs(vec![('a', "0".to_string()), ('b', "10".to_string())])
            .unwrap();
        assert!(table.is_prefix_free());
        assert_eq!(table.symbol("10"), Some(&'b'));
    }

    #[test]
    fn test_sorted_entries() {
        let table = sample_table();
        let sorted: Vec<char> = table.sorted_entries().into_iter().map(|(s, _)| *s).collect();
        assert_eq!(sorted, vec!['A', 'B', 'C', 'D', '_']);
    }
}
