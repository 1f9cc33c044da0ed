//! Encoding and decoding against a fixed code table.
//!
//! Encoding concatenates codewords. Decoding scans bits left to right and
//! emits a symbol as soon as the accumulated bits match a codeword; because
//! the table is prefix-free that first match is the only possible one.

use bitvec::prelude::*;
use log::trace;

use crate::error::{Error, Result};
use crate::huffman::{CodeTable, CodeTree, FrequencyTable, HuffmanConfig, Symbol, Weight};

/// Encode `text` with `table`, failing on the first symbol without a codeword.
pub(crate) fn encode_with<S: Symbol>(table: &CodeTable<S>, text: &[S]) -> Result<String> {
    let mut encoded = String::with_capacity(text.len() * table.max_codeword_len());
    for (position, symbol) in text.iter().enumerate() {
        match table.codeword(symbol) {
            Some(code) => encoded.push_str(code),
            None => return Err(Error::unknown_symbol(symbol, position)),
        }
    }
    trace!("encoded {} symbols into {} bits", text.len(), encoded.len());
    Ok(encoded)
}

/// Decode a `'0'`/`'1'` string with `table`.
pub(crate) fn decode_with<S: Symbol>(table: &CodeTable<S>, bits: &str) -> Result<Vec<S>> {
    let mut decoded = Vec::new();
    let mut candidate = String::with_capacity(table.max_codeword_len());
    let mut start = 0;

    for (offset, bit) in bits.chars().enumerate() {
        if bit != '0' && bit != '1' {
            return Err(Error::InvalidBit { bit, offset });
        }
        if candidate.is_empty() {
            start = offset;
        }
        candidate.push(bit);

        if let Some(symbol) = table.symbol(&candidate) {
            decoded.push(symbol.clone());
            candidate.clear();
        } else if candidate.len() >= table.max_codeword_len() {
            // Only reachable with tables that leave some bit patterns
            // unassigned; no longer candidate can match either.
            return Err(Error::TruncatedCode {
                offset: start,
                pending: candidate,
                decoded: decoded.len(),
            });
        }
    }

    if !candidate.is_empty() {
        return Err(Error::TruncatedCode {
            offset: start,
            pending: candidate,
            decoded: decoded.len(),
        });
    }
    trace!("decoded {} bits into {} symbols", bits.len(), decoded.len());
    Ok(decoded)
}

/// A reusable encoder/decoder bound to one code table.
///
/// All methods take `&self`; a codec can be shared freely between threads.
///
/// # Example
///
/// ```
/// use huffcodec::huffman::Codec;
///
/// let codec = Codec::from_weights(vec!['A', 'B', 'C', 'D', '_'], vec![0.4, 0.1, 0.2, 0.15, 0.15])
///     .unwrap();
/// let encoded = codec.encode_str("ABACABAD").unwrap();
/// assert_eq!(encoded, "0100011101000101");
/// assert_eq!(codec.decode_to_string(&encoded).unwrap(), "ABACABAD");
/// ```
#[derive(Debug, Clone)]
pub struct Codec<S> {
    table: CodeTable<S>,
}

impl<S: Symbol> Codec<S> {
    pub fn new(table: CodeTable<S>) -> Self {
        Codec { table }
    }

    /// Build the tree for `freqs` and bind its code table.
    pub fn from_frequencies<W: Weight>(freqs: &FrequencyTable<S, W>) -> Result<Self> {
        Self::from_frequencies_with(freqs, &HuffmanConfig::default())
    }

    /// Like [`Codec::from_frequencies`], deriving codewords with `config`.
    pub fn from_frequencies_with<W: Weight>(
        freqs: &FrequencyTable<S, W>,
        config: &HuffmanConfig,
    ) -> Result<Self> {
        let tree = CodeTree::build(freqs)?;
        Ok(Self::new(CodeTable::derive_with(&tree, config)))
    }

    /// Build a codec from parallel symbol and weight lists.
    pub fn from_weights<W: Weight>(symbols: Vec<S>, weights: Vec<W>) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::new(symbols, weights)?)
    }

    pub fn table(&self) -> &CodeTable<S> {
        &self.table
    }

    /// Encode `text` as a bit string.
    ///
    /// Fails with [`Error::UnknownSymbol`] naming the first symbol that has
    /// no codeword; no partial output is returned.
    pub fn encode(&self, text: &[S]) -> Result<String> {
        encode_with(&self.table, text)
    }

    /// Decode a bit string.
    ///
    /// Fails with [`Error::TruncatedCode`] if the bits do not split into
    /// complete codewords, and with [`Error::InvalidBit`] on characters other
    /// than `'0'` and `'1'`.
    pub fn decode(&self, bits: &str) -> Result<Vec<S>> {
        decode_with(&self.table, bits)
    }

    /// Encode `text` into a packed, most-significant-bit-first bit vector.
    pub fn encode_bits(&self, text: &[S]) -> Result<BitVec<u8, Msb0>> {
        let mut bits = BitVec::with_capacity(text.len() * self.table.max_codeword_len());
        for (position, symbol) in text.iter().enumerate() {
            let code = self
                .table
                .codeword(symbol)
                .ok_or_else(|| Error::unknown_symbol(symbol, position))?;
            bits.extend(code.chars().map(|c| c == '1'));
        }
        Ok(bits)
    }

    /// Decode a packed bit slice produced by [`Codec::encode_bits`].
    ///
    /// The slice must hold exactly the encoded bits; byte padding would be
    /// read as a truncated codeword.
    pub fn decode_bits(&self, bits: &BitSlice<u8, Msb0>) -> Result<Vec<S>> {
        let text: String = bits
            .iter()
            .by_vals()
            .map(|bit| if bit { '1' } else { '0' })
            .collect();
        self.decode(&text)
    }

    /// Encode several independent texts in parallel.
    #[cfg(feature = "parallel")]
    pub fn encode_many<T>(&self, texts: &[T]) -> Result<Vec<String>>
    where
        T: AsRef<[S]> + Sync,
        S: Send + Sync,
    {
        use rayon::prelude::*;

        texts.par_iter().map(|text| self.encode(text.as_ref())).collect()
    }
}

impl Codec<char> {
    /// Build a codec from the character counts of `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_text(text)?)
    }

    pub fn encode_str(&self, text: &str) -> Result<String> {
        let symbols: Vec<char> = text.chars().collect();
        self.encode(&symbols)
    }

    pub fn decode_to_string(&self, bits: &str) -> Result<String> {
        Ok(self.decode(bits)?.into_iter().collect())
    }
}
