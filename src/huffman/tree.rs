use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::huffman::{FrequencyTable, Symbol, Weight};

/// Represents a node in the Huffman tree.
///
/// Every node carries the sequence number it was created with. Leaves are
/// numbered in frequency-table order, internal nodes continue the count as
/// they are merged. The number only breaks weight ties.
#[derive(Debug, Clone, PartialEq)]
pub enum HuffmanNode<S, W> {
    /// A leaf node contains a symbol and its weight.
    Leaf { symbol: S, weight: W, sequence: usize },
    /// An internal node with left and right children and combined weight.
    Internal {
        weight: W,
        sequence: usize,
        left: Box<HuffmanNode<S, W>>,
        right: Box<HuffmanNode<S, W>>,
    },
}

impl<S, W: Copy> HuffmanNode<S, W> {
    /// Returns the weight of the node.
    pub fn weight(&self) -> W {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    /// Returns the creation sequence number of the node.
    pub fn sequence(&self) -> usize {
        match self {
            HuffmanNode::Leaf { sequence, .. } => *sequence,
            HuffmanNode::Internal { sequence, .. } => *sequence,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// The symbol held by a leaf, `None` for internal nodes.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&HuffmanNode<S, W>> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, .. } => Some(left),
        }
    }

    pub fn right(&self) -> Option<&HuffmanNode<S, W>> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { right, .. } => Some(right),
        }
    }
}

/// One merge of the construction loop, reported to a [`MergeObserver`].
#[derive(Debug)]
pub struct MergeStep<'a, S, W> {
    /// 1-based merge counter.
    pub step: usize,
    /// The freshly created internal node; its children are the two merged nodes.
    pub node: &'a HuffmanNode<S, W>,
    /// Nodes left in the queue, not counting `node`.
    pub queued: usize,
}

impl<'a, S, W: Copy> MergeStep<'a, S, W> {
    /// The first extracted node, now the left child.
    pub fn left(&self) -> Option<&'a HuffmanNode<S, W>> {
        self.node.left()
    }

    /// The second extracted node, now the right child.
    pub fn right(&self) -> Option<&'a HuffmanNode<S, W>> {
        self.node.right()
    }
}

/// Hook invoked after every merge during tree construction.
///
/// Closures taking `&MergeStep` implement this trait.
pub trait MergeObserver<S, W> {
    fn on_merge(&mut self, step: &MergeStep<'_, S, W>);
}

impl<S, W, F> MergeObserver<S, W> for F
where
    F: FnMut(&MergeStep<'_, S, W>),
{
    fn on_merge(&mut self, step: &MergeStep<'_, S, W>) {
        self(step)
    }
}

struct Silent;

impl<S, W> MergeObserver<S, W> for Silent {
    fn on_merge(&mut self, _step: &MergeStep<'_, S, W>) {}
}

/// A helper wrapper for HuffmanNode for use in a BinaryHeap.
/// The node with the smallest `(weight, sequence)` key has highest priority.
struct QueueEntry<S, W>(Box<HuffmanNode<S, W>>);

impl<S, W: Weight> Ord for QueueEntry<S, W> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: lower weight, then lower sequence, comes first. Weights are
        // validated non-NaN, so `partial_cmp` always succeeds.
        other
            .0
            .weight()
            .partial_cmp(&self.0.weight())
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.0.sequence().cmp(&self.0.sequence()))
    }
}

impl<S, W: Weight> PartialOrd for QueueEntry<S, W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S, W: Weight> PartialEq for QueueEntry<S, W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S, W: Weight> Eq for QueueEntry<S, W> {}

/// An immutable Huffman code tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTree<S, W> {
    root: Box<HuffmanNode<S, W>>,
    leaves: usize,
}

impl<S: Symbol, W: Weight> CodeTree<S, W> {
    /// Build the Huffman tree for `freqs`.
    ///
    /// The two lowest `(weight, sequence)` nodes are merged repeatedly; the
    /// first extracted becomes the left child. For a fixed table order the
    /// resulting shape is fully determined, even with repeated weights.
    pub fn build(freqs: &FrequencyTable<S, W>) -> Result<Self> {
        Self::build_with_observer(freqs, &mut Silent)
    }

    /// Like [`CodeTree::build`], reporting every merge to `observer`.
    ///
    /// # Example
    ///
    /// ```
    /// use huffcodec::huffman::{CodeTree, FrequencyTable, MergeStep};
    ///
    /// let freqs = FrequencyTable::new(vec!['a', 'b', 'c'], vec![1u32, 1, 2]).unwrap();
    /// let mut merged = Vec::new();
    /// let tree = CodeTree::build_with_observer(&freqs, &mut |step: &MergeStep<'_, char, u32>| {
    ///     merged.push(step.node.weight());
    /// })
    /// .unwrap();
    /// assert_eq!(merged, vec![2, 4]);
    /// assert_eq!(tree.total_weight(), 4);
    /// ```
    pub fn build_with_observer<O>(freqs: &FrequencyTable<S, W>, observer: &mut O) -> Result<Self>
    where
        O: MergeObserver<S, W> + ?Sized,
    {
        let mut heap = BinaryHeap::with_capacity(freqs.len());
        let mut sequence = 0usize;
        for (symbol, weight) in freqs.iter() {
            trace!(
                "queue leaf {:?} weight {:?} sequence {}",
                symbol,
                weight,
                sequence
            );
            heap.push(QueueEntry(Box::new(HuffmanNode::Leaf {
                symbol: symbol.clone(),
                weight,
                sequence,
            })));
            sequence += 1;
        }
        let leaves = heap.len();

        let mut step = 0usize;
        let root = loop {
            let left = match heap.pop() {
                Some(QueueEntry(node)) => node,
                None => return Err(Error::InvalidInput("alphabet is empty".to_string())),
            };
            let right = match heap.pop() {
                Some(QueueEntry(node)) => node,
                None => break left,
            };

            step += 1;
            let weight = left.weight() + right.weight();
            debug!(
                "step {}: merged weights {:?} and {:?} into {:?}",
                step,
                left.weight(),
                right.weight(),
                weight
            );
            let internal = Box::new(HuffmanNode::Internal {
                weight,
                sequence,
                left,
                right,
            });
            sequence += 1;

            observer.on_merge(&MergeStep {
                step,
                node: &internal,
                queued: heap.len(),
            });
            heap.push(QueueEntry(internal));
        };

        Ok(CodeTree { root, leaves })
    }
}

impl<S, W: Weight> CodeTree<S, W> {
    pub fn root(&self) -> &HuffmanNode<S, W> {
        &self.root
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Root weight: the sum of all symbol weights.
    pub fn total_weight(&self) -> W {
        self.root.weight()
    }

    /// Longest root-to-leaf edge count. A single-leaf tree has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self.root.as_ref(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => height = height.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((&**right, depth + 1));
                    stack.push((&**left, depth + 1));
                }
            }
        }
        height
    }

    /// Sum of `weight * depth` over all leaves.
    ///
    /// Computed as the sum of internal node weights, which is the same quantity
    /// and needs no multiplication.
    pub fn weighted_path_length(&self) -> W {
        self.preorder()
            .filter(|node| !node.is_leaf())
            .fold(W::zero(), |acc, node| acc + node.weight())
    }

    /// Depth-first, left-before-right traversal starting at the root.
    pub fn preorder(&self) -> Preorder<'_, S, W> {
        Preorder {
            stack: vec![self.root.as_ref()],
        }
    }
}

/// Preorder iterator over the nodes of a [`CodeTree`].
pub struct Preorder<'a, S, W> {
    stack: Vec<&'a HuffmanNode<S, W>>,
}

impl<'a, S, W> Iterator for Preorder<'a, S, W> {
    type Item = &'a HuffmanNode<S, W>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let HuffmanNode::Internal { left, right, .. } = node {
            self.stack.push(&**right);
            self.stack.push(&**left);
        }
        Some(node)
    }
}
