//! R-tree node and entry representation

use crate::geometry::BoundingBox;

/// Maximum entries a node holds before it splits.
pub const MAX_ENTRIES: usize = 8;

/// Split balance target, half of [`MAX_ENTRIES`].
///
/// Reserved for a future delete operation with node merging; insertion
/// never enforces a minimum fill.
pub const MIN_ENTRIES: usize = 4;

/// Index of a node in the tree's arena.
///
/// Plain index, not an owning reference: node lifetime is managed by the
/// arena `Vec`, and parent back-links stored as `NodeId` cannot form
/// ownership cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(super) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub(super) const fn get(self) -> usize {
        self.0
    }
}

/// One slot of a node: a routed subtree or a stored item.
///
/// Internal nodes hold only `Child` entries, leaves only `Item` entries.
#[derive(Debug, Clone)]
pub enum Entry<T> {
    /// Edge to a subtree, with the bbox covering everything below it.
    Child { bbox: BoundingBox, node: NodeId },
    /// Stored item with the bbox it was inserted under.
    Item { bbox: BoundingBox, item: T },
}

impl<T> Entry<T> {
    /// The bbox this entry is routed by.
    #[inline]
    pub fn bbox(&self) -> BoundingBox {
        match self {
            Entry::Child { bbox, .. } => *bbox,
            Entry::Item { bbox, .. } => *bbox,
        }
    }
}

/// A tree node. Leaf-ness is fixed at creation; splits produce a sibling
/// of the same kind.
#[derive(Debug)]
pub struct Node<T> {
    pub is_leaf: bool,
    pub parent: Option<NodeId>,
    pub entries: Vec<Entry<T>>,
}

impl<T> Node<T> {
    pub fn new_leaf() -> Self {
        Self {
            is_leaf: true,
            parent: None,
            entries: Vec::with_capacity(MAX_ENTRIES),
        }
    }

    pub fn new_internal() -> Self {
        Self {
            is_leaf: false,
            parent: None,
            entries: Vec::with_capacity(MAX_ENTRIES),
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_ENTRIES
    }

    /// Tight box around all entries, `None` for an empty node.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let mut iter = self.entries.iter();
        let first = iter.next()?.bbox();
        Some(iter.fold(first, |acc, entry| acc.union(&entry.bbox())))
    }
}
