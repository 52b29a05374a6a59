//! R-tree construction and query traversal

use std::mem;

use crate::geometry::{BoundingBox, Point2d};

use super::node::{Entry, Node, NodeId};

/// Spatial index over axis-aligned bounding boxes.
///
/// Nodes live in an arena `Vec` and reference each other by index, so the
/// parent back-links used by bbox adjustment cannot form ownership cycles;
/// dropping the tree drops the arena. The tree is insert-only: it is built
/// once and then queried, and [`clear`](RTree::clear) is the only way to
/// remove entries.
///
/// One tree indexes one kind of item; the store keeps an instance per
/// entity kind.
///
/// # Example
///
/// ```
/// use hdmap::geometry::{BoundingBox, Point2d};
/// use hdmap::rtree::RTree;
///
/// let mut tree = RTree::new();
/// tree.insert(BoundingBox::from_point(Point2d::new(1.0, 1.0)), 42u64);
///
/// let region = BoundingBox::new(Point2d::new(0.0, 0.0), Point2d::new(2.0, 2.0));
/// assert_eq!(tree.query(&region), vec![42]);
/// ```
#[derive(Debug)]
pub struct RTree<T> {
    nodes: Vec<Node<T>>,
    root: NodeId,
    len: usize,
}

impl<T> RTree<T> {
    /// Creates an empty tree: a single leaf root, height 1.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new_leaf()],
            root: NodeId::new(0),
            len: 0,
        }
    }

    /// Inserts one item under `bbox`.
    ///
    /// Duplicates are not detected; inserting the same bbox twice stores
    /// two entries.
    pub fn insert(&mut self, bbox: BoundingBox, item: T) {
        let leaf = self.choose_leaf(&bbox);
        let entry = Entry::Item { bbox, item };
        if self.nodes[leaf.get()].is_full() {
            self.split_node(leaf, entry);
        } else {
            self.nodes[leaf.get()].entries.push(entry);
            self.adjust_tree(leaf);
        }
        self.len += 1;
    }

    /// Returns every item whose bbox intersects `bbox`.
    ///
    /// Touching edges count as intersection. Result order is unspecified.
    pub fn query(&self, bbox: &BoundingBox) -> Vec<T>
    where
        T: Clone,
    {
        let mut results = Vec::new();
        self.query_node(self.root, bbox, &mut results);
        results
    }

    /// Returns every item whose bbox intersects the axis-aligned square
    /// `[center - radius, center + radius]`.
    ///
    /// This is a conservative superset of the items within Euclidean
    /// `radius`: items near the square's corners may lie farther away.
    /// Callers needing the exact set filter the result by true distance.
    pub fn query_radius(&self, center: &Point2d, radius: f64) -> Vec<T>
    where
        T: Clone,
    {
        // A negative radius matches nothing.
        if radius < 0.0 {
            return Vec::new();
        }
        let bbox = BoundingBox::new(
            Point2d::new(center.x - radius, center.y - radius),
            Point2d::new(center.x + radius, center.y + radius),
        );
        self.query(&bbox)
    }

    /// Number of items inserted since construction or the last clear.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels from the root to the leaves.
    ///
    /// An empty tree has height 1; the height only grows when a root split
    /// adds a level.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        loop {
            let node = &self.nodes[current.get()];
            if node.is_leaf {
                break;
            }
            match node.entries.first() {
                Some(Entry::Child { node: child, .. }) => {
                    current = *child;
                    height += 1;
                }
                _ => break,
            }
        }
        height
    }

    /// Drops all entries, resetting to a single empty leaf root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new_leaf());
        self.root = NodeId::new(0);
        self.len = 0;
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Descends to the leaf whose box grows least by accepting `bbox`.
    ///
    /// Ties go to the first child encountered.
    fn choose_leaf(&self, bbox: &BoundingBox) -> NodeId {
        let mut current = self.root;
        while !self.nodes[current.get()].is_leaf {
            let mut best = None;
            let mut min_enlargement = f64::MAX;
            for entry in &self.nodes[current.get()].entries {
                if let Entry::Child { bbox: child_bbox, node } = entry {
                    let enlargement = child_bbox.enlargement(bbox);
                    if enlargement < min_enlargement {
                        min_enlargement = enlargement;
                        best = Some(*node);
                    }
                }
            }
            // Internal nodes always route at least one child.
            match best {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Splits a full node that must additionally accept `new_entry`.
    ///
    /// Linear split: the two entries whose centers are farthest apart seed
    /// the original node and a fresh sibling, and each remaining entry goes
    /// to the half it enlarges less, ties staying with the original node.
    /// A root split grows the tree by one level.
    fn split_node(&mut self, node_id: NodeId, new_entry: Entry<T>) {
        let mut all = mem::take(&mut self.nodes[node_id.get()].entries);
        all.push(new_entry);

        let (seed1, seed2) = farthest_pair(&all);
        // seed2 > seed1, so removing it first leaves seed1's index valid.
        let seed2_entry = all.remove(seed2);
        let seed1_entry = all.remove(seed1);

        let is_leaf = self.nodes[node_id.get()].is_leaf;
        let parent = self.nodes[node_id.get()].parent;
        let mut sibling = if is_leaf {
            Node::new_leaf()
        } else {
            Node::new_internal()
        };
        sibling.parent = parent;
        let sibling_id = self.alloc(sibling);

        let mut node_bbox = seed1_entry.bbox();
        let mut sibling_bbox = seed2_entry.bbox();
        let mut node_entries = vec![seed1_entry];
        let mut sibling_entries = vec![seed2_entry];

        for entry in all {
            let bbox = entry.bbox();
            let enlarge_original = node_bbox.enlargement(&bbox);
            let enlarge_sibling = sibling_bbox.enlargement(&bbox);
            if enlarge_original <= enlarge_sibling {
                node_bbox = node_bbox.union(&bbox);
                node_entries.push(entry);
            } else {
                sibling_bbox = sibling_bbox.union(&bbox);
                sibling_entries.push(entry);
            }
        }

        self.nodes[node_id.get()].entries = node_entries;
        self.nodes[sibling_id.get()].entries = sibling_entries;

        // Children distributed to the sibling now answer to it.
        if !is_leaf {
            self.repoint_children(node_id);
            self.repoint_children(sibling_id);
        }

        match parent {
            None => {
                // Root split: a new internal root adopts both halves.
                let mut new_root = Node::new_internal();
                new_root.entries.push(Entry::Child {
                    bbox: node_bbox,
                    node: node_id,
                });
                new_root.entries.push(Entry::Child {
                    bbox: sibling_bbox,
                    node: sibling_id,
                });
                let new_root = self.alloc(new_root);
                self.nodes[node_id.get()].parent = Some(new_root);
                self.nodes[sibling_id.get()].parent = Some(new_root);
                self.root = new_root;
            }
            Some(parent_id) => {
                let parent_entry = Entry::Child {
                    bbox: sibling_bbox,
                    node: sibling_id,
                };
                if self.nodes[parent_id.get()].is_full() {
                    self.split_node(parent_id, parent_entry);
                } else {
                    self.nodes[parent_id.get()].entries.push(parent_entry);
                }
            }
        }

        self.adjust_tree(node_id);
    }

    /// Resets the parent link of every child routed by `node_id`.
    fn repoint_children(&mut self, node_id: NodeId) {
        let children: Vec<NodeId> = self.nodes[node_id.get()]
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Child { node, .. } => Some(*node),
                Entry::Item { .. } => None,
            })
            .collect();
        for child in children {
            self.nodes[child.get()].parent = Some(node_id);
        }
    }

    /// Walks from `start` to the root, replacing each parent's edge bbox
    /// for the traversed child with the child's recomputed tight box.
    fn adjust_tree(&mut self, start: NodeId) {
        let mut current = start;
        while let Some(parent_id) = self.nodes[current.get()].parent {
            if let Some(tight) = self.nodes[current.get()].bbox() {
                for entry in self.nodes[parent_id.get()].entries.iter_mut() {
                    if let Entry::Child { bbox, node } = entry {
                        if *node == current {
                            *bbox = tight;
                            break;
                        }
                    }
                }
            }
            current = parent_id;
        }
    }

    /// Collects matches below `node_id`, pruning subtrees whose edge box
    /// misses the query.
    fn query_node(&self, node_id: NodeId, bbox: &BoundingBox, results: &mut Vec<T>)
    where
        T: Clone,
    {
        for entry in &self.nodes[node_id.get()].entries {
            match entry {
                Entry::Item { bbox: item_bbox, item } => {
                    if item_bbox.intersects(bbox) {
                        results.push(item.clone());
                    }
                }
                Entry::Child { bbox: child_bbox, node } => {
                    if child_bbox.intersects(bbox) {
                        self.query_node(*node, bbox, results);
                    }
                }
            }
        }
    }
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Indices of the two entries whose bbox centers are farthest apart.
///
/// Falls back to the first two entries when every pairwise distance is
/// zero. Callers guarantee at least two entries.
fn farthest_pair<T>(entries: &[Entry<T>]) -> (usize, usize) {
    let mut seed1 = 0;
    let mut seed2 = 1;
    let mut max_distance = 0.0;
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let a = entries[i].bbox().center();
            let b = entries[j].bbox().center();
            let distance = a.distance_to(&b);
            if distance > max_distance {
                max_distance = distance;
                seed1 = i;
                seed2 = j;
            }
        }
    }
    (seed1, seed2)
}
