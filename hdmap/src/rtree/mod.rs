//! Bounding-box spatial index
//!
//! An arena-backed R-tree tuned for this library's write-once workload:
//! the store inserts every entity of one kind at build time, then serves
//! box and radius queries against the immutable result. There is no
//! deletion and no rebalancing on removal.
//!
//! Nodes hold up to [`MAX_ENTRIES`] entries and split with a linear
//! farthest-pair heuristic; queries prune whole subtrees by their edge
//! bounding boxes, so lookups touch a small fraction of the tree once it
//! is a few levels deep.

mod node;
mod tree;

pub use node::{MAX_ENTRIES, MIN_ENTRIES};
pub use tree::RTree;
