//! Map store: entity ownership, budget enforcement, and query serving
//!
//! [`MapStore`] owns the canonical entity collections and one spatial
//! index per entity kind. Maps are loaded whole, admitted against a
//! [`MemoryBudget`], and then served read-only; the usage pattern is one
//! exclusive build followed by unlimited shared queries.
//!
//! # Example
//!
//! ```
//! use hdmap::geometry::Point2d;
//! use hdmap::map::{Lane, LaneKind, MapRecords};
//! use hdmap::store::MapStore;
//!
//! let mut records = MapRecords::default();
//! let lane = Lane::new(
//!     1,
//!     LaneKind::Driving,
//!     vec![Point2d::new(0.0, 0.0), Point2d::new(100.0, 0.0)],
//!     13.89,
//! );
//! records.lanes.insert(lane.id, lane);
//!
//! let mut store = MapStore::with_default_budget();
//! store.load(records)?;
//!
//! let closest = store.closest_lane(&Point2d::new(10.0, 3.0));
//! assert_eq!(closest.map(|lane| lane.id), Some(1));
//! # Ok::<(), hdmap::store::MapError>(())
//! ```

mod budget;
mod map_store;

pub use budget::{
    estimate_memory_usage, MemoryBudget, DEFAULT_MAX_LANES, DEFAULT_MAX_TOTAL_BYTES,
    DEFAULT_MAX_TRAFFIC_LIGHTS, DEFAULT_MAX_TRAFFIC_SIGNS, INDEX_ENTRY_OVERHEAD_BYTES,
};
pub use map_store::{MapError, MapStore};
