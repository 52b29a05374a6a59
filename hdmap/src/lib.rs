//! HDMap - In-memory high-definition map store for autonomous driving
//!
//! This library loads a Lanelet2-derived road map into memory under a
//! configurable budget and serves spatial queries over lanes, traffic
//! lights, and traffic signs.
//!
//! # High-Level API
//!
//! For most use cases, the [`store`] module provides the facade:
//!
//! ```ignore
//! use hdmap::store::{MapStore, MemoryBudget};
//!
//! let mut store = MapStore::new(MemoryBudget::default());
//! store.load_from_file("map.osm")?;
//!
//! // All lanes within 100 m of the ego position
//! let nearby = store.nearby_lanes(&ego_position, 100.0);
//! ```

pub mod geometry;
pub mod lanelet;
pub mod logging;
pub mod map;
pub mod rtree;
pub mod store;

/// Version of the hdmap library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time; the CLI reports
/// the same value.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_store_module_is_accessible() {
        use crate::store::MapStore;

        let store = MapStore::with_default_budget();
        assert_eq!(store.lane_count(), 0);
    }
}
