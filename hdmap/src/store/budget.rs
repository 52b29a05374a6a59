//! Memory budget configuration and footprint estimation

use std::collections::BTreeMap;
use std::mem;
use std::sync::Arc;

use crate::geometry::Point2d;
use crate::map::{Lane, TrafficLight, TrafficSign};

/// Default total footprint limit: 64 MiB.
pub const DEFAULT_MAX_TOTAL_BYTES: usize = 64 * 1024 * 1024;

/// Default lane count limit.
pub const DEFAULT_MAX_LANES: usize = 10_000;

/// Default traffic light count limit.
pub const DEFAULT_MAX_TRAFFIC_LIGHTS: usize = 5_000;

/// Default traffic sign count limit.
pub const DEFAULT_MAX_TRAFFIC_SIGNS: usize = 5_000;

/// Estimated spatial-index overhead per stored entity, in bytes.
///
/// Charged from the entity counts rather than the built indices, so the
/// admission check and the post-build figure agree.
pub const INDEX_ENTRY_OVERHEAD_BYTES: usize = 64;

/// Limits a [`MapStore`](crate::store::MapStore) enforces when loading.
///
/// A load fails when an entity count exceeds its limit or when the
/// estimated footprint exceeds `max_total_bytes`; the failed load leaves
/// the store empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBudget {
    /// Upper bound on the estimated total footprint in bytes.
    pub max_total_bytes: usize,
    /// Maximum number of lanes.
    pub max_lanes: usize,
    /// Maximum number of traffic lights.
    pub max_traffic_lights: usize,
    /// Maximum number of traffic signs.
    pub max_traffic_signs: usize,
}

impl MemoryBudget {
    /// Budget profile for the embedded target board: 128 MiB and twice
    /// the default entity limits.
    pub fn embedded_board() -> Self {
        Self {
            max_total_bytes: 128 * 1024 * 1024,
            max_lanes: 20_000,
            max_traffic_lights: 10_000,
            max_traffic_signs: 10_000,
        }
    }
}

impl Default for MemoryBudget {
    /// Conservative profile: 64 MiB, 10k lanes, 5k lights, 5k signs.
    fn default() -> Self {
        Self {
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_lanes: DEFAULT_MAX_LANES,
            max_traffic_lights: DEFAULT_MAX_TRAFFIC_LIGHTS,
            max_traffic_signs: DEFAULT_MAX_TRAFFIC_SIGNS,
        }
    }
}

/// Estimates the resident footprint of a set of map collections.
///
/// This is a deterministic heuristic, not a measurement: fixed per-entity
/// struct sizes plus the variable geometry, id-list, and sign-text
/// payloads, plus [`INDEX_ENTRY_OVERHEAD_BYTES`] per entity for the
/// spatial indices. Adding an entity or a point never lowers the result.
pub fn estimate_memory_usage(
    lanes: &BTreeMap<u64, Arc<Lane>>,
    traffic_lights: &BTreeMap<u64, Arc<TrafficLight>>,
    traffic_signs: &BTreeMap<u64, Arc<TrafficSign>>,
) -> usize {
    let mut total = 0;

    for lane in lanes.values() {
        total += mem::size_of::<Lane>();
        total += lane.centerline.len() * mem::size_of::<Point2d>();
        total += lane.left_boundary.len() * mem::size_of::<Point2d>();
        total += lane.right_boundary.len() * mem::size_of::<Point2d>();
        let id_count = lane.predecessor_ids.len()
            + lane.successor_ids.len()
            + lane.adjacent_left_ids.len()
            + lane.adjacent_right_ids.len();
        total += id_count * mem::size_of::<u64>();
    }

    total += traffic_lights.len() * mem::size_of::<TrafficLight>();
    for light in traffic_lights.values() {
        total += light.controlled_lane_ids.len() * mem::size_of::<u64>();
    }

    total += traffic_signs.len() * mem::size_of::<TrafficSign>();
    for sign in traffic_signs.values() {
        total += sign.value.capacity();
        total += sign.affected_lane_ids.len() * mem::size_of::<u64>();
    }

    let entity_count = lanes.len() + traffic_lights.len() + traffic_signs.len();
    total += entity_count * INDEX_ENTRY_OVERHEAD_BYTES;

    total
}
