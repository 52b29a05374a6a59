//! Map ownership, budget-checked loading, and the query API

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::geometry::{BoundingBox, Point2d};
use crate::lanelet::{LaneletParser, ParseError};
use crate::map::{Lane, MapRecords, QueryResult, TrafficLight, TrafficSign};
use crate::rtree::RTree;

use super::budget::{estimate_memory_usage, MemoryBudget};

/// Initial closest-lane search radius in meters.
const CLOSEST_LANE_SEARCH_RADIUS_M: f64 = 50.0;

/// Widened radius tried when the initial closest-lane search finds nothing.
const CLOSEST_LANE_FALLBACK_RADIUS_M: f64 = 200.0;

/// Errors raised while loading a map into a [`MapStore`].
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The source file could not be read or parsed.
    #[error("Failed to parse map: {0}")]
    Parse(#[from] ParseError),

    /// An entity count exceeds its budget limit.
    #[error("Too many {kind}: map has {count}, budget allows {limit}")]
    TooManyEntities {
        kind: &'static str,
        count: usize,
        limit: usize,
    },

    /// The estimated footprint exceeds the total byte budget.
    #[error("Estimated map footprint of {estimated_bytes} bytes exceeds budget of {limit_bytes} bytes")]
    BudgetExceeded {
        estimated_bytes: usize,
        limit_bytes: usize,
    },
}

/// Owner of the loaded map and its spatial indices.
///
/// The store keeps one canonical, id-ordered collection per entity kind
/// and one spatial index per kind. Entities are shared via [`Arc`], so
/// query results stay valid however long the caller holds them.
///
/// Loading is all-or-nothing: a load clears previous content, admits the
/// new records against the configured [`MemoryBudget`], and only then
/// builds the indices. A rejected load leaves the store exactly as
/// freshly constructed.
///
/// # Thread Safety
///
/// Loading takes `&mut self`, so the borrow checker serializes the build
/// phase against all reads. Every query takes `&self` and touches only
/// immutable state; a built store shared behind an `Arc` serves
/// concurrent readers without locking.
#[derive(Debug, Default)]
pub struct MapStore {
    budget: MemoryBudget,
    lanes: BTreeMap<u64, Arc<Lane>>,
    traffic_lights: BTreeMap<u64, Arc<TrafficLight>>,
    traffic_signs: BTreeMap<u64, Arc<TrafficSign>>,
    lane_index: RTree<Arc<Lane>>,
    traffic_light_index: RTree<Arc<TrafficLight>>,
    traffic_sign_index: RTree<Arc<TrafficSign>>,
}

impl MapStore {
    /// Creates an empty store enforcing `budget`.
    pub fn new(budget: MemoryBudget) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Creates an empty store with the conservative default budget.
    pub fn with_default_budget() -> Self {
        Self::new(MemoryBudget::default())
    }

    /// The budget this store enforces.
    pub fn budget(&self) -> &MemoryBudget {
        &self.budget
    }

    /// Parses a map file and loads it.
    ///
    /// Accepts the Lanelet2 OSM subset, gzip-compressed when the path ends
    /// in `.gz`. Any failure, parse or budget, leaves the store empty.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), MapError> {
        self.clear();
        let records = LaneletParser::new().parse_file(path)?;
        self.load(records)
    }

    /// Replaces the store content with `records`.
    ///
    /// Previous content is dropped first. The records are admitted against
    /// the budget before any index is built; on rejection the store is
    /// left empty and the error describes the violated limit.
    pub fn load(&mut self, records: MapRecords) -> Result<(), MapError> {
        self.clear();

        self.lanes = records
            .lanes
            .into_iter()
            .map(|(id, lane)| (id, Arc::new(lane)))
            .collect();
        self.traffic_lights = records
            .traffic_lights
            .into_iter()
            .map(|(id, light)| (id, Arc::new(light)))
            .collect();
        self.traffic_signs = records
            .traffic_signs
            .into_iter()
            .map(|(id, sign)| (id, Arc::new(sign)))
            .collect();

        if let Err(error) = self.check_budget() {
            tracing::warn!("Rejecting map load: {}", error);
            self.clear();
            return Err(error);
        }

        self.build_indices();

        tracing::info!(
            lanes = self.lanes.len(),
            traffic_lights = self.traffic_lights.len(),
            traffic_signs = self.traffic_signs.len(),
            estimated_bytes = self.estimated_memory_usage(),
            "Loaded map"
        );

        Ok(())
    }

    /// Returns every entity whose bounding box intersects `region`.
    ///
    /// Lane boxes cover the full lane geometry, so a lane can match a
    /// region its centerline never enters.
    pub fn query_region(&self, region: &BoundingBox) -> QueryResult {
        QueryResult {
            lanes: self.lane_index.query(region),
            traffic_lights: self.traffic_light_index.query(region),
            traffic_signs: self.traffic_sign_index.query(region),
        }
    }

    /// Returns every entity within Euclidean `radius` of `center`.
    ///
    /// The indices provide a conservative square-box candidate set; exact
    /// distance filtering happens here. A lane matches when any of its
    /// centerline points lies within `radius` (inclusive); lights and
    /// signs match by their position.
    pub fn query_radius(&self, center: &Point2d, radius: f64) -> QueryResult {
        let mut result = QueryResult::default();

        for lane in self.lane_index.query_radius(center, radius) {
            let within = lane
                .centerline
                .iter()
                .any(|point| center.distance_to(point) <= radius);
            if within {
                result.lanes.push(lane);
            }
        }

        for light in self.traffic_light_index.query_radius(center, radius) {
            if center.distance_to(&light.position) <= radius {
                result.traffic_lights.push(light);
            }
        }

        for sign in self.traffic_sign_index.query_radius(center, radius) {
            if center.distance_to(&sign.position) <= radius {
                result.traffic_signs.push(sign);
            }
        }

        result
    }

    /// Looks up a lane by id.
    pub fn lane_by_id(&self, id: u64) -> Option<Arc<Lane>> {
        self.lanes.get(&id).cloned()
    }

    /// Looks up a traffic light by id.
    pub fn traffic_light_by_id(&self, id: u64) -> Option<Arc<TrafficLight>> {
        self.traffic_lights.get(&id).cloned()
    }

    /// Looks up a traffic sign by id.
    pub fn traffic_sign_by_id(&self, id: u64) -> Option<Arc<TrafficSign>> {
        self.traffic_signs.get(&id).cloned()
    }

    /// Lanes with a centerline point within `max_distance` of `position`.
    pub fn nearby_lanes(&self, position: &Point2d, max_distance: f64) -> Vec<Arc<Lane>> {
        self.query_radius(position, max_distance).lanes
    }

    /// The lane whose centerline comes closest to `position`.
    ///
    /// Searches within 50 m first and widens once to 200 m; positions with
    /// no lane inside the fallback radius get `None`. Distance is measured
    /// to centerline points, and equal distances resolve to the lower lane
    /// id, so the answer is deterministic.
    pub fn closest_lane(&self, position: &Point2d) -> Option<Arc<Lane>> {
        let mut candidates = self.nearby_lanes(position, CLOSEST_LANE_SEARCH_RADIUS_M);
        if candidates.is_empty() {
            candidates = self.nearby_lanes(position, CLOSEST_LANE_FALLBACK_RADIUS_M);
        }

        let mut min_distance = f64::MAX;
        let mut closest: Option<Arc<Lane>> = None;
        for lane in candidates {
            for point in &lane.centerline {
                let distance = position.distance_to(point);
                let better = match &closest {
                    None => true,
                    Some(current) => {
                        distance < min_distance
                            || (distance == min_distance && lane.id < current.id)
                    }
                };
                if better {
                    min_distance = distance;
                    closest = Some(Arc::clone(&lane));
                }
            }
        }
        closest
    }

    /// All traffic lights whose controlled-lane list names `lane_id`,
    /// in ascending light-id order.
    pub fn traffic_lights_for_lane(&self, lane_id: u64) -> Vec<Arc<TrafficLight>> {
        self.traffic_lights
            .values()
            .filter(|light| light.controlled_lane_ids.contains(&lane_id))
            .cloned()
            .collect()
    }

    /// All traffic signs whose affected-lane list names `lane_id`,
    /// in ascending sign-id order.
    pub fn traffic_signs_for_lane(&self, lane_id: u64) -> Vec<Arc<TrafficSign>> {
        self.traffic_signs
            .values()
            .filter(|sign| sign.affected_lane_ids.contains(&lane_id))
            .cloned()
            .collect()
    }

    /// Number of loaded lanes.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of loaded traffic lights.
    pub fn traffic_light_count(&self) -> usize {
        self.traffic_lights.len()
    }

    /// Number of loaded traffic signs.
    pub fn traffic_sign_count(&self) -> usize {
        self.traffic_signs.len()
    }

    /// Estimated footprint of the loaded map in bytes.
    ///
    /// Same heuristic the load-time budget check uses, so this always
    /// matches the figure the map was admitted under.
    pub fn estimated_memory_usage(&self) -> usize {
        estimate_memory_usage(&self.lanes, &self.traffic_lights, &self.traffic_signs)
    }

    /// Drops all entities and resets the spatial indices.
    pub fn clear(&mut self) {
        self.lanes.clear();
        self.traffic_lights.clear();
        self.traffic_signs.clear();
        self.lane_index.clear();
        self.traffic_light_index.clear();
        self.traffic_sign_index.clear();
    }

    fn check_budget(&self) -> Result<(), MapError> {
        if self.lanes.len() > self.budget.max_lanes {
            return Err(MapError::TooManyEntities {
                kind: "lanes",
                count: self.lanes.len(),
                limit: self.budget.max_lanes,
            });
        }
        if self.traffic_lights.len() > self.budget.max_traffic_lights {
            return Err(MapError::TooManyEntities {
                kind: "traffic lights",
                count: self.traffic_lights.len(),
                limit: self.budget.max_traffic_lights,
            });
        }
        if self.traffic_signs.len() > self.budget.max_traffic_signs {
            return Err(MapError::TooManyEntities {
                kind: "traffic signs",
                count: self.traffic_signs.len(),
                limit: self.budget.max_traffic_signs,
            });
        }

        let estimated_bytes = self.estimated_memory_usage();
        if estimated_bytes > self.budget.max_total_bytes {
            return Err(MapError::BudgetExceeded {
                estimated_bytes,
                limit_bytes: self.budget.max_total_bytes,
            });
        }

        Ok(())
    }

    /// Rebuilds the three spatial indices from the canonical collections.
    ///
    /// Iteration is in ascending id order, so index structure is
    /// reproducible for identical input.
    fn build_indices(&mut self) {
        self.lane_index.clear();
        for lane in self.lanes.values() {
            self.lane_index.insert(lane.bounding_box(), Arc::clone(lane));
        }

        self.traffic_light_index.clear();
        for light in self.traffic_lights.values() {
            let bbox = BoundingBox::from_point(light.position);
            self.traffic_light_index.insert(bbox, Arc::clone(light));
        }

        self.traffic_sign_index.clear();
        for sign in self.traffic_signs.values() {
            let bbox = BoundingBox::from_point(sign.position);
            self.traffic_sign_index.insert(bbox, Arc::clone(sign));
        }

        tracing::debug!(
            lane_index_height = self.lane_index.height(),
            light_index_height = self.traffic_light_index.height(),
            sign_index_height = self.traffic_sign_index.height(),
            "Built spatial indices"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{LaneKind, SignKind, SignalState};

    // ===== Test Helpers =====

    fn driving_lane(id: u64, points: &[(f64, f64)]) -> Lane {
        let centerline = points.iter().map(|&(x, y)| Point2d::new(x, y)).collect();
        Lane::new(id, LaneKind::Driving, centerline, 13.89)
    }

    fn light_for(id: u64, x: f64, y: f64, lanes: &[u64]) -> TrafficLight {
        let mut light = TrafficLight::new(id, Point2d::new(x, y), SignalState::Red, 5.0);
        light.controlled_lane_ids = lanes.to_vec();
        light
    }

    fn sign_for(id: u64, x: f64, y: f64, lanes: &[u64]) -> TrafficSign {
        let mut sign = TrafficSign::new(id, Point2d::new(x, y), SignKind::Stop, 3.0);
        sign.affected_lane_ids = lanes.to_vec();
        sign
    }

    fn records_of(
        lanes: Vec<Lane>,
        lights: Vec<TrafficLight>,
        signs: Vec<TrafficSign>,
    ) -> MapRecords {
        let mut records = MapRecords::default();
        for lane in lanes {
            records.lanes.insert(lane.id, lane);
        }
        for light in lights {
            records.traffic_lights.insert(light.id, light);
        }
        for sign in signs {
            records.traffic_signs.insert(sign.id, sign);
        }
        records
    }

    /// Two lanes near the origin, one far away, plus one light and one
    /// sign at the first intersection.
    fn loaded_store() -> MapStore {
        let mut store = MapStore::with_default_budget();
        store
            .load(records_of(
                vec![
                    driving_lane(1, &[(0.0, 0.0), (50.0, 0.0)]),
                    driving_lane(2, &[(0.0, 10.0), (50.0, 10.0)]),
                    driving_lane(3, &[(1000.0, 1000.0), (1010.0, 1010.0)]),
                ],
                vec![light_for(10, 25.0, 5.0, &[1, 2])],
                vec![sign_for(20, 40.0, 0.0, &[1])],
            ))
            .unwrap();
        store
    }

    fn lane_ids(result: &QueryResult) -> Vec<u64> {
        let mut ids: Vec<u64> = result.lanes.iter().map(|lane| lane.id).collect();
        ids.sort_unstable();
        ids
    }

    // ===== Loading =====

    #[test]
    fn test_load_populates_counts() {
        let store = loaded_store();
        assert_eq!(store.lane_count(), 3);
        assert_eq!(store.traffic_light_count(), 1);
        assert_eq!(store.traffic_sign_count(), 1);
    }

    #[test]
    fn test_load_replaces_previous_content() {
        let mut store = loaded_store();
        store
            .load(records_of(
                vec![driving_lane(99, &[(5.0, 5.0), (6.0, 6.0)])],
                Vec::new(),
                Vec::new(),
            ))
            .unwrap();
        assert_eq!(store.lane_count(), 1);
        assert_eq!(store.traffic_light_count(), 0);
        assert!(store.lane_by_id(1).is_none());
        assert!(store.lane_by_id(99).is_some());
    }

    #[test]
    fn test_lane_limit_rejects_load() {
        let budget = MemoryBudget {
            max_lanes: 1,
            ..MemoryBudget::default()
        };
        let mut store = MapStore::new(budget);
        let result = store.load(records_of(
            vec![
                driving_lane(1, &[(0.0, 0.0)]),
                driving_lane(2, &[(10.0, 0.0)]),
            ],
            Vec::new(),
            Vec::new(),
        ));
        assert!(matches!(
            result,
            Err(MapError::TooManyEntities { kind: "lanes", count: 2, limit: 1 })
        ));
        assert_eq!(store.lane_count(), 0, "rejected load must leave the store empty");
    }

    #[test]
    fn test_byte_budget_rejects_load() {
        let budget = MemoryBudget {
            max_total_bytes: 16,
            ..MemoryBudget::default()
        };
        let mut store = MapStore::new(budget);
        let result = store.load(records_of(
            vec![driving_lane(1, &[(0.0, 0.0), (50.0, 0.0)])],
            Vec::new(),
            Vec::new(),
        ));
        assert!(matches!(result, Err(MapError::BudgetExceeded { .. })));
        assert_eq!(store.lane_count(), 0);
        assert!(store
            .query_region(&BoundingBox::new(
                Point2d::new(-100.0, -100.0),
                Point2d::new(100.0, 100.0)
            ))
            .is_empty());
    }

    // ===== Region queries =====

    #[test]
    fn test_query_region_returns_entities_inside() {
        let store = loaded_store();
        let region = BoundingBox::new(Point2d::new(-1.0, -1.0), Point2d::new(60.0, 20.0));
        let result = store.query_region(&region);
        assert_eq!(lane_ids(&result), vec![1, 2]);
        assert_eq!(result.traffic_lights.len(), 1);
        assert_eq!(result.traffic_signs.len(), 1);
        assert_eq!(result.total_count(), 4);
    }

    #[test]
    fn test_query_region_excludes_far_entities() {
        let store = loaded_store();
        let region = BoundingBox::new(Point2d::new(0.0, 0.0), Point2d::new(100.0, 100.0));
        let result = store.query_region(&region);
        assert_eq!(lane_ids(&result), vec![1, 2], "lane 3 lies outside the region");
    }

    #[test]
    fn test_query_region_on_empty_store() {
        let store = MapStore::with_default_budget();
        let region = BoundingBox::new(Point2d::new(0.0, 0.0), Point2d::new(100.0, 100.0));
        assert!(store.query_region(&region).is_empty());
    }

    // ===== Radius queries =====

    #[test]
    fn test_query_radius_applies_exact_distance_filter() {
        let mut store = MapStore::with_default_budget();
        // Centerline point at (9, 9): inside the broad-phase square for
        // radius 10 around the origin, but 12.7 away in true distance.
        store
            .load(records_of(
                vec![
                    driving_lane(1, &[(9.0, 9.0)]),
                    driving_lane(2, &[(5.0, 0.0)]),
                ],
                Vec::new(),
                Vec::new(),
            ))
            .unwrap();
        let result = store.query_radius(&Point2d::new(0.0, 0.0), 10.0);
        assert_eq!(lane_ids(&result), vec![2]);
    }

    #[test]
    fn test_query_radius_includes_exact_boundary_distance() {
        let mut store = MapStore::with_default_budget();
        store
            .load(records_of(
                vec![driving_lane(1, &[(10.0, 0.0)])],
                Vec::new(),
                Vec::new(),
            ))
            .unwrap();
        let result = store.query_radius(&Point2d::new(0.0, 0.0), 10.0);
        assert_eq!(lane_ids(&result), vec![1], "distance equal to radius matches");
    }

    #[test]
    fn test_query_radius_filters_lights_and_signs() {
        let mut store = MapStore::with_default_budget();
        store
            .load(records_of(
                Vec::new(),
                vec![
                    light_for(1, 5.0, 0.0, &[]),
                    light_for(2, 9.0, 9.0, &[]),
                ],
                vec![
                    sign_for(3, 0.0, 5.0, &[]),
                    sign_for(4, -9.0, 9.0, &[]),
                ],
            ))
            .unwrap();
        let result = store.query_radius(&Point2d::new(0.0, 0.0), 10.0);
        let light_ids: Vec<u64> = result.traffic_lights.iter().map(|l| l.id).collect();
        let sign_ids: Vec<u64> = result.traffic_signs.iter().map(|s| s.id).collect();
        assert_eq!(light_ids, vec![1]);
        assert_eq!(sign_ids, vec![3]);
    }

    #[test]
    fn test_nearby_lanes_returns_lanes_only() {
        let store = loaded_store();
        let lanes = store.nearby_lanes(&Point2d::new(0.0, 0.0), 15.0);
        let mut ids: Vec<u64> = lanes.iter().map(|lane| lane.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    // ===== Id lookups =====

    #[test]
    fn test_lane_by_id_hit_and_miss() {
        let store = loaded_store();
        assert_eq!(store.lane_by_id(1).map(|lane| lane.id), Some(1));
        assert!(store.lane_by_id(424242).is_none());
    }

    #[test]
    fn test_light_and_sign_by_id() {
        let store = loaded_store();
        assert_eq!(store.traffic_light_by_id(10).map(|l| l.id), Some(10));
        assert_eq!(store.traffic_sign_by_id(20).map(|s| s.id), Some(20));
        assert!(store.traffic_light_by_id(20).is_none(), "id namespaces are per kind");
    }

    // ===== Closest lane =====

    #[test]
    fn test_closest_lane_picks_nearest_centerline() {
        let mut store = MapStore::with_default_budget();
        store
            .load(records_of(
                vec![
                    driving_lane(100, &[(0.0, 0.0), (100.0, 0.0)]),
                    driving_lane(101, &[(0.0, 100.0), (100.0, 100.0)]),
                ],
                Vec::new(),
                Vec::new(),
            ))
            .unwrap();
        let closest = store.closest_lane(&Point2d::new(10.0, 5.0)).unwrap();
        assert_eq!(closest.id, 100);
    }

    #[test]
    fn test_closest_lane_uses_fallback_radius() {
        let mut store = MapStore::with_default_budget();
        // 100 m away: outside the 50 m search, inside the 200 m fallback.
        store
            .load(records_of(
                vec![driving_lane(1, &[(100.0, 0.0), (120.0, 0.0)])],
                Vec::new(),
                Vec::new(),
            ))
            .unwrap();
        let closest = store.closest_lane(&Point2d::new(0.0, 0.0)).unwrap();
        assert_eq!(closest.id, 1);
    }

    #[test]
    fn test_closest_lane_none_beyond_fallback() {
        let mut store = MapStore::with_default_budget();
        store
            .load(records_of(
                vec![driving_lane(1, &[(300.0, 0.0), (320.0, 0.0)])],
                Vec::new(),
                Vec::new(),
            ))
            .unwrap();
        assert!(store.closest_lane(&Point2d::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_closest_lane_tie_resolves_to_lower_id() {
        let mut store = MapStore::with_default_budget();
        // Both centerlines are exactly 10 m from the probe.
        store
            .load(records_of(
                vec![
                    driving_lane(9, &[(0.0, 10.0), (20.0, 10.0)]),
                    driving_lane(4, &[(0.0, -10.0), (20.0, -10.0)]),
                ],
                Vec::new(),
                Vec::new(),
            ))
            .unwrap();
        let closest = store.closest_lane(&Point2d::new(0.0, 0.0)).unwrap();
        assert_eq!(closest.id, 4);
    }

    #[test]
    fn test_closest_lane_on_empty_store() {
        let store = MapStore::with_default_budget();
        assert!(store.closest_lane(&Point2d::new(0.0, 0.0)).is_none());
    }

    // ===== Relation queries =====

    #[test]
    fn test_traffic_lights_for_lane_membership() {
        let store = loaded_store();
        let lights = store.traffic_lights_for_lane(1);
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].id, 10);
        assert!(store.traffic_lights_for_lane(3).is_empty());
    }

    #[test]
    fn test_traffic_signs_for_lane_membership() {
        let store = loaded_store();
        assert_eq!(store.traffic_signs_for_lane(1).len(), 1);
        assert!(store.traffic_signs_for_lane(2).is_empty());
    }

    #[test]
    fn test_relations_return_ascending_ids() {
        let mut store = MapStore::with_default_budget();
        store
            .load(records_of(
                vec![driving_lane(1, &[(0.0, 0.0)])],
                vec![
                    light_for(30, 0.0, 0.0, &[1]),
                    light_for(10, 1.0, 0.0, &[1]),
                    light_for(20, 2.0, 0.0, &[1]),
                ],
                Vec::new(),
            ))
            .unwrap();
        let ids: Vec<u64> = store
            .traffic_lights_for_lane(1)
            .iter()
            .map(|light| light.id)
            .collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    // ===== Statistics and lifecycle =====

    #[test]
    fn test_memory_usage_matches_admission_estimate() {
        let store = loaded_store();
        let recomputed = estimate_memory_usage(
            &store.lanes,
            &store.traffic_lights,
            &store.traffic_signs,
        );
        assert_eq!(store.estimated_memory_usage(), recomputed);
        assert!(store.estimated_memory_usage() > 0);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = loaded_store();
        store.clear();
        assert_eq!(store.lane_count(), 0);
        assert_eq!(store.traffic_light_count(), 0);
        assert_eq!(store.traffic_sign_count(), 0);
        assert_eq!(store.estimated_memory_usage(), 0);
        let region = BoundingBox::new(Point2d::new(-10.0, -10.0), Point2d::new(60.0, 20.0));
        assert!(store.query_region(&region).is_empty());
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MapStore>();
    }

    #[test]
    fn test_concurrent_reads_from_shared_store() {
        let store = loaded_store();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let region = BoundingBox::new(
                            Point2d::new(-1.0, -1.0),
                            Point2d::new(60.0, 20.0),
                        );
                        assert_eq!(store.query_region(&region).total_count(), 4);
                        assert_eq!(
                            store.closest_lane(&Point2d::new(10.0, 2.0)).map(|l| l.id),
                            Some(1)
                        );
                    }
                });
            }
        });
    }
}
