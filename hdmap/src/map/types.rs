//! Road-network entity definitions

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::geometry::{BoundingBox, Point2d};

/// Functional classification of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    Driving,
    Sidewalk,
    BikeLane,
    Parking,
    Shoulder,
    Restricted,
}

/// Current signal phase of a traffic light.
///
/// `RedYellow` is the combined pre-green phase used in some jurisdictions.
/// `Unknown` covers lights whose phase the map source does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalState {
    Red,
    Yellow,
    Green,
    RedYellow,
    Unknown,
}

/// Regulatory meaning of a traffic sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignKind {
    Stop,
    Yield,
    SpeedLimit,
    NoEntry,
    OneWay,
    Parking,
    PedestrianCrossing,
    SchoolZone,
    Other,
}

/// A single lane of the road network.
///
/// Geometry is carried as ordered polylines in the planar map frame. The
/// topology id lists are weak references into the same map; an id that does
/// not resolve simply means the neighbor was outside the loaded extract.
#[derive(Debug, Clone)]
pub struct Lane {
    /// Identifier, unique among lanes.
    pub id: u64,
    /// Functional classification.
    pub kind: LaneKind,
    /// Ordered driving-direction centerline.
    pub centerline: Vec<Point2d>,
    /// Left boundary polyline; empty when the source map has none.
    pub left_boundary: Vec<Point2d>,
    /// Right boundary polyline; empty when the source map has none.
    pub right_boundary: Vec<Point2d>,
    /// Lanes that feed into this one.
    pub predecessor_ids: Vec<u64>,
    /// Lanes this one feeds into.
    pub successor_ids: Vec<u64>,
    /// Laterally adjacent lanes on the left.
    pub adjacent_left_ids: Vec<u64>,
    /// Laterally adjacent lanes on the right.
    pub adjacent_right_ids: Vec<u64>,
    /// Speed limit in meters per second.
    pub speed_limit: f64,
}

impl Lane {
    /// Creates a lane with the given geometry and no topology links.
    pub fn new(id: u64, kind: LaneKind, centerline: Vec<Point2d>, speed_limit: f64) -> Self {
        Self {
            id,
            kind,
            centerline,
            left_boundary: Vec::new(),
            right_boundary: Vec::new(),
            predecessor_ids: Vec::new(),
            successor_ids: Vec::new(),
            adjacent_left_ids: Vec::new(),
            adjacent_right_ids: Vec::new(),
            speed_limit,
        }
    }

    /// Spatial extent of the lane.
    ///
    /// Covers the centerline and both boundary polylines. A lane with an
    /// empty centerline gets a degenerate box at the origin regardless of
    /// its boundaries; such a lane is effectively invisible to spatial
    /// queries away from the origin.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = match BoundingBox::from_points(self.centerline.iter().copied()) {
            Some(bbox) => bbox,
            None => return BoundingBox::from_point(Point2d::default()),
        };
        for point in self.left_boundary.iter().chain(self.right_boundary.iter()) {
            bbox.expand(*point);
        }
        bbox
    }
}

/// A traffic light and the lanes it controls.
#[derive(Debug, Clone)]
pub struct TrafficLight {
    /// Identifier, unique among traffic lights.
    pub id: u64,
    /// Mount position in the planar map frame.
    pub position: Point2d,
    /// Signal phase as carried by the map source.
    pub state: SignalState,
    /// Ids of the lanes this light controls.
    pub controlled_lane_ids: Vec<u64>,
    /// Mount height in meters.
    pub height: f64,
}

impl TrafficLight {
    /// Creates a traffic light controlling no lanes yet.
    pub fn new(id: u64, position: Point2d, state: SignalState, height: f64) -> Self {
        Self {
            id,
            position,
            state,
            controlled_lane_ids: Vec::new(),
            height,
        }
    }
}

/// A traffic sign and the lanes it affects.
#[derive(Debug, Clone)]
pub struct TrafficSign {
    /// Identifier, unique among traffic signs.
    pub id: u64,
    /// Mount position in the planar map frame.
    pub position: Point2d,
    /// Regulatory meaning.
    pub kind: SignKind,
    /// Free-text payload, e.g. the limit value of a speed-limit sign.
    pub value: String,
    /// Ids of the lanes this sign applies to.
    pub affected_lane_ids: Vec<u64>,
    /// Mount height in meters.
    pub height: f64,
}

impl TrafficSign {
    /// Creates a traffic sign affecting no lanes yet.
    pub fn new(id: u64, position: Point2d, kind: SignKind, height: f64) -> Self {
        Self {
            id,
            position,
            kind,
            value: String::new(),
            affected_lane_ids: Vec::new(),
            height,
        }
    }
}

/// Parsed map content ready to be loaded into a store.
///
/// Each collection is keyed by entity id; inserting under an existing key
/// replaces the earlier record, which is how duplicate ids in a source
/// file resolve to last-one-wins.
#[derive(Debug, Clone, Default)]
pub struct MapRecords {
    pub lanes: BTreeMap<u64, Lane>,
    pub traffic_lights: BTreeMap<u64, TrafficLight>,
    pub traffic_signs: BTreeMap<u64, TrafficSign>,
}

impl MapRecords {
    /// Total number of records across all three kinds.
    pub fn total_count(&self) -> usize {
        self.lanes.len() + self.traffic_lights.len() + self.traffic_signs.len()
    }

    /// Whether no records were parsed.
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

/// Entities matched by a region or radius query.
///
/// Holds shared references to the canonical entities owned by the store, so
/// results stay valid (and cheap to clone) independent of the store's
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub lanes: Vec<Arc<Lane>>,
    pub traffic_lights: Vec<Arc<TrafficLight>>,
    pub traffic_signs: Vec<Arc<TrafficSign>>,
}

impl QueryResult {
    /// Drops all matched entities.
    pub fn clear(&mut self) {
        self.lanes.clear();
        self.traffic_lights.clear();
        self.traffic_signs.clear();
    }

    /// Total number of matched entities across all three kinds.
    pub fn total_count(&self) -> usize {
        self.lanes.len() + self.traffic_lights.len() + self.traffic_signs.len()
    }

    /// Whether the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_lane(id: u64) -> Lane {
        Lane::new(
            id,
            LaneKind::Driving,
            vec![Point2d::new(0.0, 0.0), Point2d::new(100.0, 0.0)],
            13.89,
        )
    }

    // ===== Lane bounding boxes =====

    #[test]
    fn test_lane_bbox_covers_centerline() {
        let lane = straight_lane(1);
        let bbox = lane.bounding_box();
        assert_eq!(bbox.min, Point2d::new(0.0, 0.0));
        assert_eq!(bbox.max, Point2d::new(100.0, 0.0));
    }

    #[test]
    fn test_lane_bbox_includes_boundaries() {
        let mut lane = straight_lane(1);
        lane.left_boundary = vec![Point2d::new(0.0, 2.0), Point2d::new(100.0, 2.0)];
        lane.right_boundary = vec![Point2d::new(0.0, -2.0), Point2d::new(100.0, -2.0)];
        let bbox = lane.bounding_box();
        assert_eq!(bbox.min, Point2d::new(0.0, -2.0));
        assert_eq!(bbox.max, Point2d::new(100.0, 2.0));
    }

    #[test]
    fn test_empty_centerline_gives_degenerate_origin_box() {
        let mut lane = Lane::new(5, LaneKind::Driving, Vec::new(), 13.89);
        lane.left_boundary = vec![Point2d::new(50.0, 50.0)];
        let bbox = lane.bounding_box();
        assert_eq!(bbox.min, Point2d::default());
        assert_eq!(bbox.max, Point2d::default());
        assert_eq!(bbox.area(), 0.0);
    }

    #[test]
    fn test_single_point_centerline_gives_degenerate_box() {
        let lane = Lane::new(6, LaneKind::Sidewalk, vec![Point2d::new(3.0, 4.0)], 1.5);
        let bbox = lane.bounding_box();
        assert_eq!(bbox.min, Point2d::new(3.0, 4.0));
        assert_eq!(bbox.max, Point2d::new(3.0, 4.0));
    }

    // ===== QueryResult =====

    #[test]
    fn test_query_result_total_count() {
        let mut result = QueryResult::default();
        assert!(result.is_empty());

        result.lanes.push(Arc::new(straight_lane(1)));
        result.lanes.push(Arc::new(straight_lane(2)));
        result.traffic_lights.push(Arc::new(TrafficLight::new(
            10,
            Point2d::new(1.0, 1.0),
            SignalState::Red,
            5.0,
        )));
        assert_eq!(result.total_count(), 3);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_query_result_clear() {
        let mut result = QueryResult::default();
        result.traffic_signs.push(Arc::new(TrafficSign::new(
            20,
            Point2d::new(2.0, 2.0),
            SignKind::Stop,
            3.0,
        )));
        result.clear();
        assert_eq!(result.total_count(), 0);
    }
}
