//! Road-network entity model
//!
//! Defines the three entity kinds the map serves ([`Lane`],
//! [`TrafficLight`], [`TrafficSign`]), their classification enums, and the
//! [`QueryResult`] aggregate spatial queries return.
//!
//! Ids are 64-bit and unique within a kind; the three kinds use independent
//! id namespaces, so a lane and a traffic light may share a numeric id.

mod types;

pub use types::{
    Lane, LaneKind, MapRecords, QueryResult, SignKind, SignalState, TrafficLight, TrafficSign,
};
