//! Lanelet2 map ingestion
//!
//! Parses the simplified Lanelet2 OSM-XML subset into
//! [`MapRecords`](crate::map::MapRecords) ready for
//! [`MapStore::load`](crate::store::MapStore::load).
//!
//! # Data Format
//!
//! The subset keeps the three OSM primitives Lanelet2 builds on:
//!
//! - `<node id lat lon/>` coordinate points; `lon` becomes planar x and
//!   `lat` planar y.
//! - `<way id>` elements carrying a `subtype` tag are lanes; the
//!   `<nd ref/>` list is the centerline in document order.
//! - `<relation id>` elements tagged `type="regulatory_element"` are
//!   traffic lights or signs depending on their `subtype` tag; node
//!   members place them and way members name the lanes they apply to.
//!
//! Files ending in `.gz` are decompressed transparently.
//!
//! # Example
//!
//! ```ignore
//! use hdmap::lanelet::LaneletParser;
//!
//! let records = LaneletParser::new().parse_file("map.osm")?;
//! println!("parsed {} lanes", records.lanes.len());
//! ```

mod parser;

pub use parser::{LaneletParser, ParseError};
