//! Substring-scanning parser for the Lanelet2 OSM subset

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::geometry::Point2d;
use crate::map::{Lane, LaneKind, MapRecords, SignKind, SignalState, TrafficLight, TrafficSign};

/// Speed limit assigned to parsed lanes, in m/s (50 km/h).
const DEFAULT_SPEED_LIMIT_MPS: f64 = 13.89;

/// Mount height assigned to parsed traffic lights, in meters.
const TRAFFIC_LIGHT_HEIGHT_M: f64 = 5.0;

/// Mount height assigned to parsed traffic signs, in meters.
const TRAFFIC_SIGN_HEIGHT_M: f64 = 3.0;

/// Errors that can occur while reading a map file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The file could not be opened or read.
    #[error("Failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    /// The content declares no coordinate nodes, so nothing can resolve.
    #[error("Map content contains no coordinate nodes")]
    NoNodes,
}

/// Parser for the simplified Lanelet2 OSM-XML subset.
///
/// The subset is line-regular enough for plain substring scanning: the
/// parser resolves `<node>` coordinates first, then materializes
/// subtype-tagged `<way>` elements as lanes and `regulatory_element`
/// relations as traffic lights and signs. Individual elements that do
/// not resolve are skipped; only content with no nodes at all fails.
#[derive(Debug, Default)]
pub struct LaneletParser;

impl LaneletParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a map file, decompressing when the path ends in `.gz`.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<MapRecords, ParseError> {
        use flate2::read::GzDecoder;

        let path = path.as_ref();
        let file = File::open(path)?;

        if path.extension().is_some_and(|ext| ext == "gz") {
            tracing::debug!(path = %path.display(), "Loading gzip compressed map");
            self.parse_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            self.parse_reader(BufReader::new(file))
        }
    }

    /// Parses map content from any reader.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<MapRecords, ParseError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.parse_str(&content)
    }

    /// Parses in-memory map content.
    pub fn parse_str(&self, content: &str) -> Result<MapRecords, ParseError> {
        let nodes = self.parse_nodes(content);
        if nodes.is_empty() {
            return Err(ParseError::NoNodes);
        }

        let mut records = MapRecords::default();
        self.parse_lanes(content, &nodes, &mut records);
        self.parse_regulatory_elements(content, &nodes, &mut records);

        tracing::debug!(
            nodes = nodes.len(),
            lanes = records.lanes.len(),
            traffic_lights = records.traffic_lights.len(),
            traffic_signs = records.traffic_signs.len(),
            "Parsed map content"
        );

        Ok(records)
    }

    /// Collects `<node id lat lon/>` elements into planar points.
    ///
    /// The planar frame takes x from `lon` and y from `lat`; ingestion
    /// owns the projection concern, downstream code treats the values as
    /// Euclidean. Elements missing any of the three attributes are
    /// skipped.
    fn parse_nodes(&self, content: &str) -> HashMap<u64, Point2d> {
        let mut nodes = HashMap::new();
        for element in elements(content, "<node ", "/>") {
            if let (Some(id), Some(lat), Some(lon)) = (
                u64_attribute(element, "id"),
                f64_attribute(element, "lat"),
                f64_attribute(element, "lon"),
            ) {
                nodes.insert(id, Point2d::new(lon, lat));
            }
        }
        nodes
    }

    /// Collects subtype-tagged `<way>` elements into lanes.
    ///
    /// The subtype value itself is not interpreted; its presence marks
    /// the way as a lane. Node refs that do not resolve are dropped from
    /// the centerline, and a way with no resolvable points is skipped
    /// entirely.
    fn parse_lanes(
        &self,
        content: &str,
        nodes: &HashMap<u64, Point2d>,
        records: &mut MapRecords,
    ) {
        for element in elements(content, "<way ", "</way>") {
            let way_id = match u64_attribute(element, "id") {
                Some(id) => id,
                None => continue,
            };
            if tag_value(element, "subtype").is_none() {
                continue;
            }

            let centerline: Vec<Point2d> = quoted_values(element, "<nd ref=\"")
                .filter_map(|value| value.parse::<u64>().ok())
                .filter_map(|node_id| nodes.get(&node_id).copied())
                .collect();

            if centerline.is_empty() {
                tracing::warn!(way_id, "Skipping lane with no resolvable centerline");
                continue;
            }

            let lane = Lane::new(way_id, LaneKind::Driving, centerline, DEFAULT_SPEED_LIMIT_MPS);
            records.lanes.insert(lane.id, lane);
        }
    }

    /// Collects `regulatory_element` relations into lights and signs.
    ///
    /// The first node member that resolves supplies the position, the
    /// origin standing in when none does; way members supply the lane
    /// ids the element applies to. Relations with other subtypes are
    /// ignored.
    fn parse_regulatory_elements(
        &self,
        content: &str,
        nodes: &HashMap<u64, Point2d>,
        records: &mut MapRecords,
    ) {
        for element in elements(content, "<relation ", "</relation>") {
            if tag_value(element, "type") != Some("regulatory_element") {
                continue;
            }
            let id = match u64_attribute(element, "id") {
                Some(id) => id,
                None => continue,
            };

            let position = member_position(element, nodes).unwrap_or_default();
            let lane_ids = member_way_ids(element);

            match tag_value(element, "subtype") {
                Some("traffic_light") => {
                    let mut light =
                        TrafficLight::new(id, position, SignalState::Unknown, TRAFFIC_LIGHT_HEIGHT_M);
                    light.controlled_lane_ids = lane_ids;
                    records.traffic_lights.insert(id, light);
                }
                Some("traffic_sign") => {
                    let mut sign =
                        TrafficSign::new(id, position, SignKind::Other, TRAFFIC_SIGN_HEIGHT_M);
                    sign.affected_lane_ids = lane_ids;
                    records.traffic_signs.insert(id, sign);
                }
                _ => {}
            }
        }
    }
}

/// Iterator over raw element slices, from each occurrence of `open` up to
/// the next `close` marker.
struct Elements<'a> {
    content: &'a str,
    open: &'a str,
    close: &'a str,
    pos: usize,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.content[self.pos..].find(self.open)? + self.pos;
        let end = self.content[start..].find(self.close)? + start;
        self.pos = end;
        Some(&self.content[start..end])
    }
}

fn elements<'a>(content: &'a str, open: &'a str, close: &'a str) -> Elements<'a> {
    Elements {
        content,
        open,
        close,
        pos: 0,
    }
}

/// Iterator over the quoted values following each occurrence of `prefix`.
struct QuotedValues<'a> {
    haystack: &'a str,
    prefix: &'a str,
}

impl<'a> Iterator for QuotedValues<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.haystack.find(self.prefix)? + self.prefix.len();
        let rest = &self.haystack[start..];
        let end = rest.find('"')?;
        self.haystack = &rest[end..];
        Some(&rest[..end])
    }
}

fn quoted_values<'a>(haystack: &'a str, prefix: &'a str) -> QuotedValues<'a> {
    QuotedValues { haystack, prefix }
}

/// Value of the first `name="…"` attribute occurrence inside `element`.
fn attribute<'a>(element: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let start = element.find(&needle)? + needle.len();
    let rest = &element[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

fn u64_attribute(element: &str, name: &str) -> Option<u64> {
    attribute(element, name).and_then(|value| value.parse().ok())
}

fn f64_attribute(element: &str, name: &str) -> Option<f64> {
    attribute(element, name).and_then(|value| value.parse().ok())
}

/// Value of the `<tag k="key" v="…"/>` entry inside `element`, if any.
fn tag_value<'a>(element: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("k=\"{key}\" v=\"");
    let start = element.find(&needle)? + needle.len();
    let rest = &element[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Position of the first node member that resolves against `nodes`.
fn member_position(element: &str, nodes: &HashMap<u64, Point2d>) -> Option<Point2d> {
    quoted_values(element, "<member type=\"node\" ref=\"")
        .filter_map(|value| value.parse::<u64>().ok())
        .find_map(|id| nodes.get(&id).copied())
}

/// Way-member ids of `element`, in document order.
fn member_way_ids(element: &str) -> Vec<u64> {
    quoted_values(element, "<member type=\"way\" ref=\"")
        .filter_map(|value| value.parse().ok())
        .collect()
}
