//! Overpass JSON response shapes.

use hashbrown::HashMap;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::models::{Coordinates, OsmType, RelationMember};

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node(Node),
    Way(Way),
    Relation(Relation),
    /// `area`, `count` and other derived elements
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Way {
    pub id: i64,
    #[serde(default)]
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relation {
    pub id: i64,
    #[serde(default)]
    pub members: Vec<RelationMember>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Node {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// A tagged element matched by a query, in response order
#[derive(Debug, Clone, Copy)]
pub enum Tagged<'a> {
    Node(&'a Node),
    Way(&'a Way),
    Relation(&'a Relation),
}

impl<'a> Tagged<'a> {
    pub fn id(&self) -> i64 {
        match self {
            Tagged::Node(n) => n.id,
            Tagged::Way(w) => w.id,
            Tagged::Relation(r) => r.id,
        }
    }

    pub fn osm_type(&self) -> OsmType {
        match self {
            Tagged::Node(_) => OsmType::Node,
            Tagged::Way(_) => OsmType::Way,
            Tagged::Relation(_) => OsmType::Relation,
        }
    }

    pub fn tags(&self) -> &'a BTreeMap<String, String> {
        match self {
            Tagged::Node(n) => &n.tags,
            Tagged::Way(w) => &w.tags,
            Tagged::Relation(r) => &r.tags,
        }
    }
}

/// Indexed query result.
///
/// `out body; >; out skel qt;` returns the matched elements followed by
/// the untagged nodes they reference; both end up in the node index.
#[derive(Debug, Default)]
pub struct OverpassResult {
    nodes: Vec<Node>,
    ways: Vec<Way>,
    relations: Vec<Relation>,
    node_coords: HashMap<i64, Coordinates>,
}

impl OverpassResult {
    pub fn from_response(response: OverpassResponse) -> Self {
        let mut result = Self::default();
        for element in response.elements {
            match element {
                Element::Node(node) => {
                    result.node_coords.insert(node.id, node.coordinates());
                    result.nodes.push(node);
                }
                Element::Way(way) => result.ways.push(way),
                Element::Relation(relation) => result.relations.push(relation),
                Element::Other => {}
            }
        }
        result
    }

    /// All nodes, tagged or not
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn node(&self, id: i64) -> Option<Coordinates> {
        self.node_coords.get(&id).copied()
    }

    /// Coordinates of a way's nodes that are present in the result, in way order
    pub fn way_geometry(&self, way: &Way) -> Vec<Coordinates> {
        way.nodes.iter().filter_map(|id| self.node(*id)).collect()
    }

    /// Node position, or the mean of a way's resolved nodes
    pub fn element_center(&self, element: Tagged<'_>) -> Option<Coordinates> {
        match element {
            Tagged::Node(node) => Some(node.coordinates()),
            Tagged::Way(way) => Coordinates::mean(&self.way_geometry(way)),
            Tagged::Relation(_) => None,
        }
    }

    /// Elements carrying tags: nodes, then ways, then relations
    pub fn tagged(&self) -> impl Iterator<Item = Tagged<'_>> {
        self.nodes
            .iter()
            .filter(|n| !n.tags.is_empty())
            .map(Tagged::Node)
            .chain(self.ways.iter().map(Tagged::Way))
            .chain(self.relations.iter().map(Tagged::Relation))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "way", "id": 10, "nodes": [1, 2, 3], "tags": {"highway": "residential", "name": "Atatürk Caddesi"}},
            {"type": "node", "id": 5, "lat": 39.0, "lon": 32.0, "tags": {"amenity": "pharmacy"}},
            {"type": "relation", "id": 20, "members": [{"type": "way", "ref": 10, "role": "outer"}], "tags": {"admin_level": "4", "name": "Ankara"}},
            {"type": "node", "id": 1, "lat": 39.90, "lon": 32.80},
            {"type": "node", "id": 2, "lat": 39.92, "lon": 32.84},
            {"type": "area", "id": 3600000001}
        ]
    }"#;

    fn sample() -> OverpassResult {
        OverpassResult::from_response(serde_json::from_str(SAMPLE).unwrap())
    }

    #[test]
    fn test_elements_are_indexed() {
        let result = sample();
        assert_eq!(result.nodes().len(), 3);
        assert_eq!(result.ways().len(), 1);
        assert_eq!(result.relations().len(), 1);
        assert_eq!(result.relations()[0].members[0].member_ref, 10);
    }

    #[test]
    fn test_way_geometry_skips_missing_nodes() {
        let result = sample();
        let way = &result.ways()[0];
        let geometry = result.way_geometry(way);
        assert_eq!(geometry.len(), 2);

        let center = result.element_center(Tagged::Way(way)).unwrap();
        assert!((center.lat - 39.91).abs() < 1e-9);
        assert!((center.lon - 32.82).abs() < 1e-9);
    }

    #[test]
    fn test_tagged_order_skips_bare_nodes() {
        let result = sample();
        let ids: Vec<(OsmType, i64)> = result.tagged().map(|t| (t.osm_type(), t.id())).collect();
        assert_eq!(
            ids,
            vec![
                (OsmType::Node, 5),
                (OsmType::Way, 10),
                (OsmType::Relation, 20)
            ]
        );
        assert!(result
            .element_center(Tagged::Relation(&result.relations()[0]))
            .is_none());
    }

    #[test]
    fn test_empty_response() {
        let result = OverpassResult::from_response(serde_json::from_str("{}").unwrap());
        assert!(result.is_empty());
        assert!(result.node(1).is_none());
    }
}
