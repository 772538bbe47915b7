//! Turning raw PBF objects into extraction records.

use osmpbfreader::{Node, Relation, Tags, Way};

use crate::config::AmenityCategoryConfig;
use crate::models::{AdminLevel, BoundaryEntry, Coordinates, OsmType, PoiRecord, StreetRecord};

pub const UNKNOWN_CITY: &str = "Unknown";

fn value<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key).map(|v| v.as_str()).filter(|v| !v.is_empty())
}

fn owned(tags: &Tags, key: &str) -> Option<String> {
    value(tags, key).map(str::to_string)
}

/// `addr:city`, else `addr:province`, else "Unknown"
pub fn city_key(tags: &Tags) -> &str {
    value(tags, "addr:city")
        .or_else(|| value(tags, "addr:province"))
        .unwrap_or(UNKNOWN_CITY)
}

/// Category whose amenity list contains `amenity`, first match wins
pub fn category_for<'a>(categories: &'a [AmenityCategoryConfig], amenity: &str) -> Option<&'a str> {
    categories
        .iter()
        .find(|c| c.amenities.iter().any(|a| a == amenity))
        .map(|c| c.name.as_str())
}

/// A node whose amenity belongs to a configured category
pub fn poi_from_node(node: &Node, categories: &[AmenityCategoryConfig]) -> Option<PoiRecord> {
    let amenity = value(&node.tags, "amenity")?;
    let category = category_for(categories, amenity)?;

    let mut poi = PoiRecord::new(OsmType::Node, node.id.0, category);
    poi.apply_tags(|key| value(&node.tags, key));
    poi.amenity = Some(amenity.to_string());
    poi.city = Some(city_key(&node.tags).to_string());
    poi.coordinates = Some(Coordinates::new(node.lat(), node.lon()));
    Some(poi)
}

/// A named highway; the center is filled in once node positions are known
pub fn street_from_way(way: &Way) -> Option<StreetRecord> {
    let highway = value(&way.tags, "highway")?;
    let name = value(&way.tags, "name")?;

    Some(StreetRecord {
        id: way.id.0,
        name: name.to_string(),
        highway_type: highway.to_string(),
        city: Some(city_key(&way.tags).to_string()),
        surface: owned(&way.tags, "surface"),
        lanes: owned(&way.tags, "lanes"),
        maxspeed: owned(&way.tags, "maxspeed"),
        oneway: owned(&way.tags, "oneway"),
        lit: owned(&way.tags, "lit"),
        bridge: owned(&way.tags, "bridge"),
        tunnel: owned(&way.tags, "tunnel"),
        nodes_count: Some(way.nodes.len()),
        ..Default::default()
    })
}

/// Administrative relation at one of the four hierarchy levels
pub fn boundary_from_relation(relation: &Relation) -> Option<BoundaryEntry> {
    if value(&relation.tags, "boundary") != Some("administrative") {
        return None;
    }
    let admin_level = value(&relation.tags, "admin_level")?;
    AdminLevel::from_osm_level(admin_level)?;

    Some(BoundaryEntry {
        id: Some(relation.id.0),
        name: owned(&relation.tags, "name").unwrap_or_default(),
        admin_level: admin_level.to_string(),
        relation_type: owned(&relation.tags, "type"),
        population: owned(&relation.tags, "population"),
        postal_code: owned(&relation.tags, "postal_code"),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PbfConfig;
    use osmpbfreader::{NodeId, RelationId, WayId};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        let mut tags = Tags::new();
        for (k, v) in pairs {
            tags.insert((*k).into(), (*v).into());
        }
        tags
    }

    fn node(id: i64, pairs: &[(&str, &str)]) -> Node {
        Node {
            id: NodeId(id),
            tags: tags(pairs),
            decimicro_lat: 399_200_000,
            decimicro_lon: 328_500_000,
        }
    }

    #[test]
    fn test_city_key_fallbacks() {
        assert_eq!(city_key(&tags(&[("addr:city", "Ankara")])), "Ankara");
        assert_eq!(city_key(&tags(&[("addr:province", "Konya")])), "Konya");
        assert_eq!(
            city_key(&tags(&[("addr:city", ""), ("addr:province", "Konya")])),
            "Konya"
        );
        assert_eq!(city_key(&tags(&[])), UNKNOWN_CITY);
    }

    #[test]
    fn test_poi_from_node() {
        let categories = PbfConfig::default().poi_categories;
        let poi = poi_from_node(
            &node(
                10,
                &[
                    ("amenity", "pharmacy"),
                    ("name", "Merkez Eczanesi"),
                    ("addr:city", "Ankara"),
                    ("addr:postcode", "06420"),
                ],
            ),
            &categories,
        )
        .unwrap();
        assert_eq!(poi.category, "healthcare");
        assert_eq!(poi.amenity.as_deref(), Some("pharmacy"));
        assert_eq!(poi.city.as_deref(), Some("Ankara"));
        assert_eq!(poi.postcode.as_deref(), Some("06420"));
        let coords = poi.coordinates.unwrap();
        assert!((coords.lat - 39.92).abs() < 1e-9);
        assert!((coords.lon - 32.85).abs() < 1e-9);

        assert!(poi_from_node(&node(11, &[("amenity", "bench")]), &categories).is_none());
        assert!(poi_from_node(&node(12, &[("shop", "bakery")]), &categories).is_none());
    }

    #[test]
    fn test_street_from_way() {
        let way = Way {
            id: WayId(5),
            tags: tags(&[
                ("highway", "residential"),
                ("name", "Gazi Mustafa Kemal Bulvarı"),
                ("maxspeed", "50"),
            ]),
            nodes: vec![NodeId(1), NodeId(2)],
        };
        let street = street_from_way(&way).unwrap();
        assert_eq!(street.highway_type, "residential");
        assert_eq!(street.city.as_deref(), Some(UNKNOWN_CITY));
        assert_eq!(street.maxspeed.as_deref(), Some("50"));
        assert_eq!(street.nodes_count, Some(2));
        assert!(street.center().is_none());

        let unnamed = Way {
            id: WayId(6),
            tags: tags(&[("highway", "service")]),
            nodes: vec![],
        };
        assert!(street_from_way(&unnamed).is_none());
    }

    #[test]
    fn test_boundary_from_relation() {
        let relation = |pairs: &[(&str, &str)]| Relation {
            id: RelationId(223474),
            tags: tags(pairs),
            refs: vec![],
        };

        let entry = boundary_from_relation(&relation(&[
            ("boundary", "administrative"),
            ("admin_level", "6"),
            ("name", "Çankaya"),
            ("type", "boundary"),
        ]))
        .unwrap();
        assert_eq!(entry.id, Some(223474));
        assert_eq!(entry.admin_level, "6");
        assert_eq!(entry.relation_type.as_deref(), Some("boundary"));

        assert!(boundary_from_relation(&relation(&[
            ("boundary", "administrative"),
            ("admin_level", "10"),
        ]))
        .is_none());
        assert!(boundary_from_relation(&relation(&[
            ("boundary", "postal_code"),
            ("admin_level", "4"),
        ]))
        .is_none());
    }
}
