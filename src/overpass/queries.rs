//! Fixed Overpass QL templates.
//!
//! Every query returns the matched elements with tags, then recurses down
//! to the referenced nodes so ways can be given coordinates.

/// Server-side timeouts, seconds
const COUNTRY_TIMEOUT: u64 = 600;
const REGION_TIMEOUT: u64 = 300;
const POI_TIMEOUT: u64 = 200;

/// Escape a value for use inside a double-quoted QL string
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// All administrative relations inside the country's admin_level=2 area
pub fn country_admin(country: &str) -> String {
    format!(
        r#"[out:json][timeout:{timeout}];
area["name:en"="{country}"]["admin_level"="2"]->.country;
(
  relation["boundary"="administrative"](area.country);
);
out body;
>;
out skel qt;"#,
        timeout = COUNTRY_TIMEOUT,
        country = quote(country)
    )
}

fn region_area(region: &str) -> String {
    format!(
        r#"area["name"="{}"]["admin_level"="4"]->.searchArea;"#,
        quote(region)
    )
}

/// Administrative relations inside one region
pub fn region_admin(region: &str) -> String {
    format!(
        r#"[out:json][timeout:{timeout}];
{area}
(
  relation["boundary"="administrative"](area.searchArea);
);
out body;
>;
out skel qt;"#,
        timeout = REGION_TIMEOUT,
        area = region_area(region)
    )
}

/// Named highways inside one region
pub fn region_streets(region: &str) -> String {
    format!(
        r#"[out:json][timeout:{timeout}];
{area}
(
  way["highway"]["name"](area.searchArea);
);
out body;
>;
out skel qt;"#,
        timeout = REGION_TIMEOUT,
        area = region_area(region)
    )
}

/// Nodes, ways and relations matching a `key=value` (or bare `key`) filter
pub fn region_poi(region: &str, filter: &str) -> String {
    let selector = tag_selector(filter);
    format!(
        r#"[out:json][timeout:{timeout}];
{area}
(
  node{selector}(area.searchArea);
  way{selector}(area.searchArea);
  relation{selector}(area.searchArea);
);
out body;
>;
out skel qt;"#,
        timeout = POI_TIMEOUT,
        area = region_area(region),
        selector = selector
    )
}

/// `amenity=hospital` -> `["amenity"="hospital"]`, `shop` -> `["shop"]`
pub fn tag_selector(filter: &str) -> String {
    match filter.split_once('=') {
        Some((key, value)) => format!(r#"["{}"="{}"]"#, quote(key.trim()), quote(value.trim())),
        None => format!(r#"["{}"]"#, quote(filter.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_selector() {
        assert_eq!(tag_selector("amenity=hospital"), r#"["amenity"="hospital"]"#);
        assert_eq!(tag_selector("shop"), r#"["shop"]"#);
    }

    #[test]
    fn test_region_queries() {
        let query = region_streets("İstanbul");
        assert!(query.starts_with("[out:json][timeout:300];"));
        assert!(query.contains(r#"area["name"="İstanbul"]["admin_level"="4"]->.searchArea;"#));
        assert!(query.contains(r#"way["highway"]["name"](area.searchArea);"#));
        assert!(query.ends_with("out skel qt;"));

        let query = region_poi("Ankara", "building=mosque");
        assert!(query.contains("[timeout:200]"));
        assert!(query.contains(r#"relation["building"="mosque"](area.searchArea);"#));
    }

    #[test]
    fn test_country_query_escapes_quotes() {
        let query = country_admin(r#"Bad"Name"#);
        assert!(query.contains(r#"["name:en"="Bad\"Name"]"#));
        assert!(query.contains("[timeout:600]"));
    }
}
