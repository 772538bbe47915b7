//! Lenient deserializers for OSM tag values.
//!
//! Tag values are free text in OSM, but JSON artifacts written by other tools
//! sometimes store them as numbers (`"admin_level": 4`, `"lanes": 2`).

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum TagValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<TagValue> for String {
    fn from(value: TagValue) -> Self {
        match value {
            TagValue::Text(s) => s,
            TagValue::Integer(n) => n.to_string(),
            TagValue::Float(f) => f.to_string(),
            TagValue::Flag(b) => String::from(if b { "yes" } else { "no" }),
        }
    }
}

/// Text, number or null; null and absent become the empty string.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<TagValue>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

/// Text, number or null; null and absent become `None`.
pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<TagValue>::deserialize(deserializer)?.map(String::from))
}
