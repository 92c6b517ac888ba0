//! The icon record emitted to consumers.
//!
//! Serialized shape is a fixed contract:
//!
//! ```json
//! {
//!   "prefix": "cu",
//!   "iconName": "arrow-up",
//!   "icon": [24, 24, ["up"], "", "M0 0..."]
//! }
//! ```
//!
//! The `icon` tuple holds width, height (numbers or `null`), the alias
//! list, a reserved empty-string slot, and the path data — a bare string
//! when exactly one path survived, otherwise an ordered array.

use serde::Serialize;
use serde::ser::{SerializeSeq, Serializer};

/// Path data with the arity collapse baked in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathData {
    Single(String),
    Multiple(Vec<String>),
}

impl PathData {
    /// Collapse a path list: one path becomes a bare string, more stay an
    /// ordered array. An empty list has no representation.
    pub fn from_paths(mut paths: Vec<String>) -> Option<PathData> {
        match paths.len() {
            0 => None,
            1 => Some(PathData::Single(paths.remove(0))),
            _ => Some(PathData::Multiple(paths)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PathData::Single(_) => 1,
            PathData::Multiple(paths) => paths.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        // A constructed value always holds at least one path.
        false
    }

    /// Iterate the path strings in document order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            PathData::Single(path) => std::slice::from_ref(path),
            PathData::Multiple(paths) => paths,
        };
        slice.iter().map(String::as_str)
    }
}

/// The 5-slot `icon` tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct IconData {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub aliases: Vec<String>,
    pub path_data: PathData,
}

/// Dimension slot: absent is `null`, whole numbers lose the `.0`.
struct Dimension(Option<f64>);

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            None => serializer.serialize_none(),
            Some(value) if value.fract() == 0.0 && value.abs() < 9e15 => {
                serializer.serialize_i64(value as i64)
            }
            Some(value) => serializer.serialize_f64(value),
        }
    }
}

impl Serialize for IconData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(5))?;
        seq.serialize_element(&Dimension(self.width))?;
        seq.serialize_element(&Dimension(self.height))?;
        seq.serialize_element(&self.aliases)?;
        seq.serialize_element("")?;
        seq.serialize_element(&self.path_data)?;
        seq.end()
    }
}

/// The complete record for one compiled icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRecord {
    pub prefix: String,
    pub icon_name: String,
    pub icon: IconData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(width: Option<f64>, paths: Vec<&str>) -> IconRecord {
        IconRecord {
            prefix: "cu".to_string(),
            icon_name: "arrow-up".to_string(),
            icon: IconData {
                width,
                height: width,
                aliases: vec!["up".to_string()],
                path_data: PathData::from_paths(
                    paths.into_iter().map(str::to_string).collect(),
                )
                .unwrap(),
            },
        }
    }

    #[test]
    fn test_arity_collapse() {
        assert_eq!(
            PathData::from_paths(vec!["M0 0".into()]),
            Some(PathData::Single("M0 0".into()))
        );
        assert_eq!(
            PathData::from_paths(vec!["M0 0".into(), "M1 1".into()]),
            Some(PathData::Multiple(vec!["M0 0".into(), "M1 1".into()]))
        );
        assert_eq!(PathData::from_paths(vec![]), None);
    }

    #[test]
    fn test_serialized_shape_single_path() {
        let value = serde_json::to_value(record(Some(24.0), vec!["M0 0"])).unwrap();
        assert_eq!(
            value,
            json!({
                "prefix": "cu",
                "iconName": "arrow-up",
                "icon": [24, 24, ["up"], "", "M0 0"]
            })
        );
    }

    #[test]
    fn test_fractional_dimensions_stay_fractional() {
        let value = serde_json::to_value(record(Some(22.5), vec!["M0 0"])).unwrap();
        assert_eq!(value["icon"][0], json!(22.5));
    }

    #[test]
    fn test_serialized_shape_multiple_paths_and_null_dims() {
        let value = serde_json::to_value(record(None, vec!["M0 0", "M1 1"])).unwrap();
        assert_eq!(
            value,
            json!({
                "prefix": "cu",
                "iconName": "arrow-up",
                "icon": [null, null, ["up"], "", ["M0 0", "M1 1"]]
            })
        );
    }

    #[test]
    fn test_path_data_iter_order() {
        let paths = PathData::from_paths(vec!["a".into(), "b".into()]).unwrap();
        let collected: Vec<_> = paths.iter().collect();
        assert_eq!(collected, vec!["a", "b"]);
        assert_eq!(paths.len(), 2);
    }
}
