use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of a Notion rich-text array. Only the flattened text is used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// Concatenates the plain text of a rich-text array.
pub fn plain_text(parts: &[RichText]) -> String {
    parts.iter().map(|part| part.plain_text.as_str()).collect()
}

/// Typed view of a page property. Kinds the proxy does not consume, and
/// properties whose shape does not parse, collapse into `Other`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Property {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    Files {
        #[serde(default)]
        files: Vec<Value>,
    },
    #[serde(other)]
    Other,
}

impl Property {
    fn parse(value: &Value) -> Self {
        Property::deserialize(value).unwrap_or(Property::Other)
    }
}

/// A page record as returned by a database query.
///
/// The upstream JSON is kept untouched so it can be passed back to the caller
/// verbatim; accessors read it defensively and treat anything missing or
/// oddly shaped as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Value);

impl Item {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn into_raw(self) -> Value {
        self.0
    }

    pub fn id(&self) -> Option<&str> {
        self.0
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn has_cover(&self) -> bool {
        self.0.get("cover").is_some_and(|cover| !cover.is_null())
    }

    /// Parsed properties in upstream map order.
    pub fn properties(&self) -> Vec<(&str, Property)> {
        self.0
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, value)| (name.as_str(), Property::parse(value)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when some `files` property holds at least one file.
    pub fn has_populated_files(&self) -> bool {
        self.properties()
            .iter()
            .any(|(_, prop)| matches!(prop, Property::Files { files } if !files.is_empty()))
    }

    /// Concatenated plain text of the first title-type property, or `""`.
    pub fn title(&self) -> String {
        self.properties()
            .into_iter()
            .find_map(|(_, prop)| match prop {
                Property::Title { title } => Some(plain_text(&title)),
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl From<Value> for Item {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}
