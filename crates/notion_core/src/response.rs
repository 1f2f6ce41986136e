use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::block::{HighlightEntry, ImageRef};
use crate::item::Item;

const IMAGE_BLOCKS_KEY: &str = "_imageBlocks";

/// An upstream item paired with its enrichment result, if enrichment ran for it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedItem {
    pub item: Item,
    pub image_blocks: Option<Vec<ImageRef>>,
}

impl EnrichedItem {
    pub fn plain(item: Item) -> Self {
        Self {
            item,
            image_blocks: None,
        }
    }
}

impl Serialize for EnrichedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (Some(images), Value::Object(fields)) = (&self.image_blocks, self.item.raw()) else {
            return self.item.serialize(serializer);
        };
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in fields.iter().filter(|(key, _)| *key != IMAGE_BLOCKS_KEY) {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(IMAGE_BLOCKS_KEY, images)?;
        map.end()
    }
}

/// Result of the highlights pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HighlightsOutcome {
    /// The caller did not ask for highlights; no key is emitted.
    #[default]
    NotRequested,
    /// No item title matched; emitted as `null`.
    NotFound,
    /// A page matched. Empty when it has no images or its fetch failed.
    Found(Vec<HighlightEntry>),
}

/// Everything returned for one query: `{ results, _highlights? }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageSet {
    pub results: Vec<EnrichedItem>,
    pub highlights: HighlightsOutcome,
}

impl Serialize for PageSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("results", &self.results)?;
        match &self.highlights {
            HighlightsOutcome::NotRequested => {}
            HighlightsOutcome::NotFound => map.serialize_entry("_highlights", &Value::Null)?,
            HighlightsOutcome::Found(entries) => map.serialize_entry("_highlights", entries)?,
        }
        map.end()
    }
}
