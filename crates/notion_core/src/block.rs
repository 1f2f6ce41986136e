use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::item::{plain_text, RichText};
use crate::label::derive_label;

/// A file location, either hosted by Notion or external.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HostedFile {
    #[serde(default)]
    pub url: Option<String>,
}

/// Payload of an `image` block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ImageBlock {
    /// `"external"` or `"file"`; selects which of the two locations is live.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub external: Option<HostedFile>,
    #[serde(default)]
    pub file: Option<HostedFile>,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

impl ImageBlock {
    /// Resolves the image location. Unknown or missing kinds fall back to
    /// whichever location is present.
    pub fn url(&self) -> Option<&str> {
        let external = self.external.as_ref().and_then(|f| f.url.as_deref());
        let file = self.file.as_ref().and_then(|f| f.url.as_deref());
        let url = match self.kind.as_deref() {
            Some("external") => external,
            Some("file") => file,
            _ => external.or(file),
        };
        url.filter(|url| !url.trim().is_empty())
    }

    pub fn caption_text(&self) -> String {
        plain_text(&self.caption)
    }
}

/// Typed view of a child block. Only images are consumed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Image {
        #[serde(default)]
        image: ImageBlock,
    },
    #[serde(other)]
    Other,
}

/// Parses the `results` of a block-children listing. Entries that do not
/// parse become [`Block::Other`]; a missing `results` array yields nothing.
pub fn parse_blocks(listing: &Value) -> Vec<Block> {
    listing
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .map(|raw| Block::deserialize(raw).unwrap_or(Block::Other))
                .collect()
        })
        .unwrap_or_default()
}

/// An image attached to an item by enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub url: String,
    pub name: String,
}

/// A labeled image from the highlights page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightEntry {
    pub url: String,
    pub label: String,
}

fn images(blocks: &[Block]) -> impl Iterator<Item = (&str, &ImageBlock)> {
    blocks.iter().filter_map(|block| match block {
        Block::Image { image } => image.url().map(|url| (url, image)),
        Block::Other => None,
    })
}

/// Image references in block order; images without a url are dropped.
pub fn image_refs(blocks: &[Block]) -> Vec<ImageRef> {
    images(blocks)
        .map(|(url, image)| ImageRef {
            url: url.to_string(),
            name: image.caption_text(),
        })
        .collect()
}

/// Labeled highlight entries in block order.
pub fn highlight_entries(blocks: &[Block]) -> Vec<HighlightEntry> {
    images(blocks)
        .map(|(url, image)| HighlightEntry {
            url: url.to_string(),
            label: derive_label(&image.caption_text(), url),
        })
        .collect()
}
