use crate::item::Item;

pub const DEFAULT_HIGHLIGHTS_PAGE_NAME: &str = "highlights";

/// Normalized title fragment used to locate the highlights page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFragment(String);

impl TitleFragment {
    /// Trims and lower-cases `raw`; a blank fragment becomes the default name.
    pub fn new(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            Self(DEFAULT_HIGHLIGHTS_PAGE_NAME.to_string())
        } else {
            Self(normalized)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symmetric, case-insensitive substring match. Blank titles never match.
    pub fn matches(&self, title: &str) -> bool {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return false;
        }
        title.contains(self.0.as_str()) || self.0.contains(title.as_str())
    }
}

impl Default for TitleFragment {
    fn default() -> Self {
        Self(DEFAULT_HIGHLIGHTS_PAGE_NAME.to_string())
    }
}

/// First item, in sequence order, whose title matches `fragment`.
pub fn find_by_title<'a>(items: &'a [Item], fragment: &TitleFragment) -> Option<&'a Item> {
    items.iter().find(|item| fragment.matches(&item.title()))
}
