use crate::item::Item;

/// An item is worth a block lookup only if it exposes no image already.
pub fn needs_enrichment(item: &Item) -> bool {
    !item.has_cover() && !item.has_populated_files()
}

/// Positions of the first `limit` items that need enrichment, in order.
pub fn select_for_enrichment(items: &[Item], limit: usize) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| needs_enrichment(item))
        .map(|(idx, _)| idx)
        .take(limit)
        .collect()
}
