//! Client-side filtering of an already fetched inventory list.

use crate::model::InventoryItem;

/// Category value that matches every item.
pub const ALL_CATEGORIES: &str = "all";

/// Items whose name contains `search_term` (case-insensitive) and whose category equals
/// `category`, unless `category` is [`ALL_CATEGORIES`].
///
/// Always a full pass over `items`; input order is kept.
pub fn filter(items: &[InventoryItem], search_term: &str, category: &str) -> Vec<InventoryItem> {
    let needle = search_term.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .filter(|item| category == ALL_CATEGORIES || item.category == category)
        .cloned()
        .collect()
}

/// Choices for the category selector: [`ALL_CATEGORIES`] then each distinct category in
/// first-seen order.
pub fn categories(items: &[InventoryItem]) -> Vec<String> {
    let mut choices = vec![ALL_CATEGORIES.to_string()];
    for item in items {
        if !choices.contains(&item.category) {
            choices.push(item.category.clone());
        }
    }
    choices
}
