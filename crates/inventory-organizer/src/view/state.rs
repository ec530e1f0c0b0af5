use crate::inventory::{categories, filter, ALL_CATEGORIES};
use crate::model::{InventoryItem, Session};

/// Everything the inventory screen renders from.
///
/// Plain data; [`InventoryView`](super::InventoryView) is the only writer in the app, but
/// tests can build and inspect it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// `true` until the first session notification arrives.
    pub is_loading: bool,
    /// Last fetched list, in store order.
    pub inventory: Vec<InventoryItem>,
    pub session: Option<Session>,
    /// User-facing message from the last failed sign-in or unauthorized mutation.
    pub auth_error: Option<String>,
    pub search_term: String,
    pub filter_category: String,
    /// Item shown in the details panel. In edit mode this is the working copy.
    pub selected_item: Option<InventoryItem>,
    pub edit_mode: bool,
    pub add_dialog_open: bool,
    /// Name typed into the add dialog.
    pub draft_name: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            is_loading: true,
            inventory: Vec::new(),
            session: None,
            auth_error: None,
            search_term: String::new(),
            filter_category: ALL_CATEGORIES.to_string(),
            selected_item: None,
            edit_mode: false,
            add_dialog_open: false,
            draft_name: String::new(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached inventory narrowed by the current search term and category.
    pub fn visible_items(&self) -> Vec<InventoryItem> {
        filter(&self.inventory, &self.search_term, &self.filter_category)
    }

    /// Choices for the category selector.
    pub fn categories(&self) -> Vec<String> {
        categories(&self.inventory)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
