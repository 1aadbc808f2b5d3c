//! persona-bundle — bundle pricing & suggestion engine
//!
//! Owns the curated-bundle model: a catalog of artisan items, the current
//! bundle with derived pricing (additive discount rules, 30% ceiling), and
//! the heuristic suggestions regenerated on every mutation. The widget is
//! pure state; the host maps outcomes to toasts and drives the remote save.

mod bundle;
mod catalog;
pub mod dom;
mod suggest;

pub use bundle::{
    AddItemError, AppliedSuggestion, Bundle, BundleBuilder, SaveBundleRequest, SaveError,
    SuggestionIndexError, Theme, BUNDLE_BUDGET, MAX_DISCOUNT_PCT,
};
pub use catalog::{Catalog, CatalogItem, Category};
pub use suggest::Suggestion;

use serde::Deserialize;

/// Wire actions accepted by the bundle widget.
///
/// Input format: `{"action":"add_item","id":101}`
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BundleAction {
    AddItem { id: u32 },
    RemoveItem { id: u32 },
    ApplySuggestion { index: usize },
    /// Empty string clears the theme.
    SetTheme { theme: String },
    /// Empty string clears the occasion.
    SetOccasion { occasion: String },
    SetName { name: String },
    RefreshSuggestions,
    SaveBundle,
    ClearBundle,
}
