//! Bundle model and pricing rules.

use crate::catalog::{Catalog, Category};
use crate::suggest::{self, Suggestion};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Discount ceiling, in percent.
pub const MAX_DISCOUNT_PCT: u8 = 30;
/// Assumed shopper budget used by the best-value suggestion.
pub const BUNDLE_BUDGET: i64 = 10_000;

const PAIR_BONUS: u8 = 5;
const TRIO_BONUS: u8 = 5;
const FIVE_BONUS: u8 = 10;
const CROSS_CATEGORY_BONUS: u8 = 5;
const THEME_BONUS: u8 = 3;
const OCCASION_BONUS: u8 = 3;

/// The fixed themes the suggestion engine scores against. Selecting one on
/// the bundle also earns a discount bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Traditional,
    Modern,
    Festive,
    Minimalist,
}

impl Theme {
    pub const ALL: [Theme; 4] = [
        Theme::Traditional,
        Theme::Modern,
        Theme::Festive,
        Theme::Minimalist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Traditional => "traditional",
            Theme::Modern => "modern",
            Theme::Festive => "festive",
            Theme::Minimalist => "minimalist",
        }
    }

    /// Capitalized form for suggestion titles.
    pub fn title(&self) -> &'static str {
        match self {
            Theme::Traditional => "Traditional",
            Theme::Modern => "Modern",
            Theme::Festive => "Festive",
            Theme::Minimalist => "Minimalist",
        }
    }

    /// Tag keywords that count toward theme affinity.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Theme::Traditional => &["traditional", "heritage", "classic", "ethnic"],
            Theme::Modern => &["modern", "contemporary", "sleek", "minimalist"],
            Theme::Festive => &["festive", "celebration", "decorative", "ornate"],
            Theme::Minimalist => &["simple", "clean", "minimal", "elegant"],
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        Theme::ALL.iter().copied().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-curated, priced collection of catalog items.
///
/// The price fields are derived: only `recalculate` writes them.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub id: Option<u64>,
    pub name: String,
    items: Vec<u32>,
    total_price: i64,
    discount_percentage: u8,
    final_price: i64,
    pub theme: Option<Theme>,
    pub occasion: Option<String>,
}

impl Bundle {
    fn empty() -> Self {
        Self {
            id: None,
            name: String::new(),
            items: Vec::new(),
            total_price: 0,
            discount_percentage: 0,
            final_price: 0,
            theme: None,
            occasion: None,
        }
    }

    pub fn items(&self) -> &[u32] {
        &self.items
    }

    pub fn contains(&self, id: u32) -> bool {
        self.items.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_price(&self) -> i64 {
        self.total_price
    }

    pub fn discount_percentage(&self) -> u8 {
        self.discount_percentage
    }

    pub fn final_price(&self) -> i64 {
        self.final_price
    }

    pub fn savings(&self) -> i64 {
        self.total_price - self.final_price
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AddItemError {
    UnknownItem(u32),
    AlreadyInBundle,
}

impl fmt::Display for AddItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddItemError::UnknownItem(id) => write!(f, "unknown item {}", id),
            AddItemError::AlreadyInBundle => write!(f, "Product already in bundle"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SaveError {
    EmptyBundle,
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::EmptyBundle => f.write_str("Please add products to your bundle first"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SuggestionIndexError(pub usize);

impl fmt::Display for SuggestionIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no suggestion at index {}", self.0)
    }
}

/// Result of applying a suggestion.
#[derive(Debug)]
pub struct AppliedSuggestion {
    pub title: String,
    pub added: usize,
}

/// Serialized snapshot posted to `POST /api/bundle/save`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SaveBundleRequest {
    pub name: String,
    pub products: Vec<u32>,
    /// Empty string when no theme is set.
    pub theme: String,
    /// Empty string when no occasion is set.
    pub occasion: String,
    pub total_price: i64,
    pub discount_percentage: u8,
    pub final_price: i64,
}

/// The bundle-builder widget: catalog + current bundle + live suggestions.
pub struct BundleBuilder {
    catalog: Catalog,
    bundle: Bundle,
    suggestions: Vec<Suggestion>,
}

impl BundleBuilder {
    pub fn new(catalog: Catalog) -> Self {
        let mut builder = Self {
            catalog,
            bundle: Bundle::empty(),
            suggestions: Vec::new(),
        };
        builder.refresh_suggestions();
        builder
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Add an item by id. Returns the item name for caller feedback.
    pub fn add_item(&mut self, id: u32) -> Result<String, AddItemError> {
        let item = self
            .catalog
            .get(id)
            .ok_or(AddItemError::UnknownItem(id))?;
        if self.bundle.contains(id) {
            return Err(AddItemError::AlreadyInBundle);
        }
        let name = item.name.clone();
        self.bundle.items.push(id);
        self.recalculate();
        self.refresh_suggestions();
        Ok(name)
    }

    /// Remove an item by id. Returns the item name, or None if absent.
    pub fn remove_item(&mut self, id: u32) -> Option<String> {
        if !self.bundle.contains(id) {
            return None;
        }
        self.bundle.items.retain(|i| *i != id);
        self.recalculate();
        self.refresh_suggestions();
        self.catalog.get(id).map(|p| p.name.clone())
    }

    /// Add every not-yet-present item referenced by the suggestion, through
    /// the normal add path (so pricing and suggestions refresh per item).
    pub fn apply_suggestion(
        &mut self,
        index: usize,
    ) -> Result<AppliedSuggestion, SuggestionIndexError> {
        let suggestion = self
            .suggestions
            .get(index)
            .ok_or(SuggestionIndexError(index))?;
        let title = suggestion.title.clone();
        let products = suggestion.products.clone();

        let mut added = 0;
        for id in products {
            if self.add_item(id).is_ok() {
                added += 1;
            }
        }
        Ok(AppliedSuggestion { title, added })
    }

    pub fn set_name(&mut self, name: String) {
        self.bundle.name = name;
    }

    pub fn set_theme(&mut self, theme: Option<Theme>) {
        self.bundle.theme = theme;
        self.recalculate();
        self.refresh_suggestions();
    }

    pub fn set_occasion(&mut self, occasion: Option<String>) {
        self.bundle.occasion = occasion.filter(|o| !o.trim().is_empty());
        self.recalculate();
        self.refresh_suggestions();
    }

    /// Reset to the empty/default bundle.
    pub fn clear(&mut self) {
        self.bundle = Bundle::empty();
        self.refresh_suggestions();
    }

    /// Build the save payload. Rejects an empty bundle before any network
    /// activity; a blank name is defaulted from the supplied timestamp.
    pub fn save_request(&mut self, fallback_stamp: u64) -> Result<SaveBundleRequest, SaveError> {
        if self.bundle.is_empty() {
            return Err(SaveError::EmptyBundle);
        }
        if self.bundle.name.trim().is_empty() {
            self.bundle.name = format!("Bundle {}", fallback_stamp);
        }
        Ok(SaveBundleRequest {
            name: self.bundle.name.clone(),
            products: self.bundle.items.clone(),
            theme: self
                .bundle
                .theme
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            occasion: self.bundle.occasion.clone().unwrap_or_default(),
            total_price: self.bundle.total_price,
            discount_percentage: self.bundle.discount_percentage,
            final_price: self.bundle.final_price,
        })
    }

    /// Record the identifier returned by a successful save.
    pub fn confirm_saved(&mut self, bundle_id: u64) {
        self.bundle.id = Some(bundle_id);
    }

    /// Recompute the derived price fields from the current items.
    fn recalculate(&mut self) {
        let total: i64 = self
            .bundle
            .items
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .map(|p| p.price)
            .sum();

        let mut discount = 0u8;
        let count = self.bundle.items.len();
        if count >= 2 {
            discount += PAIR_BONUS;
        }
        if count >= 3 {
            discount += TRIO_BONUS;
        }
        if count >= 5 {
            discount += FIVE_BONUS;
        }

        let categories: HashSet<Category> = self
            .bundle
            .items
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .map(|p| p.category)
            .collect();
        if categories.len() >= 2 {
            discount += CROSS_CATEGORY_BONUS;
        }

        if self.bundle.theme.is_some() {
            discount += THEME_BONUS;
        }
        if self.bundle.occasion.is_some() {
            discount += OCCASION_BONUS;
        }

        let discount = discount.min(MAX_DISCOUNT_PCT);
        self.bundle.total_price = total;
        self.bundle.discount_percentage = discount;
        // Half-up integer rounding of total × (1 − d/100)
        self.bundle.final_price = (total * i64::from(100 - discount) + 50) / 100;
    }

    /// Regenerate suggestions from the current bundle. Runs automatically
    /// after every mutation; also exposed for the widget's manual refresh.
    pub fn refresh_suggestions(&mut self) {
        self.suggestions = suggest::generate(&self.catalog, &self.bundle);
    }
}
