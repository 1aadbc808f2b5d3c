//! Heuristic bundle suggestions.
//!
//! Regenerated whenever the bundle changes; never persisted. Confidence is
//! a display-ranking hint only — output order is insertion order.

use crate::bundle::{Bundle, Theme, BUNDLE_BUDGET};
use crate::catalog::{Catalog, CatalogItem};

/// Minimum keyword-overlap ratio for an item to count toward a theme.
const THEME_AFFINITY_THRESHOLD: f32 = 0.7;
/// Max items referenced per theme or best-value suggestion.
const PICKS_PER_SUGGESTION: usize = 2;

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub products: Vec<u32>,
    pub reason: String,
    /// In [0, 1]; display ranking only.
    pub confidence: f32,
}

pub(crate) fn generate(catalog: &Catalog, bundle: &Bundle) -> Vec<Suggestion> {
    if bundle.is_empty() {
        return starter_bundles();
    }

    let bundled: Vec<&CatalogItem> = bundle
        .items()
        .iter()
        .filter_map(|id| catalog.get(*id))
        .collect();
    let remaining: Vec<&CatalogItem> = catalog
        .items()
        .iter()
        .filter(|p| !bundle.contains(p.id))
        .collect();
    let compatible: Vec<&CatalogItem> = remaining
        .iter()
        .filter(|p| bundled.iter().any(|b| b.compatible_with(p)))
        .copied()
        .collect();

    let mut suggestions = Vec::new();

    for theme in Theme::ALL {
        let picks: Vec<&CatalogItem> = compatible
            .iter()
            .filter(|p| p.has_tag(theme.as_str()) || theme_affinity(p, theme) >= THEME_AFFINITY_THRESHOLD)
            .take(PICKS_PER_SUGGESTION)
            .copied()
            .collect();
        if picks.is_empty() {
            continue;
        }
        suggestions.push(Suggestion {
            title: format!("{} Enhancement", theme.title()),
            description: format!("Add {} elements to your bundle", theme),
            products: picks.iter().map(|p| p.id).collect(),
            reason: format!(
                "These items enhance the {} aesthetic of your current selection",
                theme
            ),
            confidence: 0.75 + 0.1 * picks.len() as f32,
        });
    }

    let remaining_budget = BUNDLE_BUDGET - bundle.total_price();
    if remaining_budget > 0 {
        let mut affordable: Vec<&CatalogItem> = remaining
            .iter()
            .filter(|p| p.price <= remaining_budget)
            .copied()
            .collect();
        if !affordable.is_empty() {
            // Priciest first — preserved as observed ("best value" naming
            // notwithstanding, see DESIGN.md).
            affordable.sort_by(|a, b| b.price.cmp(&a.price));
            suggestions.push(Suggestion {
                title: "Best Value Addition".to_string(),
                description: "Maximize your bundle value within budget".to_string(),
                products: affordable
                    .iter()
                    .take(PICKS_PER_SUGGESTION)
                    .map(|p| p.id)
                    .collect(),
                reason: "These items offer the best value for your remaining budget".to_string(),
                confidence: 0.80,
            });
        }
    }

    suggestions
}

/// Share of the theme's keywords present in the item's tags.
fn theme_affinity(item: &CatalogItem, theme: Theme) -> f32 {
    let keywords = theme.keywords();
    let matches = item
        .tags
        .iter()
        .filter(|tag| keywords.contains(&tag.as_str()))
        .count();
    matches as f32 / keywords.len() as f32
}

/// Fixed starter bundles shown while the bundle is empty.
fn starter_bundles() -> Vec<Suggestion> {
    vec![
        Suggestion {
            title: "Traditional Home Decor".to_string(),
            description: "Perfect for decorating your living space with authentic crafts"
                .to_string(),
            products: vec![101, 102, 501],
            reason: "These items complement each other beautifully and create a cohesive \
                     traditional aesthetic"
                .to_string(),
            confidence: 0.92,
        },
        Suggestion {
            title: "Wedding Gift Collection".to_string(),
            description: "Thoughtful gifts for newlyweds".to_string(),
            products: vec![201, 301, 401],
            reason: "Traditional wedding essentials that represent good fortune and prosperity"
                .to_string(),
            confidence: 0.88,
        },
        Suggestion {
            title: "Artisan Sampler".to_string(),
            description: "Experience crafts from different regions".to_string(),
            products: vec![101, 201, 301],
            reason: "Diverse collection showcasing various traditional Indian crafts".to_string(),
            confidence: 0.85,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleBuilder;

    #[test]
    fn test_empty_bundle_gets_starters() {
        let b = BundleBuilder::new(Catalog::builtin());
        let s = b.suggestions();
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].title, "Traditional Home Decor");
        assert!(s.iter().all(|s| (0.0..=1.0).contains(&s.confidence)));
    }

    #[test]
    fn test_theme_suggestions_only_reference_compatible_items() {
        let mut b = BundleBuilder::new(Catalog::builtin());
        b.add_item(101).unwrap(); // pottery: compatible with pottery/textiles/woodwork (+metalwork via lamp)

        for s in b.suggestions() {
            for id in &s.products {
                assert!(!b.bundle().contains(*id), "suggested an item already bundled");
                let item = b.catalog().get(*id).unwrap();
                let pot = b.catalog().get(101).unwrap();
                if s.title.ends_with("Enhancement") {
                    assert!(item.compatible_with(pot));
                }
            }
        }
    }

    #[test]
    fn test_traditional_enhancement_confidence() {
        let mut b = BundleBuilder::new(Catalog::builtin());
        b.add_item(102).unwrap(); // vase set, pottery

        let traditional = b
            .suggestions()
            .iter()
            .find(|s| s.title == "Traditional Enhancement")
            .expect("traditional suggestion");
        // "traditional"-tagged compatible items: water pot, bangles? bangles are
        // jewelry (not compatible with pottery); lamp is. Two picks max.
        assert!(!traditional.products.is_empty());
        assert!(traditional.products.len() <= 2);
        let expected = 0.75 + 0.1 * traditional.products.len() as f32;
        assert!((traditional.confidence - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_best_value_descending_and_affordable() {
        let mut b = BundleBuilder::new(Catalog::builtin());
        b.add_item(401).unwrap(); // 4200, leaves 5800 of budget

        let best = b
            .suggestions()
            .iter()
            .find(|s| s.title == "Best Value Addition")
            .expect("best value suggestion");
        let prices: Vec<i64> = best
            .products
            .iter()
            .map(|id| b.catalog().get(*id).unwrap().price)
            .collect();
        assert!(prices.len() <= 2);
        assert!(prices.iter().all(|p| *p <= 5800));
        assert!(prices.windows(2).all(|w| w[0] >= w[1]), "expected priciest first");
    }

    #[test]
    fn test_no_best_value_when_over_budget() {
        let mut b = BundleBuilder::new(Catalog::builtin());
        for id in [101, 102, 201, 301, 401] {
            b.add_item(id).unwrap(); // total 13 200 > 10 000
        }
        assert!(b
            .suggestions()
            .iter()
            .all(|s| s.title != "Best Value Addition"));
    }

    #[test]
    fn test_theme_affinity_ratio() {
        let catalog = Catalog::builtin();
        let pot = catalog.get(101).unwrap(); // tags: traditional, functional, ceramic
        assert!((theme_affinity(pot, Theme::Traditional) - 0.25).abs() < f32::EPSILON);
        assert_eq!(theme_affinity(pot, Theme::Minimalist), 0.0);
    }
}
