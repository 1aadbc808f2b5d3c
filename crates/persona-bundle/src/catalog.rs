//! Catalog of artisan items. Immutable after load.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of craft categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pottery,
    Woodwork,
    Textiles,
    Jewelry,
    Metalwork,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pottery => "pottery",
            Category::Woodwork => "woodwork",
            Category::Textiles => "textiles",
            Category::Jewelry => "jewelry",
            Category::Metalwork => "metalwork",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sellable item. Prices are in the smallest currency unit.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub id: u32,
    pub name: String,
    pub price: i64,
    pub category: Category,
    pub artisan: String,
    pub image: String,
    pub tags: Vec<String>,
    /// Categories this item pairs well with.
    pub compatibility: Vec<Category>,
}

impl CatalogItem {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Bidirectional compatibility: either item lists the other's category.
    pub fn compatible_with(&self, other: &CatalogItem) -> bool {
        self.compatibility.contains(&other.category)
            || other.compatibility.contains(&self.category)
    }
}

/// Lookup table over catalog items.
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn get(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// The six canonical marketplace items.
    pub fn builtin() -> Self {
        use Category::*;
        Self::new(vec![
            item(
                101,
                "Handcrafted Water Pot",
                1200,
                Pottery,
                "Priya Sharma",
                "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=300&h=300&fit=crop",
                &["traditional", "functional", "ceramic"],
                &[Pottery, Textiles, Woodwork],
            ),
            item(
                102,
                "Decorative Vase Set",
                2500,
                Pottery,
                "Priya Sharma",
                "https://images.unsplash.com/photo-1610701596007-11502861dcfa?w=300&h=300&fit=crop",
                &["decorative", "ceramic", "set"],
                &[Pottery, Textiles],
            ),
            item(
                201,
                "Carved Wooden Box",
                3500,
                Woodwork,
                "Ravi Kumar",
                "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=300&h=300&fit=crop",
                &["storage", "carved", "teak"],
                &[Woodwork, Textiles, Jewelry],
            ),
            item(
                301,
                "Embroidered Dupatta",
                1800,
                Textiles,
                "Meera Devi",
                "https://images.unsplash.com/photo-1610030469983-98e550d6193c?w=300&h=300&fit=crop",
                &["clothing", "embroidered", "silk"],
                &[Textiles, Jewelry],
            ),
            item(
                401,
                "Silver Bangles Set",
                4200,
                Jewelry,
                "Lakshmi Bai",
                "https://images.unsplash.com/photo-1515562141207-7a88fb7ce338?w=300&h=300&fit=crop",
                &["silver", "traditional", "set"],
                &[Jewelry, Textiles],
            ),
            item(
                501,
                "Brass Lamp",
                2800,
                Metalwork,
                "Suresh Patel",
                "https://images.unsplash.com/photo-1513475382585-d06e58bcb0e0?w=300&h=300&fit=crop",
                &["brass", "lighting", "traditional"],
                &[Metalwork, Pottery, Woodwork],
            ),
        ])
    }
}

fn item(
    id: u32,
    name: &str,
    price: i64,
    category: Category,
    artisan: &str,
    image: &str,
    tags: &[&str],
    compatibility: &[Category],
) -> CatalogItem {
    CatalogItem {
        id,
        name: name.to_string(),
        price,
        category,
        artisan: artisan.to_string(),
        image: image.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        compatibility: compatibility.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.items().len(), 6);
        let pot = catalog.get(101).unwrap();
        assert_eq!(pot.price, 1200);
        assert_eq!(pot.category, Category::Pottery);
        assert!(catalog.get(999).is_none());
    }

    #[test]
    fn test_compatibility_is_bidirectional() {
        let catalog = Catalog::builtin();
        let lamp = catalog.get(501).unwrap(); // metalwork, lists pottery
        let pot = catalog.get(101).unwrap(); // pottery, does not list metalwork
        assert!(pot.compatible_with(lamp));
        assert!(lamp.compatible_with(pot));

        let bangles = catalog.get(401).unwrap(); // jewelry ↔ textiles only
        assert!(!bangles.compatible_with(lamp));
    }
}
