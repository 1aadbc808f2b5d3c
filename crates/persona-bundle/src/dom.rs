//! Bundle-builder widget rendering. Pure projection of the model.

use crate::bundle::{BundleBuilder, Theme};
use crate::catalog::CatalogItem;
use crate::suggest::Suggestion;
use persona_dom::DomNode;

/// Occasion choices offered by the widget.
pub const OCCASIONS: [&str; 4] = ["wedding", "festival", "housewarming", "birthday"];

/// Format a price in rupees with thousands separators, e.g. `₹12,500`.
pub fn format_price(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// Render the whole widget: product grid, bundle canvas, pricing summary,
/// theme/occasion pickers, and suggestions.
pub fn render(builder: &BundleBuilder) -> DomNode {
    DomNode::elem("div")
        .key("bundle-builder")
        .class("bundle-builder-container")
        .child(render_grid(builder))
        .child(render_canvas(builder))
        .child(render_pickers(builder))
        .child(render_suggestions(builder))
}

fn render_grid(builder: &BundleBuilder) -> DomNode {
    let cards = builder
        .catalog()
        .items()
        .iter()
        .map(|item| product_card(item, builder.bundle().contains(item.id)));
    DomNode::elem("div")
        .key("products-grid")
        .class("products-grid")
        .children(cards)
}

fn product_card(item: &CatalogItem, selected: bool) -> DomNode {
    let class = if selected {
        "product-card selected"
    } else {
        "product-card"
    };
    DomNode::elem("div")
        .key(format!("product-{}", item.id))
        .class(class)
        .attr("data-product-id", item.id.to_string())
        .child(
            DomNode::elem("img")
                .class("product-image")
                .attr("src", &item.image)
                .attr("alt", &item.name),
        )
        .child(
            DomNode::elem("div")
                .class("product-info")
                .child(DomNode::text("h6", &item.name).class("product-name"))
                .child(
                    DomNode::text("p", format!("by {}", item.artisan)).class("product-artisan"),
                )
                .child(DomNode::text("p", format_price(item.price)).class("product-price"))
                .children(
                    item.tags
                        .iter()
                        .take(2)
                        .map(|t| DomNode::text("span", t).class("tag")),
                ),
        )
        .child(
            DomNode::text("button", "+")
                .class("add-to-bundle-btn")
                .attr("data-product-id", item.id.to_string())
                .on("click", "add_item"),
        )
}

fn render_canvas(builder: &BundleBuilder) -> DomNode {
    let bundle = builder.bundle();

    let products = bundle.items().iter().filter_map(|id| {
        let item = builder.catalog().get(*id)?;
        Some(
            DomNode::elem("div")
                .key(format!("bundled-{}", item.id))
                .class("bundle-product")
                .attr("data-product-id", item.id.to_string())
                .child(DomNode::text("h6", &item.name).class("bundle-product-name"))
                .child(DomNode::text("p", format_price(item.price)).class("bundle-product-price"))
                .child(
                    DomNode::text("button", "×")
                        .class("remove-from-bundle-btn")
                        .attr("data-product-id", item.id.to_string())
                        .on("click", "remove_item"),
                ),
        )
    });

    let mut save_btn = DomNode::text("button", "Save Bundle")
        .key("save-bundle")
        .class("save-bundle-btn")
        .on("click", "save_bundle");
    if bundle.is_empty() {
        save_btn = save_btn.attr("disabled", "disabled");
    }

    DomNode::elem("div")
        .key("bundle-canvas")
        .class("bundle-canvas")
        .child(
            DomNode::elem("input")
                .key("bundle-name")
                .attr("type", "text")
                .attr("placeholder", "Name your bundle")
                .attr("value", &bundle.name)
                .on("input", "set_name"),
        )
        .child(
            DomNode::elem("div")
                .key("bundle-products")
                .class("bundle-products")
                .children(products),
        )
        .child(
            DomNode::elem("div")
                .key("bundle-summary")
                .class("bundle-summary")
                .child(DomNode::text("span", bundle.len().to_string()).class("bundle-item-count"))
                .child(
                    DomNode::text("span", format_price(bundle.total_price()))
                        .class("bundle-total-price"),
                )
                .child(
                    DomNode::text("span", format!("{}%", bundle.discount_percentage()))
                        .class("bundle-discount"),
                )
                .child(
                    DomNode::text("span", format_price(bundle.final_price()))
                        .class("bundle-final-price"),
                )
                .child(
                    DomNode::text("span", format_price(bundle.savings())).class("bundle-savings"),
                ),
        )
        .child(save_btn)
        .child(
            DomNode::text("button", "Clear")
                .key("clear-bundle")
                .class("clear-bundle-btn")
                .on("click", "clear_bundle"),
        )
}

fn render_pickers(builder: &BundleBuilder) -> DomNode {
    let bundle = builder.bundle();

    let themes = Theme::ALL.iter().map(|theme| {
        let active = bundle.theme == Some(*theme);
        DomNode::text("button", theme.title())
            .key(format!("theme-{}", theme))
            .class(if active { "theme-btn active" } else { "theme-btn" })
            .attr("data-theme", theme.as_str())
            .on("click", "set_theme")
    });

    let occasions = OCCASIONS.iter().map(|occ| {
        let active = bundle.occasion.as_deref() == Some(*occ);
        DomNode::text("button", *occ)
            .key(format!("occasion-{}", occ))
            .class(if active {
                "occasion-btn active"
            } else {
                "occasion-btn"
            })
            .attr("data-occasion", *occ)
            .on("click", "set_occasion")
    });

    DomNode::elem("div")
        .key("bundle-pickers")
        .class("bundle-pickers")
        .child(DomNode::elem("div").class("theme-picker").children(themes))
        .child(
            DomNode::elem("div")
                .class("occasion-picker")
                .children(occasions),
        )
}

fn render_suggestions(builder: &BundleBuilder) -> DomNode {
    let container = DomNode::elem("div")
        .key("ai-suggestions")
        .class("ai-suggestions");

    if builder.suggestions().is_empty() {
        return container.child(DomNode::text("p", "No suggestions available").class("text-muted"));
    }

    let cards = builder
        .suggestions()
        .iter()
        .enumerate()
        .map(|(index, s)| suggestion_card(builder, index, s));
    container.children(cards)
}

fn suggestion_card(builder: &BundleBuilder, index: usize, s: &Suggestion) -> DomNode {
    let products = s.products.iter().filter_map(|id| {
        let item = builder.catalog().get(*id)?;
        Some(
            DomNode::elem("div")
                .class("suggestion-product")
                .child(DomNode::text("span", &item.name).class("suggestion-product-name"))
                .child(
                    DomNode::text("span", format_price(item.price))
                        .class("suggestion-product-price"),
                ),
        )
    });

    DomNode::elem("div")
        .key(format!("suggestion-{}", index))
        .class("ai-suggestion")
        .attr("data-suggestion-index", index.to_string())
        .child(DomNode::text("h6", &s.title).class("suggestion-title"))
        .child(
            DomNode::text("span", format!("{}%", (s.confidence * 100.0).round() as i32))
                .class("confidence-badge"),
        )
        .child(DomNode::text("p", &s.description).class("suggestion-description"))
        .child(
            DomNode::elem("div")
                .class("suggestion-products")
                .children(products),
        )
        .child(DomNode::text("p", &s.reason).class("suggestion-reason"))
        .child(
            DomNode::text("button", "Apply Suggestion")
                .class("apply-suggestion-btn")
                .attr("data-suggestion-index", index.to_string())
                .on("click", "apply_suggestion"),
        )
}
