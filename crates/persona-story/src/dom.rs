//! Story widget rendering. Pure projection of the feed model.

use crate::feed::{FilterValue, StoryEntry, StoryFeed};
use persona_dom::DomNode;

const CRAFT_FILTERS: [&str; 5] = ["pottery", "weaving", "woodwork", "jewelry", "metalwork"];

/// Render the whole widget: progress bar, counter, filter bar, and the card
/// stack with the current card marked active.
pub fn render(feed: &StoryFeed) -> DomNode {
    let (position, total) = feed.progress();
    let width = if total == 0 {
        0.0
    } else {
        position as f64 / total as f64 * 100.0
    };

    let cards = feed
        .view_stories()
        .enumerate()
        .map(|(index, story)| story_card(story, index == feed.current_index()));

    DomNode::elem("div")
        .key("story-scroll")
        .class("story-scroll-container")
        .child(
            DomNode::elem("div").class("story-progress").child(
                DomNode::elem("div")
                    .class("story-progress-bar")
                    .attr("style", format!("width: {:.1}%", width)),
            ),
        )
        .child(
            DomNode::text("span", format!("{} / {}", position, total)).class("story-counter"),
        )
        .child(render_filters(feed))
        .child(
            DomNode::elem("div")
                .key("story-cards")
                .class("story-cards")
                .children(cards),
        )
        .child(
            DomNode::text("button", "‹")
                .key("story-prev")
                .class("story-nav-btn story-nav-prev")
                .on("click", "previous_story"),
        )
        .child(
            DomNode::text("button", "›")
                .key("story-next")
                .class("story-nav-btn story-nav-next")
                .on("click", "next_story"),
        )
}

fn render_filters(feed: &StoryFeed) -> DomNode {
    let crafts: Vec<String> = CRAFT_FILTERS.iter().map(|c| c.to_string()).collect();
    // Era and tone choices come from the sourced stories themselves.
    let eras = distinct_values(feed, |s| s.story.era.as_deref());
    let tones = distinct_values(feed, |s| s.story.tone.as_deref());

    DomNode::elem("div")
        .key("story-filters")
        .class("story-filters")
        .child(filter_group("craft", &crafts, &feed.filters().craft))
        .child(filter_group("era", &eras, &feed.filters().era))
        .child(filter_group("tone", &tones, &feed.filters().tone))
}

// Drawn from the full source list, not the view, so narrowing one filter
// never hides the other choices.
fn distinct_values(feed: &StoryFeed, pick: impl Fn(&StoryEntry) -> Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for story in feed.stories() {
        if let Some(value) = pick(story) {
            if !out.iter().any(|v| v == value) {
                out.push(value.to_string());
            }
        }
    }
    out
}

fn filter_group(field: &str, values: &[String], current: &FilterValue) -> DomNode {
    let all_active = *current == FilterValue::All;
    let buttons = std::iter::once(filter_button(field, "all", "All", all_active)).chain(
        values.iter().map(|value| {
            let active = matches!(current, FilterValue::Only(c) if c.eq_ignore_ascii_case(value));
            filter_button(field, value, &title_case(value), active)
        }),
    );

    DomNode::elem("div")
        .key(format!("filters-{}", field))
        .class(format!("filter-group filter-group-{}", field))
        .children(buttons)
}

fn filter_button(field: &str, value: &str, label: &str, active: bool) -> DomNode {
    DomNode::text("button", label)
        .key(format!("filter-{}-{}", field, value))
        .class(if active {
            "filter-btn active"
        } else {
            "filter-btn"
        })
        .attr("data-filter", field)
        .attr("data-value", value)
        .on("click", "set_filter")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn story_card(story: &StoryEntry, active: bool) -> DomNode {
    let mut card = DomNode::elem("div")
        .key(story.key.as_str())
        .class(if active {
            "story-card active"
        } else {
            "story-card"
        })
        .attr("data-story-id", story.id.to_string())
        .attr("data-artisan-id", story.artisan.id.to_string());
    if let Some(era) = &story.story.era {
        card = card.attr("data-era", era);
    }
    if let Some(tone) = &story.story.tone {
        card = card.attr("data-tone", tone);
    }

    card.child(
        DomNode::elem("div")
            .class("artisan-header")
            .child(DomNode::text("span", &story.artisan.name).class("artisan-name"))
            .child(DomNode::text("span", &story.artisan.craft).class("artisan-craft"))
            .child(
                DomNode::text(
                    "button",
                    if story.following {
                        "Following"
                    } else {
                        "Follow"
                    },
                )
                .class(if story.following {
                    "follow-btn following"
                } else {
                    "follow-btn"
                })
                .attr("data-artisan-id", story.artisan.id.to_string())
                .on("click", "toggle_follow"),
            ),
    )
    .child(DomNode::text("h3", &story.story.title).class("story-title"))
    .child(DomNode::text("p", &story.story.content).class("story-text"))
    .child(
        DomNode::elem("div")
            .class("story-actions")
            .child(
                DomNode::elem("button")
                    .class(if story.liked {
                        "like-btn liked"
                    } else {
                        "like-btn"
                    })
                    .attr("data-story-id", story.id.to_string())
                    .on("click", "toggle_like")
                    .child(DomNode::text("span", if story.liked { "♥" } else { "♡" }))
                    .child(DomNode::text("span", story.likes.to_string()).class("stat-count")),
            )
            .child(
                DomNode::text("button", "Share")
                    .class("share-btn")
                    .attr("data-story-id", story.id.to_string())
                    .on("click", "share_story"),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Artisan, FilterField, StoryText};

    fn entry(id: u32, craft: &str, likes: u32) -> StoryEntry {
        StoryEntry {
            id,
            key: format!("story-{}", id),
            artisan: Artisan {
                id,
                name: format!("Artisan {}", id),
                craft: craft.to_string(),
            },
            story: StoryText {
                title: format!("Story {}", id),
                content: "Once upon a kiln".to_string(),
                era: None,
                tone: None,
            },
            likes,
            liked: false,
            following: false,
        }
    }

    #[test]
    fn test_render_marks_current_card_active() {
        let mut feed = StoryFeed::from_entries(vec![
            entry(1, "Pottery", 4),
            entry(2, "Weaving", 0),
        ]);
        feed.next(std::time::Instant::now());

        let root = render(&feed);
        let mut cards = Vec::new();
        root.collect_by_class("story-card", &mut cards);
        assert_eq!(cards.len(), 2);
        assert!(!cards[0].has_class("active"));
        assert!(cards[1].has_class("active"));
        assert_eq!(root.text_by_class("story-counter"), Some("2 / 2"));
    }

    #[test]
    fn test_render_reflects_engagement_state() {
        let mut feed = StoryFeed::from_entries(vec![entry(1, "Pottery", 4)]);
        feed.toggle_like(1);
        feed.toggle_follow(1);

        let root = render(&feed);
        let like = root.find_by_class("like-btn").unwrap();
        assert!(like.has_class("liked"));
        assert_eq!(root.text_by_class("stat-count"), Some("5"));
        let follow = root.find_by_class("follow-btn").unwrap();
        assert!(follow.has_class("following"));
        assert_eq!(follow.text.as_deref(), Some("Following"));
    }

    #[test]
    fn test_render_filtered_view_only() {
        let mut feed = StoryFeed::from_entries(vec![
            entry(1, "Pottery", 0),
            entry(2, "Weaving", 0),
            entry(3, "Pottery", 0),
        ]);
        feed.set_filter(FilterField::Craft, "pottery");

        let root = render(&feed);
        let mut cards = Vec::new();
        root.collect_by_class("story-card", &mut cards);
        assert_eq!(cards.len(), 2);

        let mut filters = Vec::new();
        root.collect_by_class("filter-btn", &mut filters);
        let active_craft = filters
            .iter()
            .find(|f| f.has_class("active") && f.attr_value("data-filter") == Some("craft"))
            .unwrap();
        assert_eq!(active_craft.attr_value("data-value"), Some("pottery"));
    }

    #[test]
    fn test_era_and_tone_filter_groups_rendered() {
        let mut a = entry(1, "Pottery", 0);
        a.story.era = Some("heritage".to_string());
        a.story.tone = Some("warm".to_string());
        let mut b = entry(2, "Weaving", 0);
        b.story.era = Some("contemporary".to_string());
        b.story.tone = Some("warm".to_string());
        let mut feed = StoryFeed::from_entries(vec![a, b]);
        feed.set_filter(FilterField::Era, "heritage");

        let root = render(&feed);
        let era_group = root.find_by_class("filter-group-era").unwrap();
        let values: Vec<&str> = era_group
            .children_iter()
            .iter()
            .filter_map(|b| b.attr_value("data-value"))
            .collect();
        assert_eq!(values, vec!["all", "heritage", "contemporary"]);
        let active = era_group
            .children_iter()
            .iter()
            .find(|b| b.has_class("active"))
            .unwrap();
        assert_eq!(active.attr_value("data-value"), Some("heritage"));
        assert_eq!(active.attr_value("data-filter"), Some("era"));

        // Tone values deduplicate; narrowing era leaves them available.
        let tone_group = root.find_by_class("filter-group-tone").unwrap();
        assert_eq!(tone_group.children_iter().len(), 2, "All plus one tone");
    }

    #[test]
    fn test_empty_feed_renders_zero_counter() {
        let feed = StoryFeed::from_entries(Vec::new());
        let root = render(&feed);
        assert_eq!(root.text_by_class("story-counter"), Some("0 / 0"));
        let bar = root.find_by_class("story-progress-bar").unwrap();
        assert_eq!(bar.attr_value("style"), Some("width: 0.0%"));
    }
}
