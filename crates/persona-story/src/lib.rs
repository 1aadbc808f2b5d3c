//! persona-story — swipeable artisan-story feed
//!
//! State machine for the story widget: entries are sourced once from page
//! markup, navigation wraps with a short transition cooldown, an
//! auto-advance schedule fires `next` unless suspended by user gestures,
//! and per-story engagement (like/follow/share) keeps explicit model state
//! with monotonic sequencing for its fire-and-forget remote syncs.

pub mod dom;
mod engage;
mod feed;

pub use engage::{FollowSync, LikeSync};
pub use feed::{
    Artisan, Autoplay, FilterField, FilterValue, StoryEntry, StoryFeed, StoryFilters, StoryText,
    AUTO_ADVANCE_PERIOD, TRANSITION_COOLDOWN, WHEEL_RESUME_DELAY,
};

use serde::Deserialize;

/// Wire actions accepted by the story widget.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StoryAction {
    NextStory,
    PreviousStory,
    SetFilter { filter: String, value: String },
    ToggleLike { story_id: u32 },
    ToggleFollow { artisan_id: u32 },
    ShareStory { story_id: u32 },
    AddToBundle { product_id: u32 },
    /// Gesture hints that suspend/resume auto-advance.
    TouchStart,
    TouchEnd,
    PointerEnter,
    PointerLeave,
    Wheel { delta_y: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        let a: StoryAction = serde_json::from_str(r#"{"action":"next_story"}"#).unwrap();
        assert!(matches!(a, StoryAction::NextStory));

        let a: StoryAction =
            serde_json::from_str(r#"{"action":"toggle_like","story_id":3}"#).unwrap();
        assert!(matches!(a, StoryAction::ToggleLike { story_id: 3 }));

        let a: StoryAction =
            serde_json::from_str(r#"{"action":"set_filter","filter":"craft","value":"pottery"}"#)
                .unwrap();
        assert!(matches!(a, StoryAction::SetFilter { .. }));

        let a: StoryAction =
            serde_json::from_str(r#"{"action":"wheel","delta_y":-12.0}"#).unwrap();
        assert!(matches!(a, StoryAction::Wheel { delta_y } if delta_y < 0.0));
    }
}
