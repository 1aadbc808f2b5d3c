//! Engagement state: likes, follows, and share links.
//!
//! Toggles mutate the model immediately and hand back a sync payload for the
//! host to fire at the backend. Each entity carries a monotonic sequence so
//! a slow completion for an older toggle can be recognized and discarded.

use crate::feed::StoryFeed;
use serde::Serialize;

/// Payload for syncing a like toggle upstream.
#[derive(Debug, Clone, Serialize)]
pub struct LikeSync {
    pub story_id: u32,
    pub liked: bool,
    /// Per-story toggle sequence; not part of the wire payload.
    #[serde(skip)]
    pub seq: u64,
}

/// Payload for syncing a follow toggle upstream.
#[derive(Debug, Clone, Serialize)]
pub struct FollowSync {
    pub artisan_id: u32,
    pub following: bool,
    #[serde(skip)]
    pub seq: u64,
}

impl StoryFeed {
    /// Flip the like state of a story. The like count moves with the flag;
    /// unknown ids are ignored.
    pub fn toggle_like(&mut self, story_id: u32) -> Option<LikeSync> {
        let story = self.stories_mut().iter_mut().find(|s| s.id == story_id)?;
        story.liked = !story.liked;
        if story.liked {
            story.likes = story.likes.saturating_add(1);
        } else {
            story.likes = story.likes.saturating_sub(1);
        }
        let liked = story.liked;

        let seq = self.like_seqs.entry(story_id).or_insert(0);
        *seq += 1;
        Some(LikeSync {
            story_id,
            liked,
            seq: *seq,
        })
    }

    /// Whether a like sync is still the latest toggle for its story.
    pub fn like_is_current(&self, story_id: u32, seq: u64) -> bool {
        self.like_seqs.get(&story_id).copied() == Some(seq)
    }

    /// Flip the follow state of an artisan across every story they appear
    /// in. Unknown ids are ignored.
    pub fn toggle_follow(&mut self, artisan_id: u32) -> Option<FollowSync> {
        let current = self
            .stories()
            .iter()
            .find(|s| s.artisan.id == artisan_id)?
            .following;
        let following = !current;
        for story in self.stories_mut() {
            if story.artisan.id == artisan_id {
                story.following = following;
            }
        }

        let seq = self.follow_seqs.entry(artisan_id).or_insert(0);
        *seq += 1;
        Some(FollowSync {
            artisan_id,
            following,
            seq: *seq,
        })
    }

    /// Whether a follow sync is still the latest toggle for its artisan.
    pub fn follow_is_current(&self, artisan_id: u32, seq: u64) -> bool {
        self.follow_seqs.get(&artisan_id).copied() == Some(seq)
    }

    /// Shareable deep link for a story, e.g. `?story=7`.
    pub fn share_link(&self, story_id: u32) -> Option<String> {
        self.stories()
            .iter()
            .find(|s| s.id == story_id)
            .map(|s| format!("?story={}", s.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Artisan, StoryEntry, StoryText};

    fn entry(id: u32, artisan_id: u32, likes: u32) -> StoryEntry {
        StoryEntry {
            id,
            key: format!("story-{}", id),
            artisan: Artisan {
                id: artisan_id,
                name: format!("Artisan {}", artisan_id),
                craft: "Pottery".to_string(),
            },
            story: StoryText {
                title: format!("Story {}", id),
                content: String::new(),
                era: None,
                tone: None,
            },
            likes,
            liked: false,
            following: false,
        }
    }

    fn feed() -> StoryFeed {
        StoryFeed::from_entries(vec![entry(1, 10, 5), entry(2, 10, 0), entry(3, 20, 2)])
    }

    #[test]
    fn test_toggle_like_moves_count_with_flag() {
        let mut f = feed();
        let sync = f.toggle_like(1).unwrap();
        assert!(sync.liked);
        let story = f.view_stories().next().unwrap();
        assert!(story.liked);
        assert_eq!(story.likes, 6);

        let sync = f.toggle_like(1).unwrap();
        assert!(!sync.liked);
        let story = f.view_stories().next().unwrap();
        assert_eq!(story.likes, 5);
    }

    #[test]
    fn test_unlike_at_zero_saturates() {
        let mut f = feed();
        // Force the inconsistent case: liked with a zero count.
        f.toggle_like(2);
        let story = f.stories_mut().iter_mut().find(|s| s.id == 2).unwrap();
        story.likes = 0;
        f.toggle_like(2);
        let story = f.view_stories().nth(1).unwrap();
        assert_eq!(story.likes, 0);
    }

    #[test]
    fn test_stale_like_seq_detected() {
        let mut f = feed();
        let first = f.toggle_like(1).unwrap();
        let second = f.toggle_like(1).unwrap();
        assert!(!f.like_is_current(1, first.seq));
        assert!(f.like_is_current(1, second.seq));
    }

    #[test]
    fn test_toggle_follow_spans_artisan_stories() {
        let mut f = feed();
        let sync = f.toggle_follow(10).unwrap();
        assert!(sync.following);
        let flags: Vec<bool> = f.view_stories().map(|s| s.following).collect();
        assert_eq!(flags, vec![true, true, false]);

        f.toggle_follow(10);
        assert!(f.view_stories().all(|s| !s.following));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut f = feed();
        assert!(f.toggle_like(99).is_none());
        assert!(f.toggle_follow(99).is_none());
        assert!(f.share_link(99).is_none());
    }

    #[test]
    fn test_share_link() {
        let f = feed();
        assert_eq!(f.share_link(3).as_deref(), Some("?story=3"));
    }

    #[test]
    fn test_like_sync_payload_omits_seq() {
        let mut f = feed();
        let sync = f.toggle_like(1).unwrap();
        let json = serde_json::to_value(&sync).unwrap();
        assert_eq!(json["story_id"], 1);
        assert_eq!(json["liked"], true);
        assert!(json.get("seq").is_none());
    }
}
