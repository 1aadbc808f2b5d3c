//! Story feed model: markup-sourced entries, wrap-around navigation with a
//! transition cooldown, reversible filters, and the auto-advance schedule.

use persona_dom::DomNode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Ignore further transitions for this long after any transition.
pub const TRANSITION_COOLDOWN: Duration = Duration::from_millis(500);
/// Auto-advance fires `next` on this period.
pub const AUTO_ADVANCE_PERIOD: Duration = Duration::from_secs(8);
/// Manual wheel navigation resumes auto-advance after this delay.
pub const WHEEL_RESUME_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Artisan {
    pub id: u32,
    pub name: String,
    pub craft: String,
}

#[derive(Debug, Clone)]
pub struct StoryText {
    pub title: String,
    pub content: String,
    pub era: Option<String>,
    pub tone: Option<String>,
}

/// One story card. Engagement state lives on the model; the rendered DOM is
/// a projection of these fields, never the source of truth.
#[derive(Debug, Clone)]
pub struct StoryEntry {
    pub id: u32,
    /// Stable DOM key for the card.
    pub key: String,
    pub artisan: Artisan,
    pub story: StoryText,
    pub likes: u32,
    pub liked: bool,
    pub following: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    pub fn parse(value: &str) -> FilterValue {
        if value == "all" {
            FilterValue::All
        } else {
            FilterValue::Only(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Craft,
    Era,
    Tone,
}

impl FilterField {
    pub fn parse(name: &str) -> Option<FilterField> {
        match name {
            "craft" => Some(FilterField::Craft),
            "era" => Some(FilterField::Era),
            "tone" => Some(FilterField::Tone),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoryFilters {
    pub craft: FilterValue,
    pub era: FilterValue,
    pub tone: FilterValue,
}

impl StoryFilters {
    fn matches(&self, entry: &StoryEntry) -> bool {
        if let FilterValue::Only(craft) = &self.craft {
            if !entry.artisan.craft.eq_ignore_ascii_case(craft) {
                return false;
            }
        }
        if let FilterValue::Only(era) = &self.era {
            if entry.story.era.as_deref() != Some(era.as_str()) {
                return false;
            }
        }
        if let FilterValue::Only(tone) = &self.tone {
            if entry.story.tone.as_deref() != Some(tone.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Auto-advance schedule. Pure bookkeeping: the host polls with its own
/// clock, so nothing here spawns timers.
#[derive(Debug)]
pub struct Autoplay {
    period: Duration,
    next_fire: Option<Instant>,
    resume_at: Option<Instant>,
}

impl Autoplay {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_fire: None,
            resume_at: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.resume_at = None;
        self.next_fire = Some(now + self.period);
    }

    /// Idempotent: stopping a stopped schedule is a no-op.
    pub fn stop(&mut self) {
        self.next_fire = None;
        self.resume_at = None;
    }

    /// Suspend now and resume automatically after `delay`.
    pub fn defer(&mut self, now: Instant, delay: Duration) {
        self.next_fire = None;
        self.resume_at = Some(now + delay);
    }

    pub fn is_running(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Advance the schedule. Returns true when a `next` transition is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(resume) = self.resume_at {
            if now >= resume {
                self.start(now);
                return false;
            }
        }
        match self.next_fire {
            Some(fire) if now >= fire => {
                self.next_fire = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

/// The story widget model.
pub struct StoryFeed {
    /// Full source list, retained so filters stay reversible.
    stories: Vec<StoryEntry>,
    /// Indices into `stories` that pass the current filters.
    view: Vec<usize>,
    /// Index into `view`.
    current: usize,
    filters: StoryFilters,
    cooldown_until: Option<Instant>,
    pub autoplay: Autoplay,
    pub(crate) like_seqs: HashMap<u32, u64>,
    pub(crate) follow_seqs: HashMap<u32, u64>,
}

impl StoryFeed {
    pub fn from_entries(stories: Vec<StoryEntry>) -> Self {
        let view = (0..stories.len()).collect();
        Self {
            stories,
            view,
            current: 0,
            filters: StoryFilters::default(),
            cooldown_until: None,
            autoplay: Autoplay::new(AUTO_ADVANCE_PERIOD),
            like_seqs: HashMap::new(),
            follow_seqs: HashMap::new(),
        }
    }

    /// Source stories once from page markup. Missing text falls back to the
    /// canonical placeholders; ids fall back to 1-based positions.
    pub fn from_dom(root: &DomNode) -> Self {
        let mut cards = Vec::new();
        root.collect_by_class("story-card", &mut cards);

        let stories = cards
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let id = card
                    .attr_value("data-story-id")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(index as u32 + 1);
                let artisan_id = card
                    .attr_value("data-artisan-id")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(id);
                StoryEntry {
                    id,
                    key: card
                        .key
                        .clone()
                        .unwrap_or_else(|| format!("story-{}", id)),
                    artisan: Artisan {
                        id: artisan_id,
                        name: card
                            .text_by_class("artisan-name")
                            .unwrap_or("Unknown Artisan")
                            .to_string(),
                        craft: card
                            .text_by_class("artisan-craft")
                            .unwrap_or("Craftsperson")
                            .to_string(),
                    },
                    story: StoryText {
                        title: card
                            .text_by_class("story-title")
                            .unwrap_or("Artisan Story")
                            .to_string(),
                        content: card.text_by_class("story-text").unwrap_or("").to_string(),
                        era: card.attr_value("data-era").map(String::from),
                        tone: card.attr_value("data-tone").map(String::from),
                    },
                    likes: card
                        .text_by_class("stat-count")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0),
                    liked: false,
                    following: false,
                }
            })
            .collect();

        Self::from_entries(stories)
    }

    pub fn source_len(&self) -> usize {
        self.stories.len()
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_story(&self) -> Option<&StoryEntry> {
        self.view.get(self.current).map(|i| &self.stories[*i])
    }

    /// Stories in the current view, in order.
    pub fn view_stories(&self) -> impl Iterator<Item = &StoryEntry> {
        self.view.iter().map(|i| &self.stories[*i])
    }

    pub(crate) fn stories(&self) -> &[StoryEntry] {
        &self.stories
    }

    pub(crate) fn stories_mut(&mut self) -> &mut [StoryEntry] {
        &mut self.stories
    }

    pub fn filters(&self) -> &StoryFilters {
        &self.filters
    }

    /// 1-based progress over the view: `(position, total)`.
    pub fn progress(&self) -> (usize, usize) {
        if self.view.is_empty() {
            (0, 0)
        } else {
            (self.current + 1, self.view.len())
        }
    }

    /// Advance to the next story (wraps). Returns false when the transition
    /// was swallowed by the cooldown window or the view is empty.
    pub fn next(&mut self, now: Instant) -> bool {
        if !self.begin_transition(now) {
            return false;
        }
        self.current = (self.current + 1) % self.view.len();
        true
    }

    /// Step back to the previous story (wraps).
    pub fn previous(&mut self, now: Instant) -> bool {
        if !self.begin_transition(now) {
            return false;
        }
        self.current = if self.current == 0 {
            self.view.len() - 1
        } else {
            self.current - 1
        };
        true
    }

    fn begin_transition(&mut self, now: Instant) -> bool {
        if self.view.is_empty() {
            return false;
        }
        if let Some(until) = self.cooldown_until {
            if now < until {
                return false;
            }
        }
        self.cooldown_until = Some(now + TRANSITION_COOLDOWN);
        true
    }

    /// Narrow or broaden one filter dimension and rebuild the view. The
    /// source list is untouched, so broader filters recover hidden entries.
    pub fn set_filter(&mut self, field: FilterField, value: &str) {
        let value = FilterValue::parse(value);
        match field {
            FilterField::Craft => self.filters.craft = value,
            FilterField::Era => self.filters.era = value,
            FilterField::Tone => self.filters.tone = value,
        }
        self.rebuild_view();
    }

    fn rebuild_view(&mut self) {
        self.view = self
            .stories
            .iter()
            .enumerate()
            .filter(|(_, s)| self.filters.matches(s))
            .map(|(i, _)| i)
            .collect();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, craft: &str) -> StoryEntry {
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
                content: String::new(),
                era: None,
                tone: None,
            },
            likes: 0,
            liked: false,
            following: false,
        }
    }

    fn feed3() -> StoryFeed {
        StoryFeed::from_entries(vec![
            entry(1, "Pottery"),
            entry(2, "Weaving"),
            entry(3, "Pottery"),
        ])
    }

    fn later(now: Instant) -> Instant {
        now + TRANSITION_COOLDOWN
    }

    #[test]
    fn test_next_wraps() {
        let mut feed = feed3();
        let mut now = Instant::now();
        assert_eq!(feed.current_index(), 0);
        assert!(feed.next(now));
        now = later(now);
        assert!(feed.next(now));
        now = later(now);
        assert!(feed.next(now));
        assert_eq!(feed.current_index(), 0, "next from last wraps to 0");
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut feed = feed3();
        let now = Instant::now();
        assert!(feed.previous(now));
        assert_eq!(feed.current_index(), 2);
    }

    #[test]
    fn test_cooldown_swallows_rapid_transitions() {
        let mut feed = feed3();
        let now = Instant::now();
        assert!(feed.next(now));
        assert!(!feed.next(now + Duration::from_millis(100)));
        assert_eq!(feed.current_index(), 1);
        assert!(feed.next(now + TRANSITION_COOLDOWN));
        assert_eq!(feed.current_index(), 2);
    }

    #[test]
    fn test_index_always_in_range() {
        let mut feed = feed3();
        let mut now = Instant::now();
        for step in 0..10 {
            if step % 3 == 0 {
                feed.previous(now);
            } else {
                feed.next(now);
            }
            assert!(feed.current_index() < feed.view_len());
            now = later(now);
        }
    }

    #[test]
    fn test_empty_feed_navigation_noop() {
        let mut feed = StoryFeed::from_entries(Vec::new());
        assert!(!feed.next(Instant::now()));
        assert_eq!(feed.progress(), (0, 0));
        assert!(feed.current_story().is_none());
    }

    #[test]
    fn test_filters_are_reversible() {
        let mut feed = feed3();
        feed.next(Instant::now());

        feed.set_filter(FilterField::Craft, "pottery");
        assert_eq!(feed.view_len(), 2);
        assert_eq!(feed.current_index(), 0, "filtering resets the index");

        // Broadening the filter recovers the full list.
        feed.set_filter(FilterField::Craft, "all");
        assert_eq!(feed.view_len(), 3);
    }

    #[test]
    fn test_craft_filter_case_insensitive() {
        let mut feed = feed3();
        feed.set_filter(FilterField::Craft, "POTTERY");
        assert_eq!(feed.view_len(), 2);
    }

    #[test]
    fn test_era_filter_uses_data_attrs() {
        let mut a = entry(1, "Pottery");
        a.story.era = Some("mughal".to_string());
        let b = entry(2, "Pottery");
        let mut feed = StoryFeed::from_entries(vec![a, b]);

        feed.set_filter(FilterField::Era, "mughal");
        assert_eq!(feed.view_len(), 1);
        feed.set_filter(FilterField::Era, "all");
        assert_eq!(feed.view_len(), 2);
    }

    #[test]
    fn test_autoplay_schedule() {
        let mut ap = Autoplay::new(AUTO_ADVANCE_PERIOD);
        let now = Instant::now();
        assert!(!ap.poll(now), "not started yet");

        ap.start(now);
        assert!(!ap.poll(now + Duration::from_secs(1)));
        assert!(ap.poll(now + AUTO_ADVANCE_PERIOD));
        // Rescheduled from the fire time.
        assert!(ap.poll(now + AUTO_ADVANCE_PERIOD * 2 + Duration::from_millis(1)));
    }

    #[test]
    fn test_autoplay_stop_idempotent_and_suspends() {
        let mut ap = Autoplay::new(AUTO_ADVANCE_PERIOD);
        let now = Instant::now();
        ap.start(now);
        ap.stop();
        ap.stop();
        assert!(!ap.is_running());
        assert!(!ap.poll(now + AUTO_ADVANCE_PERIOD * 3));
    }

    #[test]
    fn test_autoplay_defer_resumes_after_delay() {
        let mut ap = Autoplay::new(AUTO_ADVANCE_PERIOD);
        let now = Instant::now();
        ap.start(now);
        ap.defer(now, WHEEL_RESUME_DELAY);
        assert!(!ap.is_running());
        assert!(!ap.poll(now + Duration::from_secs(1)));

        // Resume tick restarts the schedule without firing.
        assert!(!ap.poll(now + WHEEL_RESUME_DELAY));
        assert!(ap.is_running());
        assert!(ap.poll(now + WHEEL_RESUME_DELAY + AUTO_ADVANCE_PERIOD));
    }

    #[test]
    fn test_from_dom_fallbacks() {
        let json = r#"{
            "tag": "div", "attrs": {"class": "story-scroll-container"},
            "children": [
                {"tag":"div","key":"card-a","attrs":{"class":"story-card","data-story-id":"7","data-era":"colonial"},
                 "children":[
                    {"tag":"span","attrs":{"class":"artisan-name"},"text":"Meera Devi"},
                    {"tag":"span","attrs":{"class":"artisan-craft"},"text":"Weaving"},
                    {"tag":"h3","attrs":{"class":"story-title"},"text":"Threads of home"},
                    {"tag":"p","attrs":{"class":"story-text"},"text":"Looms hum at dawn."},
                    {"tag":"span","attrs":{"class":"stat-count"},"text":"12"}
                 ]},
                {"tag":"div","attrs":{"class":"story-card"}}
            ]
        }"#;
        let root = persona_dom::parse_node(json).unwrap();
        let feed = StoryFeed::from_dom(&root);

        assert_eq!(feed.source_len(), 2);
        let first = feed.current_story().unwrap();
        assert_eq!(first.id, 7);
        assert_eq!(first.artisan.name, "Meera Devi");
        assert_eq!(first.story.era.as_deref(), Some("colonial"));
        assert_eq!(first.likes, 12);

        let second = feed.view_stories().nth(1).unwrap();
        assert_eq!(second.id, 2, "missing id falls back to position");
        assert_eq!(second.artisan.name, "Unknown Artisan");
        assert_eq!(second.artisan.craft, "Craftsperson");
        assert_eq!(second.story.title, "Artisan Story");
        assert_eq!(second.story.content, "");
    }
}
