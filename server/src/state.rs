//! Shared server state: one model per widget behind a mutex, plus the
//! broadcast channel that fans re-rendered pages out to SSE clients.

use std::sync::Mutex;
use std::time::Instant;

use persona_bundle::BundleBuilder;
use persona_dom::{render_to_html, DomNode, Snapshot};
use persona_page::{Session, ToastTray};
use persona_story::StoryFeed;
use tokio::sync::broadcast;

use crate::api::ApiClient;

/// Messages pushed to connected SSE clients.
#[derive(Debug, Clone)]
pub enum Push {
    /// Re-rendered page HTML.
    Snapshot(String),
    /// Client should navigate to this location.
    Navigate(String),
}

pub struct AppState {
    pub bundle: Mutex<BundleBuilder>,
    pub story: Mutex<StoryFeed>,
    pub tray: Mutex<ToastTray>,
    pub session: Mutex<Session>,
    pub api: ApiClient,
    pub pushes: broadcast::Sender<Push>,
    pub public_dir: String,
}

impl AppState {
    /// Compose the full page tree from every widget model.
    ///
    /// Locks are taken one model at a time and never held across await
    /// points; callers must not hold any model lock when calling this.
    pub fn render_snapshot(&self) -> Snapshot {
        let now = Instant::now();

        let auth = {
            let session = self.session.lock().unwrap();
            persona_page::dom::render_auth_status(&session)
        };
        let bundle = {
            let builder = self.bundle.lock().unwrap();
            persona_bundle::dom::render(&builder)
        };
        let story = {
            let feed = self.story.lock().unwrap();
            persona_story::dom::render(&feed)
        };
        let toasts = {
            let mut tray = self.tray.lock().unwrap();
            tray.prune(now);
            persona_page::dom::render_toasts(&tray)
        };

        Snapshot {
            root: DomNode::elem("div")
                .key("app")
                .class("persona-app")
                .child(auth)
                .child(bundle)
                .child(story)
                .child(toasts),
        }
    }

    pub fn render_html(&self) -> String {
        render_to_html(&self.render_snapshot().root)
    }

    /// Push the current page to all SSE clients. Send fails only when no
    /// client is connected, which is fine.
    pub fn broadcast(&self) {
        let _ = self.pushes.send(Push::Snapshot(self.render_html()));
    }

    pub fn push_navigate(&self, destination: String) {
        let _ = self.pushes.send(Push::Navigate(destination));
    }
}
