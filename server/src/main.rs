mod api;
mod error;
mod routes;
mod state;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use persona_bundle::{BundleBuilder, Catalog};
use persona_page::{Session, ToastTray};
use persona_story::StoryFeed;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "persona-server", about = "Persona marketplace widget host")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Upstream marketplace API base URL.
    #[arg(long, env = "PERSONA_UPSTREAM_URL", default_value = "http://localhost:3001")]
    upstream: String,

    /// Directory holding index.html and static assets.
    #[arg(long, env = "PERSONA_PUBLIC_DIR", default_value = "server/public")]
    public_dir: String,

    /// Page-markup snapshot the story feed is sourced from.
    #[arg(long, env = "PERSONA_STORIES", default_value = "server/public/stories.json")]
    stories: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let markup = std::fs::read_to_string(&args.stories)
        .with_context(|| format!("reading story markup {}", args.stories))?;
    let snapshot = persona_dom::parse_snapshot(&markup)
        .with_context(|| format!("parsing story markup {}", args.stories))?;
    let mut feed = StoryFeed::from_dom(&snapshot.root);
    feed.autoplay.start(Instant::now());
    tracing::info!("loaded {} stories from {}", feed.source_len(), args.stories);

    let http = reqwest::Client::builder()
        .user_agent(format!("persona-server/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .context("building HTTP client")?;

    let (pushes, _) = broadcast::channel(16);
    let state = Arc::new(AppState {
        bundle: Mutex::new(BundleBuilder::new(Catalog::builtin())),
        story: Mutex::new(feed),
        tray: Mutex::new(ToastTray::new()),
        session: Mutex::new(Session::default()),
        api: ApiClient::new(http, args.upstream.clone()),
        pushes,
        public_dir: args.public_dir.clone(),
    });

    tokio::spawn(drive_timers(state.clone()));

    let app = routes::router(state);
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("persona-server http://localhost:{}", args.port);
    tracing::info!("upstream API: {}", args.upstream);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Clock-driven work: auto-advance the story feed, expire toasts, and fire
/// delayed redirects. Broadcasts only when something actually changed.
async fn drive_timers(state: Arc<AppState>) {
    let mut tick = tokio::time::interval(Duration::from_millis(250));
    loop {
        tick.tick().await;
        let now = Instant::now();
        let mut changed = false;

        {
            let mut feed = state.story.lock().unwrap();
            if feed.autoplay.poll(now) {
                changed |= feed.next(now);
            }
        }
        {
            let mut tray = state.tray.lock().unwrap();
            let before = tray.len();
            tray.prune(now);
            changed |= tray.len() != before;
        }
        let redirect = state.session.lock().unwrap().due_redirect(now);
        if let Some(dest) = redirect {
            state.push_navigate(dest);
        }

        if changed {
            state.broadcast();
        }
    }
}
