use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::extract::{RawQuery, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream, StreamExt};
use persona_bundle::{AddItemError, BundleAction, Theme};
use persona_dom::Snapshot;
use persona_page::{PageAction, Session, Severity};
use persona_story::{FilterField, StoryAction, WHEEL_RESUME_DELAY};
use tokio::sync::broadcast::error::RecvError;

use crate::error::AppError;
use crate::state::{AppState, Push};

// ── Router ──────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/sse", get(sse))
        .route("/actions/bundle", post(bundle_action))
        .route("/actions/story", post(story_action))
        .route("/actions/page", post(page_action))
        .fallback(get(static_file))
        .with_state(state)
}

// ── Handlers ────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// SSR page: the template's `<!--SSR-->` marker is replaced with the
/// rendered current state, so the first paint needs no client round-trip.
async fn index(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    if let Some(q) = query.as_deref() {
        let incoming = Session::from_query(q);
        if incoming.is_logged_in() {
            *state.session.lock().unwrap() = incoming;
        }
    }

    let template_path = format!("{}/index.html", state.public_dir);
    let template = std::fs::read_to_string(&template_path)
        .map_err(|_| AppError::Internal(format!("missing template {}", template_path)))?;
    let page = template.replace("<!--SSR-->", &state.render_html());
    Ok(Html(page))
}

/// Long-lived snapshot stream. Each client gets the current page on
/// connect, then every broadcast push after that.
async fn sse(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.pushes.subscribe();
    let initial = state.render_html();

    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(Push::Snapshot(html)) => {
                    return Some((Ok(Event::default().event("message").data(html)), rx));
                }
                Ok(Push::Navigate(dest)) => {
                    return Some((Ok(Event::default().event("navigate").data(dest)), rx));
                }
                // Dropped pushes are fine; the next snapshot is complete.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let stream = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("message").data(initial))
    })
    .chain(updates);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn static_file(
    State(state): State<Arc<AppState>>,
    uri: axum::http::Uri,
) -> Result<axum::response::Response, AppError> {
    use axum::http::header;
    use axum::response::IntoResponse;

    let path = uri.path().trim_start_matches('/');
    // No traversal out of the public dir
    if path.is_empty() || path.contains("..") {
        return Err(AppError::NotFound(uri.path().to_string()));
    }
    let full = format!("{}/{}", state.public_dir, path);
    let data = std::fs::read(&full).map_err(|_| AppError::NotFound(path.to_string()))?;
    Ok(([(header::CONTENT_TYPE, content_type(&full))], data).into_response())
}

fn content_type(path: &str) -> &'static str {
    if path.ends_with(".html") {
        "text/html; charset=utf-8"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".json") {
        "application/json"
    } else {
        "application/octet-stream"
    }
}

// ── Bundle widget ───────────────────────────────────────────────────

async fn bundle_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<BundleAction>,
) -> Result<Json<Snapshot>, AppError> {
    let now = Instant::now();
    match action {
        BundleAction::AddItem { id } => {
            let outcome = state.bundle.lock().unwrap().add_item(id);
            match outcome {
                Ok(name) => toast(&state, format!("{} added to bundle!", name), Severity::Success, now),
                Err(AddItemError::AlreadyInBundle) => {
                    toast(&state, "Product already in bundle", Severity::Warning, now)
                }
                Err(e @ AddItemError::UnknownItem(_)) => {
                    return Err(AppError::BadRequest(e.to_string()))
                }
            }
        }
        BundleAction::RemoveItem { id } => {
            let removed = state.bundle.lock().unwrap().remove_item(id);
            if let Some(name) = removed {
                toast(&state, format!("{} removed from bundle", name), Severity::Info, now);
            }
        }
        BundleAction::ApplySuggestion { index } => {
            let applied = state.bundle.lock().unwrap().apply_suggestion(index);
            match applied {
                Ok(applied) => toast(
                    &state,
                    format!("Applied \"{}\"", applied.title),
                    Severity::Success,
                    now,
                ),
                Err(e) => return Err(AppError::BadRequest(e.to_string())),
            }
        }
        BundleAction::SetTheme { theme } => {
            let parsed = if theme.is_empty() {
                None
            } else {
                Some(
                    Theme::from_name(&theme)
                        .ok_or_else(|| AppError::BadRequest(format!("unknown theme {}", theme)))?,
                )
            };
            state.bundle.lock().unwrap().set_theme(parsed);
        }
        BundleAction::SetOccasion { occasion } => {
            state.bundle.lock().unwrap().set_occasion(Some(occasion));
        }
        BundleAction::SetName { name } => {
            state.bundle.lock().unwrap().set_name(name);
        }
        BundleAction::RefreshSuggestions => {
            state.bundle.lock().unwrap().refresh_suggestions();
        }
        BundleAction::ClearBundle => {
            state.bundle.lock().unwrap().clear();
            toast(&state, "Bundle cleared", Severity::Info, now);
        }
        BundleAction::SaveBundle => save_bundle(&state, now).await?,
    }

    let snapshot = state.render_snapshot();
    state.broadcast();
    Ok(Json(snapshot))
}

/// Save flow: validate locally, post upstream, commit the returned id.
/// Failure leaves the bundle untouched and prompts a retry.
async fn save_bundle(state: &Arc<AppState>, now: Instant) -> Result<(), AppError> {
    let request = {
        let mut builder = state.bundle.lock().unwrap();
        builder.save_request(unix_millis())
    };
    let request = match request {
        Ok(req) => req,
        Err(e) => {
            toast(state, e.to_string(), Severity::Warning, now);
            return Ok(());
        }
    };

    match state.api.save_bundle(&request).await {
        Ok(bundle_id) => {
            state.bundle.lock().unwrap().confirm_saved(bundle_id);
            toast(state, "Bundle saved successfully!", Severity::Success, now);
        }
        Err(e) if e.is_unauthorized() => expire_session(state, now),
        Err(e) => {
            tracing::warn!("bundle save failed: {}", e);
            toast(
                state,
                "Failed to save bundle. Please try again.",
                Severity::Error,
                now,
            );
        }
    }
    Ok(())
}

// ── Story widget ────────────────────────────────────────────────────

async fn story_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<StoryAction>,
) -> Result<Json<Snapshot>, AppError> {
    let now = Instant::now();
    match action {
        StoryAction::NextStory => {
            state.story.lock().unwrap().next(now);
        }
        StoryAction::PreviousStory => {
            state.story.lock().unwrap().previous(now);
        }
        StoryAction::SetFilter { filter, value } => {
            let field = FilterField::parse(&filter)
                .ok_or_else(|| AppError::BadRequest(format!("unknown filter {}", filter)))?;
            state.story.lock().unwrap().set_filter(field, &value);
        }
        StoryAction::ToggleLike { story_id } => {
            let sync = state.story.lock().unwrap().toggle_like(story_id);
            if let Some(sync) = sync {
                spawn_like_sync(state.clone(), sync, now);
            }
        }
        StoryAction::ToggleFollow { artisan_id } => {
            let sync = state.story.lock().unwrap().toggle_follow(artisan_id);
            if let Some(sync) = sync {
                spawn_follow_sync(state.clone(), sync, now);
            }
        }
        StoryAction::ShareStory { story_id } => {
            let link = state.story.lock().unwrap().share_link(story_id);
            if link.is_some() {
                toast(&state, "Story link copied to clipboard!", Severity::Success, now);
            }
        }
        StoryAction::AddToBundle { product_id } => {
            let outcome = state.bundle.lock().unwrap().add_item(product_id);
            match outcome {
                Ok(name) => toast(&state, format!("{} added to bundle!", name), Severity::Success, now),
                Err(AddItemError::AlreadyInBundle) => {
                    toast(&state, "Product already in bundle", Severity::Warning, now)
                }
                Err(AddItemError::UnknownItem(_)) => {}
            }
            let api = state.api.clone();
            tokio::spawn(async move {
                if let Err(e) = api.add_product(product_id).await {
                    tracing::warn!("bundle quick-add sync failed: {}", e);
                }
            });
        }
        StoryAction::TouchStart | StoryAction::PointerEnter => {
            state.story.lock().unwrap().autoplay.stop();
        }
        StoryAction::TouchEnd | StoryAction::PointerLeave => {
            state.story.lock().unwrap().autoplay.start(now);
        }
        StoryAction::Wheel { delta_y } => {
            let mut feed = state.story.lock().unwrap();
            if delta_y > 0.0 {
                feed.next(now);
            } else {
                feed.previous(now);
            }
            feed.autoplay.defer(now, WHEEL_RESUME_DELAY);
        }
    }

    let snapshot = state.render_snapshot();
    state.broadcast();
    Ok(Json(snapshot))
}

/// Fire-and-forget like sync. A completion for a superseded toggle is
/// discarded; failures are logged only, local state stands.
fn spawn_like_sync(state: Arc<AppState>, sync: persona_story::LikeSync, now: Instant) {
    tokio::spawn(async move {
        let result = state.api.sync_like(&sync).await;
        if !state
            .story
            .lock()
            .unwrap()
            .like_is_current(sync.story_id, sync.seq)
        {
            tracing::debug!("stale like sync for story {} discarded", sync.story_id);
            return;
        }
        match result {
            Ok(()) => {}
            Err(e) if e.is_unauthorized() => {
                expire_session(&state, now);
                state.broadcast();
            }
            Err(e) => tracing::warn!("like sync failed for story {}: {}", sync.story_id, e),
        }
    });
}

fn spawn_follow_sync(state: Arc<AppState>, sync: persona_story::FollowSync, now: Instant) {
    tokio::spawn(async move {
        let result = state.api.sync_follow(&sync).await;
        if !state
            .story
            .lock()
            .unwrap()
            .follow_is_current(sync.artisan_id, sync.seq)
        {
            tracing::debug!("stale follow sync for artisan {} discarded", sync.artisan_id);
            return;
        }
        match result {
            Ok(()) => {}
            Err(e) if e.is_unauthorized() => {
                expire_session(&state, now);
                state.broadcast();
            }
            Err(e) => tracing::warn!("follow sync failed for artisan {}: {}", sync.artisan_id, e),
        }
    });
}

// ── Page shell ──────────────────────────────────────────────────────

async fn page_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<PageAction>,
) -> Result<Json<Snapshot>, AppError> {
    let now = Instant::now();
    match action {
        PageAction::Login { email, password } => {
            let form = persona_page::LoginForm { email, password };
            match form.validate() {
                Ok(request) => match state.api.login(&request).await {
                    Ok(resp) if resp.success => {
                        state.session.lock().unwrap().log_in(request.email);
                        let message = resp.message.unwrap_or_else(|| "Welcome back!".to_string());
                        toast(&state, message, Severity::Success, now);
                        state.push_navigate("/".to_string());
                    }
                    Ok(resp) => {
                        let message = resp
                            .message
                            .unwrap_or_else(|| "Invalid email or password".to_string());
                        toast(&state, message, Severity::Error, now);
                    }
                    Err(e) if e.is_unauthorized() => {
                        toast(&state, "Invalid email or password", Severity::Error, now);
                    }
                    Err(e) => {
                        tracing::warn!("login failed: {}", e);
                        toast(&state, "Login failed. Please try again.", Severity::Error, now);
                    }
                },
                Err(e) => toast(&state, e.to_string(), Severity::Error, now),
            }
        }
        PageAction::Register {
            name,
            email,
            password,
            role,
        } => {
            let form = persona_page::RegisterForm {
                name,
                email,
                password,
                role,
            };
            match form.validate() {
                Ok(request) => match state.api.register(&request).await {
                    Ok(resp) if resp.success => {
                        state.session.lock().unwrap().log_in(request.email);
                        toast(&state, "Account created successfully!", Severity::Success, now);
                        let dest = Session::post_register_destination(&request.role);
                        state.push_navigate(dest.to_string());
                    }
                    Ok(resp) => {
                        let message = resp
                            .message
                            .unwrap_or_else(|| "Registration failed".to_string());
                        toast(&state, message, Severity::Error, now);
                    }
                    Err(e) => {
                        tracing::warn!("registration failed: {}", e);
                        toast(
                            &state,
                            "Registration failed. Please try again.",
                            Severity::Error,
                            now,
                        );
                    }
                },
                Err(e) => toast(&state, e.to_string(), Severity::Error, now),
            }
        }
        PageAction::DismissToast { id } => {
            state.tray.lock().unwrap().dismiss(id);
        }
    }

    let snapshot = state.render_snapshot();
    state.broadcast();
    Ok(Json(snapshot))
}

// ── Helpers ─────────────────────────────────────────────────────────

fn toast(state: &AppState, message: impl Into<String>, severity: Severity, now: Instant) {
    state.tray.lock().unwrap().push(message, severity, now);
}

/// Upstream said 401: drop the session, warn, and let the driver task
/// issue the delayed `/login` redirect.
fn expire_session(state: &AppState, now: Instant) {
    let mut session = state.session.lock().unwrap();
    let mut tray = state.tray.lock().unwrap();
    session.expire(&mut tray, now);
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
