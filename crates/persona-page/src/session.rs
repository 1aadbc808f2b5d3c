//! Session state: auth check, expiry handling, pending redirects.

use crate::toast::{Severity, Toast, ToastTray};
use std::time::{Duration, Instant};

/// Delay before the post-expiry redirect to `/login` fires.
pub const SESSION_EXPIRED_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
pub struct Session {
    logged_in: bool,
    user: Option<String>,
    /// Pending navigation: (destination, due time).
    redirect: Option<(String, Instant)>,
}

impl Session {
    /// Read the auth flag out of the page query string.
    pub fn from_query(query: &str) -> Self {
        let logged_in = query
            .split('&')
            .any(|pair| pair == "logged_in=true");
        Self {
            logged_in,
            user: None,
            redirect: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Record a successful login.
    pub fn log_in(&mut self, user: impl Into<String>) {
        self.logged_in = true;
        self.user = Some(user.into());
    }

    /// Handle an upstream 401: warning toast now, `/login` redirect shortly.
    pub fn expire(&mut self, tray: &mut ToastTray, now: Instant) {
        self.logged_in = false;
        self.user = None;
        tray.push(
            "Your session has expired. Please log in again.",
            Severity::Warning,
            now,
        );
        self.redirect = Some((
            "/login".to_string(),
            now + SESSION_EXPIRED_REDIRECT_DELAY,
        ));
    }

    /// Queue a navigation to fire immediately.
    pub fn schedule_redirect(&mut self, destination: impl Into<String>, now: Instant) {
        self.redirect = Some((destination.into(), now));
    }

    /// Take the pending redirect if its due time has passed.
    pub fn due_redirect(&mut self, now: Instant) -> Option<String> {
        match &self.redirect {
            Some((_, due)) if now >= *due => {
                self.redirect.take().map(|(dest, _)| dest)
            }
            _ => None,
        }
    }

    pub fn pending_redirect(&self) -> Option<&str> {
        self.redirect.as_ref().map(|(dest, _)| dest.as_str())
    }

    /// Where a freshly registered account lands.
    pub fn post_register_destination(role: &str) -> &'static str {
        if role == "artisan" {
            "/artisan/onboard"
        } else {
            "/"
        }
    }
}

/// Toast used by the expiry path; exposed so the host can test against it.
pub fn is_session_expired_toast(toast: &Toast) -> bool {
    toast.severity == Severity::Warning && toast.message.starts_with("Your session has expired")
}
