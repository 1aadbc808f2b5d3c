//! Toast tray with timed auto-dismiss.

use std::time::{Duration, Instant};

/// Toasts dismiss themselves after this long.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// Severity picks the icon and css class only; behavior is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✗",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Success => "toast-success",
            Severity::Error => "toast-error",
            Severity::Warning => "toast-warning",
            Severity::Info => "toast-info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

/// Active toasts in arrival order.
#[derive(Debug, Default)]
pub struct ToastTray {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            severity,
            expires_at: now + TOAST_TTL,
        });
        id
    }

    /// Drop toasts whose lifetime has elapsed.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Manual dismissal; unknown ids are a no-op.
    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
