//! persona-page — page bootstrap models
//!
//! Session state (auth check, expiry redirect), login/register form
//! validation, and the toast tray. The host owns the wiring; everything
//! here is pure state.

pub mod dom;
mod forms;
mod session;
mod toast;

pub use forms::{
    is_valid_email, FormError, LoginForm, LoginRequest, RegisterForm, RegisterRequest,
    MIN_PASSWORD_LEN,
};
pub use session::{is_session_expired_toast, Session, SESSION_EXPIRED_REDIRECT_DELAY};
pub use toast::{Severity, Toast, ToastTray, TOAST_TTL};

use serde::Deserialize;

/// Wire actions accepted by the page shell.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PageAction {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
        role: String,
    },
    DismissToast {
        id: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        let a: PageAction =
            serde_json::from_str(r#"{"action":"login","email":"a@b.c","password":"secret1"}"#)
                .unwrap();
        assert!(matches!(a, PageAction::Login { .. }));

        let a: PageAction = serde_json::from_str(r#"{"action":"dismiss_toast","id":4}"#).unwrap();
        assert!(matches!(a, PageAction::DismissToast { id: 4 }));
    }
}
