//! Page shell rendering: toast tray and auth status strip.

use crate::session::Session;
use crate::toast::ToastTray;
use persona_dom::DomNode;

pub fn render_toasts(tray: &ToastTray) -> DomNode {
    let toasts = tray.iter().map(|toast| {
        DomNode::elem("div")
            .key(format!("toast-{}", toast.id))
            .class(format!("toast {}", toast.severity.css_class()))
            .child(DomNode::text("span", toast.severity.icon()).class("toast-icon"))
            .child(DomNode::text("span", &toast.message).class("toast-message"))
            .child(
                DomNode::text("button", "×")
                    .class("toast-close")
                    .attr("data-toast-id", toast.id.to_string())
                    .on("click", "dismiss_toast"),
            )
    });

    DomNode::elem("div")
        .key("toast-container")
        .class("toast-container")
        .children(toasts)
}

pub fn render_auth_status(session: &Session) -> DomNode {
    let strip = DomNode::elem("div").key("auth-status").class("auth-status");
    match session.user() {
        Some(user) => strip
            .child(DomNode::text("span", format!("Welcome, {}", user)).class("auth-user"))
            .child(
                DomNode::elem("a")
                    .class("auth-link")
                    .attr("href", "/logout")
                    .child(DomNode::text("span", "Log out")),
            ),
        None if session.is_logged_in() => {
            strip.child(DomNode::text("span", "Welcome back").class("auth-user"))
        }
        None => strip.child(
            DomNode::elem("a")
                .class("auth-link")
                .attr("href", "/login")
                .child(DomNode::text("span", "Log in")),
        ),
    }
}
