//! Server-rendered page shells.
//!
//! Each protected section renders a minimal HTML document naming the section
//! and linking the sections the viewer's role may open. Protected sections
//! only reach these handlers once the route guard has allowed them.

use axum::http::Uri;
use axum::response::Html;
use tracing::instrument;

use unidesk_auth::Principal;
use unidesk_core::permissions::{LANDING_PATH, allowed_routes};

use crate::middleware::auth::Session;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn section_title(path: &str) -> String {
    let section = path.trim_start_matches('/').split('/').next().unwrap_or("");
    let mut chars = section.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Home".to_string(),
    }
}

fn navigation(principal: Option<&Principal>) -> String {
    let Some(principal) = principal else {
        return String::new();
    };

    let links: String = allowed_routes(principal.role)
        .iter()
        .filter(|route| **route != LANDING_PATH)
        .map(|route| format!(r#"<li><a href="{route}">{}</a></li>"#, section_title(route)))
        .collect();

    format!(
        "<nav><p>Signed in as {} ({})</p><ul>{links}</ul></nav>",
        escape_html(&principal.email),
        principal.role
    )
}

pub fn render_page(title: &str, principal: Option<&Principal>, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title} | Unidesk</title></head>\
         <body>{}<main><h1>{title}</h1>{body}</main></body></html>",
        navigation(principal)
    )
}

#[instrument(skip_all)]
pub async fn landing(Session(principal): Session) -> Html<String> {
    let body = match &principal {
        Some(_) => "<p>Choose a section.</p>",
        None => "<p>Sign in through <code>POST /api/auth/login</code> to continue.</p>",
    };
    Html(render_page("Unidesk", principal.as_ref(), body))
}

#[instrument(skip_all, fields(path = %uri.path()))]
pub async fn section_page(uri: Uri, Session(principal): Session) -> Html<String> {
    let title = section_title(uri.path());
    let body = format!("<p>{} section</p>", escape_html(&title));
    Html(render_page(&title, principal.as_ref(), &body))
}
