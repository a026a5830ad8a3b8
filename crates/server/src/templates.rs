use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::prefs::PrefLink;

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub body: String,
    pub canonical_url: String,
    pub home_href: String,
}

pub struct HiddenField {
    pub name: &'static str,
    pub value: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub home_href: String,
    pub hidden: Vec<HiddenField>,
    pub skins: Vec<PrefLink>,
    pub modes: Vec<PrefLink>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: &'static str,
    pub home_href: String,
}

/// Render a template into an HTML response with `status`.
pub fn render<T: Template>(template: T, status: StatusCode) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(
                target = "httpedia::server",
                op = "templates::render",
                result = "error",
                error = %err,
                "Template rendering failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
        }
    }
}
