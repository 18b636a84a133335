use axum::{
    extract::{Path, State},
    response::Html,
};
use serde_json::Value;

use crate::{
    config::AppConfig,
    media::{HtmlImage, ImageOptions, SafeImage, SafeImageProps, escape_html},
};

// Server-rendered placeholder pages. Layout only; catalog and inbox data are not wired.

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | Shopfront</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> <a href=\"/products\">Products</a> \
         <a href=\"/admin/messages\">Inbox</a> <a href=\"/login\">Sign in</a></nav>\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    ))
}

/// home
///
/// Landing page. The hero image comes from configuration and may be missing or blank,
/// in which case the page renders without it.
pub async fn home(State(config): State<AppConfig>) -> Html<String> {
    let hero = SafeImage::<HtmlImage>::default()
        .render(&SafeImageProps::new(
            config.hero_image.map(Value::String),
            ImageOptions {
                alt: Some("Shopfront".to_string()),
                width: Some(1200),
                height: Some(480),
                class: Some("hero".to_string()),
                priority: true,
                ..ImageOptions::default()
            },
        ))
        .unwrap_or_default();

    layout(
        "Home",
        &format!("{}\n<h1>Welcome to Shopfront</h1>\n<p>Browse the catalog to get started.</p>", hero),
    )
}

pub async fn products() -> Html<String> {
    layout(
        "Products",
        "<h1>Products</h1>\n<p>The catalog is coming soon.</p>",
    )
}

pub async fn product_detail(Path(id): Path<String>) -> Html<String> {
    layout(
        "Product",
        &format!(
            "<h1>Product {}</h1>\n<p>Product details are coming soon.</p>",
            escape_html(&id)
        ),
    )
}

/// login
///
/// Authentication is disabled; the page says so instead of showing a form.
pub async fn login() -> Html<String> {
    layout(
        "Sign in",
        "<h1>Sign in</h1>\n<p>Authentication is currently disabled.</p>",
    )
}

pub async fn admin_messages() -> Html<String> {
    layout(
        "Inbox",
        "<h1>Messages</h1>\n<p>The admin inbox is not available yet.</p>",
    )
}
