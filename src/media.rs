use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// ImageSource
///
/// The outcome of validating an image source of unknown shape. Only `Valid` ever
/// reaches a renderer, and its text is already trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// No value, or an explicit JSON null.
    Missing,
    /// A value that cannot be used as a source; the reason is for logs only.
    Invalid(&'static str),
    Valid(String),
}

impl ImageSource {
    /// classify
    ///
    /// The single validation step. Strings are trimmed; blank strings and every
    /// non-string shape are refused.
    pub fn classify(candidate: Option<&Value>) -> Self {
        match candidate {
            None | Some(Value::Null) => ImageSource::Missing,
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    ImageSource::Invalid("blank string")
                } else {
                    ImageSource::Valid(trimmed.to_string())
                }
            }
            Some(Value::Bool(_)) => ImageSource::Invalid("boolean"),
            Some(Value::Number(_)) => ImageSource::Invalid("number"),
            Some(Value::Array(_)) => ImageSource::Invalid("array"),
            Some(Value::Object(_)) => ImageSource::Invalid("object"),
        }
    }

    pub fn as_valid(&self) -> Option<&str> {
        match self {
            ImageSource::Valid(src) => Some(src),
            _ => None,
        }
    }
}

/// ImageOptions
///
/// Passthrough configuration handed to the renderer untouched. Unknown keys land in
/// `extra` so callers can forward arbitrary attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub priority: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// SafeImageProps
///
/// What a caller hands to the guard: a candidate source of any shape plus options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SafeImageProps {
    #[serde(default)]
    #[schema(value_type = Object, example = "/img/hero.png")]
    pub src: Option<Value>,
    #[serde(flatten)]
    pub options: ImageOptions,
}

impl SafeImageProps {
    pub fn new(src: Option<Value>, options: ImageOptions) -> Self {
        Self { src, options }
    }
}

/// ImageProps
///
/// What a renderer receives: a validated source and the caller's options.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    pub src: String,
    pub options: ImageOptions,
}

/// ImageRenderer
///
/// The underlying image primitive. Implementations may assume `src` is non-empty.
pub trait ImageRenderer: Send + Sync {
    fn render(&self, image: &ImageProps) -> String;
}

/// HtmlImage
///
/// Renders an `<img>` tag. Attribute values are escaped; extra attributes follow the
/// known ones in key order, `true` renders as a bare attribute and `false`/`null`
/// are dropped. Extras never override the attributes in `RESERVED_ATTRS` and never
/// add `on*` event handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlImage;

impl ImageRenderer for HtmlImage {
    fn render(&self, image: &ImageProps) -> String {
        let options = &image.options;
        let mut tag = format!("<img src=\"{}\"", escape_html(&image.src));

        push_attr(&mut tag, "alt", options.alt.as_deref().unwrap_or(""));
        if let Some(width) = options.width {
            push_attr(&mut tag, "width", &width.to_string());
        }
        if let Some(height) = options.height {
            push_attr(&mut tag, "height", &height.to_string());
        }
        if let Some(class) = &options.class {
            push_attr(&mut tag, "class", class);
        }
        if options.priority {
            push_attr(&mut tag, "fetchpriority", "high");
        } else {
            push_attr(&mut tag, "loading", "lazy");
        }

        for (name, value) in &options.extra {
            if !is_attr_name(name) {
                tracing::warn!(attribute = %name, "Dropping image attribute with unsafe name");
                continue;
            }
            if is_event_handler(name) {
                tracing::warn!(attribute = %name, "Dropping image event handler attribute");
                continue;
            }
            if is_reserved(name) {
                tracing::debug!(attribute = %name, "Ignoring extra attribute already set by the renderer");
                continue;
            }
            match value {
                Value::Null | Value::Bool(false) => {}
                Value::Bool(true) => {
                    let _ = write!(tag, " {}", name);
                }
                Value::String(text) => push_attr(&mut tag, name, text),
                other => push_attr(&mut tag, name, &other.to_string()),
            }
        }

        tag.push('>');
        tag
    }
}

/// SafeImage
///
/// The defensive wrapper around an `ImageRenderer`. Stateless: the same props always
/// produce the same decision.
#[derive(Debug, Clone, Default)]
pub struct SafeImage<R = HtmlImage> {
    renderer: R,
}

impl<R: ImageRenderer> SafeImage<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the rendered markup, or `None` when the source is unusable.
    pub fn render(&self, props: &SafeImageProps) -> Option<String> {
        match ImageSource::classify(props.src.as_ref()) {
            ImageSource::Valid(src) => Some(self.renderer.render(&ImageProps {
                src,
                options: props.options.clone(),
            })),
            ImageSource::Missing => None,
            ImageSource::Invalid(reason) => {
                tracing::trace!(reason, "Skipping image with unusable source");
                None
            }
        }
    }
}

/// Escapes text for use in HTML content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn push_attr(tag: &mut String, name: &str, value: &str) {
    let _ = write!(tag, " {}=\"{}\"", name, escape_html(value));
}

/// Attributes `HtmlImage` writes itself.
const RESERVED_ATTRS: [&str; 7] = [
    "src",
    "alt",
    "width",
    "height",
    "class",
    "loading",
    "fetchpriority",
];

fn is_reserved(name: &str) -> bool {
    RESERVED_ATTRS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

fn is_event_handler(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

fn is_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}
