//! Named slide renderers.
//!
//! The registry maps a template name to a function turning a [`Slide`] into
//! markup. Unknown names fall back to a built-in default renderer, so a
//! caller can always render something.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::slide::Slide;

/// A slide renderer.
pub type RenderFn = Arc<dyn Fn(&Slide) -> String + Send + Sync>;

/// Image shown when a slide has no image URL.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// Registry of named renderers with a default fallback.
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, RenderFn>>,
    default_template: RenderFn,
}

impl TemplateRegistry {
    /// Create an empty registry using [`default_template`] as fallback.
    pub fn new() -> Self {
        Self::with_default(Arc::new(default_template))
    }

    /// Create an empty registry with a custom fallback renderer.
    pub fn with_default(default_template: RenderFn) -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
            default_template,
        }
    }

    /// Register (or replace) a renderer under `name`.
    pub fn register(&self, name: impl Into<String>, template: RenderFn) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), template);
    }

    /// Get the renderer registered under `name`, or the default one.
    pub fn get(&self, name: &str) -> RenderFn {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_template))
    }

    /// Check whether a renderer is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered template names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Render `slide` with the template registered under `name`.
    pub fn render(&self, name: &str, slide: &Slide) -> String {
        (self.get(name))(slide)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in slide markup: image, title, description and id.
pub fn default_template(slide: &Slide) -> String {
    let image = or_default(&slide.image, PLACEHOLDER_IMAGE);
    let alt = or_default(&slide.title, "Slide");
    let title = or_default(&slide.title, "Untitled");
    let description = or_default(&slide.description, "No description");

    format!(
        r#"<div class="slide-content">
    <img src="{image}" alt="{alt}" class="slide-image" onerror="this.src='{placeholder}'">
    <div class="slide-info">
        <h3 class="slide-title">{title}</h3>
        <p class="slide-description">{description}</p>
        <div class="slide-meta">
            <span class="slide-id">ID: {id}</span>
        </div>
    </div>
</div>"#,
        image = escape_html(image),
        alt = escape_html(alt),
        placeholder = PLACEHOLDER_IMAGE,
        title = escape_html(title),
        description = escape_html(description),
        id = slide.id,
    )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
