use std::{fmt, future::Future, sync::Arc};

use async_trait::async_trait;

use super::error::TransformResult;

/// Placeholder substituted by [`TemplateTransform`].
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// Replaces the raw content of a typed token.
///
/// Transforms receive the content with delimiters stripped and nested
/// markup left verbatim. A transform that wants nested expansion has to run
/// its own tokenizer over the content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transform: Send + Sync {
    async fn transform(&self, content: String) -> TransformResult<String>;
}

#[async_trait]
impl<F, Fut> Transform for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = TransformResult<String>> + Send,
{
    async fn transform(&self, content: String) -> TransformResult<String> {
        (self)(content).await
    }
}

/// Renders a Bootstrap icon name as inline markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconTransform;

impl IconTransform {
    pub fn render(name: &str) -> String {
        format!(
            r#"<i class="sidebar-icon"><i id="sidebar-icon" class="{}"></i></i>"#,
            name
        )
    }
}

#[async_trait]
impl Transform for IconTransform {
    async fn transform(&self, content: String) -> TransformResult<String> {
        Ok(Self::render(&content))
    }
}

/// Substitutes every `{content}` in a fixed template.
#[derive(Debug, Clone)]
pub struct TemplateTransform {
    template: String,
}

impl TemplateTransform {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, content: &str) -> String {
        self.template.replace(CONTENT_PLACEHOLDER, content)
    }
}

#[async_trait]
impl Transform for TemplateTransform {
    async fn transform(&self, content: String) -> TransformResult<String> {
        Ok(self.render(&content))
    }
}

/// A registered span type: delimiters plus the transform for its content.
///
/// Delimiters are compared literally, char by char. Empty delimiters are
/// accepted but degrade matching: an empty `start` matches at every
/// position and an empty `end` never closes a span.
#[derive(Clone)]
pub struct TokenDefinition {
    pub kind: String,
    pub start: String,
    pub end: String,
    transform: Arc<dyn Transform>,
}

impl TokenDefinition {
    pub fn new(
        kind: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        transform: impl Transform + 'static,
    ) -> Self {
        Self::with_shared(kind, start, end, Arc::new(transform))
    }

    pub fn with_shared(
        kind: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        transform: Arc<dyn Transform>,
    ) -> Self {
        Self {
            kind: kind.into(),
            start: start.into(),
            end: end.into(),
            transform,
        }
    }

    /// The `@(name)` icon shortcode every default tokenizer starts with.
    pub fn bootstrap_icon() -> Self {
        Self::new("bootstrap", "@(", ")", IconTransform)
    }

    pub async fn apply(&self, content: String) -> TransformResult<String> {
        self.transform.transform(content).await
    }

    pub(crate) fn is_degenerate(&self) -> bool {
        self.start.is_empty() || self.end.is_empty()
    }
}

impl fmt::Debug for TokenDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDefinition")
            .field("kind", &self.kind)
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}
