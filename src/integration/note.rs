use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::{
    config::IntegrationConfig,
    tokenizer::{TokenDefinition, Tokenizer, Transform, TransformResult},
    InternalResult,
};

use super::{
    block::{extract_block, BlockReference},
    IntegrationError, IntegrationResult, Integrator,
};

/// Embeds the rendered note (or one of its blocks): `![[note#block]]`.
pub const REF_CONTENT_KIND: &str = "refContent";
/// Shows the referenced note's title: `[[note]]`.
pub const REF_KIND: &str = "ref";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub fname: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Where notes come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteSource: Send + Sync {
    async fn check_connection(&self) -> bool;

    /// Looks a note up by its file name without extension, e.g.
    /// `places.messina`.
    async fn find_note(&self, name: String) -> IntegrationResult<Option<Note>>;

    /// Rendered HTML of `note`.
    async fn render_note(&self, note: Note) -> IntegrationResult<Option<String>>;
}

/// Note lookups with a deadline. Failures are logged and read as "no note".
struct NoteLookup<S> {
    source: Arc<S>,
    request_timeout: Duration,
}

impl<S> Clone for NoteLookup<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

impl<S: NoteSource> NoteLookup<S> {
    async fn find(&self, name: &str) -> Option<Note> {
        self.bounded(name, self.source.find_note(name.to_string())).await
    }

    async fn render(&self, note: Note) -> Option<String> {
        let name = note.fname.clone();
        self.bounded(&name, self.source.render_note(note)).await
    }

    async fn bounded<T>(
        &self,
        name: &str,
        request: impl Future<Output = IntegrationResult<Option<T>>>,
    ) -> Option<T> {
        match timeout(self.request_timeout, request).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                warn!("Lookup of note '{}' failed: {}", name, e);
                None
            }
            Err(_) => {
                warn!(
                    "Lookup of note '{}' timed out after {:?}",
                    name, self.request_timeout
                );
                None
            }
        }
    }

    async fn format(&self, reference: &str) -> Option<String> {
        let reference = BlockReference::parse(reference);
        let note = self.find(reference.note).await?;
        let rendered = self.render(note).await?;

        match reference.marker {
            Some(marker) => Some(extract_block(&rendered, &marker, reference.until)),
            None => Some(rendered),
        }
    }
}

struct NoteTitle<S>(NoteLookup<S>);

#[async_trait]
impl<S: NoteSource + 'static> Transform for NoteTitle<S> {
    async fn transform(&self, content: String) -> TransformResult<String> {
        Ok(match self.0.find(&content).await {
            Some(note) => note.title,
            None => content,
        })
    }
}

struct NoteContent<S>(NoteLookup<S>);

#[async_trait]
impl<S: NoteSource + 'static> Transform for NoteContent<S> {
    async fn transform(&self, content: String) -> TransformResult<String> {
        Ok(self.0.format(&content).await.unwrap_or(content))
    }
}

/// Expands `![[note]]` into the note's rendered content and `[[note]]` into
/// its title. Unknown notes keep the raw reference text.
pub struct NoteIntegrator<S> {
    source: Arc<S>,
    config: IntegrationConfig,
    tokenizer: Tokenizer,
}

impl<S: NoteSource + 'static> NoteIntegrator<S> {
    pub fn new(source: S, config: IntegrationConfig) -> Self {
        let source = Arc::new(source);
        let lookup = NoteLookup {
            source: source.clone(),
            request_timeout: config.request_timeout,
        };

        // "![[" has to be registered before "[[" to win the tie.
        let mut tokenizer = Tokenizer::new();
        tokenizer.register(TokenDefinition::new(
            REF_CONTENT_KIND,
            "![[",
            "]]",
            NoteContent(lookup.clone()),
        ));
        tokenizer.register(TokenDefinition::new(REF_KIND, "[[", "]]", NoteTitle(lookup)));

        Self {
            source,
            config,
            tokenizer,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Polls the source until it answers, waiting between attempts.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn connect(&self) -> IntegrationResult<()> {
        let attempts = self.config.connection_retries;
        for attempt in 1..=attempts {
            if self.source.check_connection().await {
                info!("Note source connected after {} attempt(s)", attempt);
                return Ok(());
            }
            debug!("Note source not reachable, attempt {}/{}", attempt, attempts);
            if attempt < attempts {
                sleep(self.config.connection_retry_delay).await;
            }
        }
        Err(IntegrationError::Unreachable { attempts })
    }
}

#[async_trait]
impl<S: NoteSource + 'static> Integrator for NoteIntegrator<S> {
    async fn parse(&self, text: &str) -> InternalResult<String> {
        Ok(self.tokenizer.expand(text).await?)
    }
}
