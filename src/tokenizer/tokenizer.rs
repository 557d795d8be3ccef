use tracing::{debug, trace};

use super::{
    definition::TokenDefinition,
    error::{TokenizerError, TokenizerResult},
    registry::DefinitionRegistry,
    token::{Token, TokenKind},
};

/// Scans text for registered spans and reassembles it through their
/// transforms.
///
/// A default tokenizer starts with the `@(name)` icon definition; use
/// [`Tokenizer::empty`] for one without it.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    registry: DefinitionRegistry,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        let mut tokenizer = Self::empty();
        tokenizer.register(TokenDefinition::bootstrap_icon());
        tokenizer
    }

    pub fn empty() -> Self {
        Self::with_registry(DefinitionRegistry::new())
    }

    pub fn with_registry(registry: DefinitionRegistry) -> Self {
        Self { registry }
    }

    pub fn register(&mut self, definition: TokenDefinition) {
        self.registry.register(definition);
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DefinitionRegistry {
        &mut self.registry
    }

    pub fn window_size(&self) -> usize {
        self.registry.window_size()
    }

    /// Top-level tokens of `text`, left to right.
    #[tracing::instrument(level = "debug", skip(self, text))]
    pub fn get_tokens(&self, text: &str) -> Vec<Token> {
        let tokens = Scanner::new(text, &self.registry).tokenize();
        debug!("found {} top-level tokens", tokens.len());
        tokens
    }

    /// Runs the transform of every typed top-level token, one after the
    /// other in token order. Children are left alone.
    ///
    /// The first failing transform aborts the pass: tokens before it keep
    /// their replaced content, the rest stay untouched.
    #[tracing::instrument(level = "debug", skip(self, tokens), fields(count = tokens.len()))]
    pub async fn replace_tokens(&self, tokens: &mut [Token]) -> TokenizerResult<()> {
        for token in tokens.iter_mut() {
            let TokenKind::Definition(kind) = &token.kind else {
                continue;
            };
            let Some(definition) = self.registry.find(kind) else {
                trace!("no definition for '{}', left as is", kind);
                continue;
            };

            let replaced = definition
                .apply(token.content.clone())
                .await
                .map_err(|source| TokenizerError::Transform {
                    kind: kind.clone(),
                    source,
                })?;
            token.replace(replaced);
        }
        Ok(())
    }

    /// Concatenates `tokens`, after replacing them when `apply_transforms`
    /// is set. Without transforms the source text is reproduced.
    pub async fn combine(
        &self,
        tokens: &mut [Token],
        apply_transforms: bool,
    ) -> TokenizerResult<String> {
        if apply_transforms {
            self.replace_tokens(tokens).await?;
        }
        Ok(Token::join(tokens))
    }

    /// Tokenizes `text` and combines it with transforms applied.
    #[tracing::instrument(level = "debug", skip(self, text))]
    pub async fn expand(&self, text: &str) -> TokenizerResult<String> {
        let mut tokens = self.get_tokens(text);
        self.combine(&mut tokens, true).await
    }
}

struct Delimiters<'a> {
    definition: &'a TokenDefinition,
    start: Vec<char>,
    end: Vec<char>,
}

enum Step {
    Advance,
    /// The start of the definition at this index ends at the current char.
    Open(usize),
    /// The innermost open span's end delimiter ends at the current char.
    Close,
}

/// Tokens collected at one nesting depth.
struct Level {
    /// Start of the unconsumed text. The window never reaches before it.
    pending: usize,
    tokens: Vec<Token>,
}

impl Level {
    fn new(pending: usize) -> Self {
        Self {
            pending,
            tokens: Vec::new(),
        }
    }
}

/// A span whose start has been matched but whose end has not.
struct OpenSpan {
    /// Index into the scanner's delimiters.
    definition: usize,
    /// Index of the last char of the start delimiter.
    opened_at: usize,
    children: Level,
}

/// Level that new tokens go to: the innermost open span, or the top level.
fn innermost<'l>(open: &'l mut [OpenSpan], root: &'l mut Level) -> &'l mut Level {
    match open.last_mut() {
        Some(span) => &mut span.children,
        None => root,
    }
}

/// One scan over a text; the window size is fixed for its whole lifetime.
///
/// Nesting is tracked on an explicit stack, so depth is bounded by memory
/// rather than by the call stack.
struct Scanner<'a> {
    text: Vec<char>,
    delimiters: Vec<Delimiters<'a>>,
    window_size: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &str, registry: &'a DefinitionRegistry) -> Self {
        let delimiters = registry
            .iter()
            .map(|definition| Delimiters {
                definition,
                start: definition.start.chars().collect(),
                end: definition.end.chars().collect(),
            })
            .collect();

        Self {
            text: text.chars().collect(),
            delimiters,
            window_size: registry.window_size(),
        }
    }

    fn tokenize(&self) -> Vec<Token> {
        let mut root = Level::new(0);
        let mut open: Vec<OpenSpan> = Vec::new();

        for i in 0..self.text.len() {
            let closing: &[char] = match open.last() {
                Some(span) => &self.delimiters[span.definition].end,
                None => &[],
            };
            let level = innermost(&mut open, &mut root);
            let window_start = level.pending.max((i + 1).saturating_sub(self.window_size));
            let window = &self.text[window_start..=i];

            match self.check_definitions(window, closing) {
                Step::Advance => {}
                Step::Open(definition) => {
                    let start_len = self.delimiters[definition].start.len();
                    self.push_text(&mut level.tokens, level.pending, i + 1 - start_len);
                    open.push(OpenSpan {
                        definition,
                        opened_at: i,
                        children: Level::new(i + 1),
                    });
                }
                Step::Close => {
                    if let Some(span) = open.pop() {
                        let parent = innermost(&mut open, &mut root);
                        self.close_span(span, i, parent);
                    }
                }
            }
        }

        // Spans still open at the end of the text close there, innermost first.
        let len = self.text.len();
        while let Some(span) = open.pop() {
            let parent = innermost(&mut open, &mut root);
            self.close_span(span, len, parent);
        }
        self.push_text(&mut root.tokens, root.pending, len);
        root.tokens
    }

    /// The closing delimiter is tested after each definition's start, so the
    /// first registered start outranks it and it outranks every later one.
    fn check_definitions(&self, window: &[char], closing: &[char]) -> Step {
        for (index, delimiters) in self.delimiters.iter().enumerate() {
            if window.ends_with(&delimiters.start) {
                return Step::Open(index);
            }
            if !closing.is_empty() && window.ends_with(closing) {
                return Step::Close;
            }
        }
        Step::Advance
    }

    /// Turns `span` into a token of `parent`. `end` is the index of the last
    /// char of the end delimiter, or the text length when it was never found.
    fn close_span(&self, span: OpenSpan, end: usize, parent: &mut Level) {
        let delimiters = &self.delimiters[span.definition];
        let terminated = end < self.text.len();

        let mut children = span.children;
        let children_end = if terminated {
            end + 1 - delimiters.end.len()
        } else {
            self.text.len()
        };
        self.push_text(&mut children.tokens, children.pending, children_end);

        // Same arithmetic whether or not the end was found.
        let content = self.slice(
            span.opened_at + 1,
            end as isize + 1 - delimiters.end.len() as isize,
        );
        let close = if terminated {
            delimiters.definition.end.clone()
        } else {
            String::new()
        };

        let kind = &delimiters.definition.kind;
        trace!("matched '{}' span ending at {}", kind, end);
        parent.tokens.push(Token::typed(
            kind.clone(),
            delimiters.definition.start.clone(),
            content,
            close,
            children.tokens,
        ));
        parent.pending = end + 1;
    }

    fn push_text(&self, tokens: &mut Vec<Token>, from: usize, to: usize) {
        if from < to {
            tokens.push(Token::text(self.text[from..to].iter().collect::<String>()));
        }
    }

    /// Substring with both bounds clamped to the text and swapped when
    /// inverted.
    fn slice(&self, from: usize, to: isize) -> String {
        let len = self.text.len();
        let from = from.min(len);
        let to = to.clamp(0, len as isize) as usize;
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        self.text[low..high].iter().collect()
    }
}
