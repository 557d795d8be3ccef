use std::fmt;

use serde::{Serialize, Serializer};

/// Kind string used for untyped literal spans.
pub const TEXT_KIND: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Literal text between recognized spans.
    Text,
    /// A span recognized by the definition with this kind.
    Definition(String),
}

impl TokenKind {
    pub fn as_str(&self) -> &str {
        match self {
            TokenKind::Text => TEXT_KIND,
            TokenKind::Definition(kind) => kind,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TokenKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A node of the parse result.
///
/// For typed tokens `content` is the raw text strictly between the
/// delimiters, nested markup included. `children` holds the nested parse of
/// that same span and is never consulted when combining.
///
/// `open` and `close` keep the delimiters the span was matched with, so a
/// token sequence can be reassembled into its source. `close` is empty when
/// the span was never terminated. Both are cleared once a transform has
/// replaced the span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Token>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub open: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub close: String,
}

impl Token {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Text,
            content: content.into(),
            children: Vec::new(),
            open: String::new(),
            close: String::new(),
        }
    }

    pub fn typed(
        kind: impl Into<String>,
        open: impl Into<String>,
        content: impl Into<String>,
        close: impl Into<String>,
        children: Vec<Token>,
    ) -> Self {
        Self {
            kind: TokenKind::Definition(kind.into()),
            content: content.into(),
            children,
            open: open.into(),
            close: close.into(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }

    /// Replaces the whole span, delimiters included.
    pub fn replace(&mut self, content: String) {
        self.content = content;
        self.open.clear();
        self.close.clear();
    }

    /// The span as it currently renders: delimiters around the content
    /// unless a transform has replaced it.
    pub fn render(&self) -> String {
        let mut rendered =
            String::with_capacity(self.open.len() + self.content.len() + self.close.len());
        rendered.push_str(&self.open);
        rendered.push_str(&self.content);
        rendered.push_str(&self.close);
        rendered
    }

    /// Concatenates the rendered tokens in order.
    pub fn join(tokens: &[Token]) -> String {
        tokens.iter().map(Token::render).collect()
    }
}

// Children are flattened before they drop, so freeing a deeply nested tree
// does not recurse once per level.
impl Drop for Token {
    fn drop(&mut self) {
        let mut descendants = std::mem::take(&mut self.children);
        while let Some(mut token) = descendants.pop() {
            descendants.append(&mut token.children);
        }
    }
}
