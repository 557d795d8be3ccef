//! # Token engine
//!
//! Scans free-form text for registered delimiter pairs and rebuilds it with
//! every recognized span passed through that span type's async transform.
//!
//! ```text
//! "see [[places.messina]] @(bi-star)"
//!        │ get_tokens
//!        ▼
//! text("see ") ref("places.messina") text(" ") bootstrap("bi-star")
//!        │ combine(tokens, true)
//!        ▼
//! "see Messina <i class=\"sidebar-icon\">...</i>"
//! ```
//!
//! Scanning slides a window as wide as the longest delimiter over the text.
//! At each position the definitions are tried in registration order, so the
//! earliest registered `start` wins ambiguous matches. A matched `start`
//! opens a nested scan that runs until that definition's `end`.
//!
//! Spans that are never closed keep the boundary arithmetic of a found end:
//! the content stops `end.len() - 1` chars before the end of the text, so
//! `"x[[y"` yields an empty `[[`/`]]` token.
//!
//! The transform phase is shallow and sequential: only top-level tokens
//! are transformed, each awaited before the next.

pub mod definition;
pub mod error;
pub mod registry;
pub mod token;
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use definition::{IconTransform, TemplateTransform, TokenDefinition, Transform};
pub use error::{TokenizerError, TokenizerResult, TransformError, TransformResult};
pub use registry::DefinitionRegistry;
pub use token::{Token, TokenKind, TEXT_KIND};
pub use tokenizer::Tokenizer;
