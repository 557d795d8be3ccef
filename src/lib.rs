//! # tokenweave
//!
//! A delimiter-driven text tokenizer with asynchronous span transforms.
//! Register token definitions, scan text into a token tree, then combine
//! the tree back into a string with every recognized span transformed.
//!
//! ```rust,no_run
//! # use tokenweave::tokenizer::{TokenDefinition, Tokenizer, TransformError};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tokenizer = Tokenizer::new();
//! tokenizer.register(TokenDefinition::new("ref", "[[", "]]", |name: String| async move {
//!     Ok::<_, TransformError>(name.to_uppercase())
//! }));
//!
//! let mut tokens = tokenizer.get_tokens("to [[places.messina]] @(bi-star)");
//! let expanded = tokenizer.combine(&mut tokens, true).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod integration;
pub mod tokenizer;

// Re-exports
pub use error::*;
pub use tokenizer::{Token, TokenDefinition, TokenKind, Tokenizer};
