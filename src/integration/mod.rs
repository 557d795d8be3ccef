//! Note cross-reference expansion built on the token engine.
//!
//! The integrator only knows notes through [`note::NoteSource`]; fetching
//! them over HTTP or from disk is up to the implementor.

pub mod block;
pub mod note;

use async_trait::async_trait;
use thiserror::Error;

use crate::InternalResult;

pub use block::{extract_block, BlockReference};
pub use note::{Note, NoteIntegrator, NoteSource, REF_CONTENT_KIND, REF_KIND};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("Note source error: {0}")]
    Source(String),
    #[error("Note source unreachable after {attempts} attempts")]
    Unreachable { attempts: usize },
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;

/// Expands a note's references into their final text.
#[async_trait]
pub trait Integrator: Send + Sync {
    async fn parse(&self, text: &str) -> InternalResult<String>;
}
