use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Transform failed: {0}")]
    Failed(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type TransformResult<T> = Result<T, TransformError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("Transform for '{kind}' failed: {source}")]
    Transform {
        kind: String,
        #[source]
        source: TransformError,
    },
}

pub type TokenizerResult<T> = Result<T, TokenizerError>;
