use thiserror::Error;

use crate::config::ConfigError;
use crate::integration::IntegrationError;
use crate::tokenizer::TokenizerError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
