use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fs::File, io::BufReader, path::Path, time::Duration};
use thiserror::Error;

use crate::tokenizer::{TemplateTransform, TokenDefinition, Tokenizer};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Registers the `@(name)` icon definition ahead of everything else.
    #[serde(default = "default_true")]
    pub builtin_icons: bool,

    #[serde(default)]
    pub definitions: Vec<DefinitionConfig>,

    #[serde(default)]
    pub integration: IntegrationConfig,
}

/// A definition whose transform is a `{content}` template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefinitionConfig {
    pub kind: String,
    pub start: String,
    pub end: String,
    #[serde(default = "default_template")]
    pub template: String,
}

impl DefinitionConfig {
    pub fn to_definition(&self) -> TokenDefinition {
        TokenDefinition::new(
            self.kind.clone(),
            self.start.clone(),
            self.end.clone(),
            TemplateTransform::new(self.template.clone()),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationConfig {
    #[serde(default = "default_connection_retries")]
    pub connection_retries: usize,

    #[serde(
        default = "default_connection_retry_delay",
        serialize_with = "millis_to_json",
        deserialize_with = "millis_from_json"
    )]
    pub connection_retry_delay: Duration,

    #[serde(
        default = "default_request_timeout",
        serialize_with = "millis_to_json",
        deserialize_with = "millis_from_json"
    )]
    pub request_timeout: Duration,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            connection_retries: default_connection_retries(),
            connection_retry_delay: default_connection_retry_delay(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            builtin_icons: default_true(),
            definitions: Vec::new(),
            integration: IntegrationConfig::default(),
        }
    }
}

impl TokenizerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        from_file(path)
    }

    /// Tokenizer with the configured definitions, in file order.
    pub fn build_tokenizer(&self) -> Tokenizer {
        let mut tokenizer = if self.builtin_icons {
            Tokenizer::new()
        } else {
            Tokenizer::empty()
        };
        for definition in &self.definitions {
            tokenizer.register(definition.to_definition());
        }
        tokenizer
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> ConfigResult<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> ConfigResult<T> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}

fn default_true() -> bool {
    true
}

fn default_template() -> String {
    crate::tokenizer::definition::CONTENT_PLACEHOLDER.to_string()
}

fn default_connection_retries() -> usize {
    10
}

fn default_connection_retry_delay() -> Duration {
    Duration::from_millis(5000)
}

fn default_request_timeout() -> Duration {
    Duration::from_millis(1000)
}

/// Durations are written as whole milliseconds.
fn millis_to_json<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}

fn millis_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}
